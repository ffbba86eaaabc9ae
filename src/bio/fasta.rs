use crate::bio::record::SequenceRecord;
use crate::{PhylofetchError, Result};
use nom::{
    bytes::complete::tag,
    character::complete::{line_ending, not_line_ending},
    combinator::opt,
    sequence::preceded,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Marker token appended to genus-level placeholder records.
pub const COMPOSITE_MARKER: &str = "composite";
/// Marker token appended to records sought from outside the study area.
pub const OUTSIDE_MARKER: &str = "outside";

/// Selects which fields make up a FASTA label. Fields are always assembled
/// in a fixed order: accession, family, combination-or-genus, composite
/// marker, outside marker, joined by underscores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LabelConfig {
    pub accession: bool,
    pub family: bool,
    /// Full "Genus_species" combination name
    pub combination: bool,
    /// Genus only; ignored when `combination` is set
    pub genus: bool,
    pub composite_marker: bool,
    pub outside_marker: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            accession: true,
            family: true,
            combination: true,
            genus: false,
            composite_marker: false,
            outside_marker: false,
        }
    }
}

impl LabelConfig {
    /// At least one name-bearing field must be selected, otherwise every
    /// label would collapse to bare marker tokens.
    pub fn validate(&self) -> Result<()> {
        if !(self.accession || self.family || self.combination || self.genus) {
            return Err(PhylofetchError::Config(
                "label configuration selects none of accession/family/combination/genus"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Assemble the label for one record (without the leading '>').
    pub fn label(&self, record: &SequenceRecord) -> Result<String> {
        self.validate()?;
        if record.organism.is_empty() {
            return Err(PhylofetchError::Parse(format!(
                "record {} has an empty organism field",
                record.accession
            )));
        }
        debug_assert!(!record.organism.contains(char::is_whitespace));

        let mut fields: Vec<&str> = Vec::new();
        if self.accession {
            fields.push(&record.accession);
        }
        if self.family {
            if let Some(family) = record.family() {
                fields.push(family);
            }
        }
        if self.combination {
            fields.push(&record.organism);
        } else if self.genus {
            fields.push(record.genus());
        }
        if self.composite_marker {
            fields.push(COMPOSITE_MARKER);
        }
        if self.outside_marker {
            fields.push(OUTSIDE_MARKER);
        }
        Ok(fields.join("_"))
    }
}

/// Write records to a gene-scoped FASTA file. `append` extends an existing
/// file (replacement and outside rounds); otherwise the file is truncated
/// (initial round).
pub fn write_fasta(
    path: &Path,
    records: &[SequenceRecord],
    label: &LabelConfig,
    append: bool,
) -> Result<()> {
    label.validate()?;
    if records.is_empty() {
        return Err(PhylofetchError::Other(format!(
            "refusing to write empty sequence set to {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, ">{}", label.label(record)?)?;
        writeln!(writer, "{}", record.sequence)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a FASTA label line
fn parse_label(input: &str) -> IResult<&str, &str> {
    let (input, label) = preceded(tag(">"), not_line_ending)(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, label.trim_end()))
}

/// Parse sequence lines until the next label or EOF
fn parse_sequence(input: &str) -> IResult<&str, String> {
    let mut sequence = String::new();
    let mut remaining = input;

    while !remaining.is_empty() && !remaining.starts_with('>') {
        let (rest, line) = not_line_ending(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;
        sequence.extend(line.chars().filter(|c| !c.is_whitespace()));
        if rest.len() == remaining.len() {
            break;
        }
        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Read a label+sequence file back as ordered (label, sequence) pairs.
/// Tolerates wrapped sequence bodies as produced by external aligners.
pub fn read_fasta(path: &Path) -> Result<Vec<(String, String)>> {
    let text = std::fs::read_to_string(path)?;
    parse_fasta_str(&text)
}

pub fn parse_fasta_str(text: &str) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    let mut remaining = text.trim_start();

    while !remaining.is_empty() {
        let (rest, label) = parse_label(remaining)
            .map_err(|_| PhylofetchError::Parse("expected '>' label line".to_string()))?;
        let (rest, sequence) = parse_sequence(rest)
            .map_err(|_| PhylofetchError::Parse(format!("unreadable sequence under {label}")))?;
        if sequence.is_empty() {
            return Err(PhylofetchError::Parse(format!(
                "label {label} has no sequence body"
            )));
        }
        entries.push((label.to_string(), sequence));
        remaining = rest.trim_start();
    }

    if entries.is_empty() {
        return Err(PhylofetchError::Parse("no FASTA records found".to_string()));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> SequenceRecord {
        SequenceRecord {
            accession: "X123".to_string(),
            organism: "Hydrocleys_martii".to_string(),
            taxonomy: "Eukaryota; Alismatales; Nymphaeaceae; Hydrocleys".to_string(),
            sequence: "ACGTACGT".to_string(),
            length: 8,
        }
    }

    #[test]
    fn test_label_accession_family_combination() {
        let config = LabelConfig::default();
        assert_eq!(
            config.label(&record()).unwrap(),
            "X123_Nymphaeaceae_Hydrocleys_martii"
        );
    }

    #[test]
    fn test_label_genus_with_markers() {
        let config = LabelConfig {
            accession: true,
            family: true,
            combination: false,
            genus: true,
            composite_marker: false,
            outside_marker: true,
        };
        assert_eq!(
            config.label(&record()).unwrap(),
            "X123_Nymphaeaceae_Hydrocleys_outside"
        );
    }

    #[test]
    fn test_label_requires_a_name_field() {
        let config = LabelConfig {
            accession: false,
            family: false,
            combination: false,
            genus: false,
            composite_marker: true,
            outside_marker: false,
        };
        assert!(matches!(
            config.label(&record()),
            Err(PhylofetchError::Config(_))
        ));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atpB_sequences.fasta");
        write_fasta(&path, &[record()], &LabelConfig::default(), false).unwrap();

        let entries = read_fasta(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "X123_Nymphaeaceae_Hydrocleys_martii");
        assert_eq!(entries[0].1, "ACGTACGT");
    }

    #[test]
    fn test_append_extends_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atpB_sequences.fasta");
        write_fasta(&path, &[record()], &LabelConfig::default(), false).unwrap();
        let mut second = record();
        second.accession = "Y456".to_string();
        second.organism = "Sagittaria_montevidensis".to_string();
        write_fasta(&path, &[second], &LabelConfig::default(), true).unwrap();

        let entries = read_fasta(&path).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_wrapped_sequence_bodies() {
        let text = ">X123_Hydrocleys_martii\nACGT\nACGT\n>Y456_Sagittaria_montevidensis\nTTTT\n";
        let entries = parse_fasta_str(text).unwrap();
        assert_eq!(entries[0].1, "ACGTACGT");
        assert_eq!(entries[1].1, "TTTT");
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(parse_fasta_str("").is_err());
        assert!(parse_fasta_str("not fasta at all").is_err());
    }
}
