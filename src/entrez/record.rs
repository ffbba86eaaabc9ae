use crate::bio::record::SequenceRecord;
use crate::{PhylofetchError, Result};

/// Parse one GenBank flat-file record (the efetch `rettype=gb` payload for
/// a single identifier) into a normalized [`SequenceRecord`].
///
/// Only the fields this system consumes are read: LOCUS (name, length),
/// ACCESSION, ORGANISM plus its indented lineage continuation, and the
/// ORIGIN sequence body. Everything else is auxiliary metadata and skipped.
pub fn parse_genbank(text: &str) -> Result<SequenceRecord> {
    let mut locus = String::new();
    let mut declared_length: Option<usize> = None;
    let mut accession = String::new();
    let mut organism = String::new();
    let mut taxonomy_lines: Vec<String> = Vec::new();
    let mut sequence = String::new();

    let mut in_organism = false;
    let mut in_origin = false;

    for line in text.lines() {
        if line.trim() == "//" {
            break;
        }

        if in_origin {
            sequence.extend(
                line.chars()
                    .filter(|c| c.is_ascii_alphabetic())
                    .map(|c| c.to_ascii_uppercase()),
            );
            continue;
        }

        if in_organism {
            // Lineage continuation lines stay indented; the next keyword at
            // column zero (REFERENCE, FEATURES, ...) ends the block.
            if line.starts_with(' ') && !line.trim().is_empty() {
                taxonomy_lines.push(line.trim().trim_end_matches('.').to_string());
                continue;
            }
            in_organism = false;
        }

        if let Some(rest) = line.strip_prefix("LOCUS") {
            let fields: Vec<&str> = rest.split_whitespace().collect();
            if let Some(name) = fields.first() {
                locus = name.to_string();
            }
            if let Some(pos) = fields.iter().position(|f| *f == "bp") {
                if pos >= 1 {
                    declared_length = fields[pos - 1].parse().ok();
                }
            }
        } else if let Some(rest) = line.strip_prefix("ACCESSION") {
            if let Some(first) = rest.split_whitespace().next() {
                accession = first.to_string();
            }
        } else if let Some(rest) = line.trim_start().strip_prefix("ORGANISM") {
            organism = rest.trim().split_whitespace().collect::<Vec<_>>().join("_");
            in_organism = true;
        } else if line.starts_with("ORIGIN") {
            in_origin = true;
        }
    }

    if organism.is_empty() {
        return Err(PhylofetchError::Parse(
            "GenBank record has no ORGANISM field".to_string(),
        ));
    }
    if sequence.is_empty() {
        return Err(PhylofetchError::Parse(format!(
            "GenBank record {locus} has no sequence body"
        )));
    }
    if accession.is_empty() {
        accession = locus.clone();
    }
    if accession.is_empty() {
        return Err(PhylofetchError::Parse(
            "GenBank record has neither ACCESSION nor LOCUS".to_string(),
        ));
    }

    let length = declared_length.unwrap_or(sequence.len());
    Ok(SequenceRecord {
        accession,
        organism,
        taxonomy: taxonomy_lines.join(" "),
        sequence,
        length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RECORD: &str = "\
LOCUS       AB088805                  32 bp    DNA     linear   PLN 04-OCT-2002
DEFINITION  Hydrocleys martii atpB gene for ATP synthase beta subunit.
ACCESSION   AB088805
VERSION     AB088805.1
SOURCE      Hydrocleys martii
  ORGANISM  Hydrocleys martii
            Eukaryota; Viridiplantae; Streptophyta; Liliopsida; Alismatales;
            Alismataceae; Hydrocleys.
FEATURES             Location/Qualifiers
     source          1..32
ORIGIN
        1 acgtacgtac gtacgtacgt acgtacgtac gt
//
";

    #[test]
    fn test_parse_full_record() {
        let rec = parse_genbank(RECORD).unwrap();
        assert_eq!(rec.accession, "AB088805");
        assert_eq!(rec.organism, "Hydrocleys_martii");
        assert_eq!(rec.length, 32);
        assert_eq!(rec.sequence, "ACGTACGTACGTACGTACGTACGTACGTACGT");
        assert!(rec.taxonomy.contains("Alismataceae"));
        assert_eq!(rec.family(), Some("Alismataceae"));
    }

    #[test]
    fn test_organism_whitespace_is_normalized() {
        let rec = parse_genbank(RECORD).unwrap();
        assert!(!rec.organism.contains(' '));
    }

    #[test]
    fn test_missing_organism_is_malformed() {
        let text = "LOCUS       X 4 bp\nORIGIN\n  1 acgt\n//\n";
        assert!(matches!(
            parse_genbank(text),
            Err(PhylofetchError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_sequence_is_malformed() {
        let text = "LOCUS       X 4 bp\n  ORGANISM  Hydrocleys martii\n//\n";
        assert!(matches!(
            parse_genbank(text),
            Err(PhylofetchError::Parse(_))
        ));
    }

    #[test]
    fn test_accession_falls_back_to_locus() {
        let text = "\
LOCUS       AB000001                   8 bp    DNA     linear   PLN 01-JAN-2000
  ORGANISM  Sagittaria montevidensis
            Eukaryota; Alismataceae; Sagittaria.
ORIGIN
        1 acgtacgt
//
";
        let rec = parse_genbank(text).unwrap();
        assert_eq!(rec.accession, "AB000001");
        assert_eq!(rec.organism, "Sagittaria_montevidensis");
    }
}
