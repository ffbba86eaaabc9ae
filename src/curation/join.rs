use crate::bio::fasta;
use crate::core::config::TableConfig;
use crate::curation::extract::ExtractionMode;
use crate::curation::table::MasterTable;
use crate::{PhylofetchError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

static ACCESSION_RE: OnceLock<Regex> = OnceLock::new();

fn accession_re() -> &'static Regex {
    // Accession-like token: first alphanumeric run of length >= 4
    ACCESSION_RE.get_or_init(|| Regex::new(r"[A-Za-z0-9]{4,}").unwrap())
}

/// Join the accessions retained in a gene's finalized alignment back onto
/// the master table, as a new column named after the gene. Returns how many
/// rows received an accession.
pub fn join_gene(
    table: &mut MasterTable,
    gene: &str,
    aligned: &Path,
    table_config: &TableConfig,
) -> Result<usize> {
    if gene.trim().is_empty() {
        return Err(PhylofetchError::Config(
            "no gene region given for accession join".to_string(),
        ));
    }

    let entries = fasta::read_fasta(aligned).map_err(|e| PhylofetchError::Curation {
        path: aligned.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut accessions: HashMap<String, String> = HashMap::new();
    for (label, _) in &entries {
        let accession = match accession_re().find(label) {
            Some(m) => m.as_str().to_string(),
            None => {
                warn!(%label, "no accession-like token in label, ignoring");
                continue;
            }
        };
        match ExtractionMode::InArea.taxon_from_label(label) {
            Some(combination) => {
                accessions.entry(combination).or_insert(accession);
            }
            None => warn!(%label, "no combination name in label, ignoring"),
        }
    }

    table.add_column(gene, &table_config.combination_column, &accessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const CSV: &str = "\
combination,family,genus
Hydrocleys_martii,Alismataceae,Hydrocleys
Sagittaria_montevidensis,Alismataceae,Sagittaria
Echinodorus_grandiflorus,Alismataceae,Echinodorus
";

    fn setup(labels: &[&str]) -> (tempfile::TempDir, MasterTable, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let table_path = dir.path().join("taxa.csv");
        std::fs::write(&table_path, CSV).unwrap();
        let aligned = dir.path().join("atpB_aligned.fasta");
        let mut file = std::fs::File::create(&aligned).unwrap();
        for label in labels {
            writeln!(file, ">{label}").unwrap();
            writeln!(file, "ACGT-ACGT").unwrap();
        }
        (dir, MasterTable::load(&table_path).unwrap(), aligned)
    }

    #[test]
    fn test_join_adds_gene_column() {
        let (_dir, mut table, aligned) = setup(&[
            "AB088805_Alismataceae_Hydrocleys_martii",
            "AY952428_Alismataceae_Sagittaria_montevidensis",
        ]);

        let joined = join_gene(&mut table, "atpB", &aligned, &TableConfig::default()).unwrap();
        assert_eq!(joined, 2);

        let col = table.column_index("atpB").unwrap();
        assert_eq!(table.cell(0, col), "AB088805");
        assert_eq!(table.cell(1, col), "AY952428");
        assert_eq!(table.cell(2, col), "");
    }

    #[test]
    fn test_empty_gene_is_a_configuration_error() {
        let (_dir, mut table, aligned) = setup(&["AB088805_Hydrocleys_martii"]);
        assert!(matches!(
            join_gene(&mut table, "", &aligned, &TableConfig::default()),
            Err(PhylofetchError::Config(_))
        ));
    }

    #[test]
    fn test_unreadable_alignment_is_surfaced() {
        let (dir, mut table, _) = setup(&["AB088805_Hydrocleys_martii"]);
        let missing = dir.path().join("nope.fasta");
        assert!(matches!(
            join_gene(&mut table, "atpB", &missing, &TableConfig::default()),
            Err(PhylofetchError::Curation { .. })
        ));
    }
}
