use crate::bio::fasta;
use crate::core::session::AcquisitionSession;
use crate::curation::extract::ExtractionMode;
use crate::{PhylofetchError, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

/// Taxon identifiers retained in a curated sequence file (post external
/// clustering/alignment and manual editing).
pub fn retained_taxa(curated: &Path, mode: ExtractionMode) -> Result<BTreeSet<String>> {
    let entries = fasta::read_fasta(curated).map_err(|e| PhylofetchError::Curation {
        path: curated.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut retained = BTreeSet::new();
    for (label, _) in &entries {
        match mode.taxon_from_label(label) {
            Some(taxon) => {
                retained.insert(taxon);
            }
            None => warn!(%label, "no taxon identifier in curated label, ignoring"),
        }
    }
    Ok(retained)
}

/// Sought-minus-retained: the taxa that did not survive curation, queued for
/// a repeat search at the next rank.
pub fn replacement_worklist(
    session: &AcquisitionSession,
    curated: &Path,
    mode: ExtractionMode,
) -> Result<BTreeSet<String>> {
    let retained = retained_taxa(curated, mode)?;
    Ok(session.sought.difference(&retained).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn session(taxa: &[&str]) -> AcquisitionSession {
        AcquisitionSession::new("atpB", taxa.iter().map(|s| s.to_string()).collect(), 0)
    }

    fn curated_file(dir: &tempfile::TempDir, labels: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join("atpB_aligned.fasta");
        let mut file = std::fs::File::create(&path).unwrap();
        for label in labels {
            writeln!(file, ">{label}").unwrap();
            writeln!(file, "ACGT").unwrap();
        }
        path
    }

    #[test]
    fn test_worklist_is_exact_set_difference() {
        let dir = tempfile::tempdir().unwrap();
        let curated = curated_file(
            &dir,
            &[
                "X1_Alismataceae_Aaa_aaa",
                "X3_Alismataceae_Ccc_ccc",
            ],
        );
        let session = session(&["Aaa_aaa", "Bbb_bbb", "Ccc_ccc"]);

        let worklist =
            replacement_worklist(&session, &curated, ExtractionMode::InArea).unwrap();
        let expected: BTreeSet<String> = ["Bbb_bbb".to_string()].into_iter().collect();
        assert_eq!(worklist, expected);
    }

    #[test]
    fn test_nothing_lost_means_empty_worklist() {
        let dir = tempfile::tempdir().unwrap();
        let curated = curated_file(&dir, &["X1_Aaa_aaa", "X2_Bbb_bbb"]);
        let session = session(&["Aaa_aaa", "Bbb_bbb"]);

        let worklist =
            replacement_worklist(&session, &curated, ExtractionMode::InArea).unwrap();
        assert!(worklist.is_empty());
    }

    #[test]
    fn test_outside_mode_compares_genera() {
        let dir = tempfile::tempdir().unwrap();
        let curated = curated_file(&dir, &["X1_Alismataceae_Hydrocleys_outside"]);
        let session = session(&["Hydrocleys", "Sagittaria"]);

        let worklist =
            replacement_worklist(&session, &curated, ExtractionMode::OutsideArea).unwrap();
        let expected: BTreeSet<String> = ["Sagittaria".to_string()].into_iter().collect();
        assert_eq!(worklist, expected);
    }

    #[test]
    fn test_unreadable_curated_file_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atpB_aligned.fasta");
        std::fs::write(&path, "this is not fasta\n").unwrap();
        let result = replacement_worklist(&session(&["Aaa_aaa"]), &path, ExtractionMode::InArea);
        assert!(matches!(result, Err(PhylofetchError::Curation { .. })));
    }
}
