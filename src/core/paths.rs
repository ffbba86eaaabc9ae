use std::path::{Path, PathBuf};

/// Pipeline stages the results tree is partitioned by. Each gene's artifact
/// for a stage lives at `<results>/<stage dir>/<gene>_<stage>.<ext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Raw acquisition output, consumed by the external clustering tool
    Sequences,
    /// Clustered representatives, input to the aligner
    Clusters,
    /// Curated alignment, read back during reconciliation and joining
    Aligned,
    /// Inferred gene tree from the external tree tool
    Tree,
}

impl Stage {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Stage::Sequences => "sequences",
            Stage::Clusters => "clusters",
            Stage::Aligned => "alignments",
            Stage::Tree => "trees",
        }
    }

    pub fn file_tag(&self) -> &'static str {
        match self {
            Stage::Sequences => "sequences",
            Stage::Clusters => "clusters",
            Stage::Aligned => "aligned",
            Stage::Tree => "tree",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Stage::Tree => "tre",
            _ => "fasta",
        }
    }
}

/// Path of a gene's artifact for one stage.
pub fn stage_path(results_dir: &Path, gene: &str, stage: Stage) -> PathBuf {
    results_dir.join(stage.dir_name()).join(format!(
        "{}_{}.{}",
        gene,
        stage.file_tag(),
        stage.extension()
    ))
}

/// Where the sought-set snapshot for a gene is persisted between the fetch
/// and reconcile invocations.
pub fn session_path(results_dir: &Path, gene: &str) -> PathBuf {
    results_dir
        .join(Stage::Sequences.dir_name())
        .join(format!("{gene}_sought.json"))
}
