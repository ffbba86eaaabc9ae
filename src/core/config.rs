use crate::bio::fasta::LabelConfig;
use crate::{PhylofetchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub entrez: EntrezConfig,
    pub output: OutputConfig,
    pub table: TableConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrezConfig {
    /// Override for the eutils endpoint root (mirrors, test servers)
    pub base_url: Option<String>,
    /// Entrez database to search and fetch from
    pub database: String,
    /// Minimum wall-clock gap between remote calls, in milliseconds
    pub min_interval_ms: u64,
    /// esearch result cap per term
    pub max_results: usize,
    /// Contact address passed through to NCBI
    pub email: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root of the per-gene results tree
    pub results_dir: String,
    /// Default label fields for written FASTA files
    pub label: LabelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub combination_column: String,
    pub family_column: String,
    pub genus_column: String,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        EntrezConfig {
            base_url: None,
            database: "nucleotide".to_string(),
            min_interval_ms: crate::entrez::client::DEFAULT_MIN_INTERVAL.as_millis() as u64,
            max_results: 10,
            email: None,
            api_key: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            results_dir: "results".to_string(),
            label: LabelConfig::default(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            combination_column: "combination".to_string(),
            family_column: "family".to_string(),
            genus_column: "genus".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| PhylofetchError::Config(format!("{}: {e}", path.display())))
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Config::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.entrez.database, "nucleotide");
        assert_eq!(config.entrez.min_interval_ms, 340);
        assert_eq!(config.output.results_dir, "results");
        assert_eq!(config.table.combination_column, "combination");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phylofetch.toml");
        std::fs::write(
            &path,
            "[entrez]\nemail = \"someone@example.org\"\nmax_results = 25\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.entrez.email.as_deref(), Some("someone@example.org"));
        assert_eq!(config.entrez.max_results, 25);
        assert_eq!(config.entrez.min_interval_ms, 340);
    }

    #[test]
    fn test_bad_toml_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phylofetch.toml");
        std::fs::write(&path, "entrez = 7\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(PhylofetchError::Config(_))
        ));
    }
}
