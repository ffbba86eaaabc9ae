use crate::{PhylofetchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Explicit record of which taxa the most recent acquisition round for a
/// gene actually resolved. Written at the end of an initial round and read
/// back by reconciliation; replacement and outside rounds leave the stored
/// snapshot untouched so the original worklist stays the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionSession {
    pub gene: String,
    pub sought: BTreeSet<String>,
    /// esearch result rank the round selected (0-based)
    pub rank: usize,
    pub recorded_at: DateTime<Utc>,
}

impl AcquisitionSession {
    pub fn new(gene: impl Into<String>, sought: BTreeSet<String>, rank: usize) -> Self {
        AcquisitionSession {
            gene: gene.into(),
            sought,
            rank,
            recorded_at: Utc::now(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PhylofetchError::Parse(format!("session {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PhylofetchError::Other(format!("session serialize: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atpB_sought.json");

        let sought: BTreeSet<String> = ["Hydrocleys_martii", "Sagittaria_montevidensis"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let session = AcquisitionSession::new("atpB", sought, 0);
        session.save(&path).unwrap();

        let loaded = AcquisitionSession::load(&path).unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_garbled_session_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atpB_sought.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            AcquisitionSession::load(&path),
            Err(PhylofetchError::Parse(_))
        ));
    }
}
