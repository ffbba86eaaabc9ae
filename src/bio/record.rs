use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Matches a plant family name inside a semicolon-separated lineage string
/// ("Magnoliopsida; Alismatales; Alismataceae; ...").
static FAMILY_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn family_regex() -> &'static Regex {
    FAMILY_RE.get_or_init(|| Regex::new(r"[A-Z][a-z]*aceae").unwrap())
}

/// A named species- or genus-level entry from the study's reference table,
/// in "Genus_species" form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Taxon {
    pub name: String,
}

impl Taxon {
    pub fn new(name: impl Into<String>) -> Self {
        Taxon { name: name.into() }
    }

    pub fn genus(&self) -> &str {
        self.name.split('_').next().unwrap_or(&self.name)
    }

    /// Genus-level placeholder entries carry no species epithet (or only a
    /// "sp." qualifier).
    pub fn is_composite(&self) -> bool {
        match self.name.split('_').nth(1) {
            None => true,
            Some(epithet) => epithet == "sp." || epithet == "sp",
        }
    }
}

impl From<&str> for Taxon {
    fn from(name: &str) -> Self {
        Taxon::new(name)
    }
}

impl std::fmt::Display for Taxon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One fetched nucleotide record, normalized from the GenBank flat format.
///
/// The organism field always has whitespace replaced by underscores;
/// downstream alignment and tree tools truncate labels at whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Accession (falls back to the LOCUS name when no ACCESSION line exists)
    pub accession: String,
    /// Organism name, underscore-normalized ("Hydrocleys_martii")
    pub organism: String,
    /// Lineage string as reported by the record
    pub taxonomy: String,
    /// Raw nucleotide sequence, uppercased
    pub sequence: String,
    /// Declared sequence length
    pub length: usize,
}

impl SequenceRecord {
    pub fn genus(&self) -> &str {
        self.organism.split('_').next().unwrap_or(&self.organism)
    }

    /// Family name extracted from the lineage, when one is present.
    pub fn family(&self) -> Option<&str> {
        family_regex().find(&self.taxonomy).map(|m| m.as_str())
    }

    pub fn is_composite(&self) -> bool {
        Taxon::new(self.organism.clone()).is_composite()
    }
}
