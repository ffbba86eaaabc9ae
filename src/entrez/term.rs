use crate::{PhylofetchError, Result};

/// One Entrez nucleotide query: gene region, taxon, optional inclusive
/// sequence-length range. Serializes to the bracketed field syntax the
/// esearch endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub gene: String,
    pub taxon: String,
    pub length_range: Option<String>,
}

impl SearchTerm {
    pub fn new(
        taxon: impl Into<String>,
        gene: impl Into<String>,
        length_range: Option<String>,
    ) -> Result<Self> {
        let gene = gene.into();
        if gene.trim().is_empty() {
            return Err(PhylofetchError::Config(
                "no gene region given for search term".to_string(),
            ));
        }
        if let Some(range) = &length_range {
            if !is_length_range(range) {
                return Err(PhylofetchError::Config(format!(
                    "length range must look like 500:5000, got '{range}'"
                )));
            }
        }
        Ok(SearchTerm {
            gene,
            taxon: taxon.into(),
            length_range,
        })
    }

    /// Render the query string: `GENE[GENE] AND Taxon[PORG]`, with
    /// ` AND lo:hi[SLEN]` appended when a length range was given.
    pub fn to_query(&self) -> String {
        let mut query = format!("{}[GENE] AND {}[PORG]", self.gene, self.taxon);
        if let Some(range) = &self.length_range {
            query.push_str(&format!(" AND {range}[SLEN]"));
        }
        query
    }
}

fn is_length_range(range: &str) -> bool {
    match range.split_once(':') {
        Some((lo, hi)) => {
            !lo.is_empty()
                && !hi.is_empty()
                && lo.chars().all(|c| c.is_ascii_digit())
                && hi.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
