use crate::bio::record::{SequenceRecord, Taxon};
use crate::core::session::AcquisitionSession;
use crate::curation::extract::ExtractionMode;
use crate::entrez::client::{EntrezClient, Transport};
use crate::entrez::record::parse_genbank;
use crate::entrez::term::SearchTerm;
use crate::{PhylofetchError, Result};
use indicatif::ProgressBar;
use std::collections::BTreeSet;
use tracing::warn;

/// What kind of acquisition round is running. Replacement and outside
/// rounds append to the gene's sequence file and leave the stored sought-set
/// snapshot alone; an initial round truncates and overwrites both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMode {
    Initial,
    Replacement,
    OutsideArea,
}

impl RoundMode {
    pub fn preserves_session(&self) -> bool {
        !matches!(self, RoundMode::Initial)
    }

    pub fn appends(&self) -> bool {
        !matches!(self, RoundMode::Initial)
    }

    pub fn extraction(&self) -> ExtractionMode {
        match self {
            RoundMode::OutsideArea => ExtractionMode::OutsideArea,
            _ => ExtractionMode::InArea,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoundOptions {
    pub gene: String,
    pub length_range: Option<String>,
    /// esearch hit to select per term (0-based); incremented on replacement
    /// rounds to avoid re-selecting a rejected record
    pub rank: usize,
    pub max_results: usize,
    pub mode: RoundMode,
    /// Record bare genera in the sought set instead of full combinations
    /// (composite-placeholder rounds and genus-only label configurations)
    pub genus_level: bool,
}

#[derive(Debug)]
pub struct RoundOutcome {
    pub records: Vec<SequenceRecord>,
    /// Session snapshot for this round (exactly the successfully fetched
    /// taxa); the caller persists it only for initial rounds
    pub session: AcquisitionSession,
    /// Taxa that contributed no record, with the reason
    pub skipped: Vec<(String, String)>,
}

/// One acquisition round: per taxon, a gated identifier search followed by a
/// gated record fetch and parse. Individual failures are logged skips; zero
/// identifiers across the whole batch is fatal and nothing is returned.
pub fn run_round<T: Transport>(
    client: &mut EntrezClient<T>,
    taxa: &[Taxon],
    options: &RoundOptions,
    progress: Option<&ProgressBar>,
) -> Result<RoundOutcome> {
    // Build every term up front so a configuration problem aborts before
    // the first remote call.
    let terms = taxa
        .iter()
        .map(|taxon| SearchTerm::new(&taxon.name, &options.gene, options.length_range.clone()))
        .collect::<Result<Vec<_>>>()?;

    let extraction = options.mode.extraction();
    let mut records = Vec::new();
    let mut sought = BTreeSet::new();
    let mut skipped = Vec::new();
    let mut identifiers_seen = 0usize;

    for (taxon, term) in taxa.iter().zip(&terms) {
        if let Some(bar) = progress {
            bar.set_message(taxon.name.clone());
        }

        let uid = match client.search(term, options.rank, options.max_results) {
            Ok(Some(uid)) => {
                identifiers_seen += 1;
                uid
            }
            Ok(None) => {
                warn!(taxon = %taxon.name, rank = options.rank, "no identifier at rank");
                skipped.push((taxon.name.clone(), "no identifier at rank".to_string()));
                tick(progress);
                continue;
            }
            Err(e) => {
                warn!(taxon = %taxon.name, error = %e, "identifier search failed");
                skipped.push((taxon.name.clone(), e.to_string()));
                tick(progress);
                continue;
            }
        };

        let raw = match client.fetch(&uid) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(taxon = %taxon.name, %uid, error = %e, "record fetch failed");
                skipped.push((taxon.name.clone(), e.to_string()));
                tick(progress);
                continue;
            }
        };

        match parse_genbank(&raw) {
            Ok(record) => {
                let sought_id = if options.genus_level {
                    record.genus().to_string()
                } else {
                    extraction.sought_id(&record.organism)
                };
                sought.insert(sought_id);
                records.push(record);
            }
            Err(e) => {
                warn!(taxon = %taxon.name, %uid, error = %e, "record unparseable");
                skipped.push((taxon.name.clone(), e.to_string()));
            }
        }
        tick(progress);
    }

    if identifiers_seen == 0 {
        return Err(PhylofetchError::NoResults);
    }

    Ok(RoundOutcome {
        records,
        session: AcquisitionSession::new(&options.gene, sought, options.rank),
        skipped,
    })
}

fn tick(progress: Option<&ProgressBar>) {
    if let Some(bar) = progress {
        bar.inc(1);
    }
}
