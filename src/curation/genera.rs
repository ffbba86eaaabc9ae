use crate::core::config::TableConfig;
use crate::curation::table::MasterTable;
use crate::Result;
use std::collections::BTreeMap;

/// Per-genus sequence-presence summary across the inspected gene columns.
/// Derived on demand from the joined master table, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenusAggregate {
    pub genus: String,
    /// In-area species rows for the genus
    pub species_count: usize,
    /// Non-missing accession cells across all inspected genes
    pub present_count: usize,
}

/// Aggregate sequence presence by genus over the given gene columns.
pub fn aggregate_genera(
    table: &MasterTable,
    gene_columns: &[String],
    table_config: &TableConfig,
) -> Result<Vec<GenusAggregate>> {
    let genus_idx = table.require_column(&table_config.genus_column)?;
    let gene_indices = gene_columns
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>>>()?;

    let mut by_genus: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for row in 0..table.len() {
        let genus = table.cell(row, genus_idx).to_string();
        if genus.is_empty() {
            continue;
        }
        let present = gene_indices
            .iter()
            .filter(|&&col| !table.cell(row, col).trim().is_empty())
            .count();
        let entry = by_genus.entry(genus).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += present;
    }

    Ok(by_genus
        .into_iter()
        .map(|(genus, (species_count, present_count))| GenusAggregate {
            genus,
            species_count,
            present_count,
        })
        .collect())
}

/// Genera with no retrieved sequence in any inspected gene and fewer than
/// three in-area species: candidates for an out-of-area search round.
pub fn underrepresented_genera(
    table: &MasterTable,
    gene_columns: &[String],
    table_config: &TableConfig,
) -> Result<Vec<String>> {
    Ok(aggregate_genera(table, gene_columns, table_config)?
        .into_iter()
        .filter(|agg| agg.present_count == 0 && agg.species_count < 3)
        .map(|agg| agg.genus)
        .collect())
}
