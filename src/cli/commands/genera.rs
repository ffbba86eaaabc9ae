use crate::core::config::Config;
use crate::curation::genera::underrepresented_genera;
use crate::curation::table::MasterTable;
use crate::PhylofetchError;
use clap::Args;
use colored::*;
use std::path::PathBuf;

#[derive(Args)]
pub struct GeneraArgs {
    /// Joined master taxon table (CSV)
    #[arg(short, long, value_name = "FILE")]
    pub table: PathBuf,

    /// Gene columns to inspect, comma-separated (e.g. atpB,rbcL)
    #[arg(long, value_delimiter = ',', conflicts_with = "gene_count")]
    pub genes: Option<Vec<String>>,

    /// Inspect the last N table columns as gene columns
    #[arg(long, value_name = "N")]
    pub gene_count: Option<usize>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: GeneraArgs) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let table = MasterTable::load(&args.table)?;

    let gene_columns: Vec<String> = match (&args.genes, args.gene_count) {
        (Some(genes), None) => genes.clone(),
        (None, Some(count)) => {
            let headers = table.headers();
            if count == 0 || count > headers.len() {
                return Err(PhylofetchError::Config(format!(
                    "--gene-count {count} does not fit a table with {} columns",
                    headers.len()
                ))
                .into());
            }
            headers[headers.len() - count..].to_vec()
        }
        _ => {
            return Err(PhylofetchError::Config(
                "give exactly one of --genes or --gene-count".to_string(),
            )
            .into())
        }
    };

    let selected = underrepresented_genera(&table, &gene_columns, &config.table)?;

    if selected.is_empty() {
        println!(
            "{} every genus has a sequence or enough in-area species",
            "Done:".green().bold()
        );
        return Ok(());
    }
    for genus in &selected {
        println!("{genus}");
    }
    println!(
        "{} {} genera with no sequence across {} gene(s); search them outside the study area",
        "Candidates:".cyan().bold(),
        selected.len(),
        gene_columns.len()
    );
    Ok(())
}
