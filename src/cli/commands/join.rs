use crate::core::config::Config;
use crate::core::paths::{stage_path, Stage};
use crate::curation::join::join_gene;
use crate::curation::table::MasterTable;
use clap::Args;
use colored::*;
use std::path::PathBuf;

#[derive(Args)]
pub struct JoinArgs {
    /// Master taxon table (CSV)
    #[arg(short, long, value_name = "FILE")]
    pub table: PathBuf,

    /// Gene region whose alignment to join; names the new column
    #[arg(short, long)]
    pub gene: String,

    /// Finalized alignment file (defaults to the gene's alignment stage path)
    #[arg(long, value_name = "FILE")]
    pub aligned: Option<PathBuf>,

    /// Write the joined table here instead of updating in place
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Root of the results tree (defaults to the configured directory)
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: JoinArgs) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let results_dir = args
        .results_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.results_dir));
    let aligned = args
        .aligned
        .clone()
        .unwrap_or_else(|| stage_path(&results_dir, &args.gene, Stage::Aligned));

    let mut table = MasterTable::load(&args.table)?;
    let joined = join_gene(&mut table, &args.gene, &aligned, &config.table)?;

    let output = args.output.clone().unwrap_or_else(|| args.table.clone());
    table.save(&output)?;

    println!(
        "{} {} of {} rows carry a {} accession -> {}",
        "Joined".green().bold(),
        joined,
        table.len(),
        args.gene,
        output.display()
    );
    Ok(())
}
