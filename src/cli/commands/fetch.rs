use crate::bio::fasta;
use crate::bio::record::Taxon;
use crate::core::acquire::{run_round, RoundMode, RoundOptions};
use crate::core::config::Config;
use crate::core::paths::{session_path, stage_path, Stage};
use crate::curation::table::MasterTable;
use crate::entrez::client::EntrezClient;
use crate::PhylofetchError;
use clap::Args;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct FetchArgs {
    /// Gene region to search (e.g. atpB, rbcL)
    #[arg(short, long)]
    pub gene: String,

    /// File with one taxon per line (a reconcile worklist works here)
    #[arg(short, long, value_name = "FILE", conflicts_with = "table")]
    pub taxa: Option<PathBuf>,

    /// Master taxon table; taxa are read from its combination column
    #[arg(long, value_name = "FILE")]
    pub table: Option<PathBuf>,

    /// Inclusive sequence-length bound, e.g. 500:5000
    #[arg(short, long, value_name = "LO:HI")]
    pub length: Option<String>,

    /// Which esearch hit to take per taxon (1 = first); bump on replacement
    /// rounds to skip previously rejected records
    #[arg(short, long, default_value = "1")]
    pub rank: usize,

    /// esearch result cap per term (defaults to the configured value)
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Replacement round: append to the gene file, keep the sought snapshot
    #[arg(long)]
    pub replace: bool,

    /// Out-of-area round: genus-level labels, append, keep the snapshot
    #[arg(long, conflicts_with = "replace")]
    pub outside: bool,

    /// Mark records as genus-level composite placeholders
    #[arg(long)]
    pub composite: bool,

    /// Root of the results tree (defaults to the configured directory)
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Write the FASTA somewhere other than the standard stage path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: FetchArgs) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let results_dir = args
        .results_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.results_dir));

    let taxa = load_taxa(&args, &config)?;
    if taxa.is_empty() {
        return Err(PhylofetchError::Config("no taxa to search for".to_string()).into());
    }

    let mode = if args.outside {
        RoundMode::OutsideArea
    } else if args.replace {
        RoundMode::Replacement
    } else {
        RoundMode::Initial
    };
    if args.rank == 0 {
        return Err(PhylofetchError::Config("rank counts from 1".to_string()).into());
    }

    let mut label = config.output.label;
    if args.composite {
        label.composite_marker = true;
        label.combination = false;
        label.genus = true;
    }
    if args.outside {
        label.outside_marker = true;
        label.combination = false;
        label.genus = true;
    }
    // Surface a bad label selection before the first remote call
    label.validate()?;

    let options = RoundOptions {
        gene: args.gene.clone(),
        length_range: args.length.clone(),
        rank: args.rank - 1,
        max_results: args.max_results.unwrap_or(config.entrez.max_results),
        mode,
        // Genus-only labels read back as genera, so the sought set has to
        // hold genera too or reconciliation never clears them
        genus_level: label.genus && !label.combination,
    };

    let mut client = EntrezClient::new(&config.entrez)?;

    // The full batch runs for minutes at the enforced request interval, so
    // report progress per taxon.
    let bar = ProgressBar::new(taxa.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap(),
    );

    let outcome = run_round(&mut client, &taxa, &options, Some(&bar))?;
    bar.finish_with_message(format!("{} records", outcome.records.len()));

    // A batch of genus-level records without --composite still gets marked,
    // so the curated labels read back as the genera the sought set holds.
    if !outcome.records.is_empty()
        && !label.composite_marker
        && !label.outside_marker
        && outcome.records.iter().all(|r| r.is_composite())
    {
        label.composite_marker = true;
        label.combination = false;
        label.genus = true;
        println!(
            "{} every record is genus-level; labeling as composite placeholders",
            "Note:".yellow().bold()
        );
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| stage_path(&results_dir, &args.gene, Stage::Sequences));

    if outcome.records.is_empty() {
        println!(
            "{} every identifier failed to fetch or parse; nothing written",
            "Warning:".yellow().bold()
        );
    } else {
        fasta::write_fasta(&output, &outcome.records, &label, options.mode.appends())?;
        println!(
            "{} {} records -> {}",
            "Wrote".green().bold(),
            outcome.records.len(),
            output.display()
        );
    }

    if !options.mode.preserves_session() {
        let snapshot = session_path(&results_dir, &args.gene);
        outcome.session.save(&snapshot)?;
        println!(
            "{} {} sought taxa -> {}",
            "Recorded".green().bold(),
            outcome.session.sought.len(),
            snapshot.display()
        );
    }

    if !outcome.skipped.is_empty() {
        println!(
            "{} {} taxa contributed no record",
            "Skipped".yellow().bold(),
            outcome.skipped.len()
        );
    }
    Ok(())
}

fn load_taxa(args: &FetchArgs, config: &Config) -> anyhow::Result<Vec<Taxon>> {
    match (&args.taxa, &args.table) {
        (Some(path), None) => {
            let content = std::fs::read_to_string(path)?;
            Ok(content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(Taxon::new)
                .collect())
        }
        (None, Some(path)) => {
            let table = MasterTable::load(path)?;
            let col = table.require_column(&config.table.combination_column)?;
            Ok((0..table.len())
                .map(|row| table.cell(row, col))
                .filter(|name| !name.is_empty())
                .map(Taxon::new)
                .collect())
        }
        _ => Err(
            PhylofetchError::Config("give exactly one of --taxa or --table".to_string()).into(),
        ),
    }
}
