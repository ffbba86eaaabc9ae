use crate::core::config::Config;
use crate::core::paths::{session_path, stage_path, Stage};
use crate::core::session::AcquisitionSession;
use crate::curation::compare::replacement_worklist;
use crate::curation::extract::ExtractionMode;
use crate::PhylofetchError;
use clap::Args;
use colored::*;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args)]
pub struct ReconcileArgs {
    /// Gene region whose curated file to reconcile
    #[arg(short, long)]
    pub gene: String,

    /// Curated file holds out-of-area (genus-level) records
    #[arg(long)]
    pub outside: bool,

    /// Curated sequence file (defaults to the gene's alignment stage path)
    #[arg(long, value_name = "FILE")]
    pub curated: Option<PathBuf>,

    /// Also write the worklist to a file, one taxon per line
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Root of the results tree (defaults to the configured directory)
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: ReconcileArgs) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let results_dir = args
        .results_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.results_dir));

    let snapshot = session_path(&results_dir, &args.gene);
    let session = AcquisitionSession::load(&snapshot)?;
    if session.gene != args.gene {
        return Err(PhylofetchError::Config(format!(
            "sought snapshot {} is for gene {}, not {}",
            snapshot.display(),
            session.gene,
            args.gene
        ))
        .into());
    }

    let curated = args
        .curated
        .clone()
        .unwrap_or_else(|| stage_path(&results_dir, &args.gene, Stage::Aligned));
    let mode = if args.outside {
        ExtractionMode::OutsideArea
    } else {
        ExtractionMode::InArea
    };

    let worklist = replacement_worklist(&session, &curated, mode)?;

    if worklist.is_empty() {
        println!(
            "{} every sought taxon survived curation of {}",
            "Done:".green().bold(),
            curated.display()
        );
        return Ok(());
    }

    for taxon in &worklist {
        println!("{taxon}");
    }
    if let Some(path) = &args.output {
        let mut file = std::fs::File::create(path)?;
        for taxon in &worklist {
            writeln!(file, "{taxon}")?;
        }
        println!(
            "{} {} taxa -> {}",
            "Worklist".green().bold(),
            worklist.len(),
            path.display()
        );
    }
    println!(
        "{} re-run `phylofetch fetch --gene {} --replace --rank {}` with this worklist",
        "Next:".cyan().bold(),
        args.gene,
        session.rank + 2
    );
    Ok(())
}
