pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "phylofetch",
    version,
    about = "Rate-limited GenBank barcode acquisition and taxon curation",
    long_about = "Phylofetch builds Entrez queries for a plant taxon list, fetches nucleotide \
                  records one at a time under the NCBI request ceiling, writes per-gene FASTA \
                  files for external clustering/alignment/tree tools, and reconciles sought vs. \
                  retained taxa across manual curation rounds."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one acquisition round for a gene region
    Fetch(commands::fetch::FetchArgs),

    /// Compare the sought set against a curated file and emit the replacement worklist
    Reconcile(commands::reconcile::ReconcileArgs),

    /// Join retained accessions from a finalized alignment onto the master table
    Join(commands::join::JoinArgs),

    /// List under-represented genera as out-of-area search candidates
    Genera(commands::genera::GeneraArgs),
}
