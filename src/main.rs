use clap::Parser;
use colored::*;
use phylofetch::cli::{Cli, Commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize logging with PHYLOFETCH_LOG environment variable support;
    // repeated -v flags override the default level
    let log_level = match cli.verbose {
        0 => std::env::var("PHYLOFETCH_LOG").unwrap_or_else(|_| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<phylofetch::PhylofetchError>() {
            Some(phylofetch::PhylofetchError::Config(_)) => 2,
            Some(phylofetch::PhylofetchError::Io(_)) => 3,
            Some(phylofetch::PhylofetchError::Parse(_))
            | Some(phylofetch::PhylofetchError::Curation { .. }) => 4,
            Some(phylofetch::PhylofetchError::Http(_))
            | Some(phylofetch::PhylofetchError::NoResults) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Fetch(args) => phylofetch::cli::commands::fetch::run(args),
        Commands::Reconcile(args) => phylofetch::cli::commands::reconcile::run(args),
        Commands::Join(args) => phylofetch::cli::commands::join::run(args),
        Commands::Genera(args) => phylofetch::cli::commands::genera::run(args),
    }
}
