pub mod bio;
pub mod cli;
pub mod core;
pub mod curation;
pub mod entrez;

pub use crate::core::session::AcquisitionSession;
pub use crate::entrez::client::EntrezClient;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhylofetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("no sequence identifiers found for any search term")]
    NoResults,

    #[error("malformed curated file {path}: {reason}")]
    Curation { path: PathBuf, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PhylofetchError>;
