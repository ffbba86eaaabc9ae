pub mod client;
pub mod record;
pub mod term;

pub use client::{EntrezClient, HttpTransport, RateGate, Transport};
pub use record::parse_genbank;
pub use term::SearchTerm;
