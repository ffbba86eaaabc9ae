pub mod fasta;
pub mod record;

pub use fasta::LabelConfig;
pub use record::{SequenceRecord, Taxon};
