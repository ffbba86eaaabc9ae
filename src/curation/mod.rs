pub mod compare;
pub mod extract;
pub mod genera;
pub mod join;
pub mod table;

pub use compare::replacement_worklist;
pub use extract::ExtractionMode;
pub use table::MasterTable;
