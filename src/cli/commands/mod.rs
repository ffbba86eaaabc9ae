pub mod fetch;
pub mod genera;
pub mod join;
pub mod reconcile;
