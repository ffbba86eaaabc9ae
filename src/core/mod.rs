pub mod acquire;
pub mod config;
pub mod paths;
pub mod session;
