//! CLI command implementations — thin glue over the core crates.

pub mod build;
pub mod doctor;
pub mod info;
pub mod search;
pub mod segment;
