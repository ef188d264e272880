//! transcript-core - shared types and domain logic for the transcript search engine
//!
//! This crate has no knowledge of SQLite, threads, or the CLI. It owns the
//! data model (documents, segments, hits), the query-mode/position-label
//! vocabulary, the episode path parser, and the error taxonomy every other
//! crate builds on.

pub mod episode;
pub mod error;
pub mod types;

pub use episode::split_episode;
pub use error::CoreError;
pub use types::*;
