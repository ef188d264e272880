//! transcript-indexer — the Bulk Writer: a one-shot pipeline that turns a
//! corpus directory of transcript JSON files into a complete, queryable
//! store.
//!
//! Parsing is fanned out across a worker pool; exactly one thread ever
//! touches the store, matching the single-writer rule the query/search
//! layers rely on.

pub mod error;
pub mod pipeline;

pub use error::IndexerError;
pub use pipeline::{build_index, BuildOptions, BuildOutcome};
