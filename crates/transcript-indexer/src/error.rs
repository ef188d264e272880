//! Error type for the build pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error(transparent)]
    Store(#[from] transcript_store::StoreError),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("no transcript files found under {0}")]
    EmptyCorpus(PathBuf),
}
