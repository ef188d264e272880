//! Error taxonomy shared by the loader, store, query, and search layers.
//!
//! `StoreError` is deliberately not defined here: it lives in
//! `transcript-store` next to the `rusqlite`/`io` conversions it wraps, so
//! this crate stays free of a database dependency. Everything here is a
//! condition the core itself can raise without touching the store.

use thiserror::Error;

/// Errors raised while loading or interpreting a single transcript file.
///
/// Per-file: logged and skipped by the build pipeline, never fatal to the
/// overall build.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unrecognised transcript structure in {path}: expected an object with a \"segments\" array or a bare array")]
    UnrecognisedShape { path: String },

    #[error("segment {index} in {path} is missing required field \"{field}\"")]
    MissingField {
        path: String,
        index: usize,
        field: &'static str,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A requested entity (document, uuid, segment, offset) does not exist.
/// Recoverable — callers decide how to surface it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    #[error("document {0} not found")]
    Document(i64),

    #[error("document with uuid {0} not found")]
    Uuid(String),

    #[error("no segment at offset {offset} in document {doc_id}")]
    SegmentAtOffset { doc_id: i64, offset: i64 },

    #[error("segment {seg_idx} not found in document {doc_id}")]
    SegmentById { doc_id: i64, seg_idx: i64 },
}

/// An invalid user-supplied regular expression in `regex` mode.
///
/// Always caught by the query/search layer and turned into an empty result
/// set — never propagated to the caller as a hard error.
#[derive(Error, Debug, Clone)]
#[error("invalid pattern: {0}")]
pub struct PatternError(pub String);

/// Grab-bag error for the parts of the core that don't fit the categories
/// above (episode-path parsing edge cases, etc).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
