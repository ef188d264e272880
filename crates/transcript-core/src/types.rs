//! Domain types: documents, segments, hits, query modes, and position labels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable per-document identifier, assigned by the loader at build time and
/// never reused or reassigned afterwards.
pub type DocId = i64;

/// Zero-based, dense segment index within a document.
pub type SegIdx = i64;

/// A single loaded transcript file's metadata, without its segment rows or
/// full text (those live in `LoadedDocument`/the store).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentInfo {
    pub doc_id: DocId,
    pub uuid: String,
    pub source: String,
    pub episode: String,
    pub episode_date: Option<String>,
    pub episode_title: String,
}

/// One timestamped sub-unit of a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentRecord {
    pub doc_id: DocId,
    pub segment_id: SegIdx,
    pub text: String,
    pub avg_logprob: f64,
    pub char_offset: i64,
    pub start_time: f64,
    pub end_time: f64,
}

/// A `(doc_id, char_offset)` match position produced by the query planner,
/// before segment/document enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hit {
    pub doc_id: DocId,
    pub char_offset: i64,
}

/// A fully enriched hit, as returned across the external service boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedHit {
    pub doc_id: DocId,
    pub char_offset: i64,
    pub segment_id: SegIdx,
    pub start_sec: f64,
    pub end_sec: f64,
    pub text: String,
    pub source: String,
    pub episode: String,
    pub episode_title: String,
    pub episode_date: Option<String>,
    pub uuid: String,
}

/// Search mode, dispatched on the tag rather than compared as a string
/// anywhere in the query planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Exact,
    Partial,
    Regex,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Exact => "exact",
            Mode::Partial => "partial",
            Mode::Regex => "regex",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Mode::Exact),
            "partial" => Ok(Mode::Partial),
            "regex" => Ok(Mode::Regex),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

/// Where a hit falls relative to its containing segment's word boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionLabel {
    Start,
    End,
    Cross,
}

impl fmt::Display for PositionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PositionLabel::Start => "start",
            PositionLabel::End => "end",
            PositionLabel::Cross => "cross",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PositionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(PositionLabel::Start),
            "end" => Ok(PositionLabel::End),
            "cross" => Ok(PositionLabel::Cross),
            other => Err(format!("unknown position label: {other}")),
        }
    }
}

/// The label set a single hit is classified into. A `BTreeSet` keeps
/// iteration order deterministic, which matters for tests that assert on
/// the rendered set.
pub type PositionSet = BTreeSet<PositionLabel>;

/// Filters layered into a search request's candidate SELECT.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sources: Vec<String>,
    pub ignore_punct: bool,
    pub position_filters: Option<PositionSet>,
}
