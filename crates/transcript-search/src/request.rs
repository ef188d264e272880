use transcript_core::types::{Mode, PositionSet};

/// Everything `SearchService::search` needs; mirrors the external service
/// contract's `search(q, mode, date_from?, date_to?, sources?, ignore_punct,
/// position_filters?)` plus the ambient `limit`/`offset` pagination pair.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub mode: Mode,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sources: Vec<String>,
    pub ignore_punct: bool,
    pub position_filters: Option<PositionSet>,
    /// `None` means an unlimited page (spec.md's "returns the full hit list
    /// for the requested page" default).
    pub limit: Option<usize>,
    pub offset: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, mode: Mode) -> Self {
        Self {
            query: query.into(),
            mode,
            date_from: None,
            date_to: None,
            sources: Vec::new(),
            ignore_punct: false,
            position_filters: None,
            limit: None,
            offset: 0,
        }
    }
}
