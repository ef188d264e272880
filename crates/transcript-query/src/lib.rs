//! Query planning, hit extraction, and position classification — everything
//! between "a user typed a query" and "a list of (doc_id, char_offset) hits".
//!
//! Nothing in this crate touches the store: candidate full texts are handed
//! in by the caller (the Search Service), and boundaries are handed in for
//! position filtering. That keeps the planner and classifier pure and
//! directly unit-testable.

pub mod extract;
pub mod ignore_punct;
pub mod planner;
pub mod position;
pub mod regex_cache;
pub mod tokens;

pub use extract::extract_hits;
pub use ignore_punct::build_ignore_punct_pattern;
pub use planner::{build_plan, Candidates, QueryPlan};
pub use position::classify_hit_position;
pub use regex_cache::cached_plan;
pub use tokens::extract_fts5_tokens;
