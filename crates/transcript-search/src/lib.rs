//! The Search Service: the single entry point that ties the query planner,
//! the Index Store, and the position classifier together behind
//! `search()`/`segment()`.

pub mod error;
pub mod request;
pub mod service;

pub use error::SearchError;
pub use request::SearchRequest;
pub use service::{SearchOutcome, SearchService};
