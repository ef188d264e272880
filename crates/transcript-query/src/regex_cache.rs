//! Process-wide cache of compiled query plans.
//!
//! Regex compilation is the expensive part of planning; a search UI that
//! re-issues the same query across paginated requests (or repeats a recent
//! query) shouldn't pay for it twice.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use transcript_core::types::Mode;

use crate::planner::{build_plan, QueryPlan};

type CacheKey = (Mode, String, bool);

fn cache() -> &'static Mutex<HashMap<CacheKey, QueryPlan>> {
    static CACHE: OnceLock<Mutex<HashMap<CacheKey, QueryPlan>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Build (or fetch) the plan for `(mode, query, ignore_punct)`.
pub fn cached_plan(mode: Mode, query: &str, ignore_punct: bool) -> QueryPlan {
    let key = (mode, query.to_string(), ignore_punct);

    let mut guard = cache().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(plan) = guard.get(&key) {
        return plan.clone();
    }

    let plan = build_plan(mode, query, ignore_punct);
    guard.insert(key, plan.clone());
    plan
}
