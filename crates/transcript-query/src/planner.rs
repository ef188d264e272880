//! Turns a `(mode, query, ignore_punct)` request into a candidate-narrowing
//! full-text filter plus a verification regex, one strategy per `Mode`.

use std::sync::OnceLock;

use regex::Regex;
use transcript_core::types::Mode;

use crate::ignore_punct::build_ignore_punct_pattern;
use crate::tokens::extract_fts5_tokens;

/// How a plan wants its candidates fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidates {
    /// An FTS5 MATCH expression that narrows the candidate set.
    Filtered(String),
    /// No usable token for the filter — scan every document.
    FullScan,
    /// No tokens and no fallback applies (exact mode) — zero hits, the
    /// store is never even queried.
    Empty,
}

#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub candidates: Candidates,
    /// `None` only happens for an invalid user regex in `Mode::Regex`,
    /// where the contract is zero hits rather than a propagated error.
    pub verify: Option<Regex>,
}

impl QueryPlan {
    pub fn is_empty(&self) -> bool {
        matches!(self.candidates, Candidates::Empty) || self.verify.is_none()
    }
}

pub fn build_plan(mode: Mode, query: &str, ignore_punct: bool) -> QueryPlan {
    match mode {
        Mode::Exact => build_exact_plan(query, ignore_punct),
        Mode::Partial => build_partial_plan(query, ignore_punct),
        Mode::Regex => build_regex_plan(query),
    }
}

fn build_exact_plan(query: &str, ignore_punct: bool) -> QueryPlan {
    let tokens = extract_fts5_tokens(query);
    if tokens.is_empty() {
        return QueryPlan { candidates: Candidates::Empty, verify: None };
    }

    let fts_query = format!("\"{}\"", tokens.join(" "));
    let pattern = if ignore_punct {
        build_ignore_punct_pattern(query, true)
    } else {
        format!(r"\b{}\b", regex::escape(query))
    };

    QueryPlan {
        candidates: Candidates::Filtered(fts_query),
        verify: compile_verify(&pattern),
    }
}

fn build_partial_plan(query: &str, ignore_punct: bool) -> QueryPlan {
    let tokens = extract_fts5_tokens(query);
    let candidates = if tokens.is_empty() {
        Candidates::FullScan
    } else {
        Candidates::Filtered(
            tokens
                .iter()
                .map(|t| format!("{t}*"))
                .collect::<Vec<_>>()
                .join(" OR "),
        )
    };

    let pattern = if ignore_punct {
        build_ignore_punct_pattern(query, false)
    } else {
        regex::escape(query)
    };

    QueryPlan { candidates, verify: compile_verify(&pattern) }
}

fn build_regex_plan(query: &str) -> QueryPlan {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    let token_re = TOKEN_RE.get_or_init(|| Regex::new(r"\w{2,}").unwrap());

    let candidates = match token_re.find(query) {
        Some(m) => Candidates::Filtered(format!("{}*", &query[m.range()])),
        None => Candidates::FullScan,
    };

    let verify = match Regex::new(query) {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!(pattern = query, error = %err, "invalid regex pattern, yielding zero hits");
            None
        }
    };

    QueryPlan { candidates, verify }
}

fn compile_verify(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    Regex::new(pattern).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_mode_builds_phrase_query() {
        let plan = build_plan(Mode::Exact, "hello world", false);
        assert_eq!(plan.candidates, Candidates::Filtered("\"hello world\"".to_string()));
        assert!(plan.verify.unwrap().is_match("say hello world now"));
    }

    #[test]
    fn exact_mode_with_no_tokens_is_empty() {
        let plan = build_plan(Mode::Exact, "...", false);
        assert!(plan.is_empty());
        assert_eq!(plan.candidates, Candidates::Empty);
    }

    #[test]
    fn partial_mode_builds_prefix_or_query() {
        let plan = build_plan(Mode::Partial, "foo bar", false);
        assert_eq!(plan.candidates, Candidates::Filtered("foo* OR bar*".to_string()));
    }

    #[test]
    fn partial_mode_with_no_tokens_falls_back_to_full_scan() {
        let plan = build_plan(Mode::Partial, "...", false);
        assert_eq!(plan.candidates, Candidates::FullScan);
        assert!(plan.is_empty());
    }

    #[test]
    fn regex_mode_extracts_first_long_token_as_filter() {
        let plan = build_plan(Mode::Regex, r"\d+ hello\w*", false);
        assert_eq!(plan.candidates, Candidates::Filtered("hello*".to_string()));
    }

    #[test]
    fn regex_mode_with_no_long_token_is_full_scan() {
        let plan = build_plan(Mode::Regex, r"\d", false);
        assert_eq!(plan.candidates, Candidates::FullScan);
    }

    #[test]
    fn invalid_regex_yields_empty_plan_not_a_panic() {
        let plan = build_plan(Mode::Regex, "(unterminated", false);
        assert!(plan.is_empty());
        assert!(plan.verify.is_none());
    }

    #[test]
    fn exact_mode_ignore_punct_builds_interleaved_pattern() {
        let plan = build_plan(Mode::Exact, "צהל", true);
        assert!(plan.verify.unwrap().is_match("צה״ל"));
    }
}
