//! FTS5-safe token extraction.
//!
//! FTS5 treats `-`, `+`, `*`, and quotes as operators, so an unsanitised
//! query embedded directly in a MATCH expression is a syntax error waiting
//! to happen. Splitting on non-word runs keeps only the alphanumeric
//! pieces, e.g. `"בית־ספר"` becomes `["בית", "ספר"]`.

use regex::Regex;
use std::sync::OnceLock;

fn splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w]+").unwrap())
}

pub fn extract_fts5_tokens(query: &str) -> Vec<String> {
    splitter()
        .split(query)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_maqaf() {
        assert_eq!(extract_fts5_tokens("בית־ספר"), vec!["בית", "ספר"]);
    }

    #[test]
    fn splits_on_gershayim() {
        assert_eq!(extract_fts5_tokens("צה״ל"), vec!["צה", "ל"]);
    }

    #[test]
    fn splits_on_ascii_punctuation() {
        assert_eq!(extract_fts5_tokens("hello-world!"), vec!["hello", "world"]);
    }

    #[test]
    fn punctuation_only_query_has_no_tokens() {
        assert!(extract_fts5_tokens("…״׳").is_empty());
    }

    #[test]
    fn empty_query_has_no_tokens() {
        assert!(extract_fts5_tokens("").is_empty());
    }
}
