//! Builds a verification regex that tolerates punctuation inside and
//! between words — handles Hebrew's gershayim/geresh (`צה״ל`, `ג׳ון`) and
//! ASCII cases like `"1,000"` matching a query of `"1000"`.

use regex::escape;

/// `query` is split on whitespace into tokens; each token's characters are
/// interleaved with an optional Unicode-punctuation class, and tokens are
/// joined by a required punctuation-or-whitespace run. `word_boundary`
/// wraps the whole pattern in `\b…\b` (used by exact mode; partial mode
/// leaves it off so interior matches are found too).
pub fn build_ignore_punct_pattern(query: &str, word_boundary: bool) -> String {
    let token_patterns: Vec<String> = query
        .split_whitespace()
        .filter_map(|token| {
            let char_patterns: Vec<String> = token.chars().map(|c| escape(&c.to_string())).collect();
            if char_patterns.is_empty() {
                None
            } else {
                Some(char_patterns.join(r"[\p{P}]*"))
            }
        })
        .collect();

    if token_patterns.is_empty() {
        return String::new();
    }

    let pattern = token_patterns.join(r"[\p{P}\s]+");
    if word_boundary {
        format!(r"\b{pattern}\b")
    } else {
        pattern
    }
}
