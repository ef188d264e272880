//! Episode path parsing.
//!
//! `episode_str` looks like `"{source}/YYYY.MM.DD {title}"` or
//! `"{source}/YYYY-MM-DD {title}"`; the leaf component (after the last `/`)
//! carries an optional leading date followed by a free-form title.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn leaf_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<date>\d{4}[.\-]\d{2}[.\-]\d{2})\s*(?P<title>.*)$").unwrap()
    })
}

/// Split an episode path's leaf into `(episode_date, episode_title)`.
///
/// Returns `(None, leaf)` when the leaf has no parseable leading date —
/// the whole leaf becomes the title in that case.
pub fn split_episode(episode_str: &str) -> (Option<String>, String) {
    let leaf = episode_str
        .rsplit('/')
        .next()
        .unwrap_or(episode_str)
        .trim();

    let Some(caps) = leaf_pattern().captures(leaf) else {
        return (None, leaf.to_string());
    };

    let raw_date = caps["date"].replace(['.'], "-");
    let iso_date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string());

    let title = caps["title"].trim().to_string();
    (iso_date, title)
}

/// Everything before the last `/` of the episode path; empty if there is no
/// `/` separator.
pub fn source_of(episode_str: &str) -> String {
    match episode_str.rsplit_once('/') {
        Some((source, _leaf)) => source.to_string(),
        None => String::new(),
    }
}
