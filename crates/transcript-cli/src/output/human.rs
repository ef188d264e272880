//! Human-readable rendering of search results and segments.

use colored::Colorize;
use transcript_core::types::{EnrichedHit, SegmentRecord};

use super::colors;

pub fn format_hit(hit: &EnrichedHit, query: &str) -> String {
    let location = format!(
        "{} / {} ({})",
        hit.source,
        hit.episode_title,
        hit.episode_date.as_deref().unwrap_or("undated")
    );
    let timing = format!("[{:.1}s-{:.1}s]", hit.start_sec, hit.end_sec);
    format!(
        "{}\n  {} seg {} {}\n  {}",
        colors::label(&location),
        timing,
        hit.segment_id,
        format!("doc {} @ {}", hit.doc_id, hit.char_offset).dimmed(),
        highlight_query(&hit.text, query),
    )
}

pub fn format_segment(seg: &SegmentRecord) -> String {
    format!(
        "  [{:.1}s-{:.1}s] seg {}: {}",
        seg.start_time, seg.end_time, seg.segment_id, seg.text
    )
}

/// Case-insensitive literal substring highlight, best-effort — `regex`-mode
/// queries aren't re-run here, they just render unhighlighted.
fn highlight_query(text: &str, query: &str) -> String {
    if query.is_empty() {
        return text.to_string();
    }
    let lower_text = text.to_lowercase();
    let lower_query = query.to_lowercase();
    match lower_text.find(&lower_query) {
        Some(pos) if pos + query.len() <= text.len() => {
            let end = pos + query.len();
            format!("{}{}{}", &text[..pos], colors::highlight(&text[pos..end]), &text[end..])
        }
        _ => text.to_string(),
    }
}
