//! Minimal text output formatting (content only, one line per item).

use transcript_core::types::{EnrichedHit, SegmentRecord};

pub fn format_hit(hit: &EnrichedHit) -> String {
    hit.text.clone()
}

pub fn format_segment(seg: &SegmentRecord) -> String {
    seg.text.clone()
}
