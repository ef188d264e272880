//! Classifies a hit as starting/ending a word boundary within its segment,
//! or spilling across into the next segment, without ever touching the
//! store — everything it needs is the candidate's full text and a sorted
//! list of `(char_offset, segment_length)` pairs.

use transcript_core::types::{PositionLabel, PositionSet};

/// `seg_boundaries` must be sorted ascending by `char_offset` — the shape
/// `get_segment_boundaries` returns.
pub fn classify_hit_position(
    hit_start: i64,
    hit_end: i64,
    full_text: &str,
    seg_boundaries: &[(i64, i64)],
) -> PositionSet {
    let mut positions = PositionSet::new();
    if seg_boundaries.is_empty() {
        return positions;
    }

    // bisect_right(seg_offsets, hit_start) - 1: the last segment whose
    // offset is <= hit_start.
    let idx = seg_boundaries
        .partition_point(|&(offset, _)| offset <= hit_start)
        .saturating_sub(1);

    let (seg_offset, seg_len) = seg_boundaries[idx];
    let offset_in_seg = hit_start - seg_offset;
    let match_len = hit_end - hit_start;
    let seg_chars = segment_chars(full_text, seg_offset, seg_len);

    match seg_chars.iter().position(|&c| c == ' ') {
        None => {
            if offset_in_seg == 0 {
                positions.insert(PositionLabel::Start);
            }
        }
        Some(first_space) if offset_in_seg < first_space as i64 => {
            positions.insert(PositionLabel::Start);
        }
        _ => {}
    }

    match seg_chars.iter().rposition(|&c| c == ' ') {
        None => {
            if offset_in_seg + match_len >= seg_len {
                positions.insert(PositionLabel::End);
            }
        }
        Some(last_space) if offset_in_seg + match_len > last_space as i64 => {
            positions.insert(PositionLabel::End);
        }
        _ => {}
    }

    if offset_in_seg + match_len > seg_len {
        positions.insert(PositionLabel::Cross);
    }

    positions
}

fn segment_chars(full_text: &str, start: i64, len: i64) -> Vec<char> {
    full_text
        .chars()
        .skip(start.max(0) as usize)
        .take(len.max(0) as usize)
        .collect()
}
