//! Runs a compiled query plan's verification regex over one candidate's
//! full text and turns regex matches (byte offsets) into `Hit`s (char
//! offsets), applying position filtering along the way.

use transcript_core::types::{DocId, Hit, PositionSet};

use crate::planner::QueryPlan;
use crate::position::classify_hit_position;

/// `seg_boundaries` is required whenever `position_filters` is set — a hit
/// with filters but no boundaries available is kept unfiltered, matching
/// "no boundaries" meaning "cannot disprove the filter".
pub fn extract_hits(
    plan: &QueryPlan,
    doc_id: DocId,
    full_text: &str,
    seg_boundaries: Option<&[(i64, i64)]>,
    position_filters: Option<&PositionSet>,
) -> Vec<Hit> {
    let Some(verify) = plan.verify.as_ref() else {
        return Vec::new();
    };

    let mut hits = Vec::new();
    for mat in verify.find_iter(full_text) {
        let char_start = full_text[..mat.start()].chars().count() as i64;

        if let (Some(filters), Some(boundaries)) = (position_filters, seg_boundaries) {
            let char_end = char_start + full_text[mat.start()..mat.end()].chars().count() as i64;
            let labels = classify_hit_position(char_start, char_end, full_text, boundaries);
            if labels.is_disjoint(filters) {
                continue;
            }
        }

        hits.push(Hit { doc_id, char_offset: char_start });
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::build_plan;
    use proptest::prelude::*;
    use transcript_core::types::{Mode, PositionLabel};

    #[test]
    fn extracts_every_match_as_a_hit() {
        let plan = build_plan(Mode::Exact, "cat", false);
        let hits = extract_hits(&plan, 1, "the cat sat near another cat", None, None);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].char_offset, 4);
        assert_eq!(hits[1].char_offset, 25);
    }

    #[test]
    fn empty_plan_yields_no_hits() {
        let plan = build_plan(Mode::Exact, "...", false);
        let hits = extract_hits(&plan, 1, "anything at all", None, None);
        assert!(hits.is_empty());
    }

    #[test]
    fn position_filter_drops_non_matching_hits() {
        let plan = build_plan(Mode::Exact, "world", false);
        let boundaries = &[(0, 11)]; // "hello world"
        let mut filters = PositionSet::new();
        filters.insert(PositionLabel::Start);

        let hits = extract_hits(&plan, 1, "hello world", Some(boundaries), Some(&filters));
        assert!(hits.is_empty());
    }

    #[test]
    fn position_filter_keeps_matching_hits() {
        let plan = build_plan(Mode::Exact, "hello", false);
        let boundaries = &[(0, 11)]; // "hello world"
        let mut filters = PositionSet::new();
        filters.insert(PositionLabel::Start);

        let hits = extract_hits(&plan, 1, "hello world", Some(boundaries), Some(&filters));
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn char_offsets_account_for_multibyte_hebrew_text() {
        let plan = build_plan(Mode::Exact, "עולם", false);
        let hits = extract_hits(&plan, 1, "שלום עולם", None, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].char_offset, 5); // "שלום " is 5 chars, not 5 bytes
    }

    proptest! {
        // Hit-in-bounds: every hit this function ever produces sits inside
        // the candidate's own char range, regardless of surrounding padding.
        #[test]
        fn hit_in_bounds(
            needle in "[a-zא-ת]{1,5}",
            before in prop::collection::vec("[a-zא-ת]{1,5}", 0..4),
            after in prop::collection::vec("[a-zא-ת]{1,5}", 0..4),
        ) {
            let mut words = before.clone();
            words.push(needle.clone());
            words.extend(after);
            let full_text = words.join(" ");
            let total = full_text.chars().count() as i64;

            let plan = build_plan(Mode::Exact, &needle, false);
            let hits = extract_hits(&plan, 1, &full_text, None, None);

            for hit in &hits {
                prop_assert!(hit.char_offset >= 0 && hit.char_offset < total);
            }
        }
    }
}
