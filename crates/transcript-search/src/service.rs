//! The Search Service: orchestrates the query planner, the store, and the
//! position classifier behind a single `search`/`segment` entry point.

use transcript_core::types::{DocId, EnrichedHit, Hit, SearchFilters, SegIdx, SegmentRecord};
use transcript_query::{cached_plan, extract_hits};
use transcript_store::IndexStore;

use crate::error::SearchError;
use crate::request::SearchRequest;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub hits: Vec<EnrichedHit>,
    pub has_more: bool,
}

/// Holds an immutable reference to an open, read-only store. Performs no
/// caching beyond the store's own (and the query planner's ambient regex
/// cache) — safe to share across concurrent readers.
pub struct SearchService<'a> {
    store: &'a IndexStore,
}

impl<'a> SearchService<'a> {
    pub fn new(store: &'a IndexStore) -> Self {
        Self { store }
    }

    /// `Planned -> Candidates Fetched -> Verified -> Position-Filtered ->
    /// Returned`. An unextractable query (no tokens, invalid regex) yields
    /// an empty outcome rather than an error.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let plan = cached_plan(request.mode, &request.query, request.ignore_punct);
        if plan.is_empty() {
            return Ok(SearchOutcome { hits: Vec::new(), has_more: false });
        }

        let filters = SearchFilters {
            date_from: request.date_from.clone(),
            date_to: request.date_to.clone(),
            sources: request.sources.clone(),
            ignore_punct: request.ignore_punct,
            position_filters: request.position_filters.clone(),
        };

        let fts_match = match &plan.candidates {
            transcript_query::Candidates::Filtered(expr) => Some(expr.as_str()),
            transcript_query::Candidates::FullScan => None,
            transcript_query::Candidates::Empty => unreachable!("plan.is_empty() already handled"),
        };

        let candidates = self.store.fetch_candidates(fts_match, &filters)?;

        let mut raw_hits: Vec<Hit> = Vec::new();
        for (doc_id, full_text) in &candidates {
            let seg_boundaries = if request.position_filters.is_some() {
                Some(self.store.get_segment_boundaries(*doc_id)?)
            } else {
                None
            };
            raw_hits.extend(extract_hits(
                &plan,
                *doc_id,
                full_text,
                seg_boundaries.as_deref(),
                request.position_filters.as_ref(),
            ));
        }

        let (page, has_more) = paginate(&raw_hits, request.offset, request.limit);

        let mut hits = Vec::with_capacity(page.len());
        for hit in page {
            hits.push(self.enrich(*hit)?);
        }

        Ok(SearchOutcome { hits, has_more })
    }

    /// Returns the segment containing a hit, enriched with document metadata.
    pub fn segment(&self, hit: Hit) -> Result<EnrichedHit, SearchError> {
        self.enrich(hit)
    }

    fn enrich(&self, hit: Hit) -> Result<EnrichedHit, SearchError> {
        let segment = self.store.get_segment_at_offset(hit.doc_id, hit.char_offset)?;
        let info = self.store.get_document_info(hit.doc_id)?;
        Ok(EnrichedHit {
            doc_id: hit.doc_id,
            char_offset: hit.char_offset,
            segment_id: segment.segment_id,
            start_sec: segment.start_time,
            end_sec: segment.end_time,
            text: segment.text,
            source: info.source,
            episode: info.episode,
            episode_title: info.episode_title,
            episode_date: info.episode_date,
            uuid: info.uuid,
        })
    }

    /// Batch `(doc_id, char_offset)` lookup, 1:1 aligned with `pairs`, `None`
    /// for any offset with no containing segment.
    pub fn batch_segments_by_offsets(
        &self,
        pairs: &[(DocId, i64)],
    ) -> Result<Vec<Option<SegmentRecord>>, SearchError> {
        let mut out = Vec::with_capacity(pairs.len());
        for &(doc_id, offset) in pairs {
            match self.store.get_segment_at_offset(doc_id, offset) {
                Ok(seg) => out.push(Some(seg)),
                Err(transcript_store::StoreError::NotFound(_)) => out.push(None),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(out)
    }

    /// Batch `(doc_id, segment_id)` lookup, 1:1 aligned with `pairs` (the
    /// store's join collapses duplicates and drops order, so this
    /// reconstructs alignment and `None`-fills misses itself).
    pub fn batch_segments_by_ids(
        &self,
        pairs: &[(DocId, SegIdx)],
    ) -> Result<Vec<Option<SegmentRecord>>, SearchError> {
        let found = self.store.get_segments_by_ids(pairs)?;
        let mut out = Vec::with_capacity(pairs.len());
        for &(doc_id, seg_id) in pairs {
            let seg = found
                .iter()
                .find(|s| s.doc_id == doc_id && s.segment_id == seg_id)
                .cloned();
            out.push(seg);
        }
        Ok(out)
    }

    /// `n` neighbouring segments on each side of `hit`'s segment, clamped to
    /// the document's segment range — the context window the external
    /// audio player uses around a hit.
    pub fn context_window(&self, hit: Hit, n: SegIdx) -> Result<Vec<SegmentRecord>, SearchError> {
        let center = self.store.get_segment_at_offset(hit.doc_id, hit.char_offset)?;
        let lo = (center.segment_id - n).max(0);
        let hi = center.segment_id + n;
        let pairs: Vec<(DocId, SegIdx)> = (lo..=hi).map(|id| (hit.doc_id, id)).collect();
        Ok(self.store.get_segments_by_ids(&pairs)?)
    }

    pub fn resolve_episode_by_uuid(&self, uuid: &str) -> Result<String, SearchError> {
        Ok(self.store.get_episode_by_uuid(uuid)?)
    }
}

/// Slice `[offset, offset+limit]` out of `hits`, fetching one extra entry
/// past `limit` to compute `has_more` without a second pass over the data.
fn paginate(hits: &[Hit], offset: usize, limit: Option<usize>) -> (&[Hit], bool) {
    let tail = if offset >= hits.len() { &[] } else { &hits[offset..] };
    match limit {
        None => (tail, false),
        Some(limit) => {
            let has_more = tail.len() > limit;
            (&tail[..limit.min(tail.len())], has_more)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use transcript_core::types::Mode;
    use transcript_store::{writer, IndexWriter};

    fn seeded_store() -> (tempfile::TempDir, IndexStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.db");
        let mut w = IndexWriter::create(&path).unwrap();
        {
            let tx = w.connection_mut().transaction().unwrap();
            writer::insert_document(&tx, 0, "u-0", "src", "src/2024.01.01 a", Some("2024-01-01"), "a").unwrap();
            let fts_rowid = writer::insert_fts_row(&tx, "שלום עולם יפה").unwrap();
            writer::insert_mapping(&tx, fts_rowid, 0).unwrap();
            writer::insert_segment(&tx, 0, 0, "שלום", 0.0, 0, 0.0, 1.0).unwrap();
            writer::insert_segment(&tx, 0, 1, "עולם", 0.0, 5, 1.0, 2.0).unwrap();
            writer::insert_segment(&tx, 0, 2, "יפה", 0.0, 10, 2.0, 3.0).unwrap();
            tx.commit().unwrap();
        }
        transcript_store::schema::write_build_metadata(w.connection_mut(), "now").unwrap();
        drop(w);
        (dir, IndexStore::open_read_only(&path).unwrap())
    }

    #[test]
    fn search_finds_and_enriches_a_hit() {
        let (_dir, store) = seeded_store();
        let svc = SearchService::new(&store);
        let req = SearchRequest::new("עולם", Mode::Exact);
        let outcome = svc.search(&req).unwrap();
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.hits[0].segment_id, 1);
        assert_eq!(outcome.hits[0].source, "src");
        assert!(!outcome.has_more);
    }

    #[test]
    fn search_with_no_extractable_tokens_is_empty_not_an_error() {
        let (_dir, store) = seeded_store();
        let svc = SearchService::new(&store);
        let req = SearchRequest::new("...", Mode::Exact);
        let outcome = svc.search(&req).unwrap();
        assert!(outcome.hits.is_empty());
        assert!(!outcome.has_more);
    }

    #[test]
    fn pagination_trims_to_limit_and_reports_has_more() {
        let (_dir, store) = seeded_store();
        let svc = SearchService::new(&store);
        let mut req = SearchRequest::new("ו", Mode::Partial);
        req.limit = Some(1);
        let outcome = svc.search(&req).unwrap();
        assert_eq!(outcome.hits.len(), 1);
        assert!(outcome.has_more);
    }

    #[test]
    fn context_window_clamps_to_document_bounds() {
        let (_dir, store) = seeded_store();
        let svc = SearchService::new(&store);
        let hit = Hit { doc_id: 0, char_offset: 5 };
        let window = svc.context_window(hit, 5).unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].segment_id, 0);
        assert_eq!(window[2].segment_id, 2);
    }

    #[test]
    fn batch_segments_by_offsets_nulls_missing_entries() {
        let (_dir, store) = seeded_store();
        let svc = SearchService::new(&store);
        let result = svc.batch_segments_by_offsets(&[(0, 5), (0, 9999)]).unwrap();
        assert!(result[0].is_some());
        assert!(result[1].is_none());
    }

    /// Two documents sharing a common token ("שלום"), split across two
    /// sources and two episode dates, for filter-monotonicity checks.
    fn two_source_store() -> (tempfile::TempDir, IndexStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.db");
        let mut w = IndexWriter::create(&path).unwrap();
        {
            let tx = w.connection_mut().transaction().unwrap();
            writer::insert_document(&tx, 0, "u-0", "a", "a/2024.01.01 x", Some("2024-01-01"), "x").unwrap();
            let r0 = writer::insert_fts_row(&tx, "שלום עולם").unwrap();
            writer::insert_mapping(&tx, r0, 0).unwrap();
            writer::insert_segment(&tx, 0, 0, "שלום", 0.0, 0, 0.0, 1.0).unwrap();
            writer::insert_segment(&tx, 0, 1, "עולם", 0.0, 5, 1.0, 2.0).unwrap();

            writer::insert_document(&tx, 1, "u-1", "b", "b/2024.06.01 y", Some("2024-06-01"), "y").unwrap();
            let r1 = writer::insert_fts_row(&tx, "שלום ערב").unwrap();
            writer::insert_mapping(&tx, r1, 1).unwrap();
            writer::insert_segment(&tx, 1, 0, "שלום", 0.0, 0, 0.0, 1.0).unwrap();
            writer::insert_segment(&tx, 1, 1, "ערב", 0.0, 5, 1.0, 2.0).unwrap();
            tx.commit().unwrap();
        }
        transcript_store::schema::write_build_metadata(w.connection_mut(), "now").unwrap();
        drop(w);
        (dir, IndexStore::open_read_only(&path).unwrap())
    }

    proptest! {
        // FTS idempotence: the same request run twice yields identical hits.
        #[test]
        fn fts_idempotence(use_source_filter in any::<bool>(), use_date_filter in any::<bool>()) {
            let (_dir, store) = two_source_store();
            let svc = SearchService::new(&store);
            let mut req = SearchRequest::new("שלום", Mode::Exact);
            if use_source_filter {
                req.sources = vec!["a".to_string()];
            }
            if use_date_filter {
                req.date_from = Some("2024-03-01".to_string());
            }
            let first = svc.search(&req).unwrap();
            let second = svc.search(&req).unwrap();
            prop_assert_eq!(first, second);
        }

        // Filter monotonicity: layering on a source and/or date filter never
        // grows the hit count relative to the unfiltered search.
        #[test]
        fn filter_monotonicity(use_source_filter in any::<bool>(), use_date_filter in any::<bool>()) {
            let (_dir, store) = two_source_store();
            let svc = SearchService::new(&store);

            let baseline = svc.search(&SearchRequest::new("שלום", Mode::Exact)).unwrap();

            let mut req = SearchRequest::new("שלום", Mode::Exact);
            if use_source_filter {
                req.sources = vec!["a".to_string()];
            }
            if use_date_filter {
                req.date_from = Some("2024-03-01".to_string());
            }
            let filtered = svc.search(&req).unwrap();

            prop_assert!(filtered.hits.len() <= baseline.hits.len());
        }
    }
}
