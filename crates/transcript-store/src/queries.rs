//! Read operations exposed by the Index Store (component design §4.2).

use rusqlite::params_from_iter;
use rusqlite::types::Value as SqlValue;
use transcript_core::error::NotFound;
use transcript_core::types::{DocId, DocumentInfo, SearchFilters, SegIdx, SegmentRecord};

use crate::connection::{IndexStore, StoreError};

const TEMP_LOOKUP_BATCH: usize = 499; // SQLITE_MAX_PARAMS(999) / 2 params per pair

impl IndexStore {
    /// `(doc_count, total_chars)`.
    pub fn get_document_stats(&self) -> Result<(i64, i64), StoreError> {
        let doc_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        let total_chars: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(full_text)), 0) FROM documents_fts",
            [],
            |row| row.get(0),
        )?;
        Ok((doc_count, total_chars))
    }

    pub fn get_document_text(&self, doc_id: DocId) -> Result<String, StoreError> {
        self.conn
            .query_row(
                "SELECT fts.full_text
                 FROM documents_fts fts
                 JOIN fts_doc_mapping m ON fts.rowid = m.fts_rowid
                 WHERE m.doc_id = ?1",
                [doc_id],
                |row| row.get(0),
            )
            .map_err(|_| NotFound::Document(doc_id).into())
    }

    pub fn get_document_info(&self, doc_id: DocId) -> Result<DocumentInfo, StoreError> {
        self.conn
            .query_row(
                "SELECT doc_id, uuid, source, episode, episode_date, episode_title
                 FROM documents WHERE doc_id = ?1",
                [doc_id],
                |row| {
                    Ok(DocumentInfo {
                        doc_id: row.get(0)?,
                        uuid: row.get(1)?,
                        source: row.get(2)?,
                        episode: row.get(3)?,
                        episode_date: row.get(4)?,
                        episode_title: row.get(5)?,
                    })
                },
            )
            .map_err(|_| NotFound::Document(doc_id).into())
    }

    pub fn get_episode_by_uuid(&self, uuid: &str) -> Result<String, StoreError> {
        self.conn
            .query_row(
                "SELECT episode FROM documents WHERE uuid = ?1",
                [uuid],
                |row| row.get(0),
            )
            .map_err(|_| NotFound::Uuid(uuid.to_string()).into())
    }

    pub fn get_doc_id_by_uuid(&self, uuid: &str) -> Result<DocId, StoreError> {
        self.conn
            .query_row(
                "SELECT doc_id FROM documents WHERE uuid = ?1",
                [uuid],
                |row| row.get(0),
            )
            .map_err(|_| NotFound::Uuid(uuid.to_string()).into())
    }

    /// Largest `char_offset <= offset` for the document — the segment
    /// containing that offset.
    pub fn get_segment_at_offset(&self, doc_id: DocId, char_offset: i64) -> Result<SegmentRecord, StoreError> {
        self.conn
            .query_row(
                "SELECT doc_id, segment_id, segment_text, avg_logprob, char_offset, start_time, end_time
                 FROM segments
                 WHERE doc_id = ?1 AND char_offset <= ?2
                 ORDER BY char_offset DESC
                 LIMIT 1",
                (doc_id, char_offset),
                row_to_segment,
            )
            .map_err(|_| {
                NotFound::SegmentAtOffset {
                    doc_id,
                    offset: char_offset,
                }
                .into()
            })
    }

    pub fn get_segments_for_document(&self, doc_id: DocId) -> Result<Vec<SegmentRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT doc_id, segment_id, segment_text, avg_logprob, char_offset, start_time, end_time
             FROM segments WHERE doc_id = ?1 ORDER BY segment_id",
        )?;
        let rows = stmt.query_map([doc_id], row_to_segment)?;
        Ok(rows.filter_map(Result::ok).collect())
    }

    /// Batch `(doc_id, segment_id)` lookup via a temp table + join, so large
    /// context-window fetches (10k+ pairs) stay a single join rather than
    /// N round trips.
    pub fn get_segments_by_ids(&self, pairs: &[(DocId, SegIdx)]) -> Result<Vec<SegmentRecord>, StoreError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        self.conn.execute_batch(
            "CREATE TEMPORARY TABLE IF NOT EXISTS temp_segment_lookups (
                doc_id INTEGER,
                segment_id INTEGER,
                PRIMARY KEY (doc_id, segment_id)
            ) WITHOUT ROWID;
             DELETE FROM temp_segment_lookups;",
        )?;

        for chunk in pairs.chunks(TEMP_LOOKUP_BATCH) {
            let placeholders = std::iter::repeat("(?, ?)")
                .take(chunk.len())
                .collect::<Vec<_>>()
                .join(",");
            let sql = format!("INSERT OR IGNORE INTO temp_segment_lookups VALUES {placeholders}");
            let values: Vec<SqlValue> = chunk
                .iter()
                .flat_map(|(d, s)| [SqlValue::from(*d), SqlValue::from(*s)])
                .collect();
            self.conn.execute(&sql, params_from_iter(values))?;
        }

        let mut stmt = self.conn.prepare(
            "SELECT s.doc_id, s.segment_id, s.segment_text, s.avg_logprob,
                    s.char_offset, s.start_time, s.end_time
             FROM segments s
             INNER JOIN temp_segment_lookups t
                 ON s.doc_id = t.doc_id AND s.segment_id = t.segment_id
             ORDER BY s.doc_id, s.segment_id",
        )?;
        let rows = stmt.query_map([], row_to_segment)?;
        let result: Vec<SegmentRecord> = rows.filter_map(Result::ok).collect();

        self.conn.execute("DELETE FROM temp_segment_lookups", [])?;
        Ok(result)
    }

    /// Sorted `(char_offset, segment_length)` pairs, the in-memory fast
    /// path the Position Classifier binary-searches over.
    pub fn get_segment_boundaries(&self, doc_id: DocId) -> Result<Vec<(i64, i64)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT char_offset, LENGTH(segment_text) FROM segments WHERE doc_id = ?1 ORDER BY char_offset",
        )?;
        let rows = stmt.query_map([doc_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.filter_map(Result::ok).collect())
    }

    /// Candidate documents for a query: applies the FTS MATCH expression
    /// (when present) plus date/source filters, returning `(doc_id,
    /// full_text)` pairs for the query planner to run its verification
    /// regex over. `fts_match = None` means a full scan (the documented
    /// slow path for queries with no extractable tokens).
    pub fn fetch_candidates(
        &self,
        fts_match: Option<&str>,
        filters: &SearchFilters,
    ) -> Result<Vec<(DocId, String)>, StoreError> {
        let mut sql = String::from(
            "SELECT m.doc_id, fts.full_text
             FROM documents_fts fts
             JOIN fts_doc_mapping m ON fts.rowid = m.fts_rowid
             JOIN documents d ON m.doc_id = d.doc_id
             WHERE 1=1",
        );
        let mut params: Vec<SqlValue> = Vec::new();

        if let Some(expr) = fts_match {
            sql.push_str(" AND documents_fts MATCH ?");
            params.push(SqlValue::from(expr.to_string()));
        }
        if let Some(from) = &filters.date_from {
            sql.push_str(" AND d.episode_date >= ?");
            params.push(SqlValue::from(from.clone()));
        }
        if let Some(to) = &filters.date_to {
            sql.push_str(" AND d.episode_date <= ?");
            params.push(SqlValue::from(to.clone()));
        }
        if !filters.sources.is_empty() {
            let placeholders = std::iter::repeat("?")
                .take(filters.sources.len())
                .collect::<Vec<_>>()
                .join(",");
            sql.push_str(&format!(" AND d.source IN ({placeholders})"));
            params.extend(filters.sources.iter().cloned().map(SqlValue::from));
        }

        // FTS MATCH must bind before the other predicates in the WHERE
        // clause text above, but params were pushed in clause order, which
        // matches the `?` placeholders left to right.
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params), |row| {
            Ok((row.get::<_, DocId>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.filter_map(Result::ok).collect())
    }
}

fn row_to_segment(row: &rusqlite::Row) -> rusqlite::Result<SegmentRecord> {
    Ok(SegmentRecord {
        doc_id: row.get(0)?,
        segment_id: row.get(1)?,
        text: row.get(2)?,
        avg_logprob: row.get(3)?,
        char_offset: row.get(4)?,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
    })
}
