//! Low-level write primitives used by the Bulk Writer (`transcript-indexer`).
//!
//! Everything here takes an explicit `&rusqlite::Transaction`/`&Connection`
//! so the caller owns transaction lifetime and chunking policy; this module
//! only knows how to shape one row or one batch of rows into SQL.

use rusqlite::Transaction;
use transcript_core::types::DocId;

pub fn insert_document(
    tx: &Transaction,
    doc_id: DocId,
    uuid: &str,
    source: &str,
    episode: &str,
    episode_date: Option<&str>,
    episode_title: &str,
) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO documents (doc_id, uuid, source, episode, episode_date, episode_title)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (doc_id, uuid, source, episode, episode_date, episode_title),
    )?;
    Ok(())
}

pub fn insert_fts_row(tx: &Transaction, full_text: &str) -> rusqlite::Result<i64> {
    tx.execute(
        "INSERT INTO documents_fts(full_text) VALUES (?1)",
        [full_text],
    )?;
    Ok(tx.last_insert_rowid())
}

pub fn insert_mapping(tx: &Transaction, fts_rowid: i64, doc_id: DocId) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO fts_doc_mapping(fts_rowid, doc_id) VALUES (?1, ?2)",
        (fts_rowid, doc_id),
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn insert_segment(
    tx: &Transaction,
    doc_id: DocId,
    segment_id: i64,
    text: &str,
    avg_logprob: f64,
    char_offset: i64,
    start_time: f64,
    end_time: f64,
) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO segments
            (doc_id, segment_id, segment_text, avg_logprob, char_offset, start_time, end_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (doc_id, segment_id, text, avg_logprob, char_offset, start_time, end_time),
    )?;
    Ok(())
}
