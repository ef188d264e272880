//! Schema creation for the document/segment/full-text store.
//!
//! One-shot build: the Bulk Writer is the only thing that ever populates
//! `documents_fts`, directly inside the load transaction, so (unlike a
//! delta-indexing schema) there are no AFTER INSERT/UPDATE/DELETE triggers
//! keeping it in sync with `documents` — a rebuild replaces the whole file.

use rusqlite::Connection;

use crate::connection::StoreError;

/// Current schema version, written to `metadata` at the end of a successful build.
pub const SCHEMA_VERSION: i32 = 1;

/// Create every table, the FTS5 virtual table, and the mapping table.
/// Idempotent: safe to call against an already-initialised connection.
pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT
        );

        CREATE TABLE IF NOT EXISTS documents (
            doc_id INTEGER PRIMARY KEY,
            uuid TEXT UNIQUE NOT NULL,
            source TEXT,
            episode TEXT,
            episode_date TEXT,
            episode_title TEXT
        );

        CREATE VIRTUAL TABLE IF NOT EXISTS documents_fts USING fts5(
            full_text,
            tokenize = 'unicode61 remove_diacritics 0'
        );

        CREATE TABLE IF NOT EXISTS fts_doc_mapping (
            fts_rowid INTEGER PRIMARY KEY,
            doc_id INTEGER NOT NULL,
            FOREIGN KEY (doc_id) REFERENCES documents(doc_id)
        );

        CREATE TABLE IF NOT EXISTS segments (
            doc_id INTEGER,
            segment_id INTEGER,
            segment_text TEXT,
            avg_logprob DOUBLE,
            char_offset INTEGER,
            start_time DOUBLE,
            end_time DOUBLE,
            FOREIGN KEY (doc_id) REFERENCES documents(doc_id)
        );",
    )?;

    create_indexes(conn)?;
    Ok(())
}

/// All secondary indexes named in the component design. FTS5 manages its
/// own internal indexes and is unaffected by this drop/create pair.
pub const INDEX_STATEMENTS: &[(&str, &str)] = &[
    ("idx_segments_doc_id", "CREATE INDEX IF NOT EXISTS idx_segments_doc_id ON segments(doc_id)"),
    ("idx_segments_segment_id", "CREATE INDEX IF NOT EXISTS idx_segments_segment_id ON segments(segment_id)"),
    ("idx_segments_char_offset", "CREATE INDEX IF NOT EXISTS idx_segments_char_offset ON segments(char_offset)"),
    (
        "idx_segments_doc_id_segment_id",
        "CREATE INDEX IF NOT EXISTS idx_segments_doc_id_segment_id ON segments(doc_id, segment_id)",
    ),
    ("idx_documents_uuid", "CREATE INDEX IF NOT EXISTS idx_documents_uuid ON documents(uuid)"),
    ("idx_documents_date", "CREATE INDEX IF NOT EXISTS idx_documents_date ON documents(episode_date)"),
    ("idx_documents_source", "CREATE INDEX IF NOT EXISTS idx_documents_source ON documents(source)"),
    (
        "idx_fts_doc_mapping_doc_id",
        "CREATE INDEX IF NOT EXISTS idx_fts_doc_mapping_doc_id ON fts_doc_mapping(doc_id)",
    ),
];

pub fn create_indexes(conn: &Connection) -> Result<(), StoreError> {
    for (_, stmt) in INDEX_STATEMENTS {
        conn.execute_batch(stmt)?;
    }
    Ok(())
}

/// Dropped before a bulk load and recreated after, per the component design's
/// "drop secondary indexes before bulk insert, recreate after" rule.
pub fn drop_indexes(conn: &Connection) -> Result<(), StoreError> {
    for (name, _) in INDEX_STATEMENTS {
        conn.execute_batch(&format!("DROP INDEX IF EXISTS {name}"))?;
    }
    Ok(())
}

pub fn write_build_metadata(conn: &Connection, built_at: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [&SCHEMA_VERSION.to_string()],
    )?;
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('built_at', ?1)",
        [built_at],
    )?;
    Ok(())
}
