//! Read-only and read-write connection wrappers.

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::{self, SCHEMA_VERSION};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("store already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store not initialized (run a build first)")]
    NotInitialized,

    #[error("store schema version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },

    #[error(transparent)]
    NotFound(#[from] transcript_core::error::NotFound),
}

/// Read-only handle onto a completed store. Safe to open from multiple
/// reader threads/processes concurrently.
pub struct IndexStore {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl IndexStore {
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(StoreError::FileNotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let store = Self { conn, path };
        store.check_version()?;
        Ok(store)
    }

    fn check_version(&self) -> Result<(), StoreError> {
        let version: Option<i32> = self
            .conn
            .query_row(
                "SELECT CAST(value AS INTEGER) FROM metadata WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .ok();

        match version {
            None => Err(StoreError::NotInitialized),
            Some(v) if v != SCHEMA_VERSION => Err(StoreError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found: v,
            }),
            Some(_) => Ok(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn built_at(&self) -> Option<String> {
        self.conn
            .query_row(
                "SELECT value FROM metadata WHERE key = 'built_at'",
                [],
                |row| row.get(0),
            )
            .ok()
    }
}

/// Read-write handle used only by the Bulk Writer. Refuses to open over an
/// existing file — rebuilds must target a fresh path (§6: "a rebuild must
/// refuse to proceed if the store file already exists").
pub struct IndexWriter {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl IndexWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(StoreError::AlreadyExists(path));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -524288;
             PRAGMA foreign_keys = OFF;",
        )?;

        schema::init_schema(&conn)?;

        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Remove the store file and its WAL/SHM siblings. Called by the build
    /// driver on a writer-side abort so a failed build never leaves a file
    /// at the target path that a later `create()` would refuse to overwrite.
    pub fn discard(self) -> Result<(), StoreError> {
        let path = self.path.clone();
        drop(self.conn);
        for suffix in ["", "-wal", "-shm"] {
            let p = PathBuf::from(format!("{}{suffix}", path.display()));
            if p.exists() {
                std::fs::remove_file(p)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_open_read_only_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");

        let mut writer = IndexWriter::create(&path).unwrap();
        schema::write_build_metadata(writer.connection_mut(), "2026-01-01T00:00:00Z").unwrap();
        drop(writer);

        let reader = IndexStore::open_read_only(&path).unwrap();
        assert_eq!(reader.built_at().as_deref(), Some("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn create_refuses_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let _first = IndexWriter::create(&path).unwrap();
        let second = IndexWriter::create(&path);
        assert!(matches!(second, Err(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn open_read_only_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        assert!(matches!(
            IndexStore::open_read_only(&path),
            Err(StoreError::FileNotFound(_))
        ));
    }

    #[test]
    fn open_read_only_without_metadata_is_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let writer = IndexWriter::create(&path).unwrap();
        drop(writer);
        assert!(matches!(
            IndexStore::open_read_only(&path),
            Err(StoreError::NotInitialized)
        ));
    }

    #[test]
    fn discard_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let writer = IndexWriter::create(&path).unwrap();
        writer.discard().unwrap();
        assert!(!path.exists());
    }
}
