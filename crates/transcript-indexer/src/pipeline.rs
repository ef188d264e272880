//! The Bulk Writer: fan out JSON parsing across a worker pool, fan in to a
//! single writer thread that owns the only open handle to the target store.
//!
//! Builds are one-shot and non-incremental: every run creates a brand new
//! store file and there is no delta/update path, unlike a trigger-synced
//! index that stays live across many small writes.

use std::path::PathBuf;

use transcript_core::types::DocId;
use transcript_loader::{find_transcript_files, load_file_as, LoadedDocument, TranscriptFile};
use transcript_store::connection::IndexWriter;
use transcript_store::{schema, writer as store_writer};

use crate::error::IndexerError;

/// Chunk size for commit/reopen of the bulk-load transaction.
const DOCS_PER_TX: usize = 1000;
/// Worker → writer channel capacity. Bounds memory when parsing outruns disk I/O.
const QUEUE_CAPACITY: usize = 2000;
/// Upper bound on parser threads, independent of how many cores the host has.
const MAX_PARSER_THREADS: usize = 16;

pub struct BuildOptions {
    pub corpus_dir: PathBuf,
    pub output_path: PathBuf,
    /// Override the parser pool size. `None` picks `min(16, num_cpus)`.
    pub worker_threads: Option<usize>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildOutcome {
    pub documents_indexed: usize,
    pub documents_skipped: usize,
    pub segments_indexed: usize,
}

struct ParsedDoc {
    record_index: DocId,
    path: PathBuf,
    result: Result<LoadedDocument, transcript_core::error::InputError>,
}

/// Build a fresh store from every transcript file under `opts.corpus_dir`.
///
/// `on_progress(path, completed, total)` fires once per file in whatever
/// order parsing completes (the pool is concurrent; `doc_id` assignment
/// is not — it is fixed at dispatch time from each file's position in the
/// sorted file list, so a rebuild from the same corpus always produces the
/// same doc_id for the same file regardless of scheduling).
///
/// A file that fails to parse is logged and skipped, not fatal to the
/// build. A failure in the writer itself discards the partial store file
/// before returning, so a failed build never leaves a file at the output
/// path that a retry would refuse to overwrite.
pub fn build_index<F>(opts: &BuildOptions, mut on_progress: F) -> Result<BuildOutcome, IndexerError>
where
    F: FnMut(&str, usize, usize),
{
    let files = find_transcript_files(&opts.corpus_dir);
    let total = files.len();
    if total == 0 {
        return Err(IndexerError::EmptyCorpus(opts.corpus_dir.clone()));
    }

    let worker_count = opts
        .worker_threads
        .unwrap_or_else(|| num_cpus::get().min(MAX_PARSER_THREADS))
        .max(1);

    let writer = IndexWriter::create(&opts.output_path)?;

    match drive_build(writer, &files, worker_count, total, &mut on_progress) {
        Ok(outcome) => Ok(outcome),
        Err((writer, err)) => {
            if let Err(cleanup_err) = writer.discard() {
                tracing::warn!(error = %cleanup_err, "failed to discard partial store after build error");
            }
            Err(err)
        }
    }
}

fn drive_build(
    mut writer: IndexWriter,
    files: &[TranscriptFile],
    worker_count: usize,
    total: usize,
    on_progress: &mut dyn FnMut(&str, usize, usize),
) -> Result<BuildOutcome, (IndexWriter, IndexerError)> {
    match run_writer(&mut writer, files, worker_count, total, on_progress) {
        Ok(outcome) => Ok(outcome),
        Err(err) => Err((writer, err)),
    }
}

fn run_writer(
    writer: &mut IndexWriter,
    files: &[TranscriptFile],
    worker_count: usize,
    total: usize,
    on_progress: &mut dyn FnMut(&str, usize, usize),
) -> Result<BuildOutcome, IndexerError> {
    schema::drop_indexes(writer.connection())?;

    let (path_tx, path_rx) = crossbeam_channel::unbounded::<(DocId, TranscriptFile)>();
    for (idx, file) in files.iter().enumerate() {
        path_tx.send((idx as DocId, file.clone())).expect("receiver outlives sender");
    }
    drop(path_tx);

    let (doc_tx, doc_rx) = crossbeam_channel::bounded::<ParsedDoc>(QUEUE_CAPACITY);

    let outcome = std::thread::scope(|scope| -> Result<BuildOutcome, IndexerError> {
        for _ in 0..worker_count {
            let path_rx = path_rx.clone();
            let doc_tx = doc_tx.clone();
            scope.spawn(move || {
                while let Ok((record_index, file)) = path_rx.recv() {
                    let result = load_file_as(&file.path, &file.episode, record_index);
                    if doc_tx
                        .send(ParsedDoc { record_index, path: file.path, result })
                        .is_err()
                    {
                        break;
                    }
                }
            });
        }
        drop(doc_tx);
        drop(path_rx);

        consume(writer, doc_rx, total, on_progress)
    })?;

    schema::create_indexes(writer.connection())?;
    writer
        .connection()
        .execute_batch("INSERT INTO documents_fts(documents_fts) VALUES('optimize')")?;
    schema::write_build_metadata(writer.connection(), &chrono::Utc::now().to_rfc3339())?;

    Ok(outcome)
}

fn consume(
    writer: &mut IndexWriter,
    doc_rx: crossbeam_channel::Receiver<ParsedDoc>,
    total: usize,
    on_progress: &mut dyn FnMut(&str, usize, usize),
) -> Result<BuildOutcome, IndexerError> {
    let mut outcome = BuildOutcome::default();
    let mut completed = 0usize;
    let mut docs_in_tx = 0usize;

    let mut tx = writer.connection_mut().transaction()?;

    for parsed in doc_rx.iter() {
        completed += 1;
        on_progress(&parsed.path.to_string_lossy(), completed, total);

        let doc = match parsed.result {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(path = %parsed.path.display(), error = %err, "skipping unparsable transcript file");
                outcome.documents_skipped += 1;
                continue;
            }
        };

        write_document(&tx, parsed.record_index, &doc)?;
        outcome.documents_indexed += 1;
        outcome.segments_indexed += doc.segments.len();
        docs_in_tx += 1;

        if docs_in_tx >= DOCS_PER_TX {
            tx.commit()?;
            tx = writer.connection_mut().transaction()?;
            docs_in_tx = 0;
        }
    }

    tx.commit()?;
    Ok(outcome)
}

fn write_document(
    tx: &rusqlite::Transaction,
    doc_id: DocId,
    doc: &LoadedDocument,
) -> Result<(), IndexerError> {
    let doc_uuid = uuid::Uuid::new_v4().to_string();

    store_writer::insert_document(
        tx,
        doc_id,
        &doc_uuid,
        &doc.source,
        &doc.episode,
        doc.episode_date.as_deref(),
        &doc.episode_title,
    )?;

    let fts_rowid = store_writer::insert_fts_row(tx, &doc.full_text)?;
    store_writer::insert_mapping(tx, fts_rowid, doc_id)?;

    for (segment_id, segment) in doc.segments.iter().enumerate() {
        store_writer::insert_segment(
            tx,
            doc_id,
            segment_id as i64,
            &segment.text,
            segment.avg_logprob,
            segment.char_offset,
            segment.start,
            segment.end,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use transcript_store::connection::IndexStore;

    fn write_transcript(dir: &Path, name: &str, segments_json: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, format!(r#"{{"segments": {segments_json}}}"#)).unwrap();
    }

    #[test]
    fn builds_a_store_from_a_small_corpus() {
        let corpus = tempfile::tempdir().unwrap();
        write_transcript(
            corpus.path(),
            "a/2024.01.01 first.json",
            r#"[{"text": "hello", "start": 0.0, "end": 1.0}]"#,
        );
        write_transcript(
            corpus.path(),
            "a/2024.01.02 second.json",
            r#"[{"text": "world", "start": 0.0, "end": 1.0}]"#,
        );

        let out_dir = tempfile::tempdir().unwrap();
        let output_path = out_dir.path().join("store.db");

        let opts = BuildOptions {
            corpus_dir: corpus.path().to_path_buf(),
            output_path: output_path.clone(),
            worker_threads: Some(2),
        };

        let mut seen = 0usize;
        let outcome = build_index(&opts, |_, _, _| seen += 1).unwrap();

        assert_eq!(outcome.documents_indexed, 2);
        assert_eq!(outcome.documents_skipped, 0);
        assert_eq!(outcome.segments_indexed, 2);
        assert_eq!(seen, 2);

        let store = IndexStore::open_read_only(&output_path).unwrap();
        let (doc_count, _) = store.get_document_stats().unwrap();
        assert_eq!(doc_count, 2);
    }

    #[test]
    fn skips_unparsable_files_without_failing_the_build() {
        let corpus = tempfile::tempdir().unwrap();
        write_transcript(corpus.path(), "good.json", r#"[{"text": "ok", "start": 0.0, "end": 1.0}]"#);
        fs::write(corpus.path().join("bad.json"), "not json").unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let opts = BuildOptions {
            corpus_dir: corpus.path().to_path_buf(),
            output_path: out_dir.path().join("store.db"),
            worker_threads: Some(1),
        };

        let outcome = build_index(&opts, |_, _, _| {}).unwrap();
        assert_eq!(outcome.documents_indexed, 1);
        assert_eq!(outcome.documents_skipped, 1);
    }

    #[test]
    fn empty_corpus_is_an_error() {
        let corpus = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let opts = BuildOptions {
            corpus_dir: corpus.path().to_path_buf(),
            output_path: out_dir.path().join("store.db"),
            worker_threads: Some(1),
        };

        assert!(matches!(build_index(&opts, |_, _, _| {}), Err(IndexerError::EmptyCorpus(_))));
    }

    #[test]
    fn failed_build_does_not_leave_a_store_file_behind() {
        let corpus = tempfile::tempdir().unwrap();
        write_transcript(corpus.path(), "good.json", r#"[{"text": "ok", "start": 0.0, "end": 1.0}]"#);

        let out_dir = tempfile::tempdir().unwrap();
        let output_path = out_dir.path().join("store.db");
        // Pre-create the target path so IndexWriter::create fails before the
        // pipeline ever starts (the cheapest reliable way to force a bail).
        fs::write(&output_path, b"").unwrap();

        let opts = BuildOptions {
            corpus_dir: corpus.path().to_path_buf(),
            output_path: output_path.clone(),
            worker_threads: Some(1),
        };

        assert!(build_index(&opts, |_, _, _| {}).is_err());
    }
}
