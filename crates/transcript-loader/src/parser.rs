//! Single-file transcript parsing: JSON → full text + segment rows.

use serde::Deserialize;
use std::path::Path;
use transcript_core::error::InputError;
use transcript_core::episode::{source_of, split_episode};

/// One raw segment as it appears in transcript JSON.
#[derive(Debug, Deserialize)]
struct RawSegment {
    text: String,
    start: f64,
    end: f64,
    #[serde(default)]
    avg_logprob: Option<f64>,
}

/// Transcript JSON root is either `{"segments": [...]}` or a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRoot {
    Wrapped { segments: Vec<RawSegment> },
    Bare(Vec<RawSegment>),
}

/// One segment after offset computation, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub char_offset: i64,
    pub avg_logprob: f64,
}

/// A fully parsed transcript file, keyed by the record index the caller
/// supplies (this becomes `doc_id`).
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub record_index: i64,
    pub episode: String,
    pub source: String,
    pub episode_date: Option<String>,
    pub episode_title: String,
    pub full_text: String,
    pub segments: Vec<LoadedSegment>,
}

/// Join segment texts with a single space each, recording the running
/// character-offset cursor for every segment.
///
/// `cursor[k+1] = cursor[k] + len(text[k]) + 1`, mirroring the +1 for the
/// joining space that is not appended after the final segment.
fn join_segments(raw: Vec<RawSegment>) -> (String, Vec<LoadedSegment>) {
    let mut parts = Vec::with_capacity(raw.len());
    let mut segments = Vec::with_capacity(raw.len());
    let mut cursor: i64 = 0;

    for seg in raw {
        let len = seg.text.chars().count() as i64;
        segments.push(LoadedSegment {
            char_offset: cursor,
            start: seg.start,
            end: seg.end,
            avg_logprob: seg.avg_logprob.unwrap_or(0.0),
            text: seg.text.clone(),
        });
        parts.push(seg.text);
        cursor += len + 1;
    }

    (parts.join(" "), segments)
}

/// Load and interpret one transcript file, given the path it came from (for
/// metadata derivation and error messages) and a stable record index.
pub fn load_file(path: &Path, record_index: i64) -> Result<LoadedDocument, InputError> {
    let path_str = path.to_string_lossy().to_string();

    let raw_bytes = std::fs::read(path).map_err(|source| InputError::Io {
        path: path_str.clone(),
        source,
    })?;

    let root: RawRoot = serde_json::from_slice(&raw_bytes).map_err(|source| InputError::Json {
        path: path_str.clone(),
        source,
    })?;

    let raw_segments = match root {
        RawRoot::Wrapped { segments } => segments,
        RawRoot::Bare(segments) => segments,
    };

    let (full_text, segments) = join_segments(raw_segments);

    // The episode identity is the file path relative to nothing in
    // particular from the loader's point of view — callers pass in
    // whatever path string they want recorded (usually relative to the
    // corpus root); `split_episode`/`source_of` operate on that string.
    let episode = path_str;
    let (episode_date, episode_title) = split_episode(&episode);
    let source = source_of(&episode);

    Ok(LoadedDocument {
        record_index,
        episode,
        source,
        episode_date,
        episode_title,
        full_text,
        segments,
    })
}

/// Load a file using an explicit episode identity string distinct from the
/// filesystem path (used by the indexer, which passes a corpus-relative
/// path while the actual file lives under an absolute root).
pub fn load_file_as(path: &Path, episode: &str, record_index: i64) -> Result<LoadedDocument, InputError> {
    let path_str = path.to_string_lossy().to_string();

    let raw_bytes = std::fs::read(path).map_err(|source| InputError::Io {
        path: path_str.clone(),
        source,
    })?;

    let root: RawRoot = serde_json::from_slice(&raw_bytes).map_err(|source| InputError::Json {
        path: path_str.clone(),
        source,
    })?;

    let raw_segments = match root {
        RawRoot::Wrapped { segments } => segments,
        RawRoot::Bare(segments) => segments,
    };

    let (full_text, segments) = join_segments(raw_segments);
    let (episode_date, episode_title) = split_episode(episode);
    let source = source_of(episode);

    Ok(LoadedDocument {
        record_index,
        episode: episode.to_string(),
        source,
        episode_date,
        episode_title,
        full_text,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn wrapped_root_computes_offsets() {
        let f = write_json(
            r#"{"segments": [
                {"text": "שלום", "start": 0.0, "end": 1.0},
                {"text": "עולם", "start": 1.0, "end": 2.0}
            ]}"#,
        );
        let doc = load_file_as(f.path(), "src/2024.01.01 test", 0).unwrap();
        assert_eq!(doc.full_text, "שלום עולם");
        assert_eq!(doc.segments[0].char_offset, 0);
        assert_eq!(doc.segments[1].char_offset, 5); // len("שלום") + 1
        assert_eq!(doc.episode_date.as_deref(), Some("2024-01-01"));
        assert_eq!(doc.episode_title, "test");
        assert_eq!(doc.source, "src");
    }

    #[test]
    fn bare_list_root_is_accepted() {
        let f = write_json(r#"[{"text": "a", "start": 0.0, "end": 1.0}]"#);
        let doc = load_file_as(f.path(), "src/no-date", 3).unwrap();
        assert_eq!(doc.full_text, "a");
        assert_eq!(doc.record_index, 3);
    }

    #[test]
    fn empty_segments_yields_empty_full_text_and_no_rows() {
        let f = write_json(r#"{"segments": []}"#);
        let doc = load_file_as(f.path(), "src/empty", 0).unwrap();
        assert_eq!(doc.full_text, "");
        assert!(doc.segments.is_empty());
    }

    #[test]
    fn missing_required_field_is_an_input_error() {
        let f = write_json(r#"{"segments": [{"start": 0.0, "end": 1.0}]}"#);
        let err = load_file_as(f.path(), "src/bad", 0).unwrap_err();
        assert!(matches!(err, InputError::Json { .. }));
    }

    #[test]
    fn unrecognised_root_is_rejected() {
        let f = write_json(r#"{"not_segments": 1}"#);
        let err = load_file_as(f.path(), "src/bad2", 0).unwrap_err();
        assert!(matches!(err, InputError::Json { .. }));
    }

    #[test]
    fn missing_avg_logprob_defaults_to_zero() {
        let f = write_json(r#"{"segments": [{"text": "x", "start": 0.0, "end": 1.0}]}"#);
        let doc = load_file_as(f.path(), "src/x", 0).unwrap();
        assert_eq!(doc.segments[0].avg_logprob, 0.0);
    }

    fn char_slice(s: &str, start: i64, len: i64) -> String {
        s.chars().skip(start as usize).take(len as usize).collect()
    }

    proptest! {
        // Offset round-trip: every segment's recorded char_offset must locate
        // it, in full, inside the reconstructed full_text.
        #[test]
        fn offset_round_trip(words in prop::collection::vec("[a-zא-ת]{1,6}", 0..8)) {
            let raw: Vec<RawSegment> = words
                .iter()
                .map(|w| RawSegment { text: w.clone(), start: 0.0, end: 1.0, avg_logprob: None })
                .collect();
            let (full_text, segments) = join_segments(raw);

            for (seg, word) in segments.iter().zip(words.iter()) {
                let len = word.chars().count() as i64;
                prop_assert_eq!(char_slice(&full_text, seg.char_offset, len), word.clone());
            }
        }
    }
}
