//! Corpus directory discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One discovered transcript file: its filesystem path plus the
/// corpus-relative "episode" identity string (`{source}/{leaf}`) the rest
/// of the pipeline uses as the document's episode path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptFile {
    pub path: PathBuf,
    pub episode: String,
}

/// Walk `corpus_dir` for `*.json` transcript files, sorted for deterministic
/// `doc_id` assignment across runs on an unchanged corpus.
pub fn find_transcript_files(corpus_dir: &Path) -> Vec<TranscriptFile> {
    if !corpus_dir.exists() {
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(corpus_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".json") {
            continue;
        }

        let episode = path
            .strip_prefix(corpus_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .trim_end_matches(".json")
            .replace(std::path::MAIN_SEPARATOR, "/");

        files.push(TranscriptFile {
            path: path.to_path_buf(),
            episode,
        });
    }

    files.sort_by(|a, b| a.episode.cmp(&b.episode));
    files
}
