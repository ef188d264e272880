//! transcript-loader - turns one transcript JSON file into a loaded document
//! (full text + segment rows + path-derived metadata), and discovers a
//! corpus directory's transcript files.

pub mod discovery;
pub mod parser;

pub use discovery::{find_transcript_files, TranscriptFile};
pub use parser::{load_file, load_file_as, LoadedDocument, LoadedSegment};
