//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use transcript_core::types::Mode;

/// Full-text search over time-aligned transcripts.
#[derive(Parser, Debug)]
#[command(name = "transcript")]
#[command(version)]
#[command(about = "Build and search the transcript index")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the index store
    #[arg(long, global = true, env = "TRANSCRIPT_STORE_PATH", default_value = "transcripts.db")]
    pub store: PathBuf,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn effective_format(&self) -> OutputFormat {
        self.format
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
    /// Minimal text output (content only)
    Minimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Exact,
    Partial,
    Regex,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Exact => Mode::Exact,
            ModeArg::Partial => Mode::Partial,
            ModeArg::Regex => Mode::Regex,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the index from a corpus directory
    Build {
        /// Directory containing transcript JSON files
        corpus_dir: PathBuf,

        /// Parser worker count (default: min(16, cpu count))
        #[arg(long)]
        parallelism: Option<usize>,
    },

    /// Search the index
    Search {
        /// Search query
        query: String,

        /// Search mode
        #[arg(long, value_enum, default_value = "exact")]
        mode: ModeArg,

        /// Only include episodes on or after this date (YYYY-MM-DD)
        #[arg(long)]
        date_from: Option<String>,

        /// Only include episodes on or before this date (YYYY-MM-DD)
        #[arg(long)]
        date_to: Option<String>,

        /// Restrict to these sources (repeatable)
        #[arg(long = "source")]
        sources: Vec<String>,

        /// Tolerate punctuation between query tokens
        #[arg(long)]
        ignore_punct: bool,

        /// Restrict to hits with any of these position labels (start,end,cross)
        #[arg(long, value_delimiter = ',')]
        position: Option<Vec<String>>,

        /// Maximum hits to return
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Skip this many hits before the returned page
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Show N neighbouring segments of context around each hit
        #[arg(short = 'C', long, default_value = "0")]
        context: i64,
    },

    /// Resolve a single segment
    Segment {
        /// Document uuid (use with --offset)
        #[arg(long)]
        uuid: Option<String>,

        /// Document id (use with --offset or --seg-idx)
        #[arg(long)]
        doc_id: Option<i64>,

        /// Character offset to resolve into a containing segment
        #[arg(long)]
        offset: Option<i64>,

        /// Segment index to resolve directly (use with --doc-id)
        #[arg(long)]
        seg_idx: Option<i64>,
    },

    /// Diagnose the index store
    Doctor,

    /// Report index statistics
    Info,
}
