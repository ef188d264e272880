//! transcript-cli — build and search the transcript index.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Build { corpus_dir, parallelism } => commands::build::run(&cli, corpus_dir, *parallelism),

        Command::Search { query, mode, date_from, date_to, sources, ignore_punct, position, limit, offset, context } => {
            commands::search::run(
                &cli,
                query,
                *mode,
                date_from.as_deref(),
                date_to.as_deref(),
                sources,
                *ignore_punct,
                position.as_deref(),
                *limit,
                *offset,
                *context,
            )
        }

        Command::Segment { uuid, doc_id, offset, seg_idx } => {
            commands::segment::run(&cli, uuid.as_deref(), *doc_id, *offset, *seg_idx)
        }

        Command::Doctor => commands::doctor::run(&cli),

        Command::Info => commands::info::run(&cli),
    }
}
