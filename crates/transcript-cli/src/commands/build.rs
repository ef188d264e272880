//! Build command — runs the Bulk Writer end to end.

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Instant;

use transcript_indexer::{build_index, BuildOptions};

use crate::cli::Cli;
use crate::output::colors;

pub fn run(cli: &Cli, corpus_dir: &PathBuf, parallelism: Option<usize>) -> Result<()> {
    if cli.store.exists() {
        bail!(
            "store already exists at {}; rebuilds must target a fresh path",
            cli.store.display()
        );
    }

    let opts = BuildOptions {
        corpus_dir: corpus_dir.clone(),
        output_path: cli.store.clone(),
        worker_threads: parallelism,
    };

    let start = Instant::now();
    let outcome = build_index(&opts, |path, done, total| {
        eprint!("\r{} {done}/{total}: {path}          ", colors::label("indexing"));
    })?;
    eprintln!();

    let elapsed = start.elapsed();
    println!("{}", colors::success("build complete"));
    println!("  documents indexed: {}", colors::format_count(outcome.documents_indexed as i64));
    println!("  documents skipped: {}", colors::format_count(outcome.documents_skipped as i64));
    println!("  segments indexed:  {}", colors::format_count(outcome.segments_indexed as i64));
    println!("  elapsed: {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
