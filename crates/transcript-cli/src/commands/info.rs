//! Info command — reports store statistics and build metadata.

use anyhow::Result;
use serde::Serialize;

use transcript_store::IndexStore;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, json};

#[derive(Serialize)]
struct InfoPayload {
    store: String,
    document_count: i64,
    total_characters: i64,
    built_at: Option<String>,
}

pub fn run(cli: &Cli) -> Result<()> {
    let store = IndexStore::open_read_only(&cli.store)?;
    let (document_count, total_characters) = store.get_document_stats()?;
    let built_at = store.built_at();

    match cli.effective_format() {
        OutputFormat::Human => {
            println!("{}", colors::header("transcript store info"));
            println!();
            println!("  {}: {}", colors::label("store"), cli.store.display());
            println!("  {}: {}", colors::label("documents"), colors::format_count(document_count));
            println!("  {}: {}", colors::label("characters"), colors::format_count(total_characters));
            println!("  {}: {}", colors::label("built at"), built_at.as_deref().unwrap_or("unknown"));
        }

        OutputFormat::Json => {
            let payload = InfoPayload {
                store: cli.store.display().to_string(),
                document_count,
                total_characters,
                built_at,
            };
            println!("{}", json::render(&payload, cli.pretty)?);
        }

        OutputFormat::Minimal => {
            println!("{document_count}\t{total_characters}");
        }
    }

    Ok(())
}
