//! Segment command — ad hoc Segment Resolver lookups.

use anyhow::{bail, Result};

use transcript_store::IndexStore;

use crate::cli::{Cli, OutputFormat};
use crate::output::{human, json, minimal};

pub fn run(
    cli: &Cli,
    uuid: Option<&str>,
    doc_id: Option<i64>,
    offset: Option<i64>,
    seg_idx: Option<i64>,
) -> Result<()> {
    let store = IndexStore::open_read_only(&cli.store)?;

    let resolved_doc_id = match (doc_id, uuid) {
        (Some(id), _) => id,
        (None, Some(u)) => store.get_doc_id_by_uuid(u)?,
        (None, None) => bail!("specify either --doc-id or --uuid"),
    };

    let segment = match (offset, seg_idx) {
        (Some(o), _) => store.get_segment_at_offset(resolved_doc_id, o)?,
        (None, Some(idx)) => {
            let all = store.get_segments_by_ids(&[(resolved_doc_id, idx)])?;
            all.into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("no segment {idx} in document {resolved_doc_id}"))?
        }
        (None, None) => bail!("specify either --offset or --seg-idx"),
    };

    match cli.effective_format() {
        OutputFormat::Human => println!("{}", human::format_segment(&segment)),
        OutputFormat::Json => println!("{}", json::render(&segment, cli.pretty)?),
        OutputFormat::Minimal => println!("{}", minimal::format_segment(&segment)),
    }

    Ok(())
}
