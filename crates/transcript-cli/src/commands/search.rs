//! Search command — runs the Search Service and renders hits.

use anyhow::{bail, Result};
use serde::Serialize;
use std::str::FromStr;

use transcript_core::types::{EnrichedHit, Hit, Mode, PositionLabel, PositionSet, SegmentRecord};
use transcript_search::{SearchRequest, SearchService};
use transcript_store::IndexStore;

use crate::cli::{Cli, ModeArg, OutputFormat};
use crate::output::{colors, human, json, minimal};

#[allow(clippy::too_many_arguments)]
pub fn run(
    cli: &Cli,
    query: &str,
    mode: ModeArg,
    date_from: Option<&str>,
    date_to: Option<&str>,
    sources: &[String],
    ignore_punct: bool,
    position: Option<&[String]>,
    limit: Option<usize>,
    offset: usize,
    context: i64,
) -> Result<()> {
    let store = IndexStore::open_read_only(&cli.store)?;
    let service = SearchService::new(&store);

    let position_filters = match position {
        Some(labels) => Some(parse_position_filters(labels)?),
        None => None,
    };

    let mut request = SearchRequest::new(query, Mode::from(mode));
    request.date_from = date_from.map(str::to_string);
    request.date_to = date_to.map(str::to_string);
    request.sources = sources.to_vec();
    request.ignore_punct = ignore_punct;
    request.position_filters = position_filters;
    request.limit = limit;
    request.offset = offset;

    let outcome = service.search(&request)?;

    let windows: Vec<Vec<SegmentRecord>> = if context > 0 {
        outcome
            .hits
            .iter()
            .map(|hit| service.context_window(Hit { doc_id: hit.doc_id, char_offset: hit.char_offset }, context))
            .collect::<Result<_, _>>()?
    } else {
        Vec::new()
    };

    match cli.effective_format() {
        OutputFormat::Human => {
            if outcome.hits.is_empty() {
                println!("no results for {query:?}");
            } else {
                println!("{}", colors::label(&format!("{} hit(s)", outcome.hits.len())));
                println!();
                for (i, hit) in outcome.hits.iter().enumerate() {
                    println!("{}", human::format_hit(hit, query));
                    if let Some(window) = windows.get(i) {
                        for seg in window {
                            if seg.segment_id != hit.segment_id {
                                println!("{}", human::format_segment(seg));
                            }
                        }
                    }
                    println!();
                }
                if outcome.has_more {
                    println!("{}", colors::label("... more results available, raise --limit or --offset"));
                }
            }
        }

        OutputFormat::Json => {
            let payload = SearchResultPayload { hits: &outcome.hits, has_more: outcome.has_more };
            println!("{}", json::render(&payload, cli.pretty)?);
        }

        OutputFormat::Minimal => {
            for hit in &outcome.hits {
                println!("{}", minimal::format_hit(hit));
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct SearchResultPayload<'a> {
    hits: &'a [EnrichedHit],
    has_more: bool,
}

fn parse_position_filters(labels: &[String]) -> Result<PositionSet> {
    let mut set = PositionSet::new();
    for label in labels {
        match PositionLabel::from_str(label.trim()) {
            Ok(l) => {
                set.insert(l);
            }
            Err(_) => bail!("unknown position label: {label} (expected start, end, or cross)"),
        }
    }
    Ok(set)
}
