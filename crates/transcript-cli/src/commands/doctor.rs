//! Doctor command — diagnoses the index store without panicking on a
//! missing or version-mismatched file.

use anyhow::Result;

use transcript_store::IndexStore;

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

struct Check {
    name: &'static str,
    passed: bool,
    details: String,
}

pub fn run(cli: &Cli) -> Result<()> {
    let mut checks = Vec::new();

    let store_exists = cli.store.exists();
    checks.push(Check {
        name: "store file",
        passed: store_exists,
        details: if store_exists {
            format!("found at {}", cli.store.display())
        } else {
            format!("not found at {}", cli.store.display())
        },
    });

    let store = if store_exists { IndexStore::open_read_only(&cli.store).ok() } else { None };
    checks.push(Check {
        name: "store opens",
        passed: store.is_some(),
        details: if store.is_some() {
            "opened read-only, schema version matches".to_string()
        } else if store_exists {
            "failed to open (schema mismatch or corruption?)".to_string()
        } else {
            "skipped: no store file".to_string()
        },
    });

    if let Some(store) = &store {
        match store.get_document_stats() {
            Ok((doc_count, total_chars)) => checks.push(Check {
                name: "has data",
                passed: doc_count > 0,
                details: format!(
                    "{} document(s), {} character(s)",
                    colors::format_count(doc_count),
                    colors::format_count(total_chars)
                ),
            }),
            Err(err) => checks.push(Check { name: "has data", passed: false, details: format!("query failed: {err}") }),
        }

        checks.push(Check {
            name: "build metadata",
            passed: store.built_at().is_some(),
            details: store.built_at().unwrap_or_else(|| "missing".to_string()),
        });
    }

    let all_passed = checks.iter().all(|c| c.passed);

    match cli.effective_format() {
        OutputFormat::Human => {
            println!("{}", colors::header("transcript store doctor"));
            println!();
            for check in &checks {
                let status = if check.passed { colors::success(check.name) } else { colors::error(check.name) };
                println!("  {status} - {}", check.details);
            }
            println!();
            if all_passed {
                println!("{}", colors::success("all checks passed"));
            } else {
                println!("{}", colors::error("some checks failed"));
            }
        }

        OutputFormat::Json => {
            let payload = serde_json::json!({
                "checks": checks.iter().map(|c| serde_json::json!({
                    "name": c.name,
                    "passed": c.passed,
                    "details": c.details,
                })).collect::<Vec<_>>(),
                "all_passed": all_passed,
            });
            println!("{}", crate::output::json::render(&payload, cli.pretty)?);
        }

        OutputFormat::Minimal => {
            if all_passed {
                println!("ok");
            } else {
                for check in checks.iter().filter(|c| !c.passed) {
                    println!("FAIL: {}", check.name);
                }
            }
        }
    }

    Ok(())
}
