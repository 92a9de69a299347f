//! Console / JSON reporting for a finished run.

use std::io::{self, Write};
use std::path::Path;

use shelfmark_resolve::model::MatchResult;

use crate::apply::ApplyOutcome;
use crate::CliError;

/// Emit the run report. `--output` writes JSON to a file, `--json`
/// replaces the human summary with JSON on stdout.
pub fn emit(
    result: &MatchResult,
    apply: Option<&ApplyOutcome>,
    apply_mode: bool,
    json: bool,
    output: Option<&Path>,
) -> Result<(), CliError> {
    if json || output.is_some() {
        let mut doc = serde_json::to_value(result)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        if let Some(outcome) = apply {
            doc["apply"] = serde_json::to_value(outcome)
                .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        }
        let json_str = serde_json::to_string_pretty(&doc)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

        if let Some(path) = output {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json {
            println!("{json_str}");
            return Ok(());
        }
    }

    print_human(result, apply, apply_mode).map_err(|e| CliError::io(e.to_string()))
}

fn print_human(
    result: &MatchResult,
    apply: Option<&ApplyOutcome>,
    apply_mode: bool,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let s = &result.summary;
    writeln!(out, "mode: {}", if apply_mode { "APPLY" } else { "DRY RUN" })?;
    writeln!(out)?;
    writeln!(out, "matched by identifier: {}", s.by_identifier)?;
    writeln!(out, "matched by exact text: {}", s.by_exact_text)?;
    writeln!(out, "matched by fuzzy text: {}", s.by_fuzzy_text)?;
    writeln!(out, "total matched:         {} / {}", s.matched, s.total_records)?;
    writeln!(out, "unmatched:             {}", s.unmatched)?;

    if !result.unmatched.is_empty() {
        writeln!(out)?;
        writeln!(out, "unmatched records:")?;
        for record in &result.unmatched {
            writeln!(out, "  {} — {}", record.title, record.author)?;
        }
    }

    writeln!(out)?;
    match apply {
        Some(outcome) => {
            writeln!(out, "applied: {}", outcome.applied)?;
            if !outcome.failed.is_empty() {
                writeln!(out, "failed:  {}", outcome.failed.len())?;
                for failure in &outcome.failed {
                    writeln!(out, "  {} ({}): {}", failure.title, failure.item_id, failure.error)?;
                }
            }
        }
        None if s.matched > 0 => {
            writeln!(
                out,
                "would mark {} item(s) finished — run with --apply to write",
                s.matched
            )?;
        }
        None => {}
    }

    Ok(())
}
