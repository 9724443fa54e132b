use fslx::{FslxError, RunSummary};

/// Print a fatal error, with a hint when the fix is obvious.
pub fn report_error(error: &FslxError) {
    match error {
        FslxError::ToolNotFound { tool } => {
            eprintln!("`{tool}` was not found on PATH.");
            eprintln!();
            eprintln!("fslx only wraps FSL, it does not ship it. Check that FSL is");
            eprintln!("installed and that its bin directory is on your PATH.");
        }
        _ => {
            eprintln!("{error}");
        }
    }
}

/// Print per-input results: notes and output paths for successes, then a
/// summary naming every failed input.
pub fn report_summary(summary: &RunSummary) {
    for outcome in summary.outcomes() {
        if let Ok(success) = &outcome.result {
            if let Some(note) = &success.note {
                println!("{}: {note}", outcome.input.display());
            } else if let Some(output) = &success.output {
                println!("{} -> {}", outcome.input.display(), output.display());
            }
        }
    }

    let failures: Vec<_> = summary.failures().collect();
    if !failures.is_empty() {
        eprintln!();
        eprintln!("{} of {} inputs failed:", failures.len(), summary.outcomes().len());
        for (input, error) in failures {
            eprintln!("  {}: {error}", input.display());
        }
    }
}
