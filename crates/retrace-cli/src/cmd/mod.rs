pub mod replay;
pub mod runs;

use anyhow::Context;
use retrace_core::event::RuntimeEvent;
use retrace_core::Devtools;
use std::path::Path;

/// Parse a JSONL event log and fold it through a fresh engine. Malformed
/// lines fail with their line number; inconsistent events are the engine's
/// business and never fail the fold.
pub fn fold_log(file: &Path) -> anyhow::Result<Devtools> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut devtools = Devtools::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: RuntimeEvent = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: malformed event", file.display(), number + 1))?;
        devtools
            .dispatch(event)
            .with_context(|| format!("{}:{}: failed to apply event", file.display(), number + 1))?;
    }
    Ok(devtools)
}

pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}
