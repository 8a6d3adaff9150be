use crate::cmd::{fold_log, format_timestamp};
use crate::output::print_json;
use anyhow::bail;
use retrace_core::run::Run;
use retrace_core::tree::ActionNode;
use serde_json::Value;
use std::path::Path;

pub fn run(file: &Path, only: Option<&str>, show_state: bool, json: bool) -> anyhow::Result<()> {
    let devtools = fold_log(file)?;
    let runs: Vec<_> = devtools
        .runs()
        .into_iter()
        .filter(|run| only.map_or(true, |id| run.id == id))
        .collect();

    if let Some(id) = only {
        if runs.is_empty() {
            bail!("run not found: {id}");
        }
    }

    if json {
        return print_json(&runs);
    }

    for run in &runs {
        print_run(run, show_state)?;
    }
    Ok(())
}

fn print_run(run: &Run, show_state: bool) -> anyhow::Result<()> {
    println!(
        "run {}  started {}  ({} top-level actions)",
        run.id,
        format_timestamp(run.timestamp),
        run.actions.len()
    );
    for action in &run.actions {
        print_node(action, 1);
    }
    if show_state {
        match run.latest_state() {
            Some(state) => {
                println!("final state:");
                println!("{}", serde_json::to_string_pretty(state.as_ref())?);
            }
            None => println!("final state: unknown"),
        }
    }
    Ok(())
}

fn print_node(node: &ActionNode, depth: usize) {
    let marker = if node.done { "*" } else { "~" };
    let mut line = format!("{}{} {}", "  ".repeat(depth), marker, node.name);
    if !node.payload.is_null() {
        line.push_str(&format!("  payload={}", summarize(&node.payload)));
    }
    if let Some(result) = &node.result {
        line.push_str(&format!("  result={}", summarize(result)));
    }
    println!("{}", line);
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn summarize(value: &Value) -> String {
    const MAX: usize = 60;
    let text = value.to_string();
    if text.chars().count() <= MAX {
        return text;
    }
    let truncated: String = text.chars().take(MAX).collect();
    format!("{}...", truncated)
}
