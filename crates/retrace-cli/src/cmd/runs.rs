use crate::cmd::{fold_log, format_timestamp};
use crate::output::{print_json, print_table};
use std::path::Path;

pub fn run(file: &Path, json: bool) -> anyhow::Result<()> {
    let devtools = fold_log(file)?;
    let runs = devtools.runs();

    if json {
        #[derive(serde::Serialize)]
        struct RunSummary<'a> {
            id: &'a str,
            started: String,
            actions: usize,
            done: usize,
        }

        let summaries: Vec<RunSummary> = runs
            .iter()
            .map(|run| RunSummary {
                id: &run.id,
                started: format_timestamp(run.timestamp),
                actions: run.actions.len(),
                done: run.actions.iter().filter(|action| action.done).count(),
            })
            .collect();
        return print_json(&summaries);
    }

    let rows: Vec<Vec<String>> = runs
        .iter()
        .map(|run| {
            vec![
                run.id.clone(),
                format_timestamp(run.timestamp),
                run.actions.len().to_string(),
                run.actions
                    .iter()
                    .filter(|action| action.done)
                    .count()
                    .to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "STARTED", "ACTIONS", "DONE"], &rows);
    Ok(())
}
