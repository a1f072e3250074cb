use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::error::Result;
use crate::model::{Statistics, Task};
use crate::output::{self, Format};
use crate::store::plan::PlanStore;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse<'a> {
    plan: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_task: Option<&'a Task>,
    statistics: &'a Statistics,
}

/// Show the active plan, the active task (if any) and the status counts.
pub fn run(repo_root: &Path, format: Format) -> Result<()> {
    let store = PlanStore::current(repo_root)?;
    let tracker = store.read_tracker()?;

    // The summary entry may outlive its document; tolerate a missing file.
    let active = tracker
        .active_task
        .as_deref()
        .and_then(|id| store.read_task(id).ok());

    match format {
        Format::Json => {
            let response = StatusResponse {
                plan: store.plan(),
                project_name: tracker.project_name.as_deref(),
                active_task: active.as_ref(),
                statistics: &tracker.statistics,
            };
            println!("{}", serde_json::to_string(&response)?);
        }
        Format::Pretty => {
            println!("{} {}", "plan:".dimmed(), store.plan().cyan());
            if let Some(ref project) = tracker.project_name {
                println!("{} {project}", "project:".dimmed());
            }
            match active {
                Some(ref task) => {
                    println!("{}", "active task:".dimmed());
                    output::print_task(task, Format::Pretty)?;
                }
                None => println!("{} none (run: plangate start <TASK-ID>)", "active task:".dimmed()),
            }
            output::print_progress(&tracker.statistics);
            if let Some(next) = tracker.next_pending() {
                println!("  {} {}: {}", "next:".dimmed(), next.id, next.title);
            }
        }
        Format::Minimal => {
            println!(
                "{}\t{}\t{}/{}",
                store.plan(),
                tracker.active_task.as_deref().unwrap_or("-"),
                tracker.statistics.completed,
                tracker.statistics.total_tasks
            );
        }
    }
    Ok(())
}
