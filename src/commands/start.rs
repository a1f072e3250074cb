use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

use crate::error::{PlanError, Result};
use crate::model::{Statistics, Task};
use crate::notify;
use crate::output::{self, Format};
use crate::store::plan::PlanStore;
use crate::tracker::TaskTracker;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartResponse<'a> {
    event: &'a str,
    plan: &'a str,
    task: &'a Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    paused: Option<&'a str>,
    statistics: &'a Statistics,
}

pub fn run(repo_root: &Path, id: &str, format: Format) -> Result<()> {
    let store = PlanStore::current(repo_root)?;
    let (notifier, settings) = notify::for_store(&store);
    let engine = TaskTracker::new(&store, notifier.as_ref(), settings.auto_create);

    let outcome = match engine.start_task(id, Utc::now()) {
        Err(err @ PlanError::TaskNotFound(_)) => {
            // Help the caller pick a real task (original hook behavior).
            if format != Format::Json
                && let Ok(tracker) = store.read_tracker()
                && !tracker.task_files.is_empty()
            {
                eprintln!("available tasks:");
                for entry in &tracker.task_files {
                    eprintln!("  {}: {} [{}]", entry.id, entry.title, entry.status);
                }
            }
            return Err(err);
        }
        other => other?,
    };

    match format {
        Format::Json => {
            let response = StartResponse {
                event: "started",
                plan: store.plan(),
                task: &outcome.task,
                paused: outcome.paused.as_ref().map(|t| t.id.as_str()),
                statistics: &outcome.tracker.statistics,
            };
            println!("{}", serde_json::to_string(&response)?);
        }
        Format::Pretty => {
            if let Some(ref paused) = outcome.paused {
                println!(
                    "{} paused {}: {}",
                    "note:".yellow().bold(),
                    paused.id,
                    paused.title
                );
            }
            println!("{} task {}", "started".green().bold(), outcome.task.id.cyan());
            println!("  {} {}", "plan:".dimmed(), store.plan());
            output::print_task(&outcome.task, Format::Pretty)?;
            if let Some(number) = outcome.issue_created {
                println!("  {} created issue #{number}", "github:".dimmed());
            }
            output::print_progress(&outcome.tracker.statistics);
            println!("  when finished: plangate complete {}", outcome.task.id);
        }
        Format::Minimal => {
            println!("started\t{}\t{}", outcome.task.id, outcome.task.title);
        }
    }
    Ok(())
}
