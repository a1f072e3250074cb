use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

use crate::error::Result;
use crate::model::{Statistics, Task};
use crate::notify;
use crate::output::Format;
use crate::store::plan::PlanStore;
use crate::tracker::TaskTracker;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteResponse<'a> {
    event: &'a str,
    plan: &'a str,
    task: &'a Task,
    statistics: &'a Statistics,
}

pub fn run(repo_root: &Path, id: &str, format: Format) -> Result<()> {
    let store = PlanStore::current(repo_root)?;
    let (notifier, settings) = notify::for_store(&store);
    let engine = TaskTracker::new(&store, notifier.as_ref(), settings.auto_create);

    // Completing a task that is not the active one is allowed, with a nudge.
    let tracker_before = store.read_tracker()?;
    let outcome = engine.complete_task(id, Utc::now())?;

    if outcome.already_completed {
        match format {
            Format::Json => {
                let response = CompleteResponse {
                    event: "already_completed",
                    plan: store.plan(),
                    task: &outcome.task,
                    statistics: &outcome.tracker.statistics,
                };
                println!("{}", serde_json::to_string(&response)?);
            }
            Format::Pretty => {
                println!("task {} is already completed", outcome.task.id.cyan());
            }
            Format::Minimal => println!("already_completed\t{}", outcome.task.id),
        }
        return Ok(());
    }

    if !outcome.was_active
        && format == Format::Pretty
        && let Some(active) = tracker_before.active_task.as_deref()
        && active != id
    {
        println!(
            "{} {} was not the active task ({active} is), completing anyway",
            "note:".yellow().bold(),
            id
        );
    }

    match format {
        Format::Json => {
            let response = CompleteResponse {
                event: "completed",
                plan: store.plan(),
                task: &outcome.task,
                statistics: &outcome.tracker.statistics,
            };
            println!("{}", serde_json::to_string(&response)?);
        }
        Format::Pretty => {
            println!(
                "{} task {}: {}",
                "completed".green().bold(),
                outcome.task.id.cyan(),
                outcome.task.title
            );
            if let Some(actual) = outcome.task.actual_hours {
                print!("  {} {actual}h", "time:".dimmed());
                if let Some(estimated) = outcome.task.estimated_hours {
                    let variance = actual - estimated;
                    if variance.abs() > 0.1 {
                        print!(
                            " ({} estimate by {:.2}h)",
                            if variance > 0.0 { "over" } else { "under" },
                            variance.abs()
                        );
                    }
                }
                println!();
            }
            if let Some(number) = outcome.task.github_issue {
                println!("  {} updated issue #{number}", "github:".dimmed());
            }
            crate::output::print_progress(&outcome.tracker.statistics);
            match outcome.tracker.next_pending() {
                Some(next) => {
                    println!("  {} {}: {}", "next:".dimmed(), next.id, next.title);
                    println!("  run: plangate start {}", next.id);
                }
                None if outcome.tracker.statistics.completed
                    == outcome.tracker.statistics.total_tasks =>
                {
                    println!("  {}", "all tasks completed".green());
                }
                None => {}
            }
        }
        Format::Minimal => {
            println!("completed\t{}\t{}", outcome.task.id, outcome.task.title);
        }
    }
    Ok(())
}
