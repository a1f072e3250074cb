use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::error::Result;
use crate::git;
use crate::notify;
use crate::output::Format;
use crate::store::plan::PlanStore;
use crate::tracker::{SweepOutcome, TaskTracker};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SweepResponse<'a> {
    event: &'a str,
    closed: Vec<ClosedIssue<'a>>,
    skipped: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClosedIssue<'a> {
    task: &'a str,
    issue: u64,
}

/// Close mirrored issues for completed tasks.
///
/// With explicit ids this is a strict command: a missing plan or tracker is an
/// error. With no ids it runs as the post-merge hook, deriving ids from the
/// last merge on main/master, and every unmet precondition (no plan, no
/// github config, autoClose off, feature branch, no ids in the merge) is a
/// quiet success so the hook never breaks a merge.
pub fn run(repo_root: &Path, ids: &[String], format: Format) -> Result<()> {
    if !ids.is_empty() {
        let store = PlanStore::current(repo_root)?;
        let (notifier, settings) = notify::for_store(&store);
        let engine = TaskTracker::new(&store, notifier.as_ref(), settings.auto_create);
        let outcome = engine.close_merged(ids)?;
        return print_outcome(&outcome, format);
    }

    let Ok(store) = PlanStore::current(repo_root) else {
        return print_outcome(&SweepOutcome::default(), format);
    };
    let (notifier, settings) = notify::for_store(&store);
    if !notifier.is_configured() || !settings.auto_close {
        return print_outcome(&SweepOutcome::default(), format);
    }
    let merged = git::merged_task_ids(repo_root);
    if merged.is_empty() {
        return print_outcome(&SweepOutcome::default(), format);
    }

    let engine = TaskTracker::new(&store, notifier.as_ref(), settings.auto_create);
    let outcome = engine.close_merged(&merged)?;
    print_outcome(&outcome, format)
}

fn print_outcome(outcome: &SweepOutcome, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let response = SweepResponse {
                event: "swept",
                closed: outcome
                    .closed
                    .iter()
                    .map(|(task, issue)| ClosedIssue { task, issue: *issue })
                    .collect(),
                skipped: &outcome.skipped,
            };
            println!("{}", serde_json::to_string(&response)?);
        }
        Format::Pretty => {
            if outcome.closed.is_empty() && outcome.skipped.is_empty() {
                println!("{}", "nothing to sweep".dimmed());
            }
            for (task, issue) in &outcome.closed {
                println!("{} issue #{issue} for {}", "closed".green().bold(), task.cyan());
            }
            for task in &outcome.skipped {
                println!("{} {task}", "skipped".dimmed());
            }
        }
        Format::Minimal => {
            for (task, issue) in &outcome.closed {
                println!("closed\t{task}\t{issue}");
            }
            for task in &outcome.skipped {
                println!("skipped\t{task}");
            }
        }
    }
    Ok(())
}
