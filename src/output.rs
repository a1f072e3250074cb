use clap::ValueEnum;
use colored::Colorize;

use crate::error::Result;
use crate::model::{Statistics, Task, TaskSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

/// Non-fatal problem (notification failures and the like): logged to stderr,
/// never an exit code.
pub fn warn(message: &str) {
    eprintln!("{} {message}", "warning:".yellow().bold());
}

pub fn print_task(task: &Task, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(task)?),
        Format::Pretty => {
            println!(
                "{} {} ({})",
                format!("[{}]", task.id).cyan().bold(),
                task.title,
                status_colored(task)
            );
            if let Some(ref desc) = task.description {
                println!("  {desc}");
            }
            if let Some(ref phase) = task.phase {
                println!("  {} {phase}", "phase:".dimmed());
            }
            if let Some(estimate) = task.estimated_hours {
                println!("  {} {estimate}h", "estimate:".dimmed());
            }
            if let Some(actual) = task.actual_hours {
                println!("  {} {actual}h", "actual:".dimmed());
            }
            if let Some(number) = task.github_issue {
                println!("  {} #{number}", "issue:".dimmed());
            }
            if !task.completion_criteria.is_empty() {
                println!("  {}", "completion criteria:".dimmed());
                for (i, criterion) in task.completion_criteria.iter().enumerate() {
                    println!("    {}. {criterion}", i + 1);
                }
            }
            if !task.test_cases.is_empty() {
                println!("  {}", "test cases:".dimmed());
                for (i, case) in task.test_cases.iter().enumerate() {
                    println!("    {}. {case}", i + 1);
                }
            }
        }
        Format::Minimal => {
            println!("{}\t{}\t{}", task.id, task.status, task.title);
        }
    }
    Ok(())
}

fn status_colored(task: &Task) -> String {
    use crate::model::Status;
    match task.status {
        Status::Pending => task.status.to_string().yellow().to_string(),
        Status::InProgress => task.status.to_string().green().to_string(),
        Status::Completed => task.status.to_string().dimmed().to_string(),
        Status::Blocked => task.status.to_string().red().to_string(),
    }
}

pub fn print_summaries(summaries: &[TaskSummary], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(summaries)?),
        Format::Pretty => {
            for entry in summaries {
                println!(
                    "{} {:12} {}",
                    format!("[{}]", entry.id).cyan(),
                    entry.status.to_string(),
                    entry.title
                );
            }
        }
        Format::Minimal => {
            for entry in summaries {
                println!("{}\t{}\t{}", entry.id, entry.status, entry.title);
            }
        }
    }
    Ok(())
}

pub fn print_progress(stats: &Statistics) {
    println!(
        "  {} {}/{} completed, {} in progress, {} pending, {} blocked",
        "progress:".dimmed(),
        stats.completed,
        stats.total_tasks,
        stats.in_progress,
        stats.pending,
        stats.blocked
    );
}
