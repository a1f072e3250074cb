use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
    /// Set by external tooling only; no transition in or out is driven here.
    Blocked,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// One task document, stored as `tasks/<ID>.json` under the plan directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    /// Mirrored GitHub issue number. Set at most once, never cleared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_issue: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub completion_criteria: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_cases: Vec<String>,
}

impl Task {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            description: None,
            phase: None,
            status: Status::Pending,
            estimated_hours: None,
            started_at: None,
            completed_at: None,
            actual_hours: None,
            github_issue: None,
            completion_criteria: vec![],
            test_cases: vec![],
        }
    }

    /// Elapsed hours between start and completion, rounded to two decimals.
    /// None when the task was completed without ever being started.
    pub fn elapsed_hours(&self) -> Option<f64> {
        let started = self.started_at?;
        let completed = self.completed_at?;
        let hours = (completed - started).num_seconds() as f64 / 3600.0;
        Some((hours * 100.0).round() / 100.0)
    }
}

/// Lightweight `{id, title, status}` entry mirrored in the tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
    pub status: Status,
}

/// Derived counts over `task_files`. Always recomputed from scratch after a
/// status change, never incrementally patched.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_tasks: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub blocked: usize,
}

/// The aggregate document, stored as `TASK-TRACKER.json` per plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tracker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default)]
    pub active_task: Option<String>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub task_files: Vec<TaskSummary>,
    #[serde(default)]
    pub statistics: Statistics,
}

impl Tracker {
    pub fn new(project_name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            project_name,
            active_task: None,
            last_updated: now,
            task_files: vec![],
            statistics: Statistics::default(),
        }
    }

    /// Sync the summary entry for `id` to `status`. Missing entries are
    /// tolerated; the task document stays authoritative.
    pub fn set_summary_status(&mut self, id: &str, status: Status) {
        if let Some(entry) = self.task_files.iter_mut().find(|t| t.id == id) {
            entry.status = status;
        }
    }

    /// Recount every status bucket from `task_files`.
    pub fn recompute_statistics(&mut self) {
        let mut stats = Statistics {
            total_tasks: self.task_files.len(),
            ..Statistics::default()
        };
        for entry in &self.task_files {
            match entry.status {
                Status::Pending => stats.pending += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Completed => stats.completed += 1,
                Status::Blocked => stats.blocked += 1,
            }
        }
        self.statistics = stats;
    }

    /// First pending summary entry, used for next-step suggestions.
    pub fn next_pending(&self) -> Option<&TaskSummary> {
        self.task_files.iter().find(|t| t.status == Status::Pending)
    }
}
