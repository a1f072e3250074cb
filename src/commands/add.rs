use std::path::Path;

use chrono::Utc;

use crate::error::{PlanError, Result};
use crate::model::{Task, TaskSummary};
use crate::output::{self, Format};
use crate::store::plan::PlanStore;

pub struct NewTask {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub phase: Option<String>,
    pub estimated_hours: Option<f64>,
    pub completion_criteria: Vec<String>,
    pub test_cases: Vec<String>,
}

/// Create a pending task document plus its tracker summary entry.
pub fn run(repo_root: &Path, new: NewTask, format: Format) -> Result<()> {
    validate_id(&new.id)?;

    let store = PlanStore::current(repo_root)?;
    let mut tracker = store.read_tracker()?;
    if store.task_exists(&new.id) {
        return Err(PlanError::TaskExists(new.id));
    }

    let mut task = Task::new(new.id, new.title);
    task.description = new.description;
    task.phase = new.phase;
    task.estimated_hours = new.estimated_hours;
    task.completion_criteria = new.completion_criteria;
    task.test_cases = new.test_cases;

    store.write_task(&task)?;

    tracker.task_files.push(TaskSummary {
        id: task.id.clone(),
        title: task.title.clone(),
        status: task.status,
    });
    tracker.last_updated = Utc::now();
    tracker.recompute_statistics();
    store.write_tracker(&tracker)?;

    output::print_task(&task, format)
}

/// Task ids become file names; keep them to a safe alphabet.
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(PlanError::InvalidTaskId(
            id.to_string(),
            "task id cannot be empty".into(),
        ));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(PlanError::InvalidTaskId(
            id.to_string(),
            "only ASCII letters, digits, '-' and '_' are allowed".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use tempfile::tempdir;

    fn new_task(id: &str) -> NewTask {
        NewTask {
            id: id.into(),
            title: format!("Task {id}"),
            description: None,
            phase: None,
            estimated_hours: None,
            completion_criteria: vec![],
            test_cases: vec![],
        }
    }

    #[test]
    fn add_creates_document_and_summary() {
        let dir = tempdir().unwrap();
        let store = PlanStore::create(dir.path(), "sprint-1", None, Utc::now()).unwrap();

        run(dir.path(), new_task("TASK-001"), Format::Minimal).unwrap();

        let task = store.read_task("TASK-001").unwrap();
        assert_eq!(task.status, Status::Pending);

        let tracker = store.read_tracker().unwrap();
        assert_eq!(tracker.task_files.len(), 1);
        assert_eq!(tracker.statistics.total_tasks, 1);
        assert_eq!(tracker.statistics.pending, 1);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let dir = tempdir().unwrap();
        PlanStore::create(dir.path(), "sprint-1", None, Utc::now()).unwrap();

        run(dir.path(), new_task("TASK-001"), Format::Minimal).unwrap();
        let err = run(dir.path(), new_task("TASK-001"), Format::Minimal).unwrap_err();
        assert!(matches!(err, PlanError::TaskExists(_)));
    }

    #[test]
    fn add_rejects_unsafe_ids() {
        let dir = tempdir().unwrap();
        PlanStore::create(dir.path(), "sprint-1", None, Utc::now()).unwrap();

        for bad in ["", "../evil", "a/b", "a b"] {
            let err = run(dir.path(), new_task(bad), Format::Minimal).unwrap_err();
            assert!(matches!(err, PlanError::InvalidTaskId(_, _)), "{bad}");
        }
    }

    #[test]
    fn add_requires_active_plan() {
        let dir = tempdir().unwrap();
        let err = run(dir.path(), new_task("TASK-001"), Format::Minimal).unwrap_err();
        assert!(matches!(err, PlanError::NoActivePlan));
    }
}
