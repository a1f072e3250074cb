use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::store::plan::PlanStore;

/// Print one task document.
pub fn run(repo_root: &Path, id: &str, format: Format) -> Result<()> {
    let store = PlanStore::current(repo_root)?;
    let task = store.read_task(id)?;
    output::print_task(&task, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::{self, NewTask};
    use crate::error::PlanError;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn show_prints_an_existing_task() {
        let dir = tempdir().unwrap();
        PlanStore::create(dir.path(), "sprint-1", None, Utc::now()).unwrap();
        add::run(
            dir.path(),
            NewTask {
                id: "TASK-001".into(),
                title: "A task".into(),
                description: Some("details".into()),
                phase: Some("backend".into()),
                estimated_hours: Some(2.0),
                completion_criteria: vec!["compiles".into()],
                test_cases: vec!["unit".into()],
            },
            Format::Minimal,
        )
        .unwrap();

        for format in [Format::Json, Format::Pretty, Format::Minimal] {
            run(dir.path(), "TASK-001", format).unwrap();
        }
    }

    #[test]
    fn show_surfaces_unknown_task() {
        let dir = tempdir().unwrap();
        PlanStore::create(dir.path(), "sprint-1", None, Utc::now()).unwrap();
        let err = run(dir.path(), "TASK-404", Format::Minimal).unwrap_err();
        assert!(matches!(err, PlanError::TaskNotFound(_)));
    }
}
