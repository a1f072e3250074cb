//! Task-to-issue text mapping. Pure string building, no I/O.

use crate::model::{Status, Task};

pub fn issue_title(task: &Task) -> String {
    format!("[{}] {}", task.id, task.title)
}

pub fn issue_body(task: &Task) -> String {
    let mut body = String::new();
    if let Some(ref desc) = task.description {
        body.push_str(desc);
        body.push_str("\n\n");
    }
    if let Some(ref phase) = task.phase {
        body.push_str(&format!("**Phase:** {phase}\n"));
    }
    if let Some(estimate) = task.estimated_hours {
        body.push_str(&format!("**Estimate:** {estimate}h\n"));
    }
    if !task.completion_criteria.is_empty() {
        body.push_str("\n**Completion criteria:**\n");
        for criterion in &task.completion_criteria {
            body.push_str(&format!("- [ ] {criterion}\n"));
        }
    }
    if !task.test_cases.is_empty() {
        body.push_str("\n**Test cases:**\n");
        for case in &task.test_cases {
            body.push_str(&format!("- {case}\n"));
        }
    }
    body
}

pub fn status_labels(task: &Task) -> Vec<String> {
    let mut labels = vec!["plangate".to_string(), format!("status:{}", task.status)];
    if let Some(ref phase) = task.phase {
        labels.push(format!("phase:{phase}"));
    }
    labels
}

/// Human-readable summary posted when a task completes: the status
/// transition, time taken, and estimate variance when an estimate exists.
pub fn completion_comment(task: &Task, previous: Status) -> String {
    let mut comment = format!("Task completed.\n\n**Status:** {previous} -> completed\n");

    if let Some(actual) = task.actual_hours {
        comment.push_str(&format!("**Time taken:** {actual}h"));
        if let Some(estimated) = task.estimated_hours
            && estimated > 0.0
        {
            let variance = actual - estimated;
            let percent = variance / estimated * 100.0;
            comment.push_str(&format!(
                " (estimated: {estimated}h, {}{:.1}%)",
                if variance > 0.0 { "+" } else { "" },
                percent
            ));
        }
        comment.push('\n');
    }

    if !task.completion_criteria.is_empty() {
        comment.push_str("\n**Completion criteria:**\n");
        for criterion in &task.completion_criteria {
            comment.push_str(&format!("- [x] {criterion}\n"));
        }
    }

    comment
}

pub fn merge_comment(task_id: &str) -> String {
    format!("Merged to the default branch. Task {task_id} has been integrated.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        let mut task = Task::new("TASK-003".into(), "Wire up auth".into());
        task.description = Some("OAuth flow".into());
        task.phase = Some("backend".into());
        task.completion_criteria = vec!["tokens refresh".into(), "logout works".into()];
        task.test_cases = vec!["expired token".into()];
        task
    }

    #[test]
    fn title_carries_task_id() {
        assert_eq!(issue_title(&task()), "[TASK-003] Wire up auth");
    }

    #[test]
    fn body_lists_criteria_as_checklist() {
        let body = issue_body(&task());
        assert!(body.starts_with("OAuth flow"));
        assert!(body.contains("**Phase:** backend"));
        assert!(body.contains("- [ ] tokens refresh"));
        assert!(body.contains("- [ ] logout works"));
        assert!(body.contains("- expired token"));
    }

    #[test]
    fn labels_track_status_and_phase() {
        let mut t = task();
        t.status = Status::InProgress;
        let labels = status_labels(&t);
        assert!(labels.contains(&"status:in_progress".to_string()));
        assert!(labels.contains(&"phase:backend".to_string()));
    }

    #[test]
    fn completion_comment_includes_variance_when_estimated() {
        let mut t = task();
        t.status = Status::Completed;
        t.actual_hours = Some(3.0);
        t.estimated_hours = Some(2.0);

        let comment = completion_comment(&t, Status::InProgress);
        assert!(comment.contains("in_progress -> completed"));
        assert!(comment.contains("**Time taken:** 3h"));
        assert!(comment.contains("estimated: 2h, +50.0%"));
        assert!(comment.contains("- [x] tokens refresh"));
    }

    #[test]
    fn completion_comment_omits_time_without_actual_hours() {
        let mut t = task();
        t.status = Status::Completed;
        let comment = completion_comment(&t, Status::Pending);
        assert!(!comment.contains("Time taken"));
    }
}
