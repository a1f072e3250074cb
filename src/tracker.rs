//! The task-tracker state machine.
//!
//! Transitions for a single task:
//!
//! ```text
//! pending --start--> in_progress --complete--> completed (terminal)
//! in_progress --(another task starts)--> pending
//! ```
//!
//! `blocked` is tolerated on read but never entered or left here. Every
//! mutation rewrites the task document and the tracker aggregate in full and
//! recomputes `statistics` from scratch. Local writes happen before any
//! notifier call, so a failed or hung notification can neither prevent nor
//! revert a state change.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{PlanError, Result};
use crate::model::{Status, Task, Tracker};
use crate::notify::{IssueNotifier, mapper};
use crate::output;
use crate::store::plan::{self, PlanStore};

pub struct TaskTracker<'a> {
    store: &'a PlanStore,
    notifier: &'a dyn IssueNotifier,
    /// Create a mirrored issue on first start (github config `autoCreate`).
    auto_create: bool,
}

#[derive(Debug)]
pub struct StartOutcome {
    pub task: Task,
    pub tracker: Tracker,
    /// Task demoted to pending by pause-on-switch, if any.
    pub paused: Option<Task>,
    /// Issue number created during this start, if any.
    pub issue_created: Option<u64>,
}

#[derive(Debug)]
pub struct CompleteOutcome {
    pub task: Task,
    pub tracker: Tracker,
    /// True when the task was already completed and nothing was written.
    pub already_completed: bool,
    /// True when the completed task was the active one.
    pub was_active: bool,
}

#[derive(Debug, Default)]
pub struct SweepOutcome {
    /// `(task_id, issue_number)` pairs whose issues were closed.
    pub closed: Vec<(String, u64)>,
    /// Ids skipped: missing document, not completed, or no mirrored issue.
    pub skipped: Vec<String>,
}

impl<'a> TaskTracker<'a> {
    pub fn new(store: &'a PlanStore, notifier: &'a dyn IssueNotifier, auto_create: bool) -> Self {
        Self {
            store,
            notifier,
            auto_create,
        }
    }

    /// Activate a task, pausing whichever task was active before.
    pub fn start_task(&self, id: &str, now: DateTime<Utc>) -> Result<StartOutcome> {
        let mut tracker = self.store.read_tracker()?;
        let mut task = self.store.read_task(id)?;

        if task.status == Status::Completed {
            return Err(PlanError::InvalidTransition(
                Status::Completed.to_string(),
                Status::InProgress.to_string(),
            ));
        }

        // Pause-on-switch: demote the currently active task back to pending.
        // A missing document or a status other than in_progress is tolerated;
        // completed tasks are never touched.
        let mut paused = None;
        if let Some(active_id) = tracker.active_task.clone()
            && active_id != id
            && let Ok(mut active) = self.store.read_task(&active_id)
            && active.status == Status::InProgress
        {
            active.status = Status::Pending;
            self.store.write_task(&active)?;
            tracker.set_summary_status(&active_id, Status::Pending);
            paused = Some(active);
        }

        task.status = Status::InProgress;
        if task.started_at.is_none() {
            task.started_at = Some(now);
        }

        tracker.active_task = Some(id.to_string());
        tracker.set_summary_status(id, Status::InProgress);
        tracker.last_updated = now;
        tracker.recompute_statistics();

        self.store.write_task(&task)?;
        self.store.write_tracker(&tracker)?;

        let issue_created = self.mirror_start(&mut task)?;

        Ok(StartOutcome {
            task,
            tracker,
            paused,
            issue_created,
        })
    }

    /// Best-effort issue creation after the local write. A created number is
    /// stamped onto the task (set once, never cleared) with a second write.
    fn mirror_start(&self, task: &mut Task) -> Result<Option<u64>> {
        if !self.notifier.is_configured() || !self.auto_create || task.github_issue.is_some() {
            return Ok(None);
        }
        match self.notifier.create_issue(
            &mapper::issue_title(task),
            &mapper::issue_body(task),
            &mapper::status_labels(task),
        ) {
            Ok(Some(number)) => {
                task.github_issue = Some(number);
                self.store.write_task(task)?;
                Ok(Some(number))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                output::warn(&format!("issue creation failed: {e}"));
                Ok(None)
            }
        }
    }

    /// Complete a task. Idempotent: completing a completed task is a no-op
    /// that reports `already_completed` without re-stamping anything.
    pub fn complete_task(&self, id: &str, now: DateTime<Utc>) -> Result<CompleteOutcome> {
        let mut tracker = self.store.read_tracker()?;
        let mut task = self.store.read_task(id)?;

        if task.status == Status::Completed {
            return Ok(CompleteOutcome {
                task,
                tracker,
                already_completed: true,
                was_active: false,
            });
        }

        let previous = task.status;
        task.status = Status::Completed;
        task.completed_at = Some(now);
        task.actual_hours = task.elapsed_hours();

        let was_active = tracker.active_task.as_deref() == Some(id);
        if was_active {
            tracker.active_task = None;
        }
        tracker.set_summary_status(id, Status::Completed);
        tracker.last_updated = now;
        tracker.recompute_statistics();

        self.store.write_task(&task)?;
        self.store.write_tracker(&tracker)?;

        if self.notifier.is_configured()
            && let Some(number) = task.github_issue
        {
            match self
                .notifier
                .comment_issue(number, &mapper::completion_comment(&task, previous))
            {
                Ok(true) => {}
                Ok(false) => output::warn(&format!("issue #{number} was not updated")),
                Err(e) => output::warn(&format!("issue update failed: {e}")),
            }
        }

        Ok(CompleteOutcome {
            task,
            tracker,
            already_completed: false,
            was_active,
        })
    }

    /// Close mirrored issues for merged tasks. Ids with no document, a
    /// non-completed status, or no issue reference are skipped, not errors.
    /// Performs no local mutation.
    pub fn close_merged(&self, ids: &[String]) -> Result<SweepOutcome> {
        // Sweeping requires a tracker, even though only task documents are read.
        let _ = self.store.read_tracker()?;

        let mut outcome = SweepOutcome::default();
        for id in ids {
            let Ok(task) = self.store.read_task(id) else {
                outcome.skipped.push(id.clone());
                continue;
            };
            let (Status::Completed, Some(number)) = (task.status, task.github_issue) else {
                outcome.skipped.push(id.clone());
                continue;
            };
            match self.notifier.close_issue(number, &mapper::merge_comment(id)) {
                Ok(true) => outcome.closed.push((id.clone(), number)),
                Ok(false) => outcome.skipped.push(id.clone()),
                Err(e) => {
                    output::warn(&format!("closing issue #{number} failed: {e}"));
                    outcome.skipped.push(id.clone());
                }
            }
        }
        Ok(outcome)
    }
}

/// The gating predicate: true iff a tracker exists for the current plan and
/// its `activeTask` is a non-empty value.
///
/// Fail-open asymmetry: a missing pointer or tracker is an honest `false`,
/// but any internal error (unreadable files, corrupt JSON) yields `true`,
/// because this predicate guards a host action and must never be the thing
/// that crashes it.
pub fn can_edit(repo_root: &Path) -> bool {
    let plan = match plan::active_plan_name(repo_root) {
        Ok(plan) => plan,
        Err(PlanError::NoActivePlan) => return false,
        Err(_) => return true,
    };
    let store = match PlanStore::open(repo_root, &plan) {
        Ok(store) => store,
        Err(PlanError::PlanNotFound(_)) => return false,
        Err(_) => return true,
    };
    match store.read_tracker() {
        Ok(tracker) => tracker
            .active_task
            .is_some_and(|id| !id.trim().is_empty()),
        Err(PlanError::TrackerNotFound(_)) => false,
        Err(_) => true,
    }
}
