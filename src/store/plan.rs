use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{PlanError, Result};
use crate::model::{Task, Tracker};

/// Name of the state directory at the repository root.
pub const STATE_DIR: &str = ".plangate";

/// Pointer file naming the current plan.
const ACTIVE_PLAN: &str = "ACTIVE-PLAN";

/// Aggregate tracker document, one per plan.
const TRACKER_FILE: &str = "TASK-TRACKER.json";

/// Store for one plan's documents under `.plangate/plans/<plan>/`.
///
/// Constructed from an explicit base directory and plan name; the ACTIVE-PLAN
/// pointer is resolved once via [`PlanStore::current`], never re-read inside
/// an operation. Every mutation writes a whole document (no partial patches,
/// no journal): last writer wins.
#[derive(Debug)]
pub struct PlanStore {
    root: PathBuf,
    plan: String,
}

impl PlanStore {
    /// Open an existing plan under `repo_root/.plangate`.
    pub fn open(repo_root: &Path, plan: &str) -> Result<Self> {
        let root = repo_root.join(STATE_DIR);
        let store = Self {
            root,
            plan: plan.to_string(),
        };
        if !store.plan_dir().is_dir() {
            return Err(PlanError::PlanNotFound(plan.to_string()));
        }
        Ok(store)
    }

    /// Open the plan named by the ACTIVE-PLAN pointer.
    pub fn current(repo_root: &Path) -> Result<Self> {
        let plan = active_plan_name(repo_root)?;
        Self::open(repo_root, &plan)
    }

    /// Create a new plan with an empty tracker and point ACTIVE-PLAN at it.
    ///
    /// Also lays down the `.plangate/` skeleton (config.json) on first use.
    pub fn create(
        repo_root: &Path,
        plan: &str,
        project_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let root = repo_root.join(STATE_DIR);
        let store = Self {
            root,
            plan: plan.to_string(),
        };
        if store.tracker_path().exists() {
            return Err(PlanError::PlanExists(plan.to_string()));
        }

        fs::create_dir_all(store.tasks_dir())?;
        let config_path = store.root.join("config.json");
        if !config_path.exists() {
            fs::write(&config_path, "{\n  \"version\": 1\n}")?;
        }

        store.write_tracker(&Tracker::new(project_name, now))?;
        fs::write(store.root.join(ACTIVE_PLAN), plan)?;
        Ok(store)
    }

    /// Repoint ACTIVE-PLAN at an existing plan.
    pub fn set_current(repo_root: &Path, plan: &str) -> Result<()> {
        let store = Self::open(repo_root, plan)?;
        if !store.tracker_path().exists() {
            return Err(PlanError::TrackerNotFound(plan.to_string()));
        }
        fs::write(store.root.join(ACTIVE_PLAN), plan)?;
        Ok(())
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    /// The `.plangate` directory this store lives under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn plan_dir(&self) -> PathBuf {
        self.root.join("plans").join(&self.plan)
    }

    fn tasks_dir(&self) -> PathBuf {
        self.plan_dir().join("tasks")
    }

    pub fn tracker_path(&self) -> PathBuf {
        self.plan_dir().join(TRACKER_FILE)
    }

    pub fn task_path(&self, id: &str) -> PathBuf {
        self.tasks_dir().join(format!("{id}.json"))
    }

    pub fn read_tracker(&self) -> Result<Tracker> {
        let path = self.tracker_path();
        if !path.exists() {
            return Err(PlanError::TrackerNotFound(self.plan.clone()));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn write_tracker(&self, tracker: &Tracker) -> Result<()> {
        let json = serde_json::to_string_pretty(tracker)?;
        fs::write(self.tracker_path(), json)?;
        Ok(())
    }

    pub fn task_exists(&self, id: &str) -> bool {
        self.task_path(id).exists()
    }

    pub fn read_task(&self, id: &str) -> Result<Task> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(PlanError::TaskNotFound(id.to_string()));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn write_task(&self, task: &Task) -> Result<()> {
        let json = serde_json::to_string_pretty(task)?;
        fs::write(self.task_path(&task.id), json)?;
        Ok(())
    }

    pub fn list_task_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.tasks_dir())? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".json") {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Read the ACTIVE-PLAN pointer, trimmed.
pub fn active_plan_name(repo_root: &Path) -> Result<String> {
    let pointer = repo_root.join(STATE_DIR).join(ACTIVE_PLAN);
    if !pointer.exists() {
        return Err(PlanError::NoActivePlan);
    }
    let plan = fs::read_to_string(pointer)?.trim().to_string();
    if plan.is_empty() {
        return Err(PlanError::NoActivePlan);
    }
    Ok(plan)
}

/// Walk up from the current directory to find the .plangate root.
pub fn find_repo_root() -> Result<PathBuf> {
    let mut dir = std::env::current_dir().map_err(PlanError::Io)?;
    loop {
        if dir.join(STATE_DIR).exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(PlanError::NoActivePlan);
        }
    }
}
