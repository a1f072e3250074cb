use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no active plan (run `plangate init <name>` first)")]
    NoActivePlan,

    #[error("plan '{0}' not found under .plangate/plans")]
    PlanNotFound(String),

    #[error("plan '{0}' already exists")]
    PlanExists(String),

    #[error("task tracker not found for plan '{0}' (corrupted plan state?)")]
    TrackerNotFound(String),

    #[error("task {0} not found")]
    TaskNotFound(String),

    #[error("task {0} already exists")]
    TaskExists(String),

    #[error("invalid task id '{0}': {1}")]
    InvalidTaskId(String, String),

    #[error("invalid status transition: {0} -> {1}")]
    InvalidTransition(String, String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlanError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoActivePlan => "no_active_plan",
            Self::PlanNotFound(_) => "plan_not_found",
            Self::PlanExists(_) => "plan_exists",
            Self::TrackerNotFound(_) => "tracker_not_found",
            Self::TaskNotFound(_) => "task_not_found",
            Self::TaskExists(_) => "task_exists",
            Self::InvalidTaskId(_, _) => "invalid_task_id",
            Self::InvalidTransition(_, _) => "invalid_transition",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
