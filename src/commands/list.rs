use std::path::Path;

use crate::error::Result;
use crate::model::Status;
use crate::output::{self, Format};
use crate::store::plan::PlanStore;

/// List tracker summaries, optionally filtered by status.
pub fn run(repo_root: &Path, status: Option<Status>, format: Format) -> Result<()> {
    let store = PlanStore::current(repo_root)?;
    let tracker = store.read_tracker()?;

    let summaries: Vec<_> = tracker
        .task_files
        .into_iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .collect();
    output::print_summaries(&summaries, format)
}
