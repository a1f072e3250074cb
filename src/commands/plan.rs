use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

use crate::error::Result;
use crate::output::Format;
use crate::store::plan::PlanStore;

#[derive(Serialize)]
struct PlanResponse<'a> {
    event: &'a str,
    plan: &'a str,
}

/// Create a new plan (empty tracker) and make it the active one.
pub fn init(repo_root: &Path, name: &str, project: Option<String>, format: Format) -> Result<()> {
    let store = PlanStore::create(repo_root, name, project, Utc::now())?;
    print_response("created", store.plan(), format)
}

/// Repoint ACTIVE-PLAN at an existing plan.
pub fn use_plan(repo_root: &Path, name: &str, format: Format) -> Result<()> {
    PlanStore::set_current(repo_root, name)?;
    print_response("activated", name, format)
}

fn print_response(event: &str, plan: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(&PlanResponse { event, plan })?),
        Format::Pretty => {
            println!("{} plan '{}'", event.green().bold(), plan.cyan());
            if event == "created" {
                println!("  add tasks with: plangate add <ID> --title <title>");
            }
        }
        Format::Minimal => println!("{event}\t{plan}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::store::plan::active_plan_name;
    use tempfile::tempdir;

    #[test]
    fn init_then_use_switches_active_plan() {
        let dir = tempdir().unwrap();
        init(dir.path(), "alpha", None, Format::Minimal).unwrap();
        init(dir.path(), "beta", Some("Widgets".into()), Format::Minimal).unwrap();
        assert_eq!(active_plan_name(dir.path()).unwrap(), "beta");

        use_plan(dir.path(), "alpha", Format::Minimal).unwrap();
        assert_eq!(active_plan_name(dir.path()).unwrap(), "alpha");
    }

    #[test]
    fn use_unknown_plan_fails() {
        let dir = tempdir().unwrap();
        init(dir.path(), "alpha", None, Format::Minimal).unwrap();
        let err = use_plan(dir.path(), "missing", Format::Minimal).unwrap_err();
        assert!(matches!(err, PlanError::PlanNotFound(_)));
    }
}
