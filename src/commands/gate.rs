use std::path::Path;

use colored::Colorize;

use crate::error::PlanError;
use crate::store::plan;
use crate::tracker;

/// What the hook payload asks of the gate.
#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    /// Not an edit, or the payload was unusable: let it through.
    Allow,
    /// Edit/Write (or a bare invocation): check the active-task predicate.
    CheckActiveTask,
}

/// The pre-edit enforcement hook. Reads a tool-use payload
/// (`{"name": "Edit", ...}`) from stdin and decides whether the edit may
/// proceed. Returns true to allow (exit 0) and false to block (exit 1).
///
/// This function must never panic or error out: enforcement that crashes the
/// host is worse than no enforcement, so every internal failure resolves to
/// allow. Only an honestly-absent active task blocks.
pub fn run(payload: &str) -> bool {
    if decide_payload(payload) == Verdict::Allow {
        return true;
    }

    let repo_root = match plan::find_repo_root() {
        Ok(root) => root,
        // No .plangate anywhere up the tree: no plan, block.
        Err(PlanError::NoActivePlan) => {
            print_blocked("no plan exists", "plangate init <name>");
            return false;
        }
        // Could not even resolve a working directory: fail open.
        Err(_) => return true,
    };

    if tracker::can_edit(&repo_root) {
        true
    } else {
        print_blocked("no active task", "plangate start <TASK-ID>");
        false
    }
}

fn decide_payload(payload: &str) -> Verdict {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        // Manual invocation without a hook payload: plain predicate check.
        return Verdict::CheckActiveTask;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => match value.get("name").and_then(|v| v.as_str()) {
            Some("Edit") | Some("Write") => Verdict::CheckActiveTask,
            // Other tools (and payloads without a tool name) pass through.
            _ => Verdict::Allow,
        },
        // Unparsable payload: fail open rather than block legitimate work.
        Err(_) => Verdict::Allow,
    }
}

fn print_blocked(reason: &str, remedy: &str) {
    let rule = "=".repeat(60);
    eprintln!("{rule}");
    eprintln!("{} {reason}", "BLOCKED:".red().bold());
    eprintln!("{rule}");
    eprintln!("edits require an active plan and an active task");
    eprintln!("  run: {remedy}");
    eprintln!("{rule}");
}

/// Testable core of [`run`]: same decision, explicit repository root.
pub fn check(repo_root: &Path, payload: &str) -> bool {
    decide_payload(payload) == Verdict::Allow || tracker::can_edit(repo_root)
}
