use std::path::Path;

use git2::Repository;
use regex::Regex;

/// True when HEAD is on a default branch (`main` or `master`).
/// Detached HEAD or a non-git directory counts as false.
pub fn on_default_branch(repo_root: &Path) -> bool {
    let Ok(repo) = Repository::discover(repo_root) else {
        return false;
    };
    let Ok(head) = repo.head() else {
        return false;
    };
    head.is_branch()
        && matches!(head.shorthand(), Some("main") | Some("master"))
}

/// One-line summaries of the commits brought in by the last merge or pull,
/// i.e. `ORIG_HEAD..HEAD`. Falls back to an empty vec on any error (no
/// ORIG_HEAD, detached HEAD, non-git repo, etc.).
pub fn merge_commit_summaries(repo_root: &Path) -> Vec<String> {
    let Ok(repo) = Repository::discover(repo_root) else {
        return vec![];
    };
    let Ok(orig_head) = repo.refname_to_id("ORIG_HEAD") else {
        return vec![];
    };
    let Ok(head) = repo.head() else {
        return vec![];
    };
    let Ok(head_commit) = head.peel_to_commit() else {
        return vec![];
    };
    let Ok(mut revwalk) = repo.revwalk() else {
        return vec![];
    };
    if revwalk.push(head_commit.id()).is_err() {
        return vec![];
    }
    if revwalk.hide(orig_head).is_err() {
        return vec![];
    }

    let mut summaries = Vec::new();
    for oid in revwalk {
        let Ok(oid) = oid else { continue };
        let Ok(commit) = repo.find_commit(oid) else {
            continue;
        };
        summaries.push(commit.summary().unwrap_or("(no message)").to_string());
    }
    summaries
}

/// Extract task ids (`TASK-001`, `[task-17]`, ...) from free text,
/// uppercased and deduplicated, in order of first appearance.
pub fn extract_task_ids(text: &str) -> Vec<String> {
    let Ok(re) = Regex::new(r"(?i)\b(TASK-\d+)\b") else {
        return vec![];
    };
    let mut ids = Vec::new();
    for capture in re.captures_iter(text) {
        let id = capture[1].to_uppercase();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Task ids referenced by the commits of the last merge to a default branch.
/// Empty when not on main/master or when git state is unusable.
pub fn merged_task_ids(repo_root: &Path) -> Vec<String> {
    if !on_default_branch(repo_root) {
        return vec![];
    }
    extract_task_ids(&merge_commit_summaries(repo_root).join("\n"))
}
