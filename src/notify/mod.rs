pub mod config;
pub mod github;
pub mod mapper;

use crate::store::plan::PlanStore;

pub type NotifyError = Box<dyn std::error::Error + Send + Sync>;

/// External issue tracker, mirrored best-effort.
///
/// Callers must treat `None`/`false` returns and errors identically: warn and
/// continue. A notification outcome never fails or reverts a local mutation.
pub trait IssueNotifier: Send + Sync {
    /// Whether the collaborator has usable credentials and a target repo.
    fn is_configured(&self) -> bool;

    /// Create an issue, returning its number, or `None` if creation was
    /// declined without an error.
    fn create_issue(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<Option<u64>, NotifyError>;

    /// Add a comment to an existing issue.
    fn comment_issue(&self, number: u64, body: &str) -> Result<bool, NotifyError>;

    /// Close an issue with a final comment.
    fn close_issue(&self, number: u64, comment: &str) -> Result<bool, NotifyError>;
}

/// Default notifier used when no tracker integration is configured.
pub struct NoopNotifier;

impl IssueNotifier for NoopNotifier {
    fn is_configured(&self) -> bool {
        false
    }

    fn create_issue(
        &self,
        _title: &str,
        _body: &str,
        _labels: &[String],
    ) -> Result<Option<u64>, NotifyError> {
        Ok(None)
    }

    fn comment_issue(&self, _number: u64, _body: &str) -> Result<bool, NotifyError> {
        Ok(false)
    }

    fn close_issue(&self, _number: u64, _comment: &str) -> Result<bool, NotifyError> {
        Ok(false)
    }
}

/// Mirroring behavior toggles from the github config section.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifySettings {
    pub auto_create: bool,
    pub auto_close: bool,
}

/// Build the notifier for a store: GitHub when `.plangate/config.json` has a
/// `github` section and `GITHUB_TOKEN` is set, the no-op otherwise.
pub fn for_store(store: &PlanStore) -> (Box<dyn IssueNotifier>, NotifySettings) {
    let Some(cfg) = config::GitHubConfig::load(store.root()) else {
        return (Box::new(NoopNotifier), NotifySettings::default());
    };
    let settings = NotifySettings {
        auto_create: cfg.auto_create,
        auto_close: cfg.auto_close,
    };
    let Some(token) = config::github_token() else {
        return (Box::new(NoopNotifier), settings);
    };
    (Box::new(github::GitHubNotifier::new(cfg, token)), settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_reports_unconfigured_and_never_errs() {
        let noop = NoopNotifier;
        assert!(!noop.is_configured());
        assert_eq!(noop.create_issue("t", "b", &[]).unwrap(), None);
        assert!(!noop.comment_issue(1, "c").unwrap());
        assert!(!noop.close_issue(1, "c").unwrap());
    }
}
