//! GitHub Issues adapter for the `IssueNotifier` trait, REST v3 over
//! blocking reqwest. Hooks are one-shot synchronous processes, so no async
//! runtime is carried for a single HTTP call.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::config::GitHubConfig;
use super::{IssueNotifier, NotifyError};

const API_ROOT: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("plangate/", env!("CARGO_PKG_VERSION"));

pub struct GitHubNotifier {
    client: Client,
    config: GitHubConfig,
    token: String,
    api_root: String,
}

#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
    labels: &'a [String],
}

#[derive(Deserialize)]
struct IssueResponse {
    number: u64,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct CloseRequest<'a> {
    state: &'a str,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl GitHubNotifier {
    pub fn new(config: GitHubConfig, token: String) -> Self {
        Self {
            client: Client::new(),
            config,
            token,
            api_root: API_ROOT.to_string(),
        }
    }

    /// Point the adapter at a different API root (test servers).
    #[cfg(test)]
    pub fn with_api_root(config: GitHubConfig, token: String, api_root: String) -> Self {
        Self {
            client: Client::new(),
            config,
            token,
            api_root,
        }
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_root, self.config.owner, self.config.repo
        )
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<(u16, String), NotifyError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .map_err(|e| -> NotifyError { format!("GitHub request failed: {e}").into() })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| -> NotifyError { format!("failed to read GitHub response: {e}").into() })?;
        Ok((status, text))
    }

    fn error_message(status: u16, body: &str) -> String {
        serde_json::from_str::<ApiError>(body)
            .map(|e| format!("GitHub API error ({status}): {}", e.message))
            .unwrap_or_else(|_| format!("GitHub API error ({status})"))
    }
}

impl IssueNotifier for GitHubNotifier {
    fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.config.owner.is_empty() && !self.config.repo.is_empty()
    }

    fn create_issue(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<Option<u64>, NotifyError> {
        let request = CreateIssueRequest { title, body, labels };
        let (status, text) = self.send(self.client.post(self.issues_url()).json(&request))?;
        if !(200..300).contains(&status) {
            return Err(Self::error_message(status, &text).into());
        }
        let issue: IssueResponse = serde_json::from_str(&text)
            .map_err(|e| -> NotifyError { format!("unexpected GitHub response: {e}").into() })?;
        Ok(Some(issue.number))
    }

    fn comment_issue(&self, number: u64, body: &str) -> Result<bool, NotifyError> {
        let url = format!("{}/{number}/comments", self.issues_url());
        let (status, _) = self.send(self.client.post(url).json(&CommentRequest { body }))?;
        Ok((200..300).contains(&status))
    }

    fn close_issue(&self, number: u64, comment: &str) -> Result<bool, NotifyError> {
        // Comment first; a failed comment should not stop the close.
        let _ = self.comment_issue(number, comment);

        let url = format!("{}/{number}", self.issues_url());
        let (status, _) = self.send(self.client.patch(url).json(&CloseRequest { state: "closed" }))?;
        Ok((200..300).contains(&status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GitHubConfig {
        GitHubConfig {
            owner: "acme".into(),
            repo: "widgets".into(),
            auto_create: true,
            auto_close: true,
        }
    }

    #[test]
    fn configured_requires_token_and_repo() {
        let notifier = GitHubNotifier::new(config(), "tok".into());
        assert!(notifier.is_configured());

        let notifier = GitHubNotifier::new(config(), String::new());
        assert!(!notifier.is_configured());
    }

    #[test]
    fn issues_url_targets_owner_and_repo() {
        let notifier = GitHubNotifier::with_api_root(config(), "tok".into(), "http://x".into());
        assert_eq!(notifier.issues_url(), "http://x/repos/acme/widgets/issues");
    }

    #[test]
    fn error_message_prefers_api_detail() {
        let msg = GitHubNotifier::error_message(422, r#"{"message": "Validation Failed"}"#);
        assert_eq!(msg, "GitHub API error (422): Validation Failed");

        let msg = GitHubNotifier::error_message(500, "<html>");
        assert_eq!(msg, "GitHub API error (500)");
    }

    #[test]
    fn unreachable_host_maps_to_notify_error() {
        // Connection refused locally; the failure must surface as an Err,
        // not a panic.
        let notifier =
            GitHubNotifier::with_api_root(config(), "tok".into(), "http://127.0.0.1:1".into());
        let result = notifier.create_issue("t", "b", &[]);
        assert!(result.is_err());
    }
}
