use std::fs;
use std::path::Path;

use serde::Deserialize;

/// `github` section of `.plangate/config.json`.
///
/// The token never lives in the file; it comes from `GITHUB_TOKEN`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub auto_create: bool,
    #[serde(default)]
    pub auto_close: bool,
}

#[derive(Deserialize)]
struct RootConfig {
    github: Option<GitHubConfig>,
}

impl GitHubConfig {
    /// Load the github section from the state directory's config.json.
    /// Absent file, unparsable file, or missing section all yield None;
    /// an unconfigured integration is not an error.
    pub fn load(state_dir: &Path) -> Option<Self> {
        let data = fs::read_to_string(state_dir.join("config.json")).ok()?;
        let root: RootConfig = serde_json::from_str(&data).ok()?;
        let cfg = root.github?;
        if cfg.owner.is_empty() || cfg.repo.is_empty() {
            return None;
        }
        Some(cfg)
    }
}

/// Non-empty `GITHUB_TOKEN`, if set.
pub fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN")
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
