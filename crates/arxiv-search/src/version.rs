//! Background check for a newer published release.
//!
//! Runs independently of searching: any failure is logged and ignored.

use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// Version of this build.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name looked up in the registry.
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

/// crates.io `GET /api/v1/crates/<name>` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CrateResponse {
    /// Crate record.
    #[serde(rename = "crate")]
    pub krate: CrateInfo,
}

/// Version fields of a registry crate record.
#[derive(Debug, Clone, Deserialize)]
pub struct CrateInfo {
    /// Highest non-prerelease version, if any.
    #[serde(default)]
    pub max_stable_version: Option<String>,
    /// Highest version overall.
    pub max_version: String,
}

impl CrateInfo {
    /// Preferred latest version: stable when published, otherwise the newest.
    #[must_use]
    pub fn latest(&self) -> &str {
        self.max_stable_version.as_deref().unwrap_or(&self.max_version)
    }
}

/// A newer release is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotice {
    /// Running version.
    pub current: String,
    /// Latest published version.
    pub latest: String,
}

impl UpdateNotice {
    /// Command that installs the latest release.
    #[must_use]
    pub fn install_command(&self) -> String {
        format!("cargo install {CRATE_NAME}@{}", self.latest)
    }
}

impl std::fmt::Display for UpdateNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A new version is available: v{} (current v{}). Update with: {}",
            self.latest,
            self.current,
            self.install_command()
        )
    }
}

/// Strip a leading `v` from a version tag.
#[must_use]
pub fn parse_version_tag(tag: &str) -> &str {
    tag.trim().trim_start_matches('v')
}

/// Compare dotted versions numerically; missing parts count as zero.
///
/// Pre-release and build suffixes on a component are ignored (`1.2.3-rc1` is `1.2.3`).
#[must_use]
pub fn is_newer(current: &str, latest: &str) -> bool {
    fn parts(version: &str) -> Vec<u64> {
        parse_version_tag(version)
            .split('.')
            .map(|p| {
                let digits: String = p.chars().take_while(char::is_ascii_digit).collect();
                digits.parse::<u64>().unwrap_or(0)
            })
            .collect()
    }

    let mut current = parts(current);
    let mut latest = parts(latest);
    let len = current.len().max(latest.len());
    current.resize(len, 0);
    latest.resize(len, 0);

    latest > current
}

/// Registry client for the release check.
#[derive(Debug, Clone)]
pub struct VersionCheck {
    client: reqwest::Client,
    registry_url: String,
}

impl VersionCheck {
    /// Create a checker against the configured registry.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(api::VERSION_CHECK_TIMEOUT)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { client, registry_url: config.registry_url.trim_end_matches('/').to_string() })
    }

    /// Fetch the latest published version.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-2xx status, or an unexpected body.
    pub async fn latest_version(&self) -> ClientResult<String> {
        let url = format!("{}/api/v1/crates/{}", self.registry_url, CRATE_NAME);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::status(status.as_u16(), text));
        }

        let body: CrateResponse = response.json().await?;
        Ok(parse_version_tag(body.krate.latest()).to_string())
    }

    /// Compare the registry against `current`.
    ///
    /// # Errors
    ///
    /// Returns error if the registry lookup fails.
    pub async fn check(&self, current: &str) -> ClientResult<Option<UpdateNotice>> {
        let latest = self.latest_version().await?;
        Ok(is_newer(current, &latest)
            .then(|| UpdateNotice { current: parse_version_tag(current).to_string(), latest }))
    }
}

/// Run the release check on a background task.
///
/// Resolves to `None` when the check is disabled, fails, or finds nothing newer.
#[must_use]
pub fn spawn_version_check(config: &Config) -> JoinHandle<Option<UpdateNotice>> {
    let checker = config.version_check.then(|| VersionCheck::new(config));

    tokio::spawn(async move {
        let checker = match checker? {
            Ok(checker) => checker,
            Err(err) => {
                tracing::debug!(error = %err, "Version check unavailable");
                return None;
            }
        };

        match checker.check(CURRENT_VERSION).await {
            Ok(notice) => notice,
            Err(err) => {
                tracing::debug!(error = %err, "Version check failed");
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_tag() {
        assert_eq!(parse_version_tag("v1.2.3"), "1.2.3");
        assert_eq!(parse_version_tag("1.2.3"), "1.2.3");
        assert_eq!(parse_version_tag(""), "");
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("0.1.0", "0.1.1"));
        assert!(is_newer("0.1.35", "v0.2.0"));
        assert!(is_newer("1.9.0", "1.10.0"));
        assert!(!is_newer("1.2.3", "1.2.3"));
        assert!(!is_newer("1.2.3", "1.2"));
        assert!(!is_newer("2.0.0", "1.99.99"));
        assert!(!is_newer("1.2.3", "1.2.3-rc1"));
    }

    #[test]
    fn test_latest_prefers_stable() {
        let info = CrateInfo {
            max_stable_version: Some("1.0.0".to_string()),
            max_version: "1.1.0-beta.1".to_string(),
        };
        assert_eq!(info.latest(), "1.0.0");

        let info = CrateInfo { max_stable_version: None, max_version: "0.1.0".to_string() };
        assert_eq!(info.latest(), "0.1.0");
    }

    #[test]
    fn test_update_notice_display() {
        let notice = UpdateNotice { current: "0.1.0".to_string(), latest: "0.2.0".to_string() };
        let text = notice.to_string();
        assert!(text.contains("v0.2.0"));
        assert!(text.contains("cargo install arxiv-search@0.2.0"));
    }

    #[tokio::test]
    async fn test_disabled_check_resolves_none() {
        let config = Config { version_check: false, ..Config::default() };
        assert_eq!(spawn_version_check(&config).await.unwrap(), None);
    }
}
