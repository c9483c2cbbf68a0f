// src/config.rs
// =============================================================================
// Settings for how pages are fetched.
//
// Values come from three layers, later ones winning:
// 1. Built-in defaults
// 2. An optional JSON config file (--config)
// 3. The WEBDRIVER_URL environment variable, then CLI flags
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fetch settings shared by every PageFetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Redirects followed before giving up
    pub max_redirects: usize,

    /// User-Agent header sent by the HTTP fetcher
    pub user_agent: String,

    /// WebDriver server used by the browser fetcher
    pub webdriver_url: String,

    /// Pages checked at once in batch mode
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: 10,
            user_agent: concat!("backlink-checker/", env!("CARGO_PKG_VERSION")).to_string(),
            webdriver_url: "http://localhost:4444".to_string(),
            concurrency: 8,
        }
    }
}

impl FetchConfig {
    /// Loads settings from a JSON file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;

        let config = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Applies the WEBDRIVER_URL environment variable if it is set
    pub fn with_env_overrides(self) -> Self {
        self.with_webdriver_override(std::env::var("WEBDRIVER_URL").ok())
    }

    // Split out so tests don't have to mutate the process environment
    fn with_webdriver_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|url| !url.is_empty()) {
            self.webdriver_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "timeout_secs": 5, "concurrency": 2 }}"#).unwrap();

        let config = FetchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(FetchConfig::from_file(file.path()).is_err());
        assert!(FetchConfig::from_file("/definitely/not/here.json").is_err());
    }

    #[test]
    fn test_webdriver_override() {
        let config = FetchConfig::default()
            .with_webdriver_override(Some("http://localhost:9515".to_string()));
        assert_eq!(config.webdriver_url, "http://localhost:9515");

        let config = FetchConfig::default().with_webdriver_override(Some(String::new()));
        assert_eq!(config.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_default_user_agent_names_crate() {
        assert!(FetchConfig::default().user_agent.starts_with("backlink-checker/"));
    }
}
