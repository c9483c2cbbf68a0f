// src/fetch/fixture.rs
// =============================================================================
// Serves recorded pages instead of fetching them.
//
// Used by the test suite and by `check --html-file`, which runs the scanner
// against a saved copy of a page.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use super::{FetchResult, PageFetcher};
use crate::checker::Result;

#[derive(Debug, Default, Clone)]
pub struct FixtureFetcher {
    pages: HashMap<String, FetchResult>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an arbitrary result for `url`
    pub fn with_result(mut self, url: impl Into<String>, result: FetchResult) -> Self {
        self.pages.insert(url.into(), result);
        self
    }

    /// Records a 200 response with `html` as the body
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.with_result(url, FetchResult::success(Some(200), html))
    }

    /// Records the contents of an HTML file on disk as the page at `url`
    pub fn with_page_file(
        self,
        url: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> std::io::Result<Self> {
        let html = std::fs::read_to_string(path)?;
        Ok(self.with_page(url, html))
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn browse(&self, url: &str, make_screenshot: bool) -> Result<FetchResult> {
        if make_screenshot {
            ::log::warn!("Fixture pages have no screenshots; ignoring request for {}", url);
        }

        let result = match self.pages.get(url) {
            Some(result) => result.clone(),
            None => FetchResult::failure(None, format!("no fixture recorded for {}", url)),
        };
        Ok(result)
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_serves_recorded_page() {
        let fetcher = FixtureFetcher::new().with_page("https://a.test/", "<p>hi</p>");
        let result = fetcher.browse("https://a.test/", false).await.unwrap();
        assert!(result.is_success());
        assert_eq!(result.body(), "<p>hi</p>");
        assert_eq!(result.status_code(), Some(200));
    }

    #[tokio::test]
    async fn test_unknown_url_is_failed_fetch() {
        let fetcher = FixtureFetcher::new();
        let result = fetcher.browse("https://missing.test/", false).await.unwrap();
        assert!(!result.is_success());
        assert_eq!(
            result.error_message(),
            Some("no fixture recorded for https://missing.test/")
        );
    }

    #[tokio::test]
    async fn test_loads_page_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"<a href="https://x.test/">saved</a>"#).unwrap();

        let fetcher = FixtureFetcher::new()
            .with_page_file("https://saved.test/", file.path())
            .unwrap();
        let result = fetcher.browse("https://saved.test/", false).await.unwrap();
        assert!(result.body().contains("saved"));
    }
}
