// src/fetch/mod.rs
// =============================================================================
// Page fetching.
//
// The checker never talks to the network itself. It asks a PageFetcher for a
// page and gets back a FetchResult. Swapping the fetcher changes how pages are
// retrieved without touching the extraction logic:
// - http: plain HTTP GET with reqwest
// - browser: a real headless browser over WebDriver (renders JS, screenshots)
// - fixture: recorded pages, for tests and offline checks
//
// Rust concepts:
// - Traits: The PageFetcher "interface" every strategy implements
// - async-trait: Lets trait methods be async and still usable as dyn objects
// =============================================================================

mod browser;
mod fixture;
mod http;

pub use browser::BrowserFetcher;
pub use fixture::FixtureFetcher;
pub use http::HttpFetcher;

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::checker::{CheckerError, Result};

/// Retrieves one page.
///
/// Ordinary network trouble (timeouts, DNS failures, 404s...) must be reported
/// as `Ok(FetchResult::failure(..))`. `Err` is reserved for caller mistakes
/// such as a malformed URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn browse(&self, url: &str, make_screenshot: bool) -> Result<FetchResult>;

    /// Short name used in log messages
    fn name(&self) -> &str;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    async fn browse(&self, url: &str, make_screenshot: bool) -> Result<FetchResult> {
        (**self).browse(url, make_screenshot).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// The outcome of fetching a page
//
// Built only through `success` / `failure`, so a successful result always has
// no error message and a failed one always has one and an empty body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip)]
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip)]
    screenshot: Option<Vec<u8>>,
}

impl FetchResult {
    /// A page that was retrieved. `status_code` is None when the transport
    /// does not expose one (WebDriver).
    pub fn success(status_code: Option<u16>, body: impl Into<String>) -> Self {
        Self {
            success: true,
            status_code,
            body: body.into(),
            error_message: None,
            screenshot: None,
        }
    }

    /// A page that could not be retrieved
    pub fn failure(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            body: String::new(),
            error_message: Some(message.into()),
            screenshot: None,
        }
    }

    /// Attaches a PNG screenshot of the page
    pub fn with_screenshot(mut self, png: Vec<u8>) -> Self {
        self.screenshot = Some(png);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Raw HTML; always empty for a failed fetch
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn screenshot(&self) -> Option<&[u8]> {
        self.screenshot.as_deref()
    }
}

// Validates a URL before any fetcher touches the network.
// Only absolute http/https URLs can be browsed.
pub(crate) fn parse_page_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| CheckerError::InvalidArgument(format!("invalid URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(CheckerError::InvalidArgument(format!(
            "only http/https URLs can be checked, got '{}'",
            scheme
        ))),
    }
}
