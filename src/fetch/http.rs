// src/fetch/http.rs
// =============================================================================
// Fetches pages with a plain HTTP GET.
//
// Key functionality:
// - One reqwest Client, reused for every page (connection pooling)
// - Configurable timeout, redirect limit and user agent
// - Non-2xx statuses and transport errors become failed FetchResults,
//   never Err, so a dead page does not abort a batch of checks
//
// This fetcher sees the HTML the server sends. Links injected by JavaScript
// are invisible to it; use the browser fetcher for those pages.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{parse_page_url, FetchResult, PageFetcher};
use crate::checker::{CheckerError, Result};
use crate::config::FetchConfig;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the HTTP client from the fetch settings
    //
    // Fails only if reqwest cannot set up its TLS backend, which is reported
    // as an invalid configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                CheckerError::InvalidArgument(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn browse(&self, url: &str, make_screenshot: bool) -> Result<FetchResult> {
        let url = parse_page_url(url)?;

        if make_screenshot {
            ::log::warn!(
                "Screenshots need a browser; fetching {} without one",
                url
            );
        }

        ::log::debug!("GET {}", url);

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return Ok(categorize_error(e)),
        };

        let status = response.status();
        if !status.is_success() {
            // Includes a 3xx without a Location header
            return Ok(FetchResult::failure(
                Some(status.as_u16()),
                format!("HTTP {}", status.as_u16()),
            ));
        }

        match response.text().await {
            Ok(body) => Ok(FetchResult::success(Some(status.as_u16()), body)),
            Err(e) => Ok(FetchResult::failure(
                Some(status.as_u16()),
                format!("Failed to read response body: {}", e),
            )),
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

// Turns a reqwest error into a failed FetchResult with a readable message
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
fn categorize_error(error: reqwest::Error) -> FetchResult {
    let error_string = error.to_string();
    let status = error.status().map(|s| s.as_u16());

    let message = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            "Could not resolve hostname".to_string()
        } else {
            format!("Connection failed: {}", error_string)
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else {
        error_string
    };

    FetchResult::failure(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_from_default_config() {
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        assert_eq!(fetcher.name(), "http");
    }

    #[tokio::test]
    async fn test_rejects_non_http_url_before_fetching() {
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let err = fetcher.browse("ftp://example.com/file", false).await.unwrap_err();
        assert!(matches!(err, CheckerError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_failed_fetch() {
        // Port 9 (discard) on localhost is closed in test environments
        let config = FetchConfig {
            timeout_secs: 2,
            ..FetchConfig::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let result = fetcher.browse("http://127.0.0.1:9/", false).await.unwrap();

        assert!(!result.is_success());
        assert_eq!(result.body(), "");
        assert!(result.error_message().is_some());
    }
}
