// src/fetch/browser.rs
// =============================================================================
// Fetches pages through a real browser driven over WebDriver.
//
// Needs a running WebDriver server (chromedriver, geckodriver, selenium...).
// Each browse() opens its own session, so concurrent checks never share a
// browser tab. The page source we read back is the DOM after scripts ran,
// which catches links a plain HTTP fetch would miss.
//
// WebDriver does not expose the HTTP status code, so it is always None.
// =============================================================================

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};

use super::{parse_page_url, FetchResult, PageFetcher};
use crate::checker::Result;

pub struct BrowserFetcher {
    webdriver_url: String,
}

impl BrowserFetcher {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
        }
    }

    pub fn webdriver_url(&self) -> &str {
        &self.webdriver_url
    }

    // Loads the page in an open session and reads it back
    async fn load(
        &self,
        client: &Client,
        url: &str,
        make_screenshot: bool,
    ) -> std::result::Result<FetchResult, fantoccini::error::CmdError> {
        client.goto(url).await?;
        let source = client.source().await?;
        let mut result = FetchResult::success(None, source);

        if make_screenshot {
            let png = client.screenshot().await?;
            ::log::debug!("Captured {} byte screenshot of {}", png.len(), url);
            result = result.with_screenshot(png);
        }

        Ok(result)
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn browse(&self, url: &str, make_screenshot: bool) -> Result<FetchResult> {
        let url = parse_page_url(url)?;

        let client = match ClientBuilder::native().connect(&self.webdriver_url).await {
            Ok(client) => client,
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                return Ok(FetchResult::failure(
                    None,
                    format!("WebDriver session failed: {}", e),
                ));
            }
        };

        ::log::debug!("Browsing {} via WebDriver", url);
        let result = match self.load(&client, url.as_str(), make_screenshot).await {
            Ok(result) => result,
            Err(e) => FetchResult::failure(None, format!("Browser navigation failed: {}", e)),
        };

        // Always end the session, even after a failed load
        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "browser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::CheckerError;

    #[tokio::test]
    async fn test_rejects_malformed_url_without_connecting() {
        // Nothing listens here; the URL check must fail first
        let fetcher = BrowserFetcher::new("http://127.0.0.1:9");
        let err = fetcher.browse("::not a url::", false).await.unwrap_err();
        assert!(matches!(err, CheckerError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_unreachable_webdriver_is_a_failed_fetch() {
        let fetcher = BrowserFetcher::new("http://127.0.0.1:9");
        let result = fetcher.browse("https://example.com/", true).await.unwrap();

        assert!(!result.is_success());
        assert!(result.screenshot().is_none());
        assert!(result
            .error_message()
            .unwrap()
            .starts_with("WebDriver session failed"));
    }
}
