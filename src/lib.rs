// src/lib.rs
// =============================================================================
// backlink-checker: find out whether, and how, a page links to you.
//
// Give it a page URL and a regex for your site's URLs. It fetches the page,
// finds every <a href> (and optionally <img src>) whose target matches, and
// reports the anchor text, whether the link is nofollow, and its target window.
//
// Modules:
// - checker: Pattern matching, HTML extraction and the BacklinkChecker itself
// - fetch: The PageFetcher trait and its HTTP, browser and fixture strategies
// - config: Fetch settings (timeouts, user agent, WebDriver URL, ...)
// =============================================================================

pub mod checker;
pub mod config;
pub mod fetch;

pub use checker::{
    extract_backlinks, Backlink, BacklinkChecker, CheckResult, CheckerError, PatternMatcher,
    Result, ScanOptions, TagType,
};
pub use config::FetchConfig;
pub use fetch::{BrowserFetcher, FetchResult, FixtureFetcher, HttpFetcher, PageFetcher};
