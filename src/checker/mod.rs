// src/checker/mod.rs
// =============================================================================
// The backlink checker: fetch a page, then scan it for matching links.
//
// Submodules:
// - pattern: Compiles and matches the caller's URL pattern
// - extract: Scans HTML for matching <a href> and <img src> elements
// - backlink: The record produced for each match
// - error: The error taxonomy
//
// Every check runs the same steps: validate the pattern, fetch the page,
// extract backlinks, wrap everything in a CheckResult. The pattern is
// compiled before anything is fetched, so a bad pattern costs no network I/O.
// =============================================================================

mod backlink;
mod error;
mod extract;
mod pattern;

pub use backlink::{Backlink, TagType};
pub use error::{CheckerError, Result};
pub use extract::extract_backlinks;
pub use pattern::PatternMatcher;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::fetch::{FetchResult, PageFetcher};

/// What to scan for, and whether to ask the fetcher for a screenshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Scan `<a href>` elements
    pub scan_links: bool,
    /// Scan `<img src>` elements
    pub scan_images: bool,
    /// Passed through to the fetcher untouched
    pub make_screenshot: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            scan_links: true,
            scan_images: false,
            make_screenshot: false,
        }
    }
}

/// A fetched page and the backlinks found on it.
///
/// If the fetch failed, `backlinks` is empty and `fetch` says why.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    fetch: FetchResult,
    backlinks: Vec<Backlink>,
}

impl CheckResult {
    pub fn new(fetch: FetchResult, backlinks: Vec<Backlink>) -> Self {
        Self { fetch, backlinks }
    }

    pub fn fetch(&self) -> &FetchResult {
        &self.fetch
    }

    /// Anchors first, then images, each in document order
    pub fn backlinks(&self) -> &[Backlink] {
        &self.backlinks
    }

    pub fn has_backlinks(&self) -> bool {
        !self.backlinks.is_empty()
    }

    /// Matching anchors that pass link equity (no nofollow). Images never count.
    pub fn follow_count(&self) -> usize {
        self.backlinks
            .iter()
            .filter(|b| b.tag_type() == TagType::Anchor && !b.no_follow())
            .count()
    }

    pub fn has_follow_backlink(&self) -> bool {
        self.follow_count() > 0
    }
}

/// Checks pages for backlinks using any PageFetcher
pub struct BacklinkChecker<F> {
    fetcher: F,
}

impl<F: PageFetcher> BacklinkChecker<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // Checks one page for backlinks matching `pattern`
    //
    // Errors:
    //   InvalidPattern - empty or malformed pattern, reported before fetching
    //   InvalidArgument - the fetcher rejected the URL
    //   ParseFailure - the page body is not usable HTML
    //
    // A page that can't be fetched is NOT an error: the result comes back with
    // fetch().is_success() == false and no backlinks.
    pub async fn get_backlinks(
        &self,
        url: &str,
        pattern: &str,
        options: ScanOptions,
    ) -> Result<CheckResult> {
        let matcher = PatternMatcher::new(pattern)?;
        self.get_backlinks_with(url, &matcher, options).await
    }

    /// Same as `get_backlinks`, with an already compiled pattern
    pub async fn get_backlinks_with(
        &self,
        url: &str,
        pattern: &PatternMatcher,
        options: ScanOptions,
    ) -> Result<CheckResult> {
        ::log::debug!("Fetching {} with the {} fetcher", url, self.fetcher.name());
        let fetch = self.fetcher.browse(url, options.make_screenshot).await?;

        if !fetch.is_success() {
            ::log::warn!(
                "Could not fetch {}: {}",
                url,
                fetch.error_message().unwrap_or("unknown error")
            );
            return Ok(CheckResult::new(fetch, Vec::new()));
        }

        let backlinks = extract_backlinks(
            fetch.body(),
            pattern,
            options.scan_links,
            options.scan_images,
        )?;

        Ok(CheckResult::new(fetch, backlinks))
    }

    // Checks many pages against one pattern
    //
    // The pattern is compiled once; if it is invalid nothing is fetched.
    // Up to `concurrency` pages are in flight at a time. Results come back in
    // the same order as `urls`, each with its own Result so one bad page
    // doesn't hide the others.
    pub async fn check_many(
        &self,
        urls: Vec<String>,
        pattern: &str,
        options: ScanOptions,
        concurrency: usize,
    ) -> Result<Vec<(String, Result<CheckResult>)>> {
        let matcher = PatternMatcher::new(pattern)?;
        let matcher = &matcher;

        let checks = urls.into_iter().enumerate().map(move |(index, url)| async move {
            let result = self.get_backlinks_with(&url, matcher, options).await;
            (index, url, result)
        });

        let mut results: Vec<_> = stream::iter(checks)
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        results.sort_by_key(|(index, _, _)| *index);

        Ok(results
            .into_iter()
            .map(|(_, url, result)| (url, result))
            .collect())
    }
}
