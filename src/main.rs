// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Build the fetch settings and pick a page fetcher
// 3. Run the check(s) and print the backlinks found
// 4. Exit with proper code (0 = backlinks found, 1 = missing, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ScanArgs};
use serde::Serialize;
use std::path::{Path, PathBuf};

use backlink_checker::{
    BacklinkChecker, BrowserFetcher, CheckResult, FetchConfig, FixtureFetcher, HttpFetcher,
    PageFetcher, ScanOptions, TagType,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // Invalid pattern, unusable page, bad config... print the whole chain
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins if set; otherwise warnings only, or debug with --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

// Returns:
//   Ok(0) = every page had at least one matching backlink
//   Ok(1) = some page had none, or could not be fetched
//   Err = invalid input (reported as exit code 2)
async fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            url,
            pattern,
            scan,
            screenshot,
            html_file,
        } => handle_check(&config, &url, &pattern, &scan, screenshot, html_file).await,
        Commands::Batch {
            pattern,
            urls,
            scan,
            concurrency,
        } => {
            let concurrency = concurrency.unwrap_or(config.concurrency);
            handle_batch(&config, &pattern, urls, &scan, concurrency).await
        }
    }
}

// Defaults, then the config file, then WEBDRIVER_URL
fn load_config(path: Option<&Path>) -> Result<FetchConfig> {
    let config = match path {
        Some(path) => FetchConfig::from_file(path)?,
        None => FetchConfig::default(),
    };
    Ok(config.with_env_overrides())
}

// Picks how pages are fetched based on the flags
fn build_fetcher(config: &FetchConfig, browser: bool) -> Result<Box<dyn PageFetcher>> {
    if browser {
        let fetcher = BrowserFetcher::new(config.webdriver_url.clone());
        ::log::info!("Using WebDriver at {}", fetcher.webdriver_url());
        Ok(Box::new(fetcher))
    } else {
        Ok(Box::new(HttpFetcher::new(config)?))
    }
}

fn scan_options(scan: &ScanArgs, make_screenshot: bool) -> ScanOptions {
    ScanOptions {
        scan_links: !scan.no_links,
        scan_images: scan.images,
        make_screenshot,
    }
}

// Handles the 'check' subcommand
async fn handle_check(
    config: &FetchConfig,
    url: &str,
    pattern: &str,
    scan: &ScanArgs,
    screenshot: Option<PathBuf>,
    html_file: Option<PathBuf>,
) -> Result<i32> {
    let fetcher: Box<dyn PageFetcher> = match &html_file {
        Some(path) => Box::new(
            FixtureFetcher::new()
                .with_page_file(url, path)
                .with_context(|| format!("Failed to read HTML file {}", path.display()))?,
        ),
        None => build_fetcher(config, scan.browser)?,
    };

    let checker = BacklinkChecker::new(fetcher);
    let options = scan_options(scan, screenshot.is_some());
    let result = checker.get_backlinks(url, pattern, options).await?;

    if let Some(path) = &screenshot {
        save_screenshot(&result, path)?;
    }

    if scan.json {
        print_json(&PageReport::new(url, &result))?;
    } else {
        if !result.fetch().is_success() {
            println!(
                "❌ Could not fetch {}: {}",
                url,
                result.fetch().error_message().unwrap_or("unknown error")
            );
        }
        print_table(&result);
    }

    Ok(if result.has_backlinks() { 0 } else { 1 })
}

// Handles the 'batch' subcommand
async fn handle_batch(
    config: &FetchConfig,
    pattern: &str,
    urls: Vec<String>,
    scan: &ScanArgs,
    concurrency: usize,
) -> Result<i32> {
    let checker = BacklinkChecker::new(build_fetcher(config, scan.browser)?);
    let options = scan_options(scan, false);

    if !scan.json {
        println!("🔍 Checking {} page(s), {} at a time\n", urls.len(), concurrency);
    }

    let results = checker.check_many(urls, pattern, options, concurrency).await?;

    let mut missing = 0;
    let mut reports = Vec::new();
    for (url, result) in &results {
        match result {
            Ok(result) => {
                if !result.has_backlinks() {
                    missing += 1;
                }
                if scan.json {
                    reports.push(PageReport::new(url, result));
                } else {
                    print_page_summary(url, result);
                }
            }
            Err(e) => {
                missing += 1;
                if scan.json {
                    reports.push(PageReport::failed(url, e.to_string()));
                } else {
                    println!("⚠️  {} - {}", url, e);
                }
            }
        }
    }

    if scan.json {
        print_json(&reports)?;
    } else {
        println!();
        println!("📊 Summary:");
        println!("   ✅ With backlinks: {}", results.len() - missing);
        println!("   ❌ Without: {}", missing);
        println!("   📋 Total: {}", results.len());
    }

    Ok(if missing > 0 { 1 } else { 0 })
}

fn save_screenshot(result: &CheckResult, path: &Path) -> Result<()> {
    match result.fetch().screenshot() {
        Some(png) => {
            std::fs::write(path, png)
                .with_context(|| format!("Failed to write screenshot {}", path.display()))?;
            ::log::info!("Saved screenshot to {}", path.display());
        }
        None => {
            eprintln!("⚠️  No screenshot was captured (use --browser to take one)");
        }
    }
    Ok(())
}

// JSON shape for one checked page
#[derive(Serialize)]
struct PageReport<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a CheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> PageReport<'a> {
    fn new(url: &'a str, result: &'a CheckResult) -> Self {
        Self {
            url,
            result: Some(result),
            error: None,
        }
    }

    fn failed(url: &'a str, error: String) -> Self {
        Self {
            url,
            result: None,
            error: Some(error),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json_output = serde_json::to_string_pretty(value)?;
    println!("{}", json_output);
    Ok(())
}

// One line per page in batch mode
fn print_page_summary(url: &str, result: &CheckResult) {
    if !result.fetch().is_success() {
        println!(
            "❌ {} - fetch failed: {}",
            url,
            result.fetch().error_message().unwrap_or("unknown error")
        );
    } else if result.has_backlinks() {
        println!(
            "✅ {} - {} backlink(s), {} follow",
            url,
            result.backlinks().len(),
            result.follow_count()
        );
    } else {
        println!("❌ {} - no matching backlinks", url);
    }
}

// Prints the backlinks of one page as a human-readable table
fn print_table(result: &CheckResult) {
    println!(
        "{:<50} {:<6} {:<9} {:<10} {:<30}",
        "TARGET", "TAG", "NOFOLLOW", "WINDOW", "TEXT"
    );
    println!("{}", "=".repeat(108));

    for link in result.backlinks() {
        let icon = match link.tag_type() {
            TagType::Anchor => "🔗",
            TagType::Image => "🖼️",
        };
        let tag = format!("{} {}", icon, link.tag_type().tag_name());
        let no_follow = if link.no_follow() { "yes" } else { "no" };

        println!(
            "{:<50} {:<6} {:<9} {:<10} {:<30}",
            truncate(link.target(), 50),
            tag,
            no_follow,
            truncate(link.link_window(), 10),
            truncate(link.content(), 30)
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   🔗 Backlinks: {}", result.backlinks().len());
    println!("   ✅ Follow: {}", result.follow_count());
    if let Some(status) = result.fetch().status_code() {
        println!("   🌐 HTTP status: {}", status);
    }
}

// Shortens text for a table column, on a char boundary
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_scan_options_from_flags() {
        let scan = ScanArgs {
            images: true,
            no_links: true,
            browser: false,
            json: false,
        };
        let options = scan_options(&scan, true);
        assert!(!options.scan_links);
        assert!(options.scan_images);
        assert!(options.make_screenshot);
    }

    #[tokio::test]
    async fn test_check_against_saved_page() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        std::fs::write(&page, r#"<a href="https://x.test/" rel="nofollow">saved</a>"#).unwrap();

        let scan = ScanArgs {
            images: false,
            no_links: false,
            browser: false,
            json: true,
        };
        let code = handle_check(
            &FetchConfig::default(),
            "https://blog.test/",
            r"x\.test",
            &scan,
            None,
            Some(page),
        )
        .await
        .unwrap();
        assert_eq!(code, 0);

        let code = handle_check(
            &FetchConfig::default(),
            "https://blog.test/",
            r"nowhere\.test",
            &scan,
            None,
            Some(dir.path().join("page.html")),
        )
        .await
        .unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_check_with_bad_pattern_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        std::fs::write(&page, "<p></p>").unwrap();

        let scan = ScanArgs {
            images: false,
            no_links: false,
            browser: false,
            json: true,
        };
        let result = handle_check(
            &FetchConfig::default(),
            "https://blog.test/",
            "(",
            &scan,
            None,
            Some(page),
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_build_fetcher_picks_strategy() {
        let config = FetchConfig::default();
        assert_eq!(build_fetcher(&config, true).unwrap().name(), "browser");
        assert_eq!(build_fetcher(&config, false).unwrap().name(), "http");
    }
}
