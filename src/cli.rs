// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "backlink-checker",
    version,
    about = "Check web pages for backlinks matching a URL pattern",
    long_about = "backlink-checker fetches web pages and lists every link (and optionally image) \
                  pointing at URLs that match your pattern, with anchor text and nofollow status. \
                  Handy for auditing link placements and partner pages."
)]
pub struct Cli {
    /// Log what the checker is doing (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file with fetch settings (timeouts, user agent, WebDriver URL, ...)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check one page for backlinks
    ///
    /// Example: backlink-checker check https://blog.example.org 'mysite\.com'
    Check {
        /// Page to check
        url: String,

        /// Regex matched against each href/src (substring match)
        pattern: String,

        #[command(flatten)]
        scan: ScanArgs,

        /// Save a PNG screenshot of the page here (requires --browser)
        #[arg(long, value_name = "FILE")]
        screenshot: Option<PathBuf>,

        /// Read the page from a saved HTML file instead of fetching URL
        #[arg(long, value_name = "FILE", conflicts_with = "browser")]
        html_file: Option<PathBuf>,
    },

    /// Check many pages against one pattern, concurrently
    ///
    /// Example: backlink-checker batch 'mysite\.com' https://a.org https://b.org
    Batch {
        /// Regex matched against each href/src (substring match)
        pattern: String,

        /// Pages to check
        #[arg(required = true)]
        urls: Vec<String>,

        #[command(flatten)]
        scan: ScanArgs,

        /// How many pages to fetch at once (overrides the config file)
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

// Flags shared by both subcommands
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Also scan <img src> elements
    #[arg(long)]
    pub images: bool,

    /// Don't scan <a href> elements
    #[arg(long)]
    pub no_links: bool,

    /// Render pages in a headless browser through WebDriver
    #[arg(long)]
    pub browser: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::parse_from([
            "backlink-checker",
            "check",
            "https://blog.test/",
            r"x\.test",
            "--images",
            "--json",
        ]);

        match cli.command {
            Commands::Check { url, pattern, scan, screenshot, html_file } => {
                assert_eq!(url, "https://blog.test/");
                assert_eq!(pattern, r"x\.test");
                assert!(scan.images);
                assert!(!scan.no_links);
                assert!(scan.json);
                assert!(screenshot.is_none());
                assert!(html_file.is_none());
            }
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_batch_with_global_flags() {
        let cli = Cli::parse_from([
            "backlink-checker",
            "batch",
            "x",
            "https://a.test/",
            "https://b.test/",
            "--concurrency",
            "3",
            "-v",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Batch { urls, concurrency, .. } => {
                assert_eq!(urls.len(), 2);
                assert_eq!(concurrency, Some(3));
            }
            other => panic!("expected batch, got {:?}", other),
        }
    }

    #[test]
    fn test_html_file_conflicts_with_browser() {
        let result = Cli::try_parse_from([
            "backlink-checker",
            "check",
            "https://blog.test/",
            "x",
            "--browser",
            "--html-file",
            "page.html",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_requires_urls() {
        assert!(Cli::try_parse_from(["backlink-checker", "batch", "x"]).is_err());
    }
}
