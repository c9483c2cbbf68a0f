// src/checker/extract.rs
// =============================================================================
// The extraction engine: finds backlinks in raw HTML.
//
// How it works:
// 1. Parse the HTML into a DOM with `scraper` (tolerant of broken markup)
// 2. Pass 1: every <a href>, keep the ones whose href matches the pattern
// 3. Pass 2: every <img src>, keep the ones whose src matches the pattern
//
// The two passes are independent, so all anchors come before all images in
// the output even if an image appears first in the document. Matches are not
// deduplicated: the same href twice on a page gives two records.
//
// Entity decoding comes from html5ever: both text nodes and attribute values
// are already decoded when we read them, so "A &amp; B" arrives as "A & B".
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::backlink::Backlink;
use super::error::{CheckerError, Result};
use super::pattern::PatternMatcher;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("Failed to parse anchor selector - this is a bug")
});

static IMAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img[src]").expect("Failed to parse image selector - this is a bug")
});

// Extracts every backlink matching `pattern` from `html`
//
// Parameters:
//   html: raw page body
//   pattern: compiled match rule, tested against href/src with "contains" semantics
//   scan_links: look at <a href> elements
//   scan_images: look at <img src> elements
//
// Returns: matching records, anchors first, each pass in document order
//
// Errors: ParseFailure if the body is not a usable text document
pub fn extract_backlinks(
    html: &str,
    pattern: &PatternMatcher,
    scan_links: bool,
    scan_images: bool,
) -> Result<Vec<Backlink>> {
    let mut backlinks = Vec::new();

    // Nothing to scan, don't bother building a DOM
    if html.is_empty() {
        return Ok(backlinks);
    }

    let document = parse_document(html)?;

    if scan_links {
        backlinks.extend(
            document
                .select(&ANCHOR_SELECTOR)
                .filter_map(|element| anchor_backlink(element, pattern)),
        );
    }

    if scan_images {
        backlinks.extend(
            document
                .select(&IMAGE_SELECTOR)
                .filter_map(|element| image_backlink(element, pattern)),
        );
    }

    ::log::debug!(
        "Found {} backlink(s) matching '{}'",
        backlinks.len(),
        pattern.as_str()
    );

    Ok(backlinks)
}

// Leading bytes of formats that get served in place of a page by mistake.
// The body has already been decoded as text, so only signatures that
// survive lossy UTF-8 decoding are listed.
const BINARY_SIGNATURES: &[&str] = &[
    "\u{89}PNG",
    "\u{FFFD}PNG",
    "GIF87a",
    "GIF89a",
    "%PDF-",
    "PK\u{3}\u{4}",
    "\u{1f}\u{FFFD}\u{8}",
];

// How many leading chars are sampled when looking for control characters
const BINARY_SAMPLE_CHARS: usize = 1024;

// Parses the body into a DOM.
//
// html5ever never rejects markup, however broken, and stray control
// characters are just replaced. What it cannot give us is a meaningful
// document from binary data (an image or archive served where a page was
// expected).
fn parse_document(html: &str) -> Result<Html> {
    if looks_binary(html) {
        return Err(CheckerError::ParseFailure(
            "document contains binary data".to_string(),
        ));
    }

    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        ::log::trace!("HTML parser recovered from {} error(s)", document.errors.len());
    }

    Ok(document)
}

// True if the body starts with a known binary signature, or if more than a
// tenth of its first chars are control characters other than whitespace.
fn looks_binary(body: &str) -> bool {
    if BINARY_SIGNATURES.iter().any(|sig| body.starts_with(sig)) {
        return true;
    }

    let mut sampled = 0;
    let mut control = 0;
    for c in body.chars().take(BINARY_SAMPLE_CHARS) {
        sampled += 1;
        if c.is_control() && !c.is_ascii_whitespace() {
            control += 1;
        }
    }

    control * 10 > sampled
}

// Builds a Backlink from an <a> element if its href matches
fn anchor_backlink(element: ElementRef<'_>, pattern: &PatternMatcher) -> Option<Backlink> {
    let attrs = element.value();
    let href = attrs.attr("href")?;
    if !pattern.is_match(href) {
        return None;
    }

    let content = element.text().collect::<String>().trim().to_string();
    let no_follow = attrs.attr("rel").is_some_and(has_nofollow);
    let link_window = attrs.attr("target").unwrap_or_default().to_string();

    Some(Backlink::anchor(
        href.to_string(),
        content,
        no_follow,
        link_window,
    ))
}

// Builds a Backlink from an <img> element if its src matches
fn image_backlink(element: ElementRef<'_>, pattern: &PatternMatcher) -> Option<Backlink> {
    let attrs = element.value();
    let src = attrs.attr("src")?;
    if !pattern.is_match(src) {
        return None;
    }

    let alt = attrs
        .attr("alt")
        .map(|alt| alt.trim().to_string())
        .unwrap_or_default();

    Some(Backlink::image(src.to_string(), alt))
}

// True if the rel attribute's token list contains "nofollow" (any case).
// Other tokens like "ugc" or "sponsored" are ignored.
fn has_nofollow(rel: &str) -> bool {
    rel.split_whitespace()
        .any(|token| token.eq_ignore_ascii_case("nofollow"))
}
