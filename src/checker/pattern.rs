// src/checker/pattern.rs
// =============================================================================
// PatternMatcher: a compiled backlink pattern.
//
// The pattern is a regular expression in `regex` crate syntax. It is compiled
// once, up front, so a typo in the pattern is reported before any page is
// fetched. Matching uses "contains a match" semantics: the pattern may match
// any substring of the URL. Anchor it with ^ and $ if you need a full match.
// =============================================================================

use regex::Regex;

use super::error::{CheckerError, Result};

/// A validated, precompiled match rule for backlink targets.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    /// Compiles `pattern`.
    ///
    /// Fails with `InvalidPattern` if the pattern is empty (it would match
    /// every URL on the page) or the regex does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(CheckerError::InvalidPattern {
                pattern: String::new(),
                reason: "pattern must not be empty".to_string(),
                source: None,
            });
        }

        let regex = Regex::new(pattern).map_err(|source| CheckerError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: source.to_string(),
            source: Some(source),
        })?;

        Ok(Self { regex })
    }

    /// True if the pattern matches anywhere inside `target`.
    pub fn is_match(&self, target: &str) -> bool {
        self.regex.is_match(target)
    }

    /// The pattern as the caller wrote it
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match() {
        let matcher = PatternMatcher::new(r"x\.test").unwrap();
        assert!(matcher.is_match("http://x.test/a"));
        assert!(matcher.is_match("https://www.x.test"));
        assert!(!matcher.is_match("http://xytest/a"));
    }

    #[test]
    fn test_unbalanced_pattern_is_invalid() {
        for pattern in ["(", "[a-", "a)", "(?P<name"] {
            let err = PatternMatcher::new(pattern).unwrap_err();
            assert!(
                matches!(err, CheckerError::InvalidPattern { .. }),
                "expected InvalidPattern for {pattern:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_empty_pattern_is_invalid_pattern() {
        let err = PatternMatcher::new("").unwrap_err();
        assert!(matches!(err, CheckerError::InvalidPattern { source: None, .. }));
        assert_eq!(err.to_string(), "Invalid pattern '': pattern must not be empty");
    }

    #[test]
    fn test_case_insensitive_flag() {
        let matcher = PatternMatcher::new(r"(?i)example\.com").unwrap();
        assert!(matcher.is_match("https://EXAMPLE.com/page"));
        assert_eq!(matcher.as_str(), r"(?i)example\.com");
    }
}
