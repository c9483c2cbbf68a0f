// src/checker/error.rs
// =============================================================================
// Error types returned by the backlink checker.
//
// Only misuse and unusable input are errors here. A page that could not be
// fetched is NOT an error: it is reported as data inside FetchResult, so the
// caller inspects `fetch.success()` instead of matching on an error.
//
// Rust concepts:
// - thiserror: Derives std::error::Error and Display from attributes
// - #[source]: Keeps the underlying regex error reachable via .source()
// =============================================================================

use thiserror::Error;

/// Everything that can make a backlink check fail loudly.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// A required input was missing or malformed (bad URL, broken client setup)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The match pattern is empty or not a valid regular expression
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: String,
        #[source]
        source: Option<regex::Error>,
    },

    /// The page body could not be turned into a usable HTML document
    #[error("Failed to parse HTML: {0}")]
    ParseFailure(String),
}

// Shorthand used across the library
pub type Result<T> = std::result::Result<T, CheckerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_message_names_pattern() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = CheckerError::InvalidPattern {
            pattern: "(".to_string(),
            reason: source.to_string(),
            source: Some(source),
        };
        assert!(err.to_string().starts_with("Invalid pattern '('"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_parse_failure_message() {
        let err = CheckerError::ParseFailure("binary content".to_string());
        assert_eq!(err.to_string(), "Failed to parse HTML: binary content");
    }
}
