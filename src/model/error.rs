//! Error types for the search core.
//!
//! Hierarchical error types using thiserror. Nothing in the core panics or
//! propagates a raw error to the caller: every failure either becomes a
//! structured command response or is swallowed with a diagnostic.

use thiserror::Error;

/// Top-level error for the CLI driver.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read document: {0}")]
    DocumentRead(#[from] std::io::Error),

    #[error("Failed to parse document: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Invalid command input: {0}")]
    CommandInput(String),
}

/// Query rejection reasons, surfaced verbatim in the error envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Regular expression failed to compile.
    #[error("Invalid regular expression: {reason}")]
    Regex {
        /// Compiler message from the regex engine.
        reason: String,
    },

    /// CSS selector failed to parse.
    #[error("Invalid CSS selector '{selector}': {reason}")]
    CssSelector { selector: String, reason: String },

    /// XPath expression failed to parse.
    #[error("Invalid XPath expression '{expression}': {reason}")]
    XPath { expression: String, reason: String },
}

/// Document parsing errors.
///
/// The parser recovers from tag soup; only irrecoverable input fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unterminated tag starting at byte {position}")]
    UnterminatedTag { position: usize },

    #[error("Unterminated comment starting at byte {position}")]
    UnterminatedComment { position: usize },

    #[error("Document contains no element content")]
    EmptyDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_regex_display() {
        let err = QueryError::Regex {
            reason: "unclosed group".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid regular expression"));
        assert!(msg.contains("unclosed group"));
    }

    #[test]
    fn query_error_css_display_includes_selector() {
        let err = QueryError::CssSelector {
            selector: "div[".to_string(),
            reason: "unexpected end".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("div["));
        assert!(msg.contains("unexpected end"));
    }

    #[test]
    fn query_error_xpath_display_includes_expression() {
        let err = QueryError::XPath {
            expression: "//div[@".to_string(),
            reason: "truncated predicate".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("//div[@"));
        assert!(msg.contains("truncated predicate"));
    }

    #[test]
    fn parse_error_display_carries_position() {
        let err = ParseError::UnterminatedTag { position: 42 };
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn app_error_from_parse_error() {
        let parse_err = ParseError::EmptyDocument;
        let app_err: AppError = parse_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to parse document"));
        assert!(msg.contains("no element content"));
    }
}
