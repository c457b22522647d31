//! Error types for docnorm operations.
//!
//! This module defines the main error type [`NormalizeError`] which represents
//! everything that can go wrong while reading sources, loading rules files,
//! normalizing documents and validating record stores.
//!
//! Extraction misses (no version found, no heading matched) are never errors;
//! they surface as `None` or a fallback value.
//!
//! # Example
//!
//! ```rust
//! use docnorm_core::{NormalizeError, Result};
//!
//! fn require_text(text: &str) -> Result<&str> {
//!     if text.is_empty() {
//!         return Err(NormalizeError::InvalidEncoding);
//!     }
//!     Ok(text)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for normalization operations.
///
/// Every variant carries enough context to locate the offending input so the
/// batch runner can report it without aborting the rest of the run.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// Source file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Source document is not valid UTF-8.
    #[error("Invalid character encoding")]
    InvalidEncoding,

    /// Standard I/O failure while reading a source or writing a record store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of a record store or crawler feed is not a well-formed record.
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    /// A crawled page carries an unparseable URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A rule pattern failed to compile.
    #[error("Invalid rule pattern `{pattern}`: {message}")]
    InvalidRule { pattern: String, message: String },

    /// Rules file could not be read or parsed.
    #[error("Rules error: {0}")]
    RulesError(String),

    /// Record could not be encoded as JSON.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Worker pool could not be constructed.
    #[error("Worker pool error: {0}")]
    Pool(String),

    /// Processing one unit panicked; the payload message is kept.
    #[error("Processing panicked: {0}")]
    Panicked(String),
}

impl From<rayon::ThreadPoolBuildError> for NormalizeError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        NormalizeError::Pool(err.to_string())
    }
}

/// Result type alias for NormalizeError.
pub type Result<T> = std::result::Result<T, NormalizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NormalizeError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_malformed_record_error() {
        let err = NormalizeError::MalformedRecord { line: 12, message: "EOF while parsing".to_string() };
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains("EOF"));
    }

    #[test]
    fn test_invalid_rule_error() {
        let err = NormalizeError::InvalidRule { pattern: "(".to_string(), message: "unclosed group".to_string() };
        assert!(err.to_string().contains("`(`"));
    }

    #[test]
    fn test_file_not_found_error() {
        let err = NormalizeError::FileNotFound(PathBuf::from("/missing/doc.txt"));
        assert!(err.to_string().contains("/missing/doc.txt"));
    }
}
