//! Error types for the textmine library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`TextmineError`] enum. Empty input is never an error: every stage yields
//! an empty table instead.
//!
//! # Examples
//!
//! ```
//! use textmine::error::{Result, TextmineError};
//!
//! fn check_gram_size(n: usize) -> Result<()> {
//!     if n == 0 {
//!         return Err(TextmineError::invalid_config("n must be at least 1"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_gram_size(0).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for textmine operations.
#[derive(Error, Debug)]
pub enum TextmineError {
    /// Bad n-gram size, uncompilable regex, unknown tokenization mode or column.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input that cannot be scored or parsed (e.g. tf-idf over zero documents).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A logic bug surfaced with the key that broke the invariant.
    #[error("Invariant violation for {key}: {message}")]
    InvariantViolation { key: String, message: String },

    /// I/O errors raised while loading corpora, lexicons or stop words.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed delimited input, e.g. a lexicon TSV file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for operations that may fail with TextmineError.
pub type Result<T> = std::result::Result<T, TextmineError>;

impl TextmineError {
    /// Create a new invalid configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TextmineError::InvalidConfiguration(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        TextmineError::InvalidInput(msg.into())
    }

    /// Create a new invariant violation carrying the offending key.
    pub fn invariant<K: Into<String>, S: Into<String>>(key: K, msg: S) -> Self {
        TextmineError::InvariantViolation {
            key: key.into(),
            message: msg.into(),
        }
    }

    /// Wrap a regex compilation failure as a configuration error.
    pub fn regex(pattern: &str, err: regex::Error) -> Self {
        TextmineError::InvalidConfiguration(format!("Invalid regex pattern {pattern:?}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = TextmineError::invalid_config("n must be at least 1");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: n must be at least 1"
        );

        let error = TextmineError::invalid_input("no documents");
        assert_eq!(error.to_string(), "Invalid input: no documents");

        let error = TextmineError::invariant("x", "document frequency 3 exceeds 2 documents");
        assert_eq!(
            error.to_string(),
            "Invariant violation for x: document frequency 3 exceeds 2 documents"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = TextmineError::from(io_error);

        match error {
            TextmineError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_regex_error_is_configuration() {
        let err = regex::Regex::new("(unclosed").unwrap_err();
        let error = TextmineError::regex("(unclosed", err);
        assert!(matches!(error, TextmineError::InvalidConfiguration(_)));
    }
}
