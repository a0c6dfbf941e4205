//! Error types for tabula-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabula-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text is not a valid numeric literal
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Text is not a recognized timestamp format
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Text is not a recognized duration format
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Text matches neither `true` nor `false`
    #[error("Not a boolean literal: {0}")]
    NotBoolean(String),

    /// Unknown expected-value-type spelling
    #[error("Unknown value type: {0}")]
    UnknownValueType(String),
}
