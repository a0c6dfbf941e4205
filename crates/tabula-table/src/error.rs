//! Error types for tabula-table

use tabula_formula::FormulaError;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabula-table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Formula parse or evaluation failure
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    /// Unknown table-item-type spelling
    #[error("Unknown table item type: {0}")]
    UnknownItemType(String),

    /// Core value error
    #[error(transparent)]
    Core(#[from] tabula_core::Error),
}
