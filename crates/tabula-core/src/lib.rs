//! # tabula-core
//!
//! Core value types for the tabula spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout tabula:
//! - [`Numeric`] - Arbitrary-precision decimal cell numbers
//! - [`CellValue`] - The closed typed union of cell values
//! - [`ExpectedType`] - The advisory value-type vocabulary
//! - [`classify`] - Raw text to typed value classification
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{classify, CellValue, ExpectedType};
//!
//! let value = classify("42.5");
//! assert_eq!(value.value_type(), ExpectedType::Number);
//!
//! let value = classify("true");
//! assert_eq!(value, CellValue::Boolean(true));
//! ```

pub mod classify;
pub mod error;
pub mod number;
pub mod value;

// Re-exports for convenience
pub use classify::classify;
pub use error::{Error, Result};
pub use number::Numeric;
pub use value::{CellValue, ExpectedType};
