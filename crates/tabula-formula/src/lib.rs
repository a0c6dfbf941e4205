//! # tabula-formula
//!
//! Formula parser and evaluator for tabula.
//!
//! This crate provides:
//! - Formula parsing (text → AST) over a reserved-character grammar
//! - Deferred evaluation (AST → value) through an injected cell resolver
//! - A small builtin aggregate function set
//!
//! ## Example
//!
//! ```rust
//! use tabula_formula::{evaluate_text, NoCells};
//!
//! let value = evaluate_text("=1+2", &NoCells).unwrap();
//! assert_eq!(value.to_text(), "3");
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{BinaryOp, CellAddress, Expr, UnaryOp};
pub use error::{EvalError, FormulaError, FormulaResult, ParseError};
pub use evaluator::{evaluate_text, is_formula, CellResolver, Deferred, NoCells};
pub use parser::parse;
