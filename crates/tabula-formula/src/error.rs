//! Formula error types
//!
//! Parse failures and evaluation failures are distinct types so that callers
//! can catch a [`ParseError`] (to report a formula as malformed) without
//! conflating it with a typed [`EvalError`].

use crate::ast::CellAddress;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Umbrella error for parse or evaluation failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Malformed formula text
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Failure while evaluating a well-formed formula
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),
}

/// Errors raised while parsing formula text into an AST
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Text does not begin with the `=` formula marker
    #[error("formula must start with '='")]
    MissingMarker,

    /// An expression position held no text
    #[error("empty expression")]
    Empty,

    /// A quoted span was never closed
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// A binary split produced an empty operand
    #[error("empty operand for operator '{0}'")]
    EmptyOperand(char),

    /// Parentheses do not balance
    #[error("unbalanced parentheses")]
    UnbalancedParens,

    /// A reserved character appeared in an unquoted identifier
    #[error("reserved character '{0}' in bare identifier")]
    ReservedChar(char),

    /// An identifier does not start with a legal character
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// A cell or range endpoint is not a valid reference
    #[error("invalid cell reference: {0}")]
    InvalidReference(String),

    /// Leftover text after a complete operand
    #[error("unexpected trailing input: {0}")]
    TrailingInput(String),
}

/// Errors raised while evaluating an AST
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Operator applied to incompatible value tags
    #[error("operator '{op}' cannot combine {lhs} and {rhs}")]
    TypeMismatch {
        op: char,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// Unary operator applied to an incompatible value tag
    #[error("unary '{op}' cannot apply to {operand}")]
    UnaryTypeMismatch { op: char, operand: &'static str },

    /// Division or remainder by a zero number
    #[error("division by zero")]
    DivisionByZero,

    /// Arithmetic exceeded the representable range
    #[error("numeric overflow")]
    Overflow,

    /// `^` requires an integer exponent
    #[error("exponent must be an integer")]
    NonIntegerExponent,

    /// A referenced cell has no value
    #[error("unresolved cell reference: {0}")]
    UnresolvedReference(CellAddress),

    /// A range appeared where a single value is required
    #[error("range is not a scalar value")]
    RangeNotScalar,

    /// Function name not in the builtin set
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Function called with no usable arguments
    #[error("function {0} requires at least one argument")]
    MissingArguments(String),

    /// Function argument of the wrong tag
    #[error("function {function} cannot accept a {actual} argument")]
    ArgumentType {
        function: String,
        actual: &'static str,
    },
}
