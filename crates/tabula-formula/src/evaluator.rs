//! Formula evaluator
//!
//! Formula text parses to a [`Deferred`] computation: an owned AST that is
//! invoked explicitly against a [`CellResolver`] each time a result is
//! needed. Evaluation is pure given a fixed resolver snapshot, so deferred
//! computations can be re-invoked after a dependency changes.
//!
//! Operators never coerce between value tags; a mismatch is a typed
//! [`EvalError`], not a corrupted result.

use crate::ast::{BinaryOp, CellAddress, Expr, UnaryOp};
use crate::error::{EvalError, FormulaError, ParseError};
use crate::parser::parse;
use std::collections::HashMap;
use tabula_core::{classify, CellValue, Numeric};

/// Dependency-lookup capability: resolves a cell reference to its current
/// value. Injected so evaluation is testable without a real table.
pub trait CellResolver {
    /// The value of the cell at `addr`, or `None` if the cell is unset
    fn cell_value(&self, addr: &CellAddress) -> Option<CellValue>;
}

impl<S: std::hash::BuildHasher> CellResolver for HashMap<CellAddress, CellValue, S> {
    fn cell_value(&self, addr: &CellAddress) -> Option<CellValue> {
        self.get(addr).cloned()
    }
}

/// A resolver with no cells; every reference is unresolved
pub struct NoCells;

impl CellResolver for NoCells {
    fn cell_value(&self, _addr: &CellAddress) -> Option<CellValue> {
        None
    }
}

/// A parsed formula awaiting evaluation
///
/// Holds the owned AST; dependency resolution is deferred until
/// [`invoke`](Deferred::invoke).
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred {
    ast: Expr,
}

impl Deferred {
    /// Wrap an already-parsed AST
    pub fn new(ast: Expr) -> Self {
        Self { ast }
    }

    /// Parse formula text (beginning with `=`) into a deferred computation
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(Self::new(parse(text)?))
    }

    /// The underlying AST
    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    /// Evaluate against the given resolver
    pub fn invoke(&self, cells: &dyn CellResolver) -> Result<CellValue, EvalError> {
        eval_expr(&self.ast, cells)
    }
}

/// True if the text is interpreted as a formula: its first non-whitespace
/// character is `=`
pub fn is_formula(text: &str) -> bool {
    text.trim_start().starts_with('=')
}

/// Evaluate raw cell text
///
/// Non-formula text delegates directly to the classifier and never fails;
/// formula text is parsed and invoked immediately.
///
/// # Example
/// ```rust
/// use tabula_formula::{evaluate_text, NoCells};
/// use tabula_core::CellValue;
///
/// let value = evaluate_text("=1+2", &NoCells).unwrap();
/// assert_eq!(value.to_text(), "3");
/// ```
pub fn evaluate_text(text: &str, cells: &dyn CellResolver) -> Result<CellValue, FormulaError> {
    if !is_formula(text) {
        return Ok(classify(text));
    }
    let deferred = Deferred::parse(text)?;
    Ok(deferred.invoke(cells)?)
}

fn eval_expr(expr: &Expr, cells: &dyn CellResolver) -> Result<CellValue, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::CellRef(addr) => cells
            .cell_value(addr)
            .ok_or(EvalError::UnresolvedReference(*addr)),
        Expr::Range { .. } => Err(EvalError::RangeNotScalar),
        Expr::Declaration { value, .. } => eval_expr(value, cells),
        Expr::UnaryOp { op, operand } => {
            let value = eval_expr(operand, cells)?;
            apply_unary(*op, value)
        }
        Expr::BinaryOp { op, lhs, rhs } => {
            let lhs = eval_expr(lhs, cells)?;
            let rhs = eval_expr(rhs, cells)?;
            apply_binary(*op, lhs, rhs)
        }
        Expr::Function { name, args } => eval_function(name, args, cells),
    }
}

fn apply_unary(op: UnaryOp, value: CellValue) -> Result<CellValue, EvalError> {
    match (op, value) {
        (UnaryOp::Minus, CellValue::Number(n)) => Ok(CellValue::Number(-n)),
        (UnaryOp::Plus, CellValue::Number(n)) => Ok(CellValue::Number(n)),
        (op, value) => Err(EvalError::UnaryTypeMismatch {
            op: op.symbol(),
            operand: value.type_name(),
        }),
    }
}

fn apply_binary(op: BinaryOp, lhs: CellValue, rhs: CellValue) -> Result<CellValue, EvalError> {
    use BinaryOp::*;
    use CellValue::*;
    match (op, lhs, rhs) {
        (Plus, Number(a), Number(b)) => Ok(Number(a + b)),
        (Minus, Number(a), Number(b)) => Ok(Number(a - b)),
        (Star, Number(a), Number(b)) => Ok(Number(a * b)),
        (Slash, Number(a), Number(b)) => {
            if b.is_zero() {
                Err(EvalError::DivisionByZero)
            } else {
                a.checked_div(b).map(Number).ok_or(EvalError::Overflow)
            }
        }
        (Percent, Number(a), Number(b)) => {
            if b.is_zero() {
                Err(EvalError::DivisionByZero)
            } else {
                a.checked_rem(b).map(Number).ok_or(EvalError::Overflow)
            }
        }
        (Caret, Number(a), Number(b)) => {
            let exp = b.to_i64().ok_or(EvalError::NonIntegerExponent)?;
            // A negative exponent inverts, so a zero base divides by zero
            if a.is_zero() && exp < 0 {
                return Err(EvalError::DivisionByZero);
            }
            a.checked_powi(exp).map(Number).ok_or(EvalError::Overflow)
        }
        (Ampersand, Text(a), Text(b)) => Ok(Text(a + &b)),
        (Ampersand, Boolean(a), Boolean(b)) => Ok(Boolean(a && b)),
        (Pipe, Boolean(a), Boolean(b)) => Ok(Boolean(a || b)),
        (Less, Number(a), Number(b)) => Ok(Boolean(a < b)),
        (Less, Text(a), Text(b)) => Ok(Boolean(a < b)),
        (Less, Timestamp(a), Timestamp(b)) => Ok(Boolean(a < b)),
        (Greater, Number(a), Number(b)) => Ok(Boolean(a > b)),
        (Greater, Text(a), Text(b)) => Ok(Boolean(a > b)),
        (Greater, Timestamp(a), Timestamp(b)) => Ok(Boolean(a > b)),
        (Equal, Number(a), Number(b)) => Ok(Boolean(a == b)),
        (Equal, Text(a), Text(b)) => Ok(Boolean(a == b)),
        (Equal, Timestamp(a), Timestamp(b)) => Ok(Boolean(a == b)),
        (Equal, Boolean(a), Boolean(b)) => Ok(Boolean(a == b)),
        (op, lhs, rhs) => Err(EvalError::TypeMismatch {
            op: op.symbol(),
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }),
    }
}

fn eval_function(
    name: &str,
    args: &[Expr],
    cells: &dyn CellResolver,
) -> Result<CellValue, EvalError> {
    let lowered = name.to_ascii_lowercase();
    match lowered.as_str() {
        "sum" => {
            let numbers = collect_numbers(&lowered, args, cells)?;
            Ok(CellValue::Number(
                numbers.into_iter().fold(Numeric::ZERO, |acc, n| acc + n),
            ))
        }
        "product" => {
            let numbers = collect_numbers(&lowered, args, cells)?;
            Ok(CellValue::Number(
                numbers.into_iter().fold(Numeric::ONE, |acc, n| acc * n),
            ))
        }
        "count" => {
            let numbers = collect_numbers(&lowered, args, cells)?;
            Ok(CellValue::Number(Numeric::from(numbers.len() as i64)))
        }
        "min" => {
            let numbers = collect_numbers(&lowered, args, cells)?;
            numbers
                .into_iter()
                .min()
                .map(CellValue::Number)
                .ok_or_else(|| EvalError::MissingArguments(lowered.clone()))
        }
        "max" => {
            let numbers = collect_numbers(&lowered, args, cells)?;
            numbers
                .into_iter()
                .max()
                .map(CellValue::Number)
                .ok_or_else(|| EvalError::MissingArguments(lowered.clone()))
        }
        _ => Err(EvalError::UnknownFunction(name.to_string())),
    }
}

/// Expand function arguments to their numeric values
///
/// Range arguments walk the rectangle through the resolver; unset and
/// non-numeric range cells are skipped. Scalar arguments must evaluate to
/// numbers.
fn collect_numbers(
    function: &str,
    args: &[Expr],
    cells: &dyn CellResolver,
) -> Result<Vec<Numeric>, EvalError> {
    let mut numbers = Vec::new();
    for arg in args {
        match arg {
            Expr::Range { first, last } => {
                let (col_lo, col_hi) = (first.col.min(last.col), first.col.max(last.col));
                let (row_lo, row_hi) = (first.row.min(last.row), first.row.max(last.row));
                for col in col_lo..=col_hi {
                    for row in row_lo..=row_hi {
                        let addr = CellAddress::new(col, row);
                        if let Some(CellValue::Number(n)) = cells.cell_value(&addr) {
                            numbers.push(n);
                        }
                    }
                }
            }
            _ => match eval_expr(arg, cells)? {
                CellValue::Number(n) => numbers.push(n),
                other => {
                    return Err(EvalError::ArgumentType {
                        function: function.to_string(),
                        actual: other.type_name(),
                    })
                }
            },
        }
    }
    Ok(numbers)
}
