//! Formula Abstract Syntax Tree types

use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;
use tabula_core::CellValue;

/// Formula expression AST
///
/// Composite nodes exclusively own their children; the tree is immutable
/// after construction and carries no sharing or cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value (text, number, timestamp, or boolean)
    Literal(CellValue),

    /// Single cell reference
    CellRef(CellAddress),

    /// Rectangular range between two cell references
    Range {
        first: CellAddress,
        last: CellAddress,
    },

    /// Binding of a label to an expression
    Declaration { name: String, value: Box<Expr> },

    /// Unary operation
    UnaryOp { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation, tagged by its operator character
    BinaryOp {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// Function call
    Function { name: String, args: Vec<Expr> },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(CellValue::Text(s)) => {
                write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            }
            Expr::Literal(v) => write!(f, "{v}"),
            Expr::CellRef(addr) => write!(f, "{addr}"),
            Expr::Range { first, last } => write!(f, "{first}:{last}"),
            Expr::Declaration { name, value } => write!(f, "{name}: {value}"),
            Expr::UnaryOp { op, operand } => write!(f, "{}{operand}", op.symbol()),
            Expr::BinaryOp { op, lhs, rhs } => {
                write!(f, "({lhs} {} {rhs})", op.symbol())
            }
            Expr::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Binary operators, one variant per operator character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Ampersand,
    Pipe,
    Less,
    Greater,
    Equal,
}

impl BinaryOp {
    /// The operator character this variant is tagged by
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Plus => '+',
            BinaryOp::Minus => '-',
            BinaryOp::Star => '*',
            BinaryOp::Slash => '/',
            BinaryOp::Percent => '%',
            BinaryOp::Caret => '^',
            BinaryOp::Ampersand => '&',
            BinaryOp::Pipe => '|',
            BinaryOp::Less => '<',
            BinaryOp::Greater => '>',
            BinaryOp::Equal => '=',
        }
    }

    /// Map an operator character to its variant
    pub fn from_char(c: char) -> Option<BinaryOp> {
        match c {
            '+' => Some(BinaryOp::Plus),
            '-' => Some(BinaryOp::Minus),
            '*' => Some(BinaryOp::Star),
            '/' => Some(BinaryOp::Slash),
            '%' => Some(BinaryOp::Percent),
            '^' => Some(BinaryOp::Caret),
            '&' => Some(BinaryOp::Ampersand),
            '|' => Some(BinaryOp::Pipe),
            '<' => Some(BinaryOp::Less),
            '>' => Some(BinaryOp::Greater),
            '=' => Some(BinaryOp::Equal),
            _ => None,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    pub fn symbol(&self) -> char {
        match self {
            UnaryOp::Plus => '+',
            UnaryOp::Minus => '-',
        }
    }
}

/// Zero-based cell coordinates with A1-style text form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Column index (A = 0)
    pub col: u32,
    /// Row index (1 = 0)
    pub row: u32,
}

impl CellAddress {
    /// Create an address from zero-based column and row indices
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

impl FromStr for CellAddress {
    type Err = ParseError;

    /// Parse an A1-style reference: one or more letters then one or more
    /// digits, nothing else.
    fn from_str(s: &str) -> Result<Self, ParseError> {
        let err = || ParseError::InvalidReference(s.to_string());
        let letters: String = s.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
        let digits = &s[letters.len()..];
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }
        let mut col: u32 = 0;
        for c in letters.chars() {
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
                .ok_or_else(err)?;
        }
        let row: u32 = digits.parse().map_err(|_| err())?;
        if row == 0 {
            return Err(err());
        }
        Ok(CellAddress::new(col - 1, row - 1))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut col = self.col + 1;
        let mut letters = Vec::new();
        while col > 0 {
            let rem = (col - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            col = (col - 1) / 26;
        }
        for c in letters.iter().rev() {
            write!(f, "{c}")?;
        }
        write!(f, "{}", self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_address_parse() {
        assert_eq!("A1".parse::<CellAddress>().unwrap(), CellAddress::new(0, 0));
        assert_eq!("b2".parse::<CellAddress>().unwrap(), CellAddress::new(1, 1));
        assert_eq!(
            "AA10".parse::<CellAddress>().unwrap(),
            CellAddress::new(26, 9)
        );
    }

    #[test]
    fn test_address_rejects_malformed() {
        for text in ["", "A", "1", "A0", "A1B", "$A$1"] {
            assert!(text.parse::<CellAddress>().is_err(), "{text}");
        }
    }

    #[test]
    fn test_address_display_round_trip() {
        for text in ["A1", "Z99", "AA10", "AB100"] {
            let addr: CellAddress = text.parse().unwrap();
            assert_eq!(addr.to_string(), text);
        }
    }

    #[test]
    fn test_expr_display() {
        let expr = Expr::BinaryOp {
            op: BinaryOp::Plus,
            lhs: Box::new(Expr::CellRef(CellAddress::new(0, 0))),
            rhs: Box::new(Expr::Literal(CellValue::Text("a\"b".into()))),
        };
        assert_eq!(expr.to_string(), "(A1 + \"a\\\"b\")");
    }
}
