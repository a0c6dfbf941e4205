//! Formula parser
//!
//! A recursive descent parser over a reserved-character grammar. A binary
//! expression is split on the *first* top-level occurrence of an operator
//! character (no precedence table); quoted spans and parenthesized groups are
//! opaque to the split scan. `=2*3+4` therefore parses as `2*(3+4)` — this
//! left-to-right, no-precedence behavior is deliberate and pinned by tests.

use crate::ast::{BinaryOp, CellAddress, Expr, UnaryOp};
use crate::error::ParseError;
use tabula_core::{classify, CellValue};

/// The characters that may never appear inside an unquoted identifier
const RESERVED: &[char] = &[
    '"', '+', '-', '*', '/', '%', '^', '#', '&', '~', '|', '<', '>', '=', '!', '(', ')', '{',
    '}', '[', ']', ':', ';', ',', '.', '\'',
];

pub(crate) fn is_reserved(c: char) -> bool {
    RESERVED.contains(&c)
}

fn is_operator(c: char) -> bool {
    BinaryOp::from_char(c).is_some()
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Parse formula text into an AST
///
/// The text must begin with `=` after leading whitespace; callers route
/// non-formula text to the classifier instead.
///
/// # Example
/// ```rust
/// use tabula_formula::parse;
///
/// let ast = parse("=1+2").unwrap();
/// let ast = parse("=sum(A1:A10)").unwrap();
/// assert!(parse("=(unterminated").is_err());
/// ```
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let body = text
        .trim_start()
        .strip_prefix('=')
        .ok_or(ParseError::MissingMarker)?;
    parse_expression(body)
}

/// Parse one complete expression
fn parse_expression(text: &str) -> Result<Expr, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    // Single-split on the first top-level operator character
    if let Some((idx, c)) = find_top_level(text, is_operator)? {
        let op = BinaryOp::from_char(c).unwrap_or(BinaryOp::Plus);
        let lhs = text[..idx].trim();
        let rhs = text[idx + c.len_utf8()..].trim();
        if lhs.is_empty() {
            let op = match c {
                '+' => UnaryOp::Plus,
                '-' => UnaryOp::Minus,
                _ => return Err(ParseError::EmptyOperand(c)),
            };
            if rhs.is_empty() {
                return Err(ParseError::EmptyOperand(c));
            }
            return Ok(Expr::UnaryOp {
                op,
                operand: Box::new(parse_expression(rhs)?),
            });
        }
        if rhs.is_empty() {
            return Err(ParseError::EmptyOperand(c));
        }
        return Ok(Expr::BinaryOp {
            op,
            lhs: Box::new(parse_expression(lhs)?),
            rhs: Box::new(parse_expression(rhs)?),
        });
    }

    parse_operand(text)
}

/// Parse an operand that contains no top-level operator character
fn parse_operand(text: &str) -> Result<Expr, ParseError> {
    // Parenthesized group
    if let Some(inner) = text.strip_prefix('(') {
        let inner = inner
            .strip_suffix(')')
            .ok_or(ParseError::UnbalancedParens)?;
        return parse_expression(inner);
    }

    // Quoted text literal; reserved characters are legal inside
    if text.starts_with(is_quote) {
        let (content, rest) = scan_quoted(text)?;
        if !rest.trim().is_empty() {
            return Err(ParseError::TrailingInput(rest.trim().to_string()));
        }
        return Ok(Expr::Literal(CellValue::Text(content)));
    }

    // Colon: a range between two cell references, or a declaration
    if let Some((idx, _)) = find_top_level(text, |c| c == ':')? {
        let left = text[..idx].trim();
        let right = text[idx + 1..].trim();
        if left.is_empty() || right.is_empty() {
            return Err(ParseError::EmptyOperand(':'));
        }
        if let (Ok(first), Ok(last)) = (left.parse::<CellAddress>(), right.parse::<CellAddress>())
        {
            return Ok(Expr::Range { first, last });
        }
        let name = parse_label(left)?;
        return Ok(Expr::Declaration {
            name,
            value: Box::new(parse_expression(right)?),
        });
    }

    // Function call: a label immediately followed by its argument list
    if text.ends_with(')') {
        if let Some(open) = text.find('(') {
            let name = parse_label(text[..open].trim_end())?;
            let inner = &text[open + 1..text.len() - 1];
            let args = if inner.trim().is_empty() {
                Vec::new()
            } else {
                split_top_level(inner, ',')?
                    .into_iter()
                    .map(parse_expression)
                    .collect::<Result<Vec<_>, _>>()?
            };
            return Ok(Expr::Function { name, args });
        }
    }

    // Cell reference
    if let Ok(addr) = text.parse::<CellAddress>() {
        return Ok(Expr::CellRef(addr));
    }

    // Bare literal: same classification priority as literal cells. A bare
    // word that classifies as text must also be a legal identifier.
    match classify(text) {
        CellValue::Text(_) => {
            let label = parse_label(text)?;
            Ok(Expr::Literal(CellValue::Text(label)))
        }
        value => Ok(Expr::Literal(value)),
    }
}

/// Scan an identifier covering the whole range
///
/// The first character must be neither numeric nor reserved; subsequent
/// characters must be non-reserved. No leading junk is skipped.
fn parse_label(text: &str) -> Result<String, ParseError> {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if !c.is_ascii_digit() && !is_reserved(c) && !c.is_whitespace() => {}
        _ => return Err(ParseError::InvalidLabel(text.to_string())),
    }
    for c in chars {
        if is_reserved(c) {
            return Err(ParseError::ReservedChar(c));
        }
    }
    Ok(text.to_string())
}

/// Find the first top-level character matching `pred`
///
/// Quoted spans (with backslash escapes) and parenthesized groups are
/// skipped. Unterminated quotes and unbalanced parentheses are reported from
/// here, so every expression gets scanned for them exactly once.
fn find_top_level<F>(text: &str, pred: F) -> Result<Option<(usize, char)>, ParseError>
where
    F: Fn(char) -> bool,
{
    let mut depth: u32 = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or(ParseError::UnbalancedParens)?;
            }
            _ if depth == 0 && pred(c) => return Ok(Some((i, c))),
            _ => {}
        }
    }
    if quote.is_some() {
        return Err(ParseError::UnterminatedQuote);
    }
    if depth != 0 {
        return Err(ParseError::UnbalancedParens);
    }
    Ok(None)
}

/// Split on every top-level occurrence of `sep`
fn split_top_level(text: &str, sep: char) -> Result<Vec<&str>, ParseError> {
    let mut parts = Vec::new();
    let mut rest = text;
    loop {
        match find_top_level(rest, |c| c == sep)? {
            Some((idx, _)) => {
                parts.push(&rest[..idx]);
                rest = &rest[idx + sep.len_utf8()..];
            }
            None => {
                parts.push(rest);
                return Ok(parts);
            }
        }
    }
}

/// Consume a quoted span starting at the opening quote
///
/// Returns the unescaped content and the remainder after the closing quote.
fn scan_quoted(text: &str) -> Result<(String, &str), ParseError> {
    let mut chars = text.char_indices();
    let quote = match chars.next() {
        Some((_, c)) if is_quote(c) => c,
        _ => return Err(ParseError::UnterminatedQuote),
    };
    let mut content = String::new();
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            content.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((content, &text[i + c.len_utf8()..]));
        } else {
            content.push(c);
        }
    }
    Err(ParseError::UnterminatedQuote)
}
