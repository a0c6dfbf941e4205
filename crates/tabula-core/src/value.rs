//! Typed cell values
//!
//! A [`CellValue`] is exactly one of text, number, timestamp, or boolean. The
//! tag is fixed at construction; converting between tags always goes through
//! [`classify`](crate::classify::classify), never through constructors.

use crate::error::{Error, Result};
use crate::number::Numeric;
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

/// A typed cell value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Plain text
    Text(String),
    /// Decimal number (also covers elapsed-time durations, in seconds)
    Number(Numeric),
    /// Calendar date and time
    Timestamp(NaiveDateTime),
    /// Boolean
    Boolean(bool),
}

impl CellValue {
    /// The tag of this value, as an [`ExpectedType`]
    pub fn value_type(&self) -> ExpectedType {
        match self {
            CellValue::Text(_) => ExpectedType::Text,
            CellValue::Number(_) => ExpectedType::Number,
            CellValue::Timestamp(_) => ExpectedType::Timestamp,
            CellValue::Boolean(_) => ExpectedType::Boolean,
        }
    }

    /// Tag name for error messages
    pub fn type_name(&self) -> &'static str {
        self.value_type().as_str()
    }

    /// Render this value as cell text
    ///
    /// Booleans render as `true`/`false`, timestamps as ISO-8601 extended,
    /// numbers at full precision. Classifying the rendered text reproduces
    /// the same tag and value.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
            // %.f prints nothing when the fractional part is zero
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%S%.f")),
            CellValue::Boolean(true) => f.write_str("true"),
            CellValue::Boolean(false) => f.write_str("false"),
        }
    }
}

impl From<Numeric> for CellValue {
    fn from(value: Numeric) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::Timestamp(value)
    }
}

/// Advisory value-type hint for a cell or column schema
///
/// Distinct from the tag the classifier actually inferred. Round-trips
/// through the exact case-sensitive spellings `General | Text | Number |
/// Timestamp | Time | Boolean`; an unknown spelling is an error, never a
/// silent default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpectedType {
    /// No specific expectation
    #[default]
    General,
    /// Plain text
    Text,
    /// Decimal number
    Number,
    /// Calendar date and time
    Timestamp,
    /// Time of day / elapsed time
    Time,
    /// Boolean
    Boolean,
}

impl ExpectedType {
    /// The canonical spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedType::General => "General",
            ExpectedType::Text => "Text",
            ExpectedType::Number => "Number",
            ExpectedType::Timestamp => "Timestamp",
            ExpectedType::Time => "Time",
            ExpectedType::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpectedType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "General" => Ok(ExpectedType::General),
            "Text" => Ok(ExpectedType::Text),
            "Number" => Ok(ExpectedType::Number),
            "Timestamp" => Ok(ExpectedType::Timestamp),
            "Time" => Ok(ExpectedType::Time),
            "Boolean" => Ok(ExpectedType::Boolean),
            _ => Err(Error::UnknownValueType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_boolean() {
        assert_eq!(CellValue::Boolean(true).to_text(), "true");
        assert_eq!(CellValue::Boolean(false).to_text(), "false");
    }

    #[test]
    fn test_render_number_full_precision() {
        let n: Numeric = "12345678901234567890.12345678".parse().unwrap();
        assert_eq!(CellValue::Number(n).to_text(), "12345678901234567890.12345678");
    }

    #[test]
    fn test_render_timestamp_iso8601() {
        let ts = NaiveDate::from_ymd_opt(2016, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(CellValue::Timestamp(ts).to_text(), "2016-01-02T00:00:00");

        let ts = NaiveDate::from_ymd_opt(2016, 1, 2)
            .unwrap()
            .and_hms_milli_opt(12, 30, 45, 500)
            .unwrap();
        assert_eq!(CellValue::Timestamp(ts).to_text(), "2016-01-02T12:30:45.500");
    }

    #[test]
    fn test_value_type_tags() {
        assert_eq!(CellValue::from("x").value_type(), ExpectedType::Text);
        assert_eq!(CellValue::from(Numeric::ONE).value_type(), ExpectedType::Number);
        assert_eq!(CellValue::from(true).value_type(), ExpectedType::Boolean);
    }

    #[test]
    fn test_expected_type_round_trip() {
        for t in [
            ExpectedType::General,
            ExpectedType::Text,
            ExpectedType::Number,
            ExpectedType::Timestamp,
            ExpectedType::Time,
            ExpectedType::Boolean,
        ] {
            assert_eq!(t.as_str().parse::<ExpectedType>().unwrap(), t);
        }
    }

    #[test]
    fn test_expected_type_rejects_unknown_spelling() {
        assert!(matches!(
            "general".parse::<ExpectedType>(),
            Err(Error::UnknownValueType(_))
        ));
        assert!("Datetime".parse::<ExpectedType>().is_err());
    }
}
