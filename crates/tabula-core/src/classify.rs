//! Raw-text value classification
//!
//! [`classify`] decides which [`CellValue`] tag a piece of raw cell text
//! represents. The priority order is fixed: timestamp, duration, number,
//! boolean, then text. Each step signals "not this kind" internally and falls
//! through; the entry point itself never fails, because text is always a
//! valid last resort.

use crate::error::{Error, Result};
use crate::number::Numeric;
use crate::value::CellValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::str::FromStr;

/// Classify raw cell text into a typed value
///
/// # Example
/// ```rust
/// use tabula_core::{classify, CellValue};
///
/// assert!(matches!(classify("42.5"), CellValue::Number(_)));
/// assert!(matches!(classify("TRUE"), CellValue::Boolean(true)));
/// assert_eq!(classify("yes"), CellValue::Text("yes".into()));
/// ```
pub fn classify(text: &str) -> CellValue {
    let trimmed = text.trim();
    if let Ok(ts) = try_timestamp(trimmed) {
        return CellValue::Timestamp(ts);
    }
    if let Ok(seconds) = try_duration(trimmed) {
        // Durations share the Number tag; the unit is elapsed seconds
        return CellValue::Number(seconds);
    }
    if let Ok(n) = Numeric::from_str(trimmed) {
        return CellValue::Number(n);
    }
    match try_boolean(trimmed) {
        Ok(b) => CellValue::Boolean(b),
        Err(_) => CellValue::Text(trimmed.to_string()),
    }
}

/// Parse an ISO-8601 timestamp, extended (`2016-01-02T00:00:00`) or basic
/// (`20160102T000000`) form, or an extended date-only form at midnight.
pub(crate) fn try_timestamp(text: &str) -> Result<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts);
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    // Basic form needs the T separator so bare digit runs stay numeric
    parse_basic(text).ok_or_else(|| Error::InvalidTimestamp(text.to_string()))
}

fn parse_basic(text: &str) -> Option<NaiveDateTime> {
    let date = text.get(0..8)?;
    let rest = text.get(8..)?.strip_prefix('T')?;
    let (time, frac) = match rest.find('.') {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };
    if time.len() != 6
        || !date.bytes().all(|b| b.is_ascii_digit())
        || !time.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let year: i32 = date[0..4].parse().ok()?;
    let month: u32 = date[4..6].parse().ok()?;
    let day: u32 = date[6..8].parse().ok()?;
    let hour: u32 = time[0..2].parse().ok()?;
    let minute: u32 = time[2..4].parse().ok()?;
    let second: u32 = time[4..6].parse().ok()?;
    let nanos = match frac {
        Some(f) => parse_subseconds(f)?,
        None => 0,
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
    Some(date.and_time(time))
}

fn parse_subseconds(frac: &str) -> Option<u32> {
    if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let scale = 10u32.pow(9 - frac.len() as u32);
    frac.parse::<u32>().ok().map(|n| n * scale)
}

/// Parse an elapsed-time literal (`[-]H:MM[:SS[.frac]]`) into seconds
pub(crate) fn try_duration(text: &str) -> Result<Numeric> {
    let err = || Error::InvalidDuration(text.to_string());
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut parts = body.split(':');
    let hours = parts.next().filter(|p| is_digits(p)).ok_or_else(err)?;
    let minutes = parts
        .next()
        .filter(|p| is_digits(p) && p.len() <= 2)
        .ok_or_else(err)?;
    let seconds = match parts.next() {
        Some(p) if is_seconds(p) => Some(p),
        Some(_) => return Err(err()),
        None => None,
    };
    if parts.next().is_some() {
        return Err(err());
    }
    if minutes.parse::<u32>().map_err(|_| err())? >= 60 {
        return Err(err());
    }

    let hours = Numeric::from_str(hours).map_err(|_| err())?;
    let minutes = Numeric::from_str(minutes).map_err(|_| err())?;
    let seconds = match seconds {
        Some(s) => Numeric::from_str(s).map_err(|_| err())?,
        None => Numeric::ZERO,
    };
    let total = hours * Numeric::from(3600) + minutes * Numeric::from(60) + seconds;
    Ok(if negative { -total } else { total })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_seconds(s: &str) -> bool {
    let (whole, frac) = match s.find('.') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    if !is_digits(whole) || whole.len() > 2 || whole.parse::<u32>().map_or(true, |n| n >= 60) {
        return false;
    }
    frac.map_or(true, is_digits)
}

/// Match the boolean literal vocabulary: exactly `true` or `false`,
/// ASCII-case-insensitively. Anything else is a classification failure that
/// the caller recovers from by falling through to text.
pub(crate) fn try_boolean(text: &str) -> Result<bool> {
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::NotBoolean(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(s: &str) -> Numeric {
        s.parse().unwrap()
    }

    #[test]
    fn test_classify_number() {
        assert_eq!(classify("42.5"), CellValue::Number(num("42.5")));
        assert_eq!(classify("  -7 "), CellValue::Number(num("-7")));
        assert_eq!(classify("1e3"), CellValue::Number(num("1000")));
    }

    #[test]
    fn test_classify_boolean() {
        assert_eq!(classify("true"), CellValue::Boolean(true));
        assert_eq!(classify("TRUE"), CellValue::Boolean(true));
        assert_eq!(classify("FaLsE"), CellValue::Boolean(false));
    }

    #[test]
    fn test_classify_non_boolean_word_is_text() {
        assert_eq!(classify("yes"), CellValue::Text("yes".into()));
        assert_eq!(classify("truthy"), CellValue::Text("truthy".into()));
    }

    #[test]
    fn test_classify_timestamp_extended() {
        let value = classify("2016-01-02T00:00:00");
        let CellValue::Timestamp(ts) = value else {
            panic!("expected Timestamp, got {value:?}");
        };
        assert_eq!(ts.to_string(), "2016-01-02 00:00:00");
    }

    #[test]
    fn test_classify_timestamp_basic() {
        assert_eq!(
            classify("20160102T123045"),
            classify("2016-01-02T12:30:45")
        );
    }

    #[test]
    fn test_classify_date_only_is_midnight() {
        assert_eq!(classify("2016-01-02"), classify("2016-01-02T00:00:00"));
    }

    #[test]
    fn test_bare_digit_run_is_a_number_not_a_timestamp() {
        assert_eq!(classify("20160102"), CellValue::Number(num("20160102")));
    }

    #[test]
    fn test_classify_duration_as_seconds() {
        assert_eq!(classify("1:30:00"), CellValue::Number(num("5400")));
        assert_eq!(classify("0:00:01.5"), CellValue::Number(num("1.5")));
        assert_eq!(classify("2:15"), CellValue::Number(num("8100")));
        assert_eq!(classify("-0:30"), CellValue::Number(num("-1800")));
    }

    #[test]
    fn test_malformed_duration_is_text() {
        assert_eq!(classify("1:99"), CellValue::Text("1:99".into()));
        assert_eq!(classify("1:2:3:4"), CellValue::Text("1:2:3:4".into()));
    }

    #[test]
    fn test_classify_round_trip() {
        for text in ["42.5", "true", "hello", "2016-01-02T00:00:00"] {
            let value = classify(text);
            assert_eq!(classify(&value.to_text()), value);
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        assert_eq!(classify("42.5"), classify("42.5"));
    }

    #[test]
    fn test_non_ascii_is_not_case_folded() {
        // Byte-for-byte comparison outside the ASCII range
        assert_eq!(classify("trüe"), CellValue::Text("trüe".into()));
    }
}
