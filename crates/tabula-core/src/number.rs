//! Arbitrary-precision numeric cell values
//!
//! [`Numeric`] wraps [`rust_decimal::Decimal`] so that cell arithmetic never
//! goes through binary floating point. Decimal carries 28-29 significant
//! digits, which is the precision ceiling for textual round-trips.

use crate::error::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, Sub, SubAssign};
use std::str::FromStr;

/// Arbitrary-precision decimal number
///
/// Comparisons ignore scale (`0.50 == 0.5`), and `Display` renders the full
/// stored precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Numeric(Decimal);

impl Numeric {
    /// Zero value
    pub const ZERO: Numeric = Numeric(Decimal::ZERO);

    /// One value
    pub const ONE: Numeric = Numeric(Decimal::ONE);

    /// Wrap a raw decimal
    pub fn new(value: Decimal) -> Self {
        Numeric(value)
    }

    /// The underlying decimal
    pub fn into_inner(self) -> Decimal {
        self.0
    }

    /// True if the value equals zero at any scale
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True if the value has no fractional part
    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// The value as an `i64`, if it is an integer in range
    pub fn to_i64(&self) -> Option<i64> {
        if self.0.is_integer() {
            self.0.to_i64()
        } else {
            None
        }
    }

    /// Division that returns `None` for a zero divisor or overflow
    pub fn checked_div(self, rhs: Numeric) -> Option<Numeric> {
        self.0.checked_div(rhs.0).map(Numeric)
    }

    /// Remainder that returns `None` for a zero divisor
    pub fn checked_rem(self, rhs: Numeric) -> Option<Numeric> {
        self.0.checked_rem(rhs.0).map(Numeric)
    }

    /// Integer exponentiation by repeated multiplication
    ///
    /// Negative exponents invert the result. Returns `None` on overflow or
    /// for `0` raised to a negative power.
    pub fn checked_powi(self, exp: i64) -> Option<Numeric> {
        if exp == 0 {
            return Some(Numeric::ONE);
        }
        let mut result = Decimal::ONE;
        let mut base = self.0;
        let mut n = exp.unsigned_abs();
        while n > 0 {
            if n & 1 == 1 {
                result = result.checked_mul(base)?;
            }
            n >>= 1;
            if n > 0 {
                base = base.checked_mul(base)?;
            }
        }
        if exp < 0 {
            result = Decimal::ONE.checked_div(result)?;
        }
        Some(Numeric(result))
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric(Decimal::from(value))
    }
}

impl From<Decimal> for Numeric {
    fn from(value: Decimal) -> Self {
        Numeric(value)
    }
}

impl FromStr for Numeric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map(Numeric)
            .map_err(|_| Error::InvalidNumber(s.to_string()))
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Numeric {
    type Output = Numeric;
    fn add(self, rhs: Numeric) -> Numeric {
        Numeric(self.0 + rhs.0)
    }
}

impl Sub for Numeric {
    type Output = Numeric;
    fn sub(self, rhs: Numeric) -> Numeric {
        Numeric(self.0 - rhs.0)
    }
}

impl Mul for Numeric {
    type Output = Numeric;
    fn mul(self, rhs: Numeric) -> Numeric {
        Numeric(self.0 * rhs.0)
    }
}

impl Div for Numeric {
    type Output = Numeric;
    fn div(self, rhs: Numeric) -> Numeric {
        Numeric(self.0 / rhs.0)
    }
}

impl Rem for Numeric {
    type Output = Numeric;
    fn rem(self, rhs: Numeric) -> Numeric {
        Numeric(self.0 % rhs.0)
    }
}

impl Neg for Numeric {
    type Output = Numeric;
    fn neg(self) -> Numeric {
        Numeric(-self.0)
    }
}

impl AddAssign for Numeric {
    fn add_assign(&mut self, rhs: Numeric) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Numeric {
    fn sub_assign(&mut self, rhs: Numeric) {
        self.0 -= rhs.0;
    }
}

impl MulAssign for Numeric {
    fn mul_assign(&mut self, rhs: Numeric) {
        self.0 *= rhs.0;
    }
}

impl DivAssign for Numeric {
    fn div_assign(&mut self, rhs: Numeric) {
        self.0 /= rhs.0;
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
    fn test_parse_plain_decimal() {
        assert_eq!(num("42"), Numeric::from(42));
        assert_eq!(num("-7"), Numeric::from(-7));
        assert_eq!(num("+1.5"), num("1.5"));
        assert_eq!(num("0.25") + num("0.75"), Numeric::ONE);
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(num("1e3"), Numeric::from(1000));
        assert_eq!(num("2.5e-1"), num("0.25"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<Numeric>().is_err());
        assert!("".parse::<Numeric>().is_err());
        assert!("1.2.3".parse::<Numeric>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["42", "-7", "0.125", "12345678901234567890.1234"] {
            let n = num(text);
            assert_eq!(n.to_string().parse::<Numeric>().unwrap(), n);
        }
    }

    #[test]
    fn test_scale_insensitive_equality() {
        assert_eq!(num("0.50"), num("0.5"));
        assert!(num("1.5") < num("2"));
        assert!(num("-3") < num("-2.5"));
    }

    #[test]
    fn test_arithmetic_associativity() {
        let (a, b, c) = (num("0.1"), num("0.2"), num("0.3"));
        assert_eq!((a + b) + c, a + (b + c));
        assert_eq!((a * b) * c, a * (b * c));
    }

    #[test]
    fn test_arithmetic_commutativity() {
        let (a, b) = (num("1.25"), num("-4.5"));
        assert_eq!(a + b, b + a);
        assert_eq!(a * b, b * a);
    }

    #[test]
    fn test_checked_div_by_zero() {
        assert_eq!(num("1").checked_div(Numeric::ZERO), None);
        assert_eq!(num("10").checked_div(num("4")), Some(num("2.5")));
    }

    #[test]
    fn test_checked_powi() {
        assert_eq!(num("2").checked_powi(10), Some(num("1024")));
        assert_eq!(num("2").checked_powi(0), Some(Numeric::ONE));
        assert_eq!(num("2").checked_powi(-2), Some(num("0.25")));
        assert_eq!(num("0.5").checked_powi(3), Some(num("0.125")));
        assert_eq!(Numeric::ZERO.checked_powi(-1), None);
    }

    #[test]
    fn test_to_i64() {
        assert_eq!(num("42").to_i64(), Some(42));
        assert_eq!(num("42.5").to_i64(), None);
    }
}
