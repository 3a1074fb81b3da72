//! Arbitrary-precision numbers carried as canonical text.
//!
//! The wire format stores big decimals and big integers as their textual
//! form in the string table, so exactness is preserved by keeping the text.
//! These types validate the syntax once on construction and expose a
//! canonical string; they do not implement arithmetic.

use objpack_core::{ObjPackError, Result};
use std::fmt;
use std::str::FromStr;

/// An arbitrary-precision integer such as `-123456789012345678901234567890`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BigInteger(String);

impl BigInteger {
    /// Parse and canonicalize integer text.
    ///
    /// Accepts an optional sign followed by one or more ASCII digits. Leading
    /// zeros and a `+` sign are dropped, and `-0` becomes `0`.
    pub fn parse(text: &str) -> Result<Self> {
        let (negative, digits) = split_sign(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ObjPackError::invalid_number(text));
        }

        let trimmed = digits.trim_start_matches('0');
        let canonical = match (negative, trimmed.is_empty()) {
            (_, true) => "0".to_string(),
            (true, false) => format!("-{trimmed}"),
            (false, false) => trimmed.to_string(),
        };
        Ok(Self(canonical))
    }

    /// The canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value is below zero.
    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }

    /// Convert to `i128` if the value fits.
    pub fn to_i128(&self) -> Option<i128> {
        self.0.parse().ok()
    }
}

impl FromStr for BigInteger {
    type Err = ObjPackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for BigInteger {
    fn from(v: i64) -> Self {
        Self(v.to_string())
    }
}

impl From<i128> for BigInteger {
    fn from(v: i128) -> Self {
        Self(v.to_string())
    }
}

impl From<u64> for BigInteger {
    fn from(v: u64) -> Self {
        Self(v.to_string())
    }
}

/// An arbitrary-precision decimal such as `12.3400` or `-1.5E+10`.
///
/// Scale is significant: `1.50` and `1.5` are different values, exactly as
/// they are different texts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal(String);

impl BigDecimal {
    /// Parse and canonicalize decimal text.
    ///
    /// Grammar: `[+-] (digits [. digits?] | . digits) [(e|E) [+-] digits]`.
    /// A leading `+` is dropped and the exponent marker is written as `E`.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || ObjPackError::invalid_number(text);
        let (negative, rest) = split_sign(text);

        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
            None => (rest, None),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (mantissa, None),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !frac_part.is_none_or(all_digits) {
            return Err(invalid());
        }
        if int_part.is_empty() && frac_part.is_none_or(str::is_empty) {
            return Err(invalid());
        }

        let mut canonical = String::with_capacity(text.len());
        if negative {
            canonical.push('-');
        }
        canonical.push_str(mantissa);

        if let Some(exp) = exponent {
            let (exp_negative, exp_digits) = split_sign(exp);
            if exp_digits.is_empty() || !all_digits(exp_digits) {
                return Err(invalid());
            }
            canonical.push('E');
            canonical.push(if exp_negative { '-' } else { '+' });
            canonical.push_str(exp_digits);
        }

        Ok(Self(canonical))
    }

    /// The canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Nearest `f64`, for display and loose comparisons.
    pub fn to_f64(&self) -> f64 {
        // Canonical text is always valid float syntax.
        self.0.parse().unwrap_or(f64::NAN)
    }
}

impl FromStr for BigDecimal {
    type Err = ObjPackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for BigDecimal {
    fn from(v: i64) -> Self {
        Self(v.to_string())
    }
}

impl From<BigInteger> for BigDecimal {
    fn from(v: BigInteger) -> Self {
        Self(v.0)
    }
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}
