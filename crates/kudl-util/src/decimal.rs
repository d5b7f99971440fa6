//! Arbitrary-precision decimal numbers.
//!
//! KDL accepts float lexemes with arbitrary-magnitude exponents
//! (`1.23e-1000` is a valid value), so folding to IEEE-754 doubles would
//! silently lose information. `Decimal` keeps exactly what was written: an
//! arbitrary-precision integer mantissa and a base-10 exponent.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_bigint::Sign;
use thiserror::Error;

/// Error produced when a lexeme does not match the decimal grammar.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid decimal literal")]
pub struct ParseDecimalError;

/// An arbitrary-precision decimal: `mantissa × 10^exponent`.
///
/// Two decimals are equal when their mantissa/exponent pairs are equal, so
/// `1.5` and `1.50` are distinct values. This is intentional: the type
/// represents the parsed lexeme, not a normalized quantity.
///
/// # Examples
///
/// ```
/// use kudl_util::Decimal;
///
/// let d: Decimal = "1.5".parse().unwrap();
/// assert_eq!(d.to_string(), "1.5");
///
/// let tiny: Decimal = "1.23E-1000".parse().unwrap();
/// assert_eq!(tiny.to_string(), "1.23E-1000");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: BigInt,
    exponent: i64,
}

impl Decimal {
    /// Create a decimal from a mantissa and base-10 exponent.
    pub fn new(mantissa: BigInt, exponent: i64) -> Self {
        Self { mantissa, exponent }
    }

    /// The integer mantissa.
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// The base-10 exponent applied to the mantissa.
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Returns true if the mantissa is zero.
    pub fn is_zero(&self) -> bool {
        self.mantissa.sign() == Sign::NoSign
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parse `[+-]?digits[.digits][(e|E)[+-]digits]`.
    ///
    /// Underscore separators must already have been stripped by the caller;
    /// this is the bare decimal grammar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let mut pos = 0;

        let negative = match bytes.first() {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };

        let int_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == int_start {
            return Err(ParseDecimalError);
        }

        let mut digits = s[int_start..pos].to_string();
        let mut scale: i64 = 0;

        if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            let frac_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == frac_start {
                return Err(ParseDecimalError);
            }
            digits.push_str(&s[frac_start..pos]);
            scale = (pos - frac_start) as i64;
        }

        let mut exponent: i64 = 0;
        if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
            pos += 1;
            let exp_start = pos;
            if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
                pos += 1;
            }
            let exp_digits = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == exp_digits {
                return Err(ParseDecimalError);
            }
            exponent = s[exp_start..pos].parse().map_err(|_| ParseDecimalError)?;
        }

        if pos != bytes.len() {
            return Err(ParseDecimalError);
        }

        let mut mantissa = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(ParseDecimalError)?;
        if negative {
            mantissa = -mantissa;
        }

        Ok(Self {
            mantissa,
            exponent: exponent - scale,
        })
    }
}

impl fmt::Display for Decimal {
    /// Format using the standard decimal to-scientific-string rule: plain
    /// notation when `exponent <= 0` and the adjusted exponent is at least
    /// -6, scientific notation with an uppercase `E` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa.sign() == Sign::Minus {
            write!(f, "-")?;
        }
        let digits = self.mantissa.magnitude().to_string();
        let adjusted = self.exponent + digits.len() as i64 - 1;

        if self.exponent <= 0 && adjusted >= -6 {
            // Plain notation.
            if self.exponent == 0 {
                return write!(f, "{digits}");
            }
            let scale = (-self.exponent) as usize;
            if digits.len() > scale {
                let split = digits.len() - scale;
                write!(f, "{}.{}", &digits[..split], &digits[split..])
            } else {
                write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
            }
        } else {
            // Scientific notation.
            let (head, tail) = digits.split_at(1);
            write!(f, "{head}")?;
            if !tail.is_empty() {
                write!(f, ".{tail}")?;
            }
            if adjusted >= 0 {
                write!(f, "E+{adjusted}")
            } else {
                write!(f, "E{adjusted}")
            }
        }
    }
}
