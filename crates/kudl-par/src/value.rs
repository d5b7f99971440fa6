//! Typed value decoding.
//!
//! The tokenizer leaves terms opaque; this module classifies a term lexeme
//! as a keyword, number, or bare identifier and produces the typed
//! [`Value`]. String tokens always decode to string values.
//!
//! Number handling mirrors the grammar: `0b`/`0o`/`0x` prefixed integers
//! in their radix, plain decimal integers, and decimal floats with an
//! optional exponent. Underscore separators are stripped (but may not lead
//! the digit run), the sign is applied after parsing, and floats become
//! arbitrary-precision [`Decimal`]s.

use kudl_util::Decimal;
use num_bigint::BigInt;

use crate::ast::{IntegerFormat, Value};
use crate::error::ParseErrorKind;

/// Decodes a term lexeme into a typed value.
pub fn decode_term(lexeme: &str) -> Result<Value, ParseErrorKind> {
    if let Some(body) = lexeme.strip_prefix('#') {
        return Ok(match body {
            "true" => Value::boolean(true),
            "false" => Value::boolean(false),
            "null" => Value::null(),
            "inf" => Value::infinity(true),
            "-inf" => Value::infinity(false),
            "nan" => Value::nan(),
            _ => Value::keyword(body),
        });
    }

    if kudl_lex::unicode::is_number_like(lexeme) {
        return decode_number(lexeme);
    }

    Ok(Value::id(lexeme))
}

/// Decodes a number-like lexeme.
fn decode_number(lexeme: &str) -> Result<Value, ParseErrorKind> {
    let (negative, body) = match lexeme.as_bytes().first() {
        Some(b'-') => (true, &lexeme[1..]),
        Some(b'+') => (false, &lexeme[1..]),
        _ => (false, lexeme),
    };

    if let Some(digits) = body.strip_prefix("0b") {
        return decode_radix(
            digits,
            2,
            negative,
            IntegerFormat::Bin,
            ParseErrorKind::InvalidBinIntegerFormat,
        );
    }
    if let Some(digits) = body.strip_prefix("0o") {
        return decode_radix(
            digits,
            8,
            negative,
            IntegerFormat::Oct,
            ParseErrorKind::InvalidOctIntegerFormat,
        );
    }
    if let Some(digits) = body.strip_prefix("0x") {
        return decode_radix(
            digits,
            16,
            negative,
            IntegerFormat::Hex,
            ParseErrorKind::InvalidHexIntegerFormat,
        );
    }

    if body.contains(['.', 'e', 'E']) {
        return decode_float(lexeme);
    }

    if body.bytes().all(|b| b.is_ascii_digit() || b == b'_') {
        return decode_radix(
            body,
            10,
            negative,
            IntegerFormat::Dec,
            ParseErrorKind::InvalidDecIntegerFormat,
        );
    }

    // Starts like a number but fits no integer or float shape.
    Err(ParseErrorKind::InvalidIntegerFormat)
}

/// Parses an unsigned digit run in the given radix, applying the sign
/// afterwards so `+0` and `-0` both decode.
fn decode_radix(
    digits: &str,
    radix: u32,
    negative: bool,
    format: IntegerFormat,
    error: ParseErrorKind,
) -> Result<Value, ParseErrorKind> {
    if digits.is_empty() || digits.starts_with('_') {
        return Err(error);
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_digit(radix)) {
        return Err(error);
    }

    let mut value =
        BigInt::parse_bytes(cleaned.to_ascii_lowercase().as_bytes(), radix).ok_or(error)?;
    if negative {
        value = -value;
    }
    Ok(Value::integer(value, format))
}

/// Parses a decimal float lexeme into an arbitrary-precision decimal,
/// normalizing the exponent marker to uppercase.
fn decode_float(lexeme: &str) -> Result<Value, ParseErrorKind> {
    if lexeme.contains("_.") || lexeme.contains("._") || lexeme.starts_with('_') {
        return Err(ParseErrorKind::InvalidFloatFormat);
    }
    let cleaned: String = lexeme
        .chars()
        .filter(|c| *c != '_')
        .map(|c| if c == 'e' { 'E' } else { c })
        .collect();
    cleaned
        .parse::<Decimal>()
        .map(Value::float)
        .map_err(|_| ParseErrorKind::InvalidFloatFormat)
}
