//! Unicode character classes for the KDL v2 grammar.
//!
//! This module provides the code-point predicates the tokenizer dispatches
//! on, plus the identifier rules shared with the parser and encoder. The
//! classes follow the KDL v2 specification: note that vertical tab (0x0B)
//! is a space while form feed (0x0C) is a newline.

/// Checks if a character is one of the BiDi direction-control scalars.
///
/// These are disallowed anywhere in a document outside of `\u{...}`
/// escapes, because they can visually reorder the source text.
pub fn is_direction_control(c: char) -> bool {
    matches!(
        c,
        '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}

/// Checks if a character is disallowed as literal document content.
///
/// The disallowed class is "non-scalar or direction-control"; surrogates
/// cannot occur in a Rust `char`, so only the direction controls remain
/// observable here.
pub fn is_disallowed(c: char) -> bool {
    is_direction_control(c)
}

/// Checks if a character is the byte-order mark.
///
/// A single leading BOM is consumed before tokenization; anywhere else it
/// is an error.
pub fn is_bom(c: char) -> bool {
    c == '\u{FEFF}'
}

/// Checks if a character is horizontal whitespace.
///
/// Covers tab, vertical tab, ASCII space, and the Unicode space separators.
///
/// # Example
///
/// ```
/// use kudl_lex::unicode::is_space;
///
/// assert!(is_space(' '));
/// assert!(is_space('\t'));
/// assert!(is_space('\u{3000}'));
/// assert!(!is_space('\n'));
/// ```
pub fn is_space(c: char) -> bool {
    matches!(
        c,
        '\u{09}'
            | '\u{0B}'
            | '\u{20}'
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Checks if a character terminates a line.
///
/// CR followed by LF counts as a single newline; that pairing is handled by
/// the cursor, not here.
///
/// # Example
///
/// ```
/// use kudl_lex::unicode::is_newline;
///
/// assert!(is_newline('\n'));
/// assert!(is_newline('\u{2028}'));
/// assert!(!is_newline('\t'));
/// ```
pub fn is_newline(c: char) -> bool {
    matches!(
        c,
        '\u{0A}' | '\u{0C}' | '\u{0D}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Checks if a character acts as the property `=` sign.
pub fn is_equals(c: char) -> bool {
    matches!(c, '=' | '\u{FE66}' | '\u{FF1D}' | '\u{1F7F0}')
}

/// Checks if a character is a numeric sign.
pub fn is_sign(c: char) -> bool {
    matches!(c, '+' | '-')
}

/// Checks if a character can never appear in a bare identifier.
///
/// # Example
///
/// ```
/// use kudl_lex::unicode::is_identifier_forbidden;
///
/// assert!(is_identifier_forbidden('{'));
/// assert!(is_identifier_forbidden('='));
/// assert!(is_identifier_forbidden(' '));
/// assert!(!is_identifier_forbidden('a'));
/// assert!(!is_identifier_forbidden('-'));
/// ```
pub fn is_identifier_forbidden(c: char) -> bool {
    (c as u32) < 0x20
        || is_disallowed(c)
        || is_space(c)
        || is_newline(c)
        || is_equals(c)
        || is_bom(c)
        || matches!(
            c,
            '(' | ')' | '{' | '}' | '[' | ']' | '/' | '\\' | '"' | '#' | ';'
        )
}

/// Checks if a lexeme would be read as the start of a number.
///
/// True for an optional sign, an optional leading `.`, then an ASCII digit.
/// Such lexemes must parse as numbers and can never be bare identifiers.
pub fn is_number_like(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let s = s.strip_prefix('.').unwrap_or(s);
    s.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

/// The bare words reserved for keyword values.
///
/// These spellings are only valid behind a `#` (`#true`, `#-inf`, ...); as
/// bare identifiers they are rejected so a missing `#` cannot silently
/// produce a string.
const RESERVED_IDENTIFIERS: [&str; 6] = ["true", "false", "null", "inf", "-inf", "nan"];

/// Checks if a string is a valid bare identifier.
///
/// Valid identifiers are non-empty, contain no forbidden scalar, do not
/// look like numbers, and are not reserved keyword spellings.
///
/// # Example
///
/// ```
/// use kudl_lex::unicode::valid_identifier;
///
/// assert!(valid_identifier("node"));
/// assert!(valid_identifier("my-node"));
/// assert!(valid_identifier("ノード"));
/// assert!(!valid_identifier("true"));
/// assert!(!valid_identifier("10abc"));
/// assert!(!valid_identifier("has space"));
/// assert!(!valid_identifier(""));
/// ```
pub fn valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && !is_number_like(s)
        && !RESERVED_IDENTIFIERS.contains(&s)
        && s.chars().all(|c| !is_identifier_forbidden(c))
}

/// Checks if a string must be emitted as a quoted string.
///
/// This is the encoder-side complement of [`valid_identifier`]: everything
/// a bare identifier can express round-trips bare, everything else gets
/// quotes.
pub fn needs_quote(s: &str) -> bool {
    !valid_identifier(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_class() {
        for c in ['\t', '\u{0B}', ' ', '\u{A0}', '\u{1680}', '\u{2005}', '\u{202F}'] {
            assert!(is_space(c), "{c:?}");
        }
        assert!(!is_space('\n'));
        assert!(!is_space('\u{0C}'));
    }

    #[test]
    fn test_newline_class() {
        for c in ['\n', '\u{0C}', '\r', '\u{85}', '\u{2028}', '\u{2029}'] {
            assert!(is_newline(c), "{c:?}");
        }
        assert!(!is_newline('\u{0B}'));
    }

    #[test]
    fn test_equals_class() {
        assert!(is_equals('='));
        assert!(is_equals('\u{FE66}'));
        assert!(is_equals('\u{FF1D}'));
        assert!(is_equals('\u{1F7F0}'));
        assert!(!is_equals(':'));
    }

    #[test]
    fn test_direction_controls_are_disallowed() {
        for c in ['\u{200E}', '\u{200F}', '\u{202A}', '\u{202E}', '\u{2066}', '\u{2069}'] {
            assert!(is_disallowed(c), "{c:?}");
            assert!(is_identifier_forbidden(c), "{c:?}");
        }
    }

    #[test]
    fn test_identifier_forbidden_punctuation() {
        for c in ['(', ')', '{', '}', '[', ']', '/', '\\', '"', '#', ';', '=', '\u{FEFF}'] {
            assert!(is_identifier_forbidden(c), "{c:?}");
        }
        for c in ['a', '0', '-', '+', '.', '_', '?', '!', '$', '☃'] {
            assert!(!is_identifier_forbidden(c), "{c:?}");
        }
    }

    #[test]
    fn test_number_like() {
        assert!(is_number_like("10"));
        assert!(is_number_like("-3"));
        assert!(is_number_like("+.5"));
        assert!(is_number_like(".5"));
        assert!(!is_number_like("-inf"));
        assert!(!is_number_like("a1"));
        assert!(!is_number_like(""));
    }

    #[test]
    fn test_reserved_words_are_not_identifiers() {
        for s in ["true", "false", "null", "inf", "-inf", "nan"] {
            assert!(!valid_identifier(s), "{s}");
            assert!(needs_quote(s), "{s}");
        }
        // Near-misses are ordinary identifiers.
        assert!(valid_identifier("truex"));
        assert!(valid_identifier("nullable"));
        assert!(valid_identifier("infinite"));
    }

    #[test]
    fn test_valid_identifier_implies_no_quote() {
        for s in ["node", "my-node", "node_1", "?", "ノード", "--flag"] {
            assert!(valid_identifier(s), "{s}");
            assert!(!needs_quote(s), "{s}");
        }
    }
}
