//! Tokenizer error types.
//!
//! Tokenization is fail-fast: the first error aborts the whole decode and
//! carries the span of the offending input.

use kudl_util::Span;
use thiserror::Error;

/// Everything that can go wrong while turning text into tokens.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LexErrorKind {
    /// The tokenizer stopped before consuming a complete construct.
    #[error("input ended in the middle of a token")]
    IncompleteTokenize,

    /// A control or direction-control scalar outside a string.
    #[error("control character is not allowed here")]
    BadTokenize,

    #[error("unterminated string")]
    UnterminatedDquoteString,

    #[error("unterminated raw string")]
    UnterminatedRawString,

    #[error("invalid string escape")]
    InvalidDquoteStringEscape,

    /// A scalar that can never appear in a raw string body.
    #[error("invalid character in raw string")]
    InvalidRawStringBody,

    /// `\"\"\"` not followed by a newline, or a non-space scalar on the
    /// closing line.
    #[error("malformed multi-line string")]
    InvalidMultilineString,

    #[error("malformed multi-line raw string")]
    InvalidMultilineRawString,

    /// A line of a multi-line string does not start with the indent prefix
    /// defined by its final line.
    #[error("line cannot be dedented against the closing line's indent")]
    IncompleteDedentation,

    /// Escaped content on the final (indent-defining) line of a multi-line
    /// string.
    #[error("closing line of a multi-line string must be literal whitespace")]
    InvalidEndLine,

    /// A bare term that violates the identifier rules, such as a `#` in the
    /// middle of a word or a reserved spelling like `true`.
    #[error("invalid identifier")]
    InvalidIdentifier,

    /// A `\u{...}` escape that does not name a Unicode scalar value.
    #[error("escape does not name a unicode scalar")]
    InvalidUnicodeScalar,

    /// The input ended inside a comment or other non-string construct.
    #[error("input ended unexpectedly")]
    PrematureTermination,

    #[error("single-line string cannot contain a newline")]
    UnexpectedNewlineInSingleLineString,

    #[error("unexpected character")]
    UnexpectedCharacter,

    /// A disallowed scalar inside a string body.
    #[error("disallowed character")]
    DisallowedChar,
}

/// A tokenizer failure with the source span that produced it.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("{kind} at {span}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}
