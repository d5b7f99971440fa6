//! Token definitions for the KDL v2 tokenizer.
//!
//! Tokens are a closed sum type with payloads; every token the tokenizer
//! emits is paired with the [`Span`] it was read from.

use kudl_util::Span;

/// The flavor of a comment token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...` up to (not including) the next newline
    Line,
    /// `/* ... */` with no newline inside
    Span,
    /// `/* ... */` spanning at least one newline
    Multiline,
}

/// A lexical unit of a KDL document.
///
/// String-bearing variants carry fully processed text: escape sequences are
/// resolved and multi-line strings are dedented before the token is built.
/// A [`Token::Term`] carries its lexeme verbatim; deciding whether it is a
/// number, keyword, or identifier happens in the parser's value decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// `(` opening a type annotation
    OpenAnnotation,

    /// `)` closing a type annotation
    CloseAnnotation,

    /// `{` opening a children block
    OpenBlock,

    /// `}` closing a children block
    CloseBlock,

    /// `/-` discarding the next element
    SlashDash,

    /// `// ...` or `/* ... */`, text includes the delimiters
    Comment { kind: CommentKind, text: String },

    /// `"..."` or `"""..."""`, escapes resolved and dedent applied
    DquoteString(String),

    /// `#"..."#` (any `#` multiplicity), dedent applied, no escapes
    RawString(String),

    /// A run of horizontal whitespace; `len` counts code points
    Space { text: String, len: usize },

    /// A single newline (CRLF counts as one)
    Newline,

    /// `=` or one of its Unicode equivalents
    Equal,

    /// `;`
    Semicolon,

    /// `\` line continuation
    Fold,

    /// A bare term: number, keyword (`#true`), or identifier lexeme
    Term(String),
}

impl Token {
    /// Returns true for tokens that can decode to a [`Value`]: terms and
    /// both string forms.
    ///
    /// [`Value`]: https://docs.rs/kudl-par
    pub fn is_value_bearing(&self) -> bool {
        matches!(
            self,
            Token::Term(_) | Token::DquoteString(_) | Token::RawString(_)
        )
    }

    /// A short human-readable name for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::OpenAnnotation => "'('",
            Token::CloseAnnotation => "')'",
            Token::OpenBlock => "'{'",
            Token::CloseBlock => "'}'",
            Token::SlashDash => "'/-'",
            Token::Comment { .. } => "comment",
            Token::DquoteString(_) => "string",
            Token::RawString(_) => "raw string",
            Token::Space { .. } => "whitespace",
            Token::Newline => "newline",
            Token::Equal => "'='",
            Token::Semicolon => "';'",
            Token::Fold => "line continuation",
            Token::Term(_) => "term",
        }
    }
}

/// A token paired with the source span it was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenWithSpan {
    pub token: Token,
    pub span: Span,
}

impl TokenWithSpan {
    pub fn new(token: Token, span: Span) -> Self {
        Self { token, span }
    }
}
