//! kudl-lex - KDL v2 Tokenizer
//!
//! The tokenizer is the first phase of the kudl pipeline. It transforms a
//! UTF-8 text blob into a stream of spanned tokens:
//!
//! ```text
//! Source text
//!      |
//!      v
//! [Tokenizer] --> Vec<TokenWithSpan> + unconsumed rest
//! ```
//!
//! Unlike most language lexers, whitespace, newlines, and comments are
//! emitted as tokens rather than skipped: KDL's grammar is line-oriented
//! (newlines terminate nodes, a space is required before attributes, `\`
//! folds lines), so the parser needs to see them.
//!
//! String tokens carry fully processed text: escapes are resolved and
//! multi-line strings are dedented during tokenization. Bare terms are
//! left verbatim; classifying them as numbers, keywords, or identifiers is
//! the parser's job.
//!
//! # Example
//!
//! ```
//! use kudl_lex::{tokenize, Token};
//!
//! let (tokens, rest) = tokenize("node 1").unwrap();
//! assert_eq!(rest, "");
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].token, Token::Term("node".into()));
//! assert_eq!(tokens[2].token, Token::Term("1".into()));
//! ```

pub mod cursor;
pub mod error;
mod lexer;
pub mod token;
pub mod unicode;

mod edge_cases;

pub use error::{LexError, LexErrorKind};
pub use lexer::Tokenizer;
pub use token::{CommentKind, Token, TokenWithSpan};
pub use unicode::{needs_quote, valid_identifier};

/// Tokenizes an entire document.
///
/// Returns the token list plus the unconsumed rest of the input, which is
/// empty whenever tokenization succeeds end-to-end. The first lexical error
/// aborts the stream.
pub fn tokenize(source: &str) -> Result<(Vec<TokenWithSpan>, &str), LexError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    Ok((tokens, tokenizer.rest()))
}
