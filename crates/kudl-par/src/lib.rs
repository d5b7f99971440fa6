//! kudl-par - KDL v2 Parser
//!
//! The parser is the second phase of the kudl pipeline. It consumes the
//! token stream produced by `kudl-lex` and builds the immutable document
//! model shared by the encoder and selector:
//!
//! ```text
//! Vec<TokenWithSpan>
//!        |
//!        v
//!    [Parser] --> Document (Vec<Node>)
//! ```
//!
//! The grammar is line-oriented: a node is a name, optionally preceded by
//! a `(type)` annotation, followed by space-separated attributes and an
//! optional `{ children }` block, terminated by a newline, `;`, `}`, or
//! end of input. `/-` discards the following node, attribute, or children
//! block; `\` folds a line onto the next one.
//!
//! This crate also owns value decoding: term lexemes become typed values
//! here (integers in four radixes, arbitrary-precision decimal floats,
//! keywords, identifiers), since the tokenizer deliberately leaves terms
//! opaque.
//!
//! # Example
//!
//! ```
//! use kudl_par::parse;
//!
//! let (document, rest) = parse("server port=80 { route \"/\" }").unwrap();
//! assert!(rest.is_empty());
//! assert_eq!(document[0].name, "server");
//! assert_eq!(document[0].children.as_ref().unwrap()[0].name, "route");
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod value;

mod edge_cases;

pub use ast::{Attribute, Document, IntegerFormat, Node, Payload, Value, ValueType};
pub use error::{ParseError, ParseErrorKind};
pub use parser::Parser;
pub use value::decode_term;

use kudl_lex::token::TokenWithSpan;

/// Tokenizes and parses a complete document.
///
/// Convenience entry point composing `kudl-lex` and [`Parser`]. The second
/// element of the pair is the unconsumed remainder of the token stream,
/// empty on a full parse.
pub fn parse(source: &str) -> Result<(Document, Vec<TokenWithSpan>), ParseFailure> {
    let (tokens, _) = kudl_lex::tokenize(source)?;
    let parsed = Parser::new(tokens).parse()?;
    Ok(parsed)
}

/// A failure from either phase of [`parse`].
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error(transparent)]
    Lex(#[from] kudl_lex::LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
