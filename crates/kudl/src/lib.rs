//! kudl - KDL v2 decoder, encoder, and query engine
//!
//! This crate is the public surface of the kudl workspace. It wires the
//! pipeline phases together and re-exports the document model:
//!
//! ```text
//! decode:  &str --[kudl-lex]--> tokens --[kudl-par]--> Document
//! encode:  Document --[kudl-enc]--> String
//! select:  Document + path --[kudl-sel]--> Vec<Node>
//! ```
//!
//! # Examples
//!
//! ```
//! use kudl::{decode_strict, encode, select, EncodeOptions, Selector};
//!
//! let document = decode_strict("server port=80 {\n    route \"/\"\n}").unwrap();
//!
//! let routes = select(&document, &[Selector::name("route")]);
//! assert_eq!(routes.len(), 1);
//!
//! let canonical = encode(&document, EncodeOptions::default()).unwrap();
//! assert_eq!(canonical, "server port=80 {\n    route \"/\"\n}\n");
//! ```

use thiserror::Error;

pub use kudl_enc::{EncodeError, EncodeOptions};
pub use kudl_lex::{CommentKind, LexError, LexErrorKind, Token, TokenWithSpan};
pub use kudl_par::{
    Attribute, Document, IntegerFormat, Node, ParseError, ParseErrorKind, Payload, Value,
    ValueType,
};
pub use kudl_sel::{select, AttrSelector, Selector};
pub use kudl_util::{Decimal, Span};

/// A failure while decoding a document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Strict decoding found tokens after the document.
    #[error("decoding left {remaining} unconsumed tokens")]
    IncompleteDecode { remaining: usize },
}

/// Decodes a KDL v2 text blob.
///
/// Returns the document together with the unconsumed remainder of the
/// token stream, which is empty whenever the whole input was parsed.
pub fn decode(source: &str) -> Result<(Document, Vec<TokenWithSpan>), DecodeError> {
    let (tokens, _rest) = kudl_lex::tokenize(source)?;
    let (document, rest) = kudl_par::Parser::new(tokens).parse()?;
    Ok((document, rest))
}

/// Decodes a KDL v2 text blob, requiring the input to be consumed
/// entirely.
pub fn decode_strict(source: &str) -> Result<Document, DecodeError> {
    let (document, rest) = decode(source)?;
    if !rest.is_empty() {
        return Err(DecodeError::IncompleteDecode {
            remaining: rest.len(),
        });
    }
    Ok(document)
}

/// Encodes a document as canonical KDL v2 text.
pub fn encode(document: &Document, options: EncodeOptions) -> Result<String, EncodeError> {
    kudl_enc::encode(document, options)
}

/// Encodes a document as canonical KDL v2 text.
///
/// Identical to [`encode`]; both take options and fail the same way. The
/// pair exists for surface symmetry with [`decode`] / [`decode_strict`].
pub fn encode_strict(document: &Document, options: EncodeOptions) -> Result<String, EncodeError> {
    encode(document, options)
}
