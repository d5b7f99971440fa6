//! Encoder error types.

use thiserror::Error;

/// Everything that can go wrong while rendering a document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// A keyword value whose name cannot be written bare after `#`.
    #[error("keyword `{keyword}` cannot be emitted")]
    InvalidKeyword { keyword: String },

    /// Internal-invariant guard: a hand-built value whose payload does not
    /// match its declared type.
    #[error("value payload does not match its declared type")]
    MismatchedPayload,
}
