//! kudl-util - Core Utilities and Foundation Types
//!
//! Foundation types shared by every phase of the kudl pipeline:
//!
//! - [`Span`] - source location tracking (byte offsets plus 1-based
//!   line/column), attached to every token and error
//! - [`Decimal`] - arbitrary-precision decimal numbers, used to represent
//!   float lexemes without folding them to IEEE-754 doubles
//!
//! These types deliberately have no knowledge of KDL syntax; they exist so
//! that the lexer, parser, encoder, and selector crates can agree on
//! positions and numbers without depending on each other.

pub mod decimal;
pub mod span;

pub use decimal::{Decimal, ParseDecimalError};
pub use span::Span;
