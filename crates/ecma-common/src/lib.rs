//! Shared types for the ecma-suite parser: source spans, line/column lookup,
//! the token-type catalogue, and the parse error type.

pub mod error;
pub mod span;
pub mod token;

pub use error::{ParseError, Severity};
pub use span::{LineIndex, Span};
pub use token::{Keyword, Token, TokenFlags, TokenKind};
