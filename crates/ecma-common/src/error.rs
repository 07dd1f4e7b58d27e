//! Error type shared by the tokenizer and parser.

use std::fmt;

use crate::span::{LineIndex, Span};

/// Whether a [`ParseError`] came from a hard grammar violation or from one of
/// the language's "early errors" (redeclaration, reserved word, duplicate
/// export, ...).
///
/// Both are reported through the same sink today and both abort the parse on
/// first occurrence; the distinction exists so an embedder can later give
/// `Recoverable` a different policy (collect-and-continue) without touching
/// every call site. See `SPEC_FULL.md` for why this is not collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Recoverable,
}

/// A parse or tokenize error with location information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub severity: Severity,
}

impl ParseError {
    pub fn fatal(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            severity: Severity::Fatal,
        }
    }

    pub fn recoverable(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            severity: Severity::Recoverable,
        }
    }

    /// Render as `"<message> (L:C)"`, using `index` to resolve `span.start`.
    pub fn render(&self, index: &LineIndex) -> String {
        let (line, col) = index.line_col(self.span.start);
        format!("{} ({}:{})", self.message, line, col)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_line_and_column() {
        let src = "let x = ;\nlet y = 1;";
        let index = LineIndex::new(src);
        let err = ParseError::fatal("Unexpected token", Span::new(8, 9));
        assert_eq!(err.render(&index), "Unexpected token (1:9)");
    }

    #[test]
    fn renders_on_second_line() {
        let src = "a\nb = ;";
        let index = LineIndex::new(src);
        let err = ParseError::recoverable("The keyword 'eval' is reserved", Span::new(6, 7));
        assert_eq!(
            err.render(&index),
            "The keyword 'eval' is reserved (2:6)"
        );
    }

    #[test]
    fn display_is_just_the_message() {
        let err = ParseError::fatal("boom", Span::new(0, 1));
        assert_eq!(err.to_string(), "boom");
    }
}
