//! ecma-parser: recursive descent parser producing an ESTree-compatible AST.
//!
//! This crate turns the token stream from `ecma-lexer` into an owned AST
//! (`ast::Program` and friends). Three entry points mirror the acorn-style
//! top-level driver: [`parse`] for whole programs, [`parse_expression_at`]
//! for a single expression starting at an arbitrary offset, and
//! [`tokenizer`] for callers that only want the token stream.

pub mod ast;
mod keywords;
mod options;
mod parser;
mod private_names;
mod scope;

pub use ecma_common::{ParseError, Severity};
pub use ecma_lexer::{LexedToken, Value};
pub use options::{AllowReserved, EcmaVersion, Options, RawOptions, SourceType};

use ecma_common::{LineIndex, Token};
use ecma_lexer::{Lexer, LexerOptions};

use ast::{Expr, Program};
use parser::Parser;

/// Parse a whole program into an ESTree [`Program`] node.
///
/// This is the main entry point for the parser: it lexes `source`, drives
/// the statement parser to end-of-input, and runs the deferred checks
/// (undefined bare re-exports) that can only be settled once the whole
/// program has been seen.
pub fn parse(source: &str, options: Options) -> Result<Program, ParseError> {
    let mut parser = Parser::new(source, options);
    parser.parse_program()
}

/// Parse a single expression starting at byte offset `pos`, the way a REPL
/// or a linter's "evaluate this snippet" feature needs. Does not require
/// `pos` to be the start of a statement and does not run end-of-program
/// checks (undefined exports, unresolved private names outside a class).
pub fn parse_expression_at(source: &str, pos: u32, options: Options) -> Result<Expr, ParseError> {
    let mut parser = Parser::new_at(source, pos, options);
    parser.parse_expression_at()
}

/// Tokenize `source` without building an AST, returning every token the
/// context-sensitive lexer produces, including the final `Eof` token.
///
/// The caller only gets `ecma_lexer`'s raw decoded tokens here (no parser
/// scope tracking runs), so contextual keyword classification performed by
/// the parser (`let`, `async`, `of`, ...) is not reflected in `TokenKind`.
pub fn tokenizer(source: &str, options: Options) -> Vec<LexedToken> {
    let lexer_opts = LexerOptions {
        ecma_version: options.ecma_version,
        source_type_module: options.is_module(),
        allow_hash_bang: options.allow_hash_bang,
    };
    let mut lexer = Lexer::new(source, lexer_opts);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next();
        let is_eof = matches!(tok.token.kind, ecma_common::TokenKind::Eof);
        tokens.push(tok);
        if is_eof {
            break;
        }
    }
    tokens
}

/// Render a [`Token`]'s span as `"<line>:<column>"` against `source`, for
/// callers (the CLI's diagnostic printer) that only have a `Span` and need
/// the same line/column convention [`ParseError::render`] uses.
pub fn line_col(source: &str, token: &Token) -> (u32, u32) {
    LineIndex::new(source).line_col(token.span.start)
}
