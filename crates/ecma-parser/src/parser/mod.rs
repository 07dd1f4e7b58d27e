//! The parser driver (spec §4.2). Holds input, cursor, current/last token,
//! scope stack, private-name stack, labels, and the option set; the
//! statement/expression/class/module parsers (siblings in this module) are
//! implemented as further `impl<'src> Parser<'src>` blocks over the same
//! struct, the way acorn spreads `Parser.prototype` across several files.

pub(crate) mod class;
pub(crate) mod expressions;
pub(crate) mod lval;
pub(crate) mod module;
pub(crate) mod statements;

use rustc_hash::FxHashSet;

use ecma_common::{Keyword, LineIndex, ParseError, Severity, Span, Token, TokenKind};
use ecma_lexer::{Lexer, LexerOptions, LexedToken, Value};

use crate::ast::{Loc, NodeMeta, SourceLocation};
use crate::keywords;
use crate::options::Options;
use crate::private_names::PrivateNameStack;
use crate::scope::ScopeStack;

pub type PResult<T> = Result<T, ParseError>;

/// `{kind, name, statementStart}` (spec §3 "Label"), on the parser-wide
/// label stack consulted by `break`/`continue` validation.
#[derive(Debug, Clone)]
pub struct Label {
    pub kind: LabelKind,
    pub name: Option<String>,
    pub statement_start: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Loop,
    Switch,
    Other,
}

/// Destructuring-errors record (spec §3): five start offsets, written
/// speculatively by the expression parser while inside a cover grammar and
/// interpreted once the ambiguity resolves (spec §9 "Cover grammar without
/// backtracking").
#[derive(Debug, Clone, Copy, Default)]
pub struct DestructuringErrors {
    pub shorthand_assign: Option<u32>,
    pub trailing_comma: Option<u32>,
    pub parenthesized_assign: Option<u32>,
    pub parenthesized_bind: Option<u32>,
    pub double_proto: Option<u32>,
}

pub struct Parser<'src> {
    pub(crate) source: &'src str,
    pub(crate) opts: Options,
    lexer: Lexer<'src>,
    line_index: LineIndex,

    pub(crate) cur: LexedToken,
    prev_start: u32,
    prev_end: u32,

    pub(crate) scope: ScopeStack,
    pub(crate) private_names: PrivateNameStack,
    pub(crate) labels: Vec<Label>,
    pub(crate) strict: bool,

    /// `potentialArrowAt` (spec §4.4 "Arrow detection"): set to the start of
    /// a `(` or bare identifier that could be an arrow head.
    pub(crate) potential_arrow_at: Option<u32>,
    pub(crate) await_pos: Option<u32>,
    pub(crate) yield_pos: Option<u32>,

    pub(crate) exports: FxHashSet<String>,
    pub(crate) undefined_exports: Vec<(String, Span)>,

    pub(crate) hashbang: Option<String>,
    pub(crate) loop_depth: u32,
    pub(crate) switch_depth: u32,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, opts: Options) -> Self {
        let lexer_opts = LexerOptions {
            ecma_version: opts.ecma_version,
            source_type_module: opts.is_module(),
            allow_hash_bang: opts.allow_hash_bang,
        };
        let hashbang = if opts.allow_hash_bang && source.starts_with("#!") {
            let end = source.find(['\n', '\r', '\u{2028}', '\u{2029}']).unwrap_or(source.len());
            Some(source[2..end].to_string())
        } else {
            None
        };
        let mut lexer = Lexer::new(source, lexer_opts);
        let first = lexer.next();
        let strict = opts.is_module();
        let allow_top_level_await =
            (opts.is_module() && opts.ecma_version >= 13) || opts.allow_await_outside_function;
        Self {
            source,
            line_index: LineIndex::new(source),
            opts,
            lexer,
            cur: first,
            prev_start: 0,
            prev_end: 0,
            scope: ScopeStack::with_top_level_await(allow_top_level_await),
            private_names: PrivateNameStack::default(),
            labels: Vec::new(),
            strict,
            potential_arrow_at: None,
            await_pos: None,
            yield_pos: None,
            exports: FxHashSet::default(),
            undefined_exports: Vec::new(),
            hashbang,
            loop_depth: 0,
            switch_depth: 0,
        }
    }

    /// Builds a parser positioned at byte offset `pos`, for
    /// [`crate::parse_expression_at`]. Spans are reported against the full
    /// `source`, not a substring, matching `new`'s behaviour.
    pub(crate) fn new_at(source: &'src str, pos: u32, opts: Options) -> Self {
        let lexer_opts = LexerOptions {
            ecma_version: opts.ecma_version,
            source_type_module: opts.is_module(),
            allow_hash_bang: opts.allow_hash_bang,
        };
        let mut lexer = Lexer::new_at(source, pos, lexer_opts);
        let first = lexer.next();
        let strict = opts.is_module();
        let allow_top_level_await =
            (opts.is_module() && opts.ecma_version >= 13) || opts.allow_await_outside_function;
        Self {
            source,
            line_index: LineIndex::new(source),
            opts,
            lexer,
            cur: first,
            prev_start: pos,
            prev_end: pos,
            scope: ScopeStack::with_top_level_await(allow_top_level_await),
            private_names: PrivateNameStack::default(),
            labels: Vec::new(),
            strict,
            potential_arrow_at: None,
            await_pos: None,
            yield_pos: None,
            exports: FxHashSet::default(),
            undefined_exports: Vec::new(),
            hashbang: None,
            loop_depth: 0,
            switch_depth: 0,
        }
    }

    /// Parses a single expression at the parser's current position, per
    /// [`crate::parse_expression_at`]; does not require end-of-input and
    /// skips the whole-program checks `parse_program` runs afterward.
    pub(crate) fn parse_expression_at(&mut self) -> PResult<crate::ast::Expr> {
        self.parse_expression(false)
    }

    // ---- token stream ------------------------------------------------

    pub(crate) fn next(&mut self) {
        self.prev_start = self.cur.token.span.start;
        self.prev_end = self.cur.token.span.end;
        self.cur = self.lexer.next();
    }

    /// Snapshot point for the handful of one-token lookaheads the grammar
    /// needs (`async` before `function`, a property key before `:`/`,`/`)`):
    /// clones the lexer rather than re-lexing from a byte offset, since the
    /// context-sensitive tokenizer's decisions depend on more than position.
    pub(crate) fn save_lexer_state(&self) -> (Lexer<'src>, LexedToken, u32, u32) {
        (self.lexer.clone(), self.cur.clone(), self.prev_start, self.prev_end)
    }

    pub(crate) fn restore_lexer_state(&mut self, saved: (Lexer<'src>, LexedToken, u32, u32)) {
        let (lexer, cur, prev_start, prev_end) = saved;
        self.lexer = lexer;
        self.cur = cur;
        self.prev_start = prev_start;
        self.prev_end = prev_end;
    }

    pub(crate) fn kind(&self) -> &TokenKind {
        &self.cur.token.kind
    }

    pub(crate) fn start(&self) -> u32 {
        self.cur.token.span.start
    }

    pub(crate) fn prev_end(&self) -> u32 {
        self.prev_end
    }

    pub(crate) fn prev_start(&self) -> u32 {
        self.prev_start
    }

    pub(crate) fn cur_token(&self) -> &Token {
        &self.cur.token
    }

    pub(crate) fn cur_str(&self) -> &str {
        match &self.cur.value {
            Value::Str(s) => s.as_str(),
            _ => "",
        }
    }

    pub(crate) fn raw(&self, span: Span) -> &'src str {
        &self.source[span.start as usize..span.end as usize]
    }

    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        self.kind() == kind
    }

    pub(crate) fn at_keyword(&self, kw: Keyword) -> bool {
        matches!(self.kind(), TokenKind::Keyword(k) if *k == kw)
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.at_keyword(kw) {
            self.next();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> PResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(None))
        }
    }

    /// `isContextual` (spec §4.3 "`let` is a statement keyword only if
    /// followed by..."): matches a `Name` token against contextual keyword
    /// text, used throughout for `let`/`async`/`of`/`as`/`from`/`static`/etc.
    pub(crate) fn is_contextual(&self, name: &str) -> bool {
        matches!(self.kind(), TokenKind::Name) && self.cur_str() == name && !self.cur_token().contains_esc
    }

    pub(crate) fn eat_contextual(&mut self, name: &str) -> bool {
        if self.is_contextual(name) {
            self.next();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_contextual(&mut self, name: &str) -> PResult<()> {
        if self.eat_contextual(name) {
            Ok(())
        } else {
            Err(self.unexpected(None))
        }
    }

    /// Whether a line terminator occurred between the previous token's end
    /// and the current token's start (spec §4.1 ASI).
    pub(crate) fn had_line_break_before_current(&self) -> bool {
        self.cur_token().newline_before
    }

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(self.kind(), TokenKind::Eof | TokenKind::BraceR) || self.had_line_break_before_current()
    }

    /// `semicolon()` (spec §4.1 ASI).
    pub(crate) fn semicolon(&mut self) -> PResult<()> {
        if self.eat(&TokenKind::Semi) || self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.unexpected(None))
        }
    }

    /// "no line terminator here" checks used by `break`/`continue`/`return`/
    /// `throw`/postfix `++`/`--` (spec §4.1).
    pub(crate) fn no_line_terminator_before_current(&self) -> bool {
        !self.had_line_break_before_current()
    }

    // ---- node finishing ------------------------------------------------

    pub(crate) fn start_node(&self) -> u32 {
        self.start()
    }

    /// Builds a [`NodeMeta`] spanning `[start, end]`. By contract `end` is
    /// the *previous* token's end, never the current one (spec §3 invariant).
    pub(crate) fn finish_node_at(&self, start: u32, end: u32) -> NodeMeta {
        let mut meta = NodeMeta { start, end, loc: None, range: None };
        if self.opts.ranges {
            meta.range = Some([start, end]);
        }
        if self.opts.locations {
            let (start_line, start_col) = self.line_index.line_col(start);
            let (end_line, end_col) = self.line_index.line_col(end);
            meta.loc = Some(SourceLocation {
                source: self.opts.source_file.clone(),
                start: Loc { line: start_line, column: start_col - 1 },
                end: Loc { line: end_line, column: end_col - 1 },
            });
        }
        meta
    }

    pub(crate) fn finish_node(&self, start: u32) -> NodeMeta {
        self.finish_node_at(start, self.prev_end)
    }

    // ---- error reporting ------------------------------------------------

    pub(crate) fn raise_fatal(&self, pos: u32, message: impl Into<String>) -> ParseError {
        ParseError::fatal(message, Span::new(pos, pos))
    }

    /// Marked as a distinct call site from `raise_fatal` per spec §9 Open
    /// Questions (Decision OQ-1 in `DESIGN.md`): both currently abort parsing
    /// identically, but an embedder retargeting recoverable errors only has
    /// to change what this function does.
    pub(crate) fn raise_recoverable(&self, pos: u32, message: impl Into<String>) -> ParseError {
        ParseError { severity: Severity::Recoverable, ..ParseError::fatal(message, Span::new(pos, pos)) }
    }

    pub(crate) fn unexpected(&self, pos: Option<u32>) -> ParseError {
        self.raise_fatal(pos.unwrap_or(self.start()), "Unexpected token")
    }

    /// Accessor arity early error (spec §7 "getter should have no params"):
    /// a getter takes exactly zero parameters, a setter exactly one and it
    /// must not be a rest element.
    pub(crate) fn check_getter_setter_params(&self, is_getter: bool, params: &[crate::ast::Pat], pos: u32) -> PResult<()> {
        if is_getter && !params.is_empty() {
            return Err(self.raise_recoverable(pos, "getter should have no params"));
        }
        if !is_getter {
            if params.len() != 1 {
                return Err(self.raise_recoverable(pos, "setter should have exactly one param"));
            }
            if matches!(params[0], crate::ast::Pat::Rest(_)) {
                return Err(self.raise_recoverable(pos, "setter function argument must not be a rest parameter"));
            }
        }
        Ok(())
    }

    // ---- strict-mode / reserved-word checks ------------------------------

    pub(crate) fn is_reserved_word(&self, word: &str) -> bool {
        keywords::is_reserved_word(word, self.opts.ecma_version, self.opts.is_module())
    }

    /// `checkUnreserved` (spec §4.5, §4.7): reject a binding/reference name
    /// that is reserved in the active mode, including the contextual
    /// `yield`-in-generator / `await`-in-async-function / `arguments`-in-
    /// class-field-init / `arguments`+`await`-in-static-block rules.
    pub(crate) fn check_unreserved(&self, name: &str, span: Span) -> PResult<()> {
        if self.opts.ecma_version >= 6 && name == "yield" && self.scope.in_generator() {
            return Err(self.raise_recoverable(span.start, "Cannot use 'yield' as identifier inside a generator"));
        }
        if name == "await" && (self.scope.can_await() || self.scope.in_class_static_block()) {
            return Err(self.raise_recoverable(span.start, "Cannot use 'await' as identifier inside an async function"));
        }
        if name == "arguments" && (self.scope.in_class_field_init() || self.scope.in_class_static_block()) {
            return Err(self.raise_recoverable(span.start, "Cannot use 'arguments' in class field initializer or static block"));
        }
        if self.strict && keywords::is_strict_reserved_word(name) {
            return Err(self.raise_recoverable(span.start, format!("The keyword '{name}' is reserved")));
        }
        if self.is_reserved_word(name) {
            return Err(self.raise_recoverable(span.start, format!("The keyword '{name}' is reserved")));
        }
        if self.strict && keywords::is_strict_bind_name(name) {
            return Err(self.raise_recoverable(span.start, format!("The keyword '{name}' is reserved")));
        }
        Ok(())
    }
}
