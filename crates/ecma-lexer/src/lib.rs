//! The context-sensitive tokenizer.
//!
//! Productions are driven one token at a time by [`Lexer::next`]. The hard
//! part is that `/`, `}` and the template back-tick are ambiguous without
//! knowing the surrounding grammatical position: a stack of `TokContext`
//! frames plus an `expr_allowed` bit (`updateContext`) resolves them without
//! any lookahead beyond the current token and, for `{`, the previous token's
//! kind.

mod cursor;
mod number;
mod string;

use ecma_common::{Keyword, ParseError, Token, TokenKind};
use num_bigint::BigInt;

use cursor::Cursor;

/// The decoded payload of a token the bare [`TokenKind`] cannot carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Str(String),
    Num(f64),
    BigInt(BigInt),
    Regex { pattern: String, flags: String },
}

/// A token plus its decoded value and any lexer-detected diagnostic flags
/// that only the parser can decide what to do with (legality depends on
/// strict-mode, which the tokenizer does not track).
#[derive(Debug, Clone, PartialEq)]
pub struct LexedToken {
    pub token: Token,
    pub value: Value,
    /// Numeric literal used legacy octal syntax (`0777`); illegal in strict
    /// mode, the parser decides.
    pub legacy_octal: bool,
    /// String/template escape sequence could not be decoded. For a normal
    /// string this is always a hard error; for a template chunk inside a
    /// tagged template it downgrades `cooked` to null instead.
    pub invalid_escape: bool,
    /// A numeric separator (`_`) was placed somewhere other than between two
    /// digits of the same group (leading, trailing, doubled, or inside a
    /// legacy octal literal): always a hard error, the tokenizer just
    /// defers raising it until the parser consumes the literal.
    pub bad_numeric_separator: bool,
}

impl LexedToken {
    fn plain(token: Token) -> Self {
        Self { token, value: Value::None, legacy_octal: false, invalid_escape: false, bad_numeric_separator: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CtxKind {
    BStat,
    BExpr,
    BTmpl,
    PStat,
    PExpr,
    QTmpl,
    FStat,
    FExpr,
}

#[derive(Debug, Clone, Copy)]
struct TokContext {
    kind: CtxKind,
    is_expr: bool,
    preserve_space: bool,
}

const B_STAT: TokContext = TokContext { kind: CtxKind::BStat, is_expr: false, preserve_space: false };
const B_EXPR: TokContext = TokContext { kind: CtxKind::BExpr, is_expr: true, preserve_space: false };
const B_TMPL: TokContext = TokContext { kind: CtxKind::BTmpl, is_expr: true, preserve_space: false };
const P_STAT: TokContext = TokContext { kind: CtxKind::PStat, is_expr: false, preserve_space: false };
const P_EXPR: TokContext = TokContext { kind: CtxKind::PExpr, is_expr: true, preserve_space: false };
const Q_TMPL: TokContext = TokContext { kind: CtxKind::QTmpl, is_expr: true, preserve_space: true };
const F_STAT: TokContext = TokContext { kind: CtxKind::FStat, is_expr: false, preserve_space: false };
const F_EXPR: TokContext = TokContext { kind: CtxKind::FExpr, is_expr: true, preserve_space: false };

/// Tokenizer options relevant below the parser's full `Options` (kept in
/// `ecma-parser`); the lexer only needs the handful of switches that affect
/// how characters are classified.
#[derive(Debug, Clone, Copy)]
pub struct LexerOptions {
    pub ecma_version: u32,
    pub source_type_module: bool,
    pub allow_hash_bang: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self { ecma_version: 2022, source_type_module: false, allow_hash_bang: false }
    }
}

#[derive(Clone)]
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    opts: LexerOptions,
    context: Vec<TokContext>,
    expr_allowed: bool,
    last_end: u32,
    last_kind: TokenKind,
    errors: Vec<ParseError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, opts: LexerOptions) -> Self {
        let mut lexer = Self {
            cursor: Cursor::new(source),
            opts,
            context: vec![B_STAT],
            expr_allowed: true,
            last_end: 0,
            last_kind: TokenKind::Eof,
            errors: Vec::new(),
        };
        if opts.allow_hash_bang && lexer.cursor.rest_starts_with("#!") {
            lexer.skip_line_comment(2);
        }
        lexer
    }

    /// Create a lexer positioned at byte offset `pos`, for entry points that
    /// start mid-source (`parseExpressionAt`) but still want spans reported
    /// against the original source rather than a re-sliced substring.
    pub fn new_at(source: &'src str, pos: u32, opts: LexerOptions) -> Self {
        Self {
            cursor: Cursor::new_at(source, pos),
            opts,
            context: vec![B_STAT],
            expr_allowed: true,
            last_end: pos,
            last_kind: TokenKind::Eof,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    pub fn source(&self) -> &'src str {
        self.cursor.source()
    }

    fn error(&mut self, message: impl Into<String>, start: u32, end: u32) {
        self.errors.push(ParseError::fatal(message, ecma_common::Span::new(start, end)));
    }

    /// Read the next significant token, skipping whitespace and comments and
    /// updating the context stack from the token just produced.
    pub fn next(&mut self) -> LexedToken {
        let in_template = matches!(self.cur_context().kind, CtxKind::QTmpl);
        let newline = if !self.cur_context().preserve_space {
            self.skip_space()
        } else {
            false
        };
        let start = self.cursor.pos();

        if !in_template && self.cursor.is_eof() {
            let tok = Token::new(TokenKind::Eof, start, start).with_newline_before(newline);
            self.finish(tok.clone());
            return LexedToken::plain(tok);
        }

        let lexed = if in_template {
            self.read_template_token(start)
        } else {
            self.read_token(start)
        };
        let lexed = LexedToken { token: lexed.token.with_newline_before(newline), ..lexed };
        self.finish(lexed.token.clone());
        lexed
    }

    fn finish(&mut self, tok: Token) {
        let prev_kind = std::mem::replace(&mut self.last_kind, tok.kind.clone());
        self.update_context(prev_kind, &tok.kind, tok.span.start);
        self.last_end = tok.span.end;
    }

    fn cur_context(&self) -> TokContext {
        *self.context.last().expect("context stack must never be empty")
    }

    fn had_line_break_since_last(&self, pos: u32) -> bool {
        let from = self.last_end.min(pos);
        self.cursor.slice(from, pos).contains(['\n', '\r', '\u{2028}', '\u{2029}'])
    }

    // ---- context tracking ----------------------------------------------

    fn brace_is_block(&self, prev_kind: &TokenKind, start: u32) -> bool {
        let parent = self.cur_context();
        if matches!(parent.kind, CtxKind::FExpr | CtxKind::FStat) {
            return true;
        }
        if matches!(prev_kind, TokenKind::Colon) && matches!(parent.kind, CtxKind::BStat | CtxKind::BExpr) {
            return !parent.is_expr;
        }
        if matches!(prev_kind, TokenKind::Keyword(Keyword::Return))
            || (matches!(prev_kind, TokenKind::Name) && self.expr_allowed)
        {
            return self.had_line_break_since_last(start);
        }
        if matches!(
            prev_kind,
            TokenKind::Keyword(Keyword::Else) | TokenKind::Semi | TokenKind::Eof
                | TokenKind::ParenR | TokenKind::Arrow
        ) {
            return true;
        }
        if matches!(prev_kind, TokenKind::BraceL) {
            return matches!(parent.kind, CtxKind::BStat);
        }
        if matches!(prev_kind, TokenKind::Keyword(Keyword::Var) | TokenKind::Keyword(Keyword::Const))
            || matches!(prev_kind, TokenKind::Name)
        {
            return false;
        }
        !self.expr_allowed
    }

    fn update_context(&mut self, prev_kind: TokenKind, kind: &TokenKind, start: u32) {
        match kind {
            TokenKind::Keyword(_) if matches!(prev_kind, TokenKind::Dot) => {
                self.expr_allowed = false;
            }
            TokenKind::BraceL => {
                let block = self.brace_is_block(&prev_kind, start);
                self.context.push(if block { B_STAT } else { B_EXPR });
                self.expr_allowed = true;
            }
            TokenKind::DollarBraceL => {
                self.context.push(B_TMPL);
                self.expr_allowed = true;
            }
            TokenKind::BraceR | TokenKind::ParenR => {
                if self.context.len() == 1 {
                    self.expr_allowed = true;
                } else {
                    let mut out = self.context.pop().unwrap();
                    if out.kind == CtxKind::BStat && self.cur_context().kind == CtxKind::FExpr {
                        out = self.context.pop().unwrap();
                    }
                    self.expr_allowed = !out.is_expr;
                }
            }
            TokenKind::ParenL => {
                let statement_parens = matches!(
                    prev_kind,
                    TokenKind::Keyword(Keyword::If)
                        | TokenKind::Keyword(Keyword::For)
                        | TokenKind::Keyword(Keyword::With)
                        | TokenKind::Keyword(Keyword::While)
                );
                self.context.push(if statement_parens { P_STAT } else { P_EXPR });
                self.expr_allowed = true;
            }
            TokenKind::IncDec(_) => {
                // exprAllowed unchanged, matching the no-op updateContext.
            }
            TokenKind::Keyword(Keyword::Function) | TokenKind::Keyword(Keyword::Class) => {
                let push_expr = self.cur_context().kind != CtxKind::BStat
                    && !(matches!(prev_kind, TokenKind::Keyword(Keyword::Else))
                        || (matches!(prev_kind, TokenKind::Semi) && self.cur_context().kind != CtxKind::PStat)
                        || (matches!(prev_kind, TokenKind::Keyword(Keyword::Return))
                            && self.had_line_break_since_last(start))
                        || ((matches!(prev_kind, TokenKind::Colon) || matches!(prev_kind, TokenKind::BraceL))
                            && self.cur_context().kind == CtxKind::BStat));
                self.context.push(if push_expr { F_EXPR } else { F_STAT });
                self.expr_allowed = false;
            }
            TokenKind::BackQuote => {
                if self.cur_context().kind == CtxKind::QTmpl {
                    self.context.pop();
                } else {
                    self.context.push(Q_TMPL);
                }
                self.expr_allowed = false;
            }
            _ => {
                self.expr_allowed = kind.before_expr();
            }
        }
    }

    // ---- whitespace / comments ------------------------------------------

    fn skip_space(&mut self) -> bool {
        let mut newline = false;
        loop {
            match self.cursor.peek() {
                Some(' ') | Some('\t') | Some('\u{000B}') | Some('\u{000C}') | Some('\u{00A0}')
                | Some('\u{FEFF}') => {
                    self.cursor.advance();
                }
                Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {
                    newline = true;
                    self.cursor.advance();
                }
                Some('\r') => {
                    newline = true;
                    self.cursor.advance();
                    if self.cursor.peek() == Some('\n') {
                        self.cursor.advance();
                    }
                }
                Some('/') if self.cursor.peek_next() == Some('/') => {
                    self.skip_line_comment(2);
                }
                Some('/') if self.cursor.peek_next() == Some('*') => {
                    if self.skip_block_comment() {
                        newline = true;
                    }
                }
                Some(c) if c.is_whitespace() => {
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        newline
    }

    fn skip_line_comment(&mut self, skip: usize) {
        for _ in 0..skip {
            self.cursor.advance();
        }
        self.cursor.eat_while(|c| !matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'));
    }

    fn skip_block_comment(&mut self) -> bool {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.cursor.advance();
        let mut saw_newline = false;
        loop {
            match self.cursor.peek() {
                None => {
                    self.error("Unterminated comment", start, self.cursor.pos());
                    break;
                }
                Some('\n') | Some('\r') | Some('\u{2028}') | Some('\u{2029}') => {
                    saw_newline = true;
                    self.cursor.advance();
                }
                Some('*') if self.cursor.peek_next() == Some('/') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        saw_newline
    }

    // ---- dispatch --------------------------------------------------------

    fn read_token(&mut self, start: u32) -> LexedToken {
        let Some(c) = self.cursor.peek() else {
            return LexedToken::plain(Token::new(TokenKind::Eof, start, start));
        };

        if c == '#' {
            if self.opts.ecma_version >= 13 {
                return self.read_private_name(start);
            }
            self.cursor.advance();
            self.error("Unexpected character '#'", start, self.cursor.pos());
            return LexedToken::plain(Token::new(TokenKind::PrivateId, start, self.cursor.pos()));
        }
        if c == '.' {
            if self.cursor.peek_next().map(|n| n.is_ascii_digit()).unwrap_or(false) {
                return self.read_number(start, true);
            }
            self.cursor.advance();
            if self.cursor.peek() == Some('.') && self.cursor.peek_next() == Some('.') {
                self.cursor.advance();
                self.cursor.advance();
                return LexedToken::plain(Token::new(TokenKind::Ellipsis, start, self.cursor.pos()));
            }
            return LexedToken::plain(Token::new(TokenKind::Dot, start, self.cursor.pos()));
        }
        if c.is_ascii_digit() {
            return self.read_number(start, false);
        }
        if c == '"' || c == '\'' {
            return self.read_string(start, c);
        }
        if c == '`' {
            self.cursor.advance();
            return LexedToken::plain(Token::new(TokenKind::BackQuote, start, self.cursor.pos()));
        }
        if is_ident_start(c) || c == '\\' {
            return self.read_word(start);
        }

        match c {
            '(' => self.single(start, TokenKind::ParenL),
            ')' => self.single(start, TokenKind::ParenR),
            ';' => self.single(start, TokenKind::Semi),
            ',' => self.single(start, TokenKind::Comma),
            '[' => self.single(start, TokenKind::BracketL),
            ']' => self.single(start, TokenKind::BracketR),
            '{' => {
                if self.cur_context().kind == CtxKind::QTmpl {
                    self.cursor.advance();
                    LexedToken::plain(Token::new(TokenKind::DollarBraceL, start, self.cursor.pos()))
                } else {
                    self.single(start, TokenKind::BraceL)
                }
            }
            '}' => self.single(start, TokenKind::BraceR),
            ':' => self.single(start, TokenKind::Colon),
            '?' => self.read_question(start),
            '/' => self.read_slash(start),
            '%' | '*' => self.read_mult_modulo(start, c),
            '|' | '&' => self.read_pipe_amp(start, c),
            '^' => {
                self.cursor.advance();
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    self.assign(start, "^=")
                } else {
                    LexedToken::plain(Token::new(TokenKind::BitwiseXOR, start, self.cursor.pos()))
                }
            }
            '+' | '-' => self.read_plus_min(start, c),
            '<' | '>' => self.read_lt_gt(start, c),
            '=' | '!' => self.read_eq_excl(start, c),
            '~' => {
                self.cursor.advance();
                LexedToken::plain(Token::new(TokenKind::Prefix("~"), start, self.cursor.pos()))
            }
            _ => {
                self.cursor.advance();
                self.error(format!("Unexpected character '{c}'"), start, self.cursor.pos());
                LexedToken::plain(Token::new(TokenKind::Eof, start, self.cursor.pos()))
            }
        }
    }

    fn single(&mut self, start: u32, kind: TokenKind) -> LexedToken {
        self.cursor.advance();
        LexedToken::plain(Token::new(kind, start, self.cursor.pos()))
    }

    fn assign(&mut self, start: u32, op: &'static str) -> LexedToken {
        LexedToken::plain(Token::new(TokenKind::AssignOp(op), start, self.cursor.pos()))
    }

    fn read_question(&mut self, start: u32) -> LexedToken {
        self.cursor.advance(); // '?'
        if self.cursor.peek() == Some('.')
            && !self.cursor.peek_next().map(|n| n.is_ascii_digit()).unwrap_or(false)
        {
            self.cursor.advance();
            return LexedToken::plain(Token::new(TokenKind::QuestionDot, start, self.cursor.pos()));
        }
        if self.cursor.peek() == Some('?') {
            self.cursor.advance();
            if self.opts.ecma_version >= 12 && self.cursor.peek() == Some('=') {
                self.cursor.advance();
                return self.assign(start, "??=");
            }
            return LexedToken::plain(Token::new(TokenKind::Nullish, start, self.cursor.pos()));
        }
        LexedToken::plain(Token::new(TokenKind::Question, start, self.cursor.pos()))
    }

    fn read_slash(&mut self, start: u32) -> LexedToken {
        if self.expr_allowed {
            return self.read_regexp(start);
        }
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            return self.assign(start, "/=");
        }
        LexedToken::plain(Token::new(TokenKind::Slash, start, self.cursor.pos()))
    }

    fn read_mult_modulo(&mut self, start: u32, code: char) -> LexedToken {
        self.cursor.advance();
        let mut tok_type = if code == '*' { TokenKind::Star } else { TokenKind::Modulo };
        if code == '*' && self.cursor.peek() == Some('*') {
            self.cursor.advance();
            tok_type = TokenKind::StarStar;
        }
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            return self.assign(start, if code == '*' { "*=" } else { "%=" });
        }
        LexedToken::plain(Token::new(tok_type, start, self.cursor.pos()))
    }

    fn read_pipe_amp(&mut self, start: u32, code: char) -> LexedToken {
        self.cursor.advance();
        if self.cursor.peek() == Some(code) {
            self.cursor.advance();
            if self.opts.ecma_version >= 12 && self.cursor.peek() == Some('=') {
                self.cursor.advance();
                return self.assign(start, if code == '|' { "||=" } else { "&&=" });
            }
            return LexedToken::plain(Token::new(
                if code == '|' { TokenKind::LogicalOR } else { TokenKind::LogicalAND },
                start,
                self.cursor.pos(),
            ));
        }
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            return self.assign(start, if code == '|' { "|=" } else { "&=" });
        }
        LexedToken::plain(Token::new(
            if code == '|' { TokenKind::BitwiseOR } else { TokenKind::BitwiseAND },
            start,
            self.cursor.pos(),
        ))
    }

    fn read_plus_min(&mut self, start: u32, code: char) -> LexedToken {
        self.cursor.advance();
        if self.cursor.peek() == Some(code) {
            self.cursor.advance();
            if code == '-'
                && !self.opts.source_type_module
                && self.cursor.peek() == Some('>')
                && (self.last_end == 0 || self.had_line_break_since_last(start))
            {
                self.cursor.advance();
                self.skip_line_comment(0);
                return self.finish_as_skip(start);
            }
            return LexedToken::plain(Token::new(
                TokenKind::IncDec(if code == '+' { "++" } else { "--" }),
                start,
                self.cursor.pos(),
            ));
        }
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            return self.assign(start, if code == '+' { "+=" } else { "-=" });
        }
        LexedToken::plain(Token::new(
            TokenKind::PlusMin(if code == '+' { "+" } else { "-" }),
            start,
            self.cursor.pos(),
        ))
    }

    /// After consuming an HTML-style `-->`/`<!--` line comment, re-dispatch
    /// from the next significant character.
    fn finish_as_skip(&mut self, start: u32) -> LexedToken {
        self.skip_space();
        let new_start = self.cursor.pos();
        self.read_token(new_start).with_start(start)
    }

    fn read_lt_gt(&mut self, start: u32, code: char) -> LexedToken {
        self.cursor.advance();
        if code == '<'
            && !self.opts.source_type_module
            && self.cursor.peek() == Some('!')
            && self.cursor.rest_starts_with("!--")
        {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.advance();
            self.skip_line_comment(0);
            return self.finish_as_skip(start);
        }
        let mut size = 1;
        if self.cursor.peek() == Some(code) {
            self.cursor.advance();
            size = 2;
            if code == '>' && self.cursor.peek() == Some('>') {
                self.cursor.advance();
                size = 3;
            }
        }
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            let op: &'static str = match (code, size) {
                ('<', 1) => "<=",
                ('>', 1) => ">=",
                ('<', 2) => "<<=",
                ('>', 2) => ">>=",
                ('>', 3) => ">>>=",
                _ => unreachable!(),
            };
            return self.assign(start, op);
        }
        let op: &'static str = match (code, size) {
            ('<', 1) => "<",
            ('>', 1) => ">",
            ('<', 2) => "<<",
            ('>', 2) => ">>",
            ('>', 3) => ">>>",
            _ => unreachable!(),
        };
        let kind = if size == 1 { TokenKind::Relational(op) } else { TokenKind::BitShift(op) };
        LexedToken::plain(Token::new(kind, start, self.cursor.pos()))
    }

    fn read_eq_excl(&mut self, start: u32, code: char) -> LexedToken {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            if self.cursor.peek() == Some('=') {
                self.cursor.advance();
                return LexedToken::plain(Token::new(
                    TokenKind::Equality(if code == '=' { "===" } else { "!==" }),
                    start,
                    self.cursor.pos(),
                ));
            }
            return LexedToken::plain(Token::new(
                TokenKind::Equality(if code == '=' { "==" } else { "!=" }),
                start,
                self.cursor.pos(),
            ));
        }
        if code == '=' && self.cursor.peek() == Some('>') {
            self.cursor.advance();
            return LexedToken::plain(Token::new(TokenKind::Arrow, start, self.cursor.pos()));
        }
        if code == '=' {
            LexedToken::plain(Token::new(TokenKind::Eq, start, self.cursor.pos()))
        } else {
            LexedToken::plain(Token::new(TokenKind::Prefix("!"), start, self.cursor.pos()))
        }
    }

    // ---- identifiers / keywords ------------------------------------------

    fn read_word(&mut self, start: u32) -> LexedToken {
        let (word, contains_esc) = self.read_word1();
        let kind = match Keyword::from_str(&word) {
            Some(kw) if !kw.is_contextual() => TokenKind::Keyword(kw),
            _ => TokenKind::Name,
        };
        if contains_esc && kind.flags().is_keyword {
            self.error(format!("Escape sequence in keyword {word}"), start, self.cursor.pos());
        }
        let tok = Token::new(kind, start, self.cursor.pos()).with_esc(contains_esc);
        LexedToken { token: tok, value: Value::Str(word), legacy_octal: false, invalid_escape: false, bad_numeric_separator: false }
    }

    /// Read a raw identifier word, decoding `\uXXXX`/`\u{XXXX}` escapes.
    fn read_word1(&mut self) -> (String, bool) {
        let mut out = String::new();
        let mut contains_esc = false;
        let mut first = true;
        loop {
            match self.cursor.peek() {
                Some('\\') if self.cursor.peek_next() == Some('u') => {
                    contains_esc = true;
                    self.cursor.advance();
                    self.cursor.advance();
                    if let Some(ch) = self.read_unicode_escape() {
                        out.push(ch);
                    }
                }
                Some(c) if (first && is_ident_start(c)) || (!first && is_ident_continue(c)) => {
                    out.push(c);
                    self.cursor.advance();
                }
                _ => break,
            }
            first = false;
        }
        (out, contains_esc)
    }

    fn read_unicode_escape(&mut self) -> Option<char> {
        if self.cursor.peek() == Some('{') {
            self.cursor.advance();
            let mut code: u32 = 0;
            while let Some(c) = self.cursor.peek() {
                if c == '}' {
                    self.cursor.advance();
                    break;
                }
                match c.to_digit(16) {
                    Some(d) => {
                        code = code * 16 + d;
                        self.cursor.advance();
                    }
                    None => break,
                }
            }
            char::from_u32(code)
        } else {
            let mut code: u32 = 0;
            for _ in 0..4 {
                match self.cursor.peek().and_then(|c| c.to_digit(16)) {
                    Some(d) => {
                        code = code * 16 + d;
                        self.cursor.advance();
                    }
                    None => return None,
                }
            }
            char::from_u32(code)
        }
    }

    fn read_private_name(&mut self, start: u32) -> LexedToken {
        self.cursor.advance(); // '#'
        let (word, _) = self.read_word1();
        LexedToken {
            token: Token::new(TokenKind::PrivateId, start, self.cursor.pos()),
            value: Value::Str(word),
            legacy_octal: false,
            invalid_escape: false,
            bad_numeric_separator: false,
        }
    }

    // ---- delegated to submodules -----------------------------------------

    fn read_number(&mut self, start: u32, starts_with_dot: bool) -> LexedToken {
        number::read_number(self, start, starts_with_dot)
    }

    fn read_string(&mut self, start: u32, quote: char) -> LexedToken {
        string::read_string(self, start, quote)
    }

    fn read_template_token(&mut self, start: u32) -> LexedToken {
        string::read_template_token(self, start)
    }

    fn read_regexp(&mut self, start: u32) -> LexedToken {
        self.cursor.advance(); // leading '/'
        let mut in_class = false;
        loop {
            match self.cursor.peek() {
                None => {
                    self.error("Unterminated regular expression", start, self.cursor.pos());
                    break;
                }
                Some('\n') | Some('\r') | Some('\u{2028}') | Some('\u{2029}') => {
                    self.error("Unterminated regular expression", start, self.cursor.pos());
                    break;
                }
                Some('[') => {
                    in_class = true;
                    self.cursor.advance();
                }
                Some(']') if in_class => {
                    in_class = false;
                    self.cursor.advance();
                }
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.peek().is_some() {
                        self.cursor.advance();
                    }
                }
                Some('/') if !in_class => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        let pattern_end = self.cursor.pos() - 1;
        let pattern = self.cursor.slice(start + 1, pattern_end).to_string();
        let (flags, _) = self.read_word1();

        if let Err(e) = regress::Regex::with_flags(&pattern, flags.as_str()) {
            self.error(format!("Invalid regular expression: {e}"), start, self.cursor.pos());
        }

        LexedToken {
            token: Token::new(TokenKind::Regexp, start, self.cursor.pos()),
            value: Value::Regex { pattern, flags },
            legacy_octal: false,
            invalid_escape: false,
            bad_numeric_separator: false,
        }
    }

    // exposed to the string/number submodules
    pub(crate) fn cursor_mut(&mut self) -> &mut Cursor<'src> {
        &mut self.cursor
    }

    pub(crate) fn cursor(&self) -> &Cursor<'src> {
        &self.cursor
    }

    pub(crate) fn push_error(&mut self, message: impl Into<String>, start: u32, end: u32) {
        self.error(message, start, end);
    }

    pub(crate) fn read_unicode_escape_pub(&mut self) -> Option<char> {
        self.read_unicode_escape()
    }
}

impl LexedToken {
    fn with_start(mut self, start: u32) -> Self {
        self.token.span = ecma_common::Span::new(start, self.token.span.end);
        self
    }
}

/// Identifier-start classification: ASCII fast path, falling back to the
/// Unicode `ID_Start` table for anything non-ASCII.
pub fn is_ident_start(c: char) -> bool {
    if c.is_ascii() {
        c == '_' || c == '$' || c.is_ascii_alphabetic()
    } else {
        unicode_ident::is_xid_start(c) || c == '\u{200C}' || c == '\u{200D}'
    }
}

/// Identifier-continue classification: ASCII fast path, Unicode `ID_Continue`
/// fallback.
pub fn is_ident_continue(c: char) -> bool {
    if c.is_ascii() {
        c == '_' || c == '$' || c.is_ascii_alphanumeric()
    } else {
        unicode_ident::is_xid_continue(c) || c == '\u{200C}' || c == '\u{200D}'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src, LexerOptions::default());
        let mut out = Vec::new();
        loop {
            let t = lexer.next();
            let done = matches!(t.token.kind, TokenKind::Eof);
            out.push(t.token.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lex_simple_expression() {
        let ks = kinds("1 + 2");
        assert_eq!(ks, vec![TokenKind::Num, TokenKind::PlusMin("+"), TokenKind::Num, TokenKind::Eof]);
    }

    #[test]
    fn lex_identifier_vs_keyword() {
        let ks = kinds("let x = foo");
        assert_eq!(
            ks,
            vec![TokenKind::Name, TokenKind::Name, TokenKind::Eq, TokenKind::Name, TokenKind::Eof]
        );
    }

    #[test]
    fn slash_after_number_is_division() {
        let ks = kinds("a / 2");
        assert_eq!(ks[1], TokenKind::Slash);
    }

    #[test]
    fn slash_after_paren_is_regexp() {
        let mut lexer = Lexer::new("(/abc/)", LexerOptions::default());
        let _paren = lexer.next();
        let tok = lexer.next();
        assert_eq!(tok.token.kind, TokenKind::Regexp);
    }

    #[test]
    fn brace_after_function_is_block() {
        let ks = kinds("function f() {}");
        assert!(ks.iter().any(|k| matches!(k, TokenKind::BraceL)));
    }

    #[test]
    fn newline_before_flag_set_across_line_break() {
        let mut lexer = Lexer::new("a\nb", LexerOptions::default());
        let first = lexer.next();
        let second = lexer.next();
        assert!(!first.token.newline_before);
        assert!(second.token.newline_before);
    }

    #[test]
    fn nested_block_comment_newlines_reported() {
        let mut lexer = Lexer::new("/* a\nb */ x", LexerOptions::default());
        let tok = lexer.next();
        assert!(tok.token.newline_before);
    }

    #[test]
    fn optional_chaining_dot_not_confused_with_ternary_digit() {
        let ks = kinds("a?.1:2");
        assert_eq!(ks[1], TokenKind::Question);
    }

    #[test]
    fn nullish_coalescing() {
        let ks = kinds("a ?? b");
        assert_eq!(ks[1], TokenKind::Nullish);
    }
}
