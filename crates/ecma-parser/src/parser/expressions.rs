//! The expression parser (spec §4.4), precedence-climbing over `TokenKind`'s
//! `binop` table with a dedicated right-associative exponentiation rule, a
//! cover grammar for `(...)` that resolves to either a parenthesized
//! expression or an arrow parameter list, and a destructuring-errors record
//! threaded through assignment-level parses so patterns and expressions can
//! share one grammar without backtracking (spec §9 "Cover grammar without
//! backtracking").

use ecma_common::{Keyword, Span, TokenKind};
use ecma_lexer::Value;

use crate::ast::*;
use crate::scope::{BindingKind, ScopeFlags};

use super::{DestructuringErrors, PResult, Parser};

impl<'src> Parser<'src> {
    pub(crate) fn parse_expression(&mut self, no_in: bool) -> PResult<Expr> {
        let start = self.start_node();
        let mut expr = self.parse_maybe_assign(no_in, None)?;
        if self.at(&TokenKind::Comma) {
            let mut expressions = vec![expr];
            while self.eat(&TokenKind::Comma) {
                expressions.push(self.parse_maybe_assign(no_in, None)?);
            }
            expr = Expr::Sequence(SequenceExpression::new(self.finish_node(start), expressions));
        }
        Ok(expr)
    }

    pub(crate) fn parse_maybe_assign(
        &mut self,
        no_in: bool,
        refs: Option<&mut DestructuringErrors>,
    ) -> PResult<Expr> {
        if self.scope.in_generator() && self.is_contextual("yield") {
            return self.parse_yield(no_in);
        }

        let start = self.start_node();
        let mut own_refs = DestructuringErrors::default();
        let refs = refs.unwrap_or(&mut own_refs);

        if (self.at(&TokenKind::ParenL) || matches!(self.kind(), TokenKind::Name))
            && !self.had_line_break_before_current()
        {
            self.potential_arrow_at = Some(start);
        }

        let left = self.parse_maybe_conditional(no_in, refs)?;
        if let Some(arrow) = self.try_parse_arrow_from(start, &left)? {
            return Ok(arrow);
        }

        if self.kind().flags().is_assign {
            let operator = self.assign_operator_text();
            let pattern = if operator == "=" {
                self.to_assignable(left, false)?
            } else {
                self.to_simple_assign_target(left)?
            };
            refs.shorthand_assign = None;
            refs.trailing_comma = None;
            self.next();
            let right = self.parse_maybe_assign(no_in, None)?;
            return Ok(Expr::Assignment(AssignmentExpression::new(
                self.finish_node(start),
                operator,
                Box::new(pattern),
                Box::new(right),
            )));
        }
        Ok(left)
    }

    fn assign_operator_text(&self) -> String {
        match self.kind() {
            TokenKind::Eq => "=".to_string(),
            TokenKind::AssignOp(op) => op.to_string(),
            _ => unreachable!("caller checked is_assign"),
        }
    }

    /// If `left` is a bare identifier or a parenthesized-list placeholder and
    /// `=>` directly follows, reinterpret it as an arrow function's
    /// parameter list (spec §4.4 "Arrow detection").
    fn try_parse_arrow_from(&mut self, start: u32, left: &Expr) -> PResult<Option<Expr>> {
        if !self.at(&TokenKind::Arrow) || self.had_line_break_before_current() {
            return Ok(None);
        }
        if Some(start) != self.potential_arrow_at {
            return Ok(None);
        }
        let params = match left {
            Expr::Identifier(id) => vec![Pat::Identifier(id.clone())],
            Expr::Sequence(seq) => {
                let mut out = Vec::with_capacity(seq.expressions.len());
                for e in &seq.expressions {
                    out.push(self.to_assignable(e.clone(), true)?);
                }
                out
            }
            Expr::Paren(p) => vec![self.to_assignable((*p.expression).clone(), true)?],
            _ => vec![self.to_assignable(left.clone(), true)?],
        };
        self.next(); // '=>'
        Some(self.finish_arrow(start, params, false)).transpose()
    }

    /// `async x => x` / `async (x) => x` (spec §4.4 "Arrow detection"):
    /// `async` is otherwise a plain identifier, so this speculatively
    /// consumes it and either a bare parameter name or a parenthesized
    /// parameter list, rewinding the lexer if `=>` doesn't follow.
    fn try_parse_async_arrow(&mut self, start: u32) -> PResult<Option<Expr>> {
        let saved = self.save_lexer_state();
        self.next(); // 'async'
        if self.had_line_break_before_current() {
            self.restore_lexer_state(saved);
            return Ok(None);
        }

        if matches!(self.kind(), TokenKind::Name) && !self.cur_token().contains_esc {
            let name = self.cur_str().to_string();
            let id_span = Span::new(self.start(), self.cur_token().span.end);
            self.next();
            if self.at(&TokenKind::Arrow) && !self.had_line_break_before_current() {
                self.next(); // '=>'
                let param = Identifier::new(self.finish_node_at(id_span.start, id_span.end), name);
                return Some(self.finish_arrow(start, vec![Pat::Identifier(param)], true)?).transpose();
            }
            self.restore_lexer_state(saved);
            return Ok(None);
        }

        if self.at(&TokenKind::ParenL) {
            let mut refs = DestructuringErrors::default();
            let paren_result = self.parse_paren_and_distinguish(&mut refs);
            let Ok(inner) = paren_result else {
                self.restore_lexer_state(saved);
                return Ok(None);
            };
            if self.at(&TokenKind::Arrow) && !self.had_line_break_before_current() {
                let params = match inner {
                    Expr::Sequence(seq) => {
                        let mut out = Vec::with_capacity(seq.expressions.len());
                        for e in seq.expressions {
                            out.push(self.to_assignable(e, true)?);
                        }
                        out
                    }
                    Expr::Paren(p) => vec![self.to_assignable(*p.expression, true)?],
                    other => vec![self.to_assignable(other, true)?],
                };
                self.next(); // '=>'
                return Some(self.finish_arrow(start, params, true)?).transpose();
            }
            self.restore_lexer_state(saved);
            return Ok(None);
        }

        self.restore_lexer_state(saved);
        Ok(None)
    }

    fn finish_arrow(&mut self, start: u32, params: Vec<Pat>, is_async: bool) -> PResult<Expr> {
        let flags = ScopeFlags::FUNCTION
            | ScopeFlags::ARROW
            | ScopeFlags::VAR
            | if is_async { ScopeFlags::ASYNC } else { ScopeFlags::empty() };
        self.scope.push(flags);
        for p in &params {
            self.declare_pattern_bindings(p, BindingKind::Lexical)?;
        }
        let (body, expression) = if self.at(&TokenKind::BraceL) {
            let block = self.parse_function_body_block()?;
            if super::statements::body_declares_use_strict(&block) && !super::statements::has_simple_parameter_list(&params) {
                return Err(self.raise_fatal(
                    self.prev_start(),
                    "Illegal 'use strict' directive in function with non-simple parameter list",
                ));
            }
            (ArrowBody::Block(block), false)
        } else {
            (ArrowBody::Expr(Box::new(self.parse_maybe_assign(false, None)?)), true)
        };
        self.scope.pop();
        Ok(Expr::Arrow(ArrowFunctionExpression::new(
            self.finish_node(start),
            None,
            params,
            body,
            expression,
            false,
            is_async,
        )))
    }

    fn parse_yield(&mut self, no_in: bool) -> PResult<Expr> {
        let start = self.start_node();
        self.next(); // 'yield'
        let mut delegate = false;
        let mut argument = None;
        if !self.can_insert_semicolon()
            && !matches!(self.kind(), TokenKind::ParenR | TokenKind::BracketR | TokenKind::BraceR | TokenKind::Colon | TokenKind::Comma)
        {
            delegate = self.eat(&TokenKind::Star);
            if delegate || self.kind().starts_expr() {
                argument = Some(Box::new(self.parse_maybe_assign(no_in, None)?));
            }
        }
        Ok(Expr::Yield(YieldExpression::new(self.finish_node(start), argument, delegate)))
    }

    pub(crate) fn parse_maybe_conditional(
        &mut self,
        no_in: bool,
        refs: &mut DestructuringErrors,
    ) -> PResult<Expr> {
        let start = self.start_node();
        let expr = self.parse_expr_ops(no_in, refs)?;
        if self.at(&TokenKind::Question) {
            self.next();
            let consequent = self.parse_maybe_assign(false, None)?;
            self.expect(&TokenKind::Colon)?;
            let alternate = self.parse_maybe_assign(no_in, None)?;
            return Ok(Expr::Conditional(ConditionalExpression::new(
                self.finish_node(start),
                Box::new(expr),
                Box::new(consequent),
                Box::new(alternate),
            )));
        }
        Ok(expr)
    }

    fn parse_expr_ops(&mut self, no_in: bool, refs: &mut DestructuringErrors) -> PResult<Expr> {
        let start = self.start_node();
        let left = self.parse_maybe_unary(refs, false)?;
        self.parse_expr_op(left, start, 0, no_in)
    }

    /// Precedence climbing (spec §4.4 "Operator-precedence climbing"), with
    /// `**`'s right-associativity and the ES2020 rule that `??` may not
    /// directly mix with `&&`/`||` without parentheses.
    fn parse_expr_op(&mut self, mut left: Expr, left_start: u32, min_prec: u8, no_in: bool) -> PResult<Expr> {
        loop {
            if self.at(&TokenKind::StarStar) {
                if 11 < min_prec {
                    return Ok(left);
                }
                self.next();
                let right_start = self.start_node();
                let right_operand = self.parse_maybe_unary(&mut DestructuringErrors::default(), false)?;
                let right = self.parse_expr_op(right_operand, right_start, 11, no_in)?;
                left = Expr::Binary(BinaryExpression::new(
                    self.finish_node(left_start),
                    "**".to_string(),
                    Box::new(left),
                    Box::new(right),
                ));
                continue;
            }

            if no_in && self.at_keyword(Keyword::In) {
                return Ok(left);
            }

            let Some(prec) = self.kind().binop() else { return Ok(left) };
            if prec < min_prec {
                return Ok(left);
            }
            let is_logical = matches!(self.kind(), TokenKind::LogicalAND | TokenKind::LogicalOR);
            let is_nullish = matches!(self.kind(), TokenKind::Nullish);
            let mixes_with_left = match &left {
                Expr::Logical(l) if l.operator == "??" => is_logical,
                Expr::Logical(l) if l.operator != "??" => is_nullish,
                _ => false,
            };
            if mixes_with_left {
                return Err(self.raise_fatal(
                    self.start(),
                    "Logical expressions and coalesce expressions cannot be mixed. Wrap either by parentheses",
                ));
            }
            let operator = self.binop_text();
            self.next();
            let right_start = self.start_node();
            let right_operand = self.parse_maybe_unary(&mut DestructuringErrors::default(), false)?;
            let right = self.parse_expr_op(right_operand, right_start, prec + 1, no_in)?;
            left = if is_logical || is_nullish {
                Expr::Logical(LogicalExpression::new(self.finish_node(left_start), operator, Box::new(left), Box::new(right)))
            } else {
                Expr::Binary(BinaryExpression::new(self.finish_node(left_start), operator.to_string(), Box::new(left), Box::new(right)))
            };
        }
    }

    fn binop_text(&self) -> &'static str {
        match self.kind() {
            TokenKind::LogicalOR => "||",
            TokenKind::LogicalAND => "&&",
            TokenKind::Nullish => "??",
            TokenKind::BitwiseOR => "|",
            TokenKind::BitwiseXOR => "^",
            TokenKind::BitwiseAND => "&",
            TokenKind::Equality(op) => op,
            TokenKind::Relational(op) => op,
            TokenKind::BitShift(op) => op,
            TokenKind::PlusMin(op) => op,
            TokenKind::Modulo => "%",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Keyword(Keyword::In) => "in",
            TokenKind::Keyword(Keyword::Instanceof) => "instanceof",
            _ => unreachable!("caller checked binop()"),
        }
    }

    fn parse_maybe_unary(&mut self, refs: &mut DestructuringErrors, saw_unary: bool) -> PResult<Expr> {
        let start = self.start_node();
        if self.scope.can_await() && self.is_contextual("await") {
            self.next();
            let argument = self.parse_maybe_unary(&mut DestructuringErrors::default(), true)?;
            return Ok(Expr::Await(AwaitExpression::new(self.finish_node(start), Box::new(argument))));
        }

        let update = matches!(self.kind(), TokenKind::IncDec(_));
        if self.kind().flags().prefix && (update || matches!(self.kind(), TokenKind::Prefix(_) | TokenKind::PlusMin(_) | TokenKind::Keyword(_))) {
            let operator = self.prefix_operator_text();
            self.next();
            let argument = self.parse_maybe_unary(&mut DestructuringErrors::default(), true)?;
            if update {
                self.check_lval_simple(&argument, BindingKind::Outside)?;
                return Ok(Expr::Update(UpdateExpression::new(self.finish_node(start), operator, true, Box::new(argument))));
            }
            if operator == "delete" {
                if let Expr::Member(m) = &argument {
                    if let Expr::PrivateIdentifier(_) = &*m.property {
                        return Err(self.raise_fatal(start, "Private fields can not be deleted"));
                    }
                } else if self.strict && matches!(argument, Expr::Identifier(_)) {
                    return Err(self.raise_recoverable(start, "Deleting local variable in strict mode"));
                }
            }
            if self.at(&TokenKind::StarStar) {
                return Err(self.raise_fatal(
                    start,
                    "Illegal expression. Wrap left hand side or entire exponentiation in parentheses.",
                ));
            }
            return Ok(Expr::Unary(UnaryExpression::new(self.finish_node(start), operator, true, Box::new(argument))));
        }

        let _ = saw_unary;
        let expr = self.parse_expr_subscripts(refs)?;
        if matches!(self.kind(), TokenKind::IncDec(_)) && !self.had_line_break_before_current() {
            self.check_lval_simple(&expr, BindingKind::Outside)?;
            let operator = self.prefix_operator_text();
            self.next();
            return Ok(Expr::Update(UpdateExpression::new(self.finish_node(start), operator, false, Box::new(expr))));
        }
        Ok(expr)
    }

    fn prefix_operator_text(&self) -> &'static str {
        match self.kind() {
            TokenKind::IncDec(op) => op,
            TokenKind::Prefix(op) => op,
            TokenKind::PlusMin(op) => op,
            TokenKind::Keyword(Keyword::Typeof) => "typeof",
            TokenKind::Keyword(Keyword::Void) => "void",
            TokenKind::Keyword(Keyword::Delete) => "delete",
            _ => unreachable!("caller checked prefix flag"),
        }
    }

    fn parse_expr_subscripts(&mut self, refs: &mut DestructuringErrors) -> PResult<Expr> {
        let start = self.start_node();
        let expr = self.parse_expr_atom(refs)?;
        let had_call = matches!(expr, Expr::Member(_)); // placeholder, replaced below
        let _ = had_call;
        self.parse_subscripts(expr, start, false)
    }

    /// Member/call chains (spec §4.4): once any `?.` link appears the whole
    /// chain is wrapped in a single [`ChainExpression`] rather than each
    /// access carrying its own optionality outward.
    fn parse_subscripts(&mut self, mut base: Expr, start: u32, no_calls: bool) -> PResult<Expr> {
        let mut saw_optional = false;
        loop {
            let optional = self.eat(&TokenKind::QuestionDot);
            saw_optional |= optional;
            if optional || (!no_calls && self.at(&TokenKind::ParenL)) || self.at(&TokenKind::Dot) || self.at(&TokenKind::BracketL) {
                if self.at(&TokenKind::Dot) || (optional && !matches!(self.kind(), TokenKind::BracketL | TokenKind::ParenL)) {
                    if self.at(&TokenKind::Dot) {
                        self.next();
                    }
                    let property = self.parse_member_property_name()?;
                    base = Expr::Member(MemberExpression::new(self.finish_node(start), Box::new(base), Box::new(property), false, optional));
                    continue;
                }
                if self.at(&TokenKind::BracketL) {
                    self.next();
                    let property = self.parse_expression(false)?;
                    self.expect(&TokenKind::BracketR)?;
                    base = Expr::Member(MemberExpression::new(self.finish_node(start), Box::new(base), Box::new(property), true, optional));
                    continue;
                }
                if !no_calls && self.at(&TokenKind::ParenL) {
                    let arguments = self.parse_call_arguments()?;
                    base = Expr::Call(CallExpression::new(self.finish_node(start), Box::new(base), arguments, optional));
                    continue;
                }
            }
            if self.at(&TokenKind::BackQuote) {
                if saw_optional {
                    return Err(self.raise_fatal(self.start(), "Tagged Template Literals are not allowed in optionalChain"));
                }
                let quasi = self.parse_template(true)?;
                base = Expr::TaggedTemplate(TaggedTemplateExpression::new(self.finish_node(start), Box::new(base), quasi));
                continue;
            }
            break;
        }
        if saw_optional {
            base = Expr::Chain(ChainExpression::new(self.finish_node(start), Box::new(base)));
        }
        Ok(base)
    }

    fn parse_member_property_name(&mut self) -> PResult<Expr> {
        if matches!(self.kind(), TokenKind::PrivateId) {
            let start = self.start_node();
            let name = self.cur_str().to_string();
            self.private_names.use_name(&name, Span::new(start, self.cur_token().span.end));
            self.next();
            return Ok(Expr::PrivateIdentifier(PrivateIdentifier::new(self.finish_node(start), name)));
        }
        let id = self.parse_identifier_name()?;
        Ok(Expr::Identifier(id))
    }

    /// Accepts any identifier-shaped name, including reserved words (used
    /// after `.` and as object/class member keys, where reserved words are
    /// always legal property names).
    pub(crate) fn parse_identifier_name(&mut self) -> PResult<Identifier> {
        let start = self.start_node();
        let name = match self.kind() {
            TokenKind::Name => self.cur_str().to_string(),
            TokenKind::Keyword(kw) => kw.as_str().to_string(),
            _ => return Err(self.unexpected(None)),
        };
        self.next();
        Ok(Identifier::new(self.finish_node(start), name))
    }

    fn parse_call_arguments(&mut self) -> PResult<Vec<Argument>> {
        self.expect(&TokenKind::ParenL)?;
        let mut args = Vec::new();
        while !self.eat(&TokenKind::ParenR) {
            if !args.is_empty() {
                self.expect(&TokenKind::Comma)?;
                if self.eat(&TokenKind::ParenR) {
                    break;
                }
            }
            if self.at(&TokenKind::Ellipsis) {
                let start = self.start_node();
                self.next();
                let argument = self.parse_maybe_assign(false, None)?;
                args.push(Argument::Spread(SpreadElement::new(self.finish_node(start), Box::new(argument))));
            } else {
                args.push(Argument::Expr(self.parse_maybe_assign(false, None)?));
            }
        }
        Ok(args)
    }

    pub(crate) fn parse_expr_atom(&mut self, refs: &mut DestructuringErrors) -> PResult<Expr> {
        let start = self.start_node();
        match self.kind().clone() {
            TokenKind::Keyword(Keyword::This) => {
                self.next();
                Ok(Expr::This(ThisExpression::new(self.finish_node(start))))
            }
            TokenKind::Keyword(Keyword::Super) => {
                self.next();
                if !self.scope.allow_super() {
                    return Err(self.raise_fatal(start, "'super' keyword outside a method"));
                }
                if !matches!(self.kind(), TokenKind::Dot | TokenKind::BracketL | TokenKind::ParenL) {
                    return Err(self.unexpected(None));
                }
                if self.at(&TokenKind::ParenL) && !self.scope.allow_direct_super() {
                    return Err(self.raise_fatal(start, "super() call outside constructor of a subclass"));
                }
                Ok(Expr::Super(SuperExpr::new(self.finish_node(start))))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.next();
                Ok(Expr::Literal(self.finish_literal(start, LiteralValue::Null, "null".to_string())))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.next();
                Ok(Expr::Literal(self.finish_literal(start, LiteralValue::Bool(true), "true".to_string())))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.next();
                Ok(Expr::Literal(self.finish_literal(start, LiteralValue::Bool(false), "false".to_string())))
            }
            TokenKind::Num => {
                let raw = self.raw(self.cur_token().span).to_string();
                let value = match &self.cur.value {
                    Value::Num(n) => *n,
                    _ => 0.0,
                };
                if self.cur.bad_numeric_separator {
                    return Err(self.raise_fatal(start, "Numeric separator is not allowed here"));
                }
                if self.cur.legacy_octal && self.strict {
                    return Err(self.raise_fatal(start, "Invalid number"));
                }
                self.next();
                Ok(Expr::Literal(self.finish_literal(start, LiteralValue::Number(value), raw)))
            }
            TokenKind::BigInt => {
                let raw = self.raw(self.cur_token().span).to_string();
                let text = match &self.cur.value {
                    Value::BigInt(b) => b.to_string(),
                    _ => "0".to_string(),
                };
                if self.cur.bad_numeric_separator {
                    return Err(self.raise_fatal(start, "Numeric separator is not allowed here"));
                }
                self.next();
                let mut lit = self.finish_literal(start, LiteralValue::BigInt(text.clone()), raw);
                lit.bigint = Some(text);
                Ok(Expr::Literal(lit))
            }
            TokenKind::String => {
                let raw = self.raw(self.cur_token().span).to_string();
                let value = match &self.cur.value {
                    Value::Str(s) => s.clone(),
                    _ => String::new(),
                };
                self.next();
                Ok(Expr::Literal(self.finish_literal(start, LiteralValue::Str(value), raw)))
            }
            TokenKind::Regexp => {
                let raw = self.raw(self.cur_token().span).to_string();
                let (pattern, flags) = match &self.cur.value {
                    Value::Regex { pattern, flags } => (pattern.clone(), flags.clone()),
                    _ => (String::new(), String::new()),
                };
                self.next();
                let mut lit = self.finish_literal(start, LiteralValue::Unsupported, raw);
                lit.regex = Some(RegexMeta { pattern, flags });
                Ok(Expr::Literal(lit))
            }
            TokenKind::Name => {
                let is_async = self.is_contextual("async");
                if is_async && self.peek_is_function_without_newline() {
                    return self.parse_function_expr(true);
                }
                if is_async {
                    if let Some(arrow) = self.try_parse_async_arrow(start)? {
                        return Ok(arrow);
                    }
                }
                let id = self.parse_ident_reference()?;
                Ok(Expr::Identifier(id))
            }
            TokenKind::Keyword(Keyword::Function) => self.parse_function_expr(false),
            TokenKind::Keyword(Keyword::Class) => self.parse_class_expr(),
            TokenKind::Keyword(Keyword::New) => self.parse_new(refs),
            TokenKind::BackQuote => Ok(Expr::Template(self.parse_template(false)?)),
            TokenKind::ParenL => self.parse_paren_and_distinguish(refs),
            TokenKind::BracketL => self.parse_array_expr(refs),
            TokenKind::BraceL => self.parse_object_expr(refs),
            TokenKind::PrivateId => {
                let name = self.cur_str().to_string();
                self.next();
                Ok(Expr::PrivateIdentifier(PrivateIdentifier::new(self.finish_node(start), name)))
            }
            TokenKind::Keyword(Keyword::Import) => self.parse_import_call_or_meta(),
            _ => Err(self.unexpected(None)),
        }
    }

    fn finish_literal(&self, start: u32, value: LiteralValue, raw: String) -> Literal {
        Literal::new(self.finish_node(start), value, raw, None, None)
    }

    /// Parses a bare string-literal token (module source specifiers, export
    /// names) as a [`Literal`] node, the same shape a string atom produces.
    pub(crate) fn parse_string_literal(&mut self) -> PResult<Literal> {
        let start = self.start_node();
        if !matches!(self.kind(), TokenKind::String) {
            return Err(self.unexpected(None));
        }
        let raw = self.raw(self.cur_token().span).to_string();
        let value = self.cur_str().to_string();
        self.next();
        Ok(self.finish_literal(start, LiteralValue::Str(value), raw))
    }

    /// Distinguishes `async function` (a function expression) from `async`
    /// used as a plain identifier, without consuming anything (spec §4.3
    /// "async function same-line check" applies to declarations; this is its
    /// expression-position sibling).
    fn peek_is_function_without_newline(&mut self) -> bool {
        let save = self.save_lexer_state();
        self.next();
        let ok = self.at_keyword(Keyword::Function) && !self.had_line_break_before_current();
        self.restore_lexer_state(save);
        ok
    }

    fn parse_ident_reference(&mut self) -> PResult<Identifier> {
        let start = self.start_node();
        let name = self.cur_str().to_string();
        let span = Span::new(start, self.cur_token().span.end);
        self.check_unreserved(&name, span)?;
        self.next();
        Ok(Identifier::new(self.finish_node(start), name))
    }

    fn parse_new(&mut self, _refs: &mut DestructuringErrors) -> PResult<Expr> {
        let start = self.start_node();
        self.next(); // 'new'
        if self.at(&TokenKind::Dot) {
            self.next();
            let property = self.parse_identifier_name()?;
            if property.name != "target" {
                return Err(self.raise_recoverable(property.span().start, "The only valid meta property for new is 'new.target'"));
            }
            return Ok(Expr::Meta(MetaProperty::new(
                self.finish_node(start),
                Identifier::new(Default::default(), "new".to_string()),
                property,
            )));
        }
        let callee_start = self.start_node();
        let callee = self.parse_subscripts_no_call(callee_start)?;
        let arguments = if self.at(&TokenKind::ParenL) { self.parse_call_arguments()? } else { Vec::new() };
        Ok(Expr::New(NewExpression::new(self.finish_node(start), Box::new(callee), arguments)))
    }

    fn parse_subscripts_no_call(&mut self, start: u32) -> PResult<Expr> {
        let expr = self.parse_expr_atom(&mut DestructuringErrors::default())?;
        self.parse_subscripts(expr, start, true)
    }

    fn parse_import_call_or_meta(&mut self) -> PResult<Expr> {
        let start = self.start_node();
        self.next(); // 'import'
        if self.at(&TokenKind::Dot) {
            self.next();
            let property = self.parse_identifier_name()?;
            if property.name != "meta" {
                return Err(self.raise_recoverable(property.span().start, "The only valid meta property for import is 'import.meta'"));
            }
            return Ok(Expr::Meta(MetaProperty::new(
                self.finish_node(start),
                Identifier::new(Default::default(), "import".to_string()),
                property,
            )));
        }
        self.expect(&TokenKind::ParenL)?;
        let source = self.parse_maybe_assign(false, None)?;
        self.eat(&TokenKind::Comma);
        self.expect(&TokenKind::ParenR)?;
        Ok(Expr::Import(ImportExpression::new(self.finish_node(start), Box::new(source))))
    }

    fn parse_array_expr(&mut self, _refs: &mut DestructuringErrors) -> PResult<Expr> {
        let start = self.start_node();
        self.expect(&TokenKind::BracketL)?;
        let mut elements = Vec::new();
        while !self.eat(&TokenKind::BracketR) {
            if self.at(&TokenKind::Comma) {
                self.next();
                elements.push(None);
                continue;
            }
            if self.at(&TokenKind::Ellipsis) {
                let spread_start = self.start_node();
                self.next();
                let argument = self.parse_maybe_assign(false, None)?;
                elements.push(Some(ArrayElement::Spread(SpreadElement::new(self.finish_node(spread_start), Box::new(argument)))));
            } else {
                elements.push(Some(ArrayElement::Expr(self.parse_maybe_assign(false, None)?)));
            }
            if !self.at(&TokenKind::BracketR) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        Ok(Expr::Array(ArrayExpression::new(self.finish_node(start), elements)))
    }

    /// Also enforces the `__proto__`-duplicate early error (spec §4.4,
    /// `DestructuringErrors.double_proto`): a `key: value` property (not a
    /// method, not computed, not shorthand) literally named `__proto__`
    /// appearing twice in one object literal is a Syntax Error, independent
    /// of whether the literal is later reinterpreted as a binding pattern.
    fn parse_object_expr(&mut self, refs: &mut DestructuringErrors) -> PResult<Expr> {
        let start = self.start_node();
        self.expect(&TokenKind::BraceL)?;
        let mut properties = Vec::new();
        let mut seen_proto = false;
        while !self.eat(&TokenKind::BraceR) {
            if !properties.is_empty() {
                self.expect(&TokenKind::Comma)?;
                if self.eat(&TokenKind::BraceR) {
                    break;
                }
            }
            if self.at(&TokenKind::Ellipsis) {
                let spread_start = self.start_node();
                self.next();
                let argument = self.parse_maybe_assign(false, None)?;
                properties.push(ObjectMember::Spread(SpreadElement::new(self.finish_node(spread_start), Box::new(argument))));
                continue;
            }
            let prop = self.parse_object_property()?;
            if prop.kind == "init" && !prop.method && !prop.computed && !prop.shorthand {
                if let Some(key_span) = proto_key_span(&prop.key) {
                    if seen_proto && refs.double_proto.is_none() {
                        refs.double_proto = Some(key_span.start);
                    }
                    seen_proto = true;
                }
            }
            properties.push(ObjectMember::Property(prop));
        }
        if let Some(pos) = refs.double_proto.take() {
            return Err(self.raise_recoverable(pos, "Redefinition of __proto__ property"));
        }
        Ok(Expr::Object(ObjectExpression::new(self.finish_node(start), properties)))
    }

    fn parse_object_property(&mut self) -> PResult<ObjectProperty> {
        let start = self.start_node();
        let is_async = self.is_contextual("async") && self.peek_is_property_key_start();
        let generator = if is_async {
            self.next();
            self.eat(&TokenKind::Star)
        } else {
            self.eat(&TokenKind::Star)
        };
        let is_getter = !is_async && !generator && self.is_contextual("get") && self.peek_is_property_key_start();
        let is_setter = !is_async && !generator && self.is_contextual("set") && self.peek_is_property_key_start();
        if is_getter || is_setter {
            self.next();
        }
        let (key, computed) = self.parse_property_key()?;
        if is_getter || is_setter {
            let value = self.parse_method_body(false, false)?;
            self.check_getter_setter_params(is_getter, &value.params, value.span().start)?;
            return Ok(ObjectProperty::new(
                self.finish_node(start),
                key,
                Box::new(Expr::Function(value)),
                if is_getter { "get" } else { "set" },
                false,
                false,
                computed,
            ));
        }
        if self.at(&TokenKind::ParenL) {
            let value = self.parse_method_body(generator, is_async)?;
            return Ok(ObjectProperty::new(self.finish_node(start), key, Box::new(Expr::Function(value)), "init", true, false, computed));
        }
        if self.eat(&TokenKind::Colon) {
            let value = self.parse_maybe_assign(false, None)?;
            return Ok(ObjectProperty::new(self.finish_node(start), key, Box::new(value), "init", false, false, computed));
        }
        // shorthand { x } or { x = default } (the latter only legal inside a
        // pattern; `to_assignable` validates that when this expression is
        // later reinterpreted as a destructuring target).
        let ident = match &key {
            PropertyKey::Identifier(id) => id.clone(),
            _ => return Err(self.unexpected(None)),
        };
        if self.eat(&TokenKind::Eq) {
            let default_value = self.parse_maybe_assign(false, None)?;
            let left_span = ident.span();
            let assignment = Expr::Assignment(AssignmentExpression::new(
                self.finish_node(start),
                "=".to_string(),
                Box::new(Pat::Identifier(ident)),
                Box::new(default_value),
            ));
            let _ = left_span;
            return Ok(ObjectProperty::new(self.finish_node(start), key, Box::new(assignment), "init", false, true, false));
        }
        Ok(ObjectProperty::new(self.finish_node(start), key.clone(), Box::new(Expr::Identifier(ident)), "init", false, true, false))
    }

    fn peek_is_property_key_start(&mut self) -> bool {
        let save = self.save_lexer_state();
        self.next();
        let ok = !matches!(self.kind(), TokenKind::Comma | TokenKind::Colon | TokenKind::ParenR | TokenKind::BraceR | TokenKind::Eq);
        self.restore_lexer_state(save);
        ok
    }

    pub(crate) fn parse_property_key(&mut self) -> PResult<(PropertyKey, bool)> {
        if self.eat(&TokenKind::BracketL) {
            let expr = self.parse_maybe_assign(false, None)?;
            self.expect(&TokenKind::BracketR)?;
            return Ok((PropertyKey::Expr(Box::new(expr)), true));
        }
        if matches!(self.kind(), TokenKind::PrivateId) {
            let start = self.start_node();
            let name = self.cur_str().to_string();
            self.next();
            return Ok((PropertyKey::PrivateIdentifier(PrivateIdentifier::new(self.finish_node(start), name)), false));
        }
        if matches!(self.kind(), TokenKind::String) {
            let start = self.start_node();
            let raw = self.raw(self.cur_token().span).to_string();
            let value = self.cur_str().to_string();
            self.next();
            return Ok((PropertyKey::Literal(self.finish_literal(start, LiteralValue::Str(value), raw)), false));
        }
        if matches!(self.kind(), TokenKind::Num) {
            let start = self.start_node();
            let raw = self.raw(self.cur_token().span).to_string();
            let value = match &self.cur.value {
                Value::Num(n) => *n,
                _ => 0.0,
            };
            if self.cur.bad_numeric_separator {
                return Err(self.raise_fatal(start, "Numeric separator is not allowed here"));
            }
            self.next();
            return Ok((PropertyKey::Literal(self.finish_literal(start, LiteralValue::Number(value), raw)), false));
        }
        Ok((PropertyKey::Identifier(self.parse_identifier_name()?), false))
    }

    /// `()`/`(...)` cover grammar (spec §9 "`parseParenAndDistinguishExpression`"):
    /// parses a comma-separated list; if `=>` follows, the caller
    /// (`try_parse_arrow_from`) reinterprets every element as a binding
    /// pattern, otherwise it is a parenthesized (possibly sequence)
    /// expression.
    fn parse_paren_and_distinguish(&mut self, _refs: &mut DestructuringErrors) -> PResult<Expr> {
        let start = self.start_node();
        self.expect(&TokenKind::ParenL)?;
        let mut elements = Vec::new();
        while !self.at(&TokenKind::ParenR) {
            if self.at(&TokenKind::Ellipsis) {
                let rest_start = self.start_node();
                self.next();
                let argument = self.parse_maybe_assign(false, None)?;
                elements.push(Expr::Spread(SpreadElement::new(self.finish_node(rest_start), Box::new(argument))));
            } else {
                elements.push(self.parse_maybe_assign(false, None)?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::ParenR)?;

        if elements.len() == 1 && !matches!(elements[0], Expr::Spread(_)) {
            let inner = elements.into_iter().next().unwrap();
            if self.opts.preserve_parens {
                return Ok(Expr::Paren(ParenthesizedExpression::new(self.finish_node(start), Box::new(inner))));
            }
            return Ok(inner);
        }
        if elements.iter().any(|e| matches!(e, Expr::Spread(_))) && !self.at(&TokenKind::Arrow) {
            return Err(self.raise_fatal(start, "Unexpected token"));
        }
        Ok(Expr::Sequence(SequenceExpression::new(self.finish_node(start), elements)))
    }

    pub(crate) fn parse_template(&mut self, is_tagged: bool) -> PResult<TemplateLiteral> {
        let start = self.start_node();
        self.expect(&TokenKind::BackQuote)?;
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let el_start = self.start_node();
            let (raw, cooked, invalid) = self.read_template_chunk();
            let tail = !matches!(self.kind(), TokenKind::DollarBraceL);
            if invalid && !is_tagged {
                return Err(self.raise_fatal(el_start, "Invalid escape sequence in template"));
            }
            self.next();
            quasis.push(TemplateElement::new(
                self.finish_node(el_start),
                tail,
                TemplateElementValue { cooked: if invalid { None } else { Some(cooked) }, raw },
            ));
            if tail {
                break;
            }
            expressions.push(self.parse_expression(false)?);
            self.expect(&TokenKind::BraceR)?;
        }
        Ok(TemplateLiteral::new(self.finish_node(start), quasis, expressions))
    }

    /// The template chunk itself was already decoded by the lexer into the
    /// current token's value; this just extracts it in the shape the AST
    /// wants. Kept distinct from `next()` because a template chunk's raw
    /// text (unlike every other token) keeps its escapes un-decoded.
    fn read_template_chunk(&self) -> (String, String, bool) {
        let raw = self.raw(Span::new(self.cur_token().span.start, self.cur_token().span.end)).to_string();
        let cooked = match &self.cur.value {
            Value::Str(s) => s.clone(),
            _ => raw.clone(),
        };
        (raw, cooked, self.cur.invalid_escape)
    }

    pub(crate) fn parse_function_expr(&mut self, leading_async: bool) -> PResult<Expr> {
        let start = self.start_node();
        if leading_async {
            self.next(); // 'async'
        }
        self.expect(&TokenKind::Keyword(Keyword::Function))?;
        let generator = self.eat(&TokenKind::Star);
        let id = if matches!(self.kind(), TokenKind::Name) && !self.at(&TokenKind::ParenL) {
            Some(self.parse_binding_identifier()?)
        } else {
            None
        };
        let (params, body) = self.parse_function_rest(generator, leading_async)?;
        Ok(Expr::Function(FunctionExpression::new(self.finish_node(start), id, params, body, generator, leading_async)))
    }

    pub(crate) fn parse_method_body(&mut self, generator: bool, is_async: bool) -> PResult<FunctionExpression> {
        let start = self.start_node();
        let (params, body) = self.parse_function_rest(generator, is_async)?;
        Ok(FunctionExpression::new(self.finish_node(start), None, params, body, generator, is_async))
    }

    fn parse_function_rest(&mut self, generator: bool, is_async: bool) -> PResult<(Vec<Pat>, BlockStatement)> {
        let flags = ScopeFlags::FUNCTION
            | ScopeFlags::VAR
            | if generator { ScopeFlags::GENERATOR } else { ScopeFlags::empty() }
            | if is_async { ScopeFlags::ASYNC } else { ScopeFlags::empty() };
        self.scope.push(flags);
        let params = self.parse_function_params()?;
        for p in &params {
            self.declare_pattern_bindings(p, BindingKind::Var)?;
        }
        let body = self.parse_function_body_block()?;
        self.scope.pop();
        if super::statements::body_declares_use_strict(&body) && !super::statements::has_simple_parameter_list(&params) {
            return Err(self.raise_fatal(
                self.prev_start(),
                "Illegal 'use strict' directive in function with non-simple parameter list",
            ));
        }
        Ok((params, body))
    }

    pub(crate) fn parse_function_params(&mut self) -> PResult<Vec<Pat>> {
        self.expect(&TokenKind::ParenL)?;
        let mut params = Vec::new();
        while !self.eat(&TokenKind::ParenR) {
            if !params.is_empty() {
                self.expect(&TokenKind::Comma)?;
                if self.eat(&TokenKind::ParenR) {
                    break;
                }
            }
            params.push(self.parse_binding_pattern_with_default()?);
        }
        Ok(params)
    }
}

/// The span of a property key's text when that key is literally named
/// `__proto__` (identifier or string-literal form); `None` for every other
/// key shape, including computed and private-name keys.
fn proto_key_span(key: &PropertyKey) -> Option<Span> {
    match key {
        PropertyKey::Identifier(id) if id.name == "__proto__" => Some(id.span()),
        PropertyKey::Literal(lit) => match &lit.value {
            LiteralValue::Str(s) if s == "__proto__" => Some(lit.span()),
            _ => None,
        },
        _ => None,
    }
}
