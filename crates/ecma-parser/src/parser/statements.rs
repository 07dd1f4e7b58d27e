//! The statement parser (spec §4.3) and the top-level program driver.

use ecma_common::{Keyword, Span, TokenKind};

use crate::ast::*;
use crate::scope::{BindingKind, ScopeFlags};

use super::{DestructuringErrors, Label, LabelKind, PResult, Parser};

impl<'src> Parser<'src> {
    pub fn parse_program(&mut self) -> PResult<Program> {
        let start = self.start_node();
        let mut body = Vec::new();
        self.parse_directive_prologue(&mut body)?;
        while !self.at(&TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }
        self.finish_undefined_exports()?;
        let source_type = if self.opts.is_module() { "module" } else { "script" };
        let hashbang = self.hashbang.clone();
        Ok(Program::new(self.finish_node(start), source_type, hashbang, body))
    }

    pub(crate) fn parse_statement(&mut self) -> PResult<Stmt> {
        match self.kind().clone() {
            TokenKind::Keyword(Keyword::Break) => self.parse_break_continue(true),
            TokenKind::Keyword(Keyword::Continue) => self.parse_break_continue(false),
            TokenKind::Keyword(Keyword::Debugger) => self.parse_debugger(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::Function) => self.parse_function_statement(false),
            TokenKind::Keyword(Keyword::Class) => self.parse_class_statement(),
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            TokenKind::Keyword(Keyword::Switch) => self.parse_switch(),
            TokenKind::Keyword(Keyword::Throw) => self.parse_throw(),
            TokenKind::Keyword(Keyword::Try) => self.parse_try(),
            TokenKind::Keyword(Keyword::Var) => self.parse_var_statement("var"),
            TokenKind::Keyword(Keyword::Const) => self.parse_var_statement("const"),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::With) => self.parse_with(),
            TokenKind::BraceL => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Semi => {
                let start = self.start_node();
                self.next();
                Ok(Stmt::Empty(EmptyStatement::new(self.finish_node(start))))
            }
            TokenKind::Keyword(Keyword::Import) => self.parse_import_declaration(),
            TokenKind::Keyword(Keyword::Export) => self.parse_export_declaration(),
            _ => self.parse_statement_fallback(),
        }
    }

    fn parse_statement_fallback(&mut self) -> PResult<Stmt> {
        if self.is_contextual("let") && self.let_starts_declaration() {
            return self.parse_var_statement("let");
        }
        if self.is_contextual("async") && self.peek_is_function_statement_without_newline() {
            return self.parse_function_statement(true);
        }
        self.parse_expression_statement()
    }

    /// `let` only starts a declaration when followed by something that can
    /// open a binding pattern; otherwise it is a plain identifier (spec
    /// §4.3: "`let` is a statement keyword only if followed by...").
    fn let_starts_declaration(&mut self) -> bool {
        let save = self.save_lexer_state();
        self.next();
        let ok = matches!(self.kind(), TokenKind::Name | TokenKind::BraceL | TokenKind::BracketL)
            || self.at_keyword(Keyword::Let);
        self.restore_lexer_state(save);
        ok
    }

    fn peek_is_function_statement_without_newline(&mut self) -> bool {
        let save = self.save_lexer_state();
        self.next();
        let ok = self.at_keyword(Keyword::Function) && !self.had_line_break_before_current();
        self.restore_lexer_state(save);
        ok
    }

    fn parse_expression_statement(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        let expr = self.parse_expression(false)?;
        if let Expr::Identifier(id) = &expr {
            if self.at(&TokenKind::Colon) {
                let name = id.name.clone();
                let span = id.span();
                self.next();
                self.push_label(&name, span)?;
                let body = Box::new(self.parse_statement()?);
                self.pop_label();
                return Ok(Stmt::Labeled(LabeledStatement::new(self.finish_node(start), id.clone(), body)));
            }
        }
        let directive = directive_text(&expr);
        self.semicolon()?;
        Ok(Stmt::Expression(ExpressionStatement::new(self.finish_node(start), Box::new(expr), directive)))
    }

    /// Scans the leading run of bare string-literal expression statements
    /// (spec §4.3 "strict-mode detection"), flipping `self.strict` the
    /// instant `"use strict"` is seen so later directives and the rest of
    /// the body are parsed under it.
    fn parse_directive_prologue(&mut self, body: &mut Vec<Stmt>) -> PResult<()> {
        loop {
            if !matches!(self.kind(), TokenKind::String) {
                break;
            }
            let save = self.save_lexer_state();
            let start = self.start_node();
            let raw = self.raw(self.cur_token().span).to_string();
            let lit_expr = self.parse_expr_atom(&mut DestructuringErrors::default())?;
            if !matches!(lit_expr, Expr::Literal(_)) || !(self.at(&TokenKind::Semi) || self.can_insert_semicolon()) {
                self.restore_lexer_state(save);
                break;
            }
            self.semicolon()?;
            let text = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("").to_string();
            if text == "use strict" {
                self.strict = true;
            }
            body.push(Stmt::Expression(ExpressionStatement::new(self.finish_node(start), Box::new(lit_expr), Some(text))));
        }
        Ok(())
    }

    fn parse_block_body(&mut self, check_directives: bool) -> PResult<Vec<Stmt>> {
        let mut body = Vec::new();
        if check_directives {
            self.parse_directive_prologue(&mut body)?;
        }
        while !self.at(&TokenKind::BraceR) && !self.at(&TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    pub(crate) fn parse_block(&mut self) -> PResult<BlockStatement> {
        let start = self.start_node();
        self.expect(&TokenKind::BraceL)?;
        let body = self.parse_block_body(false)?;
        self.expect(&TokenKind::BraceR)?;
        Ok(BlockStatement::new(self.finish_node(start), body))
    }

    pub(crate) fn parse_function_body_block(&mut self) -> PResult<BlockStatement> {
        let start = self.start_node();
        self.expect(&TokenKind::BraceL)?;
        let outer_strict = self.strict;
        let body = self.parse_block_body(true)?;
        self.expect(&TokenKind::BraceR)?;
        self.strict = outer_strict;
        Ok(BlockStatement::new(self.finish_node(start), body))
    }

    // ---- labels / loop+switch context ------------------------------------

    fn push_label(&mut self, name: &str, span: Span) -> PResult<LabelKind> {
        if self.labels.iter().any(|l| l.name.as_deref() == Some(name)) {
            return Err(self.raise_fatal(span.start, format!("Label '{name}' is already declared")));
        }
        let kind = if matches!(
            self.kind(),
            TokenKind::Keyword(Keyword::For) | TokenKind::Keyword(Keyword::While) | TokenKind::Keyword(Keyword::Do)
        ) {
            LabelKind::Loop
        } else {
            LabelKind::Other
        };
        self.labels.push(Label { kind, name: Some(name.to_string()), statement_start: span.start });
        Ok(kind)
    }

    fn pop_label(&mut self) {
        self.labels.pop();
    }

    fn parse_break_continue(&mut self, is_break: bool) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        let mut label = None;
        if !self.can_insert_semicolon() && matches!(self.kind(), TokenKind::Name) {
            label = Some(self.parse_bare_identifier()?);
        }
        self.semicolon()?;
        if let Some(lbl) = &label {
            if !self.labels.iter().any(|l| l.name.as_deref() == Some(lbl.name.as_str())) {
                return Err(self.raise_fatal(lbl.span().start, format!("Undefined label '{}'", lbl.name)));
            }
            if !is_break {
                let is_loop_label = self.labels.iter().any(|l| l.name.as_deref() == Some(lbl.name.as_str()) && l.kind == LabelKind::Loop);
                if !is_loop_label {
                    return Err(self.raise_fatal(lbl.span().start, format!("Illegal continue statement: '{}' does not denote an iteration statement", lbl.name)));
                }
            }
        } else if is_break {
            if self.loop_depth == 0 && self.switch_depth == 0 {
                return Err(self.raise_fatal(start, "Illegal break statement"));
            }
        } else if self.loop_depth == 0 {
            return Err(self.raise_fatal(start, "Illegal continue statement"));
        }
        let meta = self.finish_node(start);
        Ok(if is_break { Stmt::Break(BreakStatement::new(meta, label)) } else { Stmt::Continue(ContinueStatement::new(meta, label)) })
    }

    fn parse_bare_identifier(&mut self) -> PResult<Identifier> {
        let start = self.start_node();
        let name = self.cur_str().to_string();
        self.next();
        Ok(Identifier::new(self.finish_node(start), name))
    }

    fn parse_debugger(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        self.semicolon()?;
        Ok(Stmt::Debugger(DebuggerStatement::new(self.finish_node(start))))
    }

    fn parse_with(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        if self.strict {
            return Err(self.raise_recoverable(start, "'with' in strict mode"));
        }
        self.next();
        self.expect(&TokenKind::ParenL)?;
        let object = self.parse_expression(false)?;
        self.expect(&TokenKind::ParenR)?;
        let body = self.parse_statement()?;
        Ok(Stmt::With(WithStatement::new(self.finish_node(start), Box::new(object), Box::new(body))))
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        self.expect(&TokenKind::ParenL)?;
        let test = self.parse_expression(false)?;
        self.expect(&TokenKind::ParenR)?;
        let consequent = Box::new(self.parse_if_clause()?);
        let alternate = if self.eat_keyword(Keyword::Else) { Some(Box::new(self.parse_if_clause()?)) } else { None };
        Ok(Stmt::If(IfStatement::new(self.finish_node(start), Box::new(test), consequent, alternate)))
    }

    /// Function declarations directly in an `if`/`else` branch are an
    /// Annex B legacy extension; accepted here the way acorn's default
    /// config does (as a plain function declaration, sloppy mode only).
    fn parse_if_clause(&mut self) -> PResult<Stmt> {
        if self.at_keyword(Keyword::Function) && !self.strict {
            return self.parse_function_statement(false);
        }
        self.parse_statement()
    }

    fn parse_return(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        if !self.scope.in_function() && !self.opts.allow_return_outside_function {
            return Err(self.raise_fatal(start, "'return' outside of function"));
        }
        self.next();
        let argument = if self.can_insert_semicolon() || matches!(self.kind(), TokenKind::Semi) {
            None
        } else {
            Some(Box::new(self.parse_expression(false)?))
        };
        self.semicolon()?;
        Ok(Stmt::Return(ReturnStatement::new(self.finish_node(start), argument)))
    }

    fn parse_throw(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        if self.had_line_break_before_current() {
            return Err(self.raise_fatal(start, "Illegal newline after throw"));
        }
        let argument = self.parse_expression(false)?;
        self.semicolon()?;
        Ok(Stmt::Throw(ThrowStatement::new(self.finish_node(start), Box::new(argument))))
    }

    fn parse_while(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        self.expect(&TokenKind::ParenL)?;
        let test = self.parse_expression(false)?;
        self.expect(&TokenKind::ParenR)?;
        self.loop_depth += 1;
        let body = self.parse_statement();
        self.loop_depth -= 1;
        Ok(Stmt::While(WhileStatement::new(self.finish_node(start), Box::new(test), Box::new(body?))))
    }

    fn parse_do_while(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        self.loop_depth += 1;
        let body = self.parse_statement();
        self.loop_depth -= 1;
        let body = body?;
        self.expect(&TokenKind::Keyword(Keyword::While))?;
        self.expect(&TokenKind::ParenL)?;
        let test = self.parse_expression(false)?;
        self.expect(&TokenKind::ParenR)?;
        self.eat(&TokenKind::Semi);
        Ok(Stmt::DoWhile(DoWhileStatement::new(self.finish_node(start), Box::new(body), Box::new(test))))
    }

    fn parse_switch(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        self.expect(&TokenKind::ParenL)?;
        let discriminant = self.parse_expression(false)?;
        self.expect(&TokenKind::ParenR)?;
        self.expect(&TokenKind::BraceL)?;
        self.scope.push(ScopeFlags::empty());
        self.switch_depth += 1;
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.eat(&TokenKind::BraceR) {
            let case_start = self.start_node();
            let test = if self.eat_keyword(Keyword::Case) {
                Some(Box::new(self.parse_expression(false)?))
            } else {
                self.expect(&TokenKind::Keyword(Keyword::Default))?;
                if seen_default {
                    return Err(self.raise_fatal(case_start, "Multiple default clauses"));
                }
                seen_default = true;
                None
            };
            self.expect(&TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(self.kind(), TokenKind::Keyword(Keyword::Case) | TokenKind::Keyword(Keyword::Default) | TokenKind::BraceR) {
                consequent.push(self.parse_statement()?);
            }
            cases.push(SwitchCase::new(self.finish_node(case_start), test, consequent));
        }
        self.switch_depth -= 1;
        self.scope.pop();
        Ok(Stmt::Switch(SwitchStatement::new(self.finish_node(start), Box::new(discriminant), cases)))
    }

    fn parse_try(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        let block = self.parse_block()?;
        let handler = if self.eat_keyword(Keyword::Catch) {
            let catch_start = self.start_node();
            let param = if self.eat(&TokenKind::ParenL) {
                self.scope.push(ScopeFlags::SIMPLE_CATCH);
                let pat = self.parse_binding_pattern()?;
                let is_simple = matches!(pat, Pat::Identifier(_));
                self.declare_pattern_bindings(&pat, if is_simple { BindingKind::SimpleCatch } else { BindingKind::Lexical })?;
                self.expect(&TokenKind::ParenR)?;
                Some(pat)
            } else {
                None
            };
            let body = self.parse_block()?;
            if param.is_some() {
                self.scope.pop();
            }
            Some(CatchClause::new(self.finish_node(catch_start), param, body))
        } else {
            None
        };
        let finalizer = if self.eat_keyword(Keyword::Finally) { Some(self.parse_block()?) } else { None };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.raise_fatal(start, "Missing catch or finally after try"));
        }
        Ok(Stmt::Try(TryStatement::new(self.finish_node(start), block, handler, finalizer)))
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        let is_await = self.scope.can_await() && self.eat_keyword(Keyword::Await);
        self.expect(&TokenKind::ParenL)?;
        self.scope.push(ScopeFlags::empty());

        if self.at(&TokenKind::Semi) {
            return self.parse_for_rest(start, None, is_await);
        }

        let starts_declaration = matches!(self.kind(), TokenKind::Keyword(Keyword::Var) | TokenKind::Keyword(Keyword::Const))
            || (self.is_contextual("let") && self.let_starts_declaration());
        if starts_declaration {
            let kind = match self.kind() {
                TokenKind::Keyword(Keyword::Var) => "var",
                TokenKind::Keyword(Keyword::Const) => "const",
                _ => "let",
            };
            let decl_start = self.start_node();
            self.next();
            let first_id = self.parse_binding_pattern()?;
            if matches!(self.kind(), TokenKind::Keyword(Keyword::In)) || self.is_contextual("of") {
                let is_of = self.is_contextual("of");
                self.declare_for_head_binding(&first_id, kind)?;
                self.next();
                let right = if is_of { self.parse_maybe_assign(false, None)? } else { self.parse_expression(false)? };
                self.expect(&TokenKind::ParenR)?;
                let var_decl = VariableDeclaration::new(
                    self.finish_node(decl_start),
                    kind,
                    vec![VariableDeclarator::new(self.finish_node(decl_start), first_id, None)],
                );
                return self.parse_for_in_of_body(start, ForHead::Var(var_decl), right, is_of, is_await);
            }
            let mut declarators = vec![self.parse_var_declarator_rest(decl_start, first_id, kind)?];
            while self.eat(&TokenKind::Comma) {
                declarators.push(self.parse_var_declarator(kind)?);
            }
            let var_decl = VariableDeclaration::new(self.finish_node(decl_start), kind, declarators);
            self.expect(&TokenKind::Semi)?;
            return self.parse_for_rest(start, Some(ForInit::Var(var_decl)), is_await);
        }

        let init_expr = self.parse_expression(true)?;
        if matches!(self.kind(), TokenKind::Keyword(Keyword::In)) || self.is_contextual("of") {
            let is_of = self.is_contextual("of");
            let pattern = self.to_assignable(init_expr, false)?;
            self.next();
            let right = if is_of { self.parse_maybe_assign(false, None)? } else { self.parse_expression(false)? };
            self.expect(&TokenKind::ParenR)?;
            return self.parse_for_in_of_body(start, ForHead::Pat(Box::new(pattern)), right, is_of, is_await);
        }
        self.expect(&TokenKind::Semi)?;
        self.parse_for_rest(start, Some(ForInit::Expr(Box::new(init_expr))), is_await)
    }

    fn declare_for_head_binding(&mut self, pat: &Pat, kind: &str) -> PResult<()> {
        let binding_kind = match kind {
            "var" => BindingKind::Var,
            _ => BindingKind::Lexical,
        };
        self.declare_pattern_bindings(pat, binding_kind)
    }

    fn parse_for_in_of_body(&mut self, start: u32, left: ForHead, right: Expr, is_of: bool, is_await: bool) -> PResult<Stmt> {
        self.loop_depth += 1;
        let body = self.parse_statement();
        self.loop_depth -= 1;
        let body = Box::new(body?);
        self.scope.pop();
        let meta = self.finish_node(start);
        Ok(if is_of {
            Stmt::ForOf(ForOfStatement::new(meta, left, Box::new(right), body, is_await))
        } else {
            Stmt::ForIn(ForInStatement::new(meta, left, Box::new(right), body))
        })
    }

    fn parse_for_rest(&mut self, start: u32, init: Option<ForInit>, is_await: bool) -> PResult<Stmt> {
        if is_await {
            return Err(self.raise_fatal(start, "for-await-of loop requires an 'of' clause"));
        }
        self.expect(&TokenKind::Semi)?;
        let test = if self.at(&TokenKind::Semi) { None } else { Some(Box::new(self.parse_expression(false)?)) };
        self.expect(&TokenKind::Semi)?;
        let update = if self.at(&TokenKind::ParenR) { None } else { Some(Box::new(self.parse_expression(false)?)) };
        self.expect(&TokenKind::ParenR)?;
        self.loop_depth += 1;
        let body = self.parse_statement();
        self.loop_depth -= 1;
        let body = Box::new(body?);
        self.scope.pop();
        Ok(Stmt::For(ForStatement::new(self.finish_node(start), init, test, update, body)))
    }

    // ---- declarations ------------------------------------------------

    pub(crate) fn parse_var_statement(&mut self, kind: &'static str) -> PResult<Stmt> {
        let start = self.start_node();
        self.next();
        let mut declarators = vec![self.parse_var_declarator(kind)?];
        while self.eat(&TokenKind::Comma) {
            declarators.push(self.parse_var_declarator(kind)?);
        }
        self.semicolon()?;
        Ok(Stmt::VariableDeclaration(VariableDeclaration::new(self.finish_node(start), kind, declarators)))
    }

    fn parse_var_declarator(&mut self, kind: &str) -> PResult<VariableDeclarator> {
        let start = self.start_node();
        let id = self.parse_binding_pattern()?;
        self.parse_var_declarator_rest(start, id, kind)
    }

    fn parse_var_declarator_rest(&mut self, start: u32, id: Pat, kind: &str) -> PResult<VariableDeclarator> {
        let binding_kind = match kind {
            "var" => BindingKind::Var,
            _ => BindingKind::Lexical,
        };
        self.declare_pattern_bindings(&id, binding_kind)?;
        let init = if self.eat(&TokenKind::Eq) {
            Some(Box::new(self.parse_maybe_assign(false, None)?))
        } else if kind == "const" && !matches!(id, Pat::Identifier(_)) {
            return Err(self.unexpected(None));
        } else if !matches!(id, Pat::Identifier(_)) {
            return Err(self.raise_fatal(start, "Missing initializer in destructuring declaration"));
        } else if kind == "const" {
            return Err(self.raise_fatal(start, "Missing initializer in const declaration"));
        } else {
            None
        };
        Ok(VariableDeclarator::new(self.finish_node(start), id, init))
    }

    pub(crate) fn parse_function_statement(&mut self, leading_async: bool) -> PResult<Stmt> {
        let start = self.start_node();
        if leading_async {
            self.next();
        }
        self.next(); // 'function'
        let generator = self.eat(&TokenKind::Star);
        let id = self.parse_binding_identifier()?;
        self.declare_pattern_bindings(&Pat::Identifier(id.clone()), BindingKind::Function)?;
        let (params, body) = self.parse_function_rest_pub(generator, leading_async)?;
        Ok(Stmt::FunctionDeclaration(FunctionDeclaration::new(self.finish_node(start), Some(id), params, body, generator, leading_async)))
    }

    fn parse_function_rest_pub(&mut self, generator: bool, is_async: bool) -> PResult<(Vec<Pat>, BlockStatement)> {
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
        if body_declares_use_strict(&body) && !has_simple_parameter_list(&params) {
            return Err(self.raise_fatal(
                self.prev_start(),
                "Illegal 'use strict' directive in function with non-simple parameter list",
            ));
        }
        Ok((params, body))
    }

    pub(crate) fn parse_binding_identifier(&mut self) -> PResult<Identifier> {
        let start = self.start_node();
        let name = match self.kind() {
            TokenKind::Name => self.cur_str().to_string(),
            _ => return Err(self.unexpected(None)),
        };
        let span = Span::new(start, self.cur_token().span.end);
        self.check_unreserved(&name, span)?;
        self.next();
        Ok(Identifier::new(self.finish_node(start), name))
    }

    pub(crate) fn parse_binding_pattern(&mut self) -> PResult<Pat> {
        match self.kind().clone() {
            TokenKind::BracketL => self.parse_array_binding_pattern(),
            TokenKind::BraceL => self.parse_object_binding_pattern(),
            _ => Ok(Pat::Identifier(self.parse_binding_identifier()?)),
        }
    }

    pub(crate) fn parse_binding_pattern_with_default(&mut self) -> PResult<Pat> {
        let start = self.start_node();
        let pat = self.parse_binding_pattern()?;
        if self.eat(&TokenKind::Eq) {
            let default_value = Box::new(self.parse_maybe_assign(false, None)?);
            return Ok(Pat::Assignment(AssignmentPattern::new(self.finish_node(start), Box::new(pat), default_value)));
        }
        Ok(pat)
    }

    fn parse_array_binding_pattern(&mut self) -> PResult<Pat> {
        let start = self.start_node();
        self.expect(&TokenKind::BracketL)?;
        let mut elements = Vec::new();
        while !self.eat(&TokenKind::BracketR) {
            if self.at(&TokenKind::Comma) {
                self.next();
                elements.push(None);
                continue;
            }
            if self.eat(&TokenKind::Ellipsis) {
                let rest_start = self.start_node();
                let argument = Box::new(self.parse_binding_pattern()?);
                elements.push(Some(Pat::Rest(RestElement::new(self.finish_node(rest_start), argument))));
            } else {
                elements.push(Some(self.parse_binding_pattern_with_default()?));
            }
            if !self.at(&TokenKind::BracketR) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        Ok(Pat::Array(ArrayPattern::new(self.finish_node(start), elements)))
    }

    fn parse_object_binding_pattern(&mut self) -> PResult<Pat> {
        let start = self.start_node();
        self.expect(&TokenKind::BraceL)?;
        let mut properties = Vec::new();
        while !self.eat(&TokenKind::BraceR) {
            if !properties.is_empty() {
                self.expect(&TokenKind::Comma)?;
                if self.eat(&TokenKind::BraceR) {
                    break;
                }
            }
            if self.eat(&TokenKind::Ellipsis) {
                let rest_start = self.start_node();
                let argument = Box::new(Pat::Identifier(self.parse_binding_identifier()?));
                properties.push(ObjectPatternProp::Rest(RestElement::new(self.finish_node(rest_start), argument)));
                continue;
            }
            let prop_start = self.start_node();
            let (key, computed) = self.parse_property_key()?;
            let (value, shorthand) = if self.eat(&TokenKind::Colon) {
                (self.parse_binding_pattern_with_default()?, false)
            } else {
                let ident = match &key {
                    PropertyKey::Identifier(id) => id.clone(),
                    _ => return Err(self.unexpected(None)),
                };
                if self.eat(&TokenKind::Eq) {
                    let default_value = Box::new(self.parse_maybe_assign(false, None)?);
                    (Pat::Assignment(AssignmentPattern::new(self.finish_node(prop_start), Box::new(Pat::Identifier(ident)), default_value)), true)
                } else {
                    (Pat::Identifier(ident), true)
                }
            };
            properties.push(ObjectPatternProp::Property(PatternProperty::new(
                self.finish_node(prop_start),
                key,
                Box::new(value),
                computed,
                shorthand,
                "init",
            )));
        }
        Ok(Pat::Object(ObjectPattern::new(self.finish_node(start), properties)))
    }
}

fn directive_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Literal(lit) if matches!(lit.value, LiteralValue::Str(_)) => {
            lit.raw.get(1..lit.raw.len().saturating_sub(1)).map(|s| s.to_string())
        }
        _ => None,
    }
}

pub(crate) fn body_declares_use_strict(body: &BlockStatement) -> bool {
    body.body.iter().any(|stmt| matches!(stmt, Stmt::Expression(e) if e.directive.as_deref() == Some("use strict")))
}

pub(crate) fn has_simple_parameter_list(params: &[Pat]) -> bool {
    params.iter().all(|p| matches!(p, Pat::Identifier(_)))
}
