//! Class body parser (spec §4.4 "Class bodies"): methods, fields, static
//! blocks, and the private-name frame each class body pushes and pops.

use ecma_common::{Keyword, ParseError, TokenKind};

use crate::ast::*;
use crate::private_names::PrivateKind;
use crate::scope::ScopeFlags;

use super::{DestructuringErrors, PResult, Parser};

impl<'src> Parser<'src> {
    pub(crate) fn parse_class_statement(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next(); // 'class'
        let id = self.parse_binding_identifier()?;
        self.declare_pattern_bindings(&Pat::Identifier(id.clone()), crate::scope::BindingKind::Lexical)?;
        let (super_class, body) = self.parse_class_tail()?;
        Ok(Stmt::ClassDeclaration(ClassDeclaration::new(self.finish_node(start), Some(id), super_class, body)))
    }

    pub(crate) fn parse_class_expr(&mut self) -> PResult<Expr> {
        let start = self.start_node();
        self.next(); // 'class'
        let id = if matches!(self.kind(), TokenKind::Name) { Some(self.parse_binding_identifier()?) } else { None };
        let (super_class, body) = self.parse_class_tail()?;
        Ok(Expr::Class(ClassExpression::new(self.finish_node(start), id, super_class, body)))
    }

    /// Class bodies are always strict (spec §4.4); the outer strict flag is
    /// restored once the body closes so it doesn't leak to sibling code.
    fn parse_class_tail(&mut self) -> PResult<(Option<Box<Expr>>, ClassBody)> {
        let outer_strict = self.strict;
        self.strict = true;
        let super_class = if self.eat_keyword(Keyword::Extends) {
            Some(Box::new(self.parse_maybe_conditional(false, &mut DestructuringErrors::default())?))
        } else {
            None
        };
        let body = self.parse_class_body(super_class.is_some())?;
        self.strict = outer_strict;
        Ok((super_class, body))
    }

    fn parse_class_body(&mut self, has_super_class: bool) -> PResult<ClassBody> {
        let start = self.start_node();
        self.expect(&TokenKind::BraceL)?;
        self.private_names.push();
        let mut body = Vec::new();
        let mut has_constructor = false;
        while !self.eat(&TokenKind::BraceR) {
            if self.eat(&TokenKind::Semi) {
                continue;
            }
            body.push(self.parse_class_member(has_super_class, &mut has_constructor)?);
        }
        let unresolved = self.private_names.pop();
        for (name, span) in unresolved {
            return Err(self.raise_fatal(span.start, format!("Private field '#{name}' must be declared in an enclosing class")));
        }
        Ok(ClassBody::new(self.finish_node(start), body))
    }

    fn parse_class_member(&mut self, has_super_class: bool, has_constructor: &mut bool) -> PResult<ClassMember> {
        let start = self.start_node();

        if self.is_contextual("static") && self.peek_is_class_element_start() {
            self.next();
            if self.at(&TokenKind::BraceL) {
                return self.parse_static_block(start);
            }
            return self.parse_class_member_rest(start, true, has_super_class, has_constructor);
        }
        self.parse_class_member_rest(start, false, has_super_class, has_constructor)
    }

    fn parse_static_block(&mut self, start: u32) -> PResult<ClassMember> {
        self.scope.push(ScopeFlags::CLASS_STATIC_BLOCK | ScopeFlags::VAR);
        let block_start = self.start_node();
        self.expect(&TokenKind::BraceL)?;
        let mut body = Vec::new();
        while !self.at(&TokenKind::BraceR) && !self.at(&TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }
        self.expect(&TokenKind::BraceR)?;
        self.scope.pop();
        let _ = block_start;
        Ok(ClassMember::StaticBlock(StaticBlock::new(self.finish_node(start), body)))
    }

    fn parse_class_member_rest(
        &mut self,
        start: u32,
        is_static: bool,
        has_super_class: bool,
        has_constructor: &mut bool,
    ) -> PResult<ClassMember> {
        let is_async = self.is_contextual("async") && self.peek_is_class_element_start() && self.not_newline_after_async();
        if is_async {
            self.next();
        }
        let generator = self.eat(&TokenKind::Star);
        let is_getter = !is_async && !generator && self.is_contextual("get") && self.peek_is_class_element_start();
        let is_setter = !is_async && !generator && self.is_contextual("set") && self.peek_is_class_element_start();
        if is_getter || is_setter {
            self.next();
        }

        let (key, computed) = self.parse_property_key()?;
        let is_private = matches!(key, PropertyKey::PrivateIdentifier(_));
        let key_name = match &key {
            PropertyKey::Identifier(id) => Some(id.name.as_str()),
            PropertyKey::PrivateIdentifier(id) => Some(id.name.as_str()),
            PropertyKey::Literal(lit) => match &lit.value {
                LiteralValue::Str(s) => Some(s.as_str()),
                _ => None,
            },
            PropertyKey::Expr(_) => None,
        };

        if is_static && !computed && key_name == Some("prototype") {
            return Err(self.raise_fatal(start, "Classes may not have a static property named 'prototype'"));
        }

        if !computed && !is_static && !is_getter && !is_setter && !is_async && !generator && key_name == Some("constructor") && !is_private {
            if *has_constructor {
                return Err(self.raise_fatal(start, "Duplicate constructor in the same class"));
            }
            *has_constructor = true;
            let value = self.parse_method_with_super(false, false, has_super_class)?;
            return Ok(ClassMember::Method(MethodDefinition::new(self.finish_node(start), key, value, "constructor", computed, false)));
        }

        if self.at(&TokenKind::ParenL) {
            if is_private {
                let kind = private_method_kind(is_static, is_getter, is_setter);
                if let Some(err) = self.declare_private_name(&key, kind) {
                    return Err(err);
                }
            }
            let value = self.parse_method_with_super(generator, is_async, false)?;
            if is_getter || is_setter {
                self.check_getter_setter_params(is_getter, &value.params, value.span().start)?;
            }
            let kind = if is_getter { "get" } else if is_setter { "set" } else { "method" };
            return Ok(ClassMember::Method(MethodDefinition::new(self.finish_node(start), key, value, kind, computed, is_static)));
        }

        // Field definition.
        if is_private {
            let kind = if is_static { PrivateKind::StaticField } else { PrivateKind::InstanceField };
            if let Some(err) = self.declare_private_name(&key, kind) {
                return Err(err);
            }
        }
        if !computed && key_name == Some("constructor") {
            return Err(self.raise_fatal(start, "Classes may not have a field named 'constructor'"));
        }
        let value = if self.eat(&TokenKind::Eq) {
            self.scope.push(ScopeFlags::SUPER);
            self.scope.current_mut().in_class_field_init = true;
            let v = self.parse_maybe_assign(false, None)?;
            self.scope.pop();
            Some(Box::new(v))
        } else {
            None
        };
        self.semicolon()?;
        Ok(ClassMember::Property(PropertyDefinition::new(self.finish_node(start), key, value, computed, is_static)))
    }

    fn declare_private_name(&mut self, key: &PropertyKey, kind: PrivateKind) -> Option<ParseError> {
        if let PropertyKey::PrivateIdentifier(id) = key {
            return self.private_names.declare(&id.name, kind, id.span());
        }
        None
    }

    fn parse_method_with_super(&mut self, generator: bool, is_async: bool, direct_super: bool) -> PResult<FunctionExpression> {
        let flags = ScopeFlags::FUNCTION
            | ScopeFlags::VAR
            | ScopeFlags::SUPER
            | if direct_super { ScopeFlags::DIRECT_SUPER } else { ScopeFlags::empty() }
            | if generator { ScopeFlags::GENERATOR } else { ScopeFlags::empty() }
            | if is_async { ScopeFlags::ASYNC } else { ScopeFlags::empty() };
        let start = self.start_node();
        self.scope.push(flags);
        let params = self.parse_function_params()?;
        for p in &params {
            self.declare_pattern_bindings(p, crate::scope::BindingKind::Var)?;
        }
        let body = self.parse_function_body_block()?;
        self.scope.pop();
        Ok(FunctionExpression::new(self.finish_node(start), None, params, body, generator, is_async))
    }

    fn not_newline_after_async(&mut self) -> bool {
        let save = self.save_lexer_state();
        self.next();
        let ok = !self.had_line_break_before_current();
        self.restore_lexer_state(save);
        ok
    }

    /// Whether the contextual keyword just recognized (`static`/`async`/
    /// `get`/`set`) is itself the member name rather than a modifier —
    /// true when what follows can't start another class-element head.
    fn peek_is_class_element_start(&mut self) -> bool {
        let save = self.save_lexer_state();
        self.next();
        let ok = !matches!(self.kind(), TokenKind::ParenL | TokenKind::Eq | TokenKind::Semi | TokenKind::BraceR)
            && !self.had_line_break_before_current();
        self.restore_lexer_state(save);
        ok
    }
}

fn private_method_kind(is_static: bool, is_getter: bool, is_setter: bool) -> PrivateKind {
    match (is_static, is_getter, is_setter) {
        (true, true, _) => PrivateKind::StaticGetter,
        (true, _, true) => PrivateKind::StaticSetter,
        (true, _, _) => PrivateKind::StaticMethod,
        (false, true, _) => PrivateKind::InstanceGetter,
        (false, _, true) => PrivateKind::InstanceSetter,
        (false, _, _) => PrivateKind::InstanceMethod,
    }
}
