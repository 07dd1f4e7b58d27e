//! Import/export declaration parser (spec §4.6 "Module parser").

use ecma_common::{Keyword, Span, TokenKind};

use crate::ast::*;
use crate::scope::BindingKind;

use super::{PResult, Parser};

impl<'src> Parser<'src> {
    pub(crate) fn parse_import_declaration(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next(); // 'import'

        if matches!(self.kind(), TokenKind::String) {
            let source = self.parse_string_literal()?;
            self.check_module_string(&source)?;
            self.semicolon()?;
            return Ok(Stmt::Import(ImportDeclaration::new(self.finish_node(start), Vec::new(), source)));
        }

        let mut specifiers = Vec::new();
        if matches!(self.kind(), TokenKind::Name) && !self.is_contextual("from") {
            let local = self.parse_binding_identifier()?;
            self.declare_pattern_bindings(&Pat::Identifier(local.clone()), BindingKind::Lexical)?;
            specifiers.push(ImportSpecifierKind::Default(ImportDefaultSpecifier::new(local.meta.clone(), local)));
            if self.eat(&TokenKind::Comma) {
                self.parse_import_tail_specifiers(&mut specifiers)?;
            }
        } else {
            self.parse_import_tail_specifiers(&mut specifiers)?;
        }

        self.expect_contextual("from")?;
        let source = self.parse_string_literal()?;
        self.check_module_string(&source)?;
        self.semicolon()?;
        Ok(Stmt::Import(ImportDeclaration::new(self.finish_node(start), specifiers, source)))
    }

    fn parse_import_tail_specifiers(&mut self, specifiers: &mut Vec<ImportSpecifierKind>) -> PResult<()> {
        if self.at(&TokenKind::Star) {
            let star_start = self.start_node();
            self.next();
            self.expect_contextual("as")?;
            let local = self.parse_binding_identifier()?;
            self.declare_pattern_bindings(&Pat::Identifier(local.clone()), BindingKind::Lexical)?;
            specifiers.push(ImportSpecifierKind::Namespace(ImportNamespaceSpecifier::new(self.finish_node(star_start), local)));
            return Ok(());
        }
        self.expect(&TokenKind::BraceL)?;
        while !self.eat(&TokenKind::BraceR) {
            let spec_start = self.start_node();
            let imported = self.parse_module_name()?;
            let local = if self.eat_contextual("as") {
                self.parse_binding_identifier()?
            } else {
                match &imported {
                    ModuleName::Identifier(id) => id.clone(),
                    ModuleName::Str(lit) => {
                        return Err(self.raise_fatal(lit.span().start, "A string literal cannot be used as an imported binding without 'as'"));
                    }
                }
            };
            self.declare_pattern_bindings(&Pat::Identifier(local.clone()), BindingKind::Lexical)?;
            specifiers.push(ImportSpecifierKind::Named(ImportSpecifier::new(self.finish_node(spec_start), imported, local)));
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::BraceR)?;
                break;
            }
        }
        Ok(())
    }

    fn parse_module_name(&mut self) -> PResult<ModuleName> {
        if matches!(self.kind(), TokenKind::String) {
            let lit = self.parse_string_literal()?;
            self.check_module_string(&lit)?;
            return Ok(ModuleName::Str(lit));
        }
        Ok(ModuleName::Identifier(self.parse_identifier_name()?))
    }

    /// A string used as a module export/source name (spec §4.6
    /// "lone-surrogate rejection" — `util.go`'s `loneSurrogate`, gated on
    /// ecmaVersion >= 13): an unpaired `\uD800`-`\uDFFF` escape in the raw
    /// source text is a syntax error, since such a name can never round-trip
    /// through UTF-16 module records.
    fn check_module_string(&mut self, lit: &Literal) -> PResult<()> {
        if self.opts.ecma_version < 13 {
            return Ok(());
        }
        if let Some(offset) = lone_surrogate_offset(&lit.raw) {
            return Err(self.raise_fatal(lit.span().start + offset as u32, "An export/import name cannot contain a lone surrogate"));
        }
        Ok(())
    }

    pub(crate) fn parse_export_declaration(&mut self) -> PResult<Stmt> {
        let start = self.start_node();
        self.next(); // 'export'

        if self.eat_keyword(Keyword::Default) {
            return self.parse_export_default(start);
        }

        if self.at(&TokenKind::Star) {
            self.next();
            let exported = if self.eat_contextual("as") { Some(self.parse_module_name()?) } else { None };
            if let Some(name) = &exported {
                self.record_export(module_name_text(name), module_name_span(name))?;
            }
            self.expect_contextual("from")?;
            let source = self.parse_string_literal()?;
            self.check_module_string(&source)?;
            self.semicolon()?;
            return Ok(Stmt::ExportAll(ExportAllDeclaration::new(self.finish_node(start), source, exported)));
        }

        if self.at(&TokenKind::BraceL) {
            self.next();
            let mut specifiers = Vec::new();
            while !self.eat(&TokenKind::BraceR) {
                let spec_start = self.start_node();
                let local = self.parse_module_name()?;
                let exported = if self.eat_contextual("as") { self.parse_module_name()? } else { local.clone() };
                self.record_export(module_name_text(&exported), module_name_span(&exported))?;
                specifiers.push(ExportSpecifier::new(self.finish_node(spec_start), local, exported));
                if !self.eat(&TokenKind::Comma) {
                    self.expect(&TokenKind::BraceR)?;
                    break;
                }
            }
            let source = if self.eat_contextual("from") {
                let lit = self.parse_string_literal()?;
                self.check_module_string(&lit)?;
                Some(lit)
            } else {
                None
            };
            if source.is_none() {
                for spec in &specifiers {
                    if let ModuleName::Identifier(id) = &spec.local {
                        self.undefined_exports.push((id.name.clone(), id.span()));
                    }
                }
            }
            self.semicolon()?;
            return Ok(Stmt::ExportNamed(ExportNamedDeclaration::new(self.finish_node(start), None, specifiers, source)));
        }

        let declaration = match self.kind().clone() {
            TokenKind::Keyword(Keyword::Function) => {
                let decl = self.parse_function_statement(false)?;
                match decl {
                    Stmt::FunctionDeclaration(f) => ExportedDeclaration::Function(f),
                    _ => unreachable!(),
                }
            }
            TokenKind::Name if self.is_contextual("async") => {
                let decl = self.parse_function_statement(true)?;
                match decl {
                    Stmt::FunctionDeclaration(f) => ExportedDeclaration::Function(f),
                    _ => unreachable!(),
                }
            }
            TokenKind::Keyword(Keyword::Class) => {
                let decl = self.parse_class_statement()?;
                match decl {
                    Stmt::ClassDeclaration(c) => ExportedDeclaration::Class(c),
                    _ => unreachable!(),
                }
            }
            TokenKind::Keyword(Keyword::Var) => {
                let decl = self.parse_var_statement("var")?;
                match decl {
                    Stmt::VariableDeclaration(v) => ExportedDeclaration::Var(v),
                    _ => unreachable!(),
                }
            }
            TokenKind::Keyword(Keyword::Const) => {
                let decl = self.parse_var_statement("const")?;
                match decl {
                    Stmt::VariableDeclaration(v) => ExportedDeclaration::Var(v),
                    _ => unreachable!(),
                }
            }
            _ if self.is_contextual("let") => {
                let decl = self.parse_var_statement("let")?;
                match decl {
                    Stmt::VariableDeclaration(v) => ExportedDeclaration::Var(v),
                    _ => unreachable!(),
                }
            }
            _ => return Err(self.unexpected(None)),
        };
        self.record_exported_declaration(&declaration)?;
        Ok(Stmt::ExportNamed(ExportNamedDeclaration::new(self.finish_node(start), Some(Box::new(declaration)), Vec::new(), None)))
    }

    fn parse_export_default(&mut self, start: u32) -> PResult<Stmt> {
        let value = match self.kind().clone() {
            TokenKind::Keyword(Keyword::Function) => {
                let decl = self.parse_function_statement(false)?;
                match decl {
                    Stmt::FunctionDeclaration(f) => ExportDefaultValue::Function(f),
                    _ => unreachable!(),
                }
            }
            TokenKind::Name if self.is_contextual("async") => {
                let decl = self.parse_function_statement(true)?;
                match decl {
                    Stmt::FunctionDeclaration(f) => ExportDefaultValue::Function(f),
                    _ => unreachable!(),
                }
            }
            TokenKind::Keyword(Keyword::Class) => {
                let decl = self.parse_class_statement()?;
                match decl {
                    Stmt::ClassDeclaration(c) => ExportDefaultValue::Class(c),
                    _ => unreachable!(),
                }
            }
            _ => {
                let expr = self.parse_maybe_assign(false, None)?;
                self.semicolon()?;
                ExportDefaultValue::Expr(Box::new(expr))
            }
        };
        self.record_export("default".to_string(), Span::new(start, start))?;
        Ok(Stmt::ExportDefault(ExportDefaultDeclaration::new(self.finish_node(start), value)))
    }

    /// Inserts `name` into the `exports` table (spec §4.6), raising a
    /// recoverable error if it was already exported under another clause.
    fn record_export(&mut self, name: String, span: Span) -> PResult<()> {
        if !self.exports.insert(name.clone()) {
            return Err(self.raise_recoverable(span.start, format!("Duplicate export '{name}'")));
        }
        Ok(())
    }

    /// Pattern-position exports (spec §4.6): `export var`/`let`/`const`
    /// declarations enumerate every bound name, including ones nested inside
    /// array/object/assignment/rest patterns.
    fn record_exported_declaration(&mut self, declaration: &ExportedDeclaration) -> PResult<()> {
        match declaration {
            ExportedDeclaration::Function(f) => {
                let id = f.id.as_ref().expect("function declarations require a name");
                self.record_export(id.name.clone(), id.span())
            }
            ExportedDeclaration::Class(c) => {
                let id = c.id.as_ref().expect("class declarations require a name");
                self.record_export(id.name.clone(), id.span())
            }
            ExportedDeclaration::Var(v) => {
                for decl in &v.declarations {
                    let mut names = Vec::new();
                    collect_pattern_names(&decl.id, &mut names);
                    for (name, span) in names {
                        self.record_export(name, span)?;
                    }
                }
                Ok(())
            }
        }
    }

    pub(crate) fn finish_undefined_exports(&mut self) -> PResult<()> {
        let scope = self.scope.current();
        for (name, span) in &self.undefined_exports {
            if !scope.var.contains(name) && !scope.lexical.contains(name) {
                return Err(self.raise_fatal(span.start, format!("Export '{name}' is not defined")));
            }
        }
        Ok(())
    }
}

/// Scans a string literal's raw source text for an unpaired `\uD800`-`\uDFFF`
/// escape and returns its byte offset within `raw` (spec §4.6; `util.go`'s
/// `loneSurrogate`). The decoded value is a Rust `String` and can't carry a
/// lone surrogate itself, so this has to look at the escapes as written.
fn lone_surrogate_offset(raw: &str) -> Option<usize> {
    let mut chars = raw.char_indices().peekable();
    let mut pending_high: Option<usize> = None;
    while let Some((idx, c)) = chars.next() {
        if c == '\\' && matches!(chars.peek(), Some((_, 'u'))) {
            chars.next(); // 'u'
            if matches!(chars.peek(), Some((_, '{'))) {
                while let Some((_, cc)) = chars.next() {
                    if cc == '}' {
                        break;
                    }
                }
                if let Some(p) = pending_high.take() {
                    return Some(p);
                }
                continue;
            }
            let mut code: u32 = 0;
            let mut digits = 0;
            while digits < 4 {
                match chars.peek().and_then(|(_, hc)| hc.to_digit(16)) {
                    Some(d) => {
                        code = code * 16 + d;
                        chars.next();
                        digits += 1;
                    }
                    None => break,
                }
            }
            if digits < 4 {
                if let Some(p) = pending_high.take() {
                    return Some(p);
                }
                continue;
            }
            if (0xD800..=0xDBFF).contains(&code) {
                if let Some(p) = pending_high.replace(idx) {
                    return Some(p);
                }
            } else if (0xDC00..=0xDFFF).contains(&code) {
                if pending_high.take().is_none() {
                    return Some(idx);
                }
            } else if let Some(p) = pending_high.take() {
                return Some(p);
            }
            continue;
        }
        if let Some(p) = pending_high.take() {
            return Some(p);
        }
    }
    pending_high
}

fn module_name_text(name: &ModuleName) -> String {
    match name {
        ModuleName::Identifier(id) => id.name.clone(),
        ModuleName::Str(lit) => match &lit.value {
            crate::ast::LiteralValue::Str(s) => s.clone(),
            _ => String::new(),
        },
    }
}

fn module_name_span(name: &ModuleName) -> Span {
    match name {
        ModuleName::Identifier(id) => id.span(),
        ModuleName::Str(lit) => lit.span(),
    }
}

/// Recursively enumerates every bound name in a binding pattern, in source
/// order, for `export`'s pattern-position name collection.
fn collect_pattern_names(pat: &Pat, out: &mut Vec<(String, Span)>) {
    match pat {
        Pat::Identifier(id) => out.push((id.name.clone(), id.span())),
        Pat::Array(arr) => {
            for el in arr.elements.iter().flatten() {
                collect_pattern_names(el, out);
            }
        }
        Pat::Object(obj) => {
            for prop in &obj.properties {
                match prop {
                    ObjectPatternProp::Property(p) => collect_pattern_names(&p.value, out),
                    ObjectPatternProp::Rest(r) => collect_pattern_names(&r.argument, out),
                }
            }
        }
        Pat::Assignment(a) => collect_pattern_names(&a.left, out),
        Pat::Rest(r) => collect_pattern_names(&r.argument, out),
        Pat::Member(_) => {}
    }
}
