//! The LValue / pattern converter (spec §4.5): `toAssignable` reinterprets
//! an already-parsed expression as a binding/assignment pattern without
//! reparsing, and the `checkLval*` family walks a pattern to validate and
//! (for true bindings) register names in the active scope.

use crate::ast::*;
use crate::scope::BindingKind;

use super::{PResult, Parser};

impl<'src> Parser<'src> {
    /// `toAssignable` (spec §4.5). `is_binding` is true only for true
    /// declarative bindings (`var`/`let`/`const`, parameters, catch clauses,
    /// `for`-`of`/`in` with a declaration) where a `MemberExpression` is
    /// never legal; plain assignment targets (`x = ...`, `{a, b} = obj`)
    /// pass `false` and may bottom out at a `MemberExpression`.
    pub(crate) fn to_assignable(&mut self, expr: Expr, is_binding: bool) -> PResult<Pat> {
        match expr {
            Expr::Identifier(id) => Ok(Pat::Identifier(id)),
            Expr::Member(m) => {
                if is_binding {
                    return Err(self.raise_fatal(m.span().start, "Binding member expression"));
                }
                Ok(Pat::Member(m))
            }
            Expr::Array(arr) => {
                let mut elements = Vec::with_capacity(arr.elements.len());
                let last = arr.elements.len().saturating_sub(1);
                for (i, el) in arr.elements.into_iter().enumerate() {
                    elements.push(match el {
                        None => None,
                        Some(ArrayElement::Expr(e)) => Some(self.to_assignable(e, is_binding)?),
                        Some(ArrayElement::Spread(s)) => {
                            if i != last {
                                return Err(self.raise_fatal(s.span().start, "Rest element must be last element"));
                            }
                            Some(Pat::Rest(RestElement::new(s.meta, Box::new(self.to_assignable(*s.argument, is_binding)?))))
                        }
                    });
                }
                Ok(Pat::Array(ArrayPattern::new(arr.meta, elements)))
            }
            Expr::Object(obj) => {
                let mut properties = Vec::with_capacity(obj.properties.len());
                let last = obj.properties.len().saturating_sub(1);
                for (i, member) in obj.properties.into_iter().enumerate() {
                    properties.push(match member {
                        ObjectMember::Property(p) => ObjectPatternProp::Property(PatternProperty::new(
                            p.meta,
                            p.key,
                            Box::new(self.to_assignable(*p.value, is_binding)?),
                            p.computed,
                            p.shorthand,
                            p.kind,
                        )),
                        ObjectMember::Spread(s) => {
                            if i != last {
                                return Err(self.raise_fatal(s.span().start, "Rest element must be last element"));
                            }
                            ObjectPatternProp::Rest(RestElement::new(
                                s.meta,
                                Box::new(self.to_assignable(*s.argument, is_binding)?),
                            ))
                        }
                    });
                }
                Ok(Pat::Object(ObjectPattern::new(obj.meta, properties)))
            }
            Expr::Assignment(a) if a.operator == "=" => {
                Ok(Pat::Assignment(AssignmentPattern::new(a.meta, a.left, a.right)))
            }
            Expr::Spread(s) => Ok(Pat::Rest(RestElement::new(s.meta, Box::new(self.to_assignable(*s.argument, is_binding)?)))),
            other => Err(self.raise_fatal(other.span().start, "Invalid left-hand side in assignment")),
        }
    }

    /// For compound-assignment and update-expression targets, which never
    /// go through pattern conversion: the left-hand side must already be a
    /// plain identifier or member expression.
    pub(crate) fn to_simple_assign_target(&mut self, expr: Expr) -> PResult<Pat> {
        match expr {
            Expr::Identifier(id) => Ok(Pat::Identifier(id)),
            Expr::Member(m) => Ok(Pat::Member(m)),
            other => Err(self.raise_fatal(other.span().start, "Invalid left-hand side in assignment")),
        }
    }

    /// `checkLValSimple` (spec §4.5): validates (and for `kind != Outside`,
    /// declares) a plain assignment/update target without going through
    /// pattern conversion.
    pub(crate) fn check_lval_simple(&mut self, expr: &Expr, kind: BindingKind) -> PResult<()> {
        match expr {
            Expr::Identifier(id) => {
                let span = id.span();
                if self.strict && (id.name == "eval" || id.name == "arguments") {
                    return Err(self.raise_recoverable(span.start, format!("Assigning to '{}' in strict mode", id.name)));
                }
                if kind != BindingKind::Outside {
                    if let Some(err) = self.scope.declare_name(&id.name, kind, span) {
                        return Err(err);
                    }
                }
                Ok(())
            }
            Expr::Member(_) => {
                if kind != BindingKind::Outside {
                    return Err(self.raise_fatal(expr.span().start, "Binding member expression"));
                }
                Ok(())
            }
            _ => Err(self.raise_fatal(expr.span().start, "Invalid left-hand side in assignment")),
        }
    }

    /// `checkLValPattern` (spec §4.5): recursively walks a binding pattern,
    /// declaring every bound name in the active scope.
    pub(crate) fn declare_pattern_bindings(&mut self, pat: &Pat, kind: BindingKind) -> PResult<()> {
        match pat {
            Pat::Identifier(id) => {
                let span = id.span();
                self.check_unreserved(&id.name, span)?;
                if self.strict && (id.name == "eval" || id.name == "arguments") {
                    return Err(self.raise_recoverable(span.start, format!("Binding '{}' in strict mode", id.name)));
                }
                if let Some(err) = self.scope.declare_name(&id.name, kind, span) {
                    return Err(err);
                }
                Ok(())
            }
            Pat::Array(arr) => {
                for el in arr.elements.iter().flatten() {
                    self.declare_pattern_bindings(el, kind)?;
                }
                Ok(())
            }
            Pat::Object(obj) => {
                for prop in &obj.properties {
                    match prop {
                        ObjectPatternProp::Property(p) => self.declare_pattern_bindings(&p.value, kind)?,
                        ObjectPatternProp::Rest(r) => self.declare_pattern_bindings(&r.argument, kind)?,
                    }
                }
                Ok(())
            }
            Pat::Assignment(a) => self.declare_pattern_bindings(&a.left, kind),
            Pat::Rest(r) => self.declare_pattern_bindings(&r.argument, kind),
            Pat::Member(m) => Err(self.raise_fatal(m.span().start, "Binding member expression")),
        }
    }
}
