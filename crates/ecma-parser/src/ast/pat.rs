//! Binding-pattern node types (spec §4.5 "LValue / pattern converter").

use ecma_common::Span;
use serde::Serialize;

use super::{ast_node, Expr, Identifier, MemberExpression, PropertyKey};

ast_node!(ArrayPattern, "ArrayPattern", { elements: Vec<Option<Pat>> });

ast_node!(RestElement, "RestElement", { argument: Box<Pat> });

ast_node!(AssignmentPattern, "AssignmentPattern", {
    left: Box<Pat>,
    right: Box<Expr>,
});

ast_node!(PatternProperty, "Property", {
    key: PropertyKey,
    value: Box<Pat>,
    computed: bool,
    shorthand: bool,
    kind: &'static str,
});

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ObjectPatternProp {
    Property(PatternProperty),
    Rest(RestElement),
}

ast_node!(ObjectPattern, "ObjectPattern", { properties: Vec<ObjectPatternProp> });

/// A binding pattern (spec §4.5). `Member` covers the one case where the
/// *target* of a plain (non-destructuring) assignment is a member expression
/// rather than a true pattern: `toAssignable` leaves those untouched and
/// `checkLValSimple` validates them directly.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Pat {
    Identifier(Identifier),
    Array(ArrayPattern),
    Object(ObjectPattern),
    Assignment(AssignmentPattern),
    Rest(RestElement),
    Member(MemberExpression),
}

impl Pat {
    pub fn span(&self) -> Span {
        match self {
            Pat::Identifier(n) => n.span(),
            Pat::Array(n) => n.span(),
            Pat::Object(n) => n.span(),
            Pat::Assignment(n) => n.span(),
            Pat::Rest(n) => n.span(),
            Pat::Member(n) => n.span(),
        }
    }
}
