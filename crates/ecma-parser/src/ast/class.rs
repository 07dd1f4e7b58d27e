//! Class-body node types (spec §4.4 "Class bodies").

use serde::Serialize;

use super::{ast_node, Expr, FunctionExpression, PropertyKey, Stmt};

ast_node!(MethodDefinition, "MethodDefinition", {
    key: PropertyKey,
    value: FunctionExpression,
    /// One of `"constructor"`, `"method"`, `"get"`, `"set"`.
    kind: &'static str,
    computed: bool,
    #[serde(rename = "static")]
    is_static: bool,
});

ast_node!(PropertyDefinition, "PropertyDefinition", {
    key: PropertyKey,
    value: Option<Box<Expr>>,
    computed: bool,
    #[serde(rename = "static")]
    is_static: bool,
});

/// `static { ... }` (spec §4.4): a function-like lexical scope carrying the
/// `SCOPE_CLASS_STATIC_BLOCK` flag.
ast_node!(StaticBlock, "StaticBlock", { body: Vec<Stmt> });

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ClassMember {
    Method(MethodDefinition),
    Property(PropertyDefinition),
    StaticBlock(StaticBlock),
}

ast_node!(ClassBody, "ClassBody", { body: Vec<ClassMember> });
