//! Statement and declaration node types (spec §4.3 "Statement parser").

use ecma_common::Span;
use serde::Serialize;

use super::{ast_node, ClassBody, Expr, Identifier, Pat};

ast_node!(ExpressionStatement, "ExpressionStatement", {
    expression: Box<Expr>,
    /// Non-`None` for directive-prologue members (spec §4.3): the raw
    /// (unescaped, unquoted) text of the string literal, e.g. `"use strict"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    directive: Option<String>,
});

ast_node!(BlockStatement, "BlockStatement", { body: Vec<Stmt> });
ast_node!(EmptyStatement, "EmptyStatement", {});
ast_node!(DebuggerStatement, "DebuggerStatement", {});
ast_node!(WithStatement, "WithStatement", { object: Box<Expr>, body: Box<Stmt> });
ast_node!(ReturnStatement, "ReturnStatement", { argument: Option<Box<Expr>> });
ast_node!(LabeledStatement, "LabeledStatement", { label: Identifier, body: Box<Stmt> });
ast_node!(BreakStatement, "BreakStatement", { label: Option<Identifier> });
ast_node!(ContinueStatement, "ContinueStatement", { label: Option<Identifier> });

ast_node!(IfStatement, "IfStatement", {
    test: Box<Expr>,
    consequent: Box<Stmt>,
    alternate: Option<Box<Stmt>>,
});

ast_node!(SwitchCase, "SwitchCase", { test: Option<Box<Expr>>, consequent: Vec<Stmt> });
ast_node!(SwitchStatement, "SwitchStatement", { discriminant: Box<Expr>, cases: Vec<SwitchCase> });

ast_node!(ThrowStatement, "ThrowStatement", { argument: Box<Expr> });

ast_node!(CatchClause, "CatchClause", { param: Option<Pat>, body: BlockStatement });
ast_node!(TryStatement, "TryStatement", {
    block: BlockStatement,
    handler: Option<CatchClause>,
    finalizer: Option<BlockStatement>,
});

ast_node!(WhileStatement, "WhileStatement", { test: Box<Expr>, body: Box<Stmt> });
ast_node!(DoWhileStatement, "DoWhileStatement", { body: Box<Stmt>, test: Box<Expr> });

ast_node!(VariableDeclarator, "VariableDeclarator", { id: Pat, init: Option<Box<Expr>> });
ast_node!(VariableDeclaration, "VariableDeclaration", {
    kind: &'static str,
    declarations: Vec<VariableDeclarator>,
});

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ForInit {
    Var(VariableDeclaration),
    Expr(Box<Expr>),
}

ast_node!(ForStatement, "ForStatement", {
    init: Option<ForInit>,
    test: Option<Box<Expr>>,
    update: Option<Box<Expr>>,
    body: Box<Stmt>,
});

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ForHead {
    Var(VariableDeclaration),
    Pat(Box<Pat>),
}

ast_node!(ForInStatement, "ForInStatement", { left: ForHead, right: Box<Expr>, body: Box<Stmt> });
ast_node!(ForOfStatement, "ForOfStatement", {
    left: ForHead,
    right: Box<Expr>,
    body: Box<Stmt>,
    #[serde(rename = "await")]
    is_await: bool,
});

ast_node!(FunctionDeclaration, "FunctionDeclaration", {
    id: Option<Identifier>,
    params: Vec<Pat>,
    body: BlockStatement,
    generator: bool,
    #[serde(rename = "async")]
    is_async: bool,
});

ast_node!(ClassDeclaration, "ClassDeclaration", {
    id: Option<Identifier>,
    #[serde(rename = "superClass")]
    super_class: Option<Box<Expr>>,
    body: ClassBody,
});

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Stmt {
    Expression(ExpressionStatement),
    Block(BlockStatement),
    Empty(EmptyStatement),
    Debugger(DebuggerStatement),
    With(WithStatement),
    Return(ReturnStatement),
    Labeled(LabeledStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    If(IfStatement),
    Switch(SwitchStatement),
    Throw(ThrowStatement),
    Try(TryStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    ForIn(ForInStatement),
    ForOf(ForOfStatement),
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    ClassDeclaration(ClassDeclaration),
    Import(super::ImportDeclaration),
    ExportNamed(super::ExportNamedDeclaration),
    ExportDefault(super::ExportDefaultDeclaration),
    ExportAll(super::ExportAllDeclaration),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expression(n) => n.span(),
            Stmt::Block(n) => n.span(),
            Stmt::Empty(n) => n.span(),
            Stmt::Debugger(n) => n.span(),
            Stmt::With(n) => n.span(),
            Stmt::Return(n) => n.span(),
            Stmt::Labeled(n) => n.span(),
            Stmt::Break(n) => n.span(),
            Stmt::Continue(n) => n.span(),
            Stmt::If(n) => n.span(),
            Stmt::Switch(n) => n.span(),
            Stmt::Throw(n) => n.span(),
            Stmt::Try(n) => n.span(),
            Stmt::While(n) => n.span(),
            Stmt::DoWhile(n) => n.span(),
            Stmt::For(n) => n.span(),
            Stmt::ForIn(n) => n.span(),
            Stmt::ForOf(n) => n.span(),
            Stmt::VariableDeclaration(n) => n.span(),
            Stmt::FunctionDeclaration(n) => n.span(),
            Stmt::ClassDeclaration(n) => n.span(),
            Stmt::Import(n) => n.span(),
            Stmt::ExportNamed(n) => n.span(),
            Stmt::ExportDefault(n) => n.span(),
            Stmt::ExportAll(n) => n.span(),
        }
    }
}
