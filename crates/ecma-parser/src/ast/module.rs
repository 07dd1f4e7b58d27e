//! Module node types (spec §4.6 "Module parser").

use serde::Serialize;

use super::{ast_node, ClassDeclaration, Expr, FunctionDeclaration, Identifier, Literal, VariableDeclaration};

/// Either a plain binding identifier or (ecmaVersion >= 13) a string literal
/// module export name, e.g. `export { x as "a name" }`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ModuleName {
    Identifier(Identifier),
    Str(Literal),
}

ast_node!(ImportDefaultSpecifier, "ImportDefaultSpecifier", { local: Identifier });
ast_node!(ImportNamespaceSpecifier, "ImportNamespaceSpecifier", { local: Identifier });
ast_node!(ImportSpecifier, "ImportSpecifier", { imported: ModuleName, local: Identifier });

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ImportSpecifierKind {
    Default(ImportDefaultSpecifier),
    Namespace(ImportNamespaceSpecifier),
    Named(ImportSpecifier),
}

ast_node!(ImportDeclaration, "ImportDeclaration", {
    specifiers: Vec<ImportSpecifierKind>,
    source: Literal,
});

ast_node!(ExportSpecifier, "ExportSpecifier", { local: ModuleName, exported: ModuleName });

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExportedDeclaration {
    Function(FunctionDeclaration),
    Class(ClassDeclaration),
    Var(VariableDeclaration),
}

ast_node!(ExportNamedDeclaration, "ExportNamedDeclaration", {
    declaration: Option<Box<ExportedDeclaration>>,
    specifiers: Vec<ExportSpecifier>,
    source: Option<Literal>,
});

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExportDefaultValue {
    Function(FunctionDeclaration),
    Class(ClassDeclaration),
    Expr(Box<Expr>),
}

ast_node!(ExportDefaultDeclaration, "ExportDefaultDeclaration", { declaration: ExportDefaultValue });

ast_node!(ExportAllDeclaration, "ExportAllDeclaration", {
    source: Literal,
    exported: Option<ModuleName>,
});
