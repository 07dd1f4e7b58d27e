//! Expression node types (spec §4.4).

use ecma_common::Span;
use serde::Serialize;

use super::{ast_node, Identifier, Literal, NodeMeta, Pat, PrivateIdentifier};

ast_node!(ThisExpression, "ThisExpression", {});
ast_node!(SuperExpr, "Super", {});

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ArrayElement {
    Expr(Expr),
    Spread(SpreadElement),
}

ast_node!(ArrayExpression, "ArrayExpression", { elements: Vec<Option<ArrayElement>> });

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PropertyKey {
    Identifier(Identifier),
    PrivateIdentifier(PrivateIdentifier),
    Literal(Literal),
    Expr(Box<Expr>),
}

ast_node!(ObjectProperty, "Property", {
    key: PropertyKey,
    value: Box<Expr>,
    kind: &'static str,
    method: bool,
    shorthand: bool,
    computed: bool,
});

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ObjectMember {
    Property(ObjectProperty),
    Spread(SpreadElement),
}

ast_node!(ObjectExpression, "ObjectExpression", { properties: Vec<ObjectMember> });

ast_node!(SpreadElement, "SpreadElement", { argument: Box<Expr> });

#[derive(Debug, Clone, Serialize)]
pub struct TemplateElementValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooked: Option<String>,
    pub raw: String,
}

ast_node!(TemplateElement, "TemplateElement", { tail: bool, value: TemplateElementValue });

ast_node!(TemplateLiteral, "TemplateLiteral", {
    quasis: Vec<TemplateElement>,
    expressions: Vec<Expr>,
});

ast_node!(TaggedTemplateExpression, "TaggedTemplateExpression", {
    tag: Box<Expr>,
    quasi: TemplateLiteral,
});

/// A `function` *expression*; see [`super::stmt::FunctionDeclaration`] for
/// the statement-position form. Kept as a distinct type (rather than one
/// struct shared via an enum discriminant) so each carries its own ESTree
/// `"type"` tag, matching the source grammar's own split.
ast_node!(FunctionExpression, "FunctionExpression", {
    id: Option<Identifier>,
    params: Vec<Pat>,
    body: super::BlockStatement,
    generator: bool,
    #[serde(rename = "async")]
    is_async: bool,
});

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(super::BlockStatement),
}

ast_node!(ArrowFunctionExpression, "ArrowFunctionExpression", {
    id: Option<Identifier>,
    params: Vec<Pat>,
    body: ArrowBody,
    expression: bool,
    generator: bool,
    #[serde(rename = "async")]
    is_async: bool,
});

ast_node!(ClassExpression, "ClassExpression", {
    id: Option<Identifier>,
    #[serde(rename = "superClass")]
    super_class: Option<Box<Expr>>,
    body: super::ClassBody,
});

ast_node!(UnaryExpression, "UnaryExpression", {
    operator: &'static str,
    prefix: bool,
    argument: Box<Expr>,
});

ast_node!(UpdateExpression, "UpdateExpression", {
    operator: &'static str,
    prefix: bool,
    argument: Box<Expr>,
});

ast_node!(BinaryExpression, "BinaryExpression", {
    operator: String,
    left: Box<Expr>,
    right: Box<Expr>,
});

ast_node!(LogicalExpression, "LogicalExpression", {
    operator: &'static str,
    left: Box<Expr>,
    right: Box<Expr>,
});

ast_node!(AssignmentExpression, "AssignmentExpression", {
    operator: String,
    left: Box<Pat>,
    right: Box<Expr>,
});

ast_node!(MemberExpression, "MemberExpression", {
    object: Box<Expr>,
    property: Box<Expr>,
    computed: bool,
    optional: bool,
});

ast_node!(ConditionalExpression, "ConditionalExpression", {
    test: Box<Expr>,
    consequent: Box<Expr>,
    alternate: Box<Expr>,
});

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Argument {
    Expr(Expr),
    Spread(SpreadElement),
}

ast_node!(CallExpression, "CallExpression", {
    callee: Box<Expr>,
    arguments: Vec<Argument>,
    optional: bool,
});

ast_node!(NewExpression, "NewExpression", {
    callee: Box<Expr>,
    arguments: Vec<Argument>,
});

ast_node!(SequenceExpression, "SequenceExpression", { expressions: Vec<Expr> });

ast_node!(YieldExpression, "YieldExpression", {
    argument: Option<Box<Expr>>,
    delegate: bool,
});

ast_node!(AwaitExpression, "AwaitExpression", { argument: Box<Expr> });

ast_node!(ImportExpression, "ImportExpression", { source: Box<Expr> });

ast_node!(MetaProperty, "MetaProperty", { meta: Identifier, property: Identifier });

/// Wraps any expression whose top-level (or a descendant's) optional-chaining
/// link makes the whole tail optional (spec §4.4: "once any link is optional,
/// the whole tail is wrapped in a `ChainExpression`").
ast_node!(ChainExpression, "ChainExpression", { expression: Box<Expr> });

/// Only produced when `preserveParens: true` (spec §6 options table).
ast_node!(ParenthesizedExpression, "ParenthesizedExpression", { expression: Box<Expr> });

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Expr {
    Identifier(Identifier),
    PrivateIdentifier(PrivateIdentifier),
    Literal(Literal),
    This(ThisExpression),
    Super(SuperExpr),
    Array(ArrayExpression),
    Object(ObjectExpression),
    Function(FunctionExpression),
    Arrow(ArrowFunctionExpression),
    Class(ClassExpression),
    Template(TemplateLiteral),
    TaggedTemplate(TaggedTemplateExpression),
    Unary(UnaryExpression),
    Update(UpdateExpression),
    Binary(BinaryExpression),
    Logical(LogicalExpression),
    Assignment(AssignmentExpression),
    Member(MemberExpression),
    Conditional(ConditionalExpression),
    Call(CallExpression),
    New(NewExpression),
    Sequence(SequenceExpression),
    Yield(YieldExpression),
    Await(AwaitExpression),
    Import(ImportExpression),
    Meta(MetaProperty),
    Chain(ChainExpression),
    Paren(ParenthesizedExpression),
    Spread(SpreadElement),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Identifier(n) => n.span(),
            Expr::PrivateIdentifier(n) => n.span(),
            Expr::Literal(n) => n.span(),
            Expr::This(n) => n.span(),
            Expr::Super(n) => n.span(),
            Expr::Array(n) => n.span(),
            Expr::Object(n) => n.span(),
            Expr::Function(n) => n.span(),
            Expr::Arrow(n) => n.span(),
            Expr::Class(n) => n.span(),
            Expr::Template(n) => n.span(),
            Expr::TaggedTemplate(n) => n.span(),
            Expr::Unary(n) => n.span(),
            Expr::Update(n) => n.span(),
            Expr::Binary(n) => n.span(),
            Expr::Logical(n) => n.span(),
            Expr::Assignment(n) => n.span(),
            Expr::Member(n) => n.span(),
            Expr::Conditional(n) => n.span(),
            Expr::Call(n) => n.span(),
            Expr::New(n) => n.span(),
            Expr::Sequence(n) => n.span(),
            Expr::Yield(n) => n.span(),
            Expr::Await(n) => n.span(),
            Expr::Import(n) => n.span(),
            Expr::Meta(n) => n.span(),
            Expr::Chain(n) => n.span(),
            Expr::Paren(n) => n.span(),
            Expr::Spread(n) => n.span(),
        }
    }

    /// Whether this expression is a plain identifier naming `name`. Used
    /// throughout the parser for checks like "is the callee literally `eval`".
    pub fn is_identifier_named(&self, name: &str) -> bool {
        matches!(self, Expr::Identifier(id) if id.name == name)
    }
}
