//! ESTree 2022 AST node types (spec §3 "AST node").
//!
//! Every node owns its children (a few ESTree fields reference without
//! owning, e.g. specifier locals; those are modelled as plain `Identifier`
//! values, not indices, since nothing else in this crate needs shared
//! ownership of a node). Each node carries its span and, when the caller
//! asked for them, `loc`/`range`; see [`NodeMeta`].

pub mod class;
pub mod expr;
pub mod module;
pub mod pat;
pub mod stmt;

use ecma_common::Span;
use serde::Serialize;

pub use class::*;
pub use expr::*;
pub use module::*;
pub use pat::*;
pub use stmt::*;

/// 1-based line, 0-based column, as used throughout ESTree `loc` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Loc {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub start: Loc,
    pub end: Loc,
}

/// The bookkeeping every AST node carries: always `start`/`end`, plus `loc`
/// and `range` when the corresponding [`crate::Options`] flags are set.
/// `finish_node` (see `parser/mod.rs`) is the only place that constructs one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeMeta {
    pub start: u32,
    pub end: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[u32; 2]>,
}

impl NodeMeta {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Declares a leaf AST node struct: a fixed `"type"` discriminant tag, a
/// flattened [`NodeMeta`], and the node's own fields. Cuts the boilerplate
/// that would otherwise be repeated across ESTree's several dozen node
/// shapes (spec §3: "kind-specific fields").
macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $tag:literal, { $($(#[$fmeta:meta])* $field:ident : $fty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize)]
        pub struct $name {
            #[serde(rename = "type")]
            pub kind: &'static str,
            #[serde(flatten)]
            pub meta: NodeMeta,
            $($(#[$fmeta])* pub $field: $fty,)*
        }

        impl $name {
            pub fn new(meta: NodeMeta, $($field: $fty),*) -> Self {
                Self { kind: $tag, meta, $($field),* }
            }

            pub fn span(&self) -> Span {
                self.meta.span()
            }
        }
    };
}

pub(crate) use ast_node;

ast_node!(
    /// The root node. `source_type` mirrors the `sourceType` option;
    /// `body` may mix statements and (in module source type) import/export
    /// declarations.
    Program, "Program", {
        #[serde(rename = "sourceType")]
        source_type: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        hashbang: Option<String>,
        body: Vec<Stmt>,
    }
);

ast_node!(Identifier, "Identifier", { name: String });

ast_node!(PrivateIdentifier, "PrivateIdentifier", { name: String });

/// The AST `value` field's sum type (spec §9 "Big integers"): a numeric
/// literal without a trailing `n` is an `f64`; with `n` it is an arbitrary
/// precision integer. Regexp literals keep their raw pattern/flags even if
/// the external validator rejected them (their `value` becomes `Unsupported`,
/// matching the "value becomes unspecified" rule in spec §4.1).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Number(f64),
    BigInt(String),
    Str(String),
    /// Regexp value is not representable as a plain JSON scalar; ESTree
    /// serialisers normally omit `value` and rely on `regex`/`raw` instead.
    Unsupported,
}

ast_node!(Literal, "Literal", {
    value: LiteralValue,
    raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    regex: Option<RegexMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bigint: Option<String>,
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegexMeta {
    pub pattern: String,
    pub flags: String,
}
