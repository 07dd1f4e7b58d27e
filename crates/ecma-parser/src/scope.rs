//! The scope tracker (spec §3 "Scope", §4.5 "LValue / pattern converter").
//!
//! A stack of lexical scopes records `var`/lexical/function bindings and
//! detects redeclarations, mirroring acorn's `scope.js`. The bottom frame
//! always carries [`ScopeFlags::TOP`]; a scope is "var-scope" iff it carries
//! [`ScopeFlags::VAR`] (function / top / class-static-block).

use rustc_hash::FxHashSet;

use ecma_common::ParseError;
use ecma_common::Span;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScopeFlags: u32 {
        const TOP = 1 << 0;
        const FUNCTION = 1 << 1;
        const ASYNC = 1 << 2;
        const GENERATOR = 1 << 3;
        const ARROW = 1 << 4;
        const SIMPLE_CATCH = 1 << 5;
        const SUPER = 1 << 6;
        const DIRECT_SUPER = 1 << 7;
        const CLASS_STATIC_BLOCK = 1 << 8;
        const VAR = 1 << 9;
    }
}

/// The kind of binding being declared, passed down from the LValue converter
/// into [`Scope::declare_name`]. Mirrors acorn's `BIND_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Lexical,
    Function,
    SimpleCatch,
    /// The function's own name, visible inside its own body only.
    Outside,
}

#[derive(Debug, Default)]
pub struct Scope {
    pub flags: ScopeFlags,
    pub var: FxHashSet<String>,
    pub lexical: FxHashSet<String>,
    pub functions: FxHashSet<String>,
    pub in_class_field_init: bool,
}

impl Scope {
    pub fn new(flags: ScopeFlags) -> Self {
        Self { flags, ..Default::default() }
    }

    pub fn is_var_scope(&self) -> bool {
        self.flags.contains(ScopeFlags::VAR)
    }
}

/// The parser-wide scope stack (spec §3 invariant: "never empty after
/// initialisation").
pub struct ScopeStack {
    scopes: Vec<Scope>,
    /// Whether `await` is legal in the program scope itself, with no
    /// enclosing `async function` in sight: true for a module (ES2022
    /// top-level await) or when `allowAwaitOutsideFunction` is set. Mirrors
    /// acorn's `canAwait`'s fallthrough after the enclosing-function search
    /// comes up empty.
    allow_top_level_await: bool,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::with_top_level_await(false)
    }

    pub fn with_top_level_await(allow_top_level_await: bool) -> Self {
        Self { scopes: vec![Scope::new(ScopeFlags::TOP | ScopeFlags::VAR)], allow_top_level_await }
    }

    pub fn push(&mut self, flags: ScopeFlags) {
        self.scopes.push(Scope::new(flags));
    }

    pub fn pop(&mut self) {
        debug_assert!(self.scopes.len() > 1, "must never pop the bottom TOP scope");
        self.scopes.pop();
    }

    pub fn current(&self) -> &Scope {
        self.scopes.last().expect("scope stack must never be empty")
    }

    pub fn current_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack must never be empty")
    }

    pub fn iter_from_top(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter().rev()
    }

    pub fn var_scope(&self) -> &Scope {
        self.scopes.iter().rev().find(|s| s.is_var_scope()).expect("a var scope always exists")
    }

    /// `inFunction` (acorn's `state.go`): is there an enclosing non-arrow
    /// function scope?
    pub fn in_function(&self) -> bool {
        self.scopes.iter().rev().any(|s| s.flags.contains(ScopeFlags::FUNCTION))
    }

    pub fn in_generator(&self) -> bool {
        self.nearest_function_like().map(|s| s.flags.contains(ScopeFlags::GENERATOR)).unwrap_or(false)
    }

    pub fn can_await(&self) -> bool {
        for s in self.scopes.iter().rev() {
            if s.flags.contains(ScopeFlags::FUNCTION) && !s.flags.contains(ScopeFlags::ARROW) {
                return s.flags.contains(ScopeFlags::ASYNC);
            }
            if s.flags.contains(ScopeFlags::CLASS_STATIC_BLOCK) {
                return false;
            }
        }
        self.allow_top_level_await
    }

    pub fn allow_super(&self) -> bool {
        self.scopes.iter().rev().any(|s| s.flags.contains(ScopeFlags::SUPER))
    }

    pub fn allow_direct_super(&self) -> bool {
        self.scopes.iter().rev().any(|s| s.flags.contains(ScopeFlags::DIRECT_SUPER))
    }

    pub fn in_class_static_block(&self) -> bool {
        self.scopes.iter().rev().any(|s| s.flags.contains(ScopeFlags::CLASS_STATIC_BLOCK))
    }

    pub fn in_class_field_init(&self) -> bool {
        self.scopes.iter().rev().any(|s| s.in_class_field_init)
    }

    fn nearest_function_like(&self) -> Option<&Scope> {
        self.scopes
            .iter()
            .rev()
            .find(|s| s.flags.intersects(ScopeFlags::FUNCTION | ScopeFlags::CLASS_STATIC_BLOCK))
    }

    /// `declareName` (acorn's `scope.js`): record a binding and report a
    /// redeclaration per the duplicate-detection rules in spec §4.5.
    pub fn declare_name(&mut self, name: &str, kind: BindingKind, span: Span) -> Option<ParseError> {
        match kind {
            BindingKind::Lexical => {
                let idx = self.scopes.len() - 1;
                if self.redeclares_lexical(idx, name) {
                    return Some(ParseError::recoverable(
                        format!("Identifier '{name}' has already been declared"),
                        span,
                    ));
                }
                self.scopes[idx].lexical.insert(name.to_string());
                if self.scopes[idx].is_var_scope() {
                    self.scopes[idx].var.insert(name.to_string());
                }
            }
            BindingKind::Function => {
                let idx = self.scopes.len() - 1;
                if self.redeclares_lexical(idx, name) {
                    return Some(ParseError::recoverable(
                        format!("Identifier '{name}' has already been declared"),
                        span,
                    ));
                }
                self.scopes[idx].functions.insert(name.to_string());
                self.scopes[idx].lexical.insert(name.to_string());
            }
            BindingKind::Var | BindingKind::SimpleCatch => {
                let top = self.scopes.len() - 1;
                for i in (0..self.scopes.len()).rev() {
                    let is_var_scope = self.scopes[i].is_var_scope();
                    let is_own_catch_param = kind == BindingKind::SimpleCatch && i == top;
                    if !is_own_catch_param && self.scopes[i].lexical.contains(name) {
                        return Some(ParseError::recoverable(
                            format!("Identifier '{name}' has already been declared"),
                            span,
                        ));
                    }
                    self.scopes[i].var.insert(name.to_string());
                    if is_var_scope {
                        break;
                    }
                }
            }
            BindingKind::Outside => {}
        }
        None
    }

    fn redeclares_lexical(&self, idx: usize, name: &str) -> bool {
        let scope = &self.scopes[idx];
        if scope.lexical.contains(name) {
            return true;
        }
        if scope.is_var_scope() && scope.functions.contains(name) {
            return false;
        }
        scope.var.contains(name) && !(scope.is_var_scope())
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_scope_has_top_flag() {
        let stack = ScopeStack::new();
        assert!(stack.current().flags.contains(ScopeFlags::TOP));
    }

    #[test]
    fn let_redeclaration_in_same_scope_is_rejected() {
        let mut stack = ScopeStack::new();
        let span = Span::new(0, 1);
        assert!(stack.declare_name("x", BindingKind::Lexical, span).is_none());
        assert!(stack.declare_name("x", BindingKind::Lexical, span).is_some());
    }

    #[test]
    fn var_crosses_function_boundary_to_var_scope() {
        let mut stack = ScopeStack::new();
        stack.push(ScopeFlags::empty());
        let span = Span::new(0, 1);
        assert!(stack.declare_name("x", BindingKind::Var, span).is_none());
        assert!(stack.var_scope().var.contains("x"));
    }

    #[test]
    fn in_function_detects_enclosing_function_scope() {
        let mut stack = ScopeStack::new();
        assert!(!stack.in_function());
        stack.push(ScopeFlags::FUNCTION | ScopeFlags::VAR);
        assert!(stack.in_function());
    }

    #[test]
    fn top_level_await_is_opt_in() {
        assert!(!ScopeStack::new().can_await());
        assert!(ScopeStack::with_top_level_await(true).can_await());
    }

    #[test]
    fn nested_non_async_function_blocks_top_level_await() {
        let mut stack = ScopeStack::with_top_level_await(true);
        stack.push(ScopeFlags::FUNCTION | ScopeFlags::VAR);
        assert!(!stack.can_await());
    }
}
