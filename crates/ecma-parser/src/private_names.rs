//! Private-name frames (spec §3 "Private-name frame", §4.4 "Class bodies").
//!
//! One frame per enclosing class body; depth always equals open class-body
//! depth (spec §3 invariant). Unresolved uses are forwarded to the enclosing
//! frame on exit, or reported if there is none (a private name used outside
//! any class, or one that never gets declared by its own class).

use rustc_hash::FxHashMap;

use ecma_common::{ParseError, Span};

/// static/instance x {field, method, get, set}, as named in spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateKind {
    InstanceField,
    StaticField,
    InstanceMethod,
    StaticMethod,
    InstanceGetter,
    StaticGetter,
    InstanceSetter,
    StaticSetter,
}

impl PrivateKind {
    fn is_static(self) -> bool {
        matches!(
            self,
            PrivateKind::StaticField
                | PrivateKind::StaticMethod
                | PrivateKind::StaticGetter
                | PrivateKind::StaticSetter
        )
    }

    /// Two declarations of the same private name coexist only when they are
    /// a matched static-ness getter/setter pair (spec §4.4).
    fn coexists_with(self, other: PrivateKind) -> bool {
        use PrivateKind::*;
        self.is_static() == other.is_static()
            && matches!(
                (self, other),
                (InstanceGetter, InstanceSetter)
                    | (InstanceSetter, InstanceGetter)
                    | (StaticGetter, StaticSetter)
                    | (StaticSetter, StaticGetter)
            )
    }
}

#[derive(Debug, Default)]
pub struct PrivateNameFrame {
    declared: FxHashMap<String, PrivateKind>,
    used: Vec<(String, Span)>,
}

impl PrivateNameFrame {
    pub fn declare(&mut self, name: &str, kind: PrivateKind, span: Span) -> Option<ParseError> {
        if let Some(&existing) = self.declared.get(name) {
            if !existing.coexists_with(kind) {
                return Some(ParseError::recoverable(
                    format!("Identifier '#{name}' has already been declared"),
                    span,
                ));
            }
        }
        self.declared.insert(name.to_string(), kind);
        None
    }

    pub fn use_name(&mut self, name: &str, span: Span) {
        self.used.push((name.to_string(), span));
    }

    /// Resolve uses declared in this frame; return the rest for the caller
    /// to forward to the enclosing frame (or report, at the outermost level).
    pub fn finish(self) -> Vec<(String, Span)> {
        self.used.into_iter().filter(|(name, _)| !self.declared.contains_key(name)).collect()
    }
}

/// The parser-wide stack of [`PrivateNameFrame`]s, one per open class body.
#[derive(Debug, Default)]
pub struct PrivateNameStack {
    frames: Vec<PrivateNameFrame>,
}

impl PrivateNameStack {
    pub fn push(&mut self) {
        self.frames.push(PrivateNameFrame::default());
    }

    /// Pop the innermost frame, forwarding unresolved uses to the parent (or
    /// returning them for the caller to report when there is no parent).
    pub fn pop(&mut self) -> Vec<(String, Span)> {
        let frame = self.frames.pop().expect("pop without matching push");
        let unresolved = frame.finish();
        if let Some(parent) = self.frames.last_mut() {
            for (name, span) in &unresolved {
                parent.use_name(name, *span);
            }
            Vec::new()
        } else {
            unresolved
        }
    }

    pub fn declare(&mut self, name: &str, kind: PrivateKind, span: Span) -> Option<ParseError> {
        self.frames.last_mut().expect("private name used outside class body").declare(name, kind, span)
    }

    pub fn use_name(&mut self, name: &str, span: Span) {
        if let Some(frame) = self.frames.last_mut() {
            frame.use_name(name, span);
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_field_is_rejected() {
        let mut stack = PrivateNameStack::default();
        stack.push();
        let span = Span::new(0, 1);
        assert!(stack.declare("x", PrivateKind::InstanceField, span).is_none());
        assert!(stack.declare("x", PrivateKind::InstanceField, span).is_some());
    }

    #[test]
    fn getter_setter_pair_coexists() {
        let mut stack = PrivateNameStack::default();
        stack.push();
        let span = Span::new(0, 1);
        assert!(stack.declare("x", PrivateKind::InstanceGetter, span).is_none());
        assert!(stack.declare("x", PrivateKind::InstanceSetter, span).is_none());
    }

    #[test]
    fn unresolved_use_forwards_to_parent_frame() {
        let mut stack = PrivateNameStack::default();
        stack.push(); // outer class
        stack.push(); // inner class
        stack.use_name("x", Span::new(5, 7));
        let leftover_inner = stack.pop();
        assert!(leftover_inner.is_empty(), "use should have forwarded to the outer frame");
        stack.declare("x", PrivateKind::InstanceField, Span::new(0, 1));
        let leftover_outer = stack.pop();
        assert!(leftover_outer.is_empty());
    }
}
