//! The local variable scope chain.
//!
//! Every block, rule invocation and `on` expression layers one
//! [`VariableDomain`] over the current locals. Lookups walk from the
//! innermost frame outwards; the global domain is not part of the chain and
//! is consulted separately by the context.

use ham_types::StringList;

use super::variables::VariableDomain;

/// Stack of local variable frames. The last element is the innermost scope.
#[derive(Debug, Clone, Default)]
pub struct VariableScope {
    frames: Vec<VariableDomain>,
}

impl VariableScope {
    /// Create a scope chain with no frames (only globals are visible).
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames currently installed.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_frame(&mut self, domain: VariableDomain) {
        self.frames.push(domain);
    }

    /// Drop every frame above `depth`.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    /// The innermost frame, if any.
    pub fn current_mut(&mut self) -> Option<&mut VariableDomain> {
        self.frames.last_mut()
    }

    pub fn lookup(&self, name: &str) -> Option<&StringList> {
        self.frames.iter().rev().find_map(|frame| frame.lookup(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut StringList> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.lookup_mut(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}
