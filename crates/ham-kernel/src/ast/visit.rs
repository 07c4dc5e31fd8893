//! Tree searches.

use super::types::Node;

/// Accepts or rejects nodes during [`Node::visit`].
pub trait NodeVisitor {
    /// Return true to stop the walk at `node`.
    fn visit(&mut self, node: &Node) -> bool;
}

impl<F: FnMut(&Node) -> bool> NodeVisitor for F {
    fn visit(&mut self, node: &Node) -> bool {
        self(node)
    }
}

impl Node {
    /// Depth-first, pre-order search for the first node `visitor` accepts.
    pub fn visit(&self, visitor: &mut dyn NodeVisitor) -> Option<&Node> {
        if visitor.visit(self) {
            return Some(self);
        }
        self.children()
            .into_iter()
            .find_map(|child| child.visit(visitor))
    }
}
