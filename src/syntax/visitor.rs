//! Visitor pattern for document traversal.

use super::document::Document;
use super::node::{NodeId, NodeKind};

/// Visitor over a document subtree.
///
/// The kind-specific methods are called before a node's children, and
/// [`post_visit`](Visitor::post_visit) after them. Default implementations
/// are no-ops.
pub trait Visitor {
    fn visit_document(&mut self, _doc: &Document, _node: NodeId) {}
    fn visit_charset(&mut self, _doc: &Document, _node: NodeId) {}
    fn visit_rule(&mut self, _doc: &Document, _node: NodeId) {}
    fn visit_declaration(&mut self, _doc: &Document, _node: NodeId) {}
    /// Selector, Property, Value or String
    fn visit_leaf(&mut self, _doc: &Document, _node: NodeId) {}
    /// Braces, colons and semicolons
    fn visit_marker(&mut self, _doc: &Document, _node: NodeId) {}
    fn post_visit(&mut self, _doc: &Document, _node: NodeId) {}
}

impl Document {
    /// Walk the subtree at `node`, pre-order for `visit_*`, post-order for `post_visit`
    pub fn accept(&self, node: NodeId, visitor: &mut impl Visitor) {
        let Some(kind) = self.get(node).map(|n| n.kind()) else {
            return;
        };
        match kind {
            NodeKind::Document => visitor.visit_document(self, node),
            NodeKind::Charset => visitor.visit_charset(self, node),
            NodeKind::Rule => visitor.visit_rule(self, node),
            NodeKind::Declaration => visitor.visit_declaration(self, node),
            k if k.is_leaf() => visitor.visit_leaf(self, node),
            _ => visitor.visit_marker(self, node),
        }
        for child in self.children(node) {
            self.accept(child, visitor);
        }
        visitor.post_visit(self, node);
    }
}
