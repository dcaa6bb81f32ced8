//! The document tree.
//!
//! A [`Document`] owns an arena of [`Node`]s. The parser fills it; after that
//! nodes are created detached through the `create_*` factories and linked in
//! or out only through the mutation methods, each of which notifies the
//! registered [`ModelListener`] exactly once.
//!
//! Arena slots are never reused, so a [`NodeId`] stays valid for the whole
//! life of its document even after the node is detached.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;
use tracing::trace;

use super::event::{ModelError, ModelEvent, ModelListener};
use super::node::{Node, NodeData, NodeId, NodeKind};
use crate::parser::SyntaxError;

/// Length of `@charset ` as laid out by [`Document::create_charset`]
const CHARSET_PREFIX_LEN: usize = "@charset ".len();

/// Root of a parsed stylesheet plus its arena
pub struct Document {
    nodes: Vec<Node>,
    charset: Option<NodeId>,
    rules: Vec<NodeId>,
    errors: Vec<SyntaxError>,
    listener: Option<Rc<RefCell<dyn ModelListener>>>,
    dispatching: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("charset", &self.charset)
            .field("rules", &self.rules)
            .field("errors", &self.errors)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Document {
    /// An empty document covering an empty text
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(0, 0, NodeData::Document)],
            charset: None,
            rules: Vec::new(),
            errors: Vec::new(),
            listener: None,
            dispatching: false,
        }
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// The node behind `id`
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    /// Cached value of a leaf
    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::value)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn rules(&self) -> &[NodeId] {
        &self.rules
    }

    pub fn rule(&self, index: usize) -> Option<NodeId> {
        self.rules.get(index).copied()
    }

    /// The first rule whose selector equals `selector`
    pub fn find_rule(&self, selector: &str) -> Option<NodeId> {
        self.rules
            .iter()
            .copied()
            .find(|&rule| self.selector(rule).and_then(|s| self.value(s)) == Some(selector))
    }

    pub fn charset(&self) -> Option<NodeId> {
        self.charset
    }

    /// Errors recorded while parsing, in source order
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| e.severity.is_error())
    }

    /// The `n`-th child of `id` in source order
    pub fn nth_child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        if id == NodeId::ROOT {
            return match self.charset {
                Some(charset) if n == 0 => Some(charset),
                Some(_) => self.rules.get(n - 1).copied(),
                None => self.rules.get(n).copied(),
            };
        }
        self.get(id)?.data.nth_child(n)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        (0..).map_while(move |n| self.nth_child(id, n))
    }

    /// Position of a rule among the rules, or of a declaration within its rule
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        match self.kind(id) {
            NodeKind::Rule if parent == NodeId::ROOT => self.rules.iter().position(|&r| r == id),
            NodeKind::Declaration => self.declarations(parent).iter().position(|&d| d == id),
            _ => None,
        }
    }

    /// Whether `id` is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == NodeId::ROOT {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    // ========================================================================
    // Typed child access
    // ========================================================================

    pub fn selector(&self, rule: NodeId) -> Option<NodeId> {
        match self.get(rule)?.data {
            NodeData::Rule { selector, .. } => Some(selector),
            _ => None,
        }
    }

    pub fn left_brace(&self, rule: NodeId) -> Option<NodeId> {
        match self.get(rule)?.data {
            NodeData::Rule { left_brace, .. } => Some(left_brace),
            _ => None,
        }
    }

    pub fn right_brace(&self, rule: NodeId) -> Option<NodeId> {
        match self.get(rule)?.data {
            NodeData::Rule { right_brace, .. } => Some(right_brace),
            _ => None,
        }
    }

    /// Declarations of a rule; empty for anything else
    pub fn declarations(&self, rule: NodeId) -> &[NodeId] {
        match self.get(rule).map(|n| &n.data) {
            Some(NodeData::Rule { declarations, .. }) => declarations,
            _ => &[],
        }
    }

    pub fn declaration(&self, rule: NodeId, index: usize) -> Option<NodeId> {
        self.declarations(rule).get(index).copied()
    }

    pub fn property(&self, declaration: NodeId) -> Option<NodeId> {
        match self.get(declaration)?.data {
            NodeData::Declaration { property, .. } => Some(property),
            _ => None,
        }
    }

    pub fn colon(&self, declaration: NodeId) -> Option<NodeId> {
        match self.get(declaration)?.data {
            NodeData::Declaration { colon, .. } => Some(colon),
            _ => None,
        }
    }

    /// The Value leaf of a declaration
    pub fn value_node(&self, declaration: NodeId) -> Option<NodeId> {
        match self.get(declaration)?.data {
            NodeData::Declaration { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Semicolon of a declaration or charset
    pub fn semicolon(&self, id: NodeId) -> Option<NodeId> {
        match self.get(id)?.data {
            NodeData::Declaration { semicolon, .. } => semicolon,
            NodeData::Charset { semicolon, .. } => Some(semicolon),
            _ => None,
        }
    }

    /// The quoted String leaf of a charset
    pub fn string(&self, charset: NodeId) -> Option<NodeId> {
        match self.get(charset)?.data {
            NodeData::Charset { string, .. } => Some(string),
            _ => None,
        }
    }

    // ========================================================================
    // Factories
    // ========================================================================

    /// A detached rule laid out as `selector {}`
    pub fn create_rule(&mut self, selector: &str) -> Result<NodeId, ModelError> {
        non_empty(selector, NodeKind::Selector)?;
        let n = selector.len();
        let selector = self.alloc(0, n, NodeData::Selector(selector.into()));
        let left_brace = self.alloc(n + 1, 1, NodeData::LeftBrace);
        let right_brace = self.alloc(n + 2, 1, NodeData::RightBrace);
        Ok(self.alloc(
            0,
            n + 3,
            NodeData::Rule {
                selector,
                left_brace,
                declarations: Vec::new(),
                right_brace,
            },
        ))
    }

    /// A detached declaration laid out as `property: value;`
    pub fn create_declaration(&mut self, property: &str, value: &str) -> Result<NodeId, ModelError> {
        non_empty(property, NodeKind::Property)?;
        non_empty(value, NodeKind::Value)?;
        let p = property.len();
        let v = value.len();
        let property = self.alloc(0, p, NodeData::Property(property.into()));
        let colon = self.alloc(p, 1, NodeData::Colon);
        let value = self.alloc(p + 2, v, NodeData::Value(value.into()));
        let semicolon = self.alloc(p + 2 + v, 1, NodeData::SemiColon);
        Ok(self.alloc(
            0,
            p + v + 3,
            NodeData::Declaration {
                property,
                colon,
                value,
                semicolon: Some(semicolon),
            },
        ))
    }

    /// A detached charset laid out as `@charset "encoding";`
    pub fn create_charset(&mut self, encoding: &str) -> Result<NodeId, ModelError> {
        non_empty(encoding, NodeKind::String)?;
        let quoted = SmolStr::from(format!("\"{encoding}\""));
        let q = quoted.len();
        let string = self.alloc(CHARSET_PREFIX_LEN, q, NodeData::String(quoted));
        let semicolon = self.alloc(CHARSET_PREFIX_LEN + q, 1, NodeData::SemiColon);
        Ok(self.alloc(
            0,
            CHARSET_PREFIX_LEN + q + 1,
            NodeData::Charset { string, semicolon },
        ))
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a detached rule
    pub fn add_rule(&mut self, rule: NodeId) -> Result<(), ModelError> {
        self.insert_rule(self.rules.len(), rule)
    }

    pub fn insert_rule(&mut self, index: usize, rule: NodeId) -> Result<(), ModelError> {
        self.check_mutable()?;
        self.check_detached(rule, NodeKind::Rule)?;
        check_index(index, self.rules.len())?;

        trace!(%rule, index, "insert rule");
        self.rules.insert(index, rule);
        self.nodes[rule.index()].parent = Some(NodeId::ROOT);
        if let Err(err) = self.dispatch(&ModelEvent::Insert { node: rule }) {
            self.rules.retain(|&r| r != rule);
            self.nodes[rule.index()].parent = None;
            return Err(err);
        }
        Ok(())
    }

    pub fn remove_rule(&mut self, rule: NodeId) -> Result<(), ModelError> {
        self.check_mutable()?;
        self.check_kind(rule, NodeKind::Rule)?;
        let index = self
            .rules
            .iter()
            .position(|&r| r == rule)
            .ok_or(ModelError::NotAttached(rule))?;

        trace!(%rule, index, "remove rule");
        self.rules.remove(index);
        self.nodes[rule.index()].parent = None;
        let event = ModelEvent::Remove {
            node: rule,
            parent: NodeId::ROOT,
        };
        if let Err(err) = self.dispatch(&event) {
            self.rules.insert(index, rule);
            self.nodes[rule.index()].parent = Some(NodeId::ROOT);
            return Err(err);
        }
        Ok(())
    }

    /// Install `charset`, returning the one it replaced
    ///
    /// Replacing is a removal followed by an insertion, two events.
    pub fn set_charset(&mut self, charset: NodeId) -> Result<Option<NodeId>, ModelError> {
        self.check_mutable()?;
        self.check_detached(charset, NodeKind::Charset)?;
        let previous = self.remove_charset()?;

        trace!(%charset, "set charset");
        self.charset = Some(charset);
        self.nodes[charset.index()].parent = Some(NodeId::ROOT);
        if let Err(err) = self.dispatch(&ModelEvent::Insert { node: charset }) {
            self.charset = None;
            self.nodes[charset.index()].parent = None;
            return Err(err);
        }
        Ok(previous)
    }

    pub fn remove_charset(&mut self) -> Result<Option<NodeId>, ModelError> {
        self.check_mutable()?;
        let Some(charset) = self.charset.take() else {
            return Ok(None);
        };

        trace!(%charset, "remove charset");
        self.nodes[charset.index()].parent = None;
        let event = ModelEvent::Remove {
            node: charset,
            parent: NodeId::ROOT,
        };
        if let Err(err) = self.dispatch(&event) {
            self.charset = Some(charset);
            self.nodes[charset.index()].parent = Some(NodeId::ROOT);
            return Err(err);
        }
        Ok(Some(charset))
    }

    /// Append a detached declaration to `rule`
    pub fn add_declaration(&mut self, rule: NodeId, declaration: NodeId) -> Result<(), ModelError> {
        let len = self.declarations(rule).len();
        self.insert_declaration(rule, len, declaration)
    }

    pub fn insert_declaration(
        &mut self,
        rule: NodeId,
        index: usize,
        declaration: NodeId,
    ) -> Result<(), ModelError> {
        self.check_mutable()?;
        self.check_kind(rule, NodeKind::Rule)?;
        self.check_detached(declaration, NodeKind::Declaration)?;
        check_index(index, self.declarations(rule).len())?;

        trace!(%rule, %declaration, index, "insert declaration");
        if let NodeData::Rule { declarations, .. } = &mut self.nodes[rule.index()].data {
            declarations.insert(index, declaration);
        }
        self.nodes[declaration.index()].parent = Some(rule);
        if let Err(err) = self.dispatch(&ModelEvent::Insert { node: declaration }) {
            if let NodeData::Rule { declarations, .. } = &mut self.nodes[rule.index()].data {
                declarations.retain(|&d| d != declaration);
            }
            self.nodes[declaration.index()].parent = None;
            return Err(err);
        }
        Ok(())
    }

    pub fn remove_declaration(&mut self, declaration: NodeId) -> Result<(), ModelError> {
        self.check_mutable()?;
        self.check_kind(declaration, NodeKind::Declaration)?;
        let rule = self
            .parent(declaration)
            .ok_or(ModelError::NotAttached(declaration))?;
        let index = self
            .index_of(declaration)
            .ok_or(ModelError::NotAttached(declaration))?;

        trace!(%rule, %declaration, index, "remove declaration");
        if let NodeData::Rule { declarations, .. } = &mut self.nodes[rule.index()].data {
            declarations.remove(index);
        }
        self.nodes[declaration.index()].parent = None;
        let event = ModelEvent::Remove {
            node: declaration,
            parent: rule,
        };
        if let Err(err) = self.dispatch(&event) {
            if let NodeData::Rule { declarations, .. } = &mut self.nodes[rule.index()].data {
                declarations.insert(index, declaration);
            }
            self.nodes[declaration.index()].parent = Some(rule);
            return Err(err);
        }
        Ok(())
    }

    /// Change the value of a leaf; setting the current value is a no-op
    pub fn set_value(&mut self, leaf: NodeId, value: &str) -> Result<(), ModelError> {
        self.check_mutable()?;
        let kind = self.get(leaf).ok_or(ModelError::UnknownNode(leaf))?.kind();
        if !kind.is_leaf() {
            return Err(ModelError::NotALeaf { node: leaf, kind });
        }
        non_empty(value, kind)?;
        if self.value(leaf) == Some(value) {
            return Ok(());
        }

        let new = SmolStr::from(value);
        let old = self.replace_value(leaf, new.clone());
        trace!(%leaf, %old, %new, "change value");
        let event = ModelEvent::Change {
            node: leaf,
            old: old.clone(),
            new,
        };
        if let Err(err) = self.dispatch(&event) {
            self.replace_value(leaf, old);
            return Err(err);
        }
        Ok(())
    }

    // ========================================================================
    // Listener
    // ========================================================================

    /// Register the single change listener
    pub fn set_listener(
        &mut self,
        listener: Rc<RefCell<dyn ModelListener>>,
    ) -> Result<(), ModelError> {
        if self.listener.is_some() {
            return Err(ModelError::ListenerAlreadyAttached);
        }
        self.listener = Some(listener);
        Ok(())
    }

    pub fn remove_listener(&mut self) -> Option<Rc<RefCell<dyn ModelListener>>> {
        self.listener.take()
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    fn dispatch(&mut self, event: &ModelEvent) -> Result<(), ModelError> {
        let Some(listener) = self.listener.clone() else {
            return Ok(());
        };
        let Ok(mut listener) = listener.try_borrow_mut() else {
            return Err(ModelError::ReentrantMutation);
        };
        self.dispatching = true;
        let result = listener.model_changed(self, event);
        self.dispatching = false;
        result
    }

    fn check_mutable(&self) -> Result<(), ModelError> {
        if self.dispatching {
            return Err(ModelError::ReentrantMutation);
        }
        Ok(())
    }

    fn check_kind(&self, id: NodeId, expected: NodeKind) -> Result<(), ModelError> {
        let found = self.get(id).ok_or(ModelError::UnknownNode(id))?.kind();
        if found != expected {
            return Err(ModelError::unexpected_kind(id, expected, found));
        }
        Ok(())
    }

    fn check_detached(&self, id: NodeId, expected: NodeKind) -> Result<(), ModelError> {
        self.check_kind(id, expected)?;
        if self.parent(id).is_some() {
            return Err(ModelError::AlreadyAttached(id));
        }
        Ok(())
    }

    fn replace_value(&mut self, leaf: NodeId, value: SmolStr) -> SmolStr {
        match self.nodes[leaf.index()].data.value_mut() {
            Some(slot) => std::mem::replace(slot, value),
            None => value,
        }
    }

    // ========================================================================
    // Crate-internal building and fixup
    // ========================================================================

    /// Allocate a node and adopt the children named in `data`
    pub(crate) fn alloc(&mut self, offset: usize, length: usize, data: NodeData) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        for n in 0..data.child_count() {
            if let Some(child) = data.nth_child(n) {
                self.nodes[child.index()].parent = Some(id);
            }
        }
        self.nodes.push(Node::new(offset, length, data));
        id
    }

    pub(crate) fn set_span(&mut self, id: NodeId, offset: usize, length: usize) {
        let node = &mut self.nodes[id.index()];
        node.offset = offset;
        node.length = length;
    }

    pub(crate) fn push_error(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    /// Link a parsed rule without notifying anyone
    pub(crate) fn push_rule_silently(&mut self, rule: NodeId) {
        self.rules.push(rule);
        self.nodes[rule.index()].parent = Some(NodeId::ROOT);
    }

    pub(crate) fn set_charset_silently(&mut self, charset: NodeId) {
        self.charset = Some(charset);
        self.nodes[charset.index()].parent = Some(NodeId::ROOT);
    }

    /// Swap `old` for `new` in the rule list without notifying anyone
    pub(crate) fn replace_rule_silently(&mut self, old: NodeId, new: NodeId) -> Result<(), ModelError> {
        self.check_mutable()?;
        self.check_kind(old, NodeKind::Rule)?;
        self.check_detached(new, NodeKind::Rule)?;
        let index = self
            .rules
            .iter()
            .position(|&r| r == old)
            .ok_or(ModelError::NotAttached(old))?;
        self.rules[index] = new;
        self.nodes[old.index()].parent = None;
        self.nodes[new.index()].parent = Some(NodeId::ROOT);
        Ok(())
    }

    /// Replace the rule order; `rules` must be a permutation of the current rules
    pub(crate) fn reorder_rules_silently(&mut self, rules: Vec<NodeId>) {
        debug_assert_eq!(rules.len(), self.rules.len());
        self.rules = rules;
    }

    /// Synthesize a `;` at `offset` for a declaration that lacks one
    pub(crate) fn attach_semicolon(&mut self, declaration: NodeId, offset: usize) -> Option<NodeId> {
        if self.semicolon(declaration).is_some() {
            return None;
        }
        let semicolon = self.alloc(offset, 1, NodeData::SemiColon);
        self.nodes[semicolon.index()].parent = Some(declaration);
        let node = &mut self.nodes[declaration.index()];
        if let NodeData::Declaration { semicolon: slot, .. } = &mut node.data {
            *slot = Some(semicolon);
        }
        node.length = offset + 1 - node.offset;
        Some(semicolon)
    }

    /// Deep-copy the subtree at `node` of `source` into this arena, detached
    pub(crate) fn graft(&mut self, source: &Document, node: NodeId) -> NodeId {
        let src = source.node(node);
        let data = match &src.data {
            NodeData::Charset { string, semicolon } => NodeData::Charset {
                string: self.graft(source, *string),
                semicolon: self.graft(source, *semicolon),
            },
            NodeData::Rule {
                selector,
                left_brace,
                declarations,
                right_brace,
            } => NodeData::Rule {
                selector: self.graft(source, *selector),
                left_brace: self.graft(source, *left_brace),
                declarations: declarations
                    .iter()
                    .map(|&d| self.graft(source, d))
                    .collect(),
                right_brace: self.graft(source, *right_brace),
            },
            NodeData::Declaration {
                property,
                colon,
                value,
                semicolon,
            } => NodeData::Declaration {
                property: self.graft(source, *property),
                colon: self.graft(source, *colon),
                value: self.graft(source, *value),
                semicolon: semicolon.map(|s| self.graft(source, s)),
            },
            other => other.clone(),
        };
        self.alloc(src.offset, src.length, data)
    }

    /// Apply `transform` to every attached node except the subtree at `exclude`
    pub(crate) fn fixup(
        &mut self,
        exclude: Option<NodeId>,
        transform: &impl Fn(usize, usize) -> (usize, usize),
    ) {
        self.for_each_post_order(NodeId::ROOT, exclude, &mut |node| {
            (node.offset, node.length) = transform(node.offset, node.length);
        });
    }

    /// Shift the subtree at `id` by `delta` bytes
    pub(crate) fn relocate(&mut self, id: NodeId, delta: isize) {
        self.for_each_post_order(id, None, &mut |node| {
            node.offset = node.offset.saturating_add_signed(delta);
        });
    }

    fn for_each_post_order(
        &mut self,
        id: NodeId,
        exclude: Option<NodeId>,
        f: &mut impl FnMut(&mut Node),
    ) {
        if Some(id) == exclude {
            return;
        }
        let mut n = 0;
        while let Some(child) = self.nth_child(id, n) {
            self.for_each_post_order(child, exclude, f);
            n += 1;
        }
        f(&mut self.nodes[id.index()]);
    }
}

fn non_empty(value: &str, kind: NodeKind) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::EmptyValue { kind });
    }
    Ok(())
}

fn check_index(index: usize, len: usize) -> Result<(), ModelError> {
    if index > len {
        return Err(ModelError::IndexOutOfBounds { index, len });
    }
    Ok(())
}
