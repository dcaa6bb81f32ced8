//! Change notification for document mutations.
//!
//! Every structural mutation emits exactly one [`ModelEvent`] to the single
//! [`ModelListener`] registered on the document.

use smol_str::SmolStr;
use thiserror::Error;

use super::node::{NodeId, NodeKind};
use crate::base::BufferError;

/// A completed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// `node` was attached; it is already linked into its parent
    Insert { node: NodeId },
    /// `node` was detached from `parent`; its offsets are still the old ones
    Remove { node: NodeId, parent: NodeId },
    /// A leaf value changed from `old` to `new`
    Change {
        node: NodeId,
        old: SmolStr,
        new: SmolStr,
    },
}

impl ModelEvent {
    pub fn node(&self) -> NodeId {
        match self {
            Self::Insert { node } | Self::Remove { node, .. } | Self::Change { node, .. } => *node,
        }
    }
}

/// Observer of document mutations
///
/// The listener gets the document back mutably so it can re-derive offsets.
/// Structural mutations made from inside `model_changed` are rejected.
pub trait ModelListener {
    fn model_changed(
        &mut self,
        document: &mut super::Document,
        event: &ModelEvent,
    ) -> Result<(), ModelError>;
}

/// Failures raised by document mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("node {0} does not belong to this document")]
    UnknownNode(NodeId),

    #[error("node {node} is a {found}, expected a {expected}")]
    UnexpectedKind {
        node: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("node {node} is a {kind}, which has no value")]
    NotALeaf { node: NodeId, kind: NodeKind },

    #[error("node {0} is already attached")]
    AlreadyAttached(NodeId),

    #[error("node {0} is not attached")]
    NotAttached(NodeId),

    #[error("index {index} out of bounds (length is {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("{kind} value must not be empty")]
    EmptyValue { kind: NodeKind },

    #[error("a model listener is already attached")]
    ListenerAlreadyAttached,

    #[error("document mutated while a change was being dispatched")]
    ReentrantMutation,

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

impl ModelError {
    pub fn unexpected_kind(node: NodeId, expected: NodeKind, found: NodeKind) -> Self {
        Self::UnexpectedKind {
            node,
            expected,
            found,
        }
    }
}
