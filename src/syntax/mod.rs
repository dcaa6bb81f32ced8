//! Document model: an arena tree of charset, rules, declarations, leaf
//! strings and punctuation markers, plus change notification.

mod document;
mod event;
mod node;
mod visitor;

pub use document::Document;
pub use event::{ModelError, ModelEvent, ModelListener};
pub use node::{Node, NodeData, NodeId, NodeKind};
pub use visitor::Visitor;
