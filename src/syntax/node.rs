//! Arena nodes.
//!
//! Every node lives in its [`Document`](super::Document)'s arena and is
//! addressed by a [`NodeId`]. Offsets are byte offsets into the edited text.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

/// Index of a node in its document's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The document node, always the first slot of the arena
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The shape of a node, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Charset,
    Rule,
    Declaration,
    Selector,
    Property,
    Value,
    String,
    LeftBrace,
    RightBrace,
    Colon,
    SemiColon,
}

impl NodeKind {
    /// Leaves carry a text value that mirrors the buffer
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            Self::Selector | Self::Property | Self::Value | Self::String
        )
    }

    /// Punctuation markers, always one byte long
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            Self::LeftBrace | Self::RightBrace | Self::Colon | Self::SemiColon
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Charset => "Charset",
            Self::Rule => "Rule",
            Self::Declaration => "Declaration",
            Self::Selector => "Selector",
            Self::Property => "Property",
            Self::Value => "Value",
            Self::String => "String",
            Self::LeftBrace => "LeftBrace",
            Self::RightBrace => "RightBrace",
            Self::Colon => "Colon",
            Self::SemiColon => "SemiColon",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node payload: child links for composites, the cached value for leaves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The root; its charset and rules are held by the document itself
    Document,
    Charset {
        string: NodeId,
        semicolon: NodeId,
    },
    Rule {
        selector: NodeId,
        left_brace: NodeId,
        declarations: Vec<NodeId>,
        right_brace: NodeId,
    },
    Declaration {
        property: NodeId,
        colon: NodeId,
        value: NodeId,
        semicolon: Option<NodeId>,
    },
    Selector(SmolStr),
    Property(SmolStr),
    Value(SmolStr),
    /// Quoted string, quotes included
    String(SmolStr),
    LeftBrace,
    RightBrace,
    Colon,
    SemiColon,
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Document => NodeKind::Document,
            Self::Charset { .. } => NodeKind::Charset,
            Self::Rule { .. } => NodeKind::Rule,
            Self::Declaration { .. } => NodeKind::Declaration,
            Self::Selector(_) => NodeKind::Selector,
            Self::Property(_) => NodeKind::Property,
            Self::Value(_) => NodeKind::Value,
            Self::String(_) => NodeKind::String,
            Self::LeftBrace => NodeKind::LeftBrace,
            Self::RightBrace => NodeKind::RightBrace,
            Self::Colon => NodeKind::Colon,
            Self::SemiColon => NodeKind::SemiColon,
        }
    }

    /// Leaf value, `None` for composites and markers
    pub fn value(&self) -> Option<&SmolStr> {
        match self {
            Self::Selector(v) | Self::Property(v) | Self::Value(v) | Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut SmolStr> {
        match self {
            Self::Selector(v) | Self::Property(v) | Self::Value(v) | Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// The `n`-th child in source order (never any for the root)
    pub fn nth_child(&self, n: usize) -> Option<NodeId> {
        match self {
            Self::Charset { string, semicolon } => [*string, *semicolon].get(n).copied(),
            Self::Rule {
                selector,
                left_brace,
                declarations,
                right_brace,
            } => match n {
                0 => Some(*selector),
                1 => Some(*left_brace),
                _ if n - 2 < declarations.len() => Some(declarations[n - 2]),
                _ if n - 2 == declarations.len() => Some(*right_brace),
                _ => None,
            },
            Self::Declaration {
                property,
                colon,
                value,
                semicolon,
            } => match n {
                0 => Some(*property),
                1 => Some(*colon),
                2 => Some(*value),
                3 => *semicolon,
                _ => None,
            },
            _ => None,
        }
    }

    pub fn child_count(&self) -> usize {
        match self {
            Self::Charset { .. } => 2,
            Self::Rule { declarations, .. } => declarations.len() + 3,
            Self::Declaration { semicolon, .. } => 3 + usize::from(semicolon.is_some()),
            _ => 0,
        }
    }
}

/// A node: its place in the text and its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) offset: usize,
    pub(crate) length: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(offset: usize, length: usize, data: NodeData) -> Self {
        Self {
            offset,
            length,
            parent: None,
            data,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn range(&self) -> TextRange {
        TextRange::at(
            TextSize::new(self.offset as u32),
            TextSize::new(self.length as u32),
        )
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn value(&self) -> Option<&str> {
        self.data.value().map(SmolStr::as_str)
    }
}
