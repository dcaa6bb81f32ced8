//! The edit context: one document, one private buffer, one storage.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use tracing::debug;

use super::error::EditError;
use super::options::EditOptions;
use super::storage::Storage;
use super::sync::BufferSync;
use crate::base::{LineBuffer, LineIndex, Span, TextBuffer};
use crate::parser::parse;
use crate::syntax::{Document, ModelError, NodeId};

/// Binds a [`Document`] to the text it was parsed from.
///
/// Every mutation made through [`document_mut`](Self::document_mut) is
/// mirrored into the private buffer with the smallest textual patch, and
/// node offsets are kept in step. The buffer goes back to storage only on
/// [`commit`](Self::commit).
///
/// ```
/// use cssedit::edit::EditContext;
///
/// let mut ctx = EditContext::from_text("a {\n\tcolor: red;\n}\n").unwrap();
/// let rule = ctx.document().rule(0).unwrap();
/// let doc = ctx.document_mut();
/// let decl = doc.create_declaration("margin", "0").unwrap();
/// doc.add_declaration(rule, decl).unwrap();
/// assert_eq!(ctx.text(), "a {\n\tcolor: red;\n\tmargin: 0;\n}\n");
/// ```
pub struct EditContext {
    document: Document,
    sync: Rc<RefCell<BufferSync>>,
    storage: Option<Box<dyn Storage>>,
    connected: bool,
}

impl EditContext {
    /// Connect to `storage` and parse its content
    pub fn connect(storage: impl Storage + 'static) -> Result<Self, EditError> {
        Self::connect_with_options(storage, EditOptions::default())
    }

    pub fn connect_with_options(
        mut storage: impl Storage + 'static,
        options: EditOptions,
    ) -> Result<Self, EditError> {
        let text = storage.connect()?;
        let mut ctx = Self::attach(Box::new(LineBuffer::new(text)), options)?;
        ctx.storage = Some(Box::new(storage));
        Ok(ctx)
    }

    /// A context over a buffer with no storage behind it
    pub fn new(buffer: impl TextBuffer + 'static) -> Result<Self, EditError> {
        Self::with_options(buffer, EditOptions::default())
    }

    pub fn with_options(
        buffer: impl TextBuffer + 'static,
        options: EditOptions,
    ) -> Result<Self, EditError> {
        Self::attach(Box::new(buffer), options)
    }

    pub fn from_text(text: &str) -> Result<Self, EditError> {
        Self::new(LineBuffer::new(text))
    }

    fn attach(buffer: Box<dyn TextBuffer>, options: EditOptions) -> Result<Self, EditError> {
        let mut document = parse(buffer.get());
        debug!(
            len = buffer.len(),
            rules = document.rules().len(),
            errors = document.errors().len(),
            "attach edit context"
        );
        let sync = Rc::new(RefCell::new(BufferSync::new(buffer, options)));
        document.set_listener(sync.clone())?;
        Ok(Self {
            document,
            sync,
            storage: None,
            connected: true,
        })
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The document for mutation; changes are mirrored while connected
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The whole buffer
    pub fn text(&self) -> String {
        self.sync.borrow().buffer().get().to_string()
    }

    /// `length` bytes of the buffer starting at `offset`
    pub fn text_range(&self, offset: usize, length: usize) -> Result<String, EditError> {
        Ok(self.sync.borrow().buffer().get_range(offset, length)?.to_string())
    }

    /// Source text of a node
    pub fn node_text(&self, node: NodeId) -> Result<String, EditError> {
        let node = self.document.get(node).ok_or(ModelError::UnknownNode(node))?;
        self.text_range(node.offset(), node.length())
    }

    /// Line/column span of a node in the current text
    pub fn span(&self, node: NodeId) -> Option<Span> {
        let range = self.document.get(node)?.range();
        let sync = self.sync.borrow();
        LineIndex::new(sync.buffer().get()).span(range)
    }

    /// Line/column spans of the syntax errors found when parsing
    ///
    /// Errors are not fixed up by edits, so these are only meaningful
    /// before the first mutation.
    pub fn error_spans(&self) -> Vec<Span> {
        let sync = self.sync.borrow();
        let index = LineIndex::new(sync.buffer().get());
        self.document
            .errors()
            .iter()
            .filter_map(|error| index.span(error.range))
            .collect()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Swap `old` for the single rule parsed from `source`, returning the new rule
    ///
    /// `source` replaces the text of `old` verbatim.
    pub fn replace_rule(&mut self, old: NodeId, source: &str) -> Result<NodeId, EditError> {
        self.check_connected()?;
        let parsed = parse(source);
        let rule = match (parsed.rules(), parsed.charset()) {
            ([rule], None) => *rule,
            _ => {
                return Err(EditError::invalid_argument(
                    "Exactly one rule expected in source.",
                ));
            }
        };
        let (offset, length) = {
            let node = self.document.get(old).ok_or(ModelError::UnknownNode(old))?;
            (node.offset(), node.length())
        };

        let new = self.document.graft(&parsed, rule);
        self.document.replace_rule_silently(old, new)?;
        let replaced = self
            .sync
            .borrow_mut()
            .replace(&mut self.document, offset, length, source, Some(new));
        if let Err(err) = replaced {
            self.document.replace_rule_silently(new, old)?;
            return Err(err.into());
        }
        self.document.relocate(new, signed(offset));
        debug!(%old, %new, offset, "replaced rule");
        Ok(new)
    }

    /// Reorder the rules by `compare`, moving their text as-is
    ///
    /// The rules are written back to back, separated by blank lines as
    /// configured. Text before the first rule and after the last one stays.
    pub fn sort_rules_by(
        &mut self,
        mut compare: impl FnMut(&Document, NodeId, NodeId) -> Ordering,
    ) -> Result<(), EditError> {
        self.check_connected()?;
        let rules = self.document.rules().to_vec();
        let (Some(&first), Some(&last)) = (rules.first(), rules.last()) else {
            return Ok(());
        };
        let mut sorted = rules.clone();
        sorted.sort_by(|&a, &b| compare(&self.document, a, b));

        let start = self.document.node(first).offset();
        let end = self.document.node(last).end();
        let mut sync = self.sync.borrow_mut();
        let separator = sync.options().rule_separator(&sync.eol(start));

        let mut text = String::with_capacity(end - start);
        let mut moves = Vec::with_capacity(sorted.len());
        for (i, &rule) in sorted.iter().enumerate() {
            if i > 0 {
                text.push_str(&separator);
            }
            let node = self.document.node(rule);
            let source = sync.buffer().get_range(node.offset(), node.length())?;
            moves.push((rule, signed(start + text.len()) - signed(node.offset())));
            text.push_str(source);
        }

        sync.replace(&mut self.document, start, end - start, &text, Some(NodeId::ROOT))?;
        drop(sync);
        self.document.reorder_rules_silently(sorted);
        for (rule, delta) in moves {
            self.document.relocate(rule, delta);
        }
        debug!(rules = rules.len(), start, "sorted rules");
        Ok(())
    }

    /// Sort rules by selector text
    pub fn sort_rules_by_selector(&mut self) -> Result<(), EditError> {
        self.sort_rules_by(|doc, a, b| selector_text(doc, a).cmp(selector_text(doc, b)))
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Write the buffer back to storage
    ///
    /// A context without storage has nothing to write to; this is a no-op.
    pub fn commit(&mut self) -> Result<(), EditError> {
        self.check_connected()?;
        let text = self.text();
        if let Some(storage) = self.storage.as_mut() {
            storage.commit(&text)?;
            debug!(len = text.len(), "committed");
        }
        Ok(())
    }

    /// Release the storage and stop mirroring document changes
    ///
    /// Calling this twice is harmless.
    pub fn disconnect(&mut self) -> Result<(), EditError> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        self.document.remove_listener();
        if let Some(storage) = self.storage.as_mut() {
            storage.disconnect()?;
        }
        debug!("disconnected");
        Ok(())
    }

    fn check_connected(&self) -> Result<(), EditError> {
        if !self.connected {
            return Err(EditError::Disconnected);
        }
        Ok(())
    }
}

impl std::fmt::Debug for EditContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditContext")
            .field("document", &self.document)
            .field("storage", &self.storage.is_some())
            .field("connected", &self.connected)
            .finish()
    }
}

fn selector_text(doc: &Document, rule: NodeId) -> &str {
    doc.selector(rule)
        .and_then(|selector| doc.value(selector))
        .unwrap_or_default()
}

/// Buffer offsets always fit in `isize`
fn signed(offset: usize) -> isize {
    offset as isize
}
