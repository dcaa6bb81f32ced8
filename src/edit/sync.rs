//! Keeping the text buffer in step with the document.
//!
//! [`BufferSync`] is the model listener installed by an edit context. For
//! every mutation it works out the textual patch (placement, indentation,
//! line endings), applies it to the buffer and re-derives node offsets.

use tracing::{debug, trace};

use super::options::EditOptions;
use crate::base::{BufferError, TextBuffer};
use crate::syntax::{Document, ModelError, ModelEvent, ModelListener, NodeId, NodeKind};

/// Byte length of `@charset `
const CHARSET_KEYWORD_LEN: usize = "@charset ".len();

/// Position of a node after `[start, old_end)` was replaced by `new_len` bytes
///
/// Nodes before the region stay, nodes after it move, nodes enclosing it
/// grow or shrink. A zero-length node sitting at an insertion point takes
/// the inserted text.
pub(crate) fn shift(
    start: usize,
    old_end: usize,
    new_len: usize,
    offset: usize,
    length: usize,
) -> (usize, usize) {
    let end = offset + length;
    let new_end = start + new_len;
    let old_len = old_end - start;

    if length == 0 && offset == start && new_len > old_len {
        return (offset, new_len - old_len);
    }
    if end <= start {
        return (offset, length);
    }
    if offset >= old_end {
        return (offset - old_end + new_end, length);
    }
    if offset <= start && end >= old_end {
        return (offset, end - old_end + new_end - offset);
    }
    // Partial overlap: the part inside the region is gone
    let map = |p: usize, inside: usize| {
        if p <= start {
            p
        } else if p >= old_end {
            p - old_end + new_end
        } else {
            inside
        }
    };
    let new_offset = map(offset, new_end);
    let new_end_of_node = map(end, start).max(new_offset);
    (new_offset, new_end_of_node - new_offset)
}

/// Owns the text buffer and mirrors document mutations into it
pub(crate) struct BufferSync {
    buffer: Box<dyn TextBuffer>,
    options: EditOptions,
}

impl BufferSync {
    pub(crate) fn new(buffer: Box<dyn TextBuffer>, options: EditOptions) -> Self {
        Self { buffer, options }
    }

    pub(crate) fn buffer(&self) -> &dyn TextBuffer {
        self.buffer.as_ref()
    }

    pub(crate) fn options(&self) -> &EditOptions {
        &self.options
    }

    /// Replace `[start, start + old_len)` with `text` and fix up every node
    /// outside `exclude`
    pub(crate) fn replace(
        &mut self,
        doc: &mut Document,
        start: usize,
        old_len: usize,
        text: &str,
        exclude: Option<NodeId>,
    ) -> Result<(), BufferError> {
        self.buffer.replace(start, old_len, text)?;
        let new_len = text.len();
        trace!(start, old_len, new_len, "replaced text");
        if new_len != old_len {
            let old_end = start + old_len;
            doc.fixup(exclude, &|offset, length| {
                shift(start, old_end, new_len, offset, length)
            });
        }
        doc.set_span(NodeId::ROOT, 0, self.buffer.len());
        Ok(())
    }

    // ========================================================================
    // Text inspection
    // ========================================================================

    /// Line delimiter of the line at `offset`, or of the nearest line above
    /// that has one
    pub(crate) fn eol(&self, offset: usize) -> String {
        if let Ok(line) = self.buffer.line_of_offset(offset) {
            for line in (0..=line).rev() {
                if let Ok(Some(delimiter)) = self.buffer.line_delimiter(line) {
                    return delimiter.to_string();
                }
            }
        }
        self.options.default_eol.clone()
    }

    /// Blanks between the start of the line and `offset`, if only blanks are there
    pub(crate) fn line_indent(&self, offset: usize) -> String {
        let text = self.buffer.get();
        let bytes = text.as_bytes();
        let offset = offset.min(bytes.len());
        let mut start = offset;
        while start > 0 && is_blank(bytes[start - 1]) {
            start -= 1;
        }
        if start == 0 || is_line_break(bytes[start - 1]) {
            text[start..offset].to_string()
        } else {
            String::new()
        }
    }

    /// Widen a removal backwards over blanks, not past a line break
    pub(crate) fn begin_of_remove(&self, mut begin: usize) -> usize {
        let bytes = self.buffer.get().as_bytes();
        while begin > 0 && is_blank(bytes[begin - 1]) {
            begin -= 1;
        }
        begin
    }

    /// Widen a removal forwards over blanks, then over a run of line breaks
    pub(crate) fn end_of_remove(&self, mut end: usize) -> usize {
        let bytes = self.buffer.get().as_bytes();
        while end < bytes.len() && is_blank(bytes[end]) {
            end += 1;
        }
        while end < bytes.len() && is_line_break(bytes[end]) {
            end += 1;
        }
        end
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    fn remove_node(&mut self, doc: &mut Document, node: NodeId) -> Result<(), ModelError> {
        let (offset, end) = {
            let node = doc.node(node);
            (node.offset(), node.end())
        };
        let begin = self.begin_of_remove(offset);
        let end = self.end_of_remove(end);
        debug!(%node, begin, end, "remove text");
        self.replace(doc, begin, end - begin, "", None)?;
        Ok(())
    }

    fn change_value(&mut self, doc: &mut Document, leaf: NodeId, value: &str) -> Result<(), ModelError> {
        let (offset, length) = {
            let node = doc.node(leaf);
            (node.offset(), node.length())
        };
        debug!(%leaf, offset, length, value, "change text");
        self.replace(doc, offset, length, value, None)?;
        Ok(())
    }

    /// `@charset "...";` plus a line break, at the very start
    fn insert_charset(&mut self, doc: &mut Document, charset: NodeId) -> Result<(), ModelError> {
        let (Some(string), Some(semicolon)) = (doc.string(charset), doc.semicolon(charset)) else {
            return Ok(());
        };
        let value = doc.value(string).unwrap_or_default().to_string();
        let eol = self.eol(0);
        let text = format!("@charset {value};{eol}");
        debug!(%charset, "insert charset");
        self.replace(doc, 0, 0, &text, Some(charset))?;

        let string_start = CHARSET_KEYWORD_LEN;
        let semicolon_start = string_start + value.len();
        doc.set_span(string, string_start, value.len());
        doc.set_span(semicolon, semicolon_start, 1);
        doc.set_span(charset, 0, semicolon_start + 1);
        Ok(())
    }

    /// `selector {EOL<indent>}` after the previous rule, or first in the sheet
    fn insert_rule(&mut self, doc: &mut Document, rule: NodeId) -> Result<(), ModelError> {
        let (Some(index), Some(selector), Some(left_brace), Some(right_brace)) = (
            doc.index_of(rule),
            doc.selector(rule),
            doc.left_brace(rule),
            doc.right_brace(rule),
        ) else {
            return Ok(());
        };
        let selector_text = doc.value(selector).unwrap_or_default().to_string();

        let previous = index.checked_sub(1).and_then(|i| doc.rule(i));
        let (pos, lead, body, trail) = match previous {
            None => {
                let (pos, lead) = self.first_rule_position(doc);
                let eol = self.eol(pos);
                (pos, lead, eol.clone(), eol)
            }
            Some(previous) => {
                let (offset, end) = {
                    let previous = doc.node(previous);
                    (previous.offset(), previous.end())
                };
                let prefix = self.eol(end) + &self.line_indent(offset);
                (end, prefix.clone(), prefix, String::new())
            }
        };
        let text = format!("{lead}{selector_text} {{{body}}}{trail}");
        debug!(%rule, index, pos, "insert rule");
        self.replace(doc, pos, 0, &text, Some(rule))?;

        let start = pos + lead.len();
        let left = start + selector_text.len() + 1;
        let right = left + 1 + body.len();
        doc.set_span(selector, start, selector_text.len());
        doc.set_span(left_brace, left, 1);
        doc.set_span(right_brace, right, 1);
        doc.set_span(rule, start, right + 1 - start);

        // Declarations added while the rule was detached. On failure the
        // rule's text is taken out again and the document rolls back
        let declarations = doc.declarations(rule).to_vec();
        for declaration in declarations {
            if let Err(err) = self.insert_declaration(doc, declaration) {
                let end = doc.node(rule).end() + trail.len();
                debug!(%rule, pos, end, "undo rule text");
                self.replace(doc, pos, end - pos, "", Some(rule))?;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Where the first rule goes: the top, or the line after the charset
    fn first_rule_position(&self, doc: &Document) -> (usize, String) {
        let Some(charset) = doc.charset() else {
            return (0, String::new());
        };
        let end = doc.node(charset).end();
        let rest = &self.buffer.get()[end..];
        let eol_len = if rest.starts_with("\r\n") {
            2
        } else if rest.starts_with(['\n', '\r']) {
            1
        } else {
            0
        };
        if eol_len > 0 {
            (end + eol_len, String::new())
        } else {
            (end, self.eol(end))
        }
    }

    /// `EOL<indent>property: value;` after `{` or the previous declaration
    fn insert_declaration(&mut self, doc: &mut Document, declaration: NodeId) -> Result<(), ModelError> {
        let (Some(rule), Some(index)) = (doc.parent(declaration), doc.index_of(declaration)) else {
            return Ok(());
        };
        let (Some(property), Some(colon), Some(value)) = (
            doc.property(declaration),
            doc.colon(declaration),
            doc.value_node(declaration),
        ) else {
            return Ok(());
        };
        let property_text = doc.value(property).unwrap_or_default().to_string();
        let value_text = doc.value(value).unwrap_or_default().to_string();
        let indent = self.line_indent(doc.node(rule).offset()) + &self.options.indent(1);

        let previous = index.checked_sub(1).and_then(|i| doc.declaration(rule, i));
        let mut pos = match previous {
            None => match doc.left_brace(rule) {
                Some(left_brace) => doc.node(left_brace).end(),
                None => return Ok(()),
            },
            Some(previous) => {
                let end = doc.node(previous).end();
                if doc.semicolon(previous).is_none() {
                    trace!(%previous, end, "terminate previous declaration");
                    self.replace(doc, end, 0, ";", Some(declaration))?;
                    doc.attach_semicolon(previous, end);
                    end + 1
                } else {
                    end
                }
            }
        };

        let prefix = self.eol(pos) + &indent;
        let text = format!("{prefix}{property_text}: {value_text};");
        debug!(%declaration, index, pos, "insert declaration");
        self.replace(doc, pos, 0, &text, Some(declaration))?;

        pos += prefix.len();
        let start = pos;
        doc.set_span(property, pos, property_text.len());
        pos += property_text.len();
        doc.set_span(colon, pos, 1);
        pos += 2;
        doc.set_span(value, pos, value_text.len());
        pos += value_text.len();
        doc.set_span(declaration, start, pos - start);
        match doc.semicolon(declaration) {
            Some(semicolon) => {
                doc.set_span(semicolon, pos, 1);
                doc.set_span(declaration, start, pos + 1 - start);
            }
            None => {
                doc.attach_semicolon(declaration, pos);
            }
        }
        Ok(())
    }
}

impl ModelListener for BufferSync {
    fn model_changed(&mut self, document: &mut Document, event: &ModelEvent) -> Result<(), ModelError> {
        match event {
            ModelEvent::Change { node, new, .. } => {
                if document.is_attached(*node) {
                    self.change_value(document, *node, new)?;
                }
            }
            ModelEvent::Insert { node } => {
                if !document.is_attached(*node) {
                    return Ok(());
                }
                match document.kind(*node) {
                    NodeKind::Charset => self.insert_charset(document, *node)?,
                    NodeKind::Rule => self.insert_rule(document, *node)?,
                    NodeKind::Declaration => self.insert_declaration(document, *node)?,
                    _ => {}
                }
            }
            ModelEvent::Remove { node, parent } => {
                if document.is_attached(*parent) {
                    self.remove_node(document, *node)?;
                }
            }
        }
        Ok(())
    }
}

fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}

fn is_line_break(byte: u8) -> bool {
    matches!(byte, b'\r' | b'\n')
}
