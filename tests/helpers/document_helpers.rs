//! Document assertion helpers shared by parser and edit tests.

use cssedit::EditContext;
use cssedit::syntax::{Document, NodeId, NodeKind, Visitor};

/// Render a document as one line per node, indented by depth, followed by
/// its syntax errors.
///
/// ```text
/// Document 0..5
///   Rule 0..4
///     Selector 0..1 "a"
/// error value 4..13
/// ```
pub fn dump(doc: &Document) -> String {
    let mut dumper = Dumper::default();
    doc.accept(doc.root(), &mut dumper);
    let mut out = dumper.out;
    for error in doc.errors() {
        out.push_str(&format!(
            "{} {} {}..{}\n",
            error.severity.as_str(),
            error.key(),
            error.offset(),
            error.offset() + error.length()
        ));
    }
    out
}

#[derive(Default)]
struct Dumper {
    out: String,
    depth: usize,
}

impl Dumper {
    fn line(&mut self, doc: &Document, node: NodeId) {
        let n = doc.node(node);
        self.out.push_str(&"  ".repeat(self.depth));
        self.out
            .push_str(&format!("{} {}..{}", n.kind(), n.offset(), n.end()));
        if let Some(value) = n.value() {
            self.out.push_str(&format!(" {value:?}"));
        }
        self.out.push('\n');
        self.depth += 1;
    }
}

impl Visitor for Dumper {
    fn visit_document(&mut self, doc: &Document, node: NodeId) {
        self.line(doc, node);
    }
    fn visit_charset(&mut self, doc: &Document, node: NodeId) {
        self.line(doc, node);
    }
    fn visit_rule(&mut self, doc: &Document, node: NodeId) {
        self.line(doc, node);
    }
    fn visit_declaration(&mut self, doc: &Document, node: NodeId) {
        self.line(doc, node);
    }
    fn visit_leaf(&mut self, doc: &Document, node: NodeId) {
        self.line(doc, node);
    }
    fn visit_marker(&mut self, doc: &Document, node: NodeId) {
        self.line(doc, node);
    }
    fn post_visit(&mut self, _doc: &Document, _node: NodeId) {
        self.depth -= 1;
    }
}

/// Every attached leaf and marker must read back from `text`, and every
/// child must sit inside its parent.
pub fn assert_tree_matches(doc: &Document, text: &str) {
    let root = doc.node(doc.root());
    assert_eq!(
        (root.offset(), root.length()),
        (0, text.len()),
        "root must span the whole text"
    );
    let mut checker = Checker {
        text,
        failures: Vec::new(),
    };
    doc.accept(doc.root(), &mut checker);
    assert!(
        checker.failures.is_empty(),
        "tree out of sync with text {text:?}:\n{}\n{}",
        checker.failures.join("\n"),
        dump(doc)
    );
}

struct Checker<'a> {
    text: &'a str,
    failures: Vec<String>,
}

impl Checker<'_> {
    fn expect(&mut self, doc: &Document, node: NodeId, expected: &str) {
        let n = doc.node(node);
        let actual = self.text.get(n.offset()..n.end());
        if actual != Some(expected) {
            self.failures.push(format!(
                "{} {node} at {}..{}: expected {expected:?}, found {actual:?}",
                n.kind(),
                n.offset(),
                n.end()
            ));
        }
    }

    fn contained(&mut self, doc: &Document, node: NodeId) {
        let n = doc.node(node);
        let Some(parent) = n.parent().map(|p| doc.node(p)) else {
            return;
        };
        if n.offset() < parent.offset() || n.end() > parent.end() {
            self.failures.push(format!(
                "{} {node} at {}..{} escapes its parent {}..{}",
                n.kind(),
                n.offset(),
                n.end(),
                parent.offset(),
                parent.end()
            ));
        }
    }
}

impl Visitor for Checker<'_> {
    fn visit_charset(&mut self, doc: &Document, node: NodeId) {
        self.contained(doc, node);
    }
    fn visit_rule(&mut self, doc: &Document, node: NodeId) {
        self.contained(doc, node);
    }
    fn visit_declaration(&mut self, doc: &Document, node: NodeId) {
        self.contained(doc, node);
    }
    fn visit_leaf(&mut self, doc: &Document, node: NodeId) {
        self.contained(doc, node);
        let value = doc.value(node).unwrap_or_default().to_string();
        self.expect(doc, node, &value);
    }
    fn visit_marker(&mut self, doc: &Document, node: NodeId) {
        self.contained(doc, node);
        let expected = match doc.kind(node) {
            NodeKind::LeftBrace => "{",
            NodeKind::RightBrace => "}",
            NodeKind::Colon => ":",
            _ => ";",
        };
        self.expect(doc, node, expected);
    }
}

/// [`assert_tree_matches`] against the context's own buffer.
pub fn assert_in_sync(ctx: &EditContext) {
    assert_tree_matches(ctx.document(), &ctx.text());
}

/// Selector texts in document order.
pub fn selectors(doc: &Document) -> Vec<String> {
    doc.rules()
        .iter()
        .filter_map(|&rule| doc.selector(rule).and_then(|s| doc.value(s)))
        .map(str::to_string)
        .collect()
}
