//! Edit context behaviour: every document mutation becomes the expected
//! text patch and leaves the tree in sync with the buffer.

use cssedit::base::{BufferError, LineBuffer, TextBuffer};
use cssedit::edit::{EditContext, EditError, EditOptions};
use cssedit::parser::parse;
use cssedit::syntax::{ModelError, NodeId};
use rstest::rstest;

use crate::helpers::document_helpers::{assert_in_sync, selectors};
use crate::helpers::source_fixtures::{context, lines, three_rules};

fn spaced(text: &str) -> EditContext {
    let ctx = EditContext::with_options(
        cssedit::LineBuffer::new(text),
        EditOptions::with_spaces(2),
    )
    .unwrap();
    assert!(!ctx.document().has_errors());
    ctx
}

fn rule(ctx: &EditContext, index: usize) -> NodeId {
    ctx.document().rule(index).unwrap()
}

// ============================================================================
// Rules
// ============================================================================

#[rstest]
#[case(0, lines(&["ruleB {", "  nameA: 1;", "  nameB: 22;", "}", "ruleC {", "}"]))]
#[case(1, lines(&["ruleA {", "}", "ruleC {", "}"]))]
#[case(2, lines(&["ruleA {", "}", "ruleB {", "  nameA: 1;", "  nameB: 22;", "}"]))]
fn test_remove_rule(#[case] index: usize, #[case] expected: String) {
    let mut ctx = context(&three_rules());
    let target = rule(&ctx, index);
    ctx.document_mut().remove_rule(target).unwrap();

    assert_eq!(ctx.text(), expected);
    assert_eq!(ctx.document().rules().len(), 2);
    assert_in_sync(&ctx);
}

#[rstest]
#[case("ruleA {\n} \t\n\n\nruleB {\n}\n", 0, "ruleB {\n}\n")]
#[case("a {}\n\nb {}\n", 0, "b {}\n")]
#[case("x {}\n  a {}  \n", 1, "x {}\n")]
fn test_remove_rule_collapses_whitespace(
    #[case] source: &str,
    #[case] index: usize,
    #[case] expected: &str,
) {
    let mut ctx = context(source);
    let target = rule(&ctx, index);
    ctx.document_mut().remove_rule(target).unwrap();
    assert_eq!(ctx.text(), expected);
    assert_in_sync(&ctx);
}

#[rstest]
#[case(3, lines(&["ruleA {", "}", "ruleB {", "  nameA: 1;", "  nameB: 22;", "}", "ruleC {", "}", "newRule {", "}"]))]
#[case(0, lines(&["newRule {", "}", "ruleA {", "}", "ruleB {", "  nameA: 1;", "  nameB: 22;", "}", "ruleC {", "}"]))]
#[case(1, lines(&["ruleA {", "}", "newRule {", "}", "ruleB {", "  nameA: 1;", "  nameB: 22;", "}", "ruleC {", "}"]))]
fn test_insert_rule(#[case] index: usize, #[case] expected: String) {
    let mut ctx = context(&three_rules());
    let doc = ctx.document_mut();
    let new = doc.create_rule("newRule").unwrap();
    doc.insert_rule(index, new).unwrap();

    assert_eq!(ctx.text(), expected);
    assert_eq!(ctx.document().index_of(new), Some(index));
    assert_in_sync(&ctx);
}

#[test]
fn test_add_rule_to_empty_document() {
    let mut ctx = context("");
    let doc = ctx.document_mut();
    let new = doc.create_rule("newRule").unwrap();
    doc.add_rule(new).unwrap();
    assert_eq!(ctx.text(), "newRule {\n}\n");
    assert_in_sync(&ctx);
}

#[test]
fn test_appended_rules_keep_order() {
    let mut ctx = context("");
    for selector in ["a", "b", "c"] {
        let doc = ctx.document_mut();
        let new = doc.create_rule(selector).unwrap();
        doc.add_rule(new).unwrap();
    }
    assert_eq!(selectors(ctx.document()), vec!["a", "b", "c"]);
    assert_eq!(ctx.text(), "a {\n}\nb {\n}\nc {\n}\n");
    assert_in_sync(&ctx);
}

#[test]
fn test_add_rule_copies_previous_indent() {
    let mut ctx = context("@media x;\n  a {\n  }\n");
    let doc = ctx.document_mut();
    let new = doc.create_rule("b").unwrap();
    doc.add_rule(new).unwrap();
    assert_eq!(ctx.text(), "@media x;\n  a {\n  }\n  b {\n  }\n");
    assert_in_sync(&ctx);
}

#[test]
fn test_add_rule_keeps_crlf() {
    let mut ctx = context("a {\r\n}\r\n");
    let doc = ctx.document_mut();
    let new = doc.create_rule("b").unwrap();
    doc.add_rule(new).unwrap();
    assert_eq!(ctx.text(), "a {\r\n}\r\nb {\r\n}\r\n");
    assert_in_sync(&ctx);
}

#[test]
fn test_insert_rule_with_declarations() {
    let mut ctx = spaced(&three_rules());
    let doc = ctx.document_mut();
    let new = doc.create_rule("new").unwrap();
    for (property, value) in [("a", "1"), ("b", "2")] {
        let declaration = doc.create_declaration(property, value).unwrap();
        doc.add_declaration(new, declaration).unwrap();
    }
    doc.add_rule(new).unwrap();

    assert!(ctx.text().ends_with("ruleC {\n}\nnew {\n  a: 1;\n  b: 2;\n}\n"));
    assert_in_sync(&ctx);
}

#[test]
fn test_reinsert_removed_rule() {
    let mut ctx = context(&three_rules());
    let b = rule(&ctx, 1);
    let doc = ctx.document_mut();
    doc.remove_rule(b).unwrap();
    doc.add_rule(b).unwrap();

    assert_eq!(
        ctx.text(),
        lines(&["ruleA {", "}", "ruleC {", "}", "ruleB {", "\tnameA: 1;", "\tnameB: 22;", "}"])
    );
    assert_in_sync(&ctx);
}

// ============================================================================
// Declarations
// ============================================================================

#[rstest]
#[case(0, "ruleB {\n  new: value;\n  nameA: 1;\n  nameB: 22;\n}")]
#[case(1, "ruleB {\n  nameA: 1;\n  new: value;\n  nameB: 22;\n}")]
#[case(2, "ruleB {\n  nameA: 1;\n  nameB: 22;\n  new: value;\n}")]
fn test_insert_declaration(#[case] index: usize, #[case] expected_rule: &str) {
    let mut ctx = spaced(&three_rules());
    let target = rule(&ctx, 1);
    let doc = ctx.document_mut();
    let declaration = doc.create_declaration("new", "value").unwrap();
    doc.insert_declaration(target, index, declaration).unwrap();

    assert_eq!(ctx.node_text(target).unwrap(), expected_rule);
    assert!(ctx.text().starts_with("ruleA {\n}\n"));
    assert!(ctx.text().ends_with("}\nruleC {\n}\n"));
    assert_in_sync(&ctx);
}

#[test]
fn test_add_declaration_indents_with_tab_by_default() {
    let mut ctx = context(&three_rules());
    let target = rule(&ctx, 0);
    let doc = ctx.document_mut();
    let declaration = doc.create_declaration("new", "value").unwrap();
    doc.add_declaration(target, declaration).unwrap();

    assert!(ctx.text().starts_with("ruleA {\n\tnew: value;\n}\nruleB {\n"));
    assert_in_sync(&ctx);
}

#[test]
fn test_add_declaration_after_one_without_semicolon() {
    let mut ctx = spaced("ruleA {\n  nameA: 1;\n  nameB: 22\n}\n");
    let target = rule(&ctx, 0);
    let previous = ctx.document().declaration(target, 1).unwrap();
    assert!(ctx.document().semicolon(previous).is_none());

    let doc = ctx.document_mut();
    let declaration = doc.create_declaration("x", "y").unwrap();
    doc.add_declaration(target, declaration).unwrap();

    assert_eq!(ctx.text(), "ruleA {\n  nameA: 1;\n  nameB: 22;\n  x: y;\n}\n");
    assert!(ctx.document().semicolon(previous).is_some());
    assert_in_sync(&ctx);
}

#[test]
fn test_add_declaration_inside_indented_rule() {
    let mut ctx = spaced("@media x;\n  a {\n  }\n");
    let target = rule(&ctx, 0);
    let doc = ctx.document_mut();
    let declaration = doc.create_declaration("c", "d").unwrap();
    doc.add_declaration(target, declaration).unwrap();
    assert_eq!(ctx.text(), "@media x;\n  a {\n    c: d;\n  }\n");
    assert_in_sync(&ctx);
}

#[rstest]
#[case(0, "ruleB {\n  nameB: 22;\n}")]
#[case(1, "ruleB {\n  nameA: 1;\n}")]
fn test_remove_declaration(#[case] index: usize, #[case] expected_rule: &str) {
    let mut ctx = context(&three_rules());
    let target = rule(&ctx, 1);
    let declaration = ctx.document().declaration(target, index).unwrap();
    ctx.document_mut().remove_declaration(declaration).unwrap();

    assert_eq!(ctx.node_text(target).unwrap(), expected_rule);
    assert_eq!(ctx.document().declarations(target).len(), 1);
    assert_in_sync(&ctx);
}

// ============================================================================
// Values
// ============================================================================

#[test]
fn test_set_value_shifts_only_later_nodes() {
    let mut ctx = context(&three_rules());
    let (a, b, c) = (rule(&ctx, 0), rule(&ctx, 1), rule(&ctx, 2));
    let name_b = ctx.document().declaration(b, 1).unwrap();
    let value = ctx.document().value_node(name_b).unwrap();
    let before = |ctx: &EditContext, id: NodeId| {
        let node = ctx.document().node(id);
        (node.offset(), node.length())
    };
    let (a0, b0, c0) = (before(&ctx, a), before(&ctx, b), before(&ctx, c));

    ctx.document_mut().set_value(value, "333").unwrap();

    assert_eq!(before(&ctx, a), a0);
    assert_eq!(before(&ctx, b), (b0.0, b0.1 + 1));
    assert_eq!(before(&ctx, c), (c0.0 + 1, c0.1));
    assert!(ctx.text().contains("  nameB: 333;\n"));
    assert_in_sync(&ctx);
}

#[rstest]
#[case("selector", "ruleAA")]
#[case("property", "n")]
#[case("value", "x y z")]
fn test_set_leaf_value(#[case] leaf: &str, #[case] value: &str) {
    let mut ctx = context(&three_rules());
    let b = rule(&ctx, 1);
    let doc = ctx.document();
    let first = doc.declaration(b, 0).unwrap();
    let target = match leaf {
        "selector" => doc.selector(b),
        "property" => doc.property(first),
        _ => doc.value_node(first),
    }
    .unwrap();

    ctx.document_mut().set_value(target, value).unwrap();
    assert_eq!(ctx.node_text(target).unwrap(), value);
    assert_in_sync(&ctx);
}

#[test]
fn test_empty_value_is_rejected_without_touching_text() {
    let mut ctx = context(&three_rules());
    let selector = ctx.document().selector(rule(&ctx, 0)).unwrap();
    let err = ctx.document_mut().set_value(selector, "  ").unwrap_err();
    assert!(matches!(err, ModelError::EmptyValue { .. }));
    assert_eq!(ctx.text(), three_rules());
}

// ============================================================================
// Charset
// ============================================================================

#[test]
fn test_set_and_remove_charset() {
    let mut ctx = context(&three_rules());
    let doc = ctx.document_mut();
    let charset = doc.create_charset("Latin").unwrap();
    assert_eq!(doc.set_charset(charset).unwrap(), None);
    assert_eq!(ctx.text(), format!("@charset \"Latin\";\n{}", three_rules()));
    assert_in_sync(&ctx);

    assert_eq!(ctx.document_mut().remove_charset().unwrap(), Some(charset));
    assert_eq!(ctx.text(), three_rules());
    assert_in_sync(&ctx);
}

#[test]
fn test_replace_charset() {
    let mut ctx = context("@charset \"a\";\nx {}\n");
    let old = ctx.document().charset().unwrap();
    let doc = ctx.document_mut();
    let new = doc.create_charset("utf-8").unwrap();
    assert_eq!(doc.set_charset(new).unwrap(), Some(old));
    assert_eq!(ctx.text(), "@charset \"utf-8\";\nx {}\n");
    assert_in_sync(&ctx);
}

#[test]
fn test_first_rule_goes_after_charset() {
    let mut ctx = context("@charset \"a\";\nx {}\n");
    let doc = ctx.document_mut();
    let new = doc.create_rule("first").unwrap();
    doc.insert_rule(0, new).unwrap();
    assert_eq!(ctx.text(), "@charset \"a\";\nfirst {\n}\nx {}\n");
    assert_in_sync(&ctx);
}

// ============================================================================
// Replace and sort
// ============================================================================

#[test]
fn test_replace_rule() {
    let mut ctx = context(&three_rules());
    let old = rule(&ctx, 1);
    let new = ctx.replace_rule(old, "newB { x: 1; }").unwrap();

    assert_eq!(ctx.text(), "ruleA {\n}\nnewB { x: 1; }\nruleC {\n}\n");
    assert_eq!(ctx.document().rule(1), Some(new));
    assert_eq!(ctx.document().node(rule(&ctx, 2)).offset(), 25);
    assert_in_sync(&ctx);

    // The grafted rule is live
    let value = ctx
        .document()
        .value_node(ctx.document().declaration(new, 0).unwrap())
        .unwrap();
    ctx.document_mut().set_value(value, "22").unwrap();
    assert_eq!(ctx.node_text(new).unwrap(), "newB { x: 22; }");
    assert_in_sync(&ctx);
}

#[rstest]
#[case("")]
#[case("a {} b {}")]
fn test_replace_rule_rejects_other_shapes(#[case] source: &str) {
    let mut ctx = context(&three_rules());
    let old = rule(&ctx, 0);
    let err = ctx.replace_rule(old, source).unwrap_err();
    assert!(matches!(err, EditError::InvalidArgument(_)));
    assert_eq!(ctx.text(), three_rules());
}

#[test]
fn test_sort_rules_moves_text_verbatim() {
    let mut ctx = context("b{}\na{}\nc{}");
    ctx.sort_rules_by_selector().unwrap();
    assert_eq!(ctx.text(), "a{}\n\nb{}\n\nc{}");
    assert_eq!(selectors(ctx.document()), vec!["a", "b", "c"]);
    assert_in_sync(&ctx);
}

#[test]
fn test_sort_rules_with_comparator() {
    let mut ctx = context(&three_rules());
    ctx.sort_rules_by(|doc, a, b| {
        doc.declarations(b)
            .len()
            .cmp(&doc.declarations(a).len())
    })
    .unwrap();
    assert_eq!(
        ctx.text(),
        lines(&[
            "ruleB {",
            "  nameA: 1;",
            "  nameB: 22;",
            "}",
            "",
            "ruleA {",
            "}",
            "",
            "ruleC {",
            "}",
        ])
    );
    assert_in_sync(&ctx);
}

// ============================================================================
// Comments
// ============================================================================

fn assert_reparses(ctx: &EditContext) {
    let text = ctx.text();
    let doc = parse(&text);
    assert!(!doc.has_errors(), "{text:?}: {:?}", doc.errors());
}

#[rstest]
#[case("a {}\n/* keep */\nb {}\n/* tail */\n", 0, "/* keep */\nb {}\n/* tail */\n")]
#[case("a {}\n/* keep */\nb {}\n/* tail */\n", 1, "a {}\n/* keep */\n/* tail */\n")]
#[case("a {} /* note */\nb {}\n", 0, "/* note */\nb {}\n")]
#[case("a {\r\n}\r\n/* tail */", 0, "/* tail */")]
fn test_remove_rule_keeps_comments(
    #[case] source: &str,
    #[case] index: usize,
    #[case] expected: &str,
) {
    let mut ctx = context(source);
    let target = rule(&ctx, index);
    ctx.document_mut().remove_rule(target).unwrap();
    assert_eq!(ctx.text(), expected);
    assert_in_sync(&ctx);
    assert_reparses(&ctx);
}

#[test]
fn test_sort_rules_with_comments() {
    let mut ctx = context("b {} /* b */\n/* between */\na { x: 1; /* in */ }\n/* tail */\n");
    ctx.sort_rules_by_selector().unwrap();
    // Comments inside rules travel with them, the ones between rules go
    assert_eq!(ctx.text(), "a { x: 1; /* in */ }\n\nb {}\n/* tail */\n");
    assert_in_sync(&ctx);
    assert_reparses(&ctx);

    let a = rule(&ctx, 0);
    let doc = ctx.document_mut();
    let declaration = doc.create_declaration("y", "2").unwrap();
    doc.add_declaration(a, declaration).unwrap();
    assert_eq!(ctx.text(), "a { x: 1;\n\ty: 2; /* in */ }\n\nb {}\n/* tail */\n");
    assert_in_sync(&ctx);
    assert_reparses(&ctx);
}

#[test]
fn test_edit_sequence_around_comments() {
    let mut ctx = context("/* head */\r\na /* s */ {\r\n\tb: c /* v */;\r\n}\r\n/* tail */");
    let a = rule(&ctx, 0);
    let doc = ctx.document_mut();
    let declaration = doc.create_declaration("d", "e").unwrap();
    doc.add_declaration(a, declaration).unwrap();
    let new = doc.create_rule("f").unwrap();
    doc.add_rule(new).unwrap();
    let first = doc.declaration(a, 0).unwrap();
    let value = doc.value_node(first).unwrap();
    doc.set_value(value, "long value").unwrap();
    assert_eq!(
        ctx.text(),
        "/* head */\r\na /* s */ {\r\n\tb: long value /* v */;\r\n\td: e;\r\n}\r\nf {\r\n}\r\n/* tail */"
    );
    assert_in_sync(&ctx);
    assert_reparses(&ctx);
}

// ============================================================================
// Buffer failures
// ============================================================================

/// A buffer that refuses to write any text containing `marker`
struct RejectingBuffer {
    inner: LineBuffer,
    marker: &'static str,
}

impl TextBuffer for RejectingBuffer {
    fn get(&self) -> &str {
        self.inner.get()
    }

    fn get_range(&self, offset: usize, length: usize) -> Result<&str, BufferError> {
        self.inner.get_range(offset, length)
    }

    fn replace(&mut self, offset: usize, length: usize, text: &str) -> Result<(), BufferError> {
        if text.contains(self.marker) {
            return Err(BufferError::OutOfRange {
                offset,
                length,
                len: self.inner.len(),
            });
        }
        self.inner.replace(offset, length, text)
    }

    fn line_of_offset(&self, offset: usize) -> Result<usize, BufferError> {
        self.inner.line_of_offset(offset)
    }

    fn line_delimiter(&self, line: usize) -> Result<Option<&'static str>, BufferError> {
        self.inner.line_delimiter(line)
    }
}

#[test]
fn test_failed_declaration_leaves_no_rule_text() {
    let buffer = RejectingBuffer {
        inner: LineBuffer::new(three_rules()),
        marker: "rejected",
    };
    let mut ctx = EditContext::new(buffer).unwrap();
    let doc = ctx.document_mut();
    let new = doc.create_rule("new").unwrap();
    for (property, value) in [("a", "1"), ("rejected", "2")] {
        let declaration = doc.create_declaration(property, value).unwrap();
        doc.add_declaration(new, declaration).unwrap();
    }

    let err = doc.add_rule(new).unwrap_err();
    assert!(matches!(err, ModelError::Buffer(_)));
    assert_eq!(ctx.text(), three_rules());
    assert_eq!(ctx.document().rules().len(), 3);
    assert!(!ctx.document().is_attached(new));
    assert_in_sync(&ctx);
}

// ============================================================================
// Buffer access
// ============================================================================

#[test]
fn test_text_range_out_of_bounds() {
    let ctx = context(&three_rules());
    let err = ctx.text_range(50, 10).unwrap_err();
    assert!(matches!(
        err,
        EditError::Buffer(BufferError::OutOfRange {
            offset: 50,
            length: 10,
            len: 55
        })
    ));
    assert_eq!(ctx.text_range(0, 5).unwrap(), "ruleA");
}

#[test]
fn test_mixed_edit_sequence_stays_in_sync() {
    let mut ctx = context(&three_rules());
    let (a, b) = (rule(&ctx, 0), rule(&ctx, 1));

    let doc = ctx.document_mut();
    let declaration = doc.create_declaration("color", "red").unwrap();
    doc.add_declaration(a, declaration).unwrap();
    let first = doc.declaration(b, 0).unwrap();
    doc.remove_declaration(first).unwrap();
    let value = doc.value_node(declaration).unwrap();
    doc.set_value(value, "blue").unwrap();
    let charset = doc.create_charset("utf-8").unwrap();
    doc.set_charset(charset).unwrap();
    let new = doc.create_rule("d").unwrap();
    doc.insert_rule(1, new).unwrap();
    assert_in_sync(&ctx);

    ctx.sort_rules_by_selector().unwrap();
    assert_in_sync(&ctx);
    assert_eq!(
        selectors(ctx.document()),
        vec!["d", "ruleA", "ruleB", "ruleC"]
    );
}
