//! Document model used on its own, with a listener defined outside the crate.

use std::cell::RefCell;
use std::rc::Rc;

use cssedit::parser::parse;
use cssedit::syntax::{Document, ModelError, ModelEvent, ModelListener, NodeKind};

#[derive(Default)]
struct Log(Vec<String>);

impl ModelListener for Log {
    fn model_changed(&mut self, document: &mut Document, event: &ModelEvent) -> Result<(), ModelError> {
        let line = match event {
            ModelEvent::Insert { node } => format!("insert {}", document.kind(*node)),
            ModelEvent::Remove { node, .. } => format!("remove {}", document.kind(*node)),
            ModelEvent::Change { old, new, .. } => format!("change {old} -> {new}"),
        };
        self.0.push(line);
        Ok(())
    }
}

#[test]
fn test_listener_sees_one_event_per_mutation() {
    let mut doc = parse("a { b: c; }");
    let log = Rc::new(RefCell::new(Log::default()));
    doc.set_listener(log.clone()).unwrap();

    let rule = doc.rule(0).unwrap();
    let declaration = doc.declaration(rule, 0).unwrap();
    let value = doc.value_node(declaration).unwrap();
    doc.set_value(value, "d").unwrap();
    doc.remove_declaration(declaration).unwrap();
    let charset = doc.create_charset("utf-8").unwrap();
    doc.set_charset(charset).unwrap();
    let other = doc.create_charset("latin1").unwrap();
    doc.set_charset(other).unwrap();

    assert_eq!(
        log.borrow().0,
        vec![
            "change c -> d",
            "remove Declaration",
            "insert Charset",
            "remove Charset",
            "insert Charset",
        ]
    );
}

#[test]
fn test_detached_nodes_can_be_built_up_before_attaching() {
    let mut doc = Document::new();
    let rule = doc.create_rule("a").unwrap();
    let declaration = doc.create_declaration("b", "c").unwrap();
    doc.add_declaration(rule, declaration).unwrap();
    assert!(!doc.is_attached(declaration));

    doc.add_rule(rule).unwrap();
    assert!(doc.is_attached(declaration));
    assert_eq!(doc.kind(doc.nth_child(rule, 2).unwrap()), NodeKind::Declaration);
    assert!(matches!(
        doc.add_rule(rule),
        Err(ModelError::AlreadyAttached(_))
    ));
}

#[test]
fn test_wrong_kinds_are_rejected() {
    let mut doc = parse("a { b: c; }");
    let rule = doc.rule(0).unwrap();
    let declaration = doc.declaration(rule, 0).unwrap();
    assert!(matches!(
        doc.remove_rule(declaration),
        Err(ModelError::UnexpectedKind { .. })
    ));
    assert!(matches!(
        doc.set_value(rule, "x"),
        Err(ModelError::NotALeaf { .. })
    ));
    let other = doc.create_rule("z").unwrap();
    assert!(matches!(
        doc.insert_rule(5, other),
        Err(ModelError::IndexOutOfBounds { index: 5, len: 1 })
    ));
}
