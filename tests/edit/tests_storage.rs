//! Connect, commit and disconnect against real storage backends.

use cssedit::edit::{EditContext, EditError, FileStorage, MemoryStorage, StorageError};

use crate::helpers::document_helpers::assert_in_sync;
use crate::helpers::source_fixtures::three_rules;

#[test]
fn test_file_storage_sees_changes_only_on_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("style.css");
    std::fs::write(&path, three_rules()).unwrap();

    let mut ctx = EditContext::connect(FileStorage::new(&path)).unwrap();
    let first = ctx.document().rule(0).unwrap();
    ctx.document_mut().remove_rule(first).unwrap();
    assert_in_sync(&ctx);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), three_rules());

    ctx.commit().unwrap();
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, ctx.text());
    assert!(on_disk.starts_with("ruleB {\n"));

    ctx.disconnect().unwrap();
    assert!(matches!(ctx.commit(), Err(EditError::Disconnected)));
}

#[test]
fn test_connect_to_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = EditContext::connect(FileStorage::new(dir.path().join("nope.css"))).unwrap_err();
    assert!(matches!(err, EditError::Storage(StorageError::Read { .. })));
}

#[test]
fn test_memory_storage_commit_and_disconnect() {
    let storage = MemoryStorage::new("a {}\n");
    let mut ctx = EditContext::connect(storage.clone()).unwrap();

    let doc = ctx.document_mut();
    let rule = doc.create_rule("b").unwrap();
    doc.add_rule(rule).unwrap();
    assert_eq!(storage.content(), "a {}\n");

    ctx.commit().unwrap();
    assert_eq!(storage.content(), "a {}\nb {\n}\n");

    ctx.disconnect().unwrap();
    let doc = ctx.document_mut();
    let rule = doc.create_rule("c").unwrap();
    doc.add_rule(rule).unwrap();
    assert!(matches!(
        ctx.replace_rule(rule, "d {}"),
        Err(EditError::Disconnected)
    ));
    assert_eq!(storage.content(), "a {}\nb {\n}\n");
}

#[test]
fn test_context_without_storage_commits_nothing() {
    let mut ctx = EditContext::from_text("a {}").unwrap();
    ctx.commit().unwrap();
    assert_eq!(ctx.text(), "a {}");
}
