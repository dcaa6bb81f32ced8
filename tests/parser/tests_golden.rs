//! Golden tree dumps for `tests/fixtures/*.css`.
//!
//! Each stylesheet sits next to a `.expected` file holding the dump of its
//! parsed document, errors included.

use std::path::{Path, PathBuf};

use cssedit::parser::parse;
use walkdir::WalkDir;

use crate::helpers::document_helpers::{assert_tree_matches, dump};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixtures() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(fixtures_dir())
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "css"))
        .collect();
    paths.sort();
    paths
}

#[test]
fn test_fixtures_present() {
    assert!(
        fixtures().len() >= 3,
        "fixtures missing under {}",
        fixtures_dir().display()
    );
}

#[test]
fn test_fixture_dumps_match() {
    let mut mismatches = Vec::new();
    for path in fixtures() {
        let source = std::fs::read_to_string(&path).unwrap();
        let expected = std::fs::read_to_string(path.with_extension("expected"))
            .unwrap_or_else(|err| panic!("{}: {err}", path.display()));
        let actual = dump(&parse(&source));
        if actual.trim_end() != expected.trim_end() {
            mismatches.push(format!(
                "{}\n--- expected\n{expected}\n--- actual\n{actual}",
                path.display()
            ));
        }
    }
    assert!(mismatches.is_empty(), "{}", mismatches.join("\n"));
}

#[test]
fn test_fixture_trees_read_back() {
    for path in fixtures() {
        let source = std::fs::read_to_string(&path).unwrap();
        assert_tree_matches(&parse(&source), &source);
    }
}
