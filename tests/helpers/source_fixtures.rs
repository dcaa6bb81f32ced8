//! Stylesheet sources shared across tests.
//!
//! Lines are joined with `\n` and end with a trailing newline.

use cssedit::EditContext;

/// Join lines the way the fixtures are written.
pub fn lines(lines: &[&str]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Three rules, the middle one with two declarations.
pub fn three_rules() -> String {
    lines(&[
        "ruleA {",
        "}",
        "ruleB {",
        "  nameA: 1;",
        "  nameB: 22;",
        "}",
        "ruleC {",
        "}",
    ])
}

/// Build an edit context over `text`, which must parse without errors.
/// Warnings for skipped at-rules are allowed.
pub fn context(text: &str) -> EditContext {
    let ctx = EditContext::from_text(text).unwrap();
    assert!(
        !ctx.document().has_errors(),
        "unexpected syntax errors in {text:?}: {:?}",
        ctx.document().errors()
    );
    ctx
}
