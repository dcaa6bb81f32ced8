//! Edit options

/// Layout options for text generated by an edit context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOptions {
    /// Indentation added for each nesting level (declarations sit one level in)
    pub indent_unit: String,
    /// Line delimiter used when the buffer has none to copy
    pub default_eol: String,
    /// Empty lines written between rules when sorting
    pub blank_lines_between_rules: usize,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            indent_unit: "\t".to_string(),
            default_eol: "\n".to_string(),
            blank_lines_between_rules: 1,
        }
    }
}

impl EditOptions {
    /// Indent with `width` spaces per level instead of tabs
    pub fn with_spaces(width: usize) -> Self {
        Self {
            indent_unit: " ".repeat(width),
            ..Self::default()
        }
    }

    /// Generate indentation string for the given level
    pub fn indent(&self, level: usize) -> String {
        self.indent_unit.repeat(level)
    }

    /// Separator between two sorted rules
    pub fn rule_separator(&self, eol: &str) -> String {
        eol.repeat(self.blank_lines_between_rules + 1)
    }
}
