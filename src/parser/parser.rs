//! Recursive descent parser for stylesheets
//!
//! Builds a [`Document`] from tokens. Recovery is local to the construct
//! that failed: one malformed declaration, rule or at-rule records a
//! [`SyntaxError`] and the parser resumes right after it.

use super::errors::{ErrorCode, ParseContext, Severity, SyntaxError, format_context_error};
use super::lexer::{Scanner, Token};
use super::syntax_kind::SyntaxKind;
use crate::syntax::{Document, NodeData, NodeId};
use text_size::{TextRange, TextSize};
use tracing::{debug, trace, warn};

/// Parse stylesheet source into a document
///
/// Never fails: problems are recorded in [`Document::errors`].
pub fn parse(input: &str) -> Document {
    let mut parser = Parser::new(input);
    parser.parse_document();
    parser.finish()
}

/// The parser state
struct Parser<'a> {
    scanner: Scanner<'a>,
    /// One token of non-trivia lookahead
    current: Token<'a>,
    /// End of the last consumed token
    last_end: usize,
    doc: Document,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let mut scanner = Scanner::new(input);
        let current = scanner.next();
        Self {
            scanner,
            current,
            last_end: 0,
            doc: Document::new(),
        }
    }

    fn finish(mut self) -> Document {
        let len = self.scanner.source().len();
        self.doc.set_span(NodeId::ROOT, 0, len);
        debug!(
            rules = self.doc.rules().len(),
            errors = self.doc.errors().len(),
            "parsed document"
        );
        self.doc
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn kind(&self) -> SyntaxKind {
        self.current.kind
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.at(SyntaxKind::EOF)
    }

    fn source(&self) -> &'a str {
        self.scanner.source()
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Consume the current token and read the next non-trivia one
    fn bump(&mut self) -> Token<'a> {
        let token = self.current;
        if token.kind != SyntaxKind::EOF {
            self.last_end = token.end();
            self.current = self.scanner.next();
        }
        token
    }

    /// Consume the current token and read the next one, trivia included
    ///
    /// Trivia never moves `last_end`.
    fn bump0(&mut self) -> Token<'a> {
        let token = self.current;
        if token.kind != SyntaxKind::EOF {
            if !token.is_trivia() {
                self.last_end = token.end();
            }
            self.current = self.scanner.next0();
        }
        token
    }

    // =========================================================================
    // Errors and recovery
    // =========================================================================

    fn error(&mut self, code: ErrorCode, start: usize, end: usize) {
        let error = SyntaxError::from_code(code, range(start, end));
        trace!(code = %code, start, end, "syntax error");
        self.doc.push_error(error);
    }

    /// Record an error naming what was found in `context`
    fn context_error(
        &mut self,
        found: &str,
        code: ErrorCode,
        context: ParseContext,
        start: usize,
        end: usize,
    ) {
        let error = format_context_error(found, context, code, range(start, end));
        trace!(code = %code, start, end, found, "syntax error");
        self.doc.push_error(error);
    }

    /// Record an error naming the unexpected current token
    fn error_at_current(&mut self, code: ErrorCode, context: ParseContext, start: usize, end: usize) {
        let found = describe(&self.current);
        self.context_error(&found, code, context, start, end);
    }

    /// Record an error spanning `start` to the context's recovery point
    fn error_recover(&mut self, code: ErrorCode, context: ParseContext, start: usize) {
        let found = describe(&self.current);
        self.recover(context);
        let end = self.last_end.max(start);
        self.context_error(&found, code, context, start, end);
    }

    /// Skip to the context's recovery point
    ///
    /// A `;` recovery token is consumed, a brace is left for the enclosing
    /// construct. Braced blocks met on the way are skipped whole.
    fn recover(&mut self, context: ParseContext) {
        let stop = context.recovery_tokens();
        loop {
            match self.kind() {
                SyntaxKind::EOF => return,
                SyntaxKind::SEMICOLON if stop.contains(&SyntaxKind::SEMICOLON) => {
                    self.bump();
                    return;
                }
                kind if stop.contains(&kind) => return,
                SyntaxKind::L_BRACE => self.skip_block(),
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Skip through the `}` balancing the next `{`, or through a stray `}`
    fn skip_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.kind() {
                SyntaxKind::EOF => return,
                SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACE => {
                    self.bump();
                    if depth <= 1 {
                        return;
                    }
                    depth -= 1;
                    continue;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Drop the rest of the current line, the line break included
    ///
    /// Returns the offset just past the line break.
    fn skip_line(&mut self) -> usize {
        self.last_end = self.current.end();
        loop {
            let token = self.scanner.next0();
            match token.kind {
                SyntaxKind::EOF => {
                    self.current = token;
                    return self.last_end;
                }
                SyntaxKind::WHITESPACE => {
                    if let Some(at) = token.text.find(['\n', '\r']) {
                        let rest = &token.text[at..];
                        let eol = if rest.starts_with("\r\n") { 2 } else { 1 };
                        let end = token.start() + at + eol;
                        self.last_end = end;
                        self.current = self.scanner.next();
                        return end;
                    }
                }
                _ => self.last_end = token.end(),
            }
        }
    }

    // =========================================================================
    // Document
    // =========================================================================

    fn parse_document(&mut self) {
        let mut first = true;
        while !self.at_eof() {
            match self.kind() {
                SyntaxKind::CHARSET_KW if first => self.parse_charset(),
                SyntaxKind::CHARSET_KW => self.skip_at_rule(ErrorCode::E0205, Severity::Error),
                SyntaxKind::AT_KEYWORD => self.skip_at_rule(ErrorCode::E0204, Severity::Warning),
                SyntaxKind::ERROR => {
                    let found = describe(&self.current);
                    let start = self.current.start();
                    let end = self.skip_line();
                    self.context_error(&found, ErrorCode::E0101, ParseContext::TopLevel, start, end);
                }
                _ => {
                    if let Some(rule) = self.parse_rule() {
                        self.doc.push_rule_silently(rule);
                    }
                }
            }
            first = false;
        }
    }

    /// `@charset "..." ;`
    fn parse_charset(&mut self) {
        let keyword = self.bump();
        let start = keyword.start();

        if !self.at(SyntaxKind::STRING) {
            self.error_recover(ErrorCode::E0305, ParseContext::Charset, start);
            return;
        }
        let string = self.bump();

        if !self.at(SyntaxKind::SEMICOLON) {
            self.error_recover(ErrorCode::E0203, ParseContext::Charset, start);
            return;
        }
        let semicolon = self.bump();

        let string = self.doc.alloc(
            string.start(),
            string.text.len(),
            NodeData::String(string.text.into()),
        );
        let semicolon = self.doc.alloc(semicolon.start(), 1, NodeData::SemiColon);
        let charset = self.doc.alloc(
            start,
            self.last_end - start,
            NodeData::Charset { string, semicolon },
        );
        self.doc.set_charset_silently(charset);
    }

    /// Skip an at-rule this engine does not model
    fn skip_at_rule(&mut self, code: ErrorCode, severity: Severity) {
        let keyword = self.bump();
        let start = keyword.start();
        loop {
            match self.kind() {
                SyntaxKind::EOF | SyntaxKind::R_BRACE => break,
                SyntaxKind::SEMICOLON => {
                    self.bump();
                    break;
                }
                SyntaxKind::L_BRACE => {
                    self.skip_block();
                    break;
                }
                _ => {
                    self.bump();
                }
            }
        }
        warn!(keyword = keyword.text, start, end = self.last_end, "skipped at-rule");
        let error = SyntaxError::from_code(code, range(start, self.last_end)).with_severity(severity);
        self.doc.push_error(error);
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// `selector { declarations }`
    fn parse_rule(&mut self) -> Option<NodeId> {
        let start = self.current.start();

        if self.at(SyntaxKind::L_BRACE) {
            let found = describe(&self.current);
            self.skip_block();
            let end = self.last_end;
            self.context_error(&found, ErrorCode::E0304, ParseContext::TopLevel, start, end);
            return None;
        }

        // Selector: raw text up to the `{`
        loop {
            match self.kind() {
                SyntaxKind::L_BRACE => break,
                SyntaxKind::EOF => {
                    self.error(ErrorCode::E0201, start, self.last_end.max(start));
                    return None;
                }
                SyntaxKind::R_BRACE => {
                    let end = self.current.end();
                    self.error_at_current(ErrorCode::E0202, ParseContext::Selector, start, end);
                    self.bump();
                    return None;
                }
                SyntaxKind::ERROR => {
                    self.skip_block();
                    trace!(start, end = self.last_end, "skipped rule with invalid character");
                    self.error(ErrorCode::E0101, start, self.last_end);
                    return None;
                }
                _ => {
                    self.bump();
                }
            }
        }
        let selector_end = self.last_end;
        let selector_text = &self.source()[start..selector_end];
        let left_brace = self.bump();

        let mut declarations = Vec::new();
        let right_brace = loop {
            match self.kind() {
                SyntaxKind::R_BRACE => break self.bump(),
                SyntaxKind::EOF => {
                    let end = self.last_end;
                    self.error_at_current(ErrorCode::E0201, ParseContext::DeclarationList, start, end);
                    return None;
                }
                // Empty declaration
                SyntaxKind::SEMICOLON => {
                    self.bump();
                }
                _ => {
                    if let Some(declaration) = self.parse_declaration() {
                        declarations.push(declaration);
                    }
                }
            }
        };

        let selector = self.doc.alloc(
            start,
            selector_end - start,
            NodeData::Selector(selector_text.into()),
        );
        let left_brace = self.doc.alloc(left_brace.start(), 1, NodeData::LeftBrace);
        let right_brace = self.doc.alloc(right_brace.start(), 1, NodeData::RightBrace);
        Some(self.doc.alloc(
            start,
            self.last_end - start,
            NodeData::Rule {
                selector,
                left_brace,
                declarations,
                right_brace,
            },
        ))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// `property : value ;?`
    fn parse_declaration(&mut self) -> Option<NodeId> {
        let start = self.current.start();

        if !self.at(SyntaxKind::IDENT) {
            let code = self.lexical_or(ErrorCode::E0301);
            return self.declaration_error(code, ParseContext::Declaration, start);
        }
        let property = self.bump();

        if !self.at(SyntaxKind::COLON) {
            let code = self.lexical_or(ErrorCode::E0302);
            return self.declaration_error(code, ParseContext::Declaration, start);
        }
        let colon = self.bump();

        // Value: raw text up to `;` or `}`, read with trivia so inner
        // comments and blanks stay and trailing ones are left out
        let value_start = self.current.start();
        let mut value_end = None;
        loop {
            match self.kind() {
                SyntaxKind::SEMICOLON | SyntaxKind::R_BRACE | SyntaxKind::EOF => break,
                SyntaxKind::L_BRACE => {
                    self.skip_block();
                    return self.declaration_error(ErrorCode::E0303, ParseContext::Value, start);
                }
                SyntaxKind::ERROR => {
                    return self.declaration_error(ErrorCode::E0101, ParseContext::Value, start);
                }
                kind if kind.is_trivia() => {
                    self.bump0();
                }
                _ => value_end = Some(self.bump0().end()),
            }
        }
        if self.at_eof() {
            self.error(ErrorCode::E0201, start, self.last_end);
            return None;
        }
        let Some(value_end) = value_end else {
            return self.declaration_error(ErrorCode::E0303, ParseContext::Value, start);
        };

        let semicolon = self
            .at(SyntaxKind::SEMICOLON)
            .then(|| self.bump())
            .map(|semicolon| self.doc.alloc(semicolon.start(), 1, NodeData::SemiColon));
        let value_text = &self.source()[value_start..value_end];

        let property = self.doc.alloc(
            property.start(),
            property.text.len(),
            NodeData::Property(property.text.into()),
        );
        let colon = self.doc.alloc(colon.start(), 1, NodeData::Colon);
        let value = self.doc.alloc(
            value_start,
            value_end - value_start,
            NodeData::Value(value_text.into()),
        );
        Some(self.doc.alloc(
            start,
            self.last_end - start,
            NodeData::Declaration {
                property,
                colon,
                value,
                semicolon,
            },
        ))
    }

    /// An invalid character takes precedence over what was expected
    fn lexical_or(&self, code: ErrorCode) -> ErrorCode {
        if self.at(SyntaxKind::ERROR) {
            ErrorCode::E0101
        } else {
            code
        }
    }

    fn declaration_error(
        &mut self,
        code: ErrorCode,
        context: ParseContext,
        start: usize,
    ) -> Option<NodeId> {
        self.error_recover(code, context, start);
        None
    }
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32))
}

fn describe(token: &Token<'_>) -> String {
    match token.kind {
        SyntaxKind::EOF => "end of file".to_string(),
        _ => format!("'{}'", token.text),
    }
}
