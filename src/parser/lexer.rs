//! Logos-based lexer for stylesheets
//!
//! [`Lexer`] is the raw token iterator (trivia included, no end marker).
//! [`Scanner`] is what the parser reads from: a forward-only cursor with an
//! explicit `EOF` token and two read modes, one skipping trivia and one not.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }

    /// Start offset as a plain byte index
    pub fn start(&self) -> usize {
        usize::from(self.offset)
    }

    /// End offset (exclusive) as a plain byte index
    pub fn end(&self) -> usize {
        self.start() + self.text.len()
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.inner.span().start as u32);

        let kind = match logos_token {
            // At-keywords are case-insensitive; only @charset is structural
            Ok(LogosToken::AtKeyword) if text.eq_ignore_ascii_case("@charset") => {
                SyntaxKind::CHARSET_KW
            }
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec (trivia included, no EOF token)
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Forward-only token cursor used by the parser
///
/// Once the input is exhausted every read returns an `EOF` token positioned
/// at the end of the source.
pub struct Scanner<'a> {
    lexer: Lexer<'a>,
    source: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            source,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The next token, trivia included
    pub fn next0(&mut self) -> Token<'a> {
        self.lexer.next().unwrap_or(Token {
            kind: SyntaxKind::EOF,
            text: "",
            offset: TextSize::of(self.source),
        })
    }

    /// The next non-trivia token
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Token<'a> {
        loop {
            let token = self.next0();
            if !token.is_trivia() {
                return token;
            }
        }
    }
}

/// Consume a comment body through the closing `*/`
///
/// An unterminated comment is an error token running to the end of input.
fn block_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[token("/*", block_comment)]
    Comment,

    #[token("<!--")]
    Cdo,

    #[token("-->")]
    Cdc,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"(--|-)?([_a-zA-Z]|[^\x00-\x7F]|\\[^\r\n\f0-9a-fA-F]|\\[0-9a-fA-F]+)([_a-zA-Z0-9-]|[^\x00-\x7F]|\\[^\r\n\f0-9a-fA-F]|\\[0-9a-fA-F]+)*")]
    Ident,

    #[regex(r"(--|-)?([_a-zA-Z]|[^\x00-\x7F])([_a-zA-Z0-9-]|[^\x00-\x7F])*\(")]
    Function,

    #[regex(r"@-?([_a-zA-Z]|[^\x00-\x7F])([_a-zA-Z0-9-]|[^\x00-\x7F])*")]
    AtKeyword,

    #[regex(r#""([^"\\\n]|\\(.|\n))*""#)]
    #[regex(r#"'([^'\\\n]|\\(.|\n))*'"#)]
    String,

    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)")]
    Number,

    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)%")]
    Percentage,

    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)([_a-zA-Z]|[^\x00-\x7F])([_a-zA-Z0-9-]|[^\x00-\x7F])*")]
    Dimension,

    #[regex(r"#([_a-zA-Z0-9-]|[^\x00-\x7F])+")]
    Hash,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("$=")]
    DollarEq,
    #[token("|=")]
    PipeEq,
    #[token("~=")]
    TildeEq,
    #[token("^=")]
    CaretEq,
    #[token("*=")]
    StarEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("~")]
    Tilde,
    #[token("*")]
    Star,
    #[token("=")]
    Eq,
    #[token("|")]
    Pipe,
    #[token("!")]
    Bang,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            Comment => SyntaxKind::COMMENT,
            Cdo => SyntaxKind::CDO,
            Cdc => SyntaxKind::CDC,

            // Literals
            Ident => SyntaxKind::IDENT,
            Function => SyntaxKind::FUNCTION,
            AtKeyword => SyntaxKind::AT_KEYWORD,
            String => SyntaxKind::STRING,
            Number => SyntaxKind::NUMBER,
            Percentage => SyntaxKind::PERCENTAGE,
            Dimension => SyntaxKind::DIMENSION,
            Hash => SyntaxKind::HASH,

            // Multi-char punctuation
            DollarEq => SyntaxKind::DOLLAR_EQ,
            PipeEq => SyntaxKind::PIPE_EQ,
            TildeEq => SyntaxKind::TILDE_EQ,
            CaretEq => SyntaxKind::CARET_EQ,
            StarEq => SyntaxKind::STAR_EQ,

            // Single-char punctuation
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Tilde => SyntaxKind::TILDE,
            Star => SyntaxKind::STAR,
            Eq => SyntaxKind::EQ,
            Pipe => SyntaxKind::PIPE,
            Bang => SyntaxKind::BANG,
            Slash => SyntaxKind::SLASH,
            Caret => SyntaxKind::CARET,
        }
    }
}
