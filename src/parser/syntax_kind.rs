//! Token kinds produced by the lexer
//!
//! The parser only ever branches on a handful of these (braces, colon,
//! semicolon, identifier, string, `@charset`); the rest exist so real
//! stylesheets tokenize cleanly and selector/value text can be sliced
//! without re-scanning.

/// All token kinds of the stylesheet language
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace, comments and SGML comment markers)
    // =========================================================================
    WHITESPACE = 0,
    COMMENT,            // /* ... */
    CDO,                // <!--
    CDC,                // -->

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,              // color, -webkit-box, --custom
    STRING,             // "hello" or 'hello'
    NUMBER,             // 12, 1.5, .5
    PERCENTAGE,         // 50%
    DIMENSION,          // 10px, 1.5em
    HASH,               // #fff, #main
    FUNCTION,           // rgb(  url(
    AT_KEYWORD,         // @media, @import

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    CHARSET_KW,         // @charset

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,            // {
    R_BRACE,            // }
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_PAREN,            // (
    R_PAREN,            // )
    SEMICOLON,          // ;
    COLON,              // :
    COMMA,              // ,
    DOT,                // .
    GT,                 // >
    PLUS,               // +
    MINUS,              // -
    TILDE,              // ~
    STAR,               // *
    EQ,                 // =
    PIPE,               // |
    BANG,               // !
    SLASH,              // /
    CARET,              // ^
    DOLLAR_EQ,          // $=
    PIPE_EQ,            // |=
    TILDE_EQ,           // ~=
    CARET_EQ,           // ^=
    STAR_EQ,            // *=

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,              // unclassifiable character
    EOF,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, comment or comment marker)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::COMMENT | Self::CDO | Self::CDC
        )
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::STAR_EQ as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IDENT
                | Self::STRING
                | Self::NUMBER
                | Self::PERCENTAGE
                | Self::DIMENSION
                | Self::HASH
        )
    }
}

/// Human-readable name of a token kind, used in diagnostics
pub fn kind_to_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::WHITESPACE => "whitespace",
        SyntaxKind::COMMENT => "comment",
        SyntaxKind::CDO => "'<!--'",
        SyntaxKind::CDC => "'-->'",
        SyntaxKind::IDENT => "identifier",
        SyntaxKind::STRING => "string",
        SyntaxKind::NUMBER => "number",
        SyntaxKind::PERCENTAGE => "percentage",
        SyntaxKind::DIMENSION => "dimension",
        SyntaxKind::HASH => "hash",
        SyntaxKind::FUNCTION => "function",
        SyntaxKind::AT_KEYWORD => "at-keyword",
        SyntaxKind::CHARSET_KW => "'@charset'",
        SyntaxKind::L_BRACE => "'{'",
        SyntaxKind::R_BRACE => "'}'",
        SyntaxKind::L_BRACKET => "'['",
        SyntaxKind::R_BRACKET => "']'",
        SyntaxKind::L_PAREN => "'('",
        SyntaxKind::R_PAREN => "')'",
        SyntaxKind::SEMICOLON => "';'",
        SyntaxKind::COLON => "':'",
        SyntaxKind::COMMA => "','",
        SyntaxKind::DOT => "'.'",
        SyntaxKind::GT => "'>'",
        SyntaxKind::PLUS => "'+'",
        SyntaxKind::MINUS => "'-'",
        SyntaxKind::TILDE => "'~'",
        SyntaxKind::STAR => "'*'",
        SyntaxKind::EQ => "'='",
        SyntaxKind::PIPE => "'|'",
        SyntaxKind::BANG => "'!'",
        SyntaxKind::SLASH => "'/'",
        SyntaxKind::CARET => "'^'",
        SyntaxKind::DOLLAR_EQ => "'$='",
        SyntaxKind::PIPE_EQ => "'|='",
        SyntaxKind::TILDE_EQ => "'~='",
        SyntaxKind::CARET_EQ => "'^='",
        SyntaxKind::STAR_EQ => "'*='",
        SyntaxKind::ERROR => "invalid character",
        SyntaxKind::EOF => "end of file",
    }
}
