//! Token types for the Seni lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the language and
//! [`Token`], which pairs a kind with a source [`Span`].

use seni_types::Span;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the language. Payload-carrying kinds hold their value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Punctuation ──────────────────────────────────────────

    /// `(`
    ListStart,
    /// `)`
    ListEnd,
    /// `[`
    BracketStart,
    /// `]`
    BracketEnd,
    /// `'`
    QuoteAbbreviation,

    // ── Values ───────────────────────────────────────────────

    /// `"text"` without the quotes. No escape processing.
    Str(String),
    /// `foo`, `+`, `col/rgb`
    Name(String),
    /// `arg1:` without the colon.
    Label(String),
    /// `42`, `-7`
    Int(i64),
    /// `3.14`, `-.5`
    Float(f64),
    /// `; text` up to, not including, the newline. Includes the `;`.
    Comment(String),

    /// An unrecognised character. Always the last token of a run.
    Unknown(String),
}

impl TokenKind {
    /// The kind name, independent of payload.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::ListStart => "LIST_START",
            TokenKind::ListEnd => "LIST_END",
            TokenKind::BracketStart => "BRACKET_START",
            TokenKind::BracketEnd => "BRACKET_END",
            TokenKind::QuoteAbbreviation => "QUOTE_ABBREVIATION",
            TokenKind::Str(_) => "STRING",
            TokenKind::Name(_) => "NAME",
            TokenKind::Label(_) => "LABEL",
            TokenKind::Int(_) => "INT",
            TokenKind::Float(_) => "FLOAT",
            TokenKind::Comment(_) => "COMMENT",
            TokenKind::Unknown(_) => "UNKNOWN",
        }
    }

    /// The payload rendered as text, absent for pure punctuation.
    pub fn value(&self) -> Option<String> {
        match self {
            TokenKind::Str(s)
            | TokenKind::Name(s)
            | TokenKind::Label(s)
            | TokenKind::Comment(s)
            | TokenKind::Unknown(s) => Some(s.clone()),
            TokenKind::Int(n) => Some(n.to_string()),
            TokenKind::Float(f) => Some(f.to_string()),
            TokenKind::ListStart
            | TokenKind::ListEnd
            | TokenKind::BracketStart
            | TokenKind::BracketEnd
            | TokenKind::QuoteAbbreviation => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::ListStart => write!(f, "("),
            TokenKind::ListEnd => write!(f, ")"),
            TokenKind::BracketStart => write!(f, "["),
            TokenKind::BracketEnd => write!(f, "]"),
            TokenKind::QuoteAbbreviation => write!(f, "'"),
            TokenKind::Str(s) => write!(f, "\"{s}\""),
            TokenKind::Name(s) | TokenKind::Comment(s) | TokenKind::Unknown(s) => write!(f, "{s}"),
            TokenKind::Label(s) => write!(f, "{s}:"),
            TokenKind::Int(n) => write!(f, "{n}"),
            TokenKind::Float(n) => write!(f, "{n}"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
