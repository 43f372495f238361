//! Core Seni lexer: converts source text to a token stream.
//!
//! Features:
//! - Whitespace and commas are insignificant separators
//! - `;` comments become COMMENT tokens (the parser decides what to keep)
//! - `name:` is a LABEL, anything else name-like is a NAME
//! - Fail-fast: the first unrecognised character ends lexing, and the
//!   result holds only that UNKNOWN token plus one error

use seni_types::{ErrorCode, SeniError, Span};
use tracing::debug;

use crate::token::{Token, TokenKind};

/// The Seni lexer.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
    /// Set once lexing has failed.
    error: Option<SeniError>,
}

/// Result of lexing.
///
/// On failure `tokens` holds exactly one [`TokenKind::Unknown`] and `error`
/// describes it; every token scanned before it is discarded.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub error: Option<SeniError>,
}

impl LexResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Tokenize a whole source string.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).lex().tokens
}

// ── Character classes ──

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | ',')
}

fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch, '+' | '-' | '*' | '/' | '<' | '>' | '=')
}

fn is_symbol(ch: char) -> bool {
    matches!(
        ch,
        '-' | '!' | '@' | '#' | '$' | '%' | '^' | '&' | '*' | '<' | '>' | '?'
    )
}

fn is_name_char(ch: char) -> bool {
    is_alpha(ch) || ch.is_ascii_digit() || is_symbol(ch)
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
            error: None,
        }
    }

    /// Lex the entire source into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                break;
            };

            let token = self.scan_token(ch);
            if let Some(error) = self.error.take() {
                debug!(%error, discarded = tokens.len(), "lexing stopped");
                return LexResult {
                    tokens: vec![token],
                    error: Some(error),
                };
            }
            tokens.push(token);
        }

        debug!(tokens = tokens.len(), "lexed source");
        LexResult {
            tokens,
            error: None,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.advance();
        }
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(is_whitespace);
    }

    /// Record a fatal error and produce the UNKNOWN token that ends the run.
    fn fail(&mut self, code: ErrorCode, message: String, lexeme: String, span: Span) -> Token {
        self.error = Some(SeniError::new(code, message, span));
        Token::new(TokenKind::Unknown(lexeme), span)
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self, ch: char) -> Token {
        let start_line = self.line;
        let start_col = self.col;

        let punctuation = match ch {
            '\'' => Some(TokenKind::QuoteAbbreviation),
            '(' => Some(TokenKind::ListStart),
            ')' => Some(TokenKind::ListEnd),
            '[' => Some(TokenKind::BracketStart),
            ']' => Some(TokenKind::BracketEnd),
            _ => None,
        };
        if let Some(kind) = punctuation {
            self.advance();
            return Token::new(kind, self.span_from(start_line, start_col));
        }

        match ch {
            '"' => self.scan_string(start_line, start_col),
            ';' => self.scan_comment(start_line, start_col),
            _ if self.starts_number(ch) => self.scan_number(start_line, start_col),
            _ if is_alpha(ch) => self.scan_name(start_line, start_col),
            _ => {
                self.advance();
                let span = self.span_from(start_line, start_col);
                self.fail(
                    ErrorCode::UNKNOWN_CHARACTER,
                    format!("unknown character '{ch}'"),
                    ch.to_string(),
                    span,
                )
            }
        }
    }

    /// Digits and `.` always start a number; `-` only when a digit (or `.digit`)
    /// follows, otherwise it is the subtraction name.
    fn starts_number(&self, ch: char) -> bool {
        match ch {
            '0'..='9' | '.' => true,
            '-' => match self.peek_at(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('.') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            },
            _ => false,
        }
    }

    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        self.advance(); // opening "
        let body_start = self.pos;
        let Some(len) = self.rest().find('"') else {
            let span = Span::point(start_line, start_col);
            return self.fail(
                ErrorCode::UNTERMINATED_STRING,
                "unterminated string literal".to_string(),
                "\"".to_string(),
                span,
            );
        };
        let value = self.source[body_start..body_start + len].to_string();
        while self.pos < body_start + len {
            self.advance();
        }
        self.advance(); // closing "
        Token::new(TokenKind::Str(value), self.span_from(start_line, start_col))
    }

    fn scan_comment(&mut self, start_line: u32, start_col: u32) -> Token {
        let start = self.pos;
        self.advance_while(|c| c != '\n');
        let value = self.source[start..self.pos].to_string();
        let span = self.span_from(start_line, start_col);
        self.advance(); // newline, if any
        Token::new(TokenKind::Comment(value), span)
    }

    fn scan_name(&mut self, start_line: u32, start_col: u32) -> Token {
        let start = self.pos;
        self.advance_while(is_name_char);
        let text = self.source[start..self.pos].to_string();

        if self.peek() == Some(':') {
            self.advance();
            return Token::new(TokenKind::Label(text), self.span_from(start_line, start_col));
        }
        Token::new(TokenKind::Name(text), self.span_from(start_line, start_col))
    }

    /// Scan an INT or FLOAT. The kind is decided by whether a `.` appears in
    /// the numeric run ahead; a FLOAT takes at most one `.`.
    fn scan_number(&mut self, start_line: u32, start_col: u32) -> Token {
        let is_float = self
            .rest()
            .char_indices()
            .take_while(|&(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && c == '-'))
            .any(|(_, c)| c == '.');

        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        self.advance_while(|c| c.is_ascii_digit());
        if is_float && self.peek() == Some('.') {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        let text = &self.source[start..self.pos];
        let span = self.span_from(start_line, start_col);
        let kind = if is_float {
            // "." and "-." have no digits at all
            if text.bytes().any(|b| b.is_ascii_digit()) {
                text.parse::<f64>().ok().map(TokenKind::Float)
            } else {
                None
            }
        } else {
            text.parse::<i64>().ok().map(TokenKind::Int)
        };

        match kind {
            Some(kind) => Token::new(kind, span),
            None => self.fail(
                ErrorCode::MALFORMED_NUMBER,
                format!("malformed number '{text}'"),
                text.to_string(),
                span,
            ),
        }
    }
}
