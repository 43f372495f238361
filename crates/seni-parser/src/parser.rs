//! Core parser infrastructure: token queue, error reporting, helpers.

use std::collections::VecDeque;

use seni_lexer::token::{Token, TokenKind};
use seni_types::ast::Node;
use seni_types::{ErrorCode, SeniError, Span};
use tracing::debug;

/// The Seni parser.
///
/// Takes ownership of a token stream and consumes it front to back. Parse
/// errors are structural and fatal: the first one stops parsing.
pub struct Parser {
    /// Remaining tokens.
    tokens: VecDeque<Token>,
    /// Span of the most recently consumed token.
    last_span: Span,
    /// Number of alterable nodes discovered so far.
    gensym_counter: usize,
}

/// Result of parsing.
///
/// When `error` is set `nodes` is empty: no partial tree is handed on.
#[derive(Debug)]
pub struct ParseResult {
    pub nodes: Vec<Node>,
    pub error: Option<SeniError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`, discarding nothing on success.
    pub fn into_result(self) -> seni_types::Result<Vec<Node>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.nodes),
        }
    }
}

/// One step of item parsing.
pub(crate) enum Item {
    Node(Node),
    /// A `;` comment, kept only where a bracket form wants it.
    Comment(String),
    /// `]` where an item was expected.
    BracketEnd(Span),
}

/// Parse a token stream.
pub fn parse(tokens: Vec<Token>) -> ParseResult {
    Parser::new(tokens).parse()
}

impl Parser {
    /// Create a new parser from a token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
            last_span: Span::point(1, 1),
            gensym_counter: 0,
        }
    }

    /// Parse every top-level item.
    pub fn parse(mut self) -> ParseResult {
        let mut nodes = Vec::new();

        while !self.at_end() {
            match self.parse_item() {
                Ok(Item::Node(node)) => nodes.push(node),
                Ok(Item::Comment(_)) => {}
                Ok(Item::BracketEnd(span)) => {
                    return self.failed(SeniError::new(
                        ErrorCode::UNBALANCED_CLOSE,
                        "unexpected ']' with no matching '['",
                        span,
                    ));
                }
                Err(error) => return self.failed(error),
            }
        }

        debug!(nodes = nodes.len(), alterable = self.gensym_counter, "parsed source");
        ParseResult { nodes, error: None }
    }

    fn failed(&self, error: SeniError) -> ParseResult {
        debug!(%error, "parse failed");
        ParseResult {
            nodes: Vec::new(),
            error: Some(error),
        }
    }

    // ── Token Queue ───────────────────────────────────────────────────────────

    /// Returns the kind of the next token without consuming it.
    pub(crate) fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.front().map(|t| &t.kind)
    }

    /// Remove and return the next token.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.pop_front()?;
        self.last_span = token.span;
        Some(token)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        self.last_span
    }

    /// Next generated symbol for an alterable node.
    pub(crate) fn next_gensym(&mut self) -> String {
        let sym = format!("__gensym_{}", self.gensym_counter);
        self.gensym_counter += 1;
        sym
    }
}
