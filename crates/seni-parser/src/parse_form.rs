//! Item parsing: lists, literals, quote abbreviations and bracket forms.

use seni_lexer::token::TokenKind;
use seni_types::ast::{Node, NodeKind};
use seni_types::{ErrorCode, SeniError, Span};
use tracing::trace;

use crate::parser::{Item, Parser};

type PResult<T> = Result<T, SeniError>;

impl Parser {
    /// Parse one item from the front of the queue.
    pub(crate) fn parse_item(&mut self) -> PResult<Item> {
        let Some(token) = self.advance() else {
            return Err(SeniError::new(
                ErrorCode::UNBALANCED_OPEN,
                "unexpected end of input",
                self.previous_span(),
            ));
        };
        let span = token.span;

        let kind = match token.kind {
            TokenKind::ListStart => return self.parse_list(span).map(Item::Node),
            TokenKind::ListEnd => {
                return Err(SeniError::new(
                    ErrorCode::UNBALANCED_CLOSE,
                    "unexpected ')' with no matching '('",
                    span,
                ))
            }
            TokenKind::BracketStart => return self.parse_bracket_form(span).map(Item::Node),
            TokenKind::BracketEnd => return Ok(Item::BracketEnd(span)),
            TokenKind::QuoteAbbreviation => return self.parse_quoted(span).map(Item::Node),
            TokenKind::Comment(text) => return Ok(Item::Comment(text)),
            TokenKind::Unknown(text) => {
                return Err(SeniError::new(
                    ErrorCode::UNKNOWN_TOKEN,
                    format!("unknown token '{text}'"),
                    span,
                ))
            }

            TokenKind::Int(n) => NodeKind::Int(n),
            TokenKind::Float(f) => NodeKind::Float(f),
            TokenKind::Str(s) => NodeKind::Str(s),
            TokenKind::Label(l) => NodeKind::Label(l),
            TokenKind::Name(n) => match n.as_str() {
                "true" => NodeKind::Boolean(true),
                "false" => NodeKind::Boolean(false),
                _ => NodeKind::Name(n),
            },
        };

        Ok(Item::Node(Node::new(kind, span)))
    }

    // ── Lists ─────────────────────────────────────────────────────────────────

    /// `( item* )`, after the opening paren.
    fn parse_list(&mut self, open: Span) -> PResult<Node> {
        let mut children = Vec::new();

        loop {
            match self.peek_kind() {
                None => {
                    return Err(SeniError::new(
                        ErrorCode::UNBALANCED_OPEN,
                        "unbalanced '(': missing ')'",
                        open,
                    )
                    .with_suggestion("add a closing ')'"));
                }
                Some(TokenKind::ListEnd) => {
                    self.advance();
                    return Ok(Node::list(children, open.merge(self.previous_span())));
                }
                Some(_) => {}
            }

            match self.parse_item()? {
                Item::Node(node) => children.push(node),
                Item::Comment(_) => {}
                Item::BracketEnd(span) => {
                    return Err(SeniError::new(
                        ErrorCode::UNBALANCED_CLOSE,
                        "unexpected ']' inside a list",
                        span,
                    ));
                }
            }
        }
    }

    // ── Quote Abbreviation ────────────────────────────────────────────────────

    /// `'item` becomes `(quote item)`, remembered as abbreviated.
    fn parse_quoted(&mut self, quote: Span) -> PResult<Node> {
        loop {
            if self.at_end() {
                return Err(SeniError::new(
                    ErrorCode::NOTHING_TO_QUOTE,
                    "nothing follows the quote",
                    quote,
                ));
            }
            match self.parse_item()? {
                Item::Node(item) => {
                    let span = quote.merge(item.span);
                    let children = vec![Node::name("quote", quote), item];
                    return Ok(Node::new(
                        NodeKind::List {
                            children,
                            quoted: true,
                        },
                        span,
                    ));
                }
                Item::Comment(_) => continue,
                Item::BracketEnd(span) => {
                    return Err(SeniError::new(
                        ErrorCode::NOTHING_TO_QUOTE,
                        "nothing follows the quote",
                        span,
                    ));
                }
            }
        }
    }

    // ── Bracket Forms ─────────────────────────────────────────────────────────

    /// `[ comment* value parameter* ]`, after the opening bracket.
    ///
    /// `value` becomes the alterable node. Comments before it are kept as its
    /// prefix; comments among the parameters are dropped.
    fn parse_bracket_form(&mut self, open: Span) -> PResult<Node> {
        let mut prefix = Vec::new();

        let mut node = loop {
            if self.at_end() {
                return Err(unbalanced_bracket(open));
            }
            match self.parse_item()? {
                Item::Comment(text) => prefix.push(text),
                Item::Node(node) => break node,
                Item::BracketEnd(span) => {
                    return Err(SeniError::new(
                        ErrorCode::EMPTY_BRACKET_FORM,
                        "bracket form has no value",
                        open.merge(span),
                    ));
                }
            }
        };

        if !node.is_literal() {
            return Err(SeniError::new(
                ErrorCode::NON_LITERAL_IN_BRACKETS,
                format!(
                    "a bracket form must start with a boolean, number, name or string, found {}",
                    node.kind_name()
                ),
                node.span,
            )
            .with_suggestion("bind the expression to a name and bracket a literal instead"));
        }

        // `[[x ...] ...]` folds into the inner form's node
        node.alterable = true;
        if node.gen_sym.is_none() {
            node.gen_sym = Some(self.next_gensym());
        }
        node.parameter_prefix.extend(prefix);

        loop {
            match self.peek_kind() {
                None => return Err(unbalanced_bracket(open)),
                Some(TokenKind::BracketEnd) => {
                    self.advance();
                    break;
                }
                Some(_) => {}
            }
            match self.parse_item()? {
                Item::Node(parameter) => node.parameter_ast.push(parameter),
                Item::Comment(_) | Item::BracketEnd(_) => {}
            }
        }

        trace!(
            gen_sym = node.gen_sym.as_deref().unwrap_or_default(),
            parameters = node.parameter_ast.len(),
            "bracket form"
        );
        Ok(node)
    }
}

fn unbalanced_bracket(open: Span) -> SeniError {
    SeniError::new(
        ErrorCode::UNBALANCED_OPEN,
        "unbalanced '[': missing ']'",
        open,
    )
    .with_suggestion("add a closing ']'")
}
