//! Seni parser: converts a token stream into a forest of AST nodes.

mod parse_form;
mod parser;

pub use parser::{parse, ParseResult, Parser};
