//! Shared types for the Seni language core.
//!
//! This crate defines source spans, diagnostics, the parsed AST, the
//! compiled form representation and genotypes. Every other stage of the
//! pipeline depends on it.

mod error;
mod span;
pub mod ast;
pub mod form;
pub mod genotype;

pub use ast::{Node, NodeKind};
pub use error::{Diagnostics, ErrorCategory, ErrorCode, SeniError, Severity, MAX_ERRORS};
pub use form::{Colour, Form};
pub use genotype::{GeneCursor, Genotype, GenotypeError};
pub use span::Span;

/// Result type used by the lex, parse and compile stages.
pub type Result<T> = std::result::Result<T, SeniError>;
