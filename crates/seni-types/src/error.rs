use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors stored before further errors are only counted.
pub const MAX_ERRORS: usize = 20;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Pipeline stage a diagnostic belongs to, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lex,
    Parse,
    Compile,
}

/// Numeric error code (E100–E399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lex errors (E100–E199) ──
    pub const UNKNOWN_CHARACTER: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);
    pub const MALFORMED_NUMBER: Self = Self(102);

    // ── Parse errors (E200–E299) ──
    pub const UNBALANCED_OPEN: Self = Self(200);
    pub const UNBALANCED_CLOSE: Self = Self(201);
    pub const NON_LITERAL_IN_BRACKETS: Self = Self(202);
    pub const EMPTY_BRACKET_FORM: Self = Self(203);
    pub const NOTHING_TO_QUOTE: Self = Self(204);
    pub const UNKNOWN_TOKEN: Self = Self(205);

    // ── Compile errors (E300–E399) ──
    pub const NAMED_PARAMETER_ARITY: Self = Self(300);
    pub const EXPECTED_LABEL: Self = Self(301);
    pub const STRAY_LABEL: Self = Self(302);
    pub const GENOTYPE_EXHAUSTED: Self = Self(310);
    pub const GENOTYPE_SURPLUS: Self = Self(311);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lex,
            200..=299 => ErrorCategory::Parse,
            _ => ErrorCategory::Compile,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex => write!(f, "lex"),
            Self::Parse => write!(f, "parse"),
            Self::Compile => write!(f, "compile"),
        }
    }
}

/// A structured diagnostic from the lexer, parser or compiler.
///
/// Callers render these for the user; the message is never parsed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeniError {
    pub code: ErrorCode,
    pub severity: Severity,
    pub category: ErrorCategory,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl SeniError {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            suggestion: None,
        }
    }

    /// Create a warning.
    pub fn warning(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::new(code, message, span)
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for SeniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for SeniError {}

/// Errors and warnings collected by a stage that keeps going after a problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<SeniError>,
    pub warnings: Vec<SeniError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl Diagnostics {
    /// Create an empty set (no errors).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: SeniError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Add a warning.
    pub fn push_warning(&mut self, warning: SeniError) {
        self.warnings.push(warning);
        self.total_warnings += 1;
    }

    /// Route a diagnostic by its severity.
    pub fn push(&mut self, diagnostic: SeniError) {
        match diagnostic.severity {
            Severity::Error => self.push_error(diagnostic),
            Severity::Warning => self.push_warning(diagnostic),
        }
    }

    /// The first stored error, if any.
    pub fn first_error(&self) -> Option<&SeniError> {
        self.errors.first()
    }
}
