//! Runtime error types for the Seni interpreter.

/// Evaluation error. Always aborts the current evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Name not found in any enclosing scope
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
    /// Special form given the wrong number or kind of operands
    #[error("malformed {form}: {reason}")]
    MalformedSpecialForm { form: &'static str, reason: String },
    /// `define` target that is not a name, or a dangling name
    #[error("malformed define: {0}")]
    MalformedDefine(String),
    /// Wrong number of arguments, unknown label, missing argument
    #[error("wrong arguments to {name}: {reason}")]
    Arity { name: String, reason: String },
    /// Head of an application is not a function
    #[error("not callable: {0}")]
    NotCallable(String),
    /// Operand of the wrong type
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Division by zero
    #[error("arithmetic trap: {0}")]
    ArithmeticTrap(String),
    #[error("gas exhausted after {0} steps")]
    GasExhausted(u64),
    #[error("evaluation nested deeper than {0}")]
    DepthExceeded(usize),
    /// Failure reported by a native function
    #[error("{name}: {message}")]
    Native { name: String, message: String },
}

impl EvalError {
    pub(crate) fn malformed(form: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedSpecialForm {
            form,
            reason: reason.into(),
        }
    }

    pub(crate) fn arity(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Arity {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Error raised from inside a native function.
    pub fn native(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Native {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result alias for interpreter operations.
pub type EvalResult<T> = Result<T, EvalError>;
