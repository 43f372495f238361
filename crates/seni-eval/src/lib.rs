//! Seni tree-walking interpreter.
//!
//! Evaluates compiled [`Form`](seni_types::Form)s against a scoped
//! [`Environment`]. Special forms and primitive functions come from an
//! explicit [`Registry`] rather than global tables, so any number of
//! interpreters can run side by side.

mod config;
mod env;
mod error;
mod interpreter;
mod primitives;
mod registry;
mod value;

pub use config::EvalConfig;
pub use env::{Environment, ScopeId};
pub use error::{EvalError, EvalResult};
pub use interpreter::Interpreter;
pub use registry::{Registry, SpecialForm};
pub use value::{Args, Calling, Closure, NativeFn, Param, Value};
