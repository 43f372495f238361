//! Runtime values.

use std::fmt;
use std::rc::Rc;

use seni_types::form::{FALSE, TRUE};
use seni_types::{Colour, Form};

use crate::env::ScopeId;
use crate::error::{EvalError, EvalResult};

/// A value produced by evaluation.
///
/// Mirrors [`Form`] plus the two callable kinds. Booleans are the symbols
/// `#t`/`#f`.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Symbol(String),
    Str(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    Colour(Colour),
    /// "No value": an `if` without else, an empty `begin`.
    Null,
    Closure(Rc<Closure>),
    Native(NativeFn),
}

impl Value {
    pub fn boolean(b: bool) -> Self {
        Value::Symbol(if b { TRUE } else { FALSE }.to_string())
    }

    /// Exactly the symbol `#t`.
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Symbol(s) if s == TRUE)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Symbol(_) => "symbol",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Colour(_) => "colour",
            Value::Null => "null",
            Value::Closure(_) => "lambda",
            Value::Native(_) => "native function",
        }
    }

    /// Convert back to a plain form. Functions have no form.
    pub fn to_form(&self) -> Option<Form> {
        Some(match self {
            Value::Number(n) => Form::Number(*n),
            Value::Symbol(s) => Form::Symbol(s.clone()),
            Value::Str(s) => Form::Str(s.clone()),
            Value::List(items) => {
                Form::List(items.iter().map(Value::to_form).collect::<Option<_>>()?)
            }
            Value::Map(pairs) => Form::Map(
                pairs
                    .iter()
                    .map(|(k, v)| Some((k.clone(), v.to_form()?)))
                    .collect::<Option<_>>()?,
            ),
            Value::Colour(c) => Form::Colour(*c),
            Value::Null => Form::Null,
            Value::Closure(_) | Value::Native(_) => return None,
        })
    }
}

impl From<&Form> for Value {
    fn from(form: &Form) -> Self {
        match form {
            Form::Number(n) => Value::Number(*n),
            Form::Symbol(s) => Value::Symbol(s.clone()),
            Form::Str(s) => Value::Str(s.clone()),
            Form::List(items) => Value::List(items.iter().map(Value::from).collect()),
            Form::Map(pairs) => Value::Map(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
            Form::Colour(c) => Value::Colour(*c),
            Form::Null => Value::Null,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) | (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Colour(a), Value::Colour(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(&a.func, &b.func),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Closure(c) => match &c.name {
                Some(name) => write!(f, "#<lambda {name}>"),
                None => write!(f, "#<lambda>"),
            },
            Value::Native(n) => write!(f, "#<native {}>", n.name),
            other => match other.to_form() {
                Some(form) => write!(f, "{form}"),
                None => write!(f, "#<{}>", other.type_name()),
            },
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════════════

/// A formal parameter. Parameters without a default must be supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
}

/// A user-defined function and the scope it closes over.
#[derive(Debug)]
pub struct Closure {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: Vec<Form>,
    pub scope: ScopeId,
}

impl Closure {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("lambda")
    }
}

/// Evaluated call arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    Positional(Vec<Value>),
    /// `(f a: 1 b: 2)`, in source order.
    Named(Vec<(String, Value)>),
}

impl Args {
    /// A named argument; positional calls have none.
    pub fn get(&self, label: &str) -> Option<&Value> {
        match self {
            Args::Named(pairs) => pairs.iter().find(|(k, _)| k == label).map(|(_, v)| v),
            Args::Positional(_) => None,
        }
    }

    /// A named number argument, or `default` when absent.
    pub fn number_or(&self, name: &str, label: &str, default: f64) -> EvalResult<f64> {
        match self.get(label) {
            None => Ok(default),
            Some(Value::Number(n)) => Ok(*n),
            Some(other) => Err(EvalError::TypeMismatch(format!(
                "{name}: '{label}' should be a number, got {}",
                other.type_name()
            ))),
        }
    }
}

type NativeBody = dyn Fn(&Args) -> EvalResult<Value>;

/// How a native function wants its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calling {
    /// `(+ 1 2 3)`: every operand is evaluated into a list.
    Positional,
    /// `(int min: 0 max: 9)`: a single map operand becomes labelled arguments.
    Named,
}

/// A function implemented in Rust.
#[derive(Clone)]
pub struct NativeFn {
    pub name: String,
    pub calling: Calling,
    func: Rc<NativeBody>,
}

impl NativeFn {
    pub fn positional(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> EvalResult<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            calling: Calling::Positional,
            func: Rc::new(move |args: &Args| match args {
                Args::Positional(values) => func(values),
                // positional natives never receive named arguments
                Args::Named(pairs) => {
                    let values: Vec<Value> = pairs.iter().map(|(_, v)| v.clone()).collect();
                    func(&values)
                }
            }),
        }
    }

    pub fn named(
        name: impl Into<String>,
        func: impl Fn(&Args) -> EvalResult<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            calling: Calling::Named,
            func: Rc::new(func),
        }
    }

    pub fn call(&self, args: &Args) -> EvalResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("name", &self.name)
            .field("calling", &self.calling)
            .finish_non_exhaustive()
    }
}
