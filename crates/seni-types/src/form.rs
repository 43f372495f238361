//! Compiled forms: the flattened list/map representation the interpreter runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Truth value produced by comparisons and tested by `if`.
pub const TRUE: &str = "#t";
/// False value produced by comparisons.
pub const FALSE: &str = "#f";

/// An RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub alpha: f64,
}

impl Colour {
    pub fn new(r: f64, g: f64, b: f64, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }
}

/// A compiled value.
///
/// Booleans are the symbols `#t`/`#f`. Strings that should not be looked up
/// as names are wrapped by the compiler as `(quote "s")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Form {
    Number(f64),
    Symbol(String),
    Str(String),
    List(Vec<Form>),
    /// Label/value pairs in source order.
    Map(Vec<(String, Form)>),
    Colour(Colour),
    Null,
}

impl Form {
    pub fn symbol(s: impl Into<String>) -> Self {
        Form::Symbol(s.into())
    }

    /// `#t` or `#f`.
    pub fn boolean(b: bool) -> Self {
        Form::symbol(if b { TRUE } else { FALSE })
    }

    /// `(quote form)`
    pub fn quote(form: Form) -> Self {
        Form::List(vec![Form::symbol("quote"), form])
    }

    /// Exactly the symbol `#t`.
    pub fn is_true(&self) -> bool {
        matches!(self, Form::Symbol(s) if s == TRUE)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Form::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Form::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a label in a map form.
    pub fn get(&self, label: &str) -> Option<&Form> {
        match self {
            Form::Map(pairs) => pairs.iter().find(|(k, _)| k == label).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<f64> for Form {
    fn from(n: f64) -> Self {
        Form::Number(n)
    }
}

impl From<i64> for Form {
    fn from(n: i64) -> Self {
        Form::Number(n as f64)
    }
}

/// Integers print without a fractional part; everything else uses `{}`.
pub(crate) fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::Number(n) => write_number(f, *n),
            Form::Symbol(s) => write!(f, "{s}"),
            Form::Str(s) => write!(f, "\"{s}\""),
            Form::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Form::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Form::Colour(c) => {
                write!(f, "(col/rgb r: ")?;
                write_number(f, c.r)?;
                write!(f, " g: ")?;
                write_number(f, c.g)?;
                write!(f, " b: ")?;
                write_number(f, c.b)?;
                write!(f, " alpha: ")?;
                write_number(f, c.alpha)?;
                write!(f, ")")
            }
            Form::Null => write!(f, "null"),
        }
    }
}
