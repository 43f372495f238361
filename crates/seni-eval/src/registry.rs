//! The keyword table: special forms and the native functions bound at startup.
//!
//! Built once and shared (read-only) by any number of interpreters.

use std::collections::HashMap;

use crate::primitives;
use crate::value::NativeFn;

/// Forms whose operands are handed over unevaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialForm {
    If,
    Quote,
    Define,
    Set,
    Begin,
    Let,
    Lambda,
    Fn,
    Loop,
}

impl SpecialForm {
    pub const ALL: [SpecialForm; 9] = [
        SpecialForm::If,
        SpecialForm::Quote,
        SpecialForm::Define,
        SpecialForm::Set,
        SpecialForm::Begin,
        SpecialForm::Let,
        SpecialForm::Lambda,
        SpecialForm::Fn,
        SpecialForm::Loop,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            SpecialForm::If => "if",
            SpecialForm::Quote => "quote",
            SpecialForm::Define => "define",
            SpecialForm::Set => "set!",
            SpecialForm::Begin => "begin",
            SpecialForm::Let => "let",
            SpecialForm::Lambda => "lambda",
            SpecialForm::Fn => "fn",
            SpecialForm::Loop => "loop",
        }
    }
}

/// Special forms plus natives.
#[derive(Debug, Clone)]
pub struct Registry {
    special_forms: HashMap<&'static str, SpecialForm>,
    natives: Vec<NativeFn>,
}

impl Registry {
    /// Special forms only, no natives.
    pub fn empty() -> Self {
        Self {
            special_forms: SpecialForm::ALL.iter().map(|f| (f.keyword(), *f)).collect(),
            natives: Vec::new(),
        }
    }

    /// Special forms plus the required primitives.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.natives = primitives::standard_natives();
        registry
    }

    /// Add (or replace, by name) a native function.
    pub fn with_native(mut self, native: NativeFn) -> Self {
        self.natives.retain(|n| n.name != native.name);
        self.natives.push(native);
        self
    }

    pub fn special_form(&self, name: &str) -> Option<SpecialForm> {
        self.special_forms.get(name).copied()
    }

    pub fn natives(&self) -> &[NativeFn] {
        &self.natives
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
