//! Tree-walking evaluator over compiled forms.

use std::rc::Rc;

use seni_types::form::{FALSE, TRUE};
use seni_types::Form;
use tracing::trace;

use crate::config::EvalConfig;
use crate::env::{Environment, ScopeId};
use crate::error::{EvalError, EvalResult};
use crate::registry::{Registry, SpecialForm};
use crate::value::{Args, Calling, Closure, Param, Value};

/// Evaluates compiled forms against its own [`Environment`].
///
/// Each interpreter owns its environment, so independent evaluations never
/// share state. The [`Registry`] is shared read-only.
pub struct Interpreter {
    env: Environment,
    registry: Rc<Registry>,
    config: EvalConfig,
    gas: u64,
    depth: usize,
}

impl Interpreter {
    /// An interpreter with the standard primitives bound in the root scope.
    pub fn new(config: EvalConfig) -> Self {
        Self::with_registry(config, Rc::new(Registry::standard()))
    }

    pub fn with_registry(config: EvalConfig, registry: Rc<Registry>) -> Self {
        let mut env = Environment::new();
        let root = env.root();
        for native in registry.natives() {
            env.add(root, native.name.as_str(), Value::Native(native.clone()));
        }
        Self {
            env,
            registry,
            config,
            gas: 0,
            depth: 0,
        }
    }

    pub fn root(&self) -> ScopeId {
        self.env.root()
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Bind a global in the root scope.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        let root = self.env.root();
        self.env.add(root, name, value);
    }

    /// Steps charged so far.
    pub fn gas_used(&self) -> u64 {
        self.gas
    }

    /// Evaluate top-level forms in the root scope; returns the last value.
    pub fn evaluate_all(&mut self, forms: &[Form]) -> EvalResult<Value> {
        let root = self.env.root();
        self.evaluate_body(root, forms)
    }

    /// Evaluate `forms` in a throwaway child of the root scope with a fresh
    /// gas budget. Bindings made by the forms are dropped afterwards.
    pub fn evaluate_isolated(&mut self, forms: &[Form]) -> EvalResult<Value> {
        self.gas = 0;
        let root = self.env.root();
        let mark = self.env.mark();
        let scope = self.env.new_scope(root);
        let result = self.evaluate_body(scope, forms);
        self.env.release(mark);
        result
    }

    /// Evaluate one form in `scope`.
    pub fn evaluate(&mut self, scope: ScopeId, form: &Form) -> EvalResult<Value> {
        self.tick()?;
        if self.depth >= self.config.max_depth {
            return Err(EvalError::DepthExceeded(self.config.max_depth));
        }
        self.depth += 1;
        let result = self.eval_form(scope, form);
        self.depth -= 1;
        result
    }

    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        if self.gas > self.config.gas_limit {
            Err(EvalError::GasExhausted(self.config.gas_limit))
        } else {
            Ok(())
        }
    }

    fn eval_form(&mut self, scope: ScopeId, form: &Form) -> EvalResult<Value> {
        match form {
            Form::Number(n) => Ok(Value::Number(*n)),
            Form::Str(s) => Ok(Value::Str(s.clone())),
            Form::Colour(c) => Ok(Value::Colour(*c)),
            Form::Null => Ok(Value::Null),
            Form::Symbol(s) if s == TRUE || s == FALSE => Ok(Value::Symbol(s.clone())),
            Form::Symbol(name) => self
                .env
                .lookup(scope, name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
            Form::Map(pairs) => {
                let mut values = Vec::with_capacity(pairs.len());
                for (label, form) in pairs {
                    values.push((label.clone(), self.evaluate(scope, form)?));
                }
                Ok(Value::Map(values))
            }
            Form::List(items) => self.eval_list(scope, items),
        }
    }

    /// Evaluate forms in order, returning the last value (or null).
    fn evaluate_body(&mut self, scope: ScopeId, body: &[Form]) -> EvalResult<Value> {
        let mut last = Value::Null;
        for form in body {
            last = self.evaluate(scope, form)?;
        }
        Ok(last)
    }

    fn eval_list(&mut self, scope: ScopeId, items: &[Form]) -> EvalResult<Value> {
        let Some(head) = items.first() else {
            return Err(EvalError::malformed("application", "empty list"));
        };
        if let Some(special) = head.as_symbol().and_then(|s| self.registry.special_form(s)) {
            trace!(form = special.keyword(), "special form");
            return self.eval_special(special, scope, items);
        }
        let callee = self.evaluate(scope, head)?;
        self.apply(scope, callee, &items[1..])
    }

    // ══════════════════════════════════════════════════════════════════════
    // Application
    // ══════════════════════════════════════════════════════════════════════

    fn apply(&mut self, scope: ScopeId, callee: Value, operands: &[Form]) -> EvalResult<Value> {
        match callee {
            Value::Closure(closure) => {
                let args = self.eval_args(scope, operands, true)?;
                self.call_closure(&closure, args)
            }
            Value::Native(native) => {
                let named = native.calling == Calling::Named;
                let args = self.eval_args(scope, operands, named)?;
                native.call(&args)
            }
            other => Err(EvalError::NotCallable(format!(
                "{other} ({})",
                other.type_name()
            ))),
        }
    }

    /// A lone map operand is a named call when the callee accepts one.
    fn eval_args(
        &mut self,
        scope: ScopeId,
        operands: &[Form],
        accepts_named: bool,
    ) -> EvalResult<Args> {
        if accepts_named {
            if let [Form::Map(pairs)] = operands {
                let mut named = Vec::with_capacity(pairs.len());
                for (label, form) in pairs {
                    named.push((label.clone(), self.evaluate(scope, form)?));
                }
                return Ok(Args::Named(named));
            }
        }
        let values = operands
            .iter()
            .map(|form| self.evaluate(scope, form))
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(Args::Positional(values))
    }

    fn call_closure(&mut self, closure: &Closure, args: Args) -> EvalResult<Value> {
        let name = closure.display_name();
        let mut supplied: Vec<Option<Value>> = vec![None; closure.params.len()];
        match args {
            Args::Positional(values) => {
                if values.len() > closure.params.len() {
                    return Err(EvalError::arity(
                        name,
                        format!(
                            "expected at most {} argument(s), got {}",
                            closure.params.len(),
                            values.len()
                        ),
                    ));
                }
                for (slot, value) in supplied.iter_mut().zip(values) {
                    *slot = Some(value);
                }
            }
            Args::Named(pairs) => {
                for (label, value) in pairs {
                    let Some(index) = closure.params.iter().position(|p| p.name == label) else {
                        return Err(EvalError::arity(name, format!("unknown parameter '{label}'")));
                    };
                    supplied[index] = Some(value);
                }
            }
        }

        let mut bindings = Vec::with_capacity(closure.params.len());
        for (param, value) in closure.params.iter().zip(supplied) {
            match value.or_else(|| param.default.clone()) {
                Some(value) => bindings.push((param.name.as_str(), value)),
                None => {
                    return Err(EvalError::arity(
                        name,
                        format!("missing argument '{}'", param.name),
                    ))
                }
            }
        }

        let mark = self.env.mark();
        let call_scope = self.env.new_scope(closure.scope);
        for (key, value) in bindings {
            self.env.add(call_scope, key, value);
        }
        let result = self.evaluate_body(call_scope, &closure.body);
        self.env.release(mark);
        result
    }

    // ══════════════════════════════════════════════════════════════════════
    // Special forms
    // ══════════════════════════════════════════════════════════════════════

    fn eval_special(
        &mut self,
        form: SpecialForm,
        scope: ScopeId,
        items: &[Form],
    ) -> EvalResult<Value> {
        match form {
            SpecialForm::If => self.eval_if(scope, items),
            SpecialForm::Quote => match items {
                [_, operand] => Ok(Value::from(operand)),
                _ => Err(EvalError::malformed("quote", "expected exactly one operand")),
            },
            SpecialForm::Define => self.eval_define(scope, items),
            SpecialForm::Set => self.eval_set(scope, items),
            SpecialForm::Begin => self.evaluate_body(scope, &items[1..]),
            SpecialForm::Let => self.eval_let(scope, items),
            SpecialForm::Lambda => self.eval_lambda(scope, items),
            SpecialForm::Fn => self.eval_fn(scope, items),
            SpecialForm::Loop => self.eval_loop(scope, items),
        }
    }

    /// `(if cond then else?)`. Only `#t` counts as true.
    fn eval_if(&mut self, scope: ScopeId, items: &[Form]) -> EvalResult<Value> {
        let (cond, then, otherwise) = match items {
            [_, cond, then] => (cond, then, None),
            [_, cond, then, otherwise] => (cond, then, Some(otherwise)),
            _ => {
                return Err(EvalError::malformed(
                    "if",
                    format!("expected 2 or 3 operands, got {}", items.len() - 1),
                ))
            }
        };
        if self.evaluate(scope, cond)?.is_true() {
            self.evaluate(scope, then)
        } else if let Some(otherwise) = otherwise {
            self.evaluate(scope, otherwise)
        } else {
            Ok(Value::Null)
        }
    }

    /// `(define a 1 b 2)`: binds in the current scope, returns the last value.
    fn eval_define(&mut self, scope: ScopeId, items: &[Form]) -> EvalResult<Value> {
        let pairs = &items[1..];
        if pairs.is_empty() {
            return Err(EvalError::MalformedDefine("nothing to define".into()));
        }
        if pairs.len() % 2 != 0 {
            return Err(EvalError::MalformedDefine(format!(
                "{} has no value",
                pairs[pairs.len() - 1]
            )));
        }
        let mut last = Value::Null;
        for pair in pairs.chunks(2) {
            let Form::Symbol(name) = &pair[0] else {
                return Err(EvalError::MalformedDefine(format!(
                    "expected a name, got {}",
                    pair[0]
                )));
            };
            let value = self.evaluate(scope, &pair[1])?;
            self.env.add(scope, name.as_str(), value.clone());
            last = value;
        }
        Ok(last)
    }

    /// `(set! name value)`. An unbound name is created in the current scope.
    fn eval_set(&mut self, scope: ScopeId, items: &[Form]) -> EvalResult<Value> {
        let [_, target, expr] = items else {
            return Err(EvalError::malformed("set!", "expected a name and a value"));
        };
        let Form::Symbol(name) = target else {
            return Err(EvalError::malformed(
                "set!",
                format!("expected a name, got {target}"),
            ));
        };
        let value = self.evaluate(scope, expr)?;
        self.env.mutate(scope, name, value.clone());
        Ok(value)
    }

    /// `(let ((a 1) (b a)) body...)` or `(let (a: 1 b: 2) body...)`.
    fn eval_let(&mut self, scope: ScopeId, items: &[Form]) -> EvalResult<Value> {
        let Some(bindings) = items.get(1) else {
            return Err(EvalError::malformed("let", "missing binding list"));
        };
        let pairs: Vec<(&str, &Form)> = match bindings {
            Form::List(entries) => entries
                .iter()
                .map(|entry| match entry {
                    Form::List(pair) => match pair.as_slice() {
                        [Form::Symbol(name), value] => Ok((name.as_str(), value)),
                        _ => Err(EvalError::malformed(
                            "let",
                            format!("binding {entry} should be (name value)"),
                        )),
                    },
                    other => Err(EvalError::malformed(
                        "let",
                        format!("binding {other} should be (name value)"),
                    )),
                })
                .collect::<EvalResult<_>>()?,
            Form::Map(entries) => entries.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            other => {
                return Err(EvalError::malformed(
                    "let",
                    format!("expected a binding list, got {other}"),
                ))
            }
        };

        let mark = self.env.mark();
        let let_scope = self.env.new_scope(scope);
        let result = self.bind_and_run(let_scope, &pairs, &items[2..]);
        self.env.release(mark);
        result
    }

    fn bind_and_run(
        &mut self,
        scope: ScopeId,
        pairs: &[(&str, &Form)],
        body: &[Form],
    ) -> EvalResult<Value> {
        for (name, form) in pairs {
            let value = self.evaluate(scope, form)?;
            self.env.add(scope, *name, value);
        }
        self.evaluate_body(scope, body)
    }

    /// `(lambda (x y) body...)` or `(lambda (x: 0 y: 1) body...)`.
    fn eval_lambda(&mut self, scope: ScopeId, items: &[Form]) -> EvalResult<Value> {
        let [_, params, body @ ..] = items else {
            return Err(EvalError::malformed("lambda", "missing parameter list"));
        };
        if body.is_empty() {
            return Err(EvalError::malformed("lambda", "missing body"));
        }
        let params = match params {
            Form::List(names) => self.positional_params("lambda", names)?,
            Form::Map(pairs) => self.default_params(scope, pairs)?,
            other => {
                return Err(EvalError::malformed(
                    "lambda",
                    format!("expected a parameter list, got {other}"),
                ))
            }
        };
        Ok(self.make_closure(None, params, body, scope))
    }

    /// `(fn (name a: 1 b: 2) body...)`: binds the closure in the current scope.
    fn eval_fn(&mut self, scope: ScopeId, items: &[Form]) -> EvalResult<Value> {
        let [_, Form::List(signature), body @ ..] = items else {
            return Err(EvalError::malformed("fn", "expected (fn (name params...) body...)"));
        };
        if body.is_empty() {
            return Err(EvalError::malformed("fn", "missing body"));
        }
        let Some((Form::Symbol(name), rest)) = signature.split_first() else {
            return Err(EvalError::malformed("fn", "function name must be a name"));
        };
        let params = match rest {
            [Form::Map(pairs)] => self.default_params(scope, pairs)?,
            names => self.positional_params("fn", names)?,
        };
        let closure = self.make_closure(Some(name.clone()), params, body, scope);
        self.env.add(scope, name.as_str(), closure.clone());
        Ok(closure)
    }

    fn positional_params(&self, form: &'static str, names: &[Form]) -> EvalResult<Vec<Param>> {
        names
            .iter()
            .map(|name| match name {
                Form::Symbol(s) => Ok(Param {
                    name: s.clone(),
                    default: None,
                }),
                other => Err(EvalError::malformed(
                    form,
                    format!("parameter {other} is not a name"),
                )),
            })
            .collect()
    }

    /// Defaults are evaluated once, when the function is defined.
    fn default_params(
        &mut self,
        scope: ScopeId,
        pairs: &[(String, Form)],
    ) -> EvalResult<Vec<Param>> {
        let mut params = Vec::with_capacity(pairs.len());
        for (name, form) in pairs {
            params.push(Param {
                name: name.clone(),
                default: Some(self.evaluate(scope, form)?),
            });
        }
        Ok(params)
    }

    fn make_closure(
        &mut self,
        name: Option<String>,
        params: Vec<Param>,
        body: &[Form],
        scope: ScopeId,
    ) -> Value {
        self.env.pin(scope);
        Value::Closure(Rc::new(Closure {
            name,
            params,
            body: body.to_vec(),
            scope,
        }))
    }

    /// `(loop (v from: 0 to: 10 increment: 2) body...)`
    ///
    /// `to` is exclusive, `upto` inclusive. With `steps` the range is split
    /// into that many evenly spaced values.
    fn eval_loop(&mut self, scope: ScopeId, items: &[Form]) -> EvalResult<Value> {
        let [_, Form::List(control), body @ ..] = items else {
            return Err(EvalError::malformed("loop", "expected (loop (var ...) body...)"));
        };
        let (var, range) = match control.as_slice() {
            [Form::Symbol(var)] => (var, None),
            [Form::Symbol(var), Form::Map(range)] => (var, Some(range)),
            _ => {
                return Err(EvalError::malformed(
                    "loop",
                    "control should be (var from: .. to: ..)",
                ))
            }
        };

        let mut bounds = Vec::new();
        for (label, form) in range.into_iter().flatten() {
            match self.evaluate(scope, form)? {
                Value::Number(n) => bounds.push((label.as_str(), n)),
                other => {
                    return Err(EvalError::TypeMismatch(format!(
                        "loop: '{label}' should be a number, got {}",
                        other.type_name()
                    )))
                }
            }
        }
        let get = |label: &str| bounds.iter().find(|(k, _)| *k == label).map(|(_, n)| *n);

        let from = get("from").unwrap_or(0.0);
        let values: Box<dyn Iterator<Item = f64>> = if let Some(steps) = get("steps") {
            if steps < 1.0 {
                return Err(EvalError::malformed("loop", "steps must be at least 1"));
            }
            let steps = steps as usize;
            let unit = match get("upto") {
                Some(_) if steps == 1 => 0.0,
                Some(upto) => (upto - from) / (steps - 1) as f64,
                None => (get("to").unwrap_or(1.0) - from) / steps as f64,
            };
            Box::new((0..steps).map(move |i| from + unit * i as f64))
        } else {
            let increment = get("increment").unwrap_or(1.0);
            if increment == 0.0 {
                return Err(EvalError::malformed("loop", "increment must not be zero"));
            }
            let (end, inclusive) = match get("upto") {
                Some(upto) => (upto, true),
                None => (get("to").unwrap_or(1.0), false),
            };
            let step = if end >= from {
                increment.abs()
            } else {
                -increment.abs()
            };
            Box::new(
                (0u64..)
                    .map(move |i| from + step * i as f64)
                    .take_while(move |v| match (step > 0.0, inclusive) {
                        (true, true) => *v <= end,
                        (true, false) => *v < end,
                        (false, true) => *v >= end,
                        (false, false) => *v > end,
                    }),
            )
        };

        let mut last = Value::Null;
        for v in values {
            self.tick()?;
            let mark = self.env.mark();
            let iteration = self.env.new_scope(scope);
            self.env.add(iteration, var.as_str(), Value::Number(v));
            let result = self.evaluate_body(iteration, body);
            self.env.release(mark);
            last = result?;
        }
        Ok(last)
    }
}
