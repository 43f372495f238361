//! Functions available inside bracket-form parameter annotations.
//!
//! ```text
//! [12 (int min: 0 max: 20)]
//! [0.5 (scalar)]
//! [red (select from: '(red green blue))]
//! ```
//!
//! Every binding draws from one shared, seeded generator, so a given seed
//! always yields the same sequence of genes.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::Rng;
use seni_eval::{Args, EvalError, EvalResult, NativeFn, Registry, Value};

pub type SharedRng = Rc<RefCell<StdRng>>;

/// The standard registry plus the bracket bindings.
pub fn bracket_registry(rng: &SharedRng) -> Registry {
    Registry::standard()
        .with_native(NativeFn::named("identity", identity))
        .with_native(int(rng.clone()))
        .with_native(scalar(rng.clone()))
        .with_native(vector(rng.clone()))
        .with_native(select(rng.clone()))
        .with_native(col(rng.clone()))
}

fn unit(rng: &SharedRng) -> f64 {
    rng.borrow_mut().gen::<f64>()
}

fn interpolate(min: f64, max: f64, t: f64) -> f64 {
    min + (max - min) * t
}

fn identity(args: &Args) -> EvalResult<Value> {
    args.get("value")
        .cloned()
        .ok_or_else(|| EvalError::native("identity", "missing 'value'"))
}

/// An integer in `min..max`.
fn int(rng: SharedRng) -> NativeFn {
    NativeFn::named("int", move |args| {
        let min = args.number_or("int", "min", 0.0)?;
        let max = args.number_or("int", "max", 100.0)?;
        Ok(Value::Number(interpolate(min, max, unit(&rng)).trunc()))
    })
}

/// A number in `min..max`.
fn scalar(rng: SharedRng) -> NativeFn {
    NativeFn::named("scalar", move |args| {
        let min = args.number_or("scalar", "min", 0.0)?;
        let max = args.number_or("scalar", "max", 1.0)?;
        Ok(Value::Number(interpolate(min, max, unit(&rng))))
    })
}

/// `(list x y)` with both components in `min..max`.
fn vector(rng: SharedRng) -> NativeFn {
    NativeFn::named("vector", move |args| {
        let min = args.number_or("vector", "min", 0.0)?;
        let max = args.number_or("vector", "max", 1000.0)?;
        let x = interpolate(min, max, unit(&rng));
        let y = interpolate(min, max, unit(&rng));
        Ok(Value::List(vec![
            Value::Symbol("list".into()),
            Value::Number(x),
            Value::Number(y),
        ]))
    })
}

/// One element of `from`.
fn select(rng: SharedRng) -> NativeFn {
    NativeFn::named("select", move |args| match args.get("from") {
        Some(Value::List(items)) if !items.is_empty() => {
            let index = ((items.len() as f64 * unit(&rng)) as usize).min(items.len() - 1);
            Ok(items[index].clone())
        }
        _ => Err(EvalError::native(
            "select",
            "'from' should be a non-empty list",
        )),
    })
}

/// `(col/rgb r: .. g: .. b: .. alpha: ..)` with random components.
fn col(rng: SharedRng) -> NativeFn {
    NativeFn::named("col", move |args| {
        let r = unit(&rng);
        let g = unit(&rng);
        let b = unit(&rng);
        let drawn_alpha = unit(&rng);
        let alpha = args.number_or("col", "alpha", drawn_alpha)?;
        Ok(Value::List(vec![
            Value::Symbol("col/rgb".into()),
            Value::Map(vec![
                ("r".into(), Value::Number(r)),
                ("g".into(), Value::Number(g)),
                ("b".into(), Value::Number(b)),
                ("alpha".into(), Value::Number(alpha)),
            ]),
        ]))
    })
}
