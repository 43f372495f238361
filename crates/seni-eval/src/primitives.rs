//! Required primitive functions: arithmetic, comparison and list building.
//!
//! Comparisons return the symbols `#t`/`#f` and chain pairwise, so
//! `(< a b c)` means `a < b` and `b < c`.

use crate::error::{EvalError, EvalResult};
use crate::value::{NativeFn, Value};

/// Every primitive, ready to bind into a root scope.
pub fn standard_natives() -> Vec<NativeFn> {
    vec![
        NativeFn::positional("+", add),
        NativeFn::positional("-", sub),
        NativeFn::positional("*", mul),
        NativeFn::positional("/", div),
        NativeFn::positional("=", eq),
        NativeFn::positional("<", lt),
        NativeFn::positional(">", gt),
        NativeFn::positional("list", list),
        NativeFn::positional("pair", pair),
    ]
}

fn numbers(name: &str, args: &[Value]) -> EvalResult<Vec<f64>> {
    args.iter()
        .map(|v| {
            v.as_number().ok_or_else(|| {
                EvalError::TypeMismatch(format!(
                    "all arguments to {name} should be numbers, got {}",
                    v.type_name()
                ))
            })
        })
        .collect()
}

fn add(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Number(numbers("+", args)?.into_iter().sum()))
}

fn mul(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Number(numbers("*", args)?.into_iter().product()))
}

fn sub(args: &[Value]) -> EvalResult<Value> {
    match numbers("-", args)?.as_slice() {
        [] => Err(EvalError::arity("-", "expected at least one argument")),
        [only] => Ok(Value::Number(-only)),
        [first, rest @ ..] => Ok(Value::Number(rest.iter().fold(*first, |acc, n| acc - n))),
    }
}

fn div(args: &[Value]) -> EvalResult<Value> {
    let nums = numbers("/", args)?;
    let Some((first, rest)) = nums.split_first() else {
        return Err(EvalError::arity("/", "expected at least one argument"));
    };
    let mut acc = *first;
    for n in rest {
        if *n == 0.0 {
            return Err(EvalError::ArithmeticTrap(format!("division of {acc} by zero")));
        }
        acc /= n;
    }
    Ok(Value::Number(acc))
}

fn eq(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::boolean(args.windows(2).all(|w| w[0] == w[1])))
}

fn lt(args: &[Value]) -> EvalResult<Value> {
    let nums = numbers("<", args)?;
    Ok(Value::boolean(nums.windows(2).all(|w| w[0] < w[1])))
}

fn gt(args: &[Value]) -> EvalResult<Value> {
    let nums = numbers(">", args)?;
    Ok(Value::boolean(nums.windows(2).all(|w| w[0] > w[1])))
}

fn list(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::List(args.to_vec()))
}

/// `(pair a b c d)` → `((a b) (c d))`
fn pair(args: &[Value]) -> EvalResult<Value> {
    if args.len() % 2 != 0 {
        return Err(EvalError::arity("pair", "expected an even number of arguments"));
    }
    Ok(Value::List(
        args.chunks(2).map(|c| Value::List(c.to_vec())).collect(),
    ))
}
