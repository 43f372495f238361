//! Integration tests for the Seni interpreter.
//!
//! Sources go through the real lexer, parser and compiler before evaluation.
//! Covers arithmetic, scoping, every special form, named and positional
//! calls, failure modes, resource limits and determinism.

use seni_compiler::compile;
use seni_eval::{EvalConfig, EvalError, Interpreter, Value};
use seni_lexer::Lexer;
use seni_parser::parse;
use seni_types::Form;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn compile_src(source: &str) -> Vec<Form> {
    let lexed = Lexer::new(source).lex();
    assert!(lexed.is_ok(), "lex failed for {source:?}");
    let nodes = parse(lexed.tokens).into_result().expect("parse failed");
    compile(&nodes).into_result().expect("compile failed")
}

fn run_with(interp: &mut Interpreter, source: &str) -> Result<Value, EvalError> {
    interp.evaluate_all(&compile_src(source))
}

fn run(source: &str) -> Result<Value, EvalError> {
    run_with(&mut Interpreter::new(EvalConfig::default()), source)
}

fn run_ok(source: &str) -> Value {
    match run(source) {
        Ok(value) => value,
        Err(e) => panic!("evaluation of {source:?} failed: {e}"),
    }
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic and comparison
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_nested_arithmetic() {
    assert_eq!(run_ok("(+ 2 (* 3 3))"), num(11.0));
}

#[test]
fn test_unary_minus_and_left_fold() {
    assert_eq!(run_ok("(- 5)"), num(-5.0));
    assert_eq!(run_ok("(- 10 2 3)"), num(5.0));
    assert_eq!(run_ok("(/ 90 10 3)"), num(3.0));
}

#[test]
fn test_division_by_zero_traps() {
    assert!(matches!(run("(/ 1 0)"), Err(EvalError::ArithmeticTrap(_))));
}

#[test]
fn test_chained_comparison() {
    assert_eq!(run_ok("(< 1 2 3)"), Value::boolean(true));
    assert_eq!(run_ok("(< 1 3 2)"), Value::boolean(false));
    assert_eq!(run_ok("(> 3 2 1)"), Value::boolean(true));
    assert_eq!(run_ok("(= 4 4 4)"), Value::boolean(true));
}

#[test]
fn test_comparisons_return_symbols() {
    assert_eq!(run_ok("(< 1 2)"), Value::Symbol("#t".into()));
    assert_eq!(run_ok("(= 1 2)"), Value::Symbol("#f".into()));
}

#[test]
fn test_list_and_pair() {
    assert_eq!(
        run_ok("(list 1 2 3)"),
        Value::List(vec![num(1.0), num(2.0), num(3.0)])
    );
    assert_eq!(
        run_ok("(pair 1 2 3 4)"),
        Value::List(vec![
            Value::List(vec![num(1.0), num(2.0)]),
            Value::List(vec![num(3.0), num(4.0)]),
        ])
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Special forms
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_let_sees_enclosing_scope() {
    let mut interp = Interpreter::new(EvalConfig::default());
    interp.define("foo", num(5.0));
    assert_eq!(
        run_with(&mut interp, "(let ((a 12) (b 24)) (+ a b foo))"),
        Ok(num(41.0))
    );
}

#[test]
fn test_let_bindings_are_sequential() {
    assert_eq!(run_ok("(let ((a 2) (b (* a 10))) b)"), num(20.0));
}

#[test]
fn test_let_with_label_bindings() {
    assert_eq!(run_ok("(let (a: 3 b: 4) (* a b))"), num(12.0));
}

#[test]
fn test_let_bindings_do_not_leak() {
    assert_eq!(
        run("(let ((a 1)) a) a"),
        Err(EvalError::UnboundVariable("a".into()))
    );
}

#[test]
fn test_if_requires_exactly_true() {
    assert_eq!(run_ok("(if true 1 2)"), num(1.0));
    assert_eq!(run_ok("(if false 1 2)"), num(2.0));
    assert_eq!(run_ok("(if 1 \"yes\" \"no\")"), Value::Str("no".into()));
    assert_eq!(run_ok("(if (< 3 2) 1)"), Value::Null);
}

#[test]
fn test_if_arity() {
    assert!(matches!(
        run("(if true)"),
        Err(EvalError::MalformedSpecialForm { form: "if", .. })
    ));
}

#[test]
fn test_quote() {
    assert_eq!(run_ok("(quote hello)"), Value::Symbol("hello".into()));
    assert_eq!(
        run_ok("'(a 1)"),
        Value::List(vec![Value::Symbol("a".into()), num(1.0)])
    );
    assert_eq!(run_ok("\"text\""), Value::Str("text".into()));
}

#[test]
fn test_define_and_lookup() {
    assert_eq!(run_ok("(define x 5) (* x x)"), num(25.0));
    assert_eq!(run_ok("(define a 1 b (+ a 1)) b"), num(2.0));
}

#[test]
fn test_malformed_define() {
    assert!(matches!(run("(define 3 4)"), Err(EvalError::MalformedDefine(_))));
    assert!(matches!(run("(define a)"), Err(EvalError::MalformedDefine(_))));
}

#[test]
fn test_set_mutates_nearest_binding() {
    assert_eq!(
        run_ok("(define a 1) (let ((x 0)) (set! a 5)) a"),
        num(5.0)
    );
}

#[test]
fn test_set_on_unbound_name_defines_it() {
    assert_eq!(run_ok("(set! fresh 3) fresh"), num(3.0));
}

#[test]
fn test_set_inside_let_defines_in_let_scope() {
    assert_eq!(
        run("(let ((x 0)) (set! inner 2)) inner"),
        Err(EvalError::UnboundVariable("inner".into()))
    );
}

#[test]
fn test_begin_returns_last() {
    assert_eq!(run_ok("(begin 1 2 3)"), num(3.0));
    assert_eq!(run_ok("(begin)"), Value::Null);
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_lambda_positional() {
    assert_eq!(run_ok("((lambda (x y) (- x y)) 10 4)"), num(6.0));
}

#[test]
fn test_lambda_defaults_and_labels() {
    let src = "(define f (lambda (x: 1 y: 2) (+ x (* 10 y))))";
    assert_eq!(run_ok(&format!("{src} (f)")), num(21.0));
    assert_eq!(run_ok(&format!("{src} (f y: 5)")), num(51.0));
    assert_eq!(run_ok(&format!("{src} (f 7)")), num(27.0));
}

#[test]
fn test_defaults_evaluated_at_definition() {
    assert_eq!(
        run_ok("(define d 10) (define f (lambda (x: d) x)) (set! d 20) (f)"),
        num(10.0)
    );
}

#[test]
fn test_closures_capture_their_scope() {
    let src = "
        (define make-adder (lambda (x) (lambda (y) (+ x y))))
        (define add3 (make-adder 3))
        (define add5 (make-adder 5))
        (+ (add3 1) (add5 1))";
    assert_eq!(run_ok(src), num(10.0));
}

#[test]
fn test_fn_binds_and_recurses() {
    let src = "
        (fn (fact n: 1)
          (if (< n 2) 1 (* n (fact n: (- n 1)))))
        (fact n: 5)";
    assert_eq!(run_ok(src), num(120.0));
}

#[test]
fn test_fn_with_positional_params() {
    assert_eq!(run_ok("(fn (sq x) (* x x)) (sq 9)"), num(81.0));
}

#[test]
fn test_fn_returns_closure() {
    let value = run_ok("(fn (noop) 0)");
    assert_eq!(value.type_name(), "lambda");
    assert_eq!(value.to_string(), "#<lambda noop>");
}

#[test]
fn test_arity_errors() {
    assert!(matches!(
        run("(define f (lambda (x) x)) (f 1 2)"),
        Err(EvalError::Arity { .. })
    ));
    assert!(matches!(
        run("(define f (lambda (x) x)) (f)"),
        Err(EvalError::Arity { .. })
    ));
    assert!(matches!(
        run("(fn (g a: 1) a) (g b: 2)"),
        Err(EvalError::Arity { .. })
    ));
}

#[test]
fn test_not_callable() {
    assert!(matches!(run("(3 4)"), Err(EvalError::NotCallable(_))));
}

#[test]
fn test_unbound_variable() {
    assert_eq!(
        run("(+ 1 nope)"),
        Err(EvalError::UnboundVariable("nope".into()))
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Loop
// ══════════════════════════════════════════════════════════════════════════════

fn loop_sum(control: &str) -> Value {
    run_ok(&format!(
        "(define sum 0) (loop ({control}) (set! sum (+ sum x))) sum"
    ))
}

#[test]
fn test_loop_ranges() {
    assert_eq!(loop_sum("x from: 0 to: 5"), num(10.0));
    assert_eq!(loop_sum("x from: 0 upto: 5"), num(15.0));
    assert_eq!(loop_sum("x from: 0 to: 10 increment: 3"), num(18.0));
    assert_eq!(loop_sum("x from: 3 to: 0"), num(6.0));
}

#[test]
fn test_loop_steps() {
    assert_eq!(loop_sum("x from: 0 to: 10 steps: 5"), num(20.0));
    assert_eq!(loop_sum("x from: 0 upto: 10 steps: 3"), num(15.0));
}

#[test]
fn test_loop_returns_last_body_value() {
    assert_eq!(run_ok("(loop (i from: 0 to: 3) (* i 2))"), num(4.0));
    assert_eq!(run_ok("(loop (i from: 0 to: 0) i)"), Value::Null);
}

#[test]
fn test_loop_variable_is_scoped() {
    assert_eq!(
        run("(loop (i from: 0 to: 2) i) i"),
        Err(EvalError::UnboundVariable("i".into()))
    );
}

#[test]
fn test_loop_shape_errors() {
    assert!(matches!(
        run("(loop (i from: 0 to: 5 steps: 0) i)"),
        Err(EvalError::MalformedSpecialForm { form: "loop", .. })
    ));
    assert!(matches!(
        run("(loop (i from: 0 to: 5 increment: 0) i)"),
        Err(EvalError::MalformedSpecialForm { form: "loop", .. })
    ));
}

// ══════════════════════════════════════════════════════════════════════════════
// Limits
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_gas_exhaustion() {
    let mut interp = Interpreter::new(EvalConfig {
        gas_limit: 100,
        ..EvalConfig::default()
    });
    assert_eq!(
        run_with(&mut interp, "(loop (i from: 0 to: 1000) (+ i 1))"),
        Err(EvalError::GasExhausted(100))
    );
}

#[test]
fn test_depth_limit() {
    let mut interp = Interpreter::new(EvalConfig {
        max_depth: 50,
        ..EvalConfig::default()
    });
    assert_eq!(
        run_with(&mut interp, "(fn (f x) (f x)) (f 1)"),
        Err(EvalError::DepthExceeded(50))
    );
}

#[test]
fn test_default_depth_limit_stops_runaway_recursion() {
    assert_eq!(
        run("(fn (f n: 0) (if (< n 100000) (f n: (+ n 1)) n)) (f n: 0)"),
        Err(EvalError::DepthExceeded(EvalConfig::default().max_depth))
    );
}

#[test]
fn test_default_depth_allows_moderate_recursion() {
    assert_eq!(
        run("(fn (f n: 0) (if (< n 40) (f n: (+ n 1)) n)) (f n: 0)"),
        Ok(Value::Number(40.0))
    );
}

#[test]
fn test_empty_loop_is_charged_gas() {
    let mut interp = Interpreter::new(EvalConfig {
        gas_limit: 100,
        ..EvalConfig::default()
    });
    assert_eq!(
        run_with(&mut interp, "(loop (i to: 10000000))"),
        Err(EvalError::GasExhausted(100))
    );
}

#[test]
fn test_captured_scopes_stay_in_the_arena() {
    let mut interp = Interpreter::new(EvalConfig::default());
    run_with(&mut interp, "(loop (i to: 50) (+ i 1))").unwrap();
    assert_eq!(interp.env().scope_count(), 1);

    run_with(&mut interp, "(loop (i to: 50) (lambda (x) x))").unwrap();
    assert_eq!(interp.env().scope_count(), 51);
}

#[test]
fn test_evaluate_isolated_drops_bindings_and_resets_gas() {
    let mut interp = Interpreter::new(EvalConfig {
        gas_limit: 20,
        ..EvalConfig::default()
    });
    let define = vec![Form::List(vec![
        Form::symbol("define"),
        Form::symbol("x"),
        Form::Number(1.0),
    ])];
    for _ in 0..15 {
        assert_eq!(interp.evaluate_isolated(&define), Ok(Value::Number(1.0)));
    }
    assert_eq!(
        interp.evaluate_isolated(&[Form::symbol("x")]),
        Err(EvalError::UnboundVariable("x".into()))
    );
}

#[test]
fn test_interpreters_are_isolated() {
    let mut a = Interpreter::new(EvalConfig::default());
    let mut b = Interpreter::new(EvalConfig::default());
    run_with(&mut a, "(define x 1)").unwrap();
    assert_eq!(
        run_with(&mut b, "x"),
        Err(EvalError::UnboundVariable("x".into()))
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_determinism_100_iterations() {
    let src = "
        (fn (fib n: 0) (if (< n 2) n (+ (fib n: (- n 1)) (fib n: (- n 2)))))
        (define total 0)
        (loop (i from: 0 upto: 8) (set! total (+ total (fib n: i))))
        (list total (pair 1 2))";
    let first = run_ok(src);
    for i in 0..100 {
        assert_eq!(run_ok(src), first, "iteration {i} diverged");
    }
}
