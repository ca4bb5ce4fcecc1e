//! End-to-end evaluation through the `Expression` API.

mod test_helpers;

use mexp_rs::{
    ConstantOperator, Expression, FunctionalOperator, ParserErrorKind, assert_approx_eq, interp,
};
use test_helpers::{constant, doubling_function, init_logging};

fn eval(expression: &str) -> f64 {
    Expression::new(expression)
        .try_evaluate()
        .unwrap_or_else(|err| panic!("{:?}: {}", expression, err))
}

#[test]
fn test_arithmetic() {
    init_logging();
    assert_eq!(eval("123+456"), 579.0);
    assert_eq!(eval("10 / 4"), 2.5);
    assert_eq!(eval("1 + 2 * 3"), 7.0);
    assert_eq!(eval("9 % 2"), 1.0);
    assert_eq!(eval("-7 % 4"), -3.0);
    assert_eq!(eval("1 * (2 + 3) - (4 * 5 * (6 + 7))"), -255.0);
    assert_eq!(eval("10 - 2 - 3"), 5.0);
    assert_eq!(eval("64 / 4 / 2"), 8.0);
}

#[test]
fn test_power_and_negation() {
    assert_eq!(eval("2 ^ 2 ^ 2"), 16.0);
    assert_eq!(eval("2 ^ 3 ^ 2"), 512.0);
    assert_eq!(eval("-2^3"), -8.0);
    assert_eq!(eval("-2 ^ 2"), -4.0);
    assert_eq!(eval("(-2) ^ 2"), 4.0);
    assert_eq!(eval("2 ^ -1"), 0.5);
    assert_eq!(eval("1 - -1"), 2.0);
    assert!(eval("(-2) ^ -2 ^ -2").is_nan());
}

#[test]
fn test_postfix_operators() {
    assert_eq!(eval("5!"), 120.0);
    assert_eq!(eval("1! * 2! * 3! * 4!"), 288.0);
    assert_eq!(eval("3!!"), 720.0);
    assert_eq!(eval("-3!"), -6.0);
    assert_eq!(eval("2 ^ 3!"), 64.0);
    assert_approx_eq!(eval("180 torad"), std::f64::consts::PI);
    assert_approx_eq!(eval("pi todeg"), 180.0);
    assert!(eval("(-1)!").is_nan());
}

#[test]
fn test_builtin_functions() {
    assert_eq!(eval("sqrt(9)"), 3.0);
    assert_approx_eq!(eval("sqrt(1 + sin(90) * 3)"), 2.0);
    assert_approx_eq!(eval("log10(sqrt(1E4))"), 2.0);
    assert_approx_eq!(eval("log(64, 2)"), 6.0);
    assert_approx_eq!(eval("ln(e)"), 1.0);
    assert_approx_eq!(eval("log2(1024)"), 10.0);
    assert_approx_eq!(eval("sin((pi / 2)todeg)"), 1.0);
    assert_approx_eq!(eval("cos(60)"), 0.5);
    assert_approx_eq!(eval("atan(1)"), 45.0);
    assert_approx_eq!(eval("tanh(0)"), 0.0);
    assert_eq!(eval("P(5, 2)"), 20.0);
    assert_eq!(eval("C(5, 2)"), 10.0);
    assert_eq!(eval("H(5, 2)"), 15.0);
    assert_eq!(eval("round(2.5) + ceil(0.2) + floor(-0.2) + abs(-3)"), 5.0);
    assert_eq!(eval("min(4, -2, 9)"), -2.0);
    assert_eq!(eval("max(4, -2, 9) + max(1)"), 10.0);
}

#[test]
fn test_scientific_notation() {
    assert_approx_eq!(eval("3.2e+2 + 1E-4"), 320.0001);
    assert_approx_eq!(eval("log(log(3.2e+2, -1e1), sqrt(1E-4))"), f64::NAN);
    assert_eq!(eval("1.5e3"), 1500.0);
}

#[test]
fn test_blank_expressions_are_nan() {
    assert!(eval("").is_nan());
    assert!(eval(" \t\n").is_nan());
    assert!(Expression::new("").evaluate().is_nan());
}

#[test]
fn test_custom_function_and_constant() {
    let expression = Expression::with_custom_operators(
        "f(x)",
        [doubling_function("f")],
        [constant("x", 100.0)],
    );
    assert_eq!(expression.try_evaluate().unwrap(), 200.0);

    let sum = FunctionalOperator::new("sum", |args: &[f64]| args.iter().sum(), []);
    let expression = Expression::new("sum() + sum(1) + sum(1, 2, 3)").with_function(sum);
    assert_eq!(expression.evaluate(), 7.0);
}

#[test]
fn test_custom_function_arity_is_checked() {
    let expression = Expression::new("1 + f(1, 2)").with_function(doubling_function("f"));
    let err = expression.validate().unwrap();
    assert_eq!(err.kind(), ParserErrorKind::IncorrectArgumentCount);
    assert_eq!(err.position(), 4);
}

#[test]
fn test_configuration_errors() {
    let cases: Vec<(Expression, ParserErrorKind)> = vec![
        (
            Expression::new("1").with_function(FunctionalOperator::new("1a", |a: &[f64]| a[0], [])),
            ParserErrorKind::InvalidCustomFunctionName,
        ),
        (
            Expression::new("1").with_function(None::<FunctionalOperator>),
            ParserErrorKind::NullCustomFunction,
        ),
        (
            Expression::new("1").with_constant(constant("$", 0.0)),
            ParserErrorKind::InvalidCustomConstantName,
        ),
        (
            Expression::new("1").with_constant(None::<ConstantOperator>),
            ParserErrorKind::NullCustomConstant,
        ),
        (
            Expression::new("1").with_constant(constant("pi", 0.0)),
            ParserErrorKind::ConflictingNames,
        ),
        (
            Expression::new("1")
                .with_function(doubling_function("f"))
                .with_function(doubling_function("f")),
            ParserErrorKind::ConflictingNames,
        ),
        (
            Expression::new("1").with_function(doubling_function("sin")),
            ParserErrorKind::ConflictingNames,
        ),
        (
            Expression::new("1").with_constant(constant("nan", f64::NAN)),
            ParserErrorKind::NaNConstant,
        ),
    ];
    for (expression, kind) in cases {
        let err = expression.validate().unwrap();
        assert_eq!(err.kind(), kind);
        assert_eq!(err.position(), -1);
        assert_eq!(expression.try_evaluate().unwrap_err(), err);
    }
}

#[test]
#[should_panic(expected = "Too many opening parentheses at position 5")]
fn test_evaluate_panics_on_error() {
    Expression::new("sin(1").evaluate();
}

#[test]
fn test_interp_matches_expression() {
    for expression in ["1 + 2", "sin(30) * 2", "2 ^ 0.5", "C(10, 3)"] {
        assert_eq!(interp(expression).unwrap(), eval(expression));
    }
}

#[test]
fn test_custom_constants_shadow_nothing() {
    let expression = Expression::with_custom_operators(
        "tau / 2 - pi",
        Vec::<FunctionalOperator>::new(),
        [ConstantOperator::new("tau", 2.0 * std::f64::consts::PI)],
    );
    assert_approx_eq!(expression.evaluate(), 0.0);
}

/// `f(a) = a`, panicking on negative input.
fn checked_function() -> FunctionalOperator {
    FunctionalOperator::new(
        "checked",
        |args: &[f64]| {
            if args[0] < 0.0 {
                panic!("checked received {}", args[0]);
            }
            args[0]
        },
        [1],
    )
}

#[test]
#[should_panic(expected = "checked received -2")]
fn test_custom_function_panic_propagates() {
    Expression::new("1 + checked(-2)")
        .with_function(checked_function())
        .evaluate();
}

#[test]
fn test_expression_usable_after_custom_function_panic() {
    let mut expression = Expression::new("checked(-1) * 2").with_function(checked_function());
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        expression.try_evaluate()
    }));
    assert!(outcome.is_err());

    // The token cache and the arena were released while unwinding.
    assert!(expression.tokens().is_some());
    assert!(expression.validate().is_none());

    expression.set_expression("checked(3) * 2");
    assert_eq!(expression.try_evaluate().unwrap(), 6.0);
    assert_eq!(expression.evaluate(), 6.0);
}
