use mexp_rs::{
    ConstantOperator, Expression, FunctionalOperator, ParserErrorContext, ParserErrorKind,
};

/// Error context reported by `validate()` for an expression using only built-in operators.
#[allow(dead_code)]
pub fn validation_context(expression: &str) -> Option<ParserErrorContext> {
    Expression::new(expression).validate().map(|err| err.context())
}

/// Shorthand for an expected error context.
#[allow(dead_code)]
pub fn at(position: isize, kind: ParserErrorKind) -> Option<ParserErrorContext> {
    Some(ParserErrorContext::new(position, kind))
}

/// `f(a) = 2a`, accepting exactly one argument.
#[allow(dead_code)]
pub fn doubling_function(name: &str) -> FunctionalOperator {
    FunctionalOperator::new(name, |args: &[f64]| 2.0 * args[0], [1])
}

/// A function accepting any number of arguments that returns its first one.
#[allow(dead_code)]
pub fn identity_function(name: &str) -> FunctionalOperator {
    FunctionalOperator::new(name, |args: &[f64]| args[0], [])
}

#[allow(dead_code)]
pub fn constant(name: &str, value: f64) -> ConstantOperator {
    ConstantOperator::new(name, value)
}

/// Installs a test logger once; output shows with `RUST_LOG=trace cargo test -- --nocapture`.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
