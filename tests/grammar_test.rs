//! Position and kind of every grammar, lexical and arity error.

mod test_helpers;

use mexp_rs::ParserErrorKind::*;
use mexp_rs::engine::MAX_NESTING_DEPTH;
use mexp_rs::{Expression, ParserErrorKind};
use test_helpers::{at, init_logging, validation_context};

#[test]
fn test_valid_expressions() {
    init_logging();
    for expression in [
        "-pi * -sin(-e torad)",
        "log(log(3.2e+2, -1e1), sqrt(1E-4))",
        "\t\t  \n",
        "log(1, log(1, log(1, 1)))",
        "log(1, log(log(1, 1), log(1, 1)))",
        "sin((((((1))))))",
        "10!!",
        "1 - -1",
        "2 ^ -3!",
        "(1)torad todeg",
    ] {
        assert_eq!(validation_context(expression), None, "{:?}", expression);
    }
}

#[test]
fn test_error_positions() {
    init_logging();
    let cases: &[(&str, isize, ParserErrorKind)] = &[
        ("1e + 1", 0, InvalidNumberFormat),
        ("1 1", 2, UnexpectedNumber),
        ("-pi * -sin(-e torad", 19, TooManyOpeningParentheses),
        ("((1 + 1 +))", 9, UnexpectedClosingParenthesis),
        ("1++", 2, UnexpectedBinaryOperator),
        ("1 + (2! ^ 3)) + sin(5)", 12, UnexpectedClosingParenthesis),
        ("1 + (2! ^ 3) + sin(5))", 21, UnexpectedClosingParenthesis),
        ("1(1+1", 1, UnexpectedOpeningParenthesis),
        ("1 + 1, 1 + 1", 5, UnexpectedComma),
        ("log((1, 1))", 6, UnexpectedComma),
        ("log((, 1))", 5, UnexpectedComma),
        ("sin(,1)", 4, UnexpectedComma),
        ("sin(1,)", 6, UnexpectedClosingParenthesis),
        ("sin(pi pi)", 7, UnexpectedConstantOperator),
        ("sin(pipi)", 4, UnknownOperator),
        ("sinn(pi)", 0, UnknownOperator),
        ("2sin(1)", 1, UnexpectedFunctionalOperator),
        ("sin((1)", 7, TooManyOpeningParentheses),
        ("1*!", 2, UnexpectedPostfixUnaryOperator),
        ("--1", 1, UnexpectedPrefixUnaryOperator),
        ("sin(1", 5, TooManyOpeningParentheses),
        ("1 +", 3, UnexpectedNewline),
        ("sin(1, 1)", 0, IncorrectArgumentCount),
        ("sin()", 0, IncorrectArgumentCount),
        ("()", 1, UnexpectedClosingParenthesis),
    ];
    for &(expression, position, kind) in cases {
        assert_eq!(
            validation_context(expression),
            at(position, kind),
            "{:?}",
            expression
        );
    }
}

#[test]
fn test_number_format_positions() {
    for (expression, position) in [
        ("1 + 1ee", 4),
        ("3 + sin(1..e3)", 8),
        ("3 / (1e3..)", 5),
        ("2er3", 0),
        ("1 - 2.3E--2", 4),
    ] {
        assert_eq!(
            validation_context(expression),
            at(position, InvalidNumberFormat),
            "{:?}",
            expression
        );
    }
}

#[test]
fn test_end_of_expression_uses_byte_length() {
    // `°` is two bytes long.
    let expression = "1 + °";
    assert_eq!(validation_context(expression), at(4, UnknownOperator));
    let expression = "(\u{00a0}1";
    assert_eq!(
        validation_context(expression),
        at(expression.len() as isize, TooManyOpeningParentheses)
    );
}

#[test]
fn test_error_messages() {
    let err = Expression::new("1 - 2.3E--2").validate().unwrap();
    assert_eq!(err.message(), "Invalid number format at position 4");
    assert_eq!(err.to_string(), err.message());

    let err = Expression::new("1 +").validate().unwrap();
    assert_eq!(err.message(), "Unexpected end of expression at position 3");
}

#[test]
fn test_nesting_is_bounded() {
    let depth = MAX_NESTING_DEPTH * 4;
    let expression = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let context = validation_context(&expression).unwrap();
    assert_eq!(context.kind, NestingTooDeep);
    assert_eq!(context.position, (MAX_NESTING_DEPTH - 1) as isize);

    let depth = MAX_NESTING_DEPTH - 1;
    let expression = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(Expression::new(expression).try_evaluate().unwrap(), 1.0);
}
