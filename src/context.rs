//! Operator tables and name resolution.
//!
//! The built-in operators live in `static` tables that are shared by every expression and
//! never mutated. An [`OperatorContext`] layers an expression's custom functions and
//! constants on top of those tables, checks that the combination is well formed, and
//! answers the name lookups made by the lexer and the evaluator.

extern crate alloc;

use alloc::collections::BTreeSet;
use alloc::format;

use crate::constants::{E, PI};
use crate::error::{ParserError, ParserErrorKind, Result};
use crate::functions;
use crate::types::{
    Associativity, BinaryOperator, ConstantOperator, FunctionalOperator, Operator,
    OperatorPrecedence, PostfixUnaryOperator, PrefixUnaryOperator,
};

const ONE: &[usize] = &[1];
const TWO: &[usize] = &[2];

pub static BINARY_OPERATORS: [BinaryOperator; 6] = [
    BinaryOperator::new(
        "+",
        OperatorPrecedence::Additive,
        Associativity::LeftToRight,
        functions::add,
    ),
    BinaryOperator::new(
        "-",
        OperatorPrecedence::Additive,
        Associativity::LeftToRight,
        functions::sub,
    ),
    BinaryOperator::new(
        "*",
        OperatorPrecedence::Multiplicative,
        Associativity::LeftToRight,
        functions::mul,
    ),
    BinaryOperator::new(
        "/",
        OperatorPrecedence::Multiplicative,
        Associativity::LeftToRight,
        functions::div,
    ),
    BinaryOperator::new(
        "%",
        OperatorPrecedence::Multiplicative,
        Associativity::LeftToRight,
        functions::fmod,
    ),
    BinaryOperator::new(
        "^",
        OperatorPrecedence::Exponentiation,
        Associativity::RightToLeft,
        functions::pow,
    ),
];

pub static PREFIX_UNARY_OPERATORS: [PrefixUnaryOperator; 1] = [PrefixUnaryOperator::new(
    "-",
    OperatorPrecedence::Unary,
    functions::neg,
)];

pub static POSTFIX_UNARY_OPERATORS: [PostfixUnaryOperator; 3] = [
    PostfixUnaryOperator::new("!", OperatorPrecedence::Exponentiation, functions::factorial),
    PostfixUnaryOperator::new("torad", OperatorPrecedence::Exponentiation, functions::to_radians),
    PostfixUnaryOperator::new("todeg", OperatorPrecedence::Exponentiation, functions::to_degrees),
];

pub static CONSTANT_OPERATORS: [ConstantOperator; 2] = [
    ConstantOperator::builtin("pi", PI),
    ConstantOperator::builtin("e", E),
];

pub static FUNCTIONAL_OPERATORS: [FunctionalOperator; 38] = [
    FunctionalOperator::builtin("sqrt", functions::sqrt, ONE),
    FunctionalOperator::builtin("sin", functions::sin, ONE),
    FunctionalOperator::builtin("cos", functions::cos, ONE),
    FunctionalOperator::builtin("tan", functions::tan, ONE),
    FunctionalOperator::builtin("asin", functions::asin, ONE),
    FunctionalOperator::builtin("acos", functions::acos, ONE),
    FunctionalOperator::builtin("atan", functions::atan, ONE),
    FunctionalOperator::builtin("csc", functions::csc, ONE),
    FunctionalOperator::builtin("sec", functions::sec, ONE),
    FunctionalOperator::builtin("cot", functions::cot, ONE),
    FunctionalOperator::builtin("acsc", functions::acsc, ONE),
    FunctionalOperator::builtin("asec", functions::asec, ONE),
    FunctionalOperator::builtin("acot", functions::acot, ONE),
    FunctionalOperator::builtin("sinh", functions::sinh, ONE),
    FunctionalOperator::builtin("cosh", functions::cosh, ONE),
    FunctionalOperator::builtin("tanh", functions::tanh, ONE),
    FunctionalOperator::builtin("asinh", functions::asinh, ONE),
    FunctionalOperator::builtin("acosh", functions::acosh, ONE),
    FunctionalOperator::builtin("atanh", functions::atanh, ONE),
    FunctionalOperator::builtin("csch", functions::csch, ONE),
    FunctionalOperator::builtin("sech", functions::sech, ONE),
    FunctionalOperator::builtin("coth", functions::coth, ONE),
    FunctionalOperator::builtin("acsch", functions::acsch, ONE),
    FunctionalOperator::builtin("asech", functions::asech, ONE),
    FunctionalOperator::builtin("acoth", functions::acoth, ONE),
    FunctionalOperator::builtin("P", functions::permutation, TWO),
    FunctionalOperator::builtin("C", functions::combination, TWO),
    FunctionalOperator::builtin("H", functions::multichoose, TWO),
    FunctionalOperator::builtin("log", functions::log, TWO),
    FunctionalOperator::builtin("log10", functions::log10, ONE),
    FunctionalOperator::builtin("log2", functions::log2, ONE),
    FunctionalOperator::builtin("ln", functions::ln, ONE),
    FunctionalOperator::builtin("ceil", functions::ceil, ONE),
    FunctionalOperator::builtin("floor", functions::floor, ONE),
    FunctionalOperator::builtin("round", functions::round, ONE),
    FunctionalOperator::builtin("abs", functions::abs, ONE),
    FunctionalOperator::variadic("min", functions::min, 1),
    FunctionalOperator::variadic("max", functions::max, 1),
];

/// Whether `name` can be produced by the lexer as a single identifier token.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Built-in operator tables plus the custom functions and constants of one expression.
#[derive(Debug, Clone, Copy)]
pub struct OperatorContext<'a> {
    custom_functions: &'a [Option<FunctionalOperator>],
    custom_constants: &'a [Option<ConstantOperator>],
}

impl Default for OperatorContext<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl OperatorContext<'static> {
    /// A context with only the built-in operators.
    pub fn builtin() -> Self {
        Self {
            custom_functions: &[],
            custom_constants: &[],
        }
    }
}

impl<'a> OperatorContext<'a> {
    pub fn new(
        custom_functions: &'a [Option<FunctionalOperator>],
        custom_constants: &'a [Option<ConstantOperator>],
    ) -> Self {
        Self {
            custom_functions,
            custom_constants,
        }
    }

    /// Checks the custom operators before any token is looked at.
    ///
    /// All errors are reported with position `-1`.
    pub fn validate(&self) -> Result<()> {
        for function in self.custom_functions {
            let Some(function) = function else {
                return Err(ParserError::configuration(
                    ParserErrorKind::NullCustomFunction,
                    "custom function list contains an absent entry",
                ));
            };
            if !is_valid_identifier(function.name()) {
                return Err(ParserError::configuration(
                    ParserErrorKind::InvalidCustomFunctionName,
                    &format!("'{}'", function.name()),
                ));
            }
        }
        for constant in self.custom_constants {
            let Some(constant) = constant else {
                return Err(ParserError::configuration(
                    ParserErrorKind::NullCustomConstant,
                    "custom constant list contains an absent entry",
                ));
            };
            if !is_valid_identifier(constant.name()) {
                return Err(ParserError::configuration(
                    ParserErrorKind::InvalidCustomConstantName,
                    &format!("'{}'", constant.name()),
                ));
            }
            if constant.value.is_nan() {
                return Err(ParserError::configuration(
                    ParserErrorKind::NaNConstant,
                    &format!("'{}'", constant.name()),
                ));
            }
        }

        let mut names = BTreeSet::new();
        let function_names = self.functions().map(|f| f.name());
        let constant_names = self.constants().map(|c| c.name());
        for name in function_names.chain(constant_names) {
            if !names.insert(name) {
                return Err(ParserError::configuration(
                    ParserErrorKind::ConflictingNames,
                    &format!("'{}' is defined more than once", name),
                ));
            }
        }
        Ok(())
    }

    /// Built-in functions followed by the present custom functions.
    pub fn functions(&self) -> impl Iterator<Item = &'a FunctionalOperator> + use<'a> {
        let custom = self.custom_functions;
        FUNCTIONAL_OPERATORS.iter().chain(custom.iter().flatten())
    }

    /// Built-in constants followed by the present custom constants.
    pub fn constants(&self) -> impl Iterator<Item = &'a ConstantOperator> + use<'a> {
        let custom = self.custom_constants;
        CONSTANT_OPERATORS.iter().chain(custom.iter().flatten())
    }

    pub fn binary(&self, name: &str) -> Option<&'static BinaryOperator> {
        BINARY_OPERATORS.iter().find(|op| op.name == name)
    }

    pub fn prefix_unary(&self, name: &str) -> Option<&'static PrefixUnaryOperator> {
        PREFIX_UNARY_OPERATORS.iter().find(|op| op.name == name)
    }

    pub fn postfix_unary(&self, name: &str) -> Option<&'static PostfixUnaryOperator> {
        POSTFIX_UNARY_OPERATORS.iter().find(|op| op.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&'a FunctionalOperator> {
        self.functions().find(|op| op.name() == name)
    }

    pub fn constant(&self, name: &str) -> Option<&'a ConstantOperator> {
        self.constants().find(|op| op.name() == name)
    }

    /// Resolves `name` in classification order: binary, constant, functional, postfix, prefix.
    pub fn lookup(&self, name: &str) -> Option<Operator<'a>> {
        if let Some(op) = self.binary(name) {
            return Some(Operator::Binary(op));
        }
        if let Some(op) = self.constant(name) {
            return Some(Operator::Constant(op));
        }
        if let Some(op) = self.function(name) {
            return Some(Operator::Functional(op));
        }
        if let Some(op) = self.postfix_unary(name) {
            return Some(Operator::PostfixUnary(op));
        }
        self.prefix_unary(name).map(Operator::PrefixUnary)
    }
}
