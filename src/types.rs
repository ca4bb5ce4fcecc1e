//! Type definitions for the operator and token model.
//!
//! Operators are a closed set of variants: binary, prefix unary, postfix unary, functional
//! and constant. The built-in tables in [`crate::context`] are `static` items built from the
//! `const` constructors below; custom functions and constants are supplied by the embedding
//! application through [`FunctionalOperator::new`] and [`ConstantOperator::new`].

extern crate alloc;

use alloc::borrow::Cow;
use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Precedence of binary and unary operators. A later variant binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperatorPrecedence {
    Additive,
    Multiplicative,
    Unary,
    Exponentiation,
}

/// Grouping direction of operators sharing a precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Associativity {
    LeftToRight,
    RightToLeft,
}

/// An operator taking the operands on its left and right, such as `+` or `^`.
#[derive(Debug, Clone)]
pub struct BinaryOperator {
    pub name: &'static str,
    pub precedence: OperatorPrecedence,
    pub associativity: Associativity,
    pub eval: fn(f64, f64) -> f64,
}

impl BinaryOperator {
    pub const fn new(
        name: &'static str,
        precedence: OperatorPrecedence,
        associativity: Associativity,
        eval: fn(f64, f64) -> f64,
    ) -> Self {
        Self {
            name,
            precedence,
            associativity,
            eval,
        }
    }
}

/// An operator written before its operand, such as negation. Always right-to-left.
#[derive(Debug, Clone)]
pub struct PrefixUnaryOperator {
    pub name: &'static str,
    pub precedence: OperatorPrecedence,
    pub eval: fn(f64) -> f64,
}

impl PrefixUnaryOperator {
    pub const fn new(
        name: &'static str,
        precedence: OperatorPrecedence,
        eval: fn(f64) -> f64,
    ) -> Self {
        Self {
            name,
            precedence,
            eval,
        }
    }

    pub const fn associativity(&self) -> Associativity {
        Associativity::RightToLeft
    }
}

/// An operator written after its operand, such as factorial. Always left-to-right.
#[derive(Debug, Clone)]
pub struct PostfixUnaryOperator {
    pub name: &'static str,
    pub precedence: OperatorPrecedence,
    pub eval: fn(f64) -> f64,
}

impl PostfixUnaryOperator {
    pub const fn new(
        name: &'static str,
        precedence: OperatorPrecedence,
        eval: fn(f64) -> f64,
    ) -> Self {
        Self {
            name,
            precedence,
            eval,
        }
    }

    pub const fn associativity(&self) -> Associativity {
        Associativity::LeftToRight
    }
}

/// Implementation of a functional operator.
///
/// Built-in functions are plain function pointers so they can live in `static` tables.
/// Custom functions are shared closures so an [`crate::Expression`] can be cloned cheaply.
#[derive(Clone)]
pub enum FunctionImpl {
    Native(fn(&[f64]) -> f64),
    Closure(Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>),
}

impl FunctionImpl {
    pub fn call(&self, args: &[f64]) -> f64 {
        match self {
            FunctionImpl::Native(f) => f(args),
            FunctionImpl::Closure(f) => f(args),
        }
    }
}

impl fmt::Debug for FunctionImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionImpl::Native(_) => f.write_str("Native(..)"),
            FunctionImpl::Closure(_) => f.write_str("Closure(..)"),
        }
    }
}

/// Set of argument counts a function accepts. An empty set means any count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arities {
    Fixed(&'static [usize]),
    Set(BTreeSet<usize>),
    /// Variadic with a lower bound.
    AtLeast(usize),
}

impl Arities {
    pub fn is_any(&self) -> bool {
        match self {
            Arities::Fixed(counts) => counts.is_empty(),
            Arities::Set(counts) => counts.is_empty(),
            Arities::AtLeast(min) => *min == 0,
        }
    }

    /// Whether `count` arguments may be passed.
    pub fn allows(&self, count: usize) -> bool {
        match self {
            Arities::Fixed(counts) => counts.is_empty() || counts.contains(&count),
            Arities::Set(counts) => counts.is_empty() || counts.contains(&count),
            Arities::AtLeast(min) => count >= *min,
        }
    }
}

/// A named function called with a parenthesized, comma separated argument list.
///
/// # Example
///
/// ```
/// use mexp_rs::{Expression, FunctionalOperator};
///
/// let hypot = FunctionalOperator::new(
///     "hypot",
///     |args: &[f64]| (args[0] * args[0] + args[1] * args[1]).sqrt(),
///     [2],
/// );
/// let expression = Expression::new("hypot(3, 4)").with_function(hypot);
/// assert_eq!(expression.try_evaluate().unwrap(), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct FunctionalOperator {
    pub name: Cow<'static, str>,
    pub eval: FunctionImpl,
    pub allowed_arities: Arities,
}

impl FunctionalOperator {
    /// Creates a custom function. An empty `allowed_arities` accepts any argument count.
    pub fn new<F, A>(name: impl Into<String>, eval: F, allowed_arities: A) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
        A: IntoIterator<Item = usize>,
    {
        Self {
            name: Cow::Owned(name.into()),
            eval: FunctionImpl::Closure(Arc::new(eval)),
            allowed_arities: Arities::Set(allowed_arities.into_iter().collect()),
        }
    }

    pub const fn builtin(
        name: &'static str,
        eval: fn(&[f64]) -> f64,
        allowed_arities: &'static [usize],
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            eval: FunctionImpl::Native(eval),
            allowed_arities: Arities::Fixed(allowed_arities),
        }
    }

    pub const fn variadic(name: &'static str, eval: fn(&[f64]) -> f64, min_arity: usize) -> Self {
        Self {
            name: Cow::Borrowed(name),
            eval: FunctionImpl::Native(eval),
            allowed_arities: Arities::AtLeast(min_arity),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[f64]) -> f64 {
        self.eval.call(args)
    }
}

/// A named value, such as `pi`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantOperator {
    pub name: Cow<'static, str>,
    pub value: f64,
}

impl ConstantOperator {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            value,
        }
    }

    pub const fn builtin(name: &'static str, value: f64) -> Self {
        Self {
            name: Cow::Borrowed(name),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Borrowed view of any operator, as returned by lookups.
#[derive(Debug, Clone, Copy)]
pub enum Operator<'a> {
    Binary(&'a BinaryOperator),
    PrefixUnary(&'a PrefixUnaryOperator),
    PostfixUnary(&'a PostfixUnaryOperator),
    Functional(&'a FunctionalOperator),
    Constant(&'a ConstantOperator),
}

/// Classifies a token once it has been matched against the operator tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// A numeric literal and its parsed value.
    Number(f64),

    BinaryOperator,

    PrefixUnaryOperator,

    PostfixUnaryOperator,

    ConstantOperator,

    /// A function name. `arity` is filled in once the argument list has been counted.
    FunctionalOperator { arity: Option<usize> },

    OpeningParenthesis,

    ClosingParenthesis,

    Comma,
}
