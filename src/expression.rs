//! The [`Expression`] type: one source string plus its custom operators.
//!
//! An expression validates lazily. The token sequence of the last successful validation is
//! cached inside the expression and evaluation runs over that cache, using a scratch arena
//! the expression keeps between calls.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use bumpalo::Bump;
use log::debug;

use crate::context::OperatorContext;
use crate::engine::validate_tokens;
use crate::error::{ParserError, Result};
use crate::eval;
use crate::lexer::Token;
use crate::types::{ConstantOperator, FunctionalOperator};

/// A math expression with optional custom functions and constants.
///
/// Custom operator lists may hold absent entries (`None`); they are reported as
/// configuration errors on validation rather than rejected at construction.
///
/// `Expression` keeps its validation cache in a [`RefCell`], so a single instance must not
/// be shared between threads.
///
/// # Example
///
/// ```
/// use mexp_rs::{ConstantOperator, Expression, ParserErrorKind};
///
/// let expression = Expression::new("C(5, 2) + 1");
/// assert!(expression.validate().is_none());
/// assert_eq!(expression.evaluate(), 11.0);
///
/// let expression = Expression::new("x * 2").with_constant(ConstantOperator::new("x", 21.0));
/// assert_eq!(expression.try_evaluate().unwrap(), 42.0);
///
/// let err = Expression::new("2sin(1)").validate().unwrap();
/// assert_eq!(err.kind(), ParserErrorKind::UnexpectedFunctionalOperator);
/// assert_eq!(err.position(), 1);
/// ```
#[derive(Debug)]
pub struct Expression {
    source: String,
    custom_functions: Vec<Option<FunctionalOperator>>,
    custom_constants: Vec<Option<ConstantOperator>>,
    tokens: RefCell<Option<Vec<Token>>>,
    arena: RefCell<Bump>,
}

impl Expression {
    /// Creates an expression that uses only the built-in operators.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            source: expression.into(),
            custom_functions: Vec::new(),
            custom_constants: Vec::new(),
            tokens: RefCell::new(None),
            arena: RefCell::new(Bump::new()),
        }
    }

    /// Creates an expression with custom functions and constants.
    ///
    /// Both collections accept plain operators or `Option`s of them.
    pub fn with_custom_operators<F, C>(
        expression: impl Into<String>,
        functions: F,
        constants: C,
    ) -> Self
    where
        F: IntoIterator,
        F::Item: Into<Option<FunctionalOperator>>,
        C: IntoIterator,
        C::Item: Into<Option<ConstantOperator>>,
    {
        let mut expression = Self::new(expression);
        expression.custom_functions = functions.into_iter().map(Into::into).collect();
        expression.custom_constants = constants.into_iter().map(Into::into).collect();
        expression
    }

    /// Adds one custom function.
    pub fn with_function(mut self, function: impl Into<Option<FunctionalOperator>>) -> Self {
        self.custom_functions.push(function.into());
        self.tokens.get_mut().take();
        self
    }

    /// Adds one custom constant.
    pub fn with_constant(mut self, constant: impl Into<Option<ConstantOperator>>) -> Self {
        self.custom_constants.push(constant.into());
        self.tokens.get_mut().take();
        self
    }

    pub fn expression(&self) -> &str {
        &self.source
    }

    /// Replaces the source text and drops the cached tokens.
    pub fn set_expression(&mut self, expression: impl Into<String>) {
        self.source = expression.into();
        self.tokens.get_mut().take();
    }

    pub fn custom_functions(&self) -> &[Option<FunctionalOperator>] {
        &self.custom_functions
    }

    pub fn custom_constants(&self) -> &[Option<ConstantOperator>] {
        &self.custom_constants
    }

    /// Copy of the tokens cached by the last successful [`validate`](Self::validate).
    pub fn tokens(&self) -> Option<Vec<Token>> {
        self.tokens.borrow().clone()
    }

    fn context(&self) -> OperatorContext<'_> {
        OperatorContext::new(&self.custom_functions, &self.custom_constants)
    }

    fn is_blank(&self) -> bool {
        self.source.chars().all(char::is_whitespace)
    }

    /// Checks the custom operators and the expression text.
    ///
    /// Returns the first error found, or `None` if the expression is valid. A successful
    /// validation replaces the token cache; a failed one clears it.
    pub fn validate(&self) -> Option<ParserError> {
        match validate_tokens(&self.source, &self.context()) {
            Ok(tokens) => {
                *self.tokens.borrow_mut() = Some(tokens);
                None
            }
            Err(err) => {
                debug!("{:?} rejected: {}", self.source, err);
                self.tokens.borrow_mut().take();
                Some(err)
            }
        }
    }

    /// Validates and evaluates the expression.
    ///
    /// Blank expressions evaluate to NaN without being validated.
    pub fn try_evaluate(&self) -> Result<f64> {
        if self.is_blank() {
            return Ok(f64::NAN);
        }
        if let Some(err) = self.validate() {
            return Err(err);
        }

        let tokens = self.tokens.borrow();
        let mut arena = self.arena.borrow_mut();
        arena.reset();
        eval::evaluate(tokens.as_deref().unwrap_or_default(), &self.context(), &arena)
    }

    /// Validates and evaluates the expression.
    ///
    /// # Panics
    ///
    /// Panics with the error message if validation fails.
    pub fn evaluate(&self) -> f64 {
        match self.try_evaluate() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl Clone for Expression {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            custom_functions: self.custom_functions.clone(),
            custom_constants: self.custom_constants.clone(),
            tokens: RefCell::new(self.tokens.borrow().clone()),
            arena: RefCell::new(Bump::new()),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for Expression {
    fn from(expression: &str) -> Self {
        Self::new(expression)
    }
}

impl From<String> for Expression {
    fn from(expression: String) -> Self {
        Self::new(expression)
    }
}
