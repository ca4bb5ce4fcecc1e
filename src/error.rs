//! Error types and handling for the mexp-rs crate.
//!
//! Every failure the engine reports carries a [`ParserErrorContext`]: the offending
//! character offset in the expression (or `-1` when the problem is in the operator
//! configuration rather than the text) and a [`ParserErrorKind`] classifying it. Editors
//! can use the position directly to underline the offending character.

extern crate alloc;
use alloc::format;
use alloc::string::String;
use core::fmt;
use core::result;

use serde::{Deserialize, Serialize};

/// Result type used throughout the crate.
pub type Result<T> = result::Result<T, ParserError>;

/// Position reported for errors that are not tied to a location in the expression.
pub const NO_POSITION: isize = -1;

/// The kind of problem that made validation or evaluation fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParserErrorKind {
    /// A digit-led run could not be parsed as a floating point number.
    InvalidNumberFormat,

    /// A function was called with a number of arguments it does not accept.
    IncorrectArgumentCount,

    /// A custom function name is empty, starts with a digit, or contains characters
    /// other than letters, digits and underscores.
    InvalidCustomFunctionName,

    /// The custom function list contains an absent entry.
    NullCustomFunction,

    /// A custom constant name is empty, starts with a digit, or contains characters
    /// other than letters, digits and underscores.
    InvalidCustomConstantName,

    /// The custom constant list contains an absent entry.
    NullCustomConstant,

    /// Two functions or constants (built-in or custom) share a name.
    ConflictingNames,

    /// A constant holds NaN.
    NaNConstant,

    /// A binary operator appears where an operand was expected.
    UnexpectedBinaryOperator,

    /// The expression ended with parentheses still open.
    TooManyOpeningParentheses,

    /// A closing parenthesis has no matching opening parenthesis, or closes an empty group.
    UnexpectedClosingParenthesis,

    /// A comma appears outside a function's argument list or without a preceding argument.
    UnexpectedComma,

    /// A constant appears where an operator was expected.
    UnexpectedConstantOperator,

    /// A function name appears where an operator was expected.
    UnexpectedFunctionalOperator,

    /// A number appears where an operator was expected.
    UnexpectedNumber,

    /// An opening parenthesis directly follows an operand.
    UnexpectedOpeningParenthesis,

    /// A postfix operator appears where an operand was expected.
    UnexpectedPostfixUnaryOperator,

    /// A prefix operator appears where an operator was expected, or after another prefix operator.
    UnexpectedPrefixUnaryOperator,

    /// A name in the expression matches no known operator, function or constant.
    UnknownOperator,

    /// The expression ended in the middle of a construct.
    UnexpectedNewline,

    /// Parentheses are nested deeper than [`crate::engine::MAX_NESTING_DEPTH`].
    NestingTooDeep,
}

impl fmt::Display for ParserErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParserErrorKind::InvalidNumberFormat => "Invalid number format",
            ParserErrorKind::IncorrectArgumentCount => "Incorrect argument count",
            ParserErrorKind::InvalidCustomFunctionName => "Invalid custom function name",
            ParserErrorKind::NullCustomFunction => "Null custom function",
            ParserErrorKind::InvalidCustomConstantName => "Invalid custom constant name",
            ParserErrorKind::NullCustomConstant => "Null custom constant",
            ParserErrorKind::ConflictingNames => "Conflicting names",
            ParserErrorKind::NaNConstant => "NaN constant",
            ParserErrorKind::UnexpectedBinaryOperator => "Unexpected binary operator",
            ParserErrorKind::TooManyOpeningParentheses => "Too many opening parentheses",
            ParserErrorKind::UnexpectedClosingParenthesis => "Unexpected closing parenthesis",
            ParserErrorKind::UnexpectedComma => "Unexpected comma",
            ParserErrorKind::UnexpectedConstantOperator => "Unexpected constant",
            ParserErrorKind::UnexpectedFunctionalOperator => "Unexpected function",
            ParserErrorKind::UnexpectedNumber => "Unexpected number",
            ParserErrorKind::UnexpectedOpeningParenthesis => "Unexpected opening parenthesis",
            ParserErrorKind::UnexpectedPostfixUnaryOperator => {
                "Unexpected postfix unary operator"
            }
            ParserErrorKind::UnexpectedPrefixUnaryOperator => "Unexpected prefix unary operator",
            ParserErrorKind::UnknownOperator => "Unknown operator",
            ParserErrorKind::UnexpectedNewline => "Unexpected end of expression",
            ParserErrorKind::NestingTooDeep => "Parentheses nested too deeply",
        };
        f.write_str(text)
    }
}

/// Where an error happened and what kind it is.
///
/// `position` is the 0-based byte offset of the offending token, the length of the
/// expression for errors detected at its end, or [`NO_POSITION`] for configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParserErrorContext {
    pub position: isize,
    pub kind: ParserErrorKind,
}

impl ParserErrorContext {
    pub const fn new(position: isize, kind: ParserErrorKind) -> Self {
        Self { position, kind }
    }
}

/// Error returned by validation and evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    message: String,
    context: ParserErrorContext,
}

impl ParserError {
    /// Creates an error with a custom message.
    pub fn new(message: impl Into<String>, context: ParserErrorContext) -> Self {
        Self {
            message: message.into(),
            context,
        }
    }

    /// Creates an error at `position` with the default message for `kind`.
    pub fn at(position: usize, kind: ParserErrorKind) -> Self {
        Self::new(
            format!("{} at position {}", kind, position),
            ParserErrorContext::new(position as isize, kind),
        )
    }

    /// Creates a configuration error, which has no position in the expression.
    pub fn configuration(kind: ParserErrorKind, detail: &str) -> Self {
        Self::new(
            format!("{}: {}", kind, detail),
            ParserErrorContext::new(NO_POSITION, kind),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> ParserErrorContext {
        self.context
    }

    pub fn position(&self) -> isize {
        self.context.position
    }

    pub fn kind(&self) -> ParserErrorKind {
        self.context.kind
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl core::error::Error for ParserError {}
