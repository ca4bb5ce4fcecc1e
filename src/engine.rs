//! Grammar validation and arity resolution.
//!
//! Validation walks the classified tokens once, keeping a stack of [`ParserState`] frames.
//! The top frame says which token kinds may come next; opening a parenthesis pushes a
//! frame, closing one pops back. A frame tagged [`ParserState::IN_FUNCTION`] marks a
//! function's argument list, which is the only place a comma is allowed.
//!
//! After a successful walk every functional operator token gets its argument count written
//! into it, and that count is checked against the operator's allowed arities.

extern crate alloc;

use alloc::vec::Vec;

use bitflags::bitflags;
use bumpalo::Bump;
use log::debug;

use crate::context::OperatorContext;
use crate::error::{ParserError, ParserErrorKind, Result};
use crate::eval;
use crate::lexer::{Token, tokenize};
use crate::types::TokenKind;

/// Maximum number of frames on the grammar state stack.
///
/// Every unclosed parenthesis holds one frame beyond the outermost one, so expressions may
/// nest up to `MAX_NESTING_DEPTH - 1` parentheses deep.
pub const MAX_NESTING_DEPTH: usize = 256;

bitflags! {
    /// What the validator accepts next at one nesting level.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParserState: u16 {
        const EXPECTING_NUMBER = 1;
        const EXPECTING_CONSTANT = 1 << 1;
        const EXPECTING_FUNCTIONAL_OPERATOR = 1 << 2;
        const EXPECTING_BINARY_OPERATOR = 1 << 3;
        const EXPECTING_PREFIX_UNARY_OPERATOR = 1 << 4;
        const EXPECTING_POSTFIX_UNARY_OPERATOR = 1 << 5;
        const EXPECTING_OPENING_PARENTHESIS = 1 << 6;
        const EXPECTING_CLOSING_PARENTHESIS = 1 << 7;
        const EXPECTING_COMMA = 1 << 8;
        /// The frame belongs to a function's argument list.
        const IN_FUNCTION = 1 << 9;

        const EXPECTING_OPERAND = Self::EXPECTING_NUMBER.bits()
            | Self::EXPECTING_CONSTANT.bits()
            | Self::EXPECTING_FUNCTIONAL_OPERATOR.bits()
            | Self::EXPECTING_OPENING_PARENTHESIS.bits();
        const START = Self::EXPECTING_OPERAND.bits()
            | Self::EXPECTING_PREFIX_UNARY_OPERATOR.bits();
        const AFTER_NUMBER = Self::EXPECTING_BINARY_OPERATOR.bits()
            | Self::EXPECTING_POSTFIX_UNARY_OPERATOR.bits()
            | Self::EXPECTING_CLOSING_PARENTHESIS.bits()
            | Self::EXPECTING_COMMA.bits();
        const AFTER_POSTFIX_UNARY_OPERATOR = Self::AFTER_NUMBER.bits();
        const AFTER_CLOSING_PARENTHESIS = Self::AFTER_NUMBER.bits();
    }
}

/// Token-by-token grammar checker.
pub struct GrammarValidator {
    stack: heapless::Vec<ParserState, MAX_NESTING_DEPTH>,
}

impl Default for GrammarValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarValidator {
    pub fn new() -> Self {
        let mut stack = heapless::Vec::new();
        // Capacity is non-zero, the first push cannot fail.
        let _ = stack.push(ParserState::START);
        Self { stack }
    }

    /// Number of frames currently on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn top(&self) -> ParserState {
        self.stack.last().copied().unwrap_or(ParserState::empty())
    }

    fn beneath(&self) -> Option<ParserState> {
        let len = self.stack.len();
        if len < 2 {
            return None;
        }
        self.stack.get(len - 2).copied()
    }

    fn set_top(&mut self, state: ParserState) {
        if let Some(top) = self.stack.last_mut() {
            *top = state;
        }
    }

    fn push(&mut self, state: ParserState, position: usize) -> Result<()> {
        self.stack
            .push(state)
            .map_err(|_| ParserError::at(position, ParserErrorKind::NestingTooDeep))
    }

    /// Feeds the token at `index`. Earlier tokens must already have been fed.
    pub fn step(&mut self, tokens: &[Token], index: usize) -> Result<()> {
        let token = &tokens[index];
        let top = self.top();
        let require = |flag: ParserState, kind: ParserErrorKind| {
            if top.contains(flag) {
                Ok(())
            } else {
                Err(ParserError::at(token.position, kind))
            }
        };

        match token.kind {
            TokenKind::BinaryOperator => {
                require(
                    ParserState::EXPECTING_BINARY_OPERATOR,
                    ParserErrorKind::UnexpectedBinaryOperator,
                )?;
                self.set_top(ParserState::START);
            }
            TokenKind::PrefixUnaryOperator => {
                require(
                    ParserState::EXPECTING_PREFIX_UNARY_OPERATOR,
                    ParserErrorKind::UnexpectedPrefixUnaryOperator,
                )?;
                self.set_top(ParserState::EXPECTING_OPERAND);
            }
            TokenKind::PostfixUnaryOperator => {
                require(
                    ParserState::EXPECTING_POSTFIX_UNARY_OPERATOR,
                    ParserErrorKind::UnexpectedPostfixUnaryOperator,
                )?;
                self.set_top(ParserState::AFTER_POSTFIX_UNARY_OPERATOR);
            }
            TokenKind::Number(_) => {
                require(ParserState::EXPECTING_NUMBER, ParserErrorKind::UnexpectedNumber)?;
                self.set_top(ParserState::AFTER_NUMBER);
            }
            TokenKind::ConstantOperator => {
                require(
                    ParserState::EXPECTING_CONSTANT,
                    ParserErrorKind::UnexpectedConstantOperator,
                )?;
                self.set_top(ParserState::AFTER_NUMBER);
            }
            TokenKind::FunctionalOperator { .. } => {
                require(
                    ParserState::EXPECTING_FUNCTIONAL_OPERATOR,
                    ParserErrorKind::UnexpectedFunctionalOperator,
                )?;
                self.set_top(ParserState::EXPECTING_OPENING_PARENTHESIS | ParserState::IN_FUNCTION);
            }
            TokenKind::OpeningParenthesis => {
                require(
                    ParserState::EXPECTING_OPENING_PARENTHESIS,
                    ParserErrorKind::UnexpectedOpeningParenthesis,
                )?;
                let popped = self.stack.pop().unwrap_or(ParserState::empty());
                let closing = ParserState::EXPECTING_CLOSING_PARENTHESIS
                    | (popped & ParserState::IN_FUNCTION);
                self.push(closing, token.position)?;
                self.push(ParserState::START, token.position)?;
            }
            TokenKind::ClosingParenthesis => {
                let beneath = self.beneath();
                let closes_group = top.contains(ParserState::EXPECTING_CLOSING_PARENTHESIS)
                    && beneath
                        .is_some_and(|b| b.contains(ParserState::EXPECTING_CLOSING_PARENTHESIS));
                let closes_empty_call = beneath
                    .is_some_and(|b| b.contains(ParserState::IN_FUNCTION))
                    && index > 0
                    && tokens[index - 1].kind == TokenKind::OpeningParenthesis;
                if !(closes_group || closes_empty_call) {
                    return Err(ParserError::at(
                        token.position,
                        ParserErrorKind::UnexpectedClosingParenthesis,
                    ));
                }
                self.stack.truncate(self.stack.len() - 2);
                self.push(ParserState::AFTER_CLOSING_PARENTHESIS, token.position)?;
            }
            TokenKind::Comma => {
                let in_function = self
                    .beneath()
                    .is_some_and(|b| b.contains(ParserState::IN_FUNCTION));
                if !(top.contains(ParserState::EXPECTING_COMMA) && in_function) {
                    return Err(ParserError::at(token.position, ParserErrorKind::UnexpectedComma));
                }
                self.set_top(ParserState::START);
            }
        }
        Ok(())
    }

    /// Checks the state left after the last token. `len` is the expression length.
    pub fn finish(&self, tokens: &[Token], len: usize) -> Result<()> {
        let Some(last) = tokens.last() else {
            return Ok(());
        };
        let dangling = matches!(
            last.kind,
            TokenKind::BinaryOperator
                | TokenKind::Comma
                | TokenKind::FunctionalOperator { .. }
                | TokenKind::OpeningParenthesis
                | TokenKind::PrefixUnaryOperator
        );
        if dangling {
            return Err(ParserError::at(len, ParserErrorKind::UnexpectedNewline));
        }
        if self.stack.len() > 1 {
            return Err(ParserError::at(len, ParserErrorKind::TooManyOpeningParentheses));
        }
        Ok(())
    }

    /// Runs the whole walk over `tokens`.
    pub fn check(tokens: &[Token], len: usize) -> Result<()> {
        let mut validator = Self::new();
        for index in 0..tokens.len() {
            validator.step(tokens, index)?;
        }
        validator.finish(tokens, len)
    }
}

/// Counts the arguments of the function whose name token is at `index`.
///
/// `index + 1` must be the call's opening parenthesis.
fn count_arguments(tokens: &[Token], index: usize) -> usize {
    let mut depth = 0usize;
    let mut commas = 0usize;
    let mut empty = true;
    for token in tokens.iter().skip(index + 2) {
        match token.kind {
            TokenKind::OpeningParenthesis => depth += 1,
            TokenKind::ClosingParenthesis if depth == 0 => break,
            TokenKind::ClosingParenthesis => depth -= 1,
            TokenKind::Comma if depth == 0 => commas += 1,
            _ => {}
        }
        empty = false;
    }
    if empty { 0 } else { commas + 1 }
}

/// Writes each function call's argument count into its token and checks it against the
/// operator's allowed arities.
pub fn resolve_arities(tokens: &mut [Token], context: &OperatorContext<'_>) -> Result<()> {
    for index in 0..tokens.len() {
        if !matches!(tokens[index].kind, TokenKind::FunctionalOperator { .. }) {
            continue;
        }
        let arity = count_arguments(tokens, index);
        let token = &mut tokens[index];
        token.kind = TokenKind::FunctionalOperator { arity: Some(arity) };

        let function = context
            .function(&token.text)
            .ok_or_else(|| ParserError::at(token.position, ParserErrorKind::UnknownOperator))?;
        if !function.allowed_arities.allows(arity) {
            return Err(ParserError::at(
                token.position,
                ParserErrorKind::IncorrectArgumentCount,
            ));
        }
        debug!("{}() at {} takes {} argument(s)", token.text, token.position, arity);
    }
    Ok(())
}

/// Runs configuration checks, tokenization, the grammar walk and arity resolution.
pub fn validate_tokens(expression: &str, context: &OperatorContext<'_>) -> Result<Vec<Token>> {
    context.validate()?;
    let mut tokens = tokenize(expression, context)?;
    GrammarValidator::check(&tokens, expression.len())?;
    resolve_arities(&mut tokens, context)?;
    debug!("validated {:?}: {} token(s)", expression, tokens.len());
    Ok(tokens)
}

/// Validates and evaluates `expression` with the built-in operators only.
///
/// Blank expressions evaluate to NaN.
///
/// # Example
///
/// ```
/// use mexp_rs::interp;
///
/// assert_eq!(interp("1 + 2 * 3").unwrap(), 7.0);
/// assert_eq!(interp("P(5, 2)").unwrap(), 20.0);
/// assert!(interp("1 +").is_err());
/// ```
pub fn interp(expression: &str) -> Result<f64> {
    let context = OperatorContext::builtin();
    let tokens = validate_tokens(expression, &context)?;
    let arena = Bump::new();
    eval::evaluate(&tokens, &context, &arena)
}
