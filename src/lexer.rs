//! Tokenizer: splits an expression into raw lexemes and classifies them.
//!
//! Scanning and classification are two passes. The [`Lexer`] walks the source once and
//! yields [`Lexeme`]s (numbers, identifiers and single symbol characters); a malformed
//! number fails the scan before any name is looked up. [`tokenize`] then resolves every
//! lexeme against an [`OperatorContext`] into a [`Token`].

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::trace;

use crate::context::OperatorContext;
use crate::error::{ParserError, ParserErrorKind, Result};
use crate::types::{Operator, TokenKind};

/// A classified token. `position` is the byte offset of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub position: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, position: usize, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            position,
            kind,
        }
    }

    /// Parsed value of a number token.
    pub fn number(&self) -> Option<f64> {
        match self.kind {
            TokenKind::Number(value) => Some(value),
            _ => None,
        }
    }

    /// Resolved argument count of a functional operator token.
    pub fn arity(&self) -> Option<usize> {
        match self.kind {
            TokenKind::FunctionalOperator { arity } => arity,
            _ => None,
        }
    }
}

/// Shape of a lexeme before it is matched against any operator table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LexemeKind {
    Number(f64),
    Identifier,
    Symbol,
}

/// A slice of the source produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lexeme<'a> {
    pub text: &'a str,
    pub position: usize,
    pub kind: LexemeKind,
}

/// Scanner over an expression string.
#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Consumes a digit-led run. A sign is only part of the run right after an exponent marker.
    fn scan_number(&mut self, start: usize) -> Result<Lexeme<'a>> {
        let mut previous = None;
        while let Some(c) = self.peek() {
            let continues = match c {
                '0'..='9' | '.' | 'e' | 'E' => true,
                '+' | '-' => matches!(previous, Some('e' | 'E')),
                _ => false,
            };
            if !continues {
                break;
            }
            previous = Some(c);
            self.advance();
        }

        let text = &self.input[start..self.pos];
        let value = text
            .parse::<f64>()
            .map_err(|_| ParserError::at(start, ParserErrorKind::InvalidNumberFormat))?;
        Ok(Lexeme {
            text,
            position: start,
            kind: LexemeKind::Number(value),
        })
    }

    fn scan_identifier(&mut self, start: usize) -> Lexeme<'a> {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        Lexeme {
            text: &self.input[start..self.pos],
            position: start,
            kind: LexemeKind::Identifier,
        }
    }

    /// Scans the next lexeme, skipping whitespace. `None` at the end of input.
    pub fn next_lexeme(&mut self) -> Option<Result<Lexeme<'a>>> {
        self.skip_whitespace();
        let start = self.pos;
        let c = self.peek()?;

        if c.is_ascii_digit() {
            return Some(self.scan_number(start));
        }
        if c.is_alphabetic() || c == '_' {
            return Some(Ok(self.scan_identifier(start)));
        }

        self.advance();
        Some(Ok(Lexeme {
            text: &self.input[start..self.pos],
            position: start,
            kind: LexemeKind::Symbol,
        }))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Lexeme<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_lexeme()
    }
}

/// Whether a `-` following a token of this kind is the prefix negation.
fn starts_operand(previous: Option<&TokenKind>) -> bool {
    match previous {
        None => true,
        Some(kind) => matches!(
            kind,
            TokenKind::BinaryOperator
                | TokenKind::OpeningParenthesis
                | TokenKind::Comma
                | TokenKind::PrefixUnaryOperator
        ),
    }
}

fn classify(
    lexeme: &Lexeme<'_>,
    previous: Option<&TokenKind>,
    context: &OperatorContext<'_>,
) -> Result<TokenKind> {
    if let LexemeKind::Number(value) = lexeme.kind {
        return Ok(TokenKind::Number(value));
    }
    match lexeme.text {
        "(" => return Ok(TokenKind::OpeningParenthesis),
        ")" => return Ok(TokenKind::ClosingParenthesis),
        "," => return Ok(TokenKind::Comma),
        _ => {}
    }

    if starts_operand(previous) && context.prefix_unary(lexeme.text).is_some() {
        return Ok(TokenKind::PrefixUnaryOperator);
    }

    match context.lookup(lexeme.text) {
        Some(Operator::Binary(_)) => Ok(TokenKind::BinaryOperator),
        Some(Operator::Constant(_)) => Ok(TokenKind::ConstantOperator),
        Some(Operator::Functional(_)) => Ok(TokenKind::FunctionalOperator { arity: None }),
        Some(Operator::PostfixUnary(_)) => Ok(TokenKind::PostfixUnaryOperator),
        Some(Operator::PrefixUnary(_)) => Ok(TokenKind::PrefixUnaryOperator),
        None => Err(ParserError::at(lexeme.position, ParserErrorKind::UnknownOperator)),
    }
}

/// Scans `expression` and classifies every lexeme against `context`.
///
/// Number-format errors are reported before unknown names, whatever their order in the text.
pub fn tokenize(expression: &str, context: &OperatorContext<'_>) -> Result<Vec<Token>> {
    let lexemes = Lexer::new(expression).collect::<Result<Vec<_>>>()?;

    let mut tokens: Vec<Token> = Vec::with_capacity(lexemes.len());
    for lexeme in &lexemes {
        let kind = classify(lexeme, tokens.last().map(|t| &t.kind), context)?;
        trace!("token {:?} at {} -> {:?}", lexeme.text, lexeme.position, kind);
        tokens.push(Token {
            text: lexeme.text.to_string(),
            position: lexeme.position,
            kind,
        });
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn texts(expression: &str) -> Vec<(String, usize)> {
        Lexer::new(expression)
            .map(|l| l.unwrap())
            .map(|l| (l.text.to_string(), l.position))
            .collect()
    }

    #[test]
    fn test_scan_positions() {
        let positions: Vec<usize> = texts("log(log(3.2e+2, -1e1), sqrt(1E-4))")
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(
            positions,
            vec![0, 3, 4, 7, 8, 14, 16, 17, 20, 21, 23, 27, 28, 32, 33]
        );
    }

    #[test]
    fn test_scan_splits_sign_outside_exponent() {
        let lexemes = texts("1-2e-3+4");
        let strs: Vec<&str> = lexemes.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(strs, vec!["1", "-", "2e-3", "+", "4"]);
    }

    #[test]
    fn test_scan_identifiers_and_symbols() {
        let lexemes = texts("_a1 todeg$ (");
        let strs: Vec<&str> = lexemes.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(strs, vec!["_a1", "todeg", "$", "("]);
    }

    #[test]
    fn test_number_format_errors() {
        for (expression, position) in [
            ("1 + 1ee", 4),
            ("3 + sin(1..e3)", 8),
            ("3 / (1e3..)", 5),
            ("2er3", 0),
            ("1 - 2.3E--2", 4),
            ("1e + 1", 0),
        ] {
            let err = Lexer::new(expression)
                .collect::<Result<Vec<_>>>()
                .unwrap_err();
            assert_eq!(err.kind(), ParserErrorKind::InvalidNumberFormat, "{}", expression);
            assert_eq!(err.position(), position, "{}", expression);
        }
    }

    #[test]
    fn test_prefix_minus_classification() {
        let ctx = OperatorContext::builtin();
        let tokens = tokenize("-pi * -sin(-e torad) - 1", &ctx).unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::PrefixUnaryOperator);
        assert_eq!(kinds[2], TokenKind::BinaryOperator);
        assert_eq!(kinds[3], TokenKind::PrefixUnaryOperator);
        assert_eq!(kinds[4], TokenKind::FunctionalOperator { arity: None });
        assert_eq!(kinds[6], TokenKind::PrefixUnaryOperator);
        assert_eq!(kinds[8], TokenKind::PostfixUnaryOperator);
        assert_eq!(kinds[10], TokenKind::BinaryOperator);
        assert_eq!(tokens[11].number(), Some(1.0));
    }

    #[test]
    fn test_double_minus_is_two_prefix_tokens() {
        let ctx = OperatorContext::builtin();
        let tokens = tokenize("--1", &ctx).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::PrefixUnaryOperator);
        assert_eq!(tokens[1].kind, TokenKind::PrefixUnaryOperator);
    }

    #[test]
    fn test_unknown_operators() {
        let ctx = OperatorContext::builtin();
        let err = tokenize("sin(pipi)", &ctx).unwrap_err();
        assert_eq!((err.position(), err.kind()), (4, ParserErrorKind::UnknownOperator));
        let err = tokenize("sinn(pi)", &ctx).unwrap_err();
        assert_eq!((err.position(), err.kind()), (0, ParserErrorKind::UnknownOperator));
        let err = tokenize("2 $ 3", &ctx).unwrap_err();
        assert_eq!((err.position(), err.kind()), (2, ParserErrorKind::UnknownOperator));
    }

    #[test]
    fn test_number_errors_win_over_unknown_names() {
        let ctx = OperatorContext::builtin();
        let err = tokenize("foo + 1e", &ctx).unwrap_err();
        assert_eq!((err.position(), err.kind()), (6, ParserErrorKind::InvalidNumberFormat));
    }

    #[test]
    fn test_whitespace_only_yields_no_tokens() {
        let ctx = OperatorContext::builtin();
        assert!(tokenize(" \t\n ", &ctx).unwrap().is_empty());
        assert!(tokenize("", &ctx).unwrap().is_empty());
    }
}
