//! Infix to postfix conversion.
//!
//! Works on token sequences that already passed grammar validation and arity resolution,
//! so parentheses are balanced and every function token carries its argument count.

use bumpalo::Bump;
use bumpalo::collections::Vec as BumpVec;

use crate::context::OperatorContext;
use crate::error::{ParserError, ParserErrorKind, Result};
use crate::eval::stack_ops::EvalOp;
use crate::lexer::Token;
use crate::types::{Associativity, TokenKind};

/// Entry of the pending-operator stack.
#[derive(Debug, Clone, Copy)]
enum Pending<'ctx> {
    Op(EvalOp<'ctx>),
    Group,
}

fn unknown(token: &Token) -> ParserError {
    ParserError::at(token.position, ParserErrorKind::UnknownOperator)
}

/// Whether a pending operator must be emitted before the incoming binary operator is pushed.
fn yields_to(pending: &EvalOp<'_>, incoming: &EvalOp<'_>) -> bool {
    let (Some(top), Some(next)) = (pending.precedence(), incoming.precedence()) else {
        return false;
    };
    top > next || (top == next && incoming.associativity() == Some(Associativity::LeftToRight))
}

/// Moves pending operators to `output` until a group marker or the bottom of the stack.
fn drain_group<'ctx>(
    pending: &mut BumpVec<'_, Pending<'ctx>>,
    output: &mut BumpVec<'_, EvalOp<'ctx>>,
) {
    while let Some(Pending::Op(op)) = pending.last().copied() {
        output.push(op);
        pending.pop();
    }
}

/// Converts validated infix tokens into a postfix program allocated in `arena`.
pub fn to_postfix<'bump, 'ctx>(
    tokens: &[Token],
    context: &OperatorContext<'ctx>,
    arena: &'bump Bump,
) -> Result<BumpVec<'bump, EvalOp<'ctx>>> {
    let mut output = BumpVec::with_capacity_in(tokens.len(), arena);
    let mut pending: BumpVec<'bump, Pending<'ctx>> = BumpVec::new_in(arena);

    for token in tokens {
        match token.kind {
            TokenKind::Number(value) => output.push(EvalOp::Push(value)),
            TokenKind::ConstantOperator => {
                let constant = context.constant(&token.text).ok_or_else(|| unknown(token))?;
                output.push(EvalOp::Push(constant.value));
            }
            TokenKind::PostfixUnaryOperator => {
                // The operand is already complete in the output.
                let op = context.postfix_unary(&token.text).ok_or_else(|| unknown(token))?;
                output.push(EvalOp::Postfix(op));
            }
            TokenKind::PrefixUnaryOperator => {
                let op = context.prefix_unary(&token.text).ok_or_else(|| unknown(token))?;
                pending.push(Pending::Op(EvalOp::Prefix(op)));
            }
            TokenKind::FunctionalOperator { arity } => {
                let function = context.function(&token.text).ok_or_else(|| unknown(token))?;
                pending.push(Pending::Op(EvalOp::Call {
                    function,
                    arity: arity.unwrap_or(0),
                }));
            }
            TokenKind::BinaryOperator => {
                let op = context.binary(&token.text).ok_or_else(|| unknown(token))?;
                let incoming = EvalOp::Binary(op);
                while let Some(Pending::Op(top)) = pending.last().copied() {
                    if !yields_to(&top, &incoming) {
                        break;
                    }
                    output.push(top);
                    pending.pop();
                }
                pending.push(Pending::Op(incoming));
            }
            TokenKind::OpeningParenthesis => pending.push(Pending::Group),
            TokenKind::Comma => drain_group(&mut pending, &mut output),
            TokenKind::ClosingParenthesis => {
                drain_group(&mut pending, &mut output);
                pending.pop();
                if let Some(Pending::Op(call @ EvalOp::Call { .. })) = pending.last().copied() {
                    output.push(call);
                    pending.pop();
                }
            }
        }
    }

    while let Some(entry) = pending.pop() {
        if let Pending::Op(op) = entry {
            output.push(op);
        }
    }
    Ok(output)
}
