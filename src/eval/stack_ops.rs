//! Postfix operations and the operand-stack machine that runs them.

use bumpalo::Bump;
use bumpalo::collections::Vec as BumpVec;

use crate::types::{
    Associativity, BinaryOperator, FunctionalOperator, OperatorPrecedence, PostfixUnaryOperator,
    PrefixUnaryOperator,
};

/// One step of a postfix program.
#[derive(Debug, Clone, Copy)]
pub enum EvalOp<'ctx> {
    /// Push a number or constant value.
    Push(f64),
    Binary(&'ctx BinaryOperator),
    Prefix(&'ctx PrefixUnaryOperator),
    Postfix(&'ctx PostfixUnaryOperator),
    /// Call a function with the top `arity` operands, in source order.
    Call {
        function: &'ctx FunctionalOperator,
        arity: usize,
    },
}

impl EvalOp<'_> {
    pub fn precedence(&self) -> Option<OperatorPrecedence> {
        match self {
            EvalOp::Binary(op) => Some(op.precedence),
            EvalOp::Prefix(op) => Some(op.precedence),
            EvalOp::Postfix(op) => Some(op.precedence),
            EvalOp::Push(_) | EvalOp::Call { .. } => None,
        }
    }

    pub fn associativity(&self) -> Option<Associativity> {
        match self {
            EvalOp::Binary(op) => Some(op.associativity),
            EvalOp::Prefix(op) => Some(op.associativity()),
            EvalOp::Postfix(op) => Some(op.associativity()),
            EvalOp::Push(_) | EvalOp::Call { .. } => None,
        }
    }

    /// Applies this step to `stack`. Missing operands read as NaN.
    pub fn apply(&self, stack: &mut BumpVec<'_, f64>) {
        let value = match *self {
            EvalOp::Push(value) => value,
            EvalOp::Binary(op) => {
                let right = stack.pop().unwrap_or(f64::NAN);
                let left = stack.pop().unwrap_or(f64::NAN);
                (op.eval)(left, right)
            }
            EvalOp::Prefix(op) => (op.eval)(stack.pop().unwrap_or(f64::NAN)),
            EvalOp::Postfix(op) => (op.eval)(stack.pop().unwrap_or(f64::NAN)),
            EvalOp::Call { function, arity } => {
                let start = stack.len().saturating_sub(arity);
                let value = function.call(&stack[start..]);
                stack.truncate(start);
                value
            }
        };
        stack.push(value);
    }
}

/// Runs a postfix program and returns the value left on top of the operand stack.
///
/// An empty program yields NaN.
pub fn run(program: &[EvalOp<'_>], arena: &Bump) -> f64 {
    let mut stack = BumpVec::with_capacity_in(program.len(), arena);
    for op in program {
        op.apply(&mut stack);
    }
    stack.pop().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use crate::context::{
        BINARY_OPERATORS, OperatorContext, POSTFIX_UNARY_OPERATORS, PREFIX_UNARY_OPERATORS,
    };

    #[test]
    fn test_run_binary_order() {
        let arena = Bump::new();
        let ctx = OperatorContext::builtin();
        let minus = ctx.binary("-").unwrap();
        let program = [EvalOp::Push(10.0), EvalOp::Push(4.0), EvalOp::Binary(minus)];
        assert_eq!(run(&program, &arena), 6.0);
    }

    #[test]
    fn test_run_unary_and_call() {
        let arena = Bump::new();
        let ctx = OperatorContext::builtin();
        let log = ctx.function("log").unwrap();
        let program = [
            EvalOp::Push(3.0),
            EvalOp::Postfix(&POSTFIX_UNARY_OPERATORS[0]),
            EvalOp::Prefix(&PREFIX_UNARY_OPERATORS[0]),
            EvalOp::Push(64.0),
            EvalOp::Push(2.0),
            EvalOp::Call { function: log, arity: 2 },
            EvalOp::Binary(&BINARY_OPERATORS[0]),
        ];
        assert_approx_eq!(run(&program, &arena), 0.0);
    }

    #[test]
    fn test_empty_program_is_nan() {
        let arena = Bump::new();
        assert!(run(&[], &arena).is_nan());
    }

    #[test]
    fn test_ladder_metadata() {
        let pow = EvalOp::Binary(&BINARY_OPERATORS[5]);
        assert_eq!(pow.precedence(), Some(OperatorPrecedence::Exponentiation));
        assert_eq!(pow.associativity(), Some(Associativity::RightToLeft));
        assert_eq!(EvalOp::Push(1.0).precedence(), None);
    }
}
