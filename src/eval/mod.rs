//! Evaluation of validated token sequences.
//!
//! Evaluation is two iterative passes, neither of which recurses: [`shunting_yard`]
//! reorders the infix tokens into a postfix program and [`stack_ops`] runs that program on
//! an operand stack. Both passes allocate from a caller supplied [`Bump`] arena so an
//! [`crate::Expression`] can reuse the same memory across evaluations.

pub mod shunting_yard;
pub mod stack_ops;

use bumpalo::Bump;
use log::trace;

use crate::context::OperatorContext;
use crate::error::Result;
use crate::lexer::Token;

pub use shunting_yard::to_postfix;
pub use stack_ops::{EvalOp, run};

/// Evaluates tokens that passed [`crate::engine::validate_tokens`].
///
/// An empty token sequence yields NaN.
pub fn evaluate(tokens: &[Token], context: &OperatorContext<'_>, arena: &Bump) -> Result<f64> {
    if tokens.is_empty() {
        return Ok(f64::NAN);
    }
    let program = to_postfix(tokens, context, arena)?;
    trace!("postfix program of {} step(s)", program.len());
    Ok(run(&program, arena))
}
