#![no_std]
#![doc = r#"
# mexp-rs

An embeddable, no_std-friendly math expression validator and evaluator for Rust.

## Overview

mexp-rs takes a single arithmetic expression such as `log(log(3.2e+2, -1e1), sqrt(1E-4))`,
checks it against a grammar state machine and either evaluates it to an `f64` or reports
a classified error pointing at the exact offending character. It is meant for calculators
and editors that want to underline mistakes while the user types.

Key features:
- Scientific notation literals (`1e-4`, `3.2E+2`)
- Binary `+ - * / % ^`, prefix `-`, postfix `!`, `torad`, `todeg`
- Built-in constants `pi` and `e` and about forty built-in functions
- User supplied functions (with allowed argument counts) and constants
- Position-accurate errors for every lexical, grammar and arity problem
- Shunting-yard evaluation, no recursion

## Quick Start

```rust
use mexp_rs::Expression;

let expression = Expression::new("2 ^ 2 ^ 2");
assert_eq!(expression.try_evaluate().unwrap(), 16.0);

let expression = Expression::new("-2 ^ 2");
assert_eq!(expression.evaluate(), -4.0);
```

## Custom Functions and Constants

```rust
use mexp_rs::{ConstantOperator, Expression, FunctionalOperator};

let f = FunctionalOperator::new("f", |args: &[f64]| 2.0 * args[0], [1]);
let x = ConstantOperator::new("x", 100.0);
let expression = Expression::with_custom_operators("f(x)", [f], [x]);
assert_eq!(expression.try_evaluate().unwrap(), 200.0);
```

## Error Handling

```rust
use mexp_rs::{Expression, ParserErrorKind};

let err = Expression::new("sin(1, 1)").validate().unwrap();
assert_eq!(err.position(), 0);
assert_eq!(err.kind(), ParserErrorKind::IncorrectArgumentCount);

let err = Expression::new("1 - 2.3E--2").try_evaluate().unwrap_err();
assert_eq!(err.position(), 4);
assert_eq!(err.kind(), ParserErrorKind::InvalidNumberFormat);
```

Blank expressions are valid and evaluate to NaN:

```rust
assert!(mexp_rs::Expression::new(" \t").try_evaluate().unwrap().is_nan());
```

## Operator Precedence and Associativity

From lowest to highest precedence:

| Precedence     | Operators               | Associativity |
|----------------|-------------------------|---------------|
| Additive       | `+` `-`                 | Left          |
| Multiplicative | `*` `/` `%`             | Left          |
| Unary          | prefix `-`              | Right         |
| Exponentiation | `^`, postfix `!` `torad` `todeg` | Right for `^` |

Unary minus binds looser than `^`: `-2 ^ 2` is `-4` while `(-2) ^ 2` is `4`.

## Built-in Functions

- Trigonometric (degrees): `sin`, `cos`, `tan`, `csc`, `sec`, `cot` and their `a`-prefixed inverses
- Hyperbolic: `sinh`, `cosh`, `tanh`, `csch`, `sech`, `coth` and their `a`-prefixed inverses
- Logarithmic: `log(x, base)`, `log10`, `log2`, `ln`
- Rounding: `ceil`, `floor`, `round`
- Misc: `sqrt`, `abs`, `P(n, r)`, `C(n, r)`, `H(n, r)`, variadic `min` and `max`
"#]

extern crate alloc;

pub mod context;
pub mod engine;
pub mod error;
pub mod eval;
pub mod expression;
pub mod functions;
pub mod lexer;
pub mod types;

pub use context::OperatorContext;
pub use engine::interp;
pub use error::{ParserError, ParserErrorContext, ParserErrorKind, Result};
pub use expression::Expression;
pub use lexer::Token;
pub use types::*;

pub mod constants {
    pub const PI: f64 = core::f64::consts::PI;
    pub const E: f64 = core::f64::consts::E;
    pub const TEST_PRECISION: f64 = 1e-10;
}

/// Utility macro to check if two floating point values are approximately equal
/// within a specified epsilon. Supports an optional message like assert_eq!.
#[macro_export]
macro_rules! assert_approx_eq {
    // assert_approx_eq!(left, right) -> use default epsilon
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    // assert_approx_eq!(left, right, epsilon)
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $epsilon, "values differ")
    };
    // assert_approx_eq!(left, right, epsilon, "format message with args", args...)
    ($left:expr, $right:expr, $epsilon:expr, $($arg:tt)+) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let eps: f64 = $epsilon;

        if left_val.is_nan() && right_val.is_nan() {
            // NaN == NaN for our purposes
        } else if left_val.is_infinite()
            && right_val.is_infinite()
            && (left_val > 0.0) == (right_val > 0.0)
        {
            // Same-signed infinities are equal
        } else {
            let diff = if left_val > right_val {
                left_val - right_val
            } else {
                right_val - left_val
            };
            assert!(
                diff < eps,
                "assertion failed: `(left ≈ right)` (left: `{}`, right: `{}`, epsilon: `{}`): {}",
                left_val,
                right_val,
                eps,
                core::format_args!($($arg)+)
            );
        }
    }};
}
