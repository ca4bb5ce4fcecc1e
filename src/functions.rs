//! Built-in mathematical functions for expression evaluation.
//!
//! This module provides the kernels behind every built-in operator: the arithmetic
//! operators, the unary operators and the functions callable by name. Special cases
//! like division by zero or arguments outside a function's domain produce NaN or infinity
//! rather than panicking.
//!
//! All functions use the `libm` crate so the crate stays usable without `std`.
//!
//! Trigonometric functions work in degrees: `sin(90)` is `1` and `atan(1)` is `45`.
//! Hyperbolic functions take and return plain real numbers.

use libm::{
    acos as libm_acos, acosh as libm_acosh, asin as libm_asin, asinh as libm_asinh,
    atan as libm_atan, atanh as libm_atanh, ceil as libm_ceil, cos as libm_cos,
    cosh as libm_cosh, fabs as libm_fabs, floor as libm_floor, fmod as libm_fmod,
    log as libm_ln, log2 as libm_log2, log10 as libm_log10, pow as libm_pow, rint as libm_rint,
    sin as libm_sin, sinh as libm_sinh, sqrt as libm_sqrt, tan as libm_tan, tanh as libm_tanh,
    trunc as libm_trunc,
};

use crate::constants::PI;

/// Largest `n` for which `n!` is finite in an `f64`.
const MAX_FINITE_FACTORIAL: f64 = 170.0;

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn sub(a: f64, b: f64) -> f64 {
    a - b
}

pub fn mul(a: f64, b: f64) -> f64 {
    a * b
}

/// Divides the first value by the second.
///
/// Follows IEEE-754: `0/0` is NaN and `x/0` is an infinity carrying the sign of `x`.
pub fn div(a: f64, b: f64) -> f64 {
    a / b
}

/// Remainder with the sign of the dividend, like C's `fmod`.
pub fn fmod(a: f64, b: f64) -> f64 {
    libm_fmod(a, b)
}

/// Raises `a` to the power `b`.
///
/// A negative base with a non-integer exponent has no real result and yields NaN, so
/// `(-2) ^ -0.25` is NaN.
pub fn pow(a: f64, b: f64) -> f64 {
    libm_pow(a, b)
}

pub fn neg(a: f64) -> f64 {
    -a
}

/// Factorial of the integer part of `a`.
///
/// # Returns
///
/// NaN for negative or NaN input, infinity once the result overflows.
pub fn factorial(a: f64) -> f64 {
    if a.is_nan() || a < 0.0 {
        return f64::NAN;
    }
    let n = libm_trunc(a);
    if n > MAX_FINITE_FACTORIAL {
        return f64::INFINITY;
    }
    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        i += 1.0;
    }
    result
}

pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

pub fn sqrt(args: &[f64]) -> f64 {
    libm_sqrt(args[0])
}

pub fn sin(args: &[f64]) -> f64 {
    libm_sin(to_radians(args[0]))
}

pub fn cos(args: &[f64]) -> f64 {
    libm_cos(to_radians(args[0]))
}

pub fn tan(args: &[f64]) -> f64 {
    libm_tan(to_radians(args[0]))
}

pub fn asin(args: &[f64]) -> f64 {
    to_degrees(libm_asin(args[0]))
}

pub fn acos(args: &[f64]) -> f64 {
    to_degrees(libm_acos(args[0]))
}

pub fn atan(args: &[f64]) -> f64 {
    to_degrees(libm_atan(args[0]))
}

pub fn csc(args: &[f64]) -> f64 {
    1.0 / libm_sin(to_radians(args[0]))
}

pub fn sec(args: &[f64]) -> f64 {
    1.0 / libm_cos(to_radians(args[0]))
}

pub fn cot(args: &[f64]) -> f64 {
    1.0 / libm_tan(to_radians(args[0]))
}

pub fn acsc(args: &[f64]) -> f64 {
    to_degrees(libm_asin(1.0 / args[0]))
}

pub fn asec(args: &[f64]) -> f64 {
    to_degrees(libm_acos(1.0 / args[0]))
}

/// Inverse cotangent in degrees, ranging over `(0, 180)`.
pub fn acot(args: &[f64]) -> f64 {
    let x = args[0];
    if x == 0.0 {
        90.0
    } else if x > 0.0 {
        to_degrees(libm_atan(1.0 / x))
    } else {
        180.0 + to_degrees(libm_atan(1.0 / x))
    }
}

pub fn sinh(args: &[f64]) -> f64 {
    libm_sinh(args[0])
}

pub fn cosh(args: &[f64]) -> f64 {
    libm_cosh(args[0])
}

pub fn tanh(args: &[f64]) -> f64 {
    libm_tanh(args[0])
}

pub fn asinh(args: &[f64]) -> f64 {
    libm_asinh(args[0])
}

pub fn acosh(args: &[f64]) -> f64 {
    libm_acosh(args[0])
}

pub fn atanh(args: &[f64]) -> f64 {
    libm_atanh(args[0])
}

pub fn csch(args: &[f64]) -> f64 {
    1.0 / libm_sinh(args[0])
}

pub fn sech(args: &[f64]) -> f64 {
    1.0 / libm_cosh(args[0])
}

pub fn coth(args: &[f64]) -> f64 {
    1.0 / libm_tanh(args[0])
}

pub fn acsch(args: &[f64]) -> f64 {
    libm_asinh(1.0 / args[0])
}

pub fn asech(args: &[f64]) -> f64 {
    libm_acosh(1.0 / args[0])
}

pub fn acoth(args: &[f64]) -> f64 {
    libm_atanh(1.0 / args[0])
}

/// Logarithm of `args[0]` in base `args[1]`.
///
/// Computed as `log10(x) / log10(base)`, so `log(100, 1)` is infinity and `log(0, 0)` is NaN.
pub fn log(args: &[f64]) -> f64 {
    libm_log10(args[0]) / libm_log10(args[1])
}

pub fn log10(args: &[f64]) -> f64 {
    libm_log10(args[0])
}

pub fn log2(args: &[f64]) -> f64 {
    libm_log2(args[0])
}

pub fn ln(args: &[f64]) -> f64 {
    libm_ln(args[0])
}

pub fn ceil(args: &[f64]) -> f64 {
    libm_ceil(args[0])
}

pub fn floor(args: &[f64]) -> f64 {
    libm_floor(args[0])
}

/// Rounds half to even: `round(0.5)` is `0`, `round(1.5)` is `2`.
pub fn round(args: &[f64]) -> f64 {
    libm_rint(args[0])
}

pub fn abs(args: &[f64]) -> f64 {
    libm_fabs(args[0])
}

/// Number of ordered selections of `r` items out of `n`.
///
/// Both arguments are truncated to integers. Returns NaN when either is negative or
/// `r > n`.
pub fn permutation(args: &[f64]) -> f64 {
    match selection_bounds(args[0], args[1]) {
        Some((n, r)) => falling_product(n, r),
        None => f64::NAN,
    }
}

/// Number of unordered selections of `r` items out of `n`.
pub fn combination(args: &[f64]) -> f64 {
    match selection_bounds(args[0], args[1]) {
        Some((n, r)) => binomial(n, r),
        None => f64::NAN,
    }
}

/// Number of multisets of size `r` drawn from `n` kinds: `C(n + r - 1, r)`.
pub fn multichoose(args: &[f64]) -> f64 {
    let n = libm_trunc(args[0]);
    let r = libm_trunc(args[1]);
    if n.is_nan() || r.is_nan() || n < 0.0 || r < 0.0 {
        return f64::NAN;
    }
    combination(&[n + r - 1.0, r])
}

pub fn min(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::INFINITY, f64::min)
}

pub fn max(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn selection_bounds(n: f64, r: f64) -> Option<(f64, f64)> {
    let n = libm_trunc(n);
    let r = libm_trunc(r);
    if n.is_nan() || r.is_nan() || n < 0.0 || r < 0.0 || r > n {
        None
    } else {
        Some((n, r))
    }
}

// n * (n - 1) * ... * (n - r + 1), which is at least r!
fn falling_product(n: f64, r: f64) -> f64 {
    if r > MAX_FINITE_FACTORIAL {
        return f64::INFINITY;
    }
    let mut result: f64 = 1.0;
    let mut i = 0.0;
    while i < r && result.is_finite() {
        result *= n - i;
        i += 1.0;
    }
    result
}

fn binomial(n: f64, r: f64) -> f64 {
    let k = if r > n - r { n - r } else { r };
    let mut result: f64 = 1.0;
    let mut i = 1.0;
    // The running product is C(n - k + i, i) >= 2^i, so it overflows long before the
    // counter could stop advancing.
    while i <= k && result.is_finite() {
        result = result * (n - k + i) / i;
        i += 1.0;
    }
    libm_rint(result)
}
