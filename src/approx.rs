//! Approximate floating point equality
//!
//! Shared comparison used as the solver's convergence test and for checking
//! computed values against reference figures. Switches between an absolute
//! test near zero and a relative-error test everywhere else.

/// Default tolerance for general comparisons.
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// Tolerance used by the velocity solver's convergence test.
pub const SOLVER_EPSILON: f64 = 1e-6;

/// Smallest positive normal `f64` (2^-1022).
pub const MIN_NORMAL: f64 = f64::MIN_POSITIVE;

/// Returns true when `a` and `b` are equal within `epsilon`.
///
/// Exact equality always matches. When either operand is zero, or the two
/// are closer together than [`MIN_NORMAL`], relative error is meaningless
/// and the absolute difference is compared against `epsilon` instead.
/// Otherwise `|a - b| / (|a| + |b|)` must be below `epsilon`.
pub fn approx_equal(a: f64, b: f64, epsilon: f64) -> bool {
    if a == b {
        return true;
    }

    let diff = (a - b).abs();
    if a == 0.0 || b == 0.0 || diff < MIN_NORMAL {
        return diff < epsilon;
    }

    diff / (a.abs() + b.abs()) < epsilon
}

/// [`approx_equal`] with [`DEFAULT_EPSILON`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    approx_equal(a, b, DEFAULT_EPSILON)
}
