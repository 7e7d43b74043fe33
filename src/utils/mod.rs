//! The utilities module provides general capabilities that span the input
//! parsing, Markov, queueing, and output analysis modules.  The utilities
//! are centered around common arithmetic on probability vectors and
//! debugging support for WASM builds.

pub mod errors;

use std::convert::TryFrom;

use num_traits::Float;

use errors::{AnalysisError, ValidationError};

/// Integer factorial, as an iterative product over `2..=n`.  Returns 1 for
/// `n <= 1`.  The result is a float, since queueing formulas divide by it
/// and overflow to infinity is preferable to integer wrap-around.
pub fn factorial(n: usize) -> f64 {
    (2..=n).fold(1.0, |acc, factor| acc * factor as f64)
}

/// This function converts a usize to a Float, with an associated
/// `AnalysisError` returned for failed conversions
pub fn usize_to_float<T: Float>(unconv: usize) -> Result<T, AnalysisError> {
    T::from(unconv).ok_or(AnalysisError::FloatConvError)
}

/// Scale a vector so its entries sum to one.  A vector summing to exactly
/// zero has no direction to preserve, so it becomes the uniform distribution
/// over its length instead.
pub fn normalize<T: Float>(vector: &[T]) -> Result<Vec<T>, AnalysisError> {
    let sum = vector.iter().fold(T::zero(), |acc, value| acc + *value);
    if sum == T::zero() {
        let uniform = T::one() / usize_to_float(vector.len())?;
        return Ok(vec![uniform; vector.len()]);
    }
    Ok(vector.iter().map(|value| *value / sum).collect())
}

/// Round half away from zero, to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// The largest component-wise absolute difference between two equal-length
/// vectors.
pub fn max_abs_difference(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0, |max, (x, y)| f64::max(max, (x - y).abs()))
}

/// Convert a raw, non-negative count into a `usize` no larger than `max`.
/// Counts that do not fit the platform's `usize` are rejected the same way
/// as counts above `max`.
pub fn bounded_count(parameter: &str, value: i64, max: usize) -> Result<usize, ValidationError> {
    usize::try_from(value)
        .ok()
        .filter(|count| *count <= max)
        .ok_or_else(|| ValidationError::LimitExceeded {
            parameter: parameter.to_string(),
            value,
            max,
        })
}

/// Reject a count above `max`.
pub fn check_limit(parameter: &str, value: usize, max: usize) -> Result<(), ValidationError> {
    if value <= max {
        Ok(())
    } else {
        Err(ValidationError::LimitExceeded {
            parameter: parameter.to_string(),
            value: i64::try_from(value).unwrap_or(i64::MAX),
            max,
        })
    }
}

/// When the `console_error_panic_hook` feature is enabled, we can call the
/// `set_panic_hook` function at least once during initialization, and then
/// we will get better error messages if our code ever panics.
///
/// For more details see
/// <https://github.com/rustwasm/console_error_panic_hook#readme>
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
