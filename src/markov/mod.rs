//! The Markov module analyzes discrete-time Markov chains, given a
//! transition matrix `P` and an initial distribution `v0`.  Two results are
//! produced from one validated input:
//!
//! * The trajectory, `v0, v0·P, v0·P², ...`, one distribution per step.
//! * The steady state, approximated by power iteration until successive
//! iterates agree, or until the iteration cap is reached.
//!
//! Each step is renormalized, so floating point drift cannot accumulate
//! over long trajectories.  Rows of `P` that do not sum to one are reported
//! as warnings rather than rejected.
//!
//! `run_markov` and `MarkovRequest` are used for Rust-based projects, while
//! `WebMarkovRun` provides an interface with better JS/WASM compatibility.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::input_parsing::{parse_matrix, parse_vector, Matrix, DEFAULT_STEPS};
use crate::utils::errors::{AnalysisError, ValidationError};
use crate::utils::{bounded_count, check_limit, max_abs_difference, normalize, round_to};

pub mod web;

pub use self::web::MarkovRun as WebMarkovRun;

/// Upper bound on power iterations for the steady state.
pub const MAX_ITERATIONS: usize = 1000;

/// Successive steady state iterates closer than this are converged.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// Row sums further than this from one produce a `RowSumWarning`.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Upper bound on the number of trajectory steps in one request.
pub const MAX_STEPS: usize = 10_000;

/// Decimal places kept in the reported steady state.
pub const STEADY_STATE_DECIMALS: i32 = 10;

/// A probability distribution over the chain's states - non-negative
/// entries summing to one.  Distributions are only created through
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(Vec<f64>);

impl Distribution {
    /// Normalize arbitrary weights into a distribution.  All-zero weights
    /// become the uniform distribution.
    pub fn from_weights(weights: &[f64]) -> Result<Self, AnalysisError> {
        Ok(Self(normalize(weights)?))
    }

    /// Advance one step through the chain, `normalize(self·P)`.
    pub fn step(&self, matrix: &Matrix) -> Result<Self, AnalysisError> {
        Self::from_weights(&matrix.left_multiply(&self.0))
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl From<Distribution> for Vec<f64> {
    fn from(distribution: Distribution) -> Self {
        distribution.0
    }
}

/// A transition matrix row whose probabilities do not sum to one.  `row`
/// is zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSumWarning {
    pub row: usize,
    pub sum: f64,
}

/// The power iteration estimate of the stationary distribution.  When
/// `converged` is false the estimate is simply the last iterate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SteadyState {
    distribution: Distribution,
    iterations: usize,
    converged: bool,
}

impl SteadyState {
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Everything computed for one Markov chain request.  A fresh result is
/// produced per call, and nothing is retained between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkovResult {
    trajectory: Vec<Distribution>,
    steady_state: SteadyState,
    warnings: Vec<RowSumWarning>,
}

impl MarkovResult {
    /// The distribution at each step, starting with the normalized initial
    /// distribution at step 0.
    pub fn trajectory(&self) -> &[Distribution] {
        &self.trajectory
    }

    pub fn steady_state(&self) -> &SteadyState {
        &self.steady_state
    }

    pub fn warnings(&self) -> &[RowSumWarning] {
        &self.warnings
    }

    /// The number of states in the chain.
    pub fn state_count(&self) -> usize {
        self.steady_state.distribution.len()
    }
}

/// A serializable Markov chain request, in the same text forms a user
/// types into the tool.  Steps default to `DEFAULT_STEPS`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkovRequest {
    pub matrix: String,
    pub vector: String,
    #[serde(default)]
    pub steps: Option<i64>,
}

impl MarkovRequest {
    pub fn run(&self) -> Result<MarkovResult, AnalysisError> {
        run_markov(&self.matrix, &self.vector, self.steps)
    }
}

/// Resolve a requested step count.  Absent or negative counts fall back to
/// `DEFAULT_STEPS`, and counts above `MAX_STEPS` are rejected.
pub fn resolve_steps(steps: Option<i64>) -> Result<usize, ValidationError> {
    match steps {
        Some(steps) if steps >= 0 => bounded_count("steps", steps, MAX_STEPS),
        _ => Ok(DEFAULT_STEPS),
    }
}

/// Parse, validate, and analyze a Markov chain given as user text.
pub fn run_markov(
    matrix_text: &str,
    vector_text: &str,
    steps: Option<i64>,
) -> Result<MarkovResult, AnalysisError> {
    let matrix = parse_matrix(matrix_text)?;
    let initial = parse_vector(vector_text)?;
    evolve(&matrix, &initial, resolve_steps(steps)?)
}

/// Check that the matrix is square, and that the initial vector has one
/// entry per state.
pub fn validate(matrix: &Matrix, initial: &[f64]) -> Result<(), ValidationError> {
    if !matrix.is_square() {
        return Err(ValidationError::NotSquare {
            rows: matrix.row_count(),
            columns: matrix.column_count(),
        });
    }
    if initial.len() != matrix.row_count() {
        return Err(ValidationError::DimensionMismatch {
            vector: initial.len(),
            matrix: matrix.row_count(),
        });
    }
    Ok(())
}

/// Report every row whose sum is further than `ROW_SUM_TOLERANCE` from one.
pub fn row_sum_warnings(matrix: &Matrix) -> Vec<RowSumWarning> {
    matrix
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(row, entries)| {
            let sum: f64 = entries.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                Some(RowSumWarning { row, sum })
            } else {
                None
            }
        })
        .collect()
}

/// Compute the trajectory over `steps` steps and the steady state, after
/// validating the input.  The returned trajectory has `steps + 1` entries.
pub fn evolve(
    matrix: &Matrix,
    initial: &[f64],
    steps: usize,
) -> Result<MarkovResult, AnalysisError> {
    validate(matrix, initial)?;
    check_limit("steps", steps, MAX_STEPS)?;
    debug!(
        "Evolving a {}-state chain over {} steps",
        matrix.row_count(),
        steps
    );
    let warnings = row_sum_warnings(matrix);
    for warning in &warnings {
        warn!(
            "Transition matrix row {} sums to {}, not 1",
            warning.row + 1,
            warning.sum
        );
    }
    let start = Distribution::from_weights(initial)?;
    Ok(MarkovResult {
        trajectory: walk(matrix, &start, steps)?,
        steady_state: power_iteration(matrix, &start)?,
        warnings,
    })
}

/// The distributions at steps `0..=steps`, after validating the input.
pub fn trajectory(
    matrix: &Matrix,
    initial: &[f64],
    steps: usize,
) -> Result<Vec<Distribution>, AnalysisError> {
    validate(matrix, initial)?;
    check_limit("steps", steps, MAX_STEPS)?;
    walk(matrix, &Distribution::from_weights(initial)?, steps)
}

/// The steady state estimate, after validating the input.
pub fn steady_state(matrix: &Matrix, initial: &[f64]) -> Result<SteadyState, AnalysisError> {
    validate(matrix, initial)?;
    power_iteration(matrix, &Distribution::from_weights(initial)?)
}

/// Callers bound `steps` by `MAX_STEPS`.
fn walk(
    matrix: &Matrix,
    start: &Distribution,
    steps: usize,
) -> Result<Vec<Distribution>, AnalysisError> {
    let mut sequence = Vec::with_capacity(steps + 1);
    let mut current = start.clone();
    for _ in 0..=steps {
        let next = current.step(matrix)?;
        sequence.push(current);
        current = next;
    }
    Ok(sequence)
}

fn power_iteration(matrix: &Matrix, start: &Distribution) -> Result<SteadyState, AnalysisError> {
    let mut estimate = start.clone();
    let mut previous: Option<Distribution> = None;
    let mut iterations = 0;
    let mut converged = false;
    while iterations < MAX_ITERATIONS {
        estimate = estimate.step(matrix)?;
        iterations += 1;
        if let Some(previous) = &previous {
            if max_abs_difference(estimate.probabilities(), previous.probabilities())
                < CONVERGENCE_TOLERANCE
            {
                converged = true;
                break;
            }
        }
        previous = Some(estimate.clone());
    }
    if converged {
        debug!("Steady state converged after {} iterations", iterations);
    } else {
        debug!(
            "Steady state did not converge within {} iterations",
            MAX_ITERATIONS
        );
    }
    let rounded: Vec<f64> = estimate
        .probabilities()
        .iter()
        .map(|probability| round_to(*probability, STEADY_STATE_DECIMALS))
        .collect();
    Ok(SteadyState {
        distribution: Distribution(rounded),
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state() -> Matrix {
        Matrix::new(vec![vec![0.9, 0.1], vec![0.5, 0.5]]).unwrap()
    }

    #[test]
    fn walk_records_the_starting_distribution() {
        let start = Distribution::from_weights(&[2.0, 2.0]).unwrap();
        let sequence = walk(&two_state(), &start, 1).unwrap();
        assert_eq![2, sequence.len()];
        assert_eq![&[0.5, 0.5], sequence[0].probabilities()];
        assert![(sequence[1].probabilities()[0] - 0.7).abs() < 1e-12];
    }

    #[test]
    fn zero_steps_returns_only_the_start() {
        let sequence = trajectory(&two_state(), &[1.0, 0.0], 0).unwrap();
        assert_eq![1, sequence.len()];
    }

    #[test]
    fn two_state_steady_state() {
        // pi = (5/6, 1/6) solves pi·P = pi
        let steady = steady_state(&two_state(), &[1.0, 0.0]).unwrap();
        assert![steady.converged()];
        assert![(steady.distribution().probabilities()[0] - 5.0 / 6.0).abs() < 1e-9];
        assert![(steady.distribution().probabilities()[1] - 1.0 / 6.0).abs() < 1e-9];
    }

    #[test]
    fn stationary_start_converges_on_second_iteration() {
        let matrix = Matrix::new(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        let steady = steady_state(&matrix, &[0.3, 0.7]).unwrap();
        assert![steady.converged()];
        assert_eq![2, steady.iterations()];
    }

    #[test]
    fn row_sum_warnings_flag_deviating_rows() {
        let matrix = Matrix::new(vec![vec![0.5, 0.5], vec![0.5, 0.4]]).unwrap();
        let warnings = row_sum_warnings(&matrix);
        assert_eq![1, warnings.len()];
        assert_eq![1, warnings[0].row];
        assert![(warnings[0].sum - 0.9).abs() < 1e-12];
    }

    #[test]
    fn verify_resolve_steps() {
        assert_eq![Ok(DEFAULT_STEPS), resolve_steps(None)];
        assert_eq![Ok(DEFAULT_STEPS), resolve_steps(Some(-1))];
        assert_eq![Ok(0), resolve_steps(Some(0))];
        assert_eq![Ok(42), resolve_steps(Some(42))];
        assert_eq![Ok(MAX_STEPS), resolve_steps(Some(MAX_STEPS as i64))];
        assert![resolve_steps(Some(MAX_STEPS as i64 + 1)).is_err()];
        assert![resolve_steps(Some(i64::MAX)).is_err()];
    }

    #[test]
    fn oversized_step_counts_are_rejected_before_walking() {
        let err = trajectory(&two_state(), &[1.0, 0.0], usize::MAX).unwrap_err();
        assert![matches![
            err,
            AnalysisError::Validation(ValidationError::LimitExceeded { .. })
        ]];
        assert![evolve(&two_state(), &[1.0, 0.0], MAX_STEPS + 1).is_err()];
    }
}
