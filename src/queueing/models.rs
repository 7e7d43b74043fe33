//! Closed-form metric sets for each queueing model.  Every function checks
//! its rates and sizes before computing, so the functions are safe to call
//! directly.
//!
//! State weights such as `aⁿ/n!` are carried as natural logs and shifted by
//! their maximum before exponentiating, so heavy loads give finite
//! probabilities instead of `inf/inf`.

use super::{Metric, QueueModel, QueueingResult, MAX_CAPACITY, MAX_SERVERS};
use crate::utils::check_limit;
use crate::utils::errors::ValidationError;

fn check_rates(lambda: f64, mu: f64) -> Result<(), ValidationError> {
    if lambda.is_finite() && mu.is_finite() && lambda > 0.0 && mu > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveRate { lambda, mu })
    }
}

fn check_stable(model: QueueModel, rho: f64) -> Result<(), ValidationError> {
    if rho < 1.0 {
        Ok(())
    } else {
        Err(ValidationError::Unstable {
            model: model.to_string(),
            rho,
        })
    }
}

/// Time metrics of a capacity-limited queue are zero when nothing is ever
/// admitted.
fn per_admitted(total: f64, lambda_eff: f64) -> f64 {
    if lambda_eff > 0.0 {
        total / lambda_eff
    } else {
        0.0
    }
}

/// Logs of the Erlang terms `aⁿ/n!` for `n` in `0..=last`, each built from
/// the previous one.
fn log_erlang_terms(a: f64, last: usize) -> Vec<f64> {
    let ln_a = a.ln();
    let mut terms = Vec::with_capacity(last + 1);
    let mut current = 0.0;
    terms.push(current);
    for n in 1..=last {
        current += ln_a - (n as f64).ln();
        terms.push(current);
    }
    terms
}

fn max_log(log_weights: &[f64]) -> f64 {
    log_weights
        .iter()
        .fold(f64::NEG_INFINITY, |max, weight| max.max(*weight))
}

/// Normalize log weights into state probabilities.
fn probabilities_from_logs(log_weights: &[f64]) -> Vec<f64> {
    let shift = max_log(log_weights);
    let weights: Vec<f64> = log_weights
        .iter()
        .map(|weight| (weight - shift).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.iter().map(|weight| weight / total).collect()
}

/// Mean number in the system and mean number waiting, given the state
/// probabilities and the server count.
fn occupancy(probabilities: &[f64], servers: usize) -> (f64, f64) {
    probabilities
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(l, lq), (n, pn)| {
            (l + n as f64 * pn, lq + n.saturating_sub(servers) as f64 * pn)
        })
}

/// M/M/1 - requires `ρ = λ/μ < 1`.
pub fn mm1(lambda: f64, mu: f64) -> Result<QueueingResult, ValidationError> {
    check_rates(lambda, mu)?;
    let rho = lambda / mu;
    check_stable(QueueModel::MM1, rho)?;
    let l = rho / (1.0 - rho);
    let lq = rho.powi(2) / (1.0 - rho);
    Ok(QueueingResult::new(
        QueueModel::MM1,
        vec![
            (Metric::Rho, rho),
            (Metric::P0, 1.0 - rho),
            (Metric::L, l),
            (Metric::Lq, lq),
            (Metric::W, l / lambda),
            (Metric::Wq, lq / lambda),
        ],
    ))
}

/// M/M/c - requires `ρ = λ/(cμ) < 1`.  `L` is reported as `Lq + a/c`.
pub fn mmc(lambda: f64, mu: f64, servers: usize) -> Result<QueueingResult, ValidationError> {
    check_rates(lambda, mu)?;
    check_limit("servers", servers, MAX_SERVERS)?;
    let c = servers.max(1);
    let a = lambda / mu;
    let rho = a / c as f64;
    check_stable(QueueModel::MMc, rho)?;
    let terms = log_erlang_terms(a, c);
    // a^c/(c!(1 - rho)) covers every state from c upward
    let busy_log = terms[c] - (1.0 - rho).ln();
    let shift = max_log(&terms[..c]).max(busy_log);
    let idle: f64 = terms[..c].iter().map(|term| (term - shift).exp()).sum();
    let busy = (busy_log - shift).exp();
    let p0 = (-shift).exp() / (idle + busy);
    // Probability that an arrival waits
    let erlang_c = busy / (idle + busy);
    let lq = erlang_c * rho / (1.0 - rho);
    let l = lq + a / c as f64;
    let wq = lq / lambda;
    Ok(QueueingResult::new(
        QueueModel::MMc,
        vec![
            (Metric::Rho, rho),
            (Metric::P0, p0),
            (Metric::L, l),
            (Metric::Lq, lq),
            (Metric::W, wq + 1.0 / mu),
            (Metric::Wq, wq),
        ],
    ))
}

/// M/M/1/K - always stable, `capacity` counts the customer in service.
pub fn mm1k(lambda: f64, mu: f64, capacity: usize) -> Result<QueueingResult, ValidationError> {
    check_rates(lambda, mu)?;
    check_limit("capacity", capacity, MAX_CAPACITY)?;
    let rho = lambda / mu;
    // Pn is proportional to rho^n
    let log_weights: Vec<f64> = (0..=capacity).map(|n| n as f64 * rho.ln()).collect();
    let probabilities = probabilities_from_logs(&log_weights);
    let p0 = probabilities[0];
    let (l, lq) = occupancy(&probabilities, 1);
    let lambda_eff = lambda * (1.0 - probabilities[capacity]);
    Ok(QueueingResult::new(
        QueueModel::MM1K,
        vec![
            (Metric::Rho, rho),
            (Metric::P0, p0),
            (Metric::L, l),
            (Metric::Lq, lq),
            (Metric::W, per_admitted(l, lambda_eff)),
            (Metric::Wq, per_admitted(lq, lambda_eff)),
            (Metric::LambdaEff, lambda_eff),
        ],
    ))
}

/// Logs of the unnormalized M/M/c/K state weights for `n` in `0..=capacity`,
/// Erlang terms up to `c` and a geometric tail with ratio `a/c` beyond.
fn mmck_log_weights(a: f64, c: usize, capacity: usize) -> Vec<f64> {
    let mut weights = log_erlang_terms(a, c.min(capacity));
    let tail_step = a.ln() - (c as f64).ln();
    let mut current = weights[weights.len() - 1];
    for _ in c..capacity {
        current += tail_step;
        weights.push(current);
    }
    weights
}

/// M/M/c/K - always stable.  When `capacity < servers` only the reachable
/// states `0..=capacity` carry probability.
pub fn mmck(
    lambda: f64,
    mu: f64,
    servers: usize,
    capacity: usize,
) -> Result<QueueingResult, ValidationError> {
    check_rates(lambda, mu)?;
    check_limit("servers", servers, MAX_SERVERS)?;
    check_limit("capacity", capacity, MAX_CAPACITY)?;
    let c = servers.max(1);
    let a = lambda / mu;
    let probabilities = probabilities_from_logs(&mmck_log_weights(a, c, capacity));
    let p0 = probabilities[0];
    let (l, lq) = occupancy(&probabilities, c);
    let lambda_eff = lambda * (1.0 - probabilities[capacity]);
    Ok(QueueingResult::new(
        QueueModel::MMcK,
        vec![
            (Metric::Rho, lambda / (c as f64 * mu)),
            (Metric::P0, p0),
            (Metric::L, l),
            (Metric::Lq, lq),
            (Metric::W, per_admitted(l, lambda_eff)),
            (Metric::Wq, per_admitted(lq, lambda_eff)),
            (Metric::LambdaEff, lambda_eff),
        ],
    ))
}
