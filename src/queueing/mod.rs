//! The queueing module computes steady state performance metrics for the
//! four classic Markovian queues - M/M/1, M/M/c, M/M/1/K, and M/M/c/K.  All
//! metrics are closed-form (or finite-sum) results; there is no simulation
//! involved, so every call is deterministic.
//!
//! Model names are normalized once, at the boundary, into the closed
//! `QueueModel` enum.  The metrics returned depend on the model, for
//! example only capacity-limited models report an effective arrival rate.
//!
//! `run_queueing` and `compute_metrics` are used for Rust-based projects,
//! while `WebQueueingRun` provides an interface with better JS/WASM
//! compatibility.

use std::collections::{BTreeMap, HashMap};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::utils::bounded_count;
use crate::utils::errors::{AnalysisError, ValidationError};

pub mod models;
pub mod web;

pub use self::web::QueueingRun as WebQueueingRun;

/// Upper bound on the server count `c`.
pub const MAX_SERVERS: usize = 100_000;

/// Upper bound on a finite system capacity `K`.
pub const MAX_CAPACITY: usize = 100_000;

lazy_static! {
    static ref SYNONYMS: HashMap<&'static str, QueueModel> = {
        let mut m = HashMap::new();
        m.insert("MM1", QueueModel::MM1);
        m.insert("M/M/1", QueueModel::MM1);
        m.insert("MMC", QueueModel::MMc);
        m.insert("M/M/C", QueueModel::MMc);
        m.insert("MM1K", QueueModel::MM1K);
        m.insert("M/M/1/K", QueueModel::MM1K);
        m.insert("M/M/1K", QueueModel::MM1K);
        m.insert("MMCK", QueueModel::MMcK);
        m.insert("M/M/C/K", QueueModel::MMcK);
        m.insert("M/M/CK", QueueModel::MMcK);
        m
    };
}

/// The supported queueing models, in Kendall notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QueueModel {
    /// Single server, infinite capacity
    MM1,
    /// `c` servers, infinite capacity
    MMc,
    /// Single server, at most `K` customers in the system
    MM1K,
    /// `c` servers, at most `K` customers in the system
    MMcK,
}

impl QueueModel {
    pub fn name(&self) -> &'static str {
        match self {
            QueueModel::MM1 => "M/M/1",
            QueueModel::MMc => "M/M/c",
            QueueModel::MM1K => "M/M/1/K",
            QueueModel::MMcK => "M/M/c/K",
        }
    }

    pub fn is_capacity_limited(&self) -> bool {
        matches!(self, QueueModel::MM1K | QueueModel::MMcK)
    }
}

impl fmt::Display for QueueModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueueModel {
    type Err = ValidationError;

    /// Accepts the compact (`MM1`) and Kendall (`M/M/1`) spellings, ignoring
    /// case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SYNONYMS
            .get(s.trim().to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| ValidationError::UnsupportedModel(s.to_string()))
    }
}

impl TryFrom<String> for QueueModel {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QueueModel> for String {
    fn from(model: QueueModel) -> Self {
        model.name().to_string()
    }
}

/// System capacity `K`, counting customers in service and in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Finite(usize),
    Unbounded,
}

impl Capacity {
    /// Interpret a raw capacity value, where absent or non-positive values
    /// mean there is no limit.  Limits above `MAX_CAPACITY` are rejected.
    pub fn from_raw(capacity: Option<i64>) -> Result<Self, ValidationError> {
        match capacity {
            Some(limit) if limit > 0 => {
                bounded_count("capacity", limit, MAX_CAPACITY).map(Capacity::Finite)
            }
            _ => Ok(Capacity::Unbounded),
        }
    }
}

/// The performance metrics a queueing model may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Utilization, `λ/(cμ)`
    #[serde(rename = "rho")]
    Rho,
    /// Probability of an empty system
    #[serde(rename = "P0")]
    P0,
    /// Mean number in the system
    #[serde(rename = "L")]
    L,
    /// Mean number waiting in the queue
    #[serde(rename = "Lq")]
    Lq,
    /// Mean time in the system
    #[serde(rename = "W")]
    W,
    /// Mean time waiting in the queue
    #[serde(rename = "Wq")]
    Wq,
    /// Effective arrival rate, after arrivals turned away by a full system
    #[serde(rename = "lambda_eff")]
    LambdaEff,
}

impl Metric {
    pub fn symbol(&self) -> &'static str {
        match self {
            Metric::Rho => "ρ",
            Metric::P0 => "P0",
            Metric::L => "L",
            Metric::Lq => "Lq",
            Metric::W => "W",
            Metric::Wq => "Wq",
            Metric::LambdaEff => "λ_eff",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A queueing request.  `servers` defaults to 1 and `capacity` to
/// unbounded; values below 1 are treated the same as absent values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueingInput {
    pub model: QueueModel,
    /// Arrival rate, λ
    pub lambda: f64,
    /// Service rate per server, μ
    pub mu: f64,
    #[serde(default = "default_servers")]
    pub servers: i64,
    #[serde(default)]
    pub capacity: Option<i64>,
}

fn default_servers() -> i64 {
    1
}

impl QueueingInput {
    pub fn new(model: QueueModel, lambda: f64, mu: f64) -> Self {
        Self {
            model,
            lambda,
            mu,
            servers: default_servers(),
            capacity: None,
        }
    }

    pub fn with_servers(mut self, servers: i64) -> Self {
        self.servers = servers;
        self
    }

    pub fn with_capacity(mut self, capacity: i64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// The effective number of servers, at least 1 and at most
    /// `MAX_SERVERS`.
    pub fn server_count(&self) -> Result<usize, ValidationError> {
        if self.servers >= 1 {
            bounded_count("servers", self.servers, MAX_SERVERS)
        } else {
            Ok(1)
        }
    }

    pub fn capacity_limit(&self) -> Result<Capacity, ValidationError> {
        Capacity::from_raw(self.capacity)
    }
}

/// The metrics computed for one queueing request, keyed by metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueingResult {
    model: QueueModel,
    metrics: BTreeMap<Metric, f64>,
}

impl QueueingResult {
    pub fn new(model: QueueModel, metrics: Vec<(Metric, f64)>) -> Self {
        Self {
            model,
            metrics: metrics.into_iter().collect(),
        }
    }

    pub fn model(&self) -> QueueModel {
        self.model
    }

    pub fn metrics(&self) -> &BTreeMap<Metric, f64> {
        &self.metrics
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    /// Pretty JSON, as shown in the tool's result box.
    pub fn to_json_pretty(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compute the metrics for a validated model choice.
pub fn compute_metrics(input: &QueueingInput) -> Result<QueueingResult, AnalysisError> {
    debug!(
        "Computing {} metrics for lambda = {}, mu = {}",
        input.model, input.lambda, input.mu
    );
    let result = match input.model {
        QueueModel::MM1 => models::mm1(input.lambda, input.mu)?,
        QueueModel::MMc => models::mmc(input.lambda, input.mu, input.server_count()?)?,
        QueueModel::MM1K => models::mm1k(input.lambda, input.mu, finite_capacity(input)?)?,
        QueueModel::MMcK => models::mmck(
            input.lambda,
            input.mu,
            input.server_count()?,
            finite_capacity(input)?,
        )?,
    };
    Ok(result)
}

/// Normalize a model name and raw numeric parameters, then compute the
/// metrics.
pub fn run_queueing(
    model: &str,
    lambda: f64,
    mu: f64,
    servers: Option<i64>,
    capacity: Option<i64>,
) -> Result<QueueingResult, AnalysisError> {
    let input = QueueingInput {
        model: model.parse()?,
        lambda,
        mu,
        servers: servers.unwrap_or_else(default_servers),
        capacity,
    };
    compute_metrics(&input)
}

fn finite_capacity(input: &QueueingInput) -> Result<usize, ValidationError> {
    match input.capacity_limit()? {
        Capacity::Finite(limit) => Ok(limit),
        Capacity::Unbounded => Err(ValidationError::CapacityRequired {
            model: input.model.to_string(),
        }),
    }
}
