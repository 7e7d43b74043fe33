//! # Overview
//! "Stochastic-lab" provides the numeric engine behind a stochastic
//! processes teaching tool, to facilitate Rust- and npm-based course
//! material and exercises.
//!
//! This repository contains:
//!
//! * Input parsing, for turning typed matrices and vectors (including
//! inline fractions like `1/3`) into numbers.
//! * Markov chain analysis, for trajectories and power-iteration steady
//! states of discrete-time chains.
//! * Queueing analysis, for the closed-form metrics of the M/M/1, M/M/c,
//! M/M/1/K, and M/M/c/K models.
//! * Output analysis, for chart-ready series and text reports built from
//! the results.
//!
//! Stochastic-lab is compatible with a wide variety of compilation targets,
//! including WASM. Rendering is left entirely to the caller.
pub mod input_parsing;
pub mod markov;
pub mod output_analysis;
pub mod queueing;
pub mod utils;

pub use input_parsing::{parse_matrix, parse_vector, Matrix};
pub use markov::{run_markov, MarkovResult};
pub use queueing::{run_queueing, QueueModel, QueueingInput, QueueingResult};
pub use utils::errors::{AnalysisError, ParseError, ValidationError};
