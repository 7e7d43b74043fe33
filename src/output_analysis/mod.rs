//! The output analysis module shapes computed results for presentation.
//! Nothing here draws anything - the chart structs are plain label/value
//! data for an external renderer (a line chart for Markov trajectories, a
//! bar chart for queueing metrics), and the `Display` implementations
//! produce the text reports shown next to those charts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::markov::{MarkovResult, SteadyState};
use crate::queueing::{Metric, QueueingResult};
use crate::utils::round_to;

/// Metrics plotted as bars, in display order.  `P0` is reported in text
/// only.
const CHARTED_METRICS: [Metric; 6] = [
    Metric::Rho,
    Metric::L,
    Metric::Lq,
    Metric::W,
    Metric::Wq,
    Metric::LambdaEff,
];

const BAR_DECIMALS: i32 = 4;

/// One line of a line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

/// Line chart data for a Markov trajectory - x-axis labels `Step 0..`, and
/// one series per state, `State 1..`, holding that state's probability at
/// every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryChart {
    labels: Vec<String>,
    series: Vec<Series>,
}

impl TrajectoryChart {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }
}

impl From<&MarkovResult> for TrajectoryChart {
    fn from(result: &MarkovResult) -> Self {
        let trajectory = result.trajectory();
        let labels = (0..trajectory.len())
            .map(|step| format!("Step {}", step))
            .collect();
        let series = (0..result.state_count())
            .map(|state| Series {
                label: format!("State {}", state + 1),
                values: trajectory
                    .iter()
                    .map(|distribution| distribution.probabilities()[state])
                    .collect(),
            })
            .collect();
        Self { labels, series }
    }
}

/// Bar chart data for queueing metrics, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsChart {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl MetricsChart {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl From<&QueueingResult> for MetricsChart {
    fn from(result: &QueueingResult) -> Self {
        let (labels, values) = CHARTED_METRICS
            .iter()
            .filter_map(|metric| {
                result
                    .get(*metric)
                    .map(|value| (metric.symbol().to_string(), round_to(value, BAR_DECIMALS)))
            })
            .unzip();
        Self { labels, values }
    }
}

fn write_probabilities(
    f: &mut fmt::Formatter<'_>,
    probabilities: &[f64],
    precision: Option<usize>,
) -> fmt::Result {
    write!(f, "[")?;
    for (index, probability) in probabilities.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        match precision {
            Some(precision) => write!(f, "{:.*}", precision, probability)?,
            None => write!(f, "{}", probability)?,
        }
    }
    write!(f, "]")
}

impl fmt::Display for SteadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "≈ ")?;
        write_probabilities(f, self.distribution().probabilities(), None)
    }
}

/// One `Step i: [...]` line per step, six decimals, followed by the first
/// row-sum warning if any row of `P` does not sum to one.
impl fmt::Display for MarkovResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (step, distribution) in self.trajectory().iter().enumerate() {
            if step > 0 {
                writeln!(f)?;
            }
            write!(f, "Step {}: ", step)?;
            write_probabilities(f, distribution.probabilities(), Some(6))?;
        }
        if let Some(warning) = self.warnings().first() {
            write!(
                f,
                "\n\nWarning: some rows of P do not sum to 1. E.g.: row {} sums to {:.6}",
                warning.row + 1,
                warning.sum
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queueing::models::{mm1, mm1k};

    #[test]
    fn metrics_chart_skips_p0_and_absent_metrics() {
        let chart = MetricsChart::from(&mm1(2.0, 5.0).unwrap());
        assert_eq![vec!["ρ", "L", "Lq", "W", "Wq"], chart.labels().to_vec()];
        assert_eq![vec![0.4, 0.6667, 0.2667, 0.3333, 0.1333], chart.values().to_vec()];
    }

    #[test]
    fn metrics_chart_includes_effective_arrival_rate() {
        let chart = MetricsChart::from(&mm1k(3.0, 3.0, 4).unwrap());
        assert_eq![Some(&String::from("λ_eff")), chart.labels().last()];
        assert_eq![Some(&2.4), chart.values().last()];
    }
}
