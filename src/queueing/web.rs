use wasm_bindgen::prelude::*;

use crate::output_analysis::MetricsChart;
use crate::utils::errors::AnalysisError;
use crate::utils::set_panic_hook;

use super::{compute_metrics, QueueingInput, QueueingResult};

/// The web `QueueingRun` provides a JS/WASM-compatible interface to
/// `run_queueing` and `compute_metrics`.  For additional insight on these
/// methods, refer to the associated core functions.  Analysis errors are
/// kept, rather than thrown, and surface through `error_message` and
/// `get_report`.
#[wasm_bindgen]
pub struct QueueingRun {
    outcome: Result<QueueingResult, AnalysisError>,
}

#[wasm_bindgen]
impl QueueingRun {
    /// A JS/WASM interface for `run_queueing`.  Missing `servers` or
    /// `capacity` values take the usual defaults.
    pub fn post(
        model: &str,
        lambda: f64,
        mu: f64,
        servers: Option<i32>,
        capacity: Option<i32>,
    ) -> Self {
        set_panic_hook();
        Self {
            outcome: super::run_queueing(
                model,
                lambda,
                mu,
                servers.map(i64::from),
                capacity.map(i64::from),
            ),
        }
    }

    /// A JS/WASM interface for `compute_metrics`, which uses a JSON
    /// representation of the `QueueingInput`.
    pub fn post_json(input: &str) -> Self {
        set_panic_hook();
        Self {
            outcome: serde_json::from_str::<QueueingInput>(input)
                .map_err(AnalysisError::from)
                .and_then(|input| compute_metrics(&input)),
        }
    }

    /// A JS/WASM interface for `compute_metrics`, which uses a YAML
    /// representation of the `QueueingInput`.
    pub fn post_yaml(input: &str) -> Self {
        set_panic_hook();
        Self {
            outcome: serde_yaml::from_str::<QueueingInput>(input)
                .map_err(AnalysisError::from)
                .and_then(|input| compute_metrics(&input)),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error_message(&self) -> Option<String> {
        self.outcome.as_ref().err().map(|err| err.to_string())
    }

    /// The pretty JSON metrics report, or the error message prefixed with
    /// `Error: `.
    pub fn get_report(&self) -> String {
        match self
            .outcome
            .as_ref()
            .map_err(|err| err.to_string())
            .and_then(|result| result.to_json_pretty().map_err(|err| err.to_string()))
        {
            Ok(report) => report,
            Err(message) => format!("Error: {}", message),
        }
    }

    /// Get a JSON representation of the `QueueingResult`.
    pub fn get_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.result()?).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Get a YAML representation of the `QueueingResult`.
    pub fn get_yaml(&self) -> Result<String, JsValue> {
        serde_yaml::to_string(self.result()?).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Get a JSON representation of the bar chart data.
    pub fn get_chart_json(&self) -> Result<String, JsValue> {
        let chart = MetricsChart::from(self.result()?);
        serde_json::to_string(&chart).map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

impl QueueingRun {
    fn result(&self) -> Result<&QueueingResult, JsValue> {
        self.outcome
            .as_ref()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }
}
