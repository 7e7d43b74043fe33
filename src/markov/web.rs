use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::output_analysis::TrajectoryChart;
use crate::utils::errors::AnalysisError;
use crate::utils::set_panic_hook;

use super::{MarkovRequest, MarkovResult};

/// The web `MarkovRun` provides a JS/WASM-compatible interface to
/// `run_markov`.  Each run owns its result; JavaScript callers release it
/// with the generated `free()` before requesting another one.  Analysis
/// errors are kept, rather than thrown, and surface through `error_message`
/// and `get_report`.
#[wasm_bindgen]
pub struct MarkovRun {
    outcome: Result<MarkovResult, AnalysisError>,
}

#[wasm_bindgen]
impl MarkovRun {
    /// A JS/WASM interface for `run_markov`, using the matrix and vector
    /// text exactly as typed.
    pub fn post(matrix: &str, vector: &str, steps: Option<i32>) -> Self {
        set_panic_hook();
        Self::from_outcome(super::run_markov(matrix, vector, steps.map(i64::from)))
    }

    /// A JS/WASM interface for `MarkovRequest.run`, which uses a JSON
    /// representation of the request.
    pub fn post_json(request: &str) -> Self {
        set_panic_hook();
        Self::from_outcome(
            serde_json::from_str::<MarkovRequest>(request)
                .map_err(AnalysisError::from)
                .and_then(|request| request.run()),
        )
    }

    /// A JS/WASM interface for `MarkovRequest.run`, which uses a YAML
    /// representation of the request.
    pub fn post_yaml(request: &str) -> Self {
        set_panic_hook();
        Self::from_outcome(
            serde_yaml::from_str::<MarkovRequest>(request)
                .map_err(AnalysisError::from)
                .and_then(|request| request.run()),
        )
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error_message(&self) -> Option<String> {
        self.outcome.as_ref().err().map(|err| err.to_string())
    }

    /// The per-step text report, or the error message prefixed with
    /// `Error: `.
    pub fn get_report(&self) -> String {
        match &self.outcome {
            Ok(result) => result.to_string(),
            Err(err) => format!("Error: {}", err),
        }
    }

    /// The steady state text, `≈ [...]`, or an empty string after an error.
    pub fn get_steady_state_report(&self) -> String {
        self.outcome
            .as_ref()
            .map(|result| result.steady_state().to_string())
            .unwrap_or_default()
    }

    /// The steady state probabilities, empty after an error.
    pub fn get_steady_state(&self) -> Vec<f64> {
        self.outcome
            .as_ref()
            .map(|result| result.steady_state().distribution().probabilities().to_vec())
            .unwrap_or_default()
    }

    /// Get a JSON representation of the full `MarkovResult`.
    pub fn get_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.result()?).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Get a YAML representation of the full `MarkovResult`.
    pub fn get_yaml(&self) -> Result<String, JsValue> {
        serde_yaml::to_string(self.result()?).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Get a JSON representation of the line chart data - step labels and
    /// one series per state.
    pub fn get_chart_json(&self) -> Result<String, JsValue> {
        let chart = TrajectoryChart::from(self.result()?);
        serde_json::to_string(&chart).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// A JS/WASM interface for the chart step labels, as a JavaScript Array.
    pub fn get_labels_js(&self) -> Array {
        self.outcome
            .as_ref()
            .map(|result| {
                TrajectoryChart::from(result)
                    .labels()
                    .iter()
                    .map(|label| JsValue::from_str(label))
                    .collect::<Array>()
            })
            .unwrap_or_else(|_| Array::new())
    }
}

impl MarkovRun {
    fn from_outcome(outcome: Result<MarkovResult, AnalysisError>) -> Self {
        if let Ok(result) = &outcome {
            for warning in result.warnings() {
                console_warn(&format!(
                    "Row {} of P sums to {:.6}, not 1",
                    warning.row + 1,
                    warning.sum
                ));
            }
        }
        Self { outcome }
    }

    fn result(&self) -> Result<&MarkovResult, JsValue> {
        self.outcome
            .as_ref()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn console_warn(message: &str) {
    log::warn!("{}", message);
}
