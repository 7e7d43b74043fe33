use stochastic_lab::markov::{MarkovResult, WebMarkovRun};
use stochastic_lab::output_analysis::{MetricsChart, TrajectoryChart};
use stochastic_lab::queueing::{Metric, QueueingResult, WebQueueingRun};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

#[test]
#[wasm_bindgen_test]
fn markov_run_reports_trajectory_and_steady_state() {
    let run = WebMarkovRun::post("[[0.75, 0.25], [0.2, 0.8]]", "1, 0", Some(5));
    assert![run.is_ok()];
    assert_eq![None, run.error_message()];
    assert_eq![6, run.get_report().lines().count()];
    assert![run.get_steady_state_report().starts_with("≈ [")];

    let steady = run.get_steady_state();
    assert_eq![2, steady.len()];
    // pi = (4/9, 5/9)
    assert![(steady[0] - 4.0 / 9.0).abs() < 1e-9];

    let result: MarkovResult = serde_json::from_str(&run.get_json().unwrap()).unwrap();
    assert_eq![6, result.trajectory().len()];
    let from_yaml: MarkovResult = serde_yaml::from_str(&run.get_yaml().unwrap()).unwrap();
    assert_eq![result.trajectory().len(), from_yaml.trajectory().len()];
}

#[test]
#[wasm_bindgen_test]
fn markov_run_chart_data() {
    let run = WebMarkovRun::post("1/2,1/2;1/3,2/3", "0,1", None);
    let chart: TrajectoryChart = serde_json::from_str(&run.get_chart_json().unwrap()).unwrap();
    assert_eq![11, chart.labels().len()];
    assert_eq!["Step 0", chart.labels()[0]];
    assert_eq![2, chart.series().len()];
    assert_eq!["State 2", chart.series()[1].label];
    assert_eq![1.0, chart.series()[1].values[0]];
}

#[test]
#[wasm_bindgen_test]
fn markov_run_keeps_errors() {
    let run = WebMarkovRun::post("0.5,0.5", "1,0", Some(3));
    assert![!run.is_ok()];
    assert_eq![
        Some(String::from("matrix not square: 1 rows, 2 columns")),
        run.error_message()
    ];
    assert_eq!["Error: matrix not square: 1 rows, 2 columns", run.get_report()];
    assert_eq!["", run.get_steady_state_report()];
    assert![run.get_steady_state().is_empty()];

    let run = WebMarkovRun::post("1", "1", Some(i32::MAX));
    assert_eq![
        Some(String::from(
            "steps = 2147483647 exceeds the supported maximum of 10000"
        )),
        run.error_message()
    ];
}

#[test]
#[wasm_bindgen_test]
fn markov_run_from_request_documents() {
    let run = WebMarkovRun::post_json(r#"{"matrix": "0.9,0.1;0.5,0.5", "vector": "1,0", "steps": 2}"#);
    assert![run.is_ok()];
    assert_eq![3, run.get_report().lines().count()];
    let run = WebMarkovRun::post_yaml("matrix: \"0.9,0.1;0.5,0.5\"\nvector: \"[1, 0]\"\n");
    assert![run.is_ok()];
    let run = WebMarkovRun::post_json("{\"matrix\": 5}");
    assert![!run.is_ok()];
}

#[test]
#[wasm_bindgen_test]
fn queueing_run_reports_metrics() {
    let run = WebQueueingRun::post("M/M/1", 2.0, 5.0, None, None);
    assert![run.is_ok()];
    let result: QueueingResult = serde_json::from_str(&run.get_json().unwrap()).unwrap();
    assert![(result.get(Metric::L).unwrap() - 2.0 / 3.0).abs() < 1e-12];
    let report: serde_json::Value = serde_json::from_str(&run.get_report()).unwrap();
    assert_eq!["M/M/1", report["model"]];

    let chart: MetricsChart = serde_json::from_str(&run.get_chart_json().unwrap()).unwrap();
    assert_eq![vec!["ρ", "L", "Lq", "W", "Wq"], chart.labels().to_vec()];
}

#[test]
#[wasm_bindgen_test]
fn queueing_run_keeps_errors() {
    let run = WebQueueingRun::post("M/M/1", 5.0, 4.0, None, None);
    assert![!run.is_ok()];
    assert![run.get_report().starts_with("Error: system unstable")];

    let run = WebQueueingRun::post("M/M/1", -1.0, 4.0, None, None);
    assert![run
        .error_message()
        .unwrap()
        .starts_with("arrival and service rates must be positive")];
}

#[test]
#[wasm_bindgen_test]
fn queueing_run_from_config_documents() {
    let run = WebQueueingRun::post_yaml("model: M/M/c/K\nlambda: 4.0\nmu: 2.0\nservers: 2\ncapacity: 4\n");
    assert![run.is_ok()];
    let result: QueueingResult = serde_yaml::from_str(&run.get_yaml().unwrap()).unwrap();
    assert![(result.get(Metric::P0).unwrap() - 1.0 / 9.0).abs() < 1e-12];

    let run = WebQueueingRun::post_json(r#"{"model": "MM1K", "lambda": 1.0, "mu": 2.0}"#);
    assert_eq![
        Some(String::from("M/M/1/K requires a finite capacity")),
        run.error_message()
    ];
}
