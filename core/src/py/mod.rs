use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::analyzer::{analyze_form_json, detect_reps_json};
use crate::telemetry::gather_text;

fn to_py_err(e: anyhow::Error) -> PyErr {
    // {:#} tar med hele context-kjeden (f.eks. "frames_json: json error at [3].timestamp_ms …")
    PyValueError::new_err(format!("{e:#}"))
}

#[pyfunction]
#[pyo3(signature = (exercise, frames_json, difficulty=None, cfg_json=None))]
fn detect_reps(
    exercise: &str,
    frames_json: &str,
    difficulty: Option<&str>,
    cfg_json: Option<&str>,
) -> PyResult<String> {
    detect_reps_json(exercise, difficulty, frames_json, cfg_json).map_err(to_py_err)
}

#[pyfunction]
fn analyze_form(reps_json: &str) -> PyResult<String> {
    analyze_form_json(reps_json).map_err(to_py_err)
}

#[pyfunction]
fn metrics_text() -> String {
    gather_text()
}

#[pymodule]
fn reptrack_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(detect_reps, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_form, m)?)?;
    m.add_function(wrap_pyfunction!(metrics_text, m)?)?;
    Ok(())
}
