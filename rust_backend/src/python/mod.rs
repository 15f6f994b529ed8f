//! Python bindings for the orchestration layer.
//!
//! Built with the `python` feature. The orchestrator calls
//! `snowops.transform_operational_data(...)` once per reporting cycle and
//! persists the returned document itself.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::PipelineError;
use crate::io;
use crate::preprocessing;

fn to_py_err(error: PipelineError) -> PyErr {
    match error {
        PipelineError::Geometry(e) => PyValueError::new_err(format!("Invalid map geometry: {}", e)),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Build the operational snapshot document from raw collaborator payloads
///
/// Args:
///     weather: Weather collaborator JSON, or None
///     fuel: Fuel inventory JSON, or None
///     salt: Salt inventory JSON, or None
///     traffic: Traffic/routing JSON, or None
///
/// Returns:
///     str: Pretty-printed snapshot document
///
/// Raises:
///     ValueError: If route or incident geometry is invalid
///
/// Example:
///     >>> import snowops
///     >>> doc = snowops.transform_operational_data(fuel='{"fuel_level": 60}')
#[pyfunction]
#[pyo3(signature = (weather=None, fuel=None, salt=None, traffic=None))]
pub fn transform_operational_data(
    weather: Option<&str>,
    fuel: Option<&str>,
    salt: Option<&str>,
    traffic: Option<&str>,
) -> PyResult<String> {
    preprocessing::transform_operational_data(weather, fuel, salt, traffic).map_err(to_py_err)
}

/// SHA-256 hex fingerprint of an emitted document
#[pyfunction]
pub fn document_checksum(content: &str) -> String {
    io::document_checksum(content)
}

#[pymodule]
fn snowops(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(transform_operational_data, m)?)?;
    m.add_function(wrap_pyfunction!(document_checksum, m)?)?;
    Ok(())
}
