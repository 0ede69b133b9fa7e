//! PyO3 binding for the string conversion pipeline.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::ReferenceKind;
use crate::pipeline;

fn kind(name: &str) -> PyResult<ReferenceKind> {
    ReferenceKind::from_name(name)
        .ok_or_else(|| PyValueError::new_err(format!("Unknown reference kind: {name}")))
}

/// Convert a textual reference from one representation to another.
///
/// Args:
///     reference: The reference to convert (e.g. "31U DQ 48251 11932").
///     src: Kind of the input ("geodetic", "cartesian", "utm", "mgrs" or "osgrid").
///     dst: Kind of the output.
///     digits: Optional output precision; see `Reference::format`.
///
/// Returns:
///     The converted reference as a string.
#[pyfunction]
#[pyo3(signature = (reference, src, dst, digits=None))]
pub fn convert(reference: &str, src: &str, dst: &str, digits: Option<usize>) -> PyResult<String> {
    let (src, dst) = (kind(src)?, kind(dst)?);
    pipeline::convert(reference, src, dst)
        .and_then(|r| r.format(digits))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}
