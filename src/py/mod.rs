use pyo3::prelude::*;

mod convert;
mod transform;

/// Register all Python-visible functions.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(convert::convert, m)?)?;
    m.add_function(wrap_pyfunction!(transform::latlon_to_utm, m)?)?;
    m.add_function(wrap_pyfunction!(transform::utm_to_latlon, m)?)?;
    Ok(())
}
