pub mod angle;
pub mod batch;
pub mod cartesian;
pub mod error;
pub mod geodetic;
pub mod mgrs;
pub mod osgrid;
pub mod pipeline;
pub mod proj;
pub mod utm;
#[cfg(feature = "python")]
mod py;

pub use cartesian::CartesianPoint;
pub use error::{GridRefError, ReferenceKind, Result};
pub use geodetic::GeodeticPoint;
pub use mgrs::MgrsReference;
pub use osgrid::OsGridRef;
pub use pipeline::{convert, Reference};
pub use utm::{Hemisphere, UtmReference};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn _gridref(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}
