//! PyO3 bindings for array conversions between geodetic and UTM coordinates.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::batch;
use crate::geodetic::GeodeticPoint;
use crate::utm::{Hemisphere, UtmReference};

/// Project arrays of WGS84 latitude/longitude (degrees) onto UTM.
///
/// Each point is placed in its own zone.
///
/// Returns:
///     Tuple of (zone, north, easting, northing) arrays.
#[pyfunction]
#[pyo3(signature = (lat, lon))]
#[allow(clippy::type_complexity)]
pub fn latlon_to_utm<'py>(
    py: Python<'py>,
    lat: PyReadonlyArray1<'py, f64>,
    lon: PyReadonlyArray1<'py, f64>,
) -> PyResult<(
    Bound<'py, PyArray1<u8>>,
    Bound<'py, PyArray1<bool>>,
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
)> {
    let lat_view = lat.as_array();
    let lon_view = lon.as_array();
    if lat_view.len() != lon_view.len() {
        return Err(PyValueError::new_err(format!(
            "lat and lon must have same length, got {} and {}",
            lat_view.len(),
            lon_view.len()
        )));
    }

    let points: Vec<GeodeticPoint> = lat_view
        .iter()
        .zip(lon_view.iter())
        .map(|(&la, &lo)| GeodeticPoint::new(la, lo, 0.0))
        .collect();

    let refs = py.allow_threads(move || -> PyResult<Vec<UtmReference>> {
        batch::to_utm(&points)
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.map_err(|e| PyValueError::new_err(format!("point {i}: {e}"))))
            .collect()
    })?;

    let zones: Vec<u8> = refs.iter().map(UtmReference::zone).collect();
    let north: Vec<bool> = refs.iter().map(|r| r.hemisphere().is_north()).collect();
    let eastings: Vec<f64> = refs.iter().map(UtmReference::easting).collect();
    let northings: Vec<f64> = refs.iter().map(UtmReference::northing).collect();

    Ok((
        PyArray1::from_owned_array(py, ndarray::Array1::from(zones)),
        PyArray1::from_owned_array(py, ndarray::Array1::from(north)),
        PyArray1::from_owned_array(py, ndarray::Array1::from(eastings)),
        PyArray1::from_owned_array(py, ndarray::Array1::from(northings)),
    ))
}

/// Convert arrays of eastings/northings in one UTM zone to latitude/longitude (degrees).
///
/// Returns:
///     Tuple of (lat, lon) arrays.
#[pyfunction]
#[pyo3(signature = (easting, northing, zone, north=true))]
pub fn utm_to_latlon<'py>(
    py: Python<'py>,
    easting: PyReadonlyArray1<'py, f64>,
    northing: PyReadonlyArray1<'py, f64>,
    zone: u8,
    north: bool,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let e_view = easting.as_array();
    let n_view = northing.as_array();
    if e_view.len() != n_view.len() {
        return Err(PyValueError::new_err(format!(
            "easting and northing must have same length, got {} and {}",
            e_view.len(),
            n_view.len()
        )));
    }

    let hemisphere = if north {
        Hemisphere::North
    } else {
        Hemisphere::South
    };
    let refs = e_view
        .iter()
        .zip(n_view.iter())
        .map(|(&e, &n)| UtmReference::new(zone, hemisphere, e, n))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let points = py.allow_threads(move || batch::utm_to_geodetic(&refs));
    let (lats, lons): (Vec<f64>, Vec<f64>) = points
        .iter()
        .map(|p| (p.latitude(), p.longitude()))
        .unzip();

    Ok((
        PyArray1::from_owned_array(py, ndarray::Array1::from(lats)),
        PyArray1::from_owned_array(py, ndarray::Array1::from(lons)),
    ))
}
