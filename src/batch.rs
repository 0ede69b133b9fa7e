//! Bulk conversions over slices, computed in parallel.
//!
//! Each input yields its own result so one bad point does not fail the batch.

use rayon::prelude::*;

use crate::error::{ReferenceKind, Result};
use crate::geodetic::GeodeticPoint;
use crate::mgrs::MgrsReference;
use crate::osgrid::OsGridRef;
use crate::pipeline::{self, Reference};
use crate::utm::UtmReference;

pub fn to_utm(points: &[GeodeticPoint]) -> Vec<Result<UtmReference>> {
    points.par_iter().map(GeodeticPoint::to_utm).collect()
}

pub fn to_mgrs(points: &[GeodeticPoint]) -> Vec<Result<MgrsReference>> {
    points.par_iter().map(GeodeticPoint::to_mgrs).collect()
}

pub fn to_os_grid(points: &[GeodeticPoint]) -> Vec<Result<OsGridRef>> {
    points.par_iter().map(GeodeticPoint::to_os_grid).collect()
}

pub fn utm_to_geodetic(refs: &[UtmReference]) -> Vec<GeodeticPoint> {
    refs.par_iter().map(UtmReference::to_geodetic).collect()
}

pub fn mgrs_to_geodetic(refs: &[MgrsReference]) -> Vec<GeodeticPoint> {
    refs.par_iter().map(MgrsReference::to_geodetic).collect()
}

pub fn os_grid_to_geodetic(refs: &[OsGridRef]) -> Vec<Result<GeodeticPoint>> {
    refs.par_iter().map(OsGridRef::to_geodetic).collect()
}

/// Parse and convert each textual reference, preserving input order.
pub fn convert<S>(inputs: &[S], from: ReferenceKind, to: ReferenceKind) -> Vec<Result<Reference>>
where
    S: AsRef<str> + Sync,
{
    let results: Vec<Result<Reference>> = inputs
        .par_iter()
        .map(|input| pipeline::convert(input.as_ref(), from, to))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        log::debug!("{failed} of {} {from} references failed to convert to {to}", inputs.len());
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Vec<GeodeticPoint> {
        (0..200)
            .map(|i| {
                let lat = -79.0 + (i as f64) * 0.8;
                let lon = -179.0 + (i as f64) * 1.7;
                GeodeticPoint::new(lat, lon, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_utm_matches_sequential() {
        let points = sample();
        let parallel = to_utm(&points);
        assert_eq!(parallel.len(), points.len());
        for (p, r) in points.iter().zip(&parallel) {
            assert_eq!(r.as_ref().unwrap(), &p.to_utm().unwrap());
        }
    }

    #[test]
    fn test_utm_roundtrip() {
        let points = sample();
        let utms: Vec<UtmReference> = to_utm(&points).into_iter().map(|r| r.unwrap()).collect();
        let back = utm_to_geodetic(&utms);
        for (p, q) in points.iter().zip(&back) {
            assert_relative_eq!(p.latitude(), q.latitude(), epsilon = 1e-9);
            assert_relative_eq!(p.longitude(), q.longitude(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mgrs_roundtrip() {
        let points = sample();
        let refs: Vec<MgrsReference> = to_mgrs(&points).into_iter().map(|r| r.unwrap()).collect();
        let back = mgrs_to_geodetic(&refs);
        for (p, q) in points.iter().zip(&back) {
            // truncation to the metre
            assert_relative_eq!(p.latitude(), q.latitude(), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_per_point_errors() {
        let points = [
            GeodeticPoint::new(52.6576, 1.7179, 0.0),
            GeodeticPoint::new(48.8582, 2.2945, 0.0),
            GeodeticPoint::new(55.95, -3.19, 0.0),
        ];
        let grids = to_os_grid(&points);
        assert!(grids[0].is_ok());
        assert!(grids[1].is_err());
        assert!(grids[2].is_ok());

        let refs: Vec<OsGridRef> = grids.into_iter().filter_map(|r| r.ok()).collect();
        let back = os_grid_to_geodetic(&refs);
        assert_relative_eq!(back[1].as_ref().unwrap().latitude(), 55.95, epsilon = 1e-7);
    }

    #[test]
    fn test_convert_strings() {
        let inputs = ["31U DQ 48251 11932", "31I DQ 48251 11932", "56H LH 34900 52288"];
        let out = convert(&inputs, ReferenceKind::Mgrs, ReferenceKind::Utm);
        assert_eq!(out[0].as_ref().unwrap().to_string(), "31 N 448251 5411932");
        assert!(out[1].is_err());
        assert_eq!(out[2].as_ref().unwrap().to_string(), "56 S 334900 6252288");
    }
}
