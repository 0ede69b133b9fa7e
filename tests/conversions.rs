use approx::assert_relative_eq;
use gridref::error::{Field, GeodeticField, MgrsField, UtmField};
use gridref::{
    convert, CartesianPoint, GeodeticPoint, GridRefError, Hemisphere, MgrsReference, OsGridRef,
    Reference, ReferenceKind, UtmReference,
};

fn dms(d: f64, m: f64, s: f64) -> f64 {
    d + m / 60.0 + s / 3600.0
}

#[test]
fn geodetic_to_cartesian() {
    let c = GeodeticPoint::new(80.0, 80.0, 0.0).to_cartesian();
    assert_relative_eq!(c.x(), 192_951.755, epsilon = 1e-3);
    assert_relative_eq!(c.y(), 1_094_283.780, epsilon = 1e-3);
    assert_relative_eq!(c.z(), 6_259_542.961, epsilon = 1e-3);
}

#[test]
fn cartesian_to_geodetic() {
    let p = CartesianPoint::new(4_027_893.924, 307_041.993, 4_919_474.294).to_geodetic();
    assert_relative_eq!(p.latitude(), 50.797_814, epsilon = 1e-6);
    assert_relative_eq!(p.longitude(), 4.359_165, epsilon = 1e-6);
    assert_relative_eq!(p.height(), 148.964, epsilon = 1e-3);
}

#[test]
fn utm_to_geodetic_and_back() {
    let utm = UtmReference::new(31, Hemisphere::North, 448_251.795, 5_411_932.678).unwrap();
    let p = utm.to_geodetic();
    assert_relative_eq!(p.latitude(), 48.8582, epsilon = 1e-8);
    assert_relative_eq!(p.longitude(), 2.2945, epsilon = 1e-8);

    let again = p.to_utm().unwrap();
    assert_eq!(again.zone(), 31);
    assert_relative_eq!(again.easting(), utm.easting(), epsilon = 1e-6);
    assert_relative_eq!(again.northing(), utm.northing(), epsilon = 1e-6);
}

#[test]
fn mgrs_canonical_argument_order() {
    let mgrs = MgrsReference::new(31, 'U', 'D', 'Q', 11932, 48251).unwrap();
    let utm = mgrs.to_utm();
    assert_eq!(utm.zone(), 31);
    assert_eq!(utm.hemisphere(), Hemisphere::North);
    assert_eq!(utm.easting(), 411_932.0);
    assert_eq!(utm.northing(), 5_448_251.0);
}

#[test]
fn mgrs_invalid_band() {
    let err = "31I DQ 48251 11932".parse::<MgrsReference>().unwrap_err();
    assert!(matches!(err, GridRefError::InvalidField { .. }));
    assert_eq!(err.field(), Some(Field::Mgrs(MgrsField::Band)));
}

#[test]
fn utm_parse_failures() {
    for bad in ["random String", "31 33N 448251 5411932", "31 F 448251 5411932"] {
        assert!(matches!(
            bad.parse::<UtmReference>().unwrap_err(),
            GridRefError::Parsing { .. }
        ));
    }
    let err = "99 N 448251 5411932".parse::<UtmReference>().unwrap_err();
    assert_eq!(err.field(), Some(Field::Utm(UtmField::Zone)));
}

#[test]
fn os_grid_formatting() {
    let grid = OsGridRef::new(651_409.0, 313_177.0).unwrap();
    assert_eq!(grid.to_string_with_digits(8).unwrap(), "TG 5140 1317");
    assert_eq!(grid.to_string_with_digits(0).unwrap(), "651409,313177");
}

#[test]
fn os_grid_worked_example() {
    let p = GeodeticPoint::new(dms(52.0, 39.0, 27.2531), dms(1.0, 43.0, 4.5177), 0.0);
    let grid = p.to_os_grid().unwrap();
    assert_relative_eq!(grid.easting(), 651_409.903, epsilon = 1e-3);
    assert_relative_eq!(grid.northing(), 313_177.270, epsilon = 1e-3);

    let back = grid.to_geodetic().unwrap();
    assert_relative_eq!(back.latitude(), p.latitude(), epsilon = 1e-7);
    assert_relative_eq!(back.longitude(), p.longitude(), epsilon = 1e-7);
}

#[test]
fn wrapping_on_construction_and_set() {
    let mut p = GeodeticPoint::new(-1000.0, 540.0, 0.0);
    assert_relative_eq!(p.latitude(), 80.0, epsilon = 1e-9);
    assert_eq!(p.longitude(), 180.0);
    p.set_longitude(-180.0);
    assert_eq!(p.longitude(), 180.0);
    p.set_latitude(91.0);
    assert_relative_eq!(p.latitude(), 89.0, epsilon = 1e-9);
}

#[test]
fn geodetic_cartesian_roundtrip_grid() {
    for lat in (-85..=85).step_by(17) {
        for lon in (-175..=175).step_by(35) {
            for h in [-100.0, 0.0, 8848.0] {
                let p = GeodeticPoint::new(lat as f64, lon as f64, h);
                let q = p.to_cartesian().to_geodetic();
                assert_relative_eq!(q.latitude(), p.latitude(), epsilon = 1e-9);
                assert_relative_eq!(q.longitude(), p.longitude(), epsilon = 1e-9);
                assert_relative_eq!(q.height(), h, epsilon = 1e-4);
            }
        }
    }
}

#[test]
fn utm_roundtrip_within_zones() {
    for lat in (-79..=83).step_by(9) {
        for lon in (-179..=179).step_by(23) {
            let p = GeodeticPoint::new(lat as f64 + 0.25, lon as f64 + 0.5, 0.0);
            let q = p.to_utm().unwrap().to_geodetic();
            assert_relative_eq!(q.latitude(), p.latitude(), epsilon = 1e-9);
            assert_relative_eq!(q.longitude(), p.longitude(), epsilon = 1e-9);
        }
    }
}

#[test]
fn mgrs_roundtrip_is_exact() {
    for lat in (-79..=83).step_by(7) {
        for lon in (-179..=179).step_by(13) {
            let mgrs = GeodeticPoint::new(lat as f64 + 0.3, lon as f64 + 0.7, 0.0)
                .to_mgrs()
                .unwrap();
            let text = mgrs.to_string();
            let parsed: MgrsReference = text.parse().unwrap();
            assert_eq!(parsed, mgrs);
            assert_eq!(parsed.to_utm().to_mgrs().unwrap(), mgrs, "{text}");
        }
    }
}

#[test]
fn mgrs_roundtrip_at_band_and_zone_edges() {
    let mut floors: Vec<f64> = (-9..=9).map(|band| band as f64 * 8.0).collect();
    floors.push(84.0);

    for floor in floors {
        for lat in [floor - 1e-7, floor + 1e-7] {
            if !(-80.0..=84.0).contains(&lat) {
                continue;
            }
            for zone in (1..=60).step_by(7) {
                let west = -180.0 + 6.0 * (zone - 1) as f64;
                for lon in [west + 1e-4, west + 6.0 - 1e-4] {
                    let utm = GeodeticPoint::new(lat, lon, 0.0).to_utm().unwrap();
                    let mgrs = utm.to_mgrs().unwrap();
                    let text = mgrs.to_string();

                    let back = mgrs.to_utm();
                    assert_eq!(back.zone(), utm.zone(), "{text}");
                    assert_eq!(back.hemisphere(), utm.hemisphere(), "{text}");
                    assert_eq!(back.easting(), utm.easting().floor(), "{text}");
                    assert_eq!(back.northing(), utm.northing().floor(), "{text}");

                    let again = back.to_mgrs().unwrap();
                    assert_eq!(again.band(), mgrs.band(), "{text}");
                    assert_eq!(again, mgrs, "{text}");
                }
            }
        }
    }
}

#[test]
fn utm_limits() {
    let err = GeodeticPoint::new(-85.0, 10.0, 0.0).to_utm().unwrap_err();
    assert_eq!(err.field(), Some(Field::Geodetic(GeodeticField::Latitude)));
}

#[test]
fn string_pipeline() {
    let out = convert("TG 51409 13177", ReferenceKind::OsGrid, ReferenceKind::Geodetic).unwrap();
    let p = out.to_geodetic().unwrap();
    assert_relative_eq!(p.latitude(), 52.657_57, epsilon = 1e-4);
    assert_relative_eq!(p.longitude(), 1.717_92, epsilon = 1e-4);

    let mgrs = Reference::Geodetic(p).convert(ReferenceKind::Mgrs).unwrap();
    assert_eq!(mgrs.kind(), ReferenceKind::Mgrs);
}
