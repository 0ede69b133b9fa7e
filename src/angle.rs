//! Angle and string helpers shared by the reference types.
//!
//! Degree/radian conversion uses the inherent `f64::to_radians` and
//! `f64::to_degrees` throughout the crate.

/// Constrain degrees to the range (-180, 180], e.g. for longitude.
///
/// A sawtooth with period 360; values already in range are returned unchanged.
pub fn wrap180(degrees: f64) -> f64 {
    if -180.0 < degrees && degrees <= 180.0 {
        return degrees;
    }
    let wrapped = (degrees + 540.0).rem_euclid(360.0) - 180.0;
    // rem_euclid lands on -180 for odd multiples of 180, which belong to +180
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Constrain degrees to the range [-90, 90], e.g. for latitude.
///
/// Latitude is not periodic: values past a pole reflect back from it.
pub fn wrap90(degrees: f64) -> f64 {
    if (-90.0..=90.0).contains(&degrees) {
        return degrees;
    }
    ((degrees.rem_euclid(360.0) + 270.0).rem_euclid(360.0) - 180.0).abs() - 90.0
}

/// Strip every whitespace character from `s`.
pub fn remove_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
