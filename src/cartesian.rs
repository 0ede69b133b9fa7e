//! Geocentric (ECEF) coordinates relative to WGS84.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridRefError, ReferenceKind, Result};
use crate::geodetic::GeodeticPoint;
use crate::proj::ellipsoid::WGS84;

/// Earth-centred, earth-fixed x/y/z in metres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartesianPoint {
    x: f64,
    y: f64,
    z: f64,
}

impl CartesianPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Convert to geodetic latitude/longitude/height using Bowring's method
    /// (Survey Review, 1976), accurate to well under a millimetre for
    /// points on the earth's surface.
    ///
    /// Points on the polar axis resolve to ±90° (0° at the centre) with
    /// height measured from the semi-minor axis.
    pub fn to_geodetic(&self) -> GeodeticPoint {
        let Self { x, y, z } = *self;
        let a = WGS84.a;
        let b = WGS84.b;
        let e2 = WGS84.e2;
        let eps2 = WGS84.ep2;

        let p = x.hypot(y);

        if p == 0.0 {
            let latitude = if z > 0.0 {
                90.0
            } else if z < 0.0 {
                -90.0
            } else {
                0.0
            };
            let height = if z == 0.0 { -a } else { z.abs() - b };
            return GeodeticPoint::new(latitude, 0.0, height);
        }

        let r = p.hypot(z);

        // parametric (reduced) latitude
        let tan_beta = (b * z) / (a * p) * (1.0 + eps2 * b / r);
        let sin_beta = tan_beta / tan_beta.hypot(1.0);
        let cos_beta = 1.0 / tan_beta.hypot(1.0);

        let phi = (z + eps2 * b * sin_beta.powi(3)).atan2(p - e2 * a * cos_beta.powi(3));
        let lambda = y.atan2(x);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let nu = WGS84.prime_vertical_radius(phi);
        let height = p * cos_phi + z * sin_phi - (a * a / nu);

        GeodeticPoint::new(phi.to_degrees(), lambda.to_degrees(), height)
    }
}

impl FromStr for CartesianPoint {
    type Err = GridRefError;

    /// Parse `"x, y, z"`; commas or whitespace separate values.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() != 3 {
            return Err(GridRefError::parsing(
                ReferenceKind::Cartesian,
                s,
                "Expected three coordinates",
            ));
        }

        let mut values = [0.0; 3];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    GridRefError::parsing(
                        ReferenceKind::Cartesian,
                        s,
                        format!("'{part}' is not a number"),
                    )
                })?;
        }

        Ok(Self::new(values[0], values[1], values[2]))
    }
}

impl fmt::Display for CartesianPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}
