//! Geodetic latitude/longitude/height, the common currency of every conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::angle::{wrap180, wrap90};
use crate::cartesian::CartesianPoint;
use crate::error::{GridRefError, ReferenceKind, Result};
use crate::mgrs::MgrsReference;
use crate::osgrid::OsGridRef;
use crate::proj::ellipsoid::WGS84;
use crate::utm::{UtmProjection, UtmReference};

/// A point on the ellipsoid.
///
/// Latitude is kept in [-90, 90] and longitude in (-180, 180] on every set:
/// out-of-range values are wrapped, never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGeodetic")]
pub struct GeodeticPoint {
    latitude: f64,
    longitude: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawGeodetic {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    height: f64,
}

impl From<RawGeodetic> for GeodeticPoint {
    fn from(raw: RawGeodetic) -> Self {
        Self::new(raw.latitude, raw.longitude, raw.height)
    }
}

impl GeodeticPoint {
    /// Latitude and longitude in degrees, height in metres above the ellipsoid.
    pub fn new(latitude: f64, longitude: f64, height: f64) -> Self {
        Self {
            latitude: wrap90(latitude),
            longitude: wrap180(longitude),
            height,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_latitude(&mut self, latitude: f64) {
        self.latitude = wrap90(latitude);
    }

    pub fn set_longitude(&mut self, longitude: f64) {
        self.longitude = wrap180(longitude);
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    /// Geocentric (ECEF) coordinates on WGS84.
    pub fn to_cartesian(&self) -> CartesianPoint {
        let phi = self.latitude.to_radians();
        let lambda = self.longitude.to_radians();
        let h = self.height;

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let nu = WGS84.prime_vertical_radius(phi);

        let x = (nu + h) * cos_phi * cos_lambda;
        let y = (nu + h) * cos_phi * sin_lambda;
        let z = (nu * (1.0 - WGS84.e2) + h) * sin_phi;

        CartesianPoint::new(x, y, z)
    }

    /// Project onto the UTM grid; fails outside 80°S..84°N.
    pub fn to_utm(&self) -> Result<UtmReference> {
        UtmReference::from_geodetic(self)
    }

    /// As [`GeodeticPoint::to_utm`], also returning convergence and scale.
    pub fn to_utm_projection(&self) -> Result<UtmProjection> {
        UtmReference::project(self)
    }

    pub fn to_mgrs(&self) -> Result<MgrsReference> {
        self.to_utm()?.to_mgrs()
    }

    /// Project onto the OS National Grid. The point is taken to be on Airy 1830.
    pub fn to_os_grid(&self) -> Result<OsGridRef> {
        OsGridRef::from_geodetic(self)
    }
}

impl FromStr for GeodeticPoint {
    type Err = GridRefError;

    /// Parse `"lat, lon"` or `"lat, lon, height"`; commas or whitespace separate values.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        if !(2..=3).contains(&parts.len()) {
            return Err(GridRefError::parsing(
                ReferenceKind::Geodetic,
                s,
                "Expected latitude, longitude and optional height",
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
                        ReferenceKind::Geodetic,
                        s,
                        format!("'{part}' is not a number"),
                    )
                })?;
        }

        Ok(Self::new(values[0], values[1], values[2]))
    }
}

impl fmt::Display for GeodeticPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)?;
        if self.height != 0.0 {
            write!(f, ", {}", self.height)?;
        }
        Ok(())
    }
}
