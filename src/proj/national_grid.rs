//! Ordnance Survey National Grid: Redfearn transverse Mercator on Airy 1830.
//!
//! Series from “A guide to coordinate systems in Great Britain”, annex C.
//! Accurate to about 1 mm within the extent of the grid.

use crate::error::Result;
use crate::proj::common::meridional_arc;
use crate::proj::ellipsoid::{Ellipsoid, AIRY_1830};
use crate::proj::Projection;

/// Scale factor on the central meridian.
pub const F0: f64 = 0.999_601_271_7;
/// True origin latitude (degrees).
pub const LAT0: f64 = 49.0;
/// True origin longitude (degrees).
pub const LON0: f64 = -2.0;
/// Northing of true origin (metres).
pub const N0: f64 = -100_000.0;
/// Easting of true origin (metres).
pub const E0: f64 = 400_000.0;

/// Meridional-arc residual (metres) at which the inverse stops iterating.
const ARC_TOLERANCE: f64 = 1e-5;
const MAX_ARC_ITERATIONS: usize = 100;

pub struct NationalGrid {
    ellipsoid: Ellipsoid,
    phi0: f64,
    lam0: f64,
}

impl NationalGrid {
    pub fn new() -> Self {
        Self {
            ellipsoid: AIRY_1830,
            phi0: LAT0.to_radians(),
            lam0: LON0.to_radians(),
        }
    }

    /// Transverse (ν) and meridional (ρ) radii of curvature, scaled by F0, and η².
    fn curvature(&self, phi: f64) -> (f64, f64, f64) {
        let e2 = self.ellipsoid.e2;
        let sin_phi = phi.sin();
        let w = 1.0 - e2 * sin_phi * sin_phi;
        let nu = self.ellipsoid.a * F0 / w.sqrt();
        let rho = self.ellipsoid.a * F0 * (1.0 - e2) / w.powf(1.5);
        (nu, rho, nu / rho - 1.0)
    }

    fn arc(&self, phi: f64) -> f64 {
        meridional_arc(&self.ellipsoid, phi, self.phi0, F0)
    }
}

impl Default for NationalGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for NationalGrid {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let phi = lat;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (nu, rho, eta2) = self.curvature(phi);

        let m = self.arc(phi);

        let cos3 = cos_phi * cos_phi * cos_phi;
        let cos5 = cos3 * cos_phi * cos_phi;
        let tan2 = phi.tan() * phi.tan();
        let tan4 = tan2 * tan2;

        let i = m + N0;
        let ii = nu / 2.0 * sin_phi * cos_phi;
        let iii = nu / 24.0 * sin_phi * cos3 * (5.0 - tan2 + 9.0 * eta2);
        let iiia = nu / 720.0 * sin_phi * cos5 * (61.0 - 58.0 * tan2 + tan4);
        let iv = nu * cos_phi;
        let v = nu / 6.0 * cos3 * (nu / rho - tan2);
        let vi = nu / 120.0
            * cos5
            * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

        let dl = lon - self.lam0;
        let dl2 = dl * dl;
        let dl3 = dl2 * dl;
        let dl4 = dl3 * dl;
        let dl5 = dl4 * dl;
        let dl6 = dl5 * dl;

        let northing = i + ii * dl2 + iii * dl4 + iiia * dl6;
        let easting = E0 + iv * dl + v * dl3 + vi * dl5;

        Ok((easting, northing))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let a = self.ellipsoid.a;

        // Find the latitude whose meridional arc matches the northing
        let mut phi = self.phi0;
        let mut m = 0.0;
        let mut steps = 0;
        loop {
            phi += (y - N0 - m) / (a * F0);
            m = self.arc(phi);
            steps += 1;
            if (y - N0 - m).abs() < ARC_TOLERANCE {
                break;
            }
            if steps == MAX_ARC_ITERATIONS {
                log::warn!("meridional arc did not converge for northing {y}");
                break;
            }
        }
        log::trace!("national grid footpoint latitude found in {steps} steps");

        let cos_phi = phi.cos();
        let (nu, rho, eta2) = self.curvature(phi);

        let tan = phi.tan();
        let tan2 = tan * tan;
        let tan4 = tan2 * tan2;
        let tan6 = tan4 * tan2;
        let sec = 1.0 / cos_phi;
        let nu3 = nu * nu * nu;
        let nu5 = nu3 * nu * nu;
        let nu7 = nu5 * nu * nu;

        let vii = tan / (2.0 * rho * nu);
        let viii = tan / (24.0 * rho * nu3) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
        let ix = tan / (720.0 * rho * nu5) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
        let x_ = sec / nu;
        let xi = sec / (6.0 * nu3) * (nu / rho + 2.0 * tan2);
        let xii = sec / (120.0 * nu5) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
        let xiia = sec / (5040.0 * nu7) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

        let de = x - E0;
        let de2 = de * de;
        let de3 = de2 * de;
        let de4 = de2 * de2;
        let de5 = de3 * de2;
        let de6 = de4 * de2;
        let de7 = de5 * de2;

        let lat = phi - vii * de2 + viii * de4 - ix * de6;
        let lon = self.lam0 + x_ * de - xi * de3 + xii * de5 - xiia * de7;

        Ok((lon, lat))
    }
}
