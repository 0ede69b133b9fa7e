//! Transverse Mercator projection: Krüger n-series, 6th order.
//!
//! Implements the Karney (2011) formulation with 6th-order α/β series coefficients,
//! accurate to 5 nm within 3900 km of the central meridian.
//! This is the projection underlying all UTM zones.

use crate::error::Result;
use crate::proj::common::{conformal_tau, geodetic_tau};
use crate::proj::ellipsoid::{Ellipsoid, WGS84};
use crate::proj::Projection;

/// UTM scale factor on the central meridian.
pub const UTM_K0: f64 = 0.9996;
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
/// False northing applied in the southern hemisphere.
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Projected coordinates plus the local distortion of the projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Distortion {
    /// Meridian convergence (radians, clockwise from grid north to true north).
    pub convergence: f64,
    /// Point scale factor.
    pub scale: f64,
}

pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    // Precomputed constants
    e: f64,          // first eccentricity
    a_hat: f64,      // A = a/(1+n) * (1 + n²/4 + n⁴/64 + n⁶/256)
    alpha: [f64; 6], // Forward series coefficients α₁..α₆
    beta: [f64; 6],  // Inverse series coefficients β₁..β₆
}

impl TransverseMercator {
    /// A projection with its natural origin on the equator at `lon0` (radians).
    pub fn new(
        ellipsoid: Ellipsoid,
        lon0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let n = ellipsoid.n;
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        // 2πA is the circumference of a meridian
        let a_hat = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        Self {
            ellipsoid,
            lon0,
            k0,
            false_easting,
            false_northing,
            e: ellipsoid.eccentricity(),
            a_hat,
            alpha: Self::alpha_coefficients(n, n2, n3, n4, n5, n6),
            beta: Self::beta_coefficients(n, n2, n3, n4, n5, n6),
        }
    }

    /// Create a Transverse Mercator for a UTM zone.
    pub fn utm_zone(zone: u8, north: bool) -> Self {
        Self::utm_with_central_meridian(zone_central_meridian(zone).to_radians(), north)
    }

    /// UTM parameters around an arbitrary central meridian (radians).
    pub(crate) fn utm_with_central_meridian(lon0: f64, north: bool) -> Self {
        let false_northing = if north { 0.0 } else { UTM_FALSE_NORTHING_SOUTH };
        Self::new(WGS84, lon0, UTM_K0, UTM_FALSE_EASTING, false_northing)
    }

    /// Central meridian (radians).
    pub fn central_meridian(&self) -> f64 {
        self.lon0
    }

    /// Forward series coefficients α₁..α₆ (Krüger, 6th order).
    fn alpha_coefficients(n: f64, n2: f64, n3: f64, n4: f64, n5: f64, n6: f64) -> [f64; 6] {
        [
            // α₁
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
                + 7891.0 / 37800.0 * n6,
            // α₂
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
                - 1983433.0 / 1935360.0 * n6,
            // α₃
            61.0 / 240.0 * n3 - 103.0 / 140.0 * n4
                + 15061.0 / 26880.0 * n5
                + 167603.0 / 181440.0 * n6,
            // α₄
            49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6,
            // α₅
            34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6,
            // α₆
            212378941.0 / 319334400.0 * n6,
        ]
    }

    /// Inverse series coefficients β₁..β₆ (Krüger, 6th order).
    fn beta_coefficients(n: f64, n2: f64, n3: f64, n4: f64, n5: f64, n6: f64) -> [f64; 6] {
        [
            // β₁
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4 - 81.0 / 512.0 * n5
                + 96199.0 / 604800.0 * n6,
            // β₂
            1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
                - 1118711.0 / 3870720.0 * n6,
            // β₃
            17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5 + 5569.0 / 90720.0 * n6,
            // β₄
            4397.0 / 161280.0 * n4 - 11.0 / 504.0 * n5 - 830251.0 / 7257600.0 * n6,
            // β₅
            4583.0 / 161280.0 * n5 - 108847.0 / 3991680.0 * n6,
            // β₆
            20648693.0 / 638668800.0 * n6,
        ]
    }

    /// Forward projection returning grid coordinates and distortion (Karney eq. 7-14, 23-25).
    pub fn forward_with_distortion(&self, lon: f64, lat: f64) -> (f64, f64, Distortion) {
        let dlam = lon - self.lon0;
        let (sin_lam, cos_lam) = dlam.sin_cos();

        // Convert geodetic tangent to conformal tangent
        let tau = lat.tan();
        let tau_prime = conformal_tau(self.e, tau);

        // ξ' = atan2(τ', cos(Δλ))
        let xi_prime = tau_prime.atan2(cos_lam);
        // η' = asinh(sin(Δλ) / hypot(τ', cos(Δλ)))
        let eta_prime = (sin_lam / tau_prime.hypot(cos_lam)).asinh();

        // Apply α series (forward); p', q' feed the convergence and scale
        let mut xi = xi_prime;
        let mut eta = eta_prime;
        let mut p_prime = 1.0;
        let mut q_prime = 0.0;
        for (j, &a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            let (sin_xi, cos_xi) = (k * xi_prime).sin_cos();
            let (sinh_eta, cosh_eta) = ((k * eta_prime).sinh(), (k * eta_prime).cosh());
            xi += a * sin_xi * cosh_eta;
            eta += a * cos_xi * sinh_eta;
            p_prime += k * a * cos_xi * cosh_eta;
            q_prime += k * a * sin_xi * sinh_eta;
        }

        let x = self.k0 * self.a_hat * eta + self.false_easting;
        let y = self.k0 * self.a_hat * xi + self.false_northing;

        let gamma_prime = (tau_prime / tau_prime.hypot(1.0) * dlam.tan()).atan();
        let gamma_second = q_prime.atan2(p_prime);

        let sin_phi = lat.sin();
        let k_prime = (1.0 - self.ellipsoid.e2 * sin_phi * sin_phi).sqrt() * tau.hypot(1.0)
            / tau_prime.hypot(cos_lam);
        let k_second = self.a_hat / self.ellipsoid.a * p_prime.hypot(q_prime);

        let distortion = Distortion {
            convergence: gamma_prime + gamma_second,
            scale: self.k0 * k_prime * k_second,
        };
        (x, y, distortion)
    }

    /// Inverse projection returning (lon, lat) and distortion (Karney eq. 15-22, 26-28).
    pub fn inverse_with_distortion(&self, x: f64, y: f64) -> (f64, f64, Distortion) {
        let eta = (x - self.false_easting) / (self.k0 * self.a_hat);
        let xi = (y - self.false_northing) / (self.k0 * self.a_hat);

        // Apply β series (inverse)
        let mut xi_prime = xi;
        let mut eta_prime = eta;
        let mut p = 1.0;
        let mut q = 0.0;
        for (j, &b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            let (sin_xi, cos_xi) = (k * xi).sin_cos();
            let (sinh_eta, cosh_eta) = ((k * eta).sinh(), (k * eta).cosh());
            xi_prime -= b * sin_xi * cosh_eta;
            eta_prime -= b * cos_xi * sinh_eta;
            p -= k * b * cos_xi * cosh_eta;
            q += k * b * sin_xi * sinh_eta;
        }

        // τ' = sin(ξ') / hypot(sinh(η'), cos(ξ'))
        let sinh_eta = eta_prime.sinh();
        let (sin_xi, cos_xi) = xi_prime.sin_cos();
        let tau_prime = sin_xi / sinh_eta.hypot(cos_xi);

        // Recover geodetic tangent τ from conformal tangent τ'
        let (tau, steps) = geodetic_tau(self.e, tau_prime);
        log::trace!("tau recovered in {steps} steps");

        let lat = tau.atan();
        let lon = self.lon0 + sinh_eta.atan2(cos_xi);

        let gamma_prime = (xi_prime.tan() * eta_prime.tanh()).atan();
        let gamma_second = q.atan2(p);

        let sin_phi = lat.sin();
        let k_prime = (1.0 - self.ellipsoid.e2 * sin_phi * sin_phi).sqrt()
            * tau.hypot(1.0)
            * sinh_eta.hypot(cos_xi);
        let k_second = self.a_hat / self.ellipsoid.a / p.hypot(q);

        let distortion = Distortion {
            convergence: gamma_prime + gamma_second,
            scale: self.k0 * k_prime * k_second,
        };
        (lon, lat, distortion)
    }
}

impl Projection for TransverseMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let (x, y, _) = self.forward_with_distortion(lon, lat);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (lon, lat, _) = self.inverse_with_distortion(x, y);
        Ok((lon, lat))
    }
}

/// Longitude (degrees) of the central meridian of a regular UTM zone.
pub fn zone_central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_roundtrip_utm33() {
        let tm = TransverseMercator::utm_zone(33, true);
        let cases: &[(f64, f64)] = &[
            (15.0, 52.0), // Berlin area (central meridian)
            (12.0, 50.0), // near zone boundary
            (18.0, 50.0), // near other boundary
            (15.0, 0.0),  // equator
            (15.0, 80.0), // high latitude
            (13.5, 52.5), // off-center
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = tm.forward(lon, lat).unwrap();
            let (lon2, lat2) = tm.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-12);
            assert_relative_eq!(lat2, lat, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_central_meridian_easting() {
        let tm = TransverseMercator::utm_zone(33, true);
        let (e, _) = tm
            .forward(15.0_f64.to_radians(), 45.0_f64.to_radians())
            .unwrap();
        assert_relative_eq!(e, 500_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_eiffel_tower() {
        // 48.8582°N 2.2945°E → 31 N 448251.795 5411932.678
        let tm = TransverseMercator::utm_zone(31, true);
        let (e, n) = tm
            .forward(2.2945_f64.to_radians(), 48.8582_f64.to_radians())
            .unwrap();
        assert_relative_eq!(e, 448_251.795, epsilon = 1e-3);
        assert_relative_eq!(n, 5_411_932.678, epsilon = 1e-3);
    }

    #[test]
    fn test_utm_zone_central_meridian() {
        let tm1 = TransverseMercator::utm_zone(1, true);
        let tm33 = TransverseMercator::utm_zone(33, true);
        let tm60 = TransverseMercator::utm_zone(60, true);

        assert_relative_eq!(tm1.lon0, (-177.0_f64).to_radians(), epsilon = 1e-10);
        assert_relative_eq!(tm33.lon0, 15.0_f64.to_radians(), epsilon = 1e-10);
        assert_relative_eq!(tm60.lon0, 177.0_f64.to_radians(), epsilon = 1e-10);
    }

    #[test]
    fn test_southern_hemisphere() {
        let tm = TransverseMercator::utm_zone(33, false);
        let lon = 15.0_f64.to_radians();
        let lat = (-30.0_f64).to_radians();
        let (x, y) = tm.forward(lon, lat).unwrap();
        assert!(y > 0.0, "Southing should be positive with FN=10M, got {y}");
        let (lon2, lat2) = tm.inverse(x, y).unwrap();
        assert_relative_eq!(lon2, lon, epsilon = 1e-12);
        assert_relative_eq!(lat2, lat, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_on_central_meridian() {
        let tm = TransverseMercator::utm_zone(31, true);
        let (_, _, d) = tm.forward_with_distortion(3.0_f64.to_radians(), 48.0_f64.to_radians());
        assert_relative_eq!(d.scale, UTM_K0, epsilon = 1e-12);
        assert_relative_eq!(d.convergence, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distortion_forward_matches_inverse() {
        let tm = TransverseMercator::utm_zone(31, true);
        let (x, y, fwd) =
            tm.forward_with_distortion(1.0_f64.to_radians(), 51.0_f64.to_radians());
        let (_, _, inv) = tm.inverse_with_distortion(x, y);
        // Convergence is negative west of the central meridian in the north
        assert!(fwd.convergence < 0.0);
        assert!(fwd.scale > UTM_K0);
        assert_relative_eq!(fwd.convergence, inv.convergence, epsilon = 1e-12);
        assert_relative_eq!(fwd.scale, inv.scale, epsilon = 1e-12);
    }

    #[test]
    fn test_multiple_zones() {
        for zone in [1, 10, 17, 30, 33, 45, 60] {
            let tm = TransverseMercator::utm_zone(zone, true);
            let cm_deg = zone_central_meridian(zone);
            // Test point 2° off center
            let lon = (cm_deg + 2.0).to_radians();
            let lat = 45.0_f64.to_radians();
            let (x, y) = tm.forward(lon, lat).unwrap();
            let (lon2, lat2) = tm.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-12);
            assert_relative_eq!(lat2, lat, epsilon = 1e-12);
        }
    }
}
