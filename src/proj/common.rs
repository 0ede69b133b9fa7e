//! Common helpers for projection math (conformal latitude, meridional arc).

use super::ellipsoid::Ellipsoid;

/// Newton steps allowed when inverting the conformal latitude. It converges
/// in 2-3 steps for any latitude on the earth's surface.
const MAX_TAU_ITERATIONS: usize = 15;

/// Convert geodetic tangent τ = tan φ to conformal tangent τ' (Karney 2011, eq. 7-9).
pub fn conformal_tau(e: f64, tau: f64) -> f64 {
    let tau1 = tau.hypot(1.0); // sec φ
    let sigma = (e * (e * tau / tau1).atanh()).sinh();
    tau * sigma.hypot(1.0) - sigma * tau1
}

/// Recover the geodetic tangent τ from a conformal tangent τ' by Newton
/// iteration (Karney 2011, eq. 19-21).
///
/// Iterates until the correction drops below 1e-12 and returns the tangent
/// together with the number of steps taken.
pub fn geodetic_tau(e: f64, tau_prime: f64) -> (f64, usize) {
    let e2 = e * e;
    let mut tau = tau_prime;
    let mut steps = 0;

    while steps < MAX_TAU_ITERATIONS {
        steps += 1;
        let tau1 = tau.hypot(1.0);
        let tau_i_prime = conformal_tau(e, tau);
        let dtau = (tau_prime - tau_i_prime) / tau_i_prime.hypot(1.0)
            * (1.0 + (1.0 - e2) * tau * tau)
            / ((1.0 - e2) * tau1);
        tau += dtau;
        // δτ toggles around ±1e-16 once converged, hence the loose bound
        if dtau.abs() <= 1e-12 {
            return (tau, steps);
        }
    }

    log::warn!("conformal latitude inversion did not converge for tau' = {tau_prime}");
    (tau, steps)
}

/// Meridional arc from latitude `phi0` to `phi` (radians), scaled by `scale`.
///
/// The four-term series in third flattening used by the Ordnance Survey
/// (“A guide to coordinate systems in Great Britain”, eq. C3).
pub fn meridional_arc(ellipsoid: &Ellipsoid, phi: f64, phi0: f64, scale: f64) -> f64 {
    let n = ellipsoid.n;
    let n2 = n * n;
    let n3 = n2 * n;

    let d = phi - phi0;
    let s = phi + phi0;

    let ma = (1.0 + n + 5.0 / 4.0 * n2 + 5.0 / 4.0 * n3) * d;
    let mb = (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * d.sin() * s.cos();
    let mc = (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3) * (2.0 * d).sin() * (2.0 * s).cos();
    let md = 35.0 / 24.0 * n3 * (3.0 * d).sin() * (3.0 * s).cos();

    ellipsoid.b * scale * (ma - mb + mc - md)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::ellipsoid::{AIRY_1830, WGS84};
    use approx::assert_relative_eq;

    #[test]
    fn test_meridional_arc_origin() {
        let phi0 = 49.0_f64.to_radians();
        assert_relative_eq!(meridional_arc(&AIRY_1830, phi0, phi0, 1.0), 0.0);
    }

    #[test]
    fn test_meridional_arc_equator_to_45() {
        let m = meridional_arc(&WGS84, std::f64::consts::FRAC_PI_4, 0.0, 1.0);
        // Meridian distance equator → 45° on WGS84
        assert_relative_eq!(m, 4_984_944.378, epsilon = 0.01);
    }

    #[test]
    fn test_conformal_tau_equator() {
        let e = WGS84.eccentricity();
        assert_relative_eq!(conformal_tau(e, 0.0), 0.0);
    }

    #[test]
    fn test_conformal_roundtrip() {
        let e = WGS84.eccentricity();
        for lat in [-80.0_f64, -45.0, -10.0, 0.5, 33.3, 60.0, 84.0] {
            let tau = lat.to_radians().tan();
            let (back, steps) = geodetic_tau(e, conformal_tau(e, tau));
            assert_relative_eq!(back, tau, max_relative = 1e-14);
            assert!(steps <= 5, "took {steps} steps at {lat}°");
        }
    }

    #[test]
    fn test_conformal_latitude_smaller() {
        // Conformal latitude is always nearer the equator than geodetic latitude
        let e = WGS84.eccentricity();
        let tau = 45.0_f64.to_radians().tan();
        assert!(conformal_tau(e, tau) < tau);
    }
}
