/// Reference ellipsoid parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Semi-minor axis (metres)
    pub b: f64,
    /// Flattening (dimensionless)
    pub f: f64,
    /// First eccentricity squared: 2f - f²
    pub e2: f64,
    /// Second eccentricity squared: e² / (1 - e²)
    pub ep2: f64,
    /// Third flattening: f / (2 - f)
    pub n: f64,
}

impl Ellipsoid {
    /// Build from semi-major axis and flattening.
    pub const fn new(a: f64, f: f64) -> Self {
        let b = a * (1.0 - f);
        let e2 = 2.0 * f - f * f;
        let ep2 = e2 / (1.0 - e2);
        let n = f / (2.0 - f);
        Self {
            a,
            b,
            f,
            e2,
            ep2,
            n,
        }
    }

    /// Build from the two semi-axes, keeping `b` exactly as published.
    pub const fn from_axes(a: f64, b: f64) -> Self {
        let f = (a - b) / a;
        let e2 = 1.0 - (b * b) / (a * a);
        let ep2 = e2 / (1.0 - e2);
        let n = (a - b) / (a + b);
        Self {
            a,
            b,
            f,
            e2,
            ep2,
            n,
        }
    }

    /// First eccentricity. `sqrt` is not const, so this is computed on demand.
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    /// Radius of curvature in the prime vertical at latitude `phi` (radians).
    pub fn prime_vertical_radius(&self, phi: f64) -> f64 {
        let sin_phi = phi.sin();
        self.a / (1.0 - self.e2 * sin_phi * sin_phi).sqrt()
    }
}

/// WGS84, used by the geocentric and UTM/MGRS conversions.
pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_223_563);

/// Airy 1830, used by the Ordnance Survey National Grid.
pub const AIRY_1830: Ellipsoid = Ellipsoid::from_axes(6_377_563.396, 6_356_256.909);
