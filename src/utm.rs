//! Universal Transverse Mercator grid references on WGS84.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GeodeticField, GridRefError, ReferenceKind, Result, UtmField};
use crate::geodetic::GeodeticPoint;
use crate::mgrs::MgrsReference;
use crate::proj::transverse_mercator::{zone_central_meridian, TransverseMercator};

/// Latitude bands C..X, 8° each, covering 80°S to 84°N. X is repeated for 80-84°N.
pub(crate) const LAT_BANDS: &[u8; 21] = b"CDEFGHJKLMNPQRSTUVWXX";

/// Southern and northern limits of the UTM system (degrees).
pub const MIN_LATITUDE: f64 = -80.0;
pub const MAX_LATITUDE: f64 = 84.0;

/// Grid extents: the easting range of a zone and the northings reached at 84°N / 80°S.
pub const MAX_EASTING: f64 = 1_000_000.0;
pub const MAX_NORTHING_NORTH: f64 = 9_328_094.0;
pub const MIN_NORTHING_SOUTH: f64 = 1_118_414.0;
pub const MAX_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Latitude band letter for a latitude in degrees, if it falls within 80°S..84°N.
pub fn latitude_band(latitude: f64) -> Option<char> {
    let index = (latitude / 8.0 + 10.0).floor();
    if (0.0..LAT_BANDS.len() as f64).contains(&index) {
        Some(LAT_BANDS[index as usize] as char)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
}

impl Hemisphere {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Self::North),
            'S' => Some(Self::South),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
        }
    }

    pub fn is_north(&self) -> bool {
        matches!(self, Self::North)
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The zone containing a position, with the Norway/Svalbard exceptions applied.
///
/// Returns the zone number and the longitude of its central meridian (degrees).
pub fn zone_for(latitude: f64, longitude: f64) -> (u8, f64) {
    // longitude 180 is the eastern edge of zone 60
    let mut zone = (((longitude + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60);

    let adjusted = match latitude_band(latitude) {
        // Norway: zone 32V is widened westwards
        Some('V') if zone == 31 && longitude >= 3.0 => Some(32),
        // Svalbard: zones 32X, 34X and 36X are unused
        Some('X') if zone == 32 => Some(if longitude < 9.0 { 31 } else { 33 }),
        Some('X') if zone == 34 => Some(if longitude < 21.0 { 33 } else { 35 }),
        Some('X') if zone == 36 => Some(if longitude < 33.0 { 35 } else { 37 }),
        _ => None,
    };
    if let Some(z) = adjusted {
        log::debug!("zone {zone} adjusted to {z} at ({latitude}, {longitude})");
        zone = z;
    }

    let zone = zone as u8;
    (zone, zone_central_meridian(zone))
}

/// A UTM grid reference.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUtm")]
pub struct UtmReference {
    zone: u8,
    hemisphere: Hemisphere,
    easting: f64,
    northing: f64,
}

#[derive(Deserialize)]
struct RawUtm {
    zone: u8,
    hemisphere: Hemisphere,
    easting: f64,
    northing: f64,
}

impl TryFrom<RawUtm> for UtmReference {
    type Error = GridRefError;

    fn try_from(raw: RawUtm) -> Result<Self> {
        Self::new(raw.zone, raw.hemisphere, raw.easting, raw.northing)
    }
}

/// A UTM reference with the grid convergence (degrees) and point scale at it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct UtmProjection {
    pub reference: UtmReference,
    pub convergence: f64,
    pub scale: f64,
}

/// A geodetic point with the grid convergence (degrees) and point scale at it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeodeticProjection {
    pub point: GeodeticPoint,
    pub convergence: f64,
    pub scale: f64,
}

impl UtmReference {
    /// A validated reference: zone 1-60, easting 0-1000 km, northing within
    /// the extent of the hemisphere's grid.
    pub fn new(zone: u8, hemisphere: Hemisphere, easting: f64, northing: f64) -> Result<Self> {
        let utm = Self {
            zone,
            hemisphere,
            easting,
            northing,
        };
        utm.validate(&utm.to_string())?;
        Ok(utm)
    }

    fn validate(&self, reference: &str) -> Result<()> {
        if !(1..=60).contains(&self.zone) {
            return Err(GridRefError::invalid(UtmField::Zone, reference));
        }
        if !(0.0..=MAX_EASTING).contains(&self.easting) {
            return Err(GridRefError::invalid(UtmField::Easting, reference));
        }
        let northing_ok = match self.hemisphere {
            Hemisphere::North => (0.0..=MAX_NORTHING_NORTH).contains(&self.northing),
            Hemisphere::South => {
                self.northing > MIN_NORTHING_SOUTH && self.northing <= MAX_NORTHING_SOUTH
            }
        };
        if !northing_ok {
            return Err(GridRefError::invalid(UtmField::Northing, reference));
        }
        Ok(())
    }

    /// Build without range checks; used for the output of conversions, which
    /// may land just outside the nominal grid extent.
    pub(crate) fn new_unchecked(
        zone: u8,
        hemisphere: Hemisphere,
        easting: f64,
        northing: f64,
    ) -> Self {
        Self {
            zone,
            hemisphere,
            easting,
            northing,
        }
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Project a geodetic point using Karney's method.
    pub fn from_geodetic(point: &GeodeticPoint) -> Result<Self> {
        Self::project(point).map(|p| p.reference)
    }

    /// Project a geodetic point, also returning convergence and scale.
    pub fn project(point: &GeodeticPoint) -> Result<UtmProjection> {
        let lat = point.latitude();
        let lon = point.longitude();

        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
            return Err(GridRefError::invalid(
                GeodeticField::Latitude,
                point.to_string(),
            ));
        }

        let (zone, lon0) = zone_for(lat, lon);
        let hemisphere = if lat >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        };

        let tm = TransverseMercator::utm_with_central_meridian(
            lon0.to_radians(),
            hemisphere.is_north(),
        );
        let (x, y, distortion) = tm.forward_with_distortion(lon.to_radians(), lat.to_radians());

        Ok(UtmProjection {
            reference: Self::new_unchecked(zone, hemisphere, x, y),
            convergence: distortion.convergence.to_degrees(),
            scale: distortion.scale,
        })
    }

    pub fn to_geodetic(&self) -> GeodeticPoint {
        self.to_geodetic_projection().point
    }

    /// Inverse projection, also returning convergence and scale.
    pub fn to_geodetic_projection(&self) -> GeodeticProjection {
        let tm = TransverseMercator::utm_zone(self.zone, self.hemisphere.is_north());
        let (lon, lat, distortion) = tm.inverse_with_distortion(self.easting, self.northing);
        GeodeticProjection {
            point: GeodeticPoint::new(lat.to_degrees(), lon.to_degrees(), 0.0),
            convergence: distortion.convergence.to_degrees(),
            scale: distortion.scale,
        }
    }

    pub fn to_mgrs(&self) -> Result<MgrsReference> {
        MgrsReference::from_utm(self)
    }

    /// Format with easting/northing to `digits` decimal places and a two-digit zone.
    pub fn format_with_digits(&self, digits: usize) -> String {
        format!(
            "{:02} {} {:.*} {:.*}",
            self.zone, self.hemisphere, digits, self.easting, digits, self.northing
        )
    }
}

impl FromStr for UtmReference {
    type Err = GridRefError;

    /// Parse `"ZONE HEMISPHERE EASTING NORTHING"`, e.g. `"31 N 448251 5411932"`.
    fn from_str(s: &str) -> Result<Self> {
        let parse_err = |reason: &str| GridRefError::parsing(ReferenceKind::Utm, s, reason);

        let parts: Vec<&str> = s.split_whitespace().collect();
        let &[zone, hemisphere, easting, northing] = parts.as_slice() else {
            return Err(parse_err("Invalid format"));
        };

        let zone: i64 = zone
            .parse()
            .map_err(|_| parse_err("Zone is not a number"))?;

        let mut chars = hemisphere.chars();
        let hemisphere = match (chars.next(), chars.next()) {
            (Some(c), None) => Hemisphere::from_char(c)
                .ok_or_else(|| parse_err("Hemisphere should be N or S"))?,
            _ => return Err(parse_err("Hemisphere should be a single character")),
        };

        let number = |token: &str, reason: &str| {
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| parse_err(reason))
        };
        let easting = number(easting, "Easting should be a number")?;
        let northing = number(northing, "Northing should be a number")?;

        let zone = u8::try_from(zone)
            .map_err(|_| GridRefError::invalid(UtmField::Zone, s))?;
        let utm = Self {
            zone,
            hemisphere,
            easting,
            northing,
        };
        utm.validate(s)?;
        Ok(utm)
    }
}

impl fmt::Display for UtmReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.zone, self.hemisphere, self.easting, self.northing
        )
    }
}
