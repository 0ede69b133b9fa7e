//! Military Grid Reference System: UTM positions addressed by 100 km squares.
//!
//! A reference such as `31U DQ 48251 11932` names the UTM zone and latitude
//! band, a column and row letter identifying the 100 km square, and the
//! easting and northing within that square.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::angle::remove_whitespace;
use crate::error::{GridRefError, MgrsField, ReferenceKind, Result};
use crate::geodetic::GeodeticPoint;
use crate::proj::transverse_mercator::TransverseMercator;
use crate::utm::{latitude_band, Hemisphere, UtmReference, LAT_BANDS, MIN_LATITUDE};

/// 100 km column letters, cycling every three zones.
const COLUMN_LETTERS: [&[u8; 8]; 3] = [b"ABCDEFGH", b"JKLMNPQR", b"STUVWXYZ"];

/// 100 km row letters, cycling every two zones (offset by five for even zones).
const ROW_LETTERS: [&[u8; 20]; 2] = [b"ABCDEFGHJKLMNPQRSTUV", b"FGHJKLMNPQRSTUVABCDE"];

const SQUARE: f64 = 100_000.0;
/// Row letters repeat every 2,000 km of northing.
const ROW_CYCLE: f64 = 2_000_000.0;
/// Degrees from the central meridian to the edge of a regular zone.
const ZONE_HALF_WIDTH: f64 = 3.0;

/// Precisions accepted by [`MgrsReference::format_with_digits`].
pub const DIGITS: [usize; 5] = [2, 4, 6, 8, 10];

fn column_letters(zone: u8) -> &'static [u8; 8] {
    COLUMN_LETTERS[(zone as usize - 1) % 3]
}

fn row_letters(zone: u8) -> &'static [u8; 20] {
    ROW_LETTERS[(zone as usize - 1) % 2]
}

fn position(letters: &[u8], c: char) -> Option<usize> {
    c.is_ascii()
        .then(|| letters.iter().position(|&l| l == c as u8))
        .flatten()
}

/// An MGRS grid reference at 1 m resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMgrs")]
pub struct MgrsReference {
    zone: u8,
    band: char,
    e100k: char,
    n100k: char,
    easting: u32,
    northing: u32,
}

#[derive(Deserialize)]
struct RawMgrs {
    zone: u8,
    band: char,
    e100k: char,
    n100k: char,
    easting: u32,
    northing: u32,
}

impl TryFrom<RawMgrs> for MgrsReference {
    type Error = GridRefError;

    fn try_from(raw: RawMgrs) -> Result<Self> {
        Self::new(
            raw.zone,
            raw.band,
            raw.e100k,
            raw.n100k,
            raw.easting,
            raw.northing,
        )
    }
}

impl MgrsReference {
    /// A validated reference. `easting` and `northing` are metres within the
    /// 100 km square, each below 100,000.
    pub fn new(
        zone: u8,
        band: char,
        e100k: char,
        n100k: char,
        easting: u32,
        northing: u32,
    ) -> Result<Self> {
        let mgrs = Self {
            zone,
            band,
            e100k,
            n100k,
            easting,
            northing,
        };
        mgrs.validate(&mgrs.to_string())?;
        Ok(mgrs)
    }

    fn validate(&self, reference: &str) -> Result<()> {
        if !(1..=60).contains(&self.zone) {
            return Err(GridRefError::invalid(MgrsField::Zone, reference));
        }
        if position(LAT_BANDS, self.band).is_none() {
            return Err(GridRefError::invalid(MgrsField::Band, reference));
        }
        if position(column_letters(self.zone), self.e100k).is_none() {
            return Err(GridRefError::invalid(MgrsField::E100k, reference));
        }
        if position(ROW_LETTERS[0], self.n100k).is_none() {
            return Err(GridRefError::invalid(MgrsField::N100k, reference));
        }
        if f64::from(self.easting) >= SQUARE {
            return Err(GridRefError::invalid(MgrsField::Easting, reference));
        }
        if f64::from(self.northing) >= SQUARE {
            return Err(GridRefError::invalid(MgrsField::Northing, reference));
        }
        Ok(())
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn band(&self) -> char {
        self.band
    }

    pub fn e100k(&self) -> char {
        self.e100k
    }

    pub fn n100k(&self) -> char {
        self.n100k
    }

    pub fn easting(&self) -> u32 {
        self.easting
    }

    pub fn northing(&self) -> u32 {
        self.northing
    }

    /// Encode a UTM reference, truncating to whole metres.
    ///
    /// The band letter is taken from the latitude of the truncated position,
    /// which is the position the reference decodes to. Eastings outside the
    /// zone's eight columns and positions beyond the latitude bands are
    /// rejected.
    pub fn from_utm(utm: &UtmReference) -> Result<Self> {
        let zone = utm.zone();
        let reference = utm.to_string();

        let column = (utm.easting() / SQUARE).floor();
        if !(1.0..=8.0).contains(&column) {
            return Err(GridRefError::invalid(MgrsField::Easting, reference));
        }
        let e100k = column_letters(zone)[column as usize - 1] as char;

        let row = (utm.northing() / SQUARE).floor().rem_euclid(20.0);
        let n100k = row_letters(zone)[row as usize] as char;

        let truncated = UtmReference::new_unchecked(
            zone,
            utm.hemisphere(),
            utm.easting().floor(),
            utm.northing().floor(),
        );
        // truncation can step just below 80°S, which is still band C
        let latitude = truncated.to_geodetic().latitude().max(MIN_LATITUDE);
        let band = latitude_band(latitude)
            .ok_or_else(|| GridRefError::invalid(MgrsField::Band, reference))?;

        let easting = utm.easting().rem_euclid(SQUARE).floor() as u32;
        let northing = utm.northing().rem_euclid(SQUARE).floor() as u32;

        Ok(Self {
            zone,
            band,
            e100k,
            n100k,
            easting,
            northing,
        })
    }

    /// Decode to UTM.
    ///
    /// Row letters repeat every 2,000 km, so the northing is taken as the
    /// first candidate at or above the lowest northing the bottom of the
    /// latitude band reaches within the zone.
    pub fn to_utm(&self) -> UtmReference {
        let hemisphere = if self.band >= 'N' {
            Hemisphere::North
        } else {
            Hemisphere::South
        };

        // eastings start at 166 km, so column letter 0 is the second 100 km square
        let column = position(column_letters(self.zone), self.e100k).unwrap_or(0) + 1;
        let row = position(row_letters(self.zone), self.n100k).unwrap_or(0);
        let e100k = column as f64 * SQUARE;
        let n100k = row as f64 * SQUARE;

        let band_index = position(LAT_BANDS, self.band).unwrap_or(0);
        let band_latitude = (band_index as f64 - 10.0) * 8.0;

        // a parallel bows towards the nearer pole, so in the south it sits
        // lowest at the zone edge and in the north on the central meridian
        let tm = TransverseMercator::utm_zone(self.zone, hemisphere.is_north());
        let phi = band_latitude.to_radians();
        let lam0 = tm.central_meridian();
        let (_, centre, _) = tm.forward_with_distortion(lam0, phi);
        let (_, edge, _) = tm.forward_with_distortion(lam0 + ZONE_HALF_WIDTH.to_radians(), phi);
        let band_floor = (centre.min(edge) / SQUARE).floor() * SQUARE;

        let local_northing = f64::from(self.northing);
        let mut n2m = 0.0;
        while n2m + n100k + local_northing < band_floor {
            n2m += ROW_CYCLE;
        }
        log::trace!(
            "{self}: band {} floor {band_floor}, northing offset {n2m}",
            self.band
        );

        UtmReference::new_unchecked(
            self.zone,
            hemisphere,
            e100k + f64::from(self.easting),
            n2m + n100k + local_northing,
        )
    }

    pub fn to_geodetic(&self) -> GeodeticPoint {
        self.to_utm().to_geodetic()
    }

    pub fn from_geodetic(point: &GeodeticPoint) -> Result<Self> {
        point.to_utm()?.to_mgrs()
    }

    /// Format at reduced precision: `digits` in {2, 4, 6, 8, 10} total,
    /// split evenly between easting and northing, truncating.
    pub fn format_with_digits(&self, digits: usize) -> Result<String> {
        if !DIGITS.contains(&digits) {
            return Err(GridRefError::invalid(
                MgrsField::Precision,
                format!("{self} ({digits} digits)"),
            ));
        }
        let half = digits / 2;
        let divisor = 10u32.pow((5 - half) as u32);
        Ok(format!(
            "{:02}{} {}{} {:0w$} {:0w$}",
            self.zone,
            self.band,
            self.e100k,
            self.n100k,
            self.easting / divisor,
            self.northing / divisor,
            w = half
        ))
    }
}

impl FromStr for MgrsReference {
    type Err = GridRefError;

    /// Parse a reference such as `"31U DQ 48251 11932"` or `"31UDQ4825111932"`.
    ///
    /// Whitespace is ignored and letters may be in either case. The trailing
    /// digits are split evenly into easting and northing and right-padded to
    /// metres, so `"31U DQ 4811"` names 48000, 11000.
    fn from_str(s: &str) -> Result<Self> {
        let parse_err = |reason: &str| GridRefError::parsing(ReferenceKind::Mgrs, s, reason);
        let invalid = |field: MgrsField| GridRefError::invalid(field, s);

        let compact = remove_whitespace(s).to_uppercase();
        if compact.len() < 5 {
            return Err(parse_err("Too short"));
        }

        let zone_end = compact
            .find(|c: char| c.is_alphabetic())
            .ok_or_else(|| parse_err("Missing band and square letters"))?;
        let (zone, rest) = compact.split_at(zone_end);
        let zone: u8 = zone.parse().map_err(|_| invalid(MgrsField::Zone))?;

        let mut chars = rest.chars();
        let mut letter = || chars.next().filter(|c| c.is_alphabetic());
        let (Some(band), Some(e100k), Some(n100k)) = (letter(), letter(), letter()) else {
            return Err(parse_err("Expected band and two square letters"));
        };
        let digits = chars.as_str();

        if digits.len() % 2 != 0 {
            return Err(parse_err("Easting and northing should have equal length"));
        }
        if digits.len() > 10 {
            return Err(parse_err("Easting and northing are limited to 5 digits each"));
        }

        let mgrs = Self {
            zone,
            band,
            e100k,
            n100k,
            easting: 0,
            northing: 0,
        };
        mgrs.validate(s)?;

        if !digits.is_ascii() {
            return Err(invalid(MgrsField::Easting));
        }
        let (easting, northing) = digits.split_at(digits.len() / 2);
        let metres = |half: &str, field: MgrsField| {
            if !half.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid(field));
            }
            format!("{half:0<5}").parse::<u32>().map_err(|_| invalid(field))
        };

        Ok(Self {
            easting: metres(easting, MgrsField::Easting)?,
            northing: metres(northing, MgrsField::Northing)?,
            ..mgrs
        })
    }
}

impl fmt::Display for MgrsReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}{} {}{} {:05} {:05}",
            self.zone, self.band, self.e100k, self.n100k, self.easting, self.northing
        )
    }
}
