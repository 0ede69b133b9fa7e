//! Ordnance Survey National Grid references.
//!
//! References are written either with a two-letter 100 km square descriptor
//! (`TG 51409 13177`) or as a plain easting/northing pair (`651409,313177`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::angle::remove_whitespace;
use crate::error::{GridRefError, OsGridField, ReferenceKind, Result};
use crate::geodetic::GeodeticPoint;
use crate::proj::national_grid::NationalGrid;
use crate::proj::Projection;

/// Extent of the grid (metres from the false origin at square SV).
pub const MAX_EASTING: f64 = 700_000.0;
pub const MAX_NORTHING: f64 = 1_300_000.0;

const SQUARE: f64 = 100_000.0;
/// Largest total digit count accepted for lettered references (millimetres).
const MAX_DIGITS: usize = 16;

/// Index of a grid letter in the 25-letter alphabet that omits 'I'.
fn letter_index(c: char) -> Option<u32> {
    if !c.is_ascii_uppercase() || c == 'I' {
        return None;
    }
    let i = c as u32 - 'A' as u32;
    Some(if i > 7 { i - 1 } else { i })
}

fn index_letter(i: u32) -> char {
    let i = if i > 7 { i + 1 } else { i };
    char::from(b'A' + i as u8)
}

/// Grid letters for the 100 km square containing a position.
fn square_letters(easting: f64, northing: f64) -> String {
    let e100km = (easting / SQUARE).floor() as u32;
    let n100km = (northing / SQUARE).floor() as u32;

    // numbered from the 500 km square V at the false origin
    let rows = 19 - n100km;
    let l1 = rows - rows % 5 + (e100km + 10) / 5;
    let l2 = rows * 5 % 25 + e100km % 5;

    [index_letter(l1), index_letter(l2)].iter().collect()
}

/// Integer part padded to six digits, up to three decimals.
fn numeric(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text.split_once('.') {
        Some((whole, frac)) => format!("{whole:0>6}.{frac}"),
        None => format!("{text:0>6}"),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOsGrid")]
pub struct OsGridRef {
    descriptor: Option<String>,
    easting: f64,
    northing: f64,
}

#[derive(Deserialize)]
struct RawOsGrid {
    #[serde(default)]
    descriptor: Option<String>,
    easting: f64,
    northing: f64,
}

impl TryFrom<RawOsGrid> for OsGridRef {
    type Error = GridRefError;

    fn try_from(raw: RawOsGrid) -> Result<Self> {
        let mut grid = Self::new(raw.easting, raw.northing)?;
        grid.descriptor = raw.descriptor;
        Ok(grid)
    }
}

impl OsGridRef {
    /// A reference from metres east and north of the false origin.
    pub fn new(easting: f64, northing: f64) -> Result<Self> {
        let reference = format!("{easting},{northing}");
        if !(0.0..=MAX_EASTING).contains(&easting) {
            return Err(GridRefError::invalid(OsGridField::Easting, reference));
        }
        if !(0.0..=MAX_NORTHING).contains(&northing) {
            return Err(GridRefError::invalid(OsGridField::Northing, reference));
        }
        Ok(Self {
            descriptor: None,
            easting,
            northing,
        })
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// The grid letters the reference was written with, if it was parsed from one.
    pub fn descriptor(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    /// Letters of the 100 km square containing the reference.
    pub fn grid_letters(&self) -> String {
        square_letters(self.easting, self.northing)
    }

    /// Project a point on Airy 1830, rounding to the millimetre.
    pub fn from_geodetic(point: &GeodeticPoint) -> Result<Self> {
        let grid = NationalGrid::new();
        let (e, n) = grid.forward(
            point.longitude().to_radians(),
            point.latitude().to_radians(),
        )?;
        let round_mm = |v: f64| (v * 1000.0).round() / 1000.0;
        Self::new(round_mm(e), round_mm(n)).map_err(|err| match err.field() {
            Some(field) => GridRefError::invalid(field, point.to_string()),
            None => err,
        })
    }

    /// Inverse projection; the result is on Airy 1830.
    pub fn to_geodetic(&self) -> Result<GeodeticPoint> {
        let grid = NationalGrid::new();
        let (lon, lat) = grid.inverse(self.easting, self.northing)?;
        Ok(GeodeticPoint::new(lat.to_degrees(), lon.to_degrees(), 0.0))
    }

    /// Format with `digits` digits in total, split between easting and northing
    /// and truncated within the 100 km square.
    ///
    /// `digits` must be even and at most 16; 0 gives the plain numeric form.
    pub fn to_string_with_digits(&self, digits: usize) -> Result<String> {
        if digits % 2 != 0 || digits > MAX_DIGITS {
            return Err(GridRefError::invalid(
                OsGridField::Precision,
                format!("{},{} ({digits} digits)", self.easting, self.northing),
            ));
        }
        Ok(self.format_digits(digits))
    }

    fn format_digits(&self, digits: usize) -> String {
        if digits == 0 {
            return format!("{},{}", numeric(self.easting), numeric(self.northing));
        }

        let half = digits / 2;
        let scale = 10f64.powi(5 - half as i32);
        let truncate = |v: f64| (v.rem_euclid(SQUARE) / scale).floor() as u64;

        format!(
            "{} {:0w$} {:0w$}",
            self.grid_letters(),
            truncate(self.easting),
            truncate(self.northing),
            w = half
        )
    }

    fn parse_numeric(s: &str) -> Result<Self> {
        let parse_err = |reason: &str| GridRefError::parsing(ReferenceKind::OsGrid, s, reason);

        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let &[easting, northing] = parts.as_slice() else {
            return Err(parse_err("Expected easting and northing"));
        };

        let number = |token: &str| {
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| parse_err("Easting and northing should be numbers"))
        };
        let (easting, northing) = (number(easting)?, number(northing)?);

        Self::new(easting, northing).map_err(|err| match err.field() {
            Some(field) => GridRefError::invalid(field, s),
            None => err,
        })
    }

    /// Parse a lettered reference such as `"TG 51409 13177"`.
    ///
    /// First letters H, N, O, S and T are accepted. H is included beyond the
    /// customary N..T range so the Shetland squares written by
    /// [`OsGridRef::grid_letters`] parse back.
    fn parse_lettered(s: &str) -> Result<Self> {
        let parse_err = |reason: &str| GridRefError::parsing(ReferenceKind::OsGrid, s, reason);
        let invalid = |field: OsGridField| GridRefError::invalid(field, s);

        let compact = remove_whitespace(s).to_uppercase();
        let mut chars = compact.chars();
        let (Some(c1), Some(c2)) = (chars.next(), chars.next()) else {
            return Err(parse_err("Missing grid letters"));
        };
        let digits = chars.as_str();

        let (Some(l1), Some(l2)) = (letter_index(c1), letter_index(c2)) else {
            return Err(invalid(OsGridField::GridLetters));
        };
        // H, N, O, S and T are the only first letters within the grid
        if !(7..=18).contains(&l1) {
            return Err(parse_err("Grid square outside the National Grid"));
        }

        if digits.len() % 2 != 0 {
            return Err(parse_err("Easting and northing should have equal length"));
        }
        if digits.len() > MAX_DIGITS {
            return Err(parse_err("Too many digits"));
        }

        let e100km = ((l1 - 2) % 5) * 5 + l2 % 5;
        let n100km = 19 - (l1 / 5) * 5 - l2 / 5;

        let (easting, northing) = digits.split_at(digits.len() / 2);
        // five digits are metres; any further digits are fractions of a metre
        let metres = |half: &str, field: OsGridField| {
            if !half.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid(field));
            }
            let text = if half.len() > 5 {
                format!("{}.{}", &half[..5], &half[5..])
            } else {
                format!("{half:0<5}")
            };
            text.parse::<f64>().map_err(|_| invalid(field))
        };

        let easting = f64::from(e100km) * SQUARE + metres(easting, OsGridField::Easting)?;
        let northing = f64::from(n100km) * SQUARE + metres(northing, OsGridField::Northing)?;

        let mut grid = Self::new(easting, northing).map_err(|err| match err.field() {
            Some(field) => GridRefError::invalid(field, s),
            None => err,
        })?;
        grid.descriptor = Some(compact[..2].to_string());
        Ok(grid)
    }
}

impl FromStr for OsGridRef {
    type Err = GridRefError;

    /// Parse `"TG 51409 13177"`, `"TG5140913177"` or `"651409,313177"`.
    fn from_str(s: &str) -> Result<Self> {
        let numeric = s
            .trim_start()
            .starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.');
        if numeric {
            Self::parse_numeric(s)
        } else if s.is_ascii() {
            Self::parse_lettered(s)
        } else {
            Err(GridRefError::invalid(OsGridField::GridLetters, s))
        }
    }
}

impl fmt::Display for OsGridRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_digits(10))
    }
}
