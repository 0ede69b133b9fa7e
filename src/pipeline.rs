//! Conversion entry points: parse a reference of one kind and produce another.
//!
//! Every conversion routes through [`GeodeticPoint`], apart from UTM and MGRS
//! which convert between each other directly.

use std::fmt;

use serde::Serialize;

use crate::cartesian::CartesianPoint;
use crate::error::{ReferenceKind, Result};
use crate::geodetic::GeodeticPoint;
use crate::mgrs::MgrsReference;
use crate::osgrid::OsGridRef;
use crate::utm::UtmReference;

/// A position in one of the supported representations.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Reference {
    Geodetic(GeodeticPoint),
    Cartesian(CartesianPoint),
    Utm(UtmReference),
    Mgrs(MgrsReference),
    OsGrid(OsGridRef),
}

impl Reference {
    /// Parse `input` as a reference of the given kind.
    pub fn parse(kind: ReferenceKind, input: &str) -> Result<Self> {
        Ok(match kind {
            ReferenceKind::Geodetic => Self::Geodetic(input.parse()?),
            ReferenceKind::Cartesian => Self::Cartesian(input.parse()?),
            ReferenceKind::Utm => Self::Utm(input.parse()?),
            ReferenceKind::Mgrs => Self::Mgrs(input.parse()?),
            ReferenceKind::OsGrid => Self::OsGrid(input.parse()?),
        })
    }

    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Geodetic(_) => ReferenceKind::Geodetic,
            Self::Cartesian(_) => ReferenceKind::Cartesian,
            Self::Utm(_) => ReferenceKind::Utm,
            Self::Mgrs(_) => ReferenceKind::Mgrs,
            Self::OsGrid(_) => ReferenceKind::OsGrid,
        }
    }

    pub fn to_geodetic(&self) -> Result<GeodeticPoint> {
        Ok(match self {
            Self::Geodetic(p) => *p,
            Self::Cartesian(c) => c.to_geodetic(),
            Self::Utm(u) => u.to_geodetic(),
            Self::Mgrs(m) => m.to_geodetic(),
            Self::OsGrid(g) => g.to_geodetic()?,
        })
    }

    /// Express a geodetic point as the given kind.
    pub fn from_geodetic(point: &GeodeticPoint, kind: ReferenceKind) -> Result<Self> {
        Ok(match kind {
            ReferenceKind::Geodetic => Self::Geodetic(*point),
            ReferenceKind::Cartesian => Self::Cartesian(point.to_cartesian()),
            ReferenceKind::Utm => Self::Utm(point.to_utm()?),
            ReferenceKind::Mgrs => Self::Mgrs(point.to_mgrs()?),
            ReferenceKind::OsGrid => Self::OsGrid(point.to_os_grid()?),
        })
    }

    /// Convert to another kind. Converting to the same kind returns a copy.
    pub fn convert(&self, to: ReferenceKind) -> Result<Self> {
        match (self, to) {
            (r, to) if r.kind() == to => Ok(r.clone()),
            (Self::Utm(u), ReferenceKind::Mgrs) => Ok(Self::Mgrs(u.to_mgrs()?)),
            (Self::Mgrs(m), ReferenceKind::Utm) => Ok(Self::Utm(m.to_utm())),
            (r, to) => {
                let point = r.to_geodetic()?;
                log::trace!("{} -> {point} -> {}", r.kind(), to);
                Self::from_geodetic(&point, to)
            }
        }
    }

    /// Format at the given precision.
    ///
    /// For UTM, geodetic and cartesian values `digits` is the number of
    /// decimal places; for MGRS and OS grid references it is the total number
    /// of easting and northing digits. `None` uses the canonical form.
    pub fn format(&self, digits: Option<usize>) -> Result<String> {
        let Some(digits) = digits else {
            return Ok(self.to_string());
        };
        Ok(match self {
            Self::Geodetic(p) => {
                let mut text = format!("{:.*}, {:.*}", digits, p.latitude(), digits, p.longitude());
                if p.height() != 0.0 {
                    text.push_str(&format!(", {:.*}", digits, p.height()));
                }
                text
            }
            Self::Cartesian(c) => format!(
                "[{:.*}, {:.*}, {:.*}]",
                digits,
                c.x(),
                digits,
                c.y(),
                digits,
                c.z()
            ),
            Self::Utm(u) => u.format_with_digits(digits),
            Self::Mgrs(m) => m.format_with_digits(digits)?,
            Self::OsGrid(g) => g.to_string_with_digits(digits)?,
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geodetic(p) => fmt::Display::fmt(p, f),
            Self::Cartesian(c) => fmt::Display::fmt(c, f),
            Self::Utm(u) => fmt::Display::fmt(u, f),
            Self::Mgrs(m) => fmt::Display::fmt(m, f),
            Self::OsGrid(g) => fmt::Display::fmt(g, f),
        }
    }
}

impl From<GeodeticPoint> for Reference {
    fn from(p: GeodeticPoint) -> Self {
        Self::Geodetic(p)
    }
}

impl From<CartesianPoint> for Reference {
    fn from(c: CartesianPoint) -> Self {
        Self::Cartesian(c)
    }
}

impl From<UtmReference> for Reference {
    fn from(u: UtmReference) -> Self {
        Self::Utm(u)
    }
}

impl From<MgrsReference> for Reference {
    fn from(m: MgrsReference) -> Self {
        Self::Mgrs(m)
    }
}

impl From<OsGridRef> for Reference {
    fn from(g: OsGridRef) -> Self {
        Self::OsGrid(g)
    }
}

/// Parse `input` as a `from` reference and convert it to `to`.
pub fn convert(input: &str, from: ReferenceKind, to: ReferenceKind) -> Result<Reference> {
    Reference::parse(from, input)?.convert(to)
}
