use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridRefError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridRefError {
    /// The input does not have the token structure of its reference type.
    #[error("Unable to parse {kind} reference '{reference}': {reason}")]
    Parsing {
        kind: ReferenceKind,
        reference: String,
        reason: String,
    },

    /// The input is structurally sound but one field lies outside its domain.
    #[error("Invalid {kind} property: {field} - {reference}")]
    InvalidField {
        kind: ReferenceKind,
        field: Field,
        reference: String,
    },
}

impl GridRefError {
    pub(crate) fn parsing(
        kind: ReferenceKind,
        reference: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Parsing {
            kind,
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(field: impl Into<Field>, reference: impl Into<String>) -> Self {
        let field = field.into();
        Self::InvalidField {
            kind: field.kind(),
            field,
            reference: reference.into(),
        }
    }

    /// The reference type the failing input was meant to be.
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Parsing { kind, .. } | Self::InvalidField { kind, .. } => *kind,
        }
    }

    /// The offending field, for [`GridRefError::InvalidField`].
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::InvalidField { field, .. } => Some(*field),
            Self::Parsing { .. } => None,
        }
    }
}

/// The coordinate representations understood by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Geodetic,
    Cartesian,
    Utm,
    Mgrs,
    OsGrid,
}

impl ReferenceKind {
    /// Parse from a (case-insensitive) name, accepting the usual aliases.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "geodetic" | "latlon" | "latlong" | "lla" => Some(Self::Geodetic),
            "cartesian" | "ecef" | "xyz" => Some(Self::Cartesian),
            "utm" => Some(Self::Utm),
            "mgrs" => Some(Self::Mgrs),
            "osgrid" | "osgb" | "osgridref" | "bng" => Some(Self::OsGrid),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Geodetic => "Geodetic",
            Self::Cartesian => "Cartesian",
            Self::Utm => "UTM",
            Self::Mgrs => "MGRS",
            Self::OsGrid => "OSGridRef",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeodeticField {
    Latitude,
    Longitude,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UtmField {
    Zone,
    Hemisphere,
    Easting,
    Northing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MgrsField {
    Zone,
    Band,
    E100k,
    N100k,
    Easting,
    Northing,
    Precision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsGridField {
    GridLetters,
    Easting,
    Northing,
    Precision,
}

/// Identifies the field that failed validation, scoped to its reference type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Geodetic(GeodeticField),
    Utm(UtmField),
    Mgrs(MgrsField),
    OsGrid(OsGridField),
}

impl Field {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Geodetic(_) => ReferenceKind::Geodetic,
            Self::Utm(_) => ReferenceKind::Utm,
            Self::Mgrs(_) => ReferenceKind::Mgrs,
            Self::OsGrid(_) => ReferenceKind::OsGrid,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Geodetic(GeodeticField::Latitude) => "LATITUDE",
            Self::Geodetic(GeodeticField::Longitude) => "LONGITUDE",
            Self::Utm(UtmField::Zone) | Self::Mgrs(MgrsField::Zone) => "ZONE",
            Self::Utm(UtmField::Hemisphere) => "HEMISPHERE",
            Self::Utm(UtmField::Easting)
            | Self::Mgrs(MgrsField::Easting)
            | Self::OsGrid(OsGridField::Easting) => "EASTING",
            Self::Utm(UtmField::Northing)
            | Self::Mgrs(MgrsField::Northing)
            | Self::OsGrid(OsGridField::Northing) => "NORTHING",
            Self::Mgrs(MgrsField::Band) => "BAND",
            Self::Mgrs(MgrsField::E100k) => "E100K",
            Self::Mgrs(MgrsField::N100k) => "N100K",
            Self::Mgrs(MgrsField::Precision) | Self::OsGrid(OsGridField::Precision) => {
                "PRECISION"
            }
            Self::OsGrid(OsGridField::GridLetters) => "GRID LETTERS",
        };
        f.write_str(name)
    }
}

impl From<GeodeticField> for Field {
    fn from(f: GeodeticField) -> Self {
        Self::Geodetic(f)
    }
}

impl From<UtmField> for Field {
    fn from(f: UtmField) -> Self {
        Self::Utm(f)
    }
}

impl From<MgrsField> for Field {
    fn from(f: MgrsField) -> Self {
        Self::Mgrs(f)
    }
}

impl From<OsGridField> for Field {
    fn from(f: OsGridField) -> Self {
        Self::OsGrid(f)
    }
}
