//! SVG length units
//!
//! Converts the unit suffix of numeric SVG attributes (`width="21cm"`) into
//! user units, where one user unit is one pixel at 90 dpi.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit suffix of an SVG length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvgUnit {
    /// Pixels, also used when no suffix is given
    #[default]
    Px,
    /// Points
    Pt,
    /// Picas
    Pc,
    /// Millimetres
    Mm,
    /// Centimetres
    Cm,
    /// Inches
    In,
}

impl SvgUnit {
    /// Number of user units in one of this unit
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Px => 1.0,
            Self::Pt => 1.25,
            Self::Pc => 15.0,
            Self::Mm => 3.543307,
            Self::Cm => 35.43307,
            Self::In => 90.0,
        }
    }

    /// Unit for a suffix, falling back to user units when unknown
    pub fn from_suffix(suffix: &str) -> Self {
        suffix.parse().unwrap_or_default()
    }

    /// Convert a value expressed in this unit to user units
    pub fn to_user_units(self, value: f64) -> f64 {
        value * self.multiplier()
    }
}

impl fmt::Display for SvgUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px => write!(f, "px"),
            Self::Pt => write!(f, "pt"),
            Self::Pc => write!(f, "pc"),
            Self::Mm => write!(f, "mm"),
            Self::Cm => write!(f, "cm"),
            Self::In => write!(f, "in"),
        }
    }
}

impl FromStr for SvgUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "px" => Ok(Self::Px),
            "pt" => Ok(Self::Pt),
            "pc" => Ok(Self::Pc),
            "mm" => Ok(Self::Mm),
            "cm" => Ok(Self::Cm),
            "in" => Ok(Self::In),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}
