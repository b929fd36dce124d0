//! Unit conversion between SI base units and display units
//!
//! Angles are stored in radians and lengths in meters. Display units are
//! closed enums, so a unit can only be paired with the mode it belongs to;
//! string-keyed input goes through [`Mode::parse_unit`], which rejects
//! mismatches instead of guessing.
//!
//! Conversion never rounds or clamps. Callers that need a fixed precision or
//! a bounded range apply [`DisplayPolicy`] explicitly.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;
use thiserror::Error;

/// Physical quantity a value measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Angle,
    Length,
}

impl Mode {
    /// Units available for this mode
    pub fn units(&self) -> &'static [Unit] {
        match self {
            Mode::Angle => &[Unit::Angle(AngleUnit::Deg), Unit::Angle(AngleUnit::Rad)],
            Mode::Length => &[
                Unit::Length(LengthUnit::Mm),
                Unit::Length(LengthUnit::Cm),
                Unit::Length(LengthUnit::M),
            ],
        }
    }

    /// Unit keys accepted for this mode
    pub fn unit_keys(&self) -> &'static str {
        match self {
            Mode::Angle => "deg, rad",
            Mode::Length => "mm, cm, m",
        }
    }

    /// SI base unit for this mode
    pub fn si_unit(&self) -> Unit {
        match self {
            Mode::Angle => Unit::Angle(AngleUnit::Rad),
            Mode::Length => Unit::Length(LengthUnit::M),
        }
    }

    /// Parse a unit key and require it to belong to this mode
    pub fn parse_unit(&self, key: &str) -> Result<Unit, UnitError> {
        let unit: Unit = key.parse()?;
        unit.expect_mode(*self)?;
        Ok(unit)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Angle => write!(f, "angle"),
            Mode::Length => write!(f, "length"),
        }
    }
}

/// Display units for angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Deg,
    Rad,
}

impl AngleUnit {
    /// Convert a value in this unit to radians
    pub fn to_si(self, value: f64) -> f64 {
        match self {
            AngleUnit::Deg => value * PI / 180.0,
            AngleUnit::Rad => value,
        }
    }

    /// Convert radians to this unit
    pub fn from_si(self, value: f64) -> f64 {
        match self {
            AngleUnit::Deg => value * 180.0 / PI,
            AngleUnit::Rad => value,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AngleUnit::Deg => "deg",
            AngleUnit::Rad => "rad",
        }
    }
}

impl std::fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AngleUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Unit>()? {
            Unit::Angle(unit) => Ok(unit),
            other => Err(UnitError::mode_mismatch(other, Mode::Angle)),
        }
    }
}

/// Display units for lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Mm,
    Cm,
    M,
}

impl LengthUnit {
    /// Convert a value in this unit to meters
    pub fn to_si(self, value: f64) -> f64 {
        match self {
            LengthUnit::Mm => value / 1000.0,
            LengthUnit::Cm => value / 100.0,
            LengthUnit::M => value,
        }
    }

    /// Convert meters to this unit
    pub fn from_si(self, value: f64) -> f64 {
        match self {
            LengthUnit::Mm => value * 1000.0,
            LengthUnit::Cm => value * 100.0,
            LengthUnit::M => value,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Unit>()? {
            Unit::Length(unit) => Ok(unit),
            other => Err(UnitError::mode_mismatch(other, Mode::Length)),
        }
    }
}

/// Any display unit, tagged with its mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Angle(AngleUnit),
    Length(LengthUnit),
}

impl Unit {
    pub fn mode(&self) -> Mode {
        match self {
            Unit::Angle(_) => Mode::Angle,
            Unit::Length(_) => Mode::Length,
        }
    }

    pub fn to_si(self, value: f64) -> f64 {
        match self {
            Unit::Angle(unit) => unit.to_si(value),
            Unit::Length(unit) => unit.to_si(value),
        }
    }

    pub fn from_si(self, value: f64) -> f64 {
        match self {
            Unit::Angle(unit) => unit.from_si(value),
            Unit::Length(unit) => unit.from_si(value),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Angle(unit) => unit.as_str(),
            Unit::Length(unit) => unit.as_str(),
        }
    }

    fn expect_mode(&self, mode: Mode) -> Result<(), UnitError> {
        if self.mode() == mode {
            Ok(())
        } else {
            Err(UnitError::mode_mismatch(*self, mode))
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deg" => Ok(Unit::Angle(AngleUnit::Deg)),
            "rad" => Ok(Unit::Angle(AngleUnit::Rad)),
            "mm" => Ok(Unit::Length(LengthUnit::Mm)),
            "cm" => Ok(Unit::Length(LengthUnit::Cm)),
            "m" => Ok(Unit::Length(LengthUnit::M)),
            _ => Err(UnitError::UnknownUnit(s.to_string())),
        }
    }
}

impl From<AngleUnit> for Unit {
    fn from(unit: AngleUnit) -> Self {
        Unit::Angle(unit)
    }
}

impl From<LengthUnit> for Unit {
    fn from(unit: LengthUnit) -> Self {
        Unit::Length(unit)
    }
}

/// Errors from unit lookup
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum UnitError {
    #[error("Unknown unit '{0}'")]
    #[diagnostic(
        code(tendo::units::unknown),
        help("supported units: deg, rad (angle); mm, cm, m (length)")
    )]
    UnknownUnit(String),

    #[error("Unit '{unit}' is not a {mode} unit")]
    #[diagnostic(code(tendo::units::mode_mismatch), help("{mode} units: {valid}"))]
    ModeMismatch {
        unit: Unit,
        mode: Mode,
        valid: &'static str,
    },
}

impl UnitError {
    pub fn mode_mismatch(unit: Unit, mode: Mode) -> Self {
        UnitError::ModeMismatch {
            unit,
            mode,
            valid: mode.unit_keys(),
        }
    }
}

/// Convert a display value to its SI representation
pub fn convert_to_si(value: f64, unit: Unit, mode: Mode) -> Result<f64, UnitError> {
    unit.expect_mode(mode)?;
    Ok(unit.to_si(value))
}

/// Convert an SI value to the given display unit
pub fn convert_from_si(value: f64, unit: Unit, mode: Mode) -> Result<f64, UnitError> {
    unit.expect_mode(mode)?;
    Ok(unit.from_si(value))
}

/// Most decimal places an f64 can meaningfully show
pub const MAX_PRECISION: u32 = 15;

/// Round to a fixed number of decimal places, at most [`MAX_PRECISION`]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_PRECISION) as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Clamp into `[min, max]`; bounds given in either order
pub fn clamp_to(value: f64, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    value.clamp(lo, hi)
}

/// Presentation rules applied after conversion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayPolicy {
    /// Decimal places to keep, `None` keeps full precision
    pub precision: Option<u32>,
    /// Inclusive range to clamp into
    pub range: Option<(f64, f64)>,
}

impl DisplayPolicy {
    pub fn with_precision(mut self, decimals: u32) -> Self {
        self.precision = Some(decimals.min(MAX_PRECISION));
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Clamp first, then round
    pub fn apply(&self, value: f64) -> f64 {
        let value = match self.range {
            Some((min, max)) => clamp_to(value, min, max),
            None => value,
        };
        match self.precision {
            Some(decimals) => round_to(value, decimals),
            None => value,
        }
    }
}
