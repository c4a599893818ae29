//! Dimensional analysis for parameter units
//!
//! A [`Unit`] is a product of registered [`BaseUnit`]s raised to integer
//! powers, e.g. `keV-1 cm-2 s-1`. Only the operations the catalog needs are
//! provided: products, quotients, powers, compatibility checks and
//! conversion factors.

mod system;

pub use system::{get_units, set_units, UnitSystem};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Div, Mul};

use crate::FunctionError;

/// Exponents of the base dimensions: length, mass, time, current, angle
pub type Dimensions = [i32; 5];

const NONE: Dimensions = [0, 0, 0, 0, 0];
const LENGTH: Dimensions = [1, 0, 0, 0, 0];
const MASS: Dimensions = [0, 1, 0, 0, 0];
const TIME: Dimensions = [0, 0, 1, 0, 0];
const ENERGY: Dimensions = [2, 1, -2, 0, 0];
const FREQUENCY: Dimensions = [0, 0, -1, 0, 0];
const MAGNETIC_FIELD: Dimensions = [0, 1, -2, -1, 0];
const ANGLE: Dimensions = [0, 0, 0, 0, 1];
const AREA: Dimensions = [2, 0, 0, 0, 0];

/// A named unit with its SI scale and dimensions
#[derive(Debug, PartialEq)]
pub struct BaseUnit {
    pub symbol: &'static str,
    /// Size of one unit in SI (radian for angles)
    pub scale: f64,
    pub dimensions: Dimensions,
}

const EV_IN_J: f64 = 1.602176634e-19;
const PC_IN_M: f64 = 3.0856775814913673e16;

pub const METER: BaseUnit = BaseUnit { symbol: "m", scale: 1.0, dimensions: LENGTH };
pub const CENTIMETER: BaseUnit = BaseUnit { symbol: "cm", scale: 1e-2, dimensions: LENGTH };
pub const KILOMETER: BaseUnit = BaseUnit { symbol: "km", scale: 1e3, dimensions: LENGTH };
pub const PARSEC: BaseUnit = BaseUnit { symbol: "pc", scale: PC_IN_M, dimensions: LENGTH };
pub const KILOPARSEC: BaseUnit = BaseUnit { symbol: "kpc", scale: PC_IN_M * 1e3, dimensions: LENGTH };
pub const MEGAPARSEC: BaseUnit = BaseUnit { symbol: "Mpc", scale: PC_IN_M * 1e6, dimensions: LENGTH };
pub const SECOND: BaseUnit = BaseUnit { symbol: "s", scale: 1.0, dimensions: TIME };
pub const MILLISECOND: BaseUnit = BaseUnit { symbol: "ms", scale: 1e-3, dimensions: TIME };
pub const KILOGRAM: BaseUnit = BaseUnit { symbol: "kg", scale: 1.0, dimensions: MASS };
pub const GRAM: BaseUnit = BaseUnit { symbol: "g", scale: 1e-3, dimensions: MASS };
pub const JOULE: BaseUnit = BaseUnit { symbol: "J", scale: 1.0, dimensions: ENERGY };
pub const ERG: BaseUnit = BaseUnit { symbol: "erg", scale: 1e-7, dimensions: ENERGY };
pub const ELECTRONVOLT: BaseUnit = BaseUnit { symbol: "eV", scale: EV_IN_J, dimensions: ENERGY };
pub const KILOELECTRONVOLT: BaseUnit = BaseUnit { symbol: "keV", scale: EV_IN_J * 1e3, dimensions: ENERGY };
pub const MEGAELECTRONVOLT: BaseUnit = BaseUnit { symbol: "MeV", scale: EV_IN_J * 1e6, dimensions: ENERGY };
pub const GIGAELECTRONVOLT: BaseUnit = BaseUnit { symbol: "GeV", scale: EV_IN_J * 1e9, dimensions: ENERGY };
pub const TERAELECTRONVOLT: BaseUnit = BaseUnit { symbol: "TeV", scale: EV_IN_J * 1e12, dimensions: ENERGY };
pub const HERTZ: BaseUnit = BaseUnit { symbol: "Hz", scale: 1.0, dimensions: FREQUENCY };
pub const TESLA: BaseUnit = BaseUnit { symbol: "T", scale: 1.0, dimensions: MAGNETIC_FIELD };
pub const GAUSS: BaseUnit = BaseUnit { symbol: "G", scale: 1e-4, dimensions: MAGNETIC_FIELD };
pub const RADIAN: BaseUnit = BaseUnit { symbol: "rad", scale: 1.0, dimensions: ANGLE };
pub const DEGREE: BaseUnit = BaseUnit { symbol: "deg", scale: std::f64::consts::PI / 180.0, dimensions: ANGLE };

static REGISTRY: [&BaseUnit; 22] = [
    &METER,
    &CENTIMETER,
    &KILOMETER,
    &PARSEC,
    &KILOPARSEC,
    &MEGAPARSEC,
    &SECOND,
    &MILLISECOND,
    &KILOGRAM,
    &GRAM,
    &JOULE,
    &ERG,
    &ELECTRONVOLT,
    &KILOELECTRONVOLT,
    &MEGAELECTRONVOLT,
    &GIGAELECTRONVOLT,
    &TERAELECTRONVOLT,
    &HERTZ,
    &TESLA,
    &GAUSS,
    &RADIAN,
    &DEGREE,
];

/// Look up a registered base unit by symbol
pub fn lookup(symbol: &str) -> Option<&'static BaseUnit> {
    REGISTRY.iter().copied().find(|base| base.symbol == symbol)
}

/// Coarse classification of a unit by its dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalType {
    Dimensionless,
    Length,
    Area,
    Time,
    Mass,
    Energy,
    Frequency,
    MagneticField,
    Angle,
    Unknown,
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dimensionless => "dimensionless",
            Self::Length => "length",
            Self::Area => "area",
            Self::Time => "time",
            Self::Mass => "mass",
            Self::Energy => "energy",
            Self::Frequency => "frequency",
            Self::MagneticField => "magnetic flux density",
            Self::Angle => "angle",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy)]
struct Term {
    base: &'static BaseUnit,
    power: i32,
}

/// A product of base units with integer powers.
///
/// The empty product is the dimensionless, unscaled unit.
#[derive(Debug, Clone, Default)]
pub struct Unit {
    terms: Vec<Term>,
}

impl Unit {
    /// The dimensionless, unscaled unit
    pub fn dimensionless() -> Self {
        Self::default()
    }

    /// Parse a space-separated product of symbols with optional integer powers,
    /// e.g. `"keV-1 cm-2 s-1"`. The empty string is dimensionless.
    pub fn parse(text: &str) -> Result<Self, FunctionError> {
        let text = text.trim();
        if text.is_empty() || text == "dimensionless" {
            return Ok(Self::dimensionless());
        }

        let mut unit = Self::dimensionless();
        for token in text.split_whitespace() {
            let split = token
                .find(|c: char| c == '-' || c == '+' || c.is_ascii_digit())
                .unwrap_or(token.len());
            let (symbol, power) = token.split_at(split);
            let base = lookup(symbol).ok_or_else(|| FunctionError::UnknownUnit(token.to_string()))?;
            let power = if power.is_empty() {
                1
            } else {
                power
                    .parse::<i32>()
                    .map_err(|_| FunctionError::UnknownUnit(token.to_string()))?
            };
            unit.push(Term { base, power });
        }
        Ok(unit)
    }

    fn push(&mut self, term: Term) {
        match self.terms.iter_mut().find(|t| t.base.symbol == term.base.symbol) {
            Some(existing) => existing.power += term.power,
            None => self.terms.push(term),
        }
        self.terms.retain(|t| t.power != 0);
    }

    /// Size of this unit in SI base units
    pub fn scale(&self) -> f64 {
        self.terms
            .iter()
            .map(|t| t.base.scale.powi(t.power))
            .product()
    }

    pub fn dimensions(&self) -> Dimensions {
        let mut dims = NONE;
        for term in &self.terms {
            for (d, b) in dims.iter_mut().zip(term.base.dimensions.iter()) {
                *d += b * term.power;
            }
        }
        dims
    }

    pub fn powi(&self, power: i32) -> Self {
        let mut unit = Self::dimensionless();
        for term in &self.terms {
            unit.push(Term {
                base: term.base,
                power: term.power * power,
            });
        }
        unit
    }

    pub fn inverse(&self) -> Self {
        self.powi(-1)
    }

    /// True when the unit has no dimensions, regardless of its scale
    pub fn is_dimensionless(&self) -> bool {
        self.dimensions() == NONE
    }

    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Factor `f` such that `value [self] == value * f [to]`
    pub fn conversion_factor(&self, to: &Unit) -> Result<f64, FunctionError> {
        if !self.is_compatible(to) {
            return Err(FunctionError::IncompatibleUnits {
                from: self.to_string(),
                to: to.to_string(),
            });
        }
        Ok(self.scale() / to.scale())
    }

    pub fn physical_type(&self) -> PhysicalType {
        match self.dimensions() {
            NONE => PhysicalType::Dimensionless,
            LENGTH => PhysicalType::Length,
            AREA => PhysicalType::Area,
            TIME => PhysicalType::Time,
            MASS => PhysicalType::Mass,
            ENERGY => PhysicalType::Energy,
            FREQUENCY => PhysicalType::Frequency,
            MAGNETIC_FIELD => PhysicalType::MagneticField,
            ANGLE => PhysicalType::Angle,
            _ => PhysicalType::Unknown,
        }
    }
}

impl From<&'static BaseUnit> for Unit {
    fn from(base: &'static BaseUnit) -> Self {
        Self {
            terms: vec![Term { base, power: 1 }],
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        if self.dimensions() != other.dimensions() {
            return false;
        }
        let (a, b) = (self.scale(), other.scale());
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for term in &self.terms {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if term.power == 1 {
                write!(f, "{}", term.base.symbol)?;
            } else {
                write!(f, "{}{}", term.base.symbol, term.power)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Unit {
    type Err = FunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Mul<&Unit> for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        let mut unit = self.clone();
        for term in &rhs.terms {
            unit.push(*term);
        }
        unit
    }
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Unit {
        &self * &rhs
    }
}

impl Div<&Unit> for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self * &rhs.inverse()
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Unit {
        &self / &rhs
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Unit::parse(&text).map_err(serde::de::Error::custom)
    }
}
