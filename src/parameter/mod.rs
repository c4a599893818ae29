//! Parameter schemas and live parameter state
//!
//! Each catalog function declares a static table of [`ParameterSpec`]s. A
//! [`Parameters`] collection is built from that table when the function is
//! constructed and owns the mutable state (value, unit, bounds, free flag).

use serde::{Deserialize, Serialize};

use crate::units::{BaseUnit, Unit};
use crate::FunctionError;

/// How a parameter's unit follows from the units of the x and y axes
#[derive(Debug, Clone, Copy)]
pub enum UnitRule {
    /// Same unit as x (pivots, breaks, bounds, widths)
    X,
    /// Same unit as y (normalizations)
    Y,
    /// Integral over x of a y quantity
    XTimesY,
    /// Slope of y against x
    YOverX,
    /// Inverse of x (frequencies)
    InverseX,
    Dimensionless,
    /// Independent of the axes
    Fixed(&'static BaseUnit),
}

impl UnitRule {
    pub fn resolve(&self, x_unit: &Unit, y_unit: &Unit) -> Unit {
        match self {
            Self::X => x_unit.clone(),
            Self::Y => y_unit.clone(),
            Self::XTimesY => y_unit * x_unit,
            Self::YOverX => y_unit / x_unit,
            Self::InverseX => x_unit.inverse(),
            Self::Dimensionless => Unit::dimensionless(),
            Self::Fixed(base) => Unit::from(*base),
        }
    }
}

/// Static description of one parameter
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub initial: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Parameter starts fixed (not free in a fit)
    pub fix: bool,
    pub unit: UnitRule,
}

/// A named scalar owned by a function instance
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: &'static str,
    description: &'static str,
    value: f64,
    unit: Option<Unit>,
    free: bool,
    min: Option<f64>,
    max: Option<f64>,
}

impl Parameter {
    /// Create a parameter in its initial state
    pub fn from_spec(spec: &ParameterSpec) -> Self {
        let unit = match spec.unit {
            UnitRule::Fixed(base) => Some(Unit::from(base)),
            _ => None,
        };
        Self {
            name: spec.name,
            description: spec.description,
            value: spec.initial,
            unit,
            free: !spec.fix,
            min: spec.min,
            max: spec.max,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value, rejecting anything outside the bounds
    pub fn set_value(&mut self, value: f64) -> Result<(), FunctionError> {
        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);
        if below || above || value.is_nan() {
            return Err(FunctionError::OutOfBounds {
                name: self.name.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        self.value = value;
        Ok(())
    }

    pub fn unit(&self) -> Option<&Unit> {
        self.unit.as_ref()
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = Some(unit);
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn set_bounds(&mut self, min: Option<f64>, max: Option<f64>) {
        self.min = min;
        self.max = max;
    }

    pub fn is_free(&self) -> bool {
        self.free
    }

    pub fn fix(&mut self) {
        self.free = false;
    }

    pub fn free(&mut self) {
        self.free = true;
    }

    pub fn to_dict(&self, minimal: bool) -> ParameterDict {
        if minimal {
            return ParameterDict {
                name: self.name.to_string(),
                value: self.value,
                ..Default::default()
            };
        }
        ParameterDict {
            name: self.name.to_string(),
            value: self.value,
            desc: Some(self.description.to_string()),
            min_value: self.min,
            max_value: self.max,
            unit: self.unit.as_ref().map(|u| u.to_string()),
            free: Some(self.free),
        }
    }
}

/// Serialized form of a [`Parameter`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDict {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<bool>,
}

/// Ordered parameters of one function instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    params: Vec<Parameter>,
}

impl Parameters {
    pub fn from_schema(schema: &[ParameterSpec]) -> Self {
        Self {
            params: schema.iter().map(Parameter::from_spec).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.name == name)
    }

    /// Current values in positional order
    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.value).collect()
    }

    /// Set all values in positional order. Nothing is changed on error.
    pub fn set_values(&mut self, values: &[f64]) -> Result<(), FunctionError> {
        if values.len() != self.params.len() {
            return Err(FunctionError::ParameterCount {
                expected: self.params.len(),
                got: values.len(),
            });
        }
        let mut updated = self.params.clone();
        for (param, &value) in updated.iter_mut().zip(values) {
            param.set_value(value)?;
        }
        self.params = updated;
        Ok(())
    }

    /// Assign each parameter the unit its rule derives from the axes units
    pub fn assign_units(&mut self, schema: &[ParameterSpec], x_unit: &Unit, y_unit: &Unit) {
        for spec in schema {
            if let Some(param) = self.get_mut(spec.name) {
                param.set_unit(spec.unit.resolve(x_unit, y_unit));
            }
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.params.iter().map(|p| p.name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
