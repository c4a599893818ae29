//! Catalog of spectral and generic fit functions
//!
//! Every function owns its [`Parameters`] and exposes the same surface:
//!
//! - [`Function::set_units`] assigns each parameter a unit derived from the
//!   units of the x and y axes.
//! - [`Function::evaluate`] maps an input array and a positional slice of
//!   parameter values to an output array of the same shape.
//! - [`Function::to_dict`] produces the serializable [`FunctionDict`].
//!
//! # Example
//!
//! ```ignore
//! use fluxmodels::prelude::*;
//! use fluxmodels::prelude::functions::PowerLaw;
//!
//! let mut powerlaw = PowerLaw::new();
//! powerlaw.set_units(&Unit::parse("keV")?, &Unit::parse("keV-1 cm-2 s-1")?)?;
//!
//! let y = powerlaw.evaluate(&arr1(&[10.0, 100.0]).into_dyn(), &[1.0, 1.0, -2.0])?;
//! ```

pub mod band;
#[cfg(feature = "special")]
pub mod cutoff_powerlaw_flux;
pub mod gaussian;
pub mod linear;
pub mod log_parabola;
pub mod periodic;
pub mod power_laws;
pub mod priors;
#[cfg(feature = "synchrotron")]
pub mod synchrotron;

pub use band::Band;
#[cfg(feature = "special")]
pub use cutoff_powerlaw_flux::CutoffPowerLawFlux;
pub use gaussian::Gaussian;
pub use linear::{Bias, Identity, Line};
pub use log_parabola::LogParabola;
pub use periodic::Sin;
pub use power_laws::{BrokenPowerLaw, CutoffPowerLaw, PowerLaw, PowerLawFlux};
pub use priors::{LogUniformPrior, UniformPrior};
#[cfg(feature = "synchrotron")]
pub use synchrotron::{ParticleDistribution, Synchrotron};

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::parameter::{ParameterDict, ParameterSpec, Parameters};
use crate::units::Unit;
use crate::FunctionError;

/// Static metadata of a catalog function
#[derive(Debug)]
pub struct FunctionInfo {
    /// Catalog name, used for lookup and serialization
    pub name: &'static str,
    pub description: &'static str,
    pub latex: Option<&'static str>,
    /// Parameter schema in positional order
    pub parameters: &'static [ParameterSpec],
}

/// Common interface of every catalog function.
///
/// Functions are pure with respect to [`evaluate`](Function::evaluate): the
/// positional parameter values are passed explicitly and the instance is only
/// read. Concurrent parameter mutation and evaluation on one instance must be
/// serialized by the caller.
pub trait Function: Debug + Send + Sync {
    fn info(&self) -> &'static FunctionInfo;

    fn parameters(&self) -> &Parameters;

    fn parameters_mut(&mut self) -> &mut Parameters;

    /// Evaluate at every element of `x` with the given positional parameter values
    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError>;

    /// Assign parameter units from the units of the x and y axes.
    ///
    /// Calling this again with the same pair leaves every unit unchanged.
    fn set_units(&mut self, x_unit: &Unit, y_unit: &Unit) -> Result<(), FunctionError> {
        let schema = self.info().parameters;
        self.parameters_mut().assign_units(schema, x_unit, y_unit);
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Identity of this instance when referenced from another function
    fn path(&self) -> String {
        self.name().to_string()
    }

    /// Evaluate with the current parameter values
    fn call(&self, x: &ArrayD<f64>) -> Result<ArrayD<f64>, FunctionError> {
        self.evaluate(x, &self.parameters().values())
    }

    /// Evaluate a single point with the current parameter values
    fn value_at(&self, x: f64) -> Result<f64, FunctionError> {
        let input = ArrayD::from_elem(ndarray::IxDyn(&[1]), x);
        let output = self.call(&input)?;
        Ok(output.iter().next().copied().unwrap_or(f64::NAN))
    }

    /// Set a single parameter value by name, respecting its bounds
    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), FunctionError> {
        let function = self.name();
        self.parameters_mut()
            .get_mut(name)
            .ok_or_else(|| FunctionError::UnknownParameter {
                function: function.to_string(),
                name: name.to_string(),
            })?
            .set_value(value)
    }

    fn to_dict(&self, minimal: bool) -> FunctionDict {
        FunctionDict {
            name: self.name().to_string(),
            parameters: self
                .parameters()
                .iter()
                .map(|p| p.to_dict(minimal))
                .collect(),
            extra_setup: None,
        }
    }
}

/// Serialized form of a function instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDict {
    pub name: String,
    pub parameters: Vec<ParameterDict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_setup: Option<ExtraSetup>,
}

/// Sub-models attached to a function that are not plain parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraSetup {
    /// Path of the attached particle distribution function
    pub particle_distribution: String,
}

impl FunctionDict {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
