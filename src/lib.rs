extern crate self as fluxmodels;

pub mod catalog;
pub mod error;
pub mod functions;
pub mod parameter;
#[cfg(feature = "synchrotron")]
pub mod radiative;
pub mod special;
pub mod units;

pub use crate::catalog::{catalog, Capabilities, Capability, FunctionCatalog};
pub use crate::functions::*;
pub use crate::parameter::{Parameter, ParameterDict, ParameterSpec, Parameters, UnitRule};
pub use crate::units::{get_units, set_units, PhysicalType, Unit, UnitSystem};
pub use error::{FunctionError, SpecialError};
pub use ndarray::{arr1, ArrayD};

// Re-export derive macro
pub use fluxmodels_macros::Params;

// ============================================================================
// Trait for typed parameters
// ============================================================================

/// Trait for typed parameter tuples.
///
/// Implement this trait (or use `#[derive(Params)]`) to unpack the positional
/// parameter slice passed to [`Function::evaluate`] into named fields.
///
/// # Example
///
/// ```ignore
/// #[derive(Params)]
/// struct Line {
///     a: f64,
///     b: f64,
/// }
///
/// let Line { a, b } = Line::from_slice(&[2.0, 1.0])?;
/// ```
pub trait Params: Sized {
    /// Returns the names of all parameter fields
    fn field_names() -> &'static [&'static str];

    /// Returns the number of parameters
    fn num_params() -> usize;

    /// Create from a slice of values (in field order)
    fn from_slice(values: &[f64]) -> Result<Self, FunctionError>;

    /// Convert to a vector of values (in field order)
    fn to_vec(&self) -> Vec<f64>;
}

pub mod prelude {
    pub mod functions {
        pub use crate::functions::{
            Band, Bias, BrokenPowerLaw, CutoffPowerLaw, Gaussian, Identity, Line, LogParabola,
            LogUniformPrior, PowerLaw, PowerLawFlux, Sin, UniformPrior,
        };

        #[cfg(feature = "special")]
        pub use crate::functions::CutoffPowerLawFlux;

        #[cfg(feature = "synchrotron")]
        pub use crate::functions::{ParticleDistribution, Synchrotron};
    }

    pub use crate::catalog::{catalog, FunctionCatalog};
    pub use crate::functions::{Function, FunctionDict, FunctionInfo};
    pub use crate::units::{get_units, set_units, Unit, UnitSystem};
    pub use crate::{FunctionError, Params};
    pub use ndarray::{arr1, ArrayD};
}
