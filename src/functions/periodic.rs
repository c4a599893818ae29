use std::f64::consts::PI;

use ndarray::ArrayD;

use crate::functions::{Function, FunctionInfo};
use crate::parameter::{ParameterSpec, Parameters, UnitRule};
use crate::units::RADIAN;
use crate::{FunctionError, Params};

#[derive(Params)]
struct SinParams {
    k: f64,
    f: f64,
    phi: f64,
}

static SIN: FunctionInfo = FunctionInfo {
    name: "sin",
    description: "A sinusodial function",
    latex: Some(r"K~\sin{(2\pi f x + \phi)}"),
    parameters: &[
        ParameterSpec {
            name: "K",
            description: "Normalization",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Y,
        },
        ParameterSpec {
            name: "f",
            description: "frequency",
            initial: 1.0 / (2.0 * PI),
            min: Some(0.0),
            max: None,
            fix: false,
            // f x must be a pure number
            unit: UnitRule::InverseX,
        },
        ParameterSpec {
            name: "phi",
            description: "phase",
            initial: 0.0,
            min: Some(-PI),
            max: Some(PI),
            fix: false,
            unit: UnitRule::Fixed(&RADIAN),
        },
    ],
};

/// `K sin(2π f x + phi)`.
///
/// The phase is kept in `[-π, π]` by its bounds; `evaluate` does no wraparound.
#[derive(Debug, Clone)]
pub struct Sin {
    parameters: Parameters,
}

impl Sin {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(SIN.parameters),
        }
    }
}

impl Default for Sin {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for Sin {
    fn info(&self) -> &'static FunctionInfo {
        &SIN
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let SinParams { k, f, phi } = SinParams::from_slice(params)?;
        Ok(x.mapv(|x| k * (2.0 * PI * f * x + phi).sin()))
    }
}
