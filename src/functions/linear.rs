use ndarray::ArrayD;

use crate::functions::{Function, FunctionInfo};
use crate::parameter::{ParameterSpec, Parameters, UnitRule};
use crate::units::Unit;
use crate::{FunctionError, Params};

// =============================================================================
// Line
// =============================================================================

#[derive(Params)]
struct LineParams {
    a: f64,
    b: f64,
}

static LINE: FunctionInfo = FunctionInfo {
    name: "line",
    description: "A linear function",
    latex: Some(r"a * x + b"),
    parameters: &[
        ParameterSpec {
            name: "a",
            description: "linear coefficient",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::YOverX,
        },
        ParameterSpec {
            name: "b",
            description: "intercept",
            initial: 0.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Y,
        },
    ],
};

#[derive(Debug, Clone)]
pub struct Line {
    parameters: Parameters,
}

impl Line {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(LINE.parameters),
        }
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for Line {
    fn info(&self) -> &'static FunctionInfo {
        &LINE
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let LineParams { a, b } = LineParams::from_slice(params)?;
        Ok(x.mapv(|x| a * x + b))
    }
}

// =============================================================================
// Identity
// =============================================================================

#[derive(Params)]
struct IdentityParams {}

static IDENTITY: FunctionInfo = FunctionInfo {
    name: "identity",
    description: "Return x",
    latex: Some(r"x"),
    parameters: &[],
};

#[derive(Debug, Clone)]
pub struct Identity {
    parameters: Parameters,
}

impl Identity {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(IDENTITY.parameters),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for Identity {
    fn info(&self) -> &'static FunctionInfo {
        &IDENTITY
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let IdentityParams {} = IdentityParams::from_slice(params)?;
        Ok(x.clone())
    }
}

// =============================================================================
// Bias
// =============================================================================

#[derive(Params)]
struct BiasParams {
    k: f64,
}

static BIAS: FunctionInfo = FunctionInfo {
    name: "bias",
    description: "Return x plus a bias",
    latex: Some(r"x + k"),
    parameters: &[ParameterSpec {
        name: "k",
        description: "Constant value",
        initial: 0.0,
        min: None,
        max: None,
        fix: false,
        unit: UnitRule::X,
    }],
};

/// `x + k`. Only meaningful when x and y share a unit.
#[derive(Debug, Clone)]
pub struct Bias {
    parameters: Parameters,
}

impl Bias {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(BIAS.parameters),
        }
    }
}

impl Default for Bias {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for Bias {
    fn info(&self) -> &'static FunctionInfo {
        &BIAS
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn set_units(&mut self, x_unit: &Unit, y_unit: &Unit) -> Result<(), FunctionError> {
        if x_unit != y_unit {
            return Err(FunctionError::InvalidUsage {
                function: BIAS.name,
                reason: format!(
                    "cannot be given different units for x and y (x: '{}', y: '{}')",
                    x_unit, y_unit
                ),
            });
        }
        self.parameters.assign_units(BIAS.parameters, x_unit, y_unit);
        Ok(())
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let BiasParams { k } = BiasParams::from_slice(params)?;
        Ok(x.mapv(|x| x + k))
    }
}
