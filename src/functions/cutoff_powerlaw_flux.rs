use ndarray::ArrayD;

use crate::functions::{Function, FunctionInfo};
use crate::parameter::{ParameterSpec, Parameters, UnitRule};
use crate::special::upper_gamma;
use crate::{FunctionError, Params};

#[derive(Params)]
struct CutoffPowerLawFluxParams {
    f: f64,
    alpha: f64,
    xc: f64,
    a: f64,
    b: f64,
}

static CUTOFF_POWERLAW_FLUX: FunctionInfo = FunctionInfo {
    name: "cutoff_powerlaw_flux",
    description: "A cutoff power law having the flux as normalization, which should reduce the \
                  correlation among parameters.",
    latex: Some(
        r"\frac{F}{T(b)-T(a)} ~x^{\alpha}~\exp{(-x/x_{c})}~\text{with}~T(x)=-x_{c}^{\alpha+1} \Gamma(\alpha+1, x/C)~\text{(}\Gamma\text{ is the incomplete gamma function)}",
    ),
    parameters: &[
        ParameterSpec {
            name: "F",
            description: "Integral between a and b",
            initial: 1e-5,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::XTimesY,
        },
        ParameterSpec {
            name: "alpha",
            description: "photon index",
            initial: -2.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Dimensionless,
        },
        ParameterSpec {
            name: "xc",
            description: "cutoff position",
            initial: 50.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "a",
            description: "lower bound for the band in which computing the integral F",
            initial: 1.0,
            min: None,
            max: None,
            fix: true,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "b",
            description: "upper bound for the band in which computing the integral F",
            initial: 100.0,
            min: None,
            max: None,
            fix: true,
            unit: UnitRule::X,
        },
    ],
};

/// Cutoff power law `x^alpha exp(-x/xc)` whose integral over `[a, b]` is `F`
#[derive(Debug, Clone)]
pub struct CutoffPowerLawFlux {
    parameters: Parameters,
}

impl CutoffPowerLawFlux {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(CUTOFF_POWERLAW_FLUX.parameters),
        }
    }

    /// Integral of `x^alpha exp(-x/xc)` over `[a, b]`
    pub fn integral(a: f64, b: f64, alpha: f64, xc: f64) -> Result<f64, FunctionError> {
        let ap1 = alpha + 1.0;
        let antiderivative =
            |x: f64| -> Result<f64, FunctionError> { Ok(-xc.powf(ap1) * upper_gamma(ap1, x / xc)?) };
        Ok(antiderivative(b)? - antiderivative(a)?)
    }
}

impl Default for CutoffPowerLawFlux {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for CutoffPowerLawFlux {
    fn info(&self) -> &'static FunctionInfo {
        &CUTOFF_POWERLAW_FLUX
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let CutoffPowerLawFluxParams { f, alpha, xc, a, b } =
            CutoffPowerLawFluxParams::from_slice(params)?;
        let norm = f / Self::integral(a, b, alpha, xc)?;
        Ok(x.mapv(|x| norm * x.powf(alpha) * (-x / xc).exp()))
    }
}
