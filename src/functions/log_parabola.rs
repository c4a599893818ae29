use ndarray::ArrayD;

use crate::functions::{Function, FunctionInfo};
use crate::parameter::{ParameterSpec, Parameters, UnitRule};
use crate::{FunctionError, Params};

#[derive(Params)]
struct LogParabolaParams {
    k: f64,
    piv: f64,
    alpha: f64,
    beta: f64,
}

static LOG_PARABOLA: FunctionInfo = FunctionInfo {
    name: "log_parabola",
    description: "A log-parabolic function. The curvature term uses the base-10 logarithm of x / piv.",
    latex: Some(r"K \left( \frac{x}{piv} \right)^{\alpha -\beta \log_{10}{\left( \frac{x}{piv} \right)}}"),
    parameters: &[
        ParameterSpec {
            name: "K",
            description: "Normalization",
            initial: 0.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Y,
        },
        ParameterSpec {
            name: "piv",
            description: "Pivot (keep this fixed)",
            initial: 1.0,
            min: None,
            max: None,
            fix: true,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "alpha",
            description: "index",
            initial: -2.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Dimensionless,
        },
        ParameterSpec {
            name: "beta",
            description: "curvature (positive is concave, negative is convex)",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Dimensionless,
        },
    ],
};

/// Log-parabola `K (x/piv)^(alpha - beta log10(x/piv))`
#[derive(Debug, Clone)]
pub struct LogParabola {
    parameters: Parameters,
}

impl LogParabola {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(LOG_PARABOLA.parameters),
        }
    }

    /// Peak of `x² f(x)` for the current parameters.
    ///
    /// `beta` must be non-zero; with `beta == 0` the result is not finite.
    pub fn peak_energy(&self) -> f64 {
        let values = self.parameters.values();
        match LogParabolaParams::from_slice(&values) {
            Ok(LogParabolaParams {
                piv, alpha, beta, ..
            }) => piv * 10f64.powf((2.0 + alpha) / (2.0 * beta)),
            Err(_) => f64::NAN,
        }
    }
}

impl Default for LogParabola {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for LogParabola {
    fn info(&self) -> &'static FunctionInfo {
        &LOG_PARABOLA
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let LogParabolaParams {
            k,
            piv,
            alpha,
            beta,
        } = LogParabolaParams::from_slice(params)?;
        Ok(x.mapv(|x| {
            let xx = x / piv;
            k * xx.powf(alpha - beta * xx.log10())
        }))
    }
}
