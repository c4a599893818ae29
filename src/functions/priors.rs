use ndarray::ArrayD;

use crate::functions::{Function, FunctionInfo};
use crate::parameter::{ParameterSpec, Parameters, UnitRule};
use crate::{FunctionError, Params};

// =============================================================================
// Uniform prior
// =============================================================================

#[derive(Params)]
struct UniformPriorParams {
    lower_bound: f64,
    upper_bound: f64,
    value: f64,
}

static UNIFORM_PRIOR: FunctionInfo = FunctionInfo {
    name: "uniform_prior",
    description: "A function which is constant on the interval lower_bound - upper_bound and 0 \
                  outside the interval. The extremes of the interval are counted as part of the interval.",
    latex: Some(
        r"f(x)=\begin{cases}0 & x < \text{lower_bound} \\\text{value} & \text{lower_bound} \le x \le \text{upper_bound} \\ 0 & x > \text{upper_bound} \end{cases}",
    ),
    parameters: &[
        ParameterSpec {
            name: "lower_bound",
            description: "Lower bound for the interval",
            initial: 0.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "upper_bound",
            description: "Upper bound for the interval",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "value",
            description: "Value in the interval",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Y,
        },
    ],
};

/// `value` on `[lower_bound, upper_bound]` (inclusive), 0 elsewhere
#[derive(Debug, Clone)]
pub struct UniformPrior {
    parameters: Parameters,
}

impl UniformPrior {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(UNIFORM_PRIOR.parameters),
        }
    }
}

impl Default for UniformPrior {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for UniformPrior {
    fn info(&self) -> &'static FunctionInfo {
        &UNIFORM_PRIOR
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let UniformPriorParams {
            lower_bound,
            upper_bound,
            value,
        } = UniformPriorParams::from_slice(params)?;
        Ok(x.mapv(|x| {
            if x >= lower_bound && x <= upper_bound {
                value
            } else {
                0.0
            }
        }))
    }
}

// =============================================================================
// Log-uniform prior
// =============================================================================

#[derive(Params)]
struct LogUniformPriorParams {
    lower_bound: f64,
    upper_bound: f64,
}

static LOG_UNIFORM_PRIOR: FunctionInfo = FunctionInfo {
    name: "log_uniform_prior",
    description: "A function which is 1/x on the interval lower_bound - upper_bound and 0 outside \
                  the interval. The extremes of the interval are NOT counted as part of the interval. \
                  Lower_bound must be >= 0.",
    latex: Some(
        r"f(x)=\begin{cases}0 & x \le \text{lower_bound} \\\frac{1}{x} & \text{lower_bound} < x < \text{upper_bound} \\ 0 & x \ge \text{upper_bound} \end{cases}",
    ),
    parameters: &[
        ParameterSpec {
            name: "lower_bound",
            description: "Lower bound for the interval",
            initial: 0.0,
            min: Some(0.0),
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "upper_bound",
            description: "Upper bound for the interval",
            initial: 100.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
    ],
};

/// `1 / x` on `(lower_bound, upper_bound)` (exclusive), 0 elsewhere
#[derive(Debug, Clone)]
pub struct LogUniformPrior {
    parameters: Parameters,
}

impl LogUniformPrior {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(LOG_UNIFORM_PRIOR.parameters),
        }
    }
}

impl Default for LogUniformPrior {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for LogUniformPrior {
    fn info(&self) -> &'static FunctionInfo {
        &LOG_UNIFORM_PRIOR
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let LogUniformPriorParams {
            lower_bound,
            upper_bound,
        } = LogUniformPriorParams::from_slice(params)?;
        Ok(x.mapv(|x| {
            if x > lower_bound && x < upper_bound {
                1.0 / x
            } else {
                0.0
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn uniform_prior_includes_boundaries() {
        let prior = UniformPrior::new();
        let y = prior
            .call(&arr1(&[0.5, -0.5, 0.0, 1.0, 1.5]).into_dyn())
            .unwrap();
        assert_eq!(y.as_slice().unwrap(), &[1.0, 0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn log_uniform_prior_excludes_boundaries() {
        let prior = LogUniformPrior::new();
        let y = prior
            .call(&arr1(&[50.0, 200.0, 0.0, 100.0]).into_dyn())
            .unwrap();
        assert!((y[[0]] - 1.0 / 50.0).abs() <= 1e-20);
        assert_eq!(y[[1]], 0.0);
        assert_eq!(y[[2]], 0.0);
        assert_eq!(y[[3]], 0.0);
    }

    #[test]
    fn log_uniform_lower_bound_is_non_negative() {
        let mut prior = LogUniformPrior::new();
        assert!(prior.set_parameter("lower_bound", -1.0).is_err());
        assert!(prior.set_parameter("lower_bound", 1.0).is_ok());
    }
}
