use ndarray::ArrayD;

use crate::functions::{Function, FunctionInfo};
use crate::parameter::{ParameterSpec, Parameters, UnitRule};
use crate::{FunctionError, Params};

// =============================================================================
// Power law
// =============================================================================

#[derive(Params)]
struct PowerLawParams {
    k: f64,
    piv: f64,
    index: f64,
}

static POWERLAW: FunctionInfo = FunctionInfo {
    name: "powerlaw",
    description: "A simple power-law",
    latex: Some(r"K~\frac{x}{piv}^{index}"),
    parameters: &[
        ParameterSpec {
            name: "K",
            description: "Normalization (differential flux at the pivot value)",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Y,
        },
        ParameterSpec {
            name: "piv",
            description: "Pivot value",
            initial: 1.0,
            min: None,
            max: None,
            fix: true,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "index",
            description: "Photon index",
            initial: -2.0,
            min: Some(-10.0),
            max: Some(10.0),
            fix: false,
            unit: UnitRule::Dimensionless,
        },
    ],
};

/// `K (x / piv)^index`
#[derive(Debug, Clone)]
pub struct PowerLaw {
    parameters: Parameters,
}

impl PowerLaw {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(POWERLAW.parameters),
        }
    }
}

impl Default for PowerLaw {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for PowerLaw {
    fn info(&self) -> &'static FunctionInfo {
        &POWERLAW
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let PowerLawParams { k, piv, index } = PowerLawParams::from_slice(params)?;
        Ok(x.mapv(|x| k * (x / piv).powf(index)))
    }
}

// =============================================================================
// Power law normalized by its integral
// =============================================================================

#[derive(Params)]
struct PowerLawFluxParams {
    f: f64,
    index: f64,
    a: f64,
    b: f64,
}

static POWERLAW_FLUX: FunctionInfo = FunctionInfo {
    name: "powerlaw_flux",
    description: "A simple power-law with the photon flux in a band used as normalization. \
                  This will reduce the correlation between the index and the normalization.",
    latex: Some(r"\frac{F(\gamma+1)} {b^{\gamma+1} - a^{\gamma+1}} (x)^{\gamma}"),
    parameters: &[
        ParameterSpec {
            name: "F",
            description: "Integral between a and b",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::XTimesY,
        },
        ParameterSpec {
            name: "index",
            description: "Photon index",
            initial: -2.0,
            min: Some(-10.0),
            max: Some(10.0),
            fix: false,
            unit: UnitRule::Dimensionless,
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

/// Power law whose normalization is its integral `F` over `[a, b]`.
///
/// # Preconditions
/// - `index != -1`; the defining integral is a logarithm there and the
///   closed form divides by zero. This is not checked.
#[derive(Debug, Clone)]
pub struct PowerLawFlux {
    parameters: Parameters,
}

impl PowerLawFlux {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(POWERLAW_FLUX.parameters),
        }
    }
}

impl Default for PowerLawFlux {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for PowerLawFlux {
    fn info(&self) -> &'static FunctionInfo {
        &POWERLAW_FLUX
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let PowerLawFluxParams { f, index, a, b } = PowerLawFluxParams::from_slice(params)?;
        let gp1 = index + 1.0;
        let norm = f * gp1 / (b.powf(gp1) - a.powf(gp1));
        Ok(x.mapv(|x| norm * x.powf(index)))
    }
}

// =============================================================================
// Broken power law
// =============================================================================

#[derive(Params)]
struct BrokenPowerLawParams {
    k: f64,
    xb: f64,
    alpha: f64,
    beta: f64,
}

static BROKEN_POWERLAW: FunctionInfo = FunctionInfo {
    name: "broken_powerlaw",
    description: "A broken power law function",
    latex: Some(
        r"f(x)= K~\begin{cases}\left( \frac{x}{x_{b}} \right)^{\alpha} & x < x_{b} \\ \left( \frac{x}{x_{b}} \right)^{\beta} & x \ge x_{b} \end{cases}",
    ),
    parameters: &[
        ParameterSpec {
            name: "K",
            description: "Normalization (differential flux at x_b)",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Y,
        },
        ParameterSpec {
            name: "xb",
            description: "Break point",
            initial: 10.0,
            min: Some(1.0),
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "alpha",
            description: "Index before the break xb",
            initial: -1.5,
            min: Some(-10.0),
            max: Some(10.0),
            fix: false,
            unit: UnitRule::Dimensionless,
        },
        ParameterSpec {
            name: "beta",
            description: "Index after the break xb",
            initial: -2.5,
            min: Some(-10.0),
            max: Some(10.0),
            fix: false,
            unit: UnitRule::Dimensionless,
        },
    ],
};

/// Two power laws joined at `xb`, where both equal `K`
#[derive(Debug, Clone)]
pub struct BrokenPowerLaw {
    parameters: Parameters,
}

impl BrokenPowerLaw {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(BROKEN_POWERLAW.parameters),
        }
    }
}

impl Default for BrokenPowerLaw {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for BrokenPowerLaw {
    fn info(&self) -> &'static FunctionInfo {
        &BROKEN_POWERLAW
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let BrokenPowerLawParams { k, xb, alpha, beta } = BrokenPowerLawParams::from_slice(params)?;
        Ok(x.mapv(|x| {
            let index = if x < xb { alpha } else { beta };
            k * (x / xb).powf(index)
        }))
    }
}

// =============================================================================
// Cutoff power law
// =============================================================================

#[derive(Params)]
struct CutoffPowerLawParams {
    k: f64,
    piv: f64,
    index: f64,
    xc: f64,
}

static CUTOFF_POWERLAW: FunctionInfo = FunctionInfo {
    name: "cutoff_powerlaw",
    description: "A power law multiplied by an exponential cutoff",
    latex: Some(r"K~\frac{x}{piv}^{index}~\exp{(-x/xc)}"),
    parameters: &[
        ParameterSpec {
            name: "K",
            description: "Normalization (differential flux at the pivot value)",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::Y,
        },
        ParameterSpec {
            name: "piv",
            description: "Pivot value",
            initial: 1.0,
            min: None,
            max: None,
            fix: true,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "index",
            description: "Photon index",
            initial: -2.0,
            min: Some(-10.0),
            max: Some(10.0),
            fix: false,
            unit: UnitRule::Dimensionless,
        },
        ParameterSpec {
            name: "xc",
            description: "Cutoff energy",
            initial: 10.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
    ],
};

/// `K (x / piv)^index exp(-x / xc)`
#[derive(Debug, Clone)]
pub struct CutoffPowerLaw {
    parameters: Parameters,
}

impl CutoffPowerLaw {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(CUTOFF_POWERLAW.parameters),
        }
    }
}

impl Default for CutoffPowerLaw {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for CutoffPowerLaw {
    fn info(&self) -> &'static FunctionInfo {
        &CUTOFF_POWERLAW
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let CutoffPowerLawParams { k, piv, index, xc } = CutoffPowerLawParams::from_slice(params)?;
        Ok(x.mapv(|x| k * (x / piv).powf(index) * (-x / xc).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn powerlaw_reference_values() {
        let powerlaw = PowerLaw::new();
        let y = powerlaw
            .evaluate(&arr1(&[10.0, 100.0]).into_dyn(), &[1.0, 1.0, -2.0])
            .unwrap();
        assert!((y[[0]] - 0.01).abs() <= 1e-20);
        assert!((y[[1]] - 0.0001).abs() <= 1e-20);
    }

    #[test]
    fn powerlaw_keeps_input_shape() {
        let powerlaw = PowerLaw::new();
        let x = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn();
        let y = powerlaw.call(&x).unwrap();
        assert_eq!(y.shape(), x.shape());
        assert_relative_eq!(y[[1, 1]], 1.0 / 25.0);
    }

    #[test]
    fn powerlaw_rejects_wrong_arity() {
        let powerlaw = PowerLaw::new();
        let err = powerlaw
            .evaluate(&arr1(&[1.0]).into_dyn(), &[1.0, 1.0])
            .unwrap_err();
        assert_eq!(err, FunctionError::ParameterCount { expected: 3, got: 2 });
    }

    #[test]
    fn powerlaw_units() {
        let mut powerlaw = PowerLaw::new();
        let x_unit = Unit::parse("keV").unwrap();
        let y_unit = Unit::parse("keV-1 cm-2 s-1").unwrap();
        powerlaw.set_units(&x_unit, &y_unit).unwrap();

        let params = powerlaw.parameters();
        assert_eq!(params.get("K").unwrap().unit(), Some(&y_unit));
        assert_eq!(params.get("piv").unwrap().unit(), Some(&x_unit));
        assert_eq!(params.get("index").unwrap().unit(), Some(&Unit::dimensionless()));
    }

    #[test]
    fn powerlaw_flux_integrates_to_f() {
        // Trapezoid integral of the model over [a, b] on a fine log grid
        let function = PowerLawFlux::new();
        let params = [3.0, -2.3, 1.0, 100.0];
        let n = 20_000;
        let grid: Vec<f64> = (0..=n)
            .map(|i| 10f64.powf(2.0 * i as f64 / n as f64))
            .collect();
        let y = function
            .evaluate(&arr1(&grid).into_dyn(), &params)
            .unwrap();
        let integral: f64 = (1..=n)
            .map(|i| 0.5 * (y[[i]] + y[[i - 1]]) * (grid[i] - grid[i - 1]))
            .sum();
        assert_relative_eq!(integral, 3.0, max_relative = 1e-4);
    }

    #[test]
    fn powerlaw_flux_units() {
        let mut function = PowerLawFlux::new();
        let x_unit = Unit::parse("keV").unwrap();
        let y_unit = Unit::parse("keV-1 cm-2 s-1").unwrap();
        function.set_units(&x_unit, &y_unit).unwrap();
        assert_eq!(
            function.parameters().get("F").unwrap().unit(),
            Some(&Unit::parse("cm-2 s-1").unwrap())
        );
    }

    #[test]
    fn broken_powerlaw_is_continuous_at_break() {
        let function = BrokenPowerLaw::new();
        let params = [2.0, 10.0, -1.5, -2.5];
        let y = function
            .evaluate(&arr1(&[10.0 * (1.0 - 1e-12), 10.0, 1.0, 100.0]).into_dyn(), &params)
            .unwrap();
        assert_relative_eq!(y[[0]], 2.0, max_relative = 1e-9);
        assert_relative_eq!(y[[1]], 2.0);
        assert_relative_eq!(y[[2]], 2.0 * 0.1f64.powf(-1.5), max_relative = 1e-12);
        assert_relative_eq!(y[[3]], 2.0 * 10f64.powf(-2.5), max_relative = 1e-12);
    }

    #[test]
    fn cutoff_powerlaw_rolls_off() {
        let function = CutoffPowerLaw::new();
        let y = function
            .evaluate(&arr1(&[1.0, 50.0]).into_dyn(), &[1.0, 1.0, -1.0, 10.0])
            .unwrap();
        assert_relative_eq!(y[[0]], (-0.1f64).exp(), max_relative = 1e-12);
        assert_relative_eq!(y[[1]], (-5.0f64).exp() / 50.0, max_relative = 1e-12);
    }
}
