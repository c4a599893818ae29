use lazy_static::lazy_static;
use ndarray::ArrayD;

use crate::functions::{Function, FunctionInfo};
use crate::parameter::{ParameterSpec, Parameters, UnitRule};
use crate::{FunctionError, Params};

lazy_static! {
    /// 1 / sqrt(2π)
    static ref NORM_CONST: f64 = 1.0 / (2.0 * std::f64::consts::PI).sqrt();
}

#[derive(Params)]
struct GaussianParams {
    f: f64,
    mu: f64,
    sigma: f64,
}

static GAUSSIAN: FunctionInfo = FunctionInfo {
    name: "gaussian",
    description: "A Gaussian function",
    latex: Some(r"K \frac{1}{\sigma \sqrt{2 \pi}}\exp{\frac{(x-\mu)^2}{2~(\sigma)^2}}"),
    parameters: &[
        ParameterSpec {
            name: "F",
            description: "Integral between -inf and +inf. Fix this to 1 to obtain a Normal distribution",
            initial: 1.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::XTimesY,
        },
        ParameterSpec {
            name: "mu",
            description: "Central value",
            initial: 0.0,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "sigma",
            description: "standard deviation",
            initial: 1.0,
            min: Some(1e-12),
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
    ],
};

/// Gaussian with integral `F`.
///
/// `sigma > 0` is guaranteed by the parameter bound, not by `evaluate`.
#[derive(Debug, Clone)]
pub struct Gaussian {
    parameters: Parameters,
}

impl Gaussian {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(GAUSSIAN.parameters),
        }
    }
}

impl Default for Gaussian {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for Gaussian {
    fn info(&self) -> &'static FunctionInfo {
        &GAUSSIAN
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let GaussianParams { f, mu, sigma } = GaussianParams::from_slice(params)?;
        let norm = *NORM_CONST / sigma;
        Ok(x.mapv(|x| f * norm * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    #[test]
    fn standard_normal_reference_values() {
        let gaussian = Gaussian::new();
        let y = gaussian.call(&arr1(&[0.0, -1.0]).into_dyn()).unwrap();
        assert_abs_diff_eq!(y[[0]], 0.3989422804014327, epsilon = 1e-10);
        assert_abs_diff_eq!(y[[1]], 0.24197072451914337, epsilon = 1e-9);
    }

    #[test]
    fn shifted_and_scaled() {
        let gaussian = Gaussian::new();
        let y = gaussian
            .evaluate(&arr1(&[5.0]).into_dyn(), &[2.0, 5.0, 2.0])
            .unwrap();
        assert_abs_diff_eq!(y[[0]], 2.0 * 0.3989422804014327 / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn sigma_bound_rejects_zero() {
        let mut gaussian = Gaussian::new();
        assert!(gaussian.set_parameter("sigma", 0.0).is_err());
    }

    #[test]
    fn normalization_carries_integral_units() {
        let mut gaussian = Gaussian::new();
        let x_unit = Unit::parse("keV").unwrap();
        let y_unit = Unit::parse("keV-1 cm-2 s-1").unwrap();
        gaussian.set_units(&x_unit, &y_unit).unwrap();
        assert_eq!(
            gaussian.parameters().get("F").unwrap().unit(),
            Some(&Unit::parse("cm-2 s-1").unwrap())
        );
        assert_eq!(gaussian.parameters().get("sigma").unwrap().unit(), Some(&x_unit));
    }
}
