//! Band et al. (1993) gamma-ray burst spectrum, normalized by its integral
//! flux in a band (Calderone et al., MNRAS, 448, 403C, 2015).
//!
//! Evaluation runs in two stages:
//!
//! 1. The photon flux integral over `[a, b]` is computed in closed form, as a
//!    cutoff power law up to the split energy and a power law above it.
//! 2. The shape is scaled so that its energy flux over `[a, b]` equals `F`
//!    (given in erg, converted to keV).

use ndarray::ArrayD;

use crate::functions::{Function, FunctionInfo};
use crate::parameter::{ParameterSpec, Parameters, UnitRule};
use crate::special::upper_gamma;
use crate::{FunctionError, Params};

/// keV per erg
const ERG_TO_KEV: f64 = 6.24151e8;

/// Stand-in for `2 + alpha` when alpha == -2
const ALPHA_MINUS_TWO_DENOMINATOR: f64 = 0.0001;

#[derive(Params)]
struct BandParams {
    alpha: f64,
    beta: f64,
    xp: f64,
    f: f64,
    a: f64,
    b: f64,
    opt: f64,
}

static BAND: FunctionInfo = FunctionInfo {
    name: "band",
    description: "The Band model from Band et al. 1993, implemented however in a way which reduces \
                  the covariances between the parameters (Calderone et al., MNRAS, 448, 403C, 2015)",
    latex: Some(r"\text{(Calderone et al., MNRAS, 448, 403C, 2015)}"),
    parameters: &[
        ParameterSpec {
            name: "alpha",
            description: "The index for x smaller than the x peak",
            initial: -1.0,
            min: Some(-10.0),
            max: Some(10.0),
            fix: false,
            unit: UnitRule::Dimensionless,
        },
        ParameterSpec {
            name: "beta",
            description: "index for x greater than the x peak (only if opt=1, i.e., for the Band model)",
            initial: -2.2,
            min: Some(-7.0),
            max: Some(-1.0),
            fix: false,
            unit: UnitRule::Dimensionless,
        },
        ParameterSpec {
            name: "xp",
            description: "position of the peak in the x*x*f(x) space (if x is energy, this is the nuFnu or SED space)",
            initial: 200.0,
            min: Some(0.0),
            max: None,
            fix: false,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "F",
            description: "integral in the band defined by a and b",
            initial: 1e-6,
            min: None,
            max: None,
            fix: false,
            unit: UnitRule::XTimesY,
        },
        ParameterSpec {
            name: "a",
            description: "lower limit of the band in which the integral will be computed",
            initial: 1.0,
            min: Some(0.0),
            max: None,
            fix: true,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "b",
            description: "upper limit of the band in which the integral will be computed",
            initial: 10000.0,
            min: Some(0.0),
            max: None,
            fix: true,
            unit: UnitRule::X,
        },
        ParameterSpec {
            name: "opt",
            description: "option to select the spectral model (0 corresponds to a cutoff power law, 1 to the Band model)",
            initial: 1.0,
            min: Some(0.0),
            max: Some(1.0),
            fix: true,
            unit: UnitRule::Dimensionless,
        },
    ],
};

/// Spectral shape selected by the `opt` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandShape {
    /// Cutoff power law only (`opt = 0`)
    CutoffPowerLaw,
    /// Cutoff power law joined to a power law at the split energy (`opt = 1`)
    Band,
}

impl BandShape {
    pub fn from_opt(opt: f64) -> Result<Self, FunctionError> {
        if opt == 0.0 {
            Ok(Self::CutoffPowerLaw)
        } else if opt == 1.0 {
            Ok(Self::Band)
        } else {
            Err(FunctionError::InvalidOption {
                function: BAND.name,
                value: opt,
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct Band {
    parameters: Parameters,
}

impl Band {
    pub fn new() -> Self {
        Self {
            parameters: Parameters::from_schema(BAND.parameters),
        }
    }

    /// Cutoff energy `xp / (2 + alpha)`, with a fixed small denominator at alpha == -2
    pub fn cutoff_energy(alpha: f64, xp: f64) -> f64 {
        if alpha == -2.0 {
            xp / ALPHA_MINUS_TWO_DENOMINATOR
        } else {
            xp / (2.0 + alpha)
        }
    }

    /// Energy at which the low and high energy branches join
    pub fn split_energy(alpha: f64, beta: f64, xp: f64) -> f64 {
        (alpha - beta) * Self::cutoff_energy(alpha, xp)
    }

    /// Integral of `E (E/Ec)^a exp(-E/Ec)` over `[e_min, e_max]`
    pub fn ggrb_int_cpl(a: f64, ec: f64, e_min: f64, e_max: f64) -> Result<f64, FunctionError> {
        let i1 = upper_gamma(2.0 + a, e_min / ec)?;
        let i2 = upper_gamma(2.0 + a, e_max / ec)?;
        Ok(-ec * ec * (i2 - i1))
    }

    /// Integral of `E` times the high energy branch over `[e_min, e_max]`
    pub fn ggrb_int_pl(a: f64, b: f64, ec: f64, e_min: f64, e_max: f64) -> f64 {
        let pre = (a - b).powf(a - b) * (b - a).exp() / ec.powf(b);

        if b != -2.0 {
            pre / (2.0 + b) * (e_max.powf(2.0 + b) - e_min.powf(2.0 + b))
        } else {
            pre * (e_max / e_min).ln()
        }
    }

    /// Energy flux of the unnormalized shape over `[a, b]`
    fn integrated_flux(
        shape: BandShape,
        alpha: f64,
        beta: f64,
        ec: f64,
        e_split: f64,
        a: f64,
        b: f64,
    ) -> Result<f64, FunctionError> {
        match shape {
            BandShape::CutoffPowerLaw => Self::ggrb_int_cpl(alpha, ec, a, b),
            BandShape::Band => {
                if a <= e_split && e_split <= b {
                    Ok(Self::ggrb_int_cpl(alpha, ec, a, e_split)?
                        + Self::ggrb_int_pl(alpha, beta, ec, e_split, b))
                } else if e_split < a {
                    tracing::debug!(e_split, a, "band split energy below the integration band");
                    Ok(Self::ggrb_int_pl(alpha, beta, ec, a, b))
                } else {
                    Err(FunctionError::BandConfiguration { e_split, upper: b })
                }
            }
        }
    }

    /// Cutoff power law shape used below the split energy
    pub fn low_energy_branch(x: f64, norm: f64, alpha: f64, ec: f64) -> f64 {
        norm * (x / ec).powf(alpha) * (-x / ec).exp()
    }

    /// Power law continuation used at and above the split energy
    pub fn high_energy_branch(x: f64, norm: f64, alpha: f64, beta: f64, ec: f64) -> f64 {
        norm * (alpha - beta).powf(alpha - beta) * (beta - alpha).exp() * (x / ec).powf(beta)
    }
}

impl Default for Band {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for Band {
    fn info(&self) -> &'static FunctionInfo {
        &BAND
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn evaluate(&self, x: &ArrayD<f64>, params: &[f64]) -> Result<ArrayD<f64>, FunctionError> {
        let BandParams {
            alpha,
            beta,
            xp,
            f,
            a,
            b,
            opt,
        } = BandParams::from_slice(params)?;
        let shape = BandShape::from_opt(opt)?;

        let ec = Self::cutoff_energy(alpha, xp);
        let e_split = (alpha - beta) * ec;

        let intflux = Self::integrated_flux(shape, alpha, beta, ec, e_split, a, b)?;
        let norm = f * ERG_TO_KEV / intflux;

        let flux = match shape {
            BandShape::CutoffPowerLaw => x.mapv(|x| Self::low_energy_branch(x, norm, alpha, ec)),
            BandShape::Band => x.mapv(|x| {
                if x < e_split {
                    Self::low_energy_branch(x, norm, alpha, ec)
                } else {
                    Self::high_energy_branch(x, norm, alpha, beta, ec)
                }
            }),
        };
        Ok(flux)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr1;

    const DEFAULTS: [f64; 7] = [-1.0, -2.2, 200.0, 1e-6, 1.0, 10000.0, 1.0];

    /// Trapezoid integral of x * f(x) on a log grid over [a, b]
    fn energy_flux(band: &Band, params: &[f64], a: f64, b: f64) -> f64 {
        let n = 200_000;
        let (la, lb) = (a.log10(), b.log10());
        let grid: Vec<f64> = (0..=n)
            .map(|i| 10f64.powf(la + (lb - la) * i as f64 / n as f64))
            .collect();
        let y = band.evaluate(&arr1(&grid).into_dyn(), params).unwrap();
        (1..=n)
            .map(|i| 0.5 * (grid[i] * y[[i]] + grid[i - 1] * y[[i - 1]]) * (grid[i] - grid[i - 1]))
            .sum()
    }

    #[test]
    fn branches_agree_at_split_energy() {
        for &(alpha, beta, xp) in &[(-1.0, -2.2, 200.0), (-0.5, -3.0, 50.0), (0.3, -2.0, 800.0)] {
            let ec = Band::cutoff_energy(alpha, xp);
            let e_split = Band::split_energy(alpha, beta, xp);
            let low = Band::low_energy_branch(e_split, 1.0, alpha, ec);
            let high = Band::high_energy_branch(e_split, 1.0, alpha, beta, ec);
            assert_relative_eq!(low, high, max_relative = 1e-12);
        }
    }

    #[test]
    fn evaluation_is_continuous_across_split() {
        let band = Band::new();
        let e_split = Band::split_energy(-1.0, -2.2, 200.0);
        let y = band
            .evaluate(
                &arr1(&[e_split * (1.0 - 1e-10), e_split]).into_dyn(),
                &DEFAULTS,
            )
            .unwrap();
        assert_relative_eq!(y[[0]], y[[1]], max_relative = 1e-8);
    }

    #[test]
    fn normalization_matches_integral_flux() {
        let band = Band::new();
        let expected = DEFAULTS[3] * ERG_TO_KEV;
        assert_relative_eq!(
            energy_flux(&band, &DEFAULTS, 1.0, 10000.0),
            expected,
            max_relative = 1e-4
        );

        let mut cpl = DEFAULTS;
        cpl[6] = 0.0;
        assert_relative_eq!(
            energy_flux(&band, &cpl, 1.0, 10000.0),
            expected,
            max_relative = 1e-4
        );
    }

    #[test]
    fn split_above_band_is_a_configuration_error() {
        let band = Band::new();
        // Ec = 5000 / 1.5, Esplit = 2.5 * Ec > b
        let params = [-0.5, -3.0, 5000.0, 1e-6, 1.0, 1000.0, 1.0];
        let err = band.evaluate(&arr1(&[10.0]).into_dyn(), &params).unwrap_err();
        assert!(matches!(err, FunctionError::BandConfiguration { .. }));
    }

    #[test]
    fn split_below_band_uses_power_law_only() {
        let band = Band::new();
        // Esplit = 1.2 * 2 = 2.4 < a = 10
        let params = [-1.0, -2.2, 2.0, 1e-6, 10.0, 1000.0, 1.0];
        let y = band
            .evaluate(&arr1(&[20.0, 200.0]).into_dyn(), &params)
            .unwrap();
        // pure power law of index beta above the split
        assert_relative_eq!(y[[1]] / y[[0]], 10f64.powf(-2.2), max_relative = 1e-12);
        assert_relative_eq!(
            energy_flux(&band, &params, 10.0, 1000.0),
            1e-6 * ERG_TO_KEV,
            max_relative = 1e-4
        );
    }

    #[test]
    fn beta_minus_two_uses_logarithmic_integral() {
        let pre = Band::ggrb_int_pl(-1.0, -2.0, 100.0, 10.0, 1000.0);
        let near = Band::ggrb_int_pl(-1.0, -2.0 + 1e-7, 100.0, 10.0, 1000.0);
        assert!(pre.is_finite());
        assert_relative_eq!(pre, near, max_relative = 1e-5);
    }

    #[test]
    fn alpha_minus_two_uses_fixed_denominator() {
        assert_eq!(Band::cutoff_energy(-2.0, 1.0), 1.0 / 0.0001);
    }

    #[cfg(feature = "special")]
    #[test]
    fn alpha_minus_two_normalizes_to_flux() {
        let band = Band::new();
        let expected = 1e-6 * ERG_TO_KEV;

        // Ec = 0.01 / 0.0001 = 100, Esplit = 20 inside [1, 10000]
        let params = [-2.0, -2.2, 0.01, 1e-6, 1.0, 10000.0, 1.0];
        assert_relative_eq!(
            energy_flux(&band, &params, 1.0, 10000.0),
            expected,
            max_relative = 1e-4
        );

        let mut cpl = params;
        cpl[2] = 200.0;
        cpl[6] = 0.0;
        assert_relative_eq!(
            energy_flux(&band, &cpl, 1.0, 10000.0),
            expected,
            max_relative = 1e-4
        );
    }

    #[test]
    fn invalid_option_is_rejected() {
        let band = Band::new();
        let mut params = DEFAULTS;
        params[6] = 0.5;
        assert_eq!(
            band.evaluate(&arr1(&[10.0]).into_dyn(), &params).unwrap_err(),
            FunctionError::InvalidOption {
                function: "band",
                value: 0.5
            }
        );
    }
}
