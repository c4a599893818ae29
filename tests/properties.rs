//! Behavioral properties every catalog function must honor
//!
//! These tests go through the public catalog, the way a fitting framework
//! would use the functions.

use approx::assert_abs_diff_eq;
use fluxmodels::prelude::functions::*;
use fluxmodels::prelude::*;
use ndarray::{arr2, Array3};

fn kev() -> Unit {
    Unit::parse("keV").unwrap()
}

fn differential_flux() -> Unit {
    Unit::parse("keV-1 cm-2 s-1").unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Shape
// ═══════════════════════════════════════════════════════════════════════════════

mod shape {
    use super::*;

    #[test]
    fn output_shape_matches_input_for_every_function() {
        let catalog = catalog();
        let x = arr2(&[[1.0, 2.0, 3.0], [10.0, 20.0, 30.0]]).into_dyn();

        for name in catalog.list() {
            let mut function = catalog.get(name).unwrap();
            if name == "synchrotron" {
                // needs an electron distribution before it can evaluate
                continue;
            }
            if name == "log_parabola" {
                function.set_parameter("K", 1.0).unwrap();
            }
            let y = function.call(&x).unwrap();
            assert_eq!(y.shape(), x.shape(), "shape mismatch for {}", name);
        }
    }

    #[test]
    fn three_dimensional_input() {
        let x = Array3::from_shape_fn((2, 3, 4), |(i, j, k)| 1.0 + (i * 12 + j * 4 + k) as f64).into_dyn();
        let y = Band::new().call(&x).unwrap();
        assert_eq!(y.shape(), &[2, 3, 4]);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Reference values
// ═══════════════════════════════════════════════════════════════════════════════

mod reference_values {
    use super::*;

    #[test]
    fn powerlaw() {
        let powerlaw = PowerLaw::new();
        let y = powerlaw.evaluate(&arr1(&[10.0, 100.0]).into_dyn(), &[1.0, 1.0, -2.0]).unwrap();
        assert_abs_diff_eq!(y[[0]], 0.01, epsilon = 1e-20);
        assert_abs_diff_eq!(y[[1]], 0.0001, epsilon = 1e-20);
    }

    #[test]
    fn gaussian() {
        let gaussian = Gaussian::new();
        assert_abs_diff_eq!(gaussian.value_at(0.0).unwrap(), 0.3989422804014327, epsilon = 1e-9);
        assert_abs_diff_eq!(gaussian.value_at(-1.0).unwrap(), 0.24197072451914337, epsilon = 1e-9);
    }

    #[test]
    fn uniform_prior() {
        let prior = UniformPrior::new();
        assert_eq!(prior.value_at(0.5).unwrap(), 1.0);
        assert_eq!(prior.value_at(-0.5).unwrap(), 0.0);
        assert_eq!(prior.value_at(0.0).unwrap(), 1.0);
        assert_eq!(prior.value_at(1.0).unwrap(), 1.0);
    }

    #[test]
    fn log_uniform_prior() {
        let prior = LogUniformPrior::new();
        assert_abs_diff_eq!(prior.value_at(50.0).unwrap(), 0.02, epsilon = 1e-20);
        assert_eq!(prior.value_at(200.0).unwrap(), 0.0);
        assert_eq!(prior.value_at(0.0).unwrap(), 0.0);
        assert_eq!(prior.value_at(100.0).unwrap(), 0.0);
    }

    #[test]
    fn sin() {
        let sin = Sin::new();
        assert_abs_diff_eq!(sin.value_at(0.0).unwrap(), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(
            sin.value_at(std::f64::consts::FRAC_PI_2).unwrap(),
            1.0,
            epsilon = 1e-10
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Band model
// ═══════════════════════════════════════════════════════════════════════════════

mod band {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn continuity_at_split_energy() {
        let alphas = [-1.5, -1.0, -0.5, 0.0, 0.5];
        let betas = [-2.1, -2.5, -3.0, -4.0];
        for &alpha in &alphas {
            for &beta in &betas {
                let xp = 300.0;
                let ec = Band::cutoff_energy(alpha, xp);
                let e_split = Band::split_energy(alpha, beta, xp);
                assert_relative_eq!(
                    Band::low_energy_branch(e_split, 1.0, alpha, ec),
                    Band::high_energy_branch(e_split, 1.0, alpha, beta, ec),
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn split_above_band_never_returns_a_value() {
        let mut band = Band::new();
        band.set_parameter("xp", 9000.0).unwrap();
        let result = band.call(&arr1(&[1.0, 10.0]).into_dyn());
        assert!(matches!(result, Err(FunctionError::BandConfiguration { .. })));
    }

    #[test]
    fn cutoff_only_option() {
        let mut band = Band::new();
        band.set_parameter("opt", 0.0).unwrap();
        let y = band.call(&arr1(&[10.0, 1000.0, 5000.0]).into_dyn()).unwrap();
        // alpha = -1, Ec = 200: no power-law break past Esplit
        assert_relative_eq!(
            y[[2]] / y[[1]],
            0.2 * (-4000.0f64 / 200.0).exp(),
            max_relative = 1e-10
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Unit assignment
// ═══════════════════════════════════════════════════════════════════════════════

mod units {
    use super::*;

    #[test]
    fn bias_rejects_mismatched_units() {
        let mut bias = catalog().get("bias").unwrap();
        let err = bias.set_units(&kev(), &differential_flux()).unwrap_err();
        assert!(matches!(err, FunctionError::InvalidUsage { .. }));
    }

    #[cfg(feature = "synchrotron")]
    #[test]
    fn synchrotron_rejects_non_energy_x() {
        let mut synchrotron = catalog().get("synchrotron").unwrap();
        let err = synchrotron
            .set_units(&Unit::parse("s").unwrap(), &differential_flux())
            .unwrap_err();
        assert!(matches!(err, FunctionError::InvalidUsage { .. }));
    }

    #[test]
    fn set_units_is_idempotent() {
        let catalog = catalog();
        for name in catalog.list() {
            let mut function = catalog.get(name).unwrap();
            let (x, y) = if name == "bias" {
                (kev(), kev())
            } else {
                (kev(), differential_flux())
            };
            function.set_units(&x, &y).unwrap();
            let first = function.parameters().clone();
            function.set_units(&x, &y).unwrap();
            assert_eq!(function.parameters(), &first, "{} changed units", name);
        }
    }

    #[test]
    fn integral_normalizations_carry_x_times_y() {
        let photon_flux = Unit::parse("cm-2 s-1").unwrap();
        for name in ["powerlaw_flux", "gaussian", "band"] {
            let mut function = catalog().get(name).unwrap();
            function.set_units(&kev(), &differential_flux()).unwrap();
            assert_eq!(
                function.parameters().get("F").unwrap().unit(),
                Some(&photon_flux),
                "{}",
                name
            );
        }
    }
}
