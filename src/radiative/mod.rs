//! Synchrotron emission from a relativistic electron population
//!
//! Isotropic pitch-angle emissivity following Aharonian, Kelner & Prosekin
//! (2010), integrated over a logarithmic grid of Lorentz factors.
//!
//! All quantities are in cgs: energies in erg, magnetic field in gauss,
//! distances in cm. The electron distribution is supplied as a callable
//! returning `dN/dE` in 1/erg at electron energies given in erg.

use ndarray::Array1;
use std::f64::consts::PI;

use crate::FunctionError;

/// Elementary charge (statC)
pub const ELECTRON_CHARGE: f64 = 4.803_204_25e-10;
/// Electron mass (g)
pub const ELECTRON_MASS: f64 = 9.109_383_701_5e-28;
/// Speed of light (cm/s)
pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e10;
/// Reduced Planck constant (erg s)
pub const HBAR: f64 = 1.054_571_817e-27;

/// Electron rest energy (erg)
pub const MEC2: f64 = ELECTRON_MASS * SPEED_OF_LIGHT * SPEED_OF_LIGHT;

/// Approximation of the pitch-angle averaged synchrotron kernel
pub fn g_tilde(x: f64) -> f64 {
    let cb = x.cbrt();
    let cb2 = cb * cb;
    let cb4 = cb2 * cb2;
    let gt1 = 1.808 * cb / (1.0 + 3.4 * cb2).sqrt();
    let gt2 = 1.0 + 2.210 * cb2 + 0.347 * cb4;
    let gt3 = 1.0 + 1.353 * cb2 + 0.217 * cb4;
    gt1 * gt2 / gt3 * (-x).exp()
}

/// Trapezoid rule in log-log space, exact for piecewise power laws.
///
/// Segments touching a zero, or producing a non-finite value, contribute 0.
pub fn trapz_loglog(y: &[f64], x: &[f64]) -> f64 {
    y.windows(2)
        .zip(x.windows(2))
        .map(|(y, x)| {
            let (y1, y2, x1, x2) = (y[0], y[1], x[0], x[1]);
            if y1 == 0.0 || y2 == 0.0 || x1 == x2 {
                return 0.0;
            }
            let b = (y1 / y2).log10() / (x1 / x2).log10();
            let segment = if (b + 1.0).abs() > 1e-10 {
                y1 * (x2 * (x2 / x1).powf(b) - x1) / (b + 1.0)
            } else {
                x1 * y1 * (x2 / x1).ln()
            };
            if segment.is_finite() {
                segment
            } else {
                0.0
            }
        })
        .sum()
}

/// Synchrotron emission of an electron population in a uniform magnetic field
#[derive(Debug, Clone, PartialEq)]
pub struct SynchrotronEmission {
    /// Magnetic field (G)
    pub b_field: f64,
    /// Lower edge of the electron distribution (erg)
    pub e_min: f64,
    /// Upper edge of the electron distribution (erg)
    pub e_max: f64,
    /// Lorentz-factor grid density
    pub points_per_decade: f64,
}

impl SynchrotronEmission {
    pub fn new(b_field: f64, e_min: f64, e_max: f64, points_per_decade: f64) -> Self {
        Self {
            b_field,
            e_min,
            e_max,
            points_per_decade,
        }
    }

    /// Log-spaced Lorentz factors spanning `[e_min, e_max]`
    pub fn lorentz_factors(&self) -> Array1<f64> {
        let log_min = (self.e_min / MEC2).log10();
        let log_max = (self.e_max / MEC2).log10();
        let n = ((self.points_per_decade * (log_max - log_min)) as usize).max(2);
        Array1::logspace(10.0, log_min, log_max, n)
    }

    /// Photon emission rate `dN/(dE dt)` in 1/(erg s) at the given photon energies (erg)
    pub fn spectrum<F>(&self, photon_energies: &[f64], dn_de: F) -> Result<Vec<f64>, FunctionError>
    where
        F: Fn(&Array1<f64>) -> Result<Array1<f64>, FunctionError>,
    {
        let gam = self.lorentz_factors();
        let electron_energies = gam.mapv(|g| g * MEC2);
        // dN/dgamma
        let nelec = dn_de(&electron_energies)? * MEC2;

        // characteristic energy of each grid electron
        let critical = gam.mapv(|g| {
            3.0 * ELECTRON_CHARGE * HBAR * self.b_field * g * g / (2.0 * ELECTRON_MASS * SPEED_OF_LIGHT)
        });

        let cs1_0 = 3f64.sqrt() * ELECTRON_CHARGE.powi(3) * self.b_field;
        let gam = gam.to_vec();

        Ok(photon_energies
            .iter()
            .map(|&eph| {
                let cs1 = cs1_0 / (2.0 * PI * MEC2 * HBAR * eph);
                let integrand: Vec<f64> = nelec
                    .iter()
                    .zip(critical.iter())
                    .map(|(&n, &ec)| n * cs1 * g_tilde(eph / ec))
                    .collect();
                trapz_loglog(&integrand, &gam)
            })
            .collect())
    }

    /// Photon flux at distance `distance` (cm), in 1/(erg s cm²)
    pub fn flux<F>(
        &self,
        photon_energies: &[f64],
        distance: f64,
        dn_de: F,
    ) -> Result<Vec<f64>, FunctionError>
    where
        F: Fn(&Array1<f64>) -> Result<Array1<f64>, FunctionError>,
    {
        let dilution = 4.0 * PI * distance * distance;
        Ok(self
            .spectrum(photon_energies, dn_de)?
            .into_iter()
            .map(|s| s / dilution)
            .collect())
    }
}
