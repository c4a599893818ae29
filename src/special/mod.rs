//! Special functions used by the closed-form flux integrals
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`upper_gamma`] | Upper incomplete gamma Γ(a, x) = ∫ₓ^∞ t^{a−1} e^{−t} dt (not regularized) |
//! | [`exp_integral_e1`] | Exponential integral E₁(x) = Γ(0, x) (feature `special`) |
//!
//! For a > 0 the regularized function from `statrs` is used. With the
//! `special` feature the domain extends to a ≤ 0. For x > 1 the Legendre
//! continued fraction is used directly; for x ≤ 1 by downward recurrence,
//!
//! ```text
//! Γ(s − 1, x) = (Γ(s, x) − x^{s−1} e^{−x}) / (s − 1)
//! ```
//!
//! starting from Γ(frac(a), x), or from E₁(x) when a is an integer.

use statrs::function::gamma::{checked_gamma_ur, gamma};

use crate::SpecialError;

/// Euler–Mascheroni constant
#[cfg(feature = "special")]
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Maximum iterations for series / continued fraction.
#[cfg(feature = "special")]
const MAX_ITER: usize = 200;

/// Upper incomplete gamma function Γ(a, x), not regularized.
///
/// Requires x ≥ 0. Without the `special` feature a must be positive; with it
/// any real a is accepted as long as x > 0 when a ≤ 0.
pub fn upper_gamma(a: f64, x: f64) -> Result<f64, SpecialError> {
    if a.is_nan() || x.is_nan() {
        return Ok(f64::NAN);
    }
    if x < 0.0 {
        return Err(SpecialError::Domain { a, x });
    }
    if a > 0.0 {
        return upper_gamma_positive(a, x);
    }
    upper_gamma_nonpositive(a, x)
}

fn upper_gamma_positive(a: f64, x: f64) -> Result<f64, SpecialError> {
    if x == 0.0 {
        return Ok(gamma(a));
    }
    if x.is_infinite() {
        return Ok(0.0);
    }
    let q = checked_gamma_ur(a, x).map_err(|_| SpecialError::Domain { a, x })?;
    Ok(q * gamma(a))
}

#[cfg(not(feature = "special"))]
fn upper_gamma_nonpositive(a: f64, x: f64) -> Result<f64, SpecialError> {
    Err(SpecialError::Domain { a, x })
}

#[cfg(feature = "special")]
fn upper_gamma_nonpositive(a: f64, x: f64) -> Result<f64, SpecialError> {
    // Γ(a, 0) diverges for a <= 0
    if x == 0.0 {
        return Err(SpecialError::Domain { a, x });
    }
    if x.is_infinite() {
        return Ok(0.0);
    }

    // the recurrence cancels catastrophically once x grows past a few units
    if x > 1.0 {
        return upper_gamma_continued_fraction(a, x);
    }

    let frac = a - a.floor();
    let (mut s, mut value) = if frac == 0.0 {
        (0.0, exp_integral_e1(x)?)
    } else {
        (frac, upper_gamma_positive(frac, x)?)
    };

    let decay = (-x).exp();
    while s > a + 0.5 {
        let next = s - 1.0;
        value = (value - x.powf(next) * decay) / next;
        s = next;
    }
    Ok(value)
}

/// Legendre continued fraction for Γ(a, x), evaluated with the modified
/// Lentz method. Converges quickly for x > max(1, a + 1).
#[cfg(feature = "special")]
fn upper_gamma_continued_fraction(a: f64, x: f64) -> Result<f64, SpecialError> {
    let eps = f64::EPSILON;
    let tiny = 1e-300;

    let mut b = x + 1.0 - a;
    let mut c = 1.0 / tiny;
    let mut d = 1.0 / b;
    let mut h = d;

    for i in 1..=MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < tiny {
            d = tiny;
        }
        c = b + an / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        let delta = c * d;
        h *= delta;
        if (delta - 1.0).abs() < eps {
            return Ok((a * x.ln() - x).exp() * h);
        }
    }
    Err(SpecialError::ConvergenceFailure {
        function: "upper_gamma",
    })
}

/// Exponential integral E₁(x) for x > 0.
///
/// Power series for x ≤ 1, Lentz continued fraction otherwise.
#[cfg(feature = "special")]
pub fn exp_integral_e1(x: f64) -> Result<f64, SpecialError> {
    if x <= 0.0 {
        return Err(SpecialError::Domain { a: 0.0, x });
    }

    let eps = f64::EPSILON;

    if x <= 1.0 {
        // E1(x) = -γ - ln x - Σ_{k≥1} (-x)^k / (k·k!)
        let mut sum = 0.0;
        let mut fact = 1.0;
        for k in 1..=MAX_ITER {
            fact *= -x / k as f64;
            let term = fact / k as f64;
            sum += term;
            if term.abs() < sum.abs() * eps {
                return Ok(-EULER_GAMMA - x.ln() - sum);
            }
        }
        return Err(SpecialError::ConvergenceFailure {
            function: "exp_integral_e1",
        });
    }

    let tiny = 1e-300;
    let mut b = x + 1.0;
    let mut c = 1.0 / tiny;
    let mut d = 1.0 / b;
    let mut h = d;

    for i in 1..=MAX_ITER {
        let an = -((i * i) as f64);
        b += 2.0;
        d = 1.0 / (an * d + b);
        c = b + an / c;
        let delta = c * d;
        h *= delta;
        if (delta - 1.0).abs() < eps {
            return Ok(h * (-x).exp());
        }
    }
    Err(SpecialError::ConvergenceFailure {
        function: "exp_integral_e1",
    })
}
