//! Least-squares curve fitting over Sholl profiles.
//!
//! Four families are supported: straight lines, polynomials of degree 2–8
//! (or "best of" by coefficient of determination), power laws and
//! exponentials with offset. Linear and polynomial fits are solved exactly
//! (closed form / SVD on the design matrix); the nonlinear families start
//! from a linearized guess and refine with damped Gauss-Newton steps.
//!
//! Every entry point refuses profiles at or below [`SMALLEST_DATASET`]
//! points: tiny samples are prone to inflated coefficients of determination,
//! so the fit is skipped and reported absent rather than returned with a
//! meaningless R².

mod nonlinear;
mod poly;

use crate::profile::Profile;
use log::debug;
use serde::Serialize;

/// Largest dataset size for which curve fitting is refused.
pub const SMALLEST_DATASET: usize = 6;

/// Fitted model family, tagging the meaning of the coefficient vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMethod {
    /// `y = a + b·x`, coefficients `[a, b]`.
    Line,
    /// `y = a₀ + a₁·x + … + a_n·xⁿ`, ascending coefficients.
    Poly(u8),
    /// `y = a·x^b`, coefficients `[a, b]`.
    Power,
    /// `y = a·e^(−b·x) + c`, coefficients `[a, b, c]`.
    ExpOffset,
}

/// Coefficients and fit quality of one fitted curve.
///
/// `r_squared` is the coefficient of determination against the fitted data;
/// numerical artifacts can push it slightly outside [0, 1].
#[derive(Clone, Debug, Serialize)]
pub struct FittedCurve {
    pub method: FitMethod,
    pub params: Vec<f64>,
    pub r_squared: f64,
}

impl FittedCurve {
    /// Evaluate the fitted model at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        match self.method {
            FitMethod::Line => self.params[0] + self.params[1] * x,
            FitMethod::Poly(_) => {
                // Horner over ascending coefficients.
                self.params.iter().rev().fold(0.0, |acc, &c| acc * x + c)
            }
            FitMethod::Power => self.params[0] * x.powf(self.params[1]),
            FitMethod::ExpOffset => {
                self.params[0] * (-self.params[1] * x).exp() + self.params[2]
            }
        }
    }

    /// Evaluate the model over a set of abscissae.
    pub fn sample(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

/// Fit `method` to a profile. Returns `None` when the profile is too small
/// or the underlying solver fails (degenerate design matrix, non-positive
/// data for a power law).
pub fn fit(profile: &Profile, method: FitMethod) -> Option<FittedCurve> {
    let xs = profile.radii();
    let ys = profile.counts();
    fit_xy(&xs, &ys, method)
}

/// Fit over raw (x, y) arrays; used internally for trimmed regressions.
pub(crate) fn fit_xy(xs: &[f64], ys: &[f64], method: FitMethod) -> Option<FittedCurve> {
    if xs.len() <= SMALLEST_DATASET {
        debug!(
            "curve fitting skipped: {} point(s), at least {} required",
            xs.len(),
            SMALLEST_DATASET + 1
        );
        return None;
    }
    match method {
        FitMethod::Line => fit_line(xs, ys),
        FitMethod::Poly(degree) => poly::fit_poly(xs, ys, degree),
        FitMethod::Power => nonlinear::fit_power(xs, ys),
        FitMethod::ExpOffset => nonlinear::fit_exp_offset(xs, ys),
    }
}

/// Best-fitting polynomial over degrees 2..=8, by highest R². Ties keep the
/// lowest degree.
pub fn fit_best_poly(profile: &Profile) -> Option<FittedCurve> {
    let xs = profile.radii();
    let ys = profile.counts();
    if xs.len() <= SMALLEST_DATASET {
        debug!(
            "curve fitting skipped: {} point(s), at least {} required",
            xs.len(),
            SMALLEST_DATASET + 1
        );
        return None;
    }
    let mut best: Option<FittedCurve> = None;
    for degree in 2..=8u8 {
        let Some(candidate) = poly::fit_poly(&xs, &ys, degree) else {
            continue;
        };
        debug!(
            "polynomial degree {}: R²={:.5}",
            degree, candidate.r_squared
        );
        let improved = best
            .as_ref()
            .map(|b| candidate.r_squared > b.r_squared)
            .unwrap_or(true);
        if improved {
            best = Some(candidate);
        }
    }
    best
}

fn fit_line(xs: &[f64], ys: &[f64]) -> Option<FittedCurve> {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx <= f64::EPSILON {
        return None;
    }
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let params = vec![intercept, slope];
    let r_squared = r_squared(xs, ys, |x| intercept + slope * x);
    Some(FittedCurve {
        method: FitMethod::Line,
        params,
        r_squared,
    })
}

/// Coefficient of determination of `model` against the data. Zero when the
/// data has no variance to explain.
pub(crate) fn r_squared(xs: &[f64], ys: &[f64], model: impl Fn(f64) -> f64) -> f64 {
    let n = ys.len() as f64;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let r = y - model(x);
        ss_res += r * r;
        ss_tot += (y - mean_y) * (y - mean_y);
    }
    if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    }
}
