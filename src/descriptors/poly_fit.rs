use super::stats::moments;
use crate::fit::{FitMethod, FittedCurve};
use crate::params::DescriptorParams;
use crate::profile::Profile;
use serde::Serialize;

/// Resolution of the bounded search for the fitted curve's local maximum.
const CRITICAL_SEARCH_STEPS: usize = 1000;

/// Descriptors of the polynomial fitted to the unnormalized linear profile.
#[derive(Clone, Debug, Serialize)]
pub struct PolyFitDescriptors {
    /// Ordinate of the local maximum of the fitted curve.
    pub critical_value: f64,
    /// Abscissa of the local maximum of the fitted curve.
    pub critical_radius: f64,
    /// Average of the fitted polynomial over the sampled radius range.
    pub mean_value: f64,
    /// Critical value divided by the number of primary branches.
    pub ramification_index: f64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub degree: u8,
    pub r_squared: f64,
}

impl PolyFitDescriptors {
    /// Derive descriptors from a polynomial fit of `profile`. Returns `None`
    /// when the curve is not polynomial.
    pub fn compute(
        curve: &FittedCurve,
        profile: &Profile,
        params: &DescriptorParams,
    ) -> Option<Self> {
        let FitMethod::Poly(degree) = curve.method else {
            return None;
        };
        let xs = profile.radii();
        let ys = profile.counts();
        let fitted = curve.sample(&xs);

        let (critical_radius, critical_value) = critical_point(curve, &xs, &fitted);
        let mean_value = polynomial_mean(&curve.params, xs[0], xs[xs.len() - 1]);
        let m = moments(&fitted);
        Some(Self {
            critical_value,
            critical_radius,
            mean_value,
            ramification_index: critical_value / params.primary_divisor(ys[0]),
            skewness: m.skewness,
            kurtosis: m.kurtosis,
            degree,
            r_squared: curve.r_squared,
        })
    }

    /// Tabular rows for export; absent descriptors are skipped.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut rows = vec![
            ("Critical value", self.critical_value),
            ("Critical radius", self.critical_radius),
            ("Mean value", self.mean_value),
            ("Ramification index (fit)", self.ramification_index),
        ];
        if let Some(skewness) = self.skewness {
            rows.push(("Skewness (fit)", skewness));
        }
        if let Some(kurtosis) = self.kurtosis {
            rows.push(("Kurtosis (fit)", kurtosis));
        }
        rows.push(("Polyn. degree", self.degree as f64));
        rows.push(("Polyn. R^2", self.r_squared));
        rows
    }
}

/// Locate the local maximum of the fitted curve by evaluating it at evenly
/// spaced abscissae between the midpoints flanking the discrete maximum.
///
/// This is a bounded search assuming unimodality near the discrete maximum,
/// not a full-domain search; the first of equal values wins.
fn critical_point(curve: &FittedCurve, xs: &[f64], fitted: &[f64]) -> (f64, f64) {
    let last = xs.len() - 1;
    let max_idx = fitted
        .iter()
        .enumerate()
        .fold(0usize, |best, (i, &v)| if v > fitted[best] { i } else { best });
    let left = (xs[max_idx.saturating_sub(1)] + xs[max_idx]) / 2.0;
    let right = (xs[(max_idx + 1).min(last)] + xs[max_idx]) / 2.0;
    let step = (right - left) / CRITICAL_SEARCH_STEPS as f64;

    let mut critical_radius = left;
    let mut critical_value = curve.eval(left);
    for i in 1..CRITICAL_SEARCH_STEPS {
        let x = left + i as f64 * step;
        let value = curve.eval(x);
        if value > critical_value {
            critical_value = value;
            critical_radius = x;
        }
    }
    (critical_radius, critical_value)
}

/// Closed-form average of the polynomial over `[x0, x1]`: the antiderivative
/// evaluated term by term, divided by the interval width.
fn polynomial_mean(coefficients: &[f64], x0: f64, x1: f64) -> f64 {
    let width = x1 - x0;
    if width.abs() <= f64::EPSILON {
        return coefficients.iter().rev().fold(0.0, |acc, &c| acc * x0 + c);
    }
    let integral: f64 = coefficients
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let k = i as f64 + 1.0;
            c / k * (x1.powf(k) - x0.powf(k))
        })
        .sum();
    integral / width
}
