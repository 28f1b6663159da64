use crate::fit::{fit, fit_xy, FitMethod, SMALLEST_DATASET};
use crate::profile::Profile;
use log::debug;
use serde::Serialize;

/// One straight-line regression. The slope is negated by convention, so the
/// usual decaying semi-log/log-log profiles report a positive Sholl decay
/// coefficient `k`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Regression of a normalized profile over the full range and, when enough
/// points remain, restricted to the 10th–90th percentile window.
#[derive(Clone, Debug, Serialize)]
pub struct RegressionSummary {
    pub full: RegressionLine,
    pub trimmed: Option<RegressionLine>,
}

/// Compute full and P10–P90 regressions. `None` when the profile is too
/// small for even the full fit.
pub fn regression(profile: &Profile) -> Option<RegressionSummary> {
    let full = fit(profile, FitMethod::Line).map(to_regression_line)?;

    let xs = profile.radii();
    let ys = profile.counts();
    let size = xs.len();
    let start = (size as f64 * 0.10) as usize;
    let end = size - 1 - start;
    let trimmed = if end <= SMALLEST_DATASET {
        debug!("P10-P90 regression skipped: window of {} point(s) is too small", end.saturating_sub(start));
        None
    } else {
        fit_xy(&xs[start..end], &ys[start..end], FitMethod::Line).map(to_regression_line)
    };
    Some(RegressionSummary { full, trimmed })
}

fn to_regression_line(curve: crate::fit::FittedCurve) -> RegressionLine {
    RegressionLine {
        slope: -curve.params[1],
        intercept: curve.params[0],
        r_squared: curve.r_squared,
    }
}

/// Which normalized representation the determination ratio prefers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreferredMethod {
    SemiLog,
    LogLog,
}

/// Determination-ratio choice between the semi-log and log-log profiles.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct MethodSelection {
    /// R²(semi-log) / R²(log-log), the denominator floored to stay finite.
    pub determination_ratio: f64,
    pub preferred: PreferredMethod,
}

/// Fit straight lines to both normalized profiles and compare their
/// coefficients of determination. A ratio of at least 1 prefers semi-log.
///
/// The choice is advisory output, not a constraint on which curves are
/// computed.
pub fn determination_ratio(semi_log: &Profile, log_log: &Profile) -> Option<MethodSelection> {
    let semi = fit(semi_log, FitMethod::Line)?;
    let log = fit(log_log, FitMethod::Line)?;
    let ratio = semi.r_squared / log.r_squared.max(f64::MIN_POSITIVE);
    debug!(
        "determination ratio {:.5} (semi-log R²={:.5}, log-log R²={:.5})",
        ratio, semi.r_squared, log.r_squared
    );
    Some(MethodSelection {
        determination_ratio: ratio,
        preferred: if ratio >= 1.0 {
            PreferredMethod::SemiLog
        } else {
            PreferredMethod::LogLog
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfilePoint;

    fn profile_from(xs: &[f64], ys: &[f64]) -> Profile {
        Profile::new(
            xs.iter()
                .zip(ys)
                .map(|(&radius, &count)| ProfilePoint { radius, count })
                .collect(),
        )
    }

    fn decaying_line(n: usize, slope: f64) -> Profile {
        let xs: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| 5.0 + slope * x).collect();
        profile_from(&xs, &ys)
    }

    #[test]
    fn slope_is_negated_by_convention() {
        let summary = regression(&decaying_line(12, -0.3)).unwrap();
        assert!((summary.full.slope - 0.3).abs() < 1e-10);
        assert!((summary.full.intercept - 5.0).abs() < 1e-10);
        assert!((summary.full.r_squared - 1.0).abs() < 1e-10);
    }

    #[test]
    fn trimmed_window_is_skipped_on_small_profiles() {
        // Seven points: the P10-P90 window upper index is 6, at the dataset
        // floor, so only the full regression is reported.
        let summary = regression(&decaying_line(7, -0.3)).unwrap();
        assert!(summary.trimmed.is_none());

        let summary = regression(&decaying_line(10, -0.3)).unwrap();
        assert!(summary.trimmed.is_some());
    }

    #[test]
    fn regression_refused_below_dataset_floor() {
        assert!(regression(&decaying_line(6, -0.3)).is_none());
    }

    #[test]
    fn identical_r_squared_prefers_semi_log() {
        // The same profile on both sides gives ratio exactly 1.0, which the
        // tie-break resolves to semi-log.
        let p = decaying_line(10, -0.2);
        let selection = determination_ratio(&p, &p).unwrap();
        assert_eq!(selection.determination_ratio, 1.0);
        assert_eq!(selection.preferred, PreferredMethod::SemiLog);
    }

    #[test]
    fn noisier_semi_log_defers_to_log_log() {
        let xs: Vec<f64> = (1..=12).map(|i| i as f64).collect();
        let noisy: Vec<f64> = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| -0.4 * x + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let clean: Vec<f64> = xs.iter().map(|&x| -0.4 * x + 2.0).collect();
        let selection =
            determination_ratio(&profile_from(&xs, &noisy), &profile_from(&xs, &clean)).unwrap();
        assert!(selection.determination_ratio < 1.0);
        assert_eq!(selection.preferred, PreferredMethod::LogLog);
    }
}
