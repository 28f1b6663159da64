//! End-to-end pipeline: sample → filter → transform → fit → describe.
//!
//! [`ShollAnalyzer`] wires the sampler, the profile transforms and the
//! descriptor engine into one call per image or stack. Every derived product
//! is optional in the report: degenerate data (an all-zero profile, too few
//! points for a fit) leaves the corresponding slot absent instead of
//! aborting the run.

use crate::descriptors::{
    determination_ratio, regression, MethodSelection, PolyFitDescriptors, ProfileStats,
    RegressionSummary,
};
use crate::fit::{fit, fit_best_poly, FitMethod, FittedCurve};
use crate::image::{ImageView, VoxelView};
use crate::params::{ConfigError, DescriptorParams, PolyChoice, ShollParams};
use crate::profile::Profile;
use crate::sampler::{Monitor, ShollSampler};
use log::{debug, warn};
use serde::Serialize;
use std::time::Instant;

/// Full result of one analysis run.
///
/// The raw profile is always present (possibly partial after cancellation);
/// everything else is derived from the non-zero filtered samples and may be
/// absent on degenerate data.
#[derive(Clone, Debug, Serialize)]
pub struct ShollReport {
    /// Raw sampled profile, one entry per scheduled radius.
    pub profile: Profile,
    /// Profile restricted to intersecting radii (radius > 0, count > 0).
    pub filtered: Profile,
    /// Counts divided by the configured geometric normalizer.
    pub normalized: Profile,
    /// Normalized counts on a log ordinate.
    pub semi_log: Profile,
    /// Semi-log with the radius axis log-transformed as well.
    pub log_log: Profile,
    /// Polynomial fit of the linear profile.
    pub poly_fit: Option<FittedCurve>,
    pub poly_descriptors: Option<PolyFitDescriptors>,
    /// Power-law fit of the normalized profile.
    pub power_fit: Option<FittedCurve>,
    /// Exponential-with-offset fit of the log-log profile.
    pub exp_fit: Option<FittedCurve>,
    pub stats: Option<ProfileStats>,
    pub semi_log_regression: Option<RegressionSummary>,
    pub log_log_regression: Option<RegressionSummary>,
    pub method_selection: Option<MethodSelection>,
    pub elapsed_ms: f64,
}

/// One-call Sholl analysis over a validated configuration.
pub struct ShollAnalyzer {
    sampler: ShollSampler,
    descriptors: DescriptorParams,
}

impl ShollAnalyzer {
    pub fn new(params: ShollParams, descriptors: DescriptorParams) -> Result<Self, ConfigError> {
        Ok(Self {
            sampler: ShollSampler::new(params)?,
            descriptors,
        })
    }

    pub fn sampler(&self) -> &ShollSampler {
        &self.sampler
    }

    /// Analyze a 2D image.
    pub fn analyze_image<I>(&self, img: &I) -> ShollReport
    where
        I: ImageView,
        I::Pixel: Into<f64>,
    {
        self.analyze_image_monitored(img, &mut Monitor::default())
    }

    /// Analyze a 2D image with cancellation/progress hooks.
    pub fn analyze_image_monitored<I>(&self, img: &I, monitor: &mut Monitor) -> ShollReport
    where
        I: ImageView,
        I::Pixel: Into<f64>,
    {
        let started = Instant::now();
        let profile = self.sampler.sample_2d_monitored(img, monitor);
        self.describe(profile, started)
    }

    /// Analyze a voxel stack.
    pub fn analyze_stack<V>(&self, stack: &V) -> ShollReport
    where
        V: VoxelView + Sync,
    {
        self.analyze_stack_monitored(stack, &mut Monitor::default())
    }

    /// Analyze a voxel stack with cancellation/progress hooks.
    pub fn analyze_stack_monitored<V>(&self, stack: &V, monitor: &mut Monitor) -> ShollReport
    where
        V: VoxelView + Sync,
    {
        let started = Instant::now();
        let profile = self.sampler.sample_3d_monitored(stack, monitor);
        self.describe(profile, started)
    }

    fn describe(&self, profile: Profile, started: Instant) -> ShollReport {
        let params = self.sampler.params();
        let filtered = profile.non_zero();
        if filtered.is_empty() {
            warn!("all intersection counts were zero; descriptors skipped");
        }
        let normalized = filtered.normalized(
            self.descriptors.normalizer,
            params.dim,
            params.step_radius,
        );
        let semi_log = normalized.log_y();
        let log_log = semi_log.log_x();

        let poly_fit = match self.descriptors.poly {
            PolyChoice::Degree(degree) => fit(&filtered, FitMethod::Poly(degree)),
            PolyChoice::BestFit => fit_best_poly(&filtered),
        };
        let poly_descriptors = poly_fit
            .as_ref()
            .and_then(|curve| PolyFitDescriptors::compute(curve, &filtered, &self.descriptors));
        if let Some(d) = &poly_descriptors {
            debug!(
                "polynomial fit: degree={} R²={:.4} critical=({:.3}, {:.3})",
                d.degree, d.r_squared, d.critical_radius, d.critical_value
            );
        }

        ShollReport {
            power_fit: fit(&normalized, FitMethod::Power),
            exp_fit: fit(&log_log, FitMethod::ExpOffset),
            stats: ProfileStats::compute(&filtered, &self.descriptors),
            semi_log_regression: regression(&semi_log),
            log_log_regression: regression(&log_log),
            method_selection: determination_ratio(&semi_log, &log_log),
            profile,
            filtered,
            normalized,
            semi_log,
            log_log,
            poly_fit,
            poly_descriptors,
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

impl ShollReport {
    /// Flat descriptor table: every computed scalar, keyed by name, in
    /// presentation order.
    pub fn descriptor_entries(&self) -> Vec<(&'static str, f64)> {
        let mut rows = Vec::new();
        if let Some(stats) = &self.stats {
            rows.extend(stats.entries());
        }
        if let Some(poly) = &self.poly_descriptors {
            rows.extend(poly.entries());
        }
        if let Some(selection) = &self.method_selection {
            rows.push(("Determination ratio", selection.determination_ratio));
        }
        if let Some(summary) = &self.semi_log_regression {
            push_regression_rows(&mut rows, summary, true);
        }
        if let Some(summary) = &self.log_log_regression {
            push_regression_rows(&mut rows, summary, false);
        }
        rows
    }
}

fn push_regression_rows(
    rows: &mut Vec<(&'static str, f64)>,
    summary: &RegressionSummary,
    semi_log: bool,
) {
    let (coeff, intercept, r2, coeff_trim, intercept_trim, r2_trim) = if semi_log {
        (
            "Regression coefficient (Semi-log)",
            "Regression intercept (Semi-log)",
            "Regression R^2 (Semi-log)",
            "Regression coefficient (Semi-log) [P10-P90]",
            "Regression intercept (Semi-log) [P10-P90]",
            "Regression R^2 (Semi-log) [P10-P90]",
        )
    } else {
        (
            "Regression coefficient (Log-log)",
            "Regression intercept (Log-log)",
            "Regression R^2 (Log-log)",
            "Regression coefficient (Log-log) [P10-P90]",
            "Regression intercept (Log-log) [P10-P90]",
            "Regression R^2 (Log-log) [P10-P90]",
        )
    };
    rows.push((coeff, summary.full.slope));
    rows.push((intercept, summary.full.intercept));
    rows.push((r2, summary.full.r_squared));
    if let Some(trimmed) = &summary.trimmed {
        rows.push((coeff_trim, trimmed.slope));
        rows.push((intercept_trim, trimmed.intercept));
        rows.push((r2_trim, trimmed.r_squared));
    }
}
