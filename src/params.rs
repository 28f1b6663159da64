//! Parameter types configuring the sampling run and the descriptor stage.
//!
//! This module groups knobs for shell definition (radius schedule and
//! calibration), noise handling (multi-sample binning, spike suppression,
//! isolated-voxel filtering) and the curve-fitting/descriptor stage.
//!
//! All parameters are validated up front by [`ShollParams::validate`]; the
//! sampling loops themselves never fail on configuration.

use crate::types::{Bounds, PointI3, ThresholdBand};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of samples per radius in 2D mode.
pub const MAX_SPANS: usize = 10;

/// Dimensionality of the analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dim {
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    ThreeD,
}

/// How multiple samples taken per radius are combined (2D only).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinMethod {
    #[default]
    Mean,
    Median,
    Mode,
}

/// Geometric normalizer applied to intersection counts.
///
/// The 2D/3D interpretation follows the dimensionality of the run: area or
/// volume, perimeter or surface, annulus or spherical shell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalizer {
    #[default]
    Area,
    Perimeter,
    Annulus,
}

impl Normalizer {
    /// Human-readable label for tabular output.
    pub fn label(self, dim: Dim) -> &'static str {
        match (self, dim) {
            (Normalizer::Area, Dim::TwoD) => "Area",
            (Normalizer::Area, Dim::ThreeD) => "Volume",
            (Normalizer::Perimeter, Dim::TwoD) => "Perimeter",
            (Normalizer::Perimeter, Dim::ThreeD) => "Surface",
            (Normalizer::Annulus, Dim::TwoD) => "Annulus",
            (Normalizer::Annulus, Dim::ThreeD) => "Spherical shell",
        }
    }
}

/// Polynomial degree selection for the linear-profile fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolyChoice {
    /// Fixed degree in `2..=8`.
    Degree(u8),
    /// Pick the degree in `2..=8` with the highest coefficient of
    /// determination.
    #[default]
    BestFit,
}

/// Pre-flight configuration failures, surfaced before any sampling begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("radius step must be positive, got {0}")]
    NonPositiveStep(f64),
    #[error("starting radius must be non-negative, got {0}")]
    NegativeStartRadius(f64),
    #[error(
        "radius schedule needs at least two samples \
         (start={start}, end={end}, step={step})"
    )]
    ShortSchedule { start: f64, end: f64, step: f64 },
    #[error("span count must be within 1..={MAX_SPANS}, got {0}")]
    InvalidSpanCount(usize),
    #[error("threshold band is inverted: lower {lower} > upper {upper}")]
    InvertedThresholds { lower: f64, upper: f64 },
    #[error("center ({x}, {y}, {z}) lies outside the analysis bounds")]
    CenterOutOfBounds { x: i32, y: i32, z: i32 },
    #[error("pixel/voxel pitch must be positive (lateral {lateral}, axial {axial})")]
    NonPositivePitch { lateral: f64, axial: f64 },
}

/// Sampling parameters for one analysis run.
///
/// Constructed once from external input (ROI, calibration, threshold state)
/// and never mutated during sampling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShollParams {
    /// Center of analysis, in pixel coordinates (z is the slice index and is
    /// ignored in 2D).
    pub center: PointI3,
    /// First sampled radius, physical units.
    pub start_radius: f64,
    /// Last sampled radius, physical units.
    pub end_radius: f64,
    /// Distance between consecutive shells, physical units.
    pub step_radius: f64,
    /// Lateral pixel pitch in physical units (√(pw·ph) for slightly
    /// anisotropic pixels).
    pub vx_wh: f64,
    /// Axial voxel pitch (z-step) in physical units. Unused in 2D.
    pub vx_d: f64,
    /// Inclusive intensity range defining the arbor.
    pub threshold: ThresholdBand,
    /// Analysis bounds; must contain the center. Shell scans never leave this
    /// box.
    pub bounds: Bounds,
    pub dim: Dim,
    /// Number of samples per radius (2D). `1` disables binning.
    pub spans: usize,
    /// How the per-radius samples are combined (2D).
    pub bin_method: BinMethod,
    /// Discard single-pixel groups caused by shells grazing diagonal edges
    /// (2D).
    pub spike_suppression: bool,
    /// Ignore shell voxels with no 6-connected foreground neighbor (3D).
    pub skip_single_voxels: bool,
}

impl ShollParams {
    /// Parameters for a 2D analysis spanning a full `w × h` image, with the
    /// default shell schedule and a binary threshold.
    pub fn for_image(center: PointI3, w: usize, h: usize) -> Self {
        Self {
            center,
            start_radius: 10.0,
            end_radius: 100.0,
            step_radius: 1.0,
            vx_wh: 1.0,
            vx_d: 1.0,
            threshold: ThresholdBand::binary(),
            bounds: Bounds::for_image(w, h),
            dim: Dim::TwoD,
            spans: 1,
            bin_method: BinMethod::Mean,
            spike_suppression: true,
            skip_single_voxels: false,
        }
    }

    /// Parameters for a 3D analysis spanning a full `w × h × d` stack.
    pub fn for_stack(center: PointI3, w: usize, h: usize, d: usize) -> Self {
        Self {
            bounds: Bounds::for_stack(w, h, d),
            dim: Dim::ThreeD,
            ..Self::for_image(center, w, h)
        }
    }

    /// Isotropic pitch used to convert physical radii to pixel radii: the
    /// lateral pitch in 2D, the geometric mean of all three pitches in 3D.
    pub fn voxel_size(&self) -> f64 {
        match self.dim {
            Dim::TwoD => self.vx_wh,
            Dim::ThreeD => (self.vx_wh * self.vx_wh * self.vx_d).cbrt(),
        }
    }

    /// Derived radius schedule: `start + i·step`, strictly increasing.
    pub fn radii(&self) -> Vec<f64> {
        let count = self.schedule_len();
        (0..count)
            .map(|i| self.start_radius + i as f64 * self.step_radius)
            .collect()
    }

    fn schedule_len(&self) -> usize {
        if self.step_radius <= 0.0 || self.end_radius < self.start_radius {
            return 0;
        }
        ((self.end_radius - self.start_radius) / self.step_radius) as usize + 1
    }

    /// Check the full parameter set; sampling entry points require this to
    /// have passed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_radius <= 0.0 {
            return Err(ConfigError::NonPositiveStep(self.step_radius));
        }
        if self.start_radius < 0.0 {
            return Err(ConfigError::NegativeStartRadius(self.start_radius));
        }
        if self.schedule_len() < 2 {
            return Err(ConfigError::ShortSchedule {
                start: self.start_radius,
                end: self.end_radius,
                step: self.step_radius,
            });
        }
        if self.spans == 0 || self.spans > MAX_SPANS {
            return Err(ConfigError::InvalidSpanCount(self.spans));
        }
        if self.threshold.lower > self.threshold.upper {
            return Err(ConfigError::InvertedThresholds {
                lower: self.threshold.lower,
                upper: self.threshold.upper,
            });
        }
        if self.vx_wh <= 0.0 || self.vx_d <= 0.0 {
            return Err(ConfigError::NonPositivePitch {
                lateral: self.vx_wh,
                axial: self.vx_d,
            });
        }
        let inside = match self.dim {
            Dim::TwoD => self.bounds.contains_xy(self.center.x, self.center.y),
            Dim::ThreeD => self.bounds.contains(self.center),
        };
        if !inside {
            return Err(ConfigError::CenterOutOfBounds {
                x: self.center.x,
                y: self.center.y,
                z: self.center.z,
            });
        }
        Ok(())
    }
}

/// Parameters for the descriptor/curve-fitting stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DescriptorParams {
    /// Minimum intersection count a radius must reach to qualify as
    /// enclosing.
    pub enclosing_cutoff: f64,
    /// Number of primary branches used for ramification indices. `None` (or
    /// zero) infers it from the count at the first sampled radius.
    pub primary_branches: Option<u32>,
    /// Degree policy for the polynomial fit of the linear profile.
    pub poly: PolyChoice,
    /// Normalizer for the linear-norm/semi-log/log-log variants.
    pub normalizer: Normalizer,
}

impl Default for DescriptorParams {
    fn default() -> Self {
        Self {
            enclosing_cutoff: 1.0,
            primary_branches: None,
            poly: PolyChoice::BestFit,
            normalizer: Normalizer::Area,
        }
    }
}

impl DescriptorParams {
    /// Divisor for ramification indices: the configured primary-branch count,
    /// or the supplied first-radius intersection count when inferring.
    pub(crate) fn primary_divisor(&self, first_count: f64) -> f64 {
        match self.primary_branches {
            Some(n) if n > 0 => n as f64,
            _ => first_count,
        }
    }
}
