#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod analyzer;
pub mod config;
pub mod image;
pub mod params;
pub mod types;

// Pipeline stages – public for advanced callers driving them directly.
pub mod cluster;
pub mod descriptors;
pub mod fit;
pub mod geometry;
pub mod mask;
pub mod profile;
pub mod sampler;

// --- High-level re-exports -------------------------------------------------

// Main entry points: analyzer + sampler + their configuration.
pub use crate::analyzer::{ShollAnalyzer, ShollReport};
pub use crate::params::{
    BinMethod, ConfigError, DescriptorParams, Dim, Normalizer, PolyChoice, ShollParams,
};
pub use crate::profile::{Profile, ProfilePoint};
pub use crate::sampler::{CancelToken, Monitor, ShollSampler};
pub use crate::types::{Bounds, PointI2, PointI3, ThresholdBand};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use sholl_analysis::prelude::*;
///
/// # fn main() -> Result<(), sholl_analysis::ConfigError> {
/// let (w, h) = (256usize, 256usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let params = ShollParams::for_image(PointI3::new(128, 128, 0), w, h);
/// let analyzer = ShollAnalyzer::new(params, DescriptorParams::default())?;
/// let report = analyzer.analyze_image(&img);
/// println!("intersecting radii: {}", report.filtered.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageU8, VoxelStackF32};
    pub use crate::types::{PointI3, ThresholdBand};
    pub use crate::{DescriptorParams, ShollAnalyzer, ShollParams, ShollSampler};
}
