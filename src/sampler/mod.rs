//! Radial sampling: one intersection count per scheduled radius.
//!
//! [`ShollSampler`] walks the radius schedule and, per radius, rasterizes the
//! shell, classifies its points against the threshold band and counts
//! connected groups. In 2D each radius may be sampled over a span of
//! successively smaller pixel circles whose counts are combined by the
//! configured bin method; in 3D each radius is one spherical-shell sample.
//!
//! Cancellation is cooperative: the token is polled between radii and between
//! bin samples, and a cancelled run returns the profile populated so far with
//! the remaining counts at zero. Progress reporting is a pure side effect.

mod binning;
mod monitor;

pub use monitor::{CancelToken, Monitor};

use crate::cluster::{count_groups, count_groups_3d};
use crate::geometry::{circumference_points, shell_points};
use crate::image::{classify_pixel, ImageView, VoxelView};
use crate::params::{ConfigError, ShollParams};
use crate::profile::Profile;
use crate::types::PointI2;
use binning::combine;
use log::debug;

/// Shell-by-shell intersection sampler for one validated parameter set.
pub struct ShollSampler {
    params: ShollParams,
    radii: Vec<f64>,
}

impl ShollSampler {
    /// Validate the configuration and derive the radius schedule.
    pub fn new(params: ShollParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let radii = params.radii();
        Ok(Self { params, radii })
    }

    pub fn params(&self) -> &ShollParams {
        &self.params
    }

    /// The derived radius schedule, in physical units.
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Sample a 2D image without observation hooks.
    pub fn sample_2d<I>(&self, img: &I) -> Profile
    where
        I: ImageView,
        I::Pixel: Into<f64>,
    {
        self.sample_2d_monitored(img, &mut Monitor::default())
    }

    /// Sample a 2D image, polling `monitor` for cancellation and reporting
    /// progress after each bin sample.
    pub fn sample_2d_monitored<I>(&self, img: &I, monitor: &mut Monitor) -> Profile
    where
        I: ImageView,
        I::Pixel: Into<f64>,
    {
        let params = &self.params;
        let mut profile = Profile::zeroed(&self.radii);
        let spans = params.spans;
        let total = self.radii.len() * spans;
        let vx = params.voxel_size();
        let center = params.center.xy();
        let band = params.threshold;
        debug!(
            "sampling {} radii, {} sample(s) per radius",
            self.radii.len(),
            spans
        );

        let mut samples = Vec::with_capacity(spans);
        for (i, &radius) in self.radii.iter().enumerate() {
            // Largest pixel radius of this bin span; successive samples walk
            // inward one pixel at a time.
            let r_bin = (radius / vx + (spans / 2) as f64).round() as i32;
            samples.clear();
            for j in 0..spans {
                if monitor.cancelled() {
                    debug!("sampling cancelled at radius index {i}");
                    return profile;
                }
                let points = circumference_points(center, r_bin - j as i32, &params.bounds);
                let foreground: Vec<PointI2> = points
                    .into_iter()
                    .filter(|p| classify_pixel(img, band, p.x, p.y))
                    .collect();
                samples.push(count_groups(&foreground, params.spike_suppression, |x, y| {
                    classify_pixel(img, band, x, y)
                }));
                monitor.report(i * spans + j + 1, total);
            }
            profile.set_count(i, combine(&samples, params.bin_method));
        }
        profile
    }

    /// Sample a voxel stack without observation hooks.
    pub fn sample_3d<V>(&self, stack: &V) -> Profile
    where
        V: VoxelView + Sync,
    {
        self.sample_3d_monitored(stack, &mut Monitor::default())
    }

    /// Sample a voxel stack, polling `monitor` for cancellation and reporting
    /// progress after each radius.
    pub fn sample_3d_monitored<V>(&self, stack: &V, monitor: &mut Monitor) -> Profile
    where
        V: VoxelView + Sync,
    {
        let mut profile = Profile::zeroed(&self.radii);
        debug!("sampling {} spheres", self.radii.len());
        for (i, &radius) in self.radii.iter().enumerate() {
            if monitor.cancelled() {
                debug!("sampling cancelled at radius index {i}");
                return profile;
            }
            let shell = shell_points(stack, &self.params, radius);
            profile.set_count(i, count_groups_3d(&shell) as f64);
            monitor.report(i + 1, self.radii.len());
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;
    use crate::params::BinMethod;
    use crate::types::{PointI3, ThresholdBand};

    /// Image whose foreground is a one-pixel-wide horizontal band through the
    /// center row: every circle crosses it exactly twice.
    fn band_image(size: usize) -> ImageF32 {
        let mut img = ImageF32::new(size, size);
        for x in 0..size {
            img.set(x, size / 2, 1.0);
        }
        img
    }

    fn band_params(size: usize) -> ShollParams {
        let mut params =
            ShollParams::for_image(PointI3::new(size as i32 / 2, size as i32 / 2, 0), size, size);
        params.threshold = ThresholdBand::new(1.0, 1.0);
        params.start_radius = 5.0;
        params.end_radius = 20.0;
        params.step_radius = 5.0;
        params
    }

    #[test]
    fn band_yields_two_crossings_per_radius() {
        let img = band_image(64);
        let sampler = ShollSampler::new(band_params(64)).unwrap();
        let profile = sampler.sample_2d(&img);
        assert_eq!(profile.counts(), vec![2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn span_binning_combines_consecutive_pixel_radii() {
        let img = band_image(64);
        let mut params = band_params(64);
        params.spans = 3;
        params.bin_method = BinMethod::Median;
        let sampler = ShollSampler::new(params).unwrap();
        // Every inner circle also crosses the band twice, so binning leaves
        // the counts unchanged.
        let profile = sampler.sample_2d(&img);
        assert_eq!(profile.counts(), vec![2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn cancellation_returns_partial_profile() {
        let img = band_image(64);
        let sampler = ShollSampler::new(band_params(64)).unwrap();
        let token = CancelToken::new();
        token.cancel();
        let profile = sampler.sample_2d_monitored(&img, &mut Monitor::with_cancel(&token));
        assert_eq!(profile.len(), 4);
        assert!(profile.counts().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn progress_reaches_total() {
        let img = band_image(64);
        let mut params = band_params(64);
        params.spans = 2;
        let sampler = ShollSampler::new(params).unwrap();
        let mut seen = Vec::new();
        let mut hook = |current: usize, total: usize| seen.push((current, total));
        sampler.sample_2d_monitored(&img, &mut Monitor::with_progress(&mut hook));
        assert_eq!(seen.len(), 8);
        assert_eq!(seen.last(), Some(&(8, 8)));
    }
}
