//! Intersections mask: a heat-map overlay painting per-radius profile values
//! (fitted when available, raw otherwise) onto the sampled geometry.
//!
//! This is a thin consumer of the profile; look-up tables and display scaling
//! are left to the caller.

use crate::geometry::circumference_points;
use crate::image::{classify_pixel, ImageF32, ImageView};
use crate::params::ShollParams;

/// Paint `values[i]` onto the foreground pixels of the annulus belonging to
/// the i-th scheduled radius. Background stays at zero.
///
/// Rings span consecutive pixel radii so the mask is hole-free when the
/// schedule is continuous; `values` may be shorter than the schedule (e.g.
/// after cancellation), in which case only the covered rings are painted.
pub fn render_mask<I>(img: &I, params: &ShollParams, values: &[f64]) -> ImageF32
where
    I: ImageView,
    I::Pixel: Into<f64>,
{
    let width = (params.bounds.max_x + 1).max(1) as usize;
    let height = (params.bounds.max_y + 1).max(1) as usize;
    let mut mask = ImageF32::new(width, height);
    if values.is_empty() {
        return mask;
    }

    let vx = params.voxel_size();
    let first_px = (params.start_radius / vx).round() as i32;
    let last_px =
        ((params.start_radius + (values.len() - 1) as f64 * params.step_radius) / vx).round()
            as i32;
    let ring_width = (((last_px - first_px) as f64 / values.len() as f64).round() as i32).max(1);

    let center = params.center.xy();
    let band = params.threshold;
    for (i, &value) in values.iter().enumerate() {
        let ring_start = first_px + i as i32 * ring_width;
        for r in ring_start..ring_start + ring_width {
            for p in circumference_points(center, r, &params.bounds) {
                if classify_pixel(img, band, p.x, p.y) {
                    mask.set(p.x as usize, p.y as usize, value as f32);
                }
            }
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PointI3, ThresholdBand};

    #[test]
    fn mask_paints_only_foreground_pixels() {
        // Foreground: left half of a 64x64 image.
        let mut img = ImageF32::new(64, 64);
        for y in 0..64 {
            for x in 0..32 {
                img.set(x, y, 1.0);
            }
        }
        let mut params = ShollParams::for_image(PointI3::new(32, 32, 0), 64, 64);
        params.threshold = ThresholdBand::new(1.0, 1.0);
        params.start_radius = 4.0;
        params.end_radius = 12.0;
        params.step_radius = 4.0;

        let mask = render_mask(&img, &params, &[3.0, 5.0, 2.0]);
        let mut painted = 0;
        for y in 0..64usize {
            for x in 0..64usize {
                let v = mask.get(x, y);
                if v != 0.0 {
                    painted += 1;
                    assert!(x < 32, "painted background pixel at ({x}, {y})");
                    assert!(v == 3.0 || v == 5.0 || v == 2.0);
                }
            }
        }
        assert!(painted > 0);
    }

    #[test]
    fn empty_values_produce_blank_mask() {
        let img = ImageF32::new(16, 16);
        let params = ShollParams::for_image(PointI3::new(8, 8, 0), 16, 16);
        let mask = render_mask(&img, &params, &[]);
        assert!(mask.data.iter().all(|&v| v == 0.0));
    }
}
