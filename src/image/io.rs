//! I/O helpers for the demo binary and tests.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/TIFF into an owned 8-bit gray
//!   buffer.
//! - `save_grayscale_f32`: write an [`ImageF32`] (e.g. the intersections
//!   mask) to a grayscale PNG, rescaled to its value range.
//! - `write_json_file`: pretty-print a serializable report to disk.

use super::{ImageF32, ImageU8, ImageView};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit grayscale buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct GrayBufferU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayBufferU8 {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only [`ImageU8`] view.
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayBufferU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(GrayBufferU8::new(width, height, img.into_raw()))
}

/// Save a float image to a grayscale PNG, linearly rescaling its value range
/// to 0..=255.
pub fn save_grayscale_f32(img: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let max = img
        .data
        .iter()
        .copied()
        .fold(0.0f32, f32::max)
        .max(f32::MIN_POSITIVE);
    let mut out = GrayImage::new(img.w as u32, img.h as u32);
    for (y, row) in img.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = (px / max * 255.0).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
