//! Grayscale conversion and resizing
//!
//! Turns decoded images into the single-channel intensity grids the
//! classifier consumes.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, RgbImage};

use crate::error::{AsciiError, Result};

/// Largest accepted resize ratio. Keeps upscaled targets within memory.
pub const MAX_RESIZE_RATIO: f32 = 4.0;

/// Calculate luminance from an RGB image
///
/// Formula: L = 0.299*R + 0.587*G + 0.114*B (ITU-R 601-2), evaluated in
/// 16-bit fixed point with rounding so results match the common "L" mode
/// conversion bit for bit.
///
/// # Arguments
/// * `img` - Input RGB image
///
/// # Returns
/// Grayscale image with luminance values
pub fn calculate_luminance(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let r = u32::from(pixel[0]);
        let g = u32::from(pixel[1]);
        let b = u32::from(pixel[2]);

        // Weights sum to 65536, so the result never exceeds 255
        let luminance = (r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16;
        output.put_pixel(x, y, Luma([luminance as u8]));
    }

    output
}

/// Dimensions after scaling by `ratio`, truncated, at least 1×1.
pub fn scaled_dimensions(width: u32, height: u32, ratio: f32) -> (u32, u32) {
    let w = (ratio * width as f32) as u32;
    let h = (ratio * height as f32) as u32;
    (w.max(1), h.max(1))
}

/// Reject ratios outside `(0, MAX_RESIZE_RATIO]`.
pub(crate) fn check_ratio(name: &str, ratio: f32) -> Result<()> {
    if !ratio.is_finite() || ratio <= 0.0 || ratio > MAX_RESIZE_RATIO {
        return Err(AsciiError::Config(format!(
            "{name} must be in (0, {MAX_RESIZE_RATIO}], got {ratio}"
        )));
    }
    Ok(())
}

/// Resize an image by a fraction of its dimensions (0.2 = 20%)
///
/// Uses Lanczos3 filtering for anti-aliased downscaling. Returns a copy of
/// the input when the target size equals the current size.
pub fn resize_by_ratio(img: &DynamicImage, ratio: f32) -> Result<DynamicImage> {
    check_ratio("resize ratio", ratio)?;

    let (width, height) = (img.width(), img.height());
    let (target_width, target_height) = scaled_dimensions(width, height, ratio);

    if (target_width, target_height) == (width, height) {
        return Ok(img.clone());
    }

    log::debug!("resizing {width}x{height} -> {target_width}x{target_height}");
    Ok(img.resize_exact(target_width, target_height, FilterType::Lanczos3))
}

/// Resize (optionally) then convert to an intensity grid.
pub fn to_intensity_grid(img: &DynamicImage, resize: Option<f32>) -> Result<GrayImage> {
    let rgb = match resize {
        Some(ratio) => resize_by_ratio(img, ratio)?.to_rgb8(),
        None => img.to_rgb8(),
    };
    Ok(calculate_luminance(&rgb))
}

/// Decode an image file, resize it and convert it to an intensity grid.
pub fn load_intensity_grid(path: &Path, resize: Option<f32>) -> Result<GrayImage> {
    if let Some(ratio) = resize {
        check_ratio("resize ratio", ratio)?;
    }

    let img = image::open(path)?;
    log::info!(
        "loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );

    to_intensity_grid(&img, resize)
}
