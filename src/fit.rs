//! Scale-to-fit for captured frames.
//!
//! Frames are resized by a single uniform factor so they fit entirely inside
//! a cell box. The aspect ratio is preserved and nothing is cropped.

use image::{DynamicImage, RgbaImage, imageops::FilterType};

/// Resampling filter used for every fitted frame (bilinear).
pub const FIT_FILTER: FilterType = FilterType::Triangle;

/// Compute the dimensions of a `width × height` image scaled to fit within
/// `max_width × max_height`.
///
/// The scale factor is `min(max_width / width, max_height / height)`. Each
/// axis is rounded to the nearest pixel with a floor of one pixel. A scale
/// that is not a positive finite number (for example when every dimension
/// is zero) falls back to `1.0`.
///
/// # Example
///
/// ```
/// // A 1920×1080 frame in a 320×240 cell is bounded by the width.
/// assert_eq!(vidsheet::fit_dimensions(1920, 1080, 320, 240), (320, 180));
/// ```
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let width = f64::from(width);
    let height = f64::from(height);

    let mut scale = (f64::from(max_width) / width).min(f64::from(max_height) / height);
    if !scale.is_finite() || scale <= 0.0 {
        scale = 1.0;
    }

    let fitted_width = (width * scale).round() as u32;
    let fitted_height = (height * scale).round() as u32;
    (fitted_width.max(1), fitted_height.max(1))
}

/// Scale a decoded frame so that it fits within `max_width × max_height`.
///
/// Consumes the raw frame and returns a new RGBA bitmap. Frames that
/// already have the fitted size are converted without resampling.
pub fn fit_frame(frame: DynamicImage, max_width: u32, max_height: u32) -> RgbaImage {
    let (source_width, source_height) = (frame.width(), frame.height());
    let (width, height) = fit_dimensions(source_width, source_height, max_width, max_height);

    // Nothing to sample from; keep the cell transparent.
    if source_width == 0 || source_height == 0 {
        return RgbaImage::new(width, height);
    }

    if (width, height) == (source_width, source_height) {
        return frame.into_rgba8();
    }

    log::trace!("Fitting {source_width}x{source_height} frame to {width}x{height}");
    frame.resize_exact(width, height, FIT_FILTER).into_rgba8()
}
