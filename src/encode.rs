//! Contact-sheet image encoding.
//!
//! The output format is chosen from the file extension: `.png` (or no
//! extension) writes a lossless PNG, `.jpg` / `.jpeg` writes a JPEG at the
//! requested quality. The image is encoded fully in memory before the output
//! file is created, so a failed encode never leaves a partial file behind.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    path::Path,
};

use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage,
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
};

use crate::error::SheetError;

/// Default JPEG quality.
pub const DEFAULT_QUALITY: u8 = 90;

/// Supported contact-sheet output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Lossless PNG, keeps the alpha channel.
    Png,
    /// Lossy JPEG, alpha is discarded.
    Jpeg,
}

impl OutputFormat {
    /// Select the format from the extension of `path`.
    ///
    /// The comparison is case-insensitive. A path without an extension is
    /// written as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::ConfigError`] for any other extension.
    ///
    /// # Example
    ///
    /// ```
    /// use vidsheet::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("sheet.JPG")?, OutputFormat::Jpeg);
    /// assert_eq!(OutputFormat::from_path("sheet")?, OutputFormat::Png);
    /// assert!(OutputFormat::from_path("sheet.gif").is_err());
    /// # Ok::<(), vidsheet::SheetError>(())
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SheetError> {
        let extension = path
            .as_ref()
            .extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase());

        match extension.as_deref() {
            None | Some("png") => Ok(OutputFormat::Png),
            Some("jpg") | Some("jpeg") => Ok(OutputFormat::Jpeg),
            Some(other) => Err(SheetError::ConfigError(format!(
                "unsupported output format: .{other} (expected .png, .jpg or .jpeg)"
            ))),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// Check that a JPEG quality lies within `1..=100`.
pub fn validate_quality(quality: u8) -> Result<(), SheetError> {
    if (1..=100).contains(&quality) {
        Ok(())
    } else {
        Err(SheetError::ConfigError(format!(
            "quality must be between 1 and 100, got {quality}"
        )))
    }
}

/// Encode a canvas into an in-memory byte buffer.
///
/// `quality` is only used for JPEG output.
///
/// # Errors
///
/// Returns [`SheetError::ConfigError`] for an out-of-range quality, or
/// [`SheetError::ImageError`] if the codec fails.
pub fn encode_canvas(
    canvas: &RgbaImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, SheetError> {
    validate_quality(quality)?;

    let (width, height) = canvas.dimensions();
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer).write_image(
                canvas.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(canvas.clone()).into_rgb8();
            JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
    }

    Ok(buffer)
}

/// Encode a canvas and write it to `path`.
///
/// The format is picked by [`OutputFormat::from_path`]. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns [`SheetError::ConfigError`] for an unsupported extension or
/// quality, and [`SheetError::EncodeError`] if encoding or writing fails.
pub fn save_canvas<P: AsRef<Path>>(
    canvas: &RgbaImage,
    path: P,
    quality: u8,
) -> Result<OutputFormat, SheetError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    validate_quality(quality)?;

    let encode_error = |reason: String| SheetError::EncodeError {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = encode_canvas(canvas, format, quality).map_err(|error| encode_error(error.to_string()))?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|error| {
            encode_error(format!("failed to create {}: {error}", parent.display()))
        })?;
    }

    fs::write(path, &bytes).map_err(|error| encode_error(error.to_string()))?;

    log::debug!(
        "Wrote {} byte {format} contact sheet to {}",
        bytes.len(),
        path.display()
    );
    Ok(format)
}
