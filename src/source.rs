//! Media source abstractions.
//!
//! The contact-sheet pipeline never decodes video itself. It asks a
//! [`MediaProbe`] for the duration and resolution, then asks a
//! [`FrameExtractor`] for one decoded image per sampled timestamp.
//! [`MediaFile`](crate::MediaFile) implements both on top of FFmpeg; tests
//! and embedders can supply in-memory implementations.

use image::DynamicImage;

use crate::error::SheetError;

/// Duration and native resolution of a video.
///
/// Read once per run and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Total duration in seconds.
    pub duration: f64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl VideoMetadata {
    /// Create metadata from a duration in seconds and a resolution.
    pub fn new(duration: f64, width: u32, height: u32) -> Self {
        Self {
            duration,
            width,
            height,
        }
    }

    /// Check that the metadata is usable for sampling.
    ///
    /// Returns a human-readable reason when the duration is not a positive
    /// finite number or either dimension is zero.
    pub fn check(&self) -> Result<(), String> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(format!(
                "video duration is missing or zero ({})",
                self.duration
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "video resolution is missing ({}x{})",
                self.width, self.height
            ));
        }
        Ok(())
    }
}

/// Reads a video's duration and native resolution.
pub trait MediaProbe {
    /// Return the metadata of the underlying video.
    ///
    /// # Errors
    ///
    /// Implementations return [`SheetError::ProbeError`] when the media is
    /// unreadable or the metadata is absent.
    fn probe(&mut self) -> Result<VideoMetadata, SheetError>;
}

/// Decodes a single still image at a timestamp.
pub trait FrameExtractor {
    /// Decode the frame shown at `timestamp` seconds.
    ///
    /// # Errors
    ///
    /// Any error is treated as a capture failure for that cell.
    fn extract_frame(&mut self, timestamp: f64) -> Result<DynamicImage, SheetError>;
}

impl<T: MediaProbe + ?Sized> MediaProbe for &mut T {
    fn probe(&mut self) -> Result<VideoMetadata, SheetError> {
        (**self).probe()
    }
}

impl<T: FrameExtractor + ?Sized> FrameExtractor for &mut T {
    fn extract_frame(&mut self, timestamp: f64) -> Result<DynamicImage, SheetError> {
        (**self).extract_frame(timestamp)
    }
}
