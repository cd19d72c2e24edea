//! Error types for the `vidsheet` crate.
//!
//! This module defines [`SheetError`], the unified error type returned by all
//! fallible operations in the crate. The four top-level kinds mirror the
//! stages of a contact-sheet run (configuration, probing, capture and
//! encoding); the remaining variants are produced by frame sources and are
//! wrapped into [`SheetError::CaptureError`] by the pipeline.

use std::path::PathBuf;

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `vidsheet` operations.
///
/// Every public method that can fail returns `Result<T, SheetError>`.
/// Any error aborts the whole run; nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SheetError {
    /// An option, color or output format was invalid. Reported before any
    /// media work begins.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Video metadata could not be read, or was absent or zero.
    #[error("Failed to probe video: {0}")]
    ProbeError(String),

    /// A frame could not be captured at one of the sampled timestamps.
    #[error("Failed to capture frame {} at {timestamp:.3}s: {reason}", .index + 1)]
    CaptureError {
        /// Zero-based cell index of the failing frame.
        index: usize,
        /// Timestamp in seconds that was requested.
        timestamp: f64,
        /// Underlying reason the capture failed.
        reason: String,
    },

    /// The finished canvas could not be encoded or written.
    #[error("Failed to write contact sheet to {path}: {reason}")]
    EncodeError {
        /// Output path.
        path: PathBuf,
        /// Underlying reason the write failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The requested timestamp lies outside the media duration.
    #[error("Invalid timestamp: {0:.3}s")]
    InvalidTimestamp(f64),

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An error from the `image` crate.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for SheetError {
    fn from(error: FfmpegError) -> Self {
        SheetError::FfmpegError(error.to_string())
    }
}
