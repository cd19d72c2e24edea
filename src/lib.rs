//! # vidsheet
//!
//! Turn a video into a single contact-sheet image.
//!
//! `vidsheet` samples `rows × cols` frames at evenly spaced timestamps,
//! scales each one to fit a uniform cell while preserving its aspect ratio,
//! and composites the cells into a grid with margins and a configurable
//! background. Frames are decoded with FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; sampling,
//! fitting and compositing work on plain [`image`] buffers and can be driven
//! by any [`MediaProbe`] + [`FrameExtractor`] implementation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vidsheet::{Color, ContactSheet, MediaFile, SheetOptions};
//!
//! let mut media = MediaFile::open("input.mp4")?;
//! let options = SheetOptions::new()
//!     .with_rows(3)
//!     .with_columns(4)
//!     .with_cell_width(320)
//!     .with_background("#202020".parse::<Color>()?);
//! let sheet = ContactSheet::generate(&mut media, &options)?;
//! sheet.save("preview.jpg")?;
//! # Ok::<(), vidsheet::SheetError>(())
//! ```
//!
//! ## Building blocks
//!
//! Each stage is also available on its own:
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use vidsheet::{GridSpec, compose_grid, fit_frame, sample_timestamps};
//!
//! let timestamps = sample_timestamps(10.0, 9);
//! assert_eq!(timestamps[0], 1.0);
//!
//! let layout = GridSpec::new(3, 3).with_cell_width(100).with_margin(5).resolve(640, 360)?;
//! let frames: Vec<_> = timestamps
//!     .iter()
//!     .map(|_| Some(fit_frame(DynamicImage::ImageRgb8(RgbImage::new(640, 360)), 100, 56)))
//!     .collect();
//! let canvas = compose_grid(&frames, &layout);
//! assert_eq!(canvas.dimensions(), (320, 188));
//! # Ok::<(), vidsheet::SheetError>(())
//! ```
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | `ContactSheet::generate_parallel()` captures frames across rayon threads |
//! | `full` | Enables all of the above |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod color;
pub mod compositor;
pub mod config;
mod conversion;
pub mod encode;
pub mod error;
pub mod ffmpeg;
pub mod fit;
pub mod grid;
pub mod media;
#[cfg(feature = "rayon")]
mod parallel;
pub mod progress;
pub mod sampler;
pub mod sheet;
pub mod source;

pub use color::Color;
pub use compositor::compose_grid;
pub use config::{CapturePolicy, SheetOptions};
pub use encode::{OutputFormat, encode_canvas, save_canvas};
pub use error::SheetError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use fit::{fit_dimensions, fit_frame};
pub use grid::{GridLayout, GridSpec, MAX_CANVAS_PIXELS, infer_cell_height};
pub use media::MediaFile;
pub use progress::{ProgressCallback, ProgressInfo};
pub use sampler::{format_timecode, sample_timestamp, sample_timestamps};
pub use sheet::ContactSheet;
pub use source::{FrameExtractor, MediaProbe, VideoMetadata};
