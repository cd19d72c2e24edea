//! Contact-sheet generation.
//!
//! [`ContactSheet::generate`] runs the whole pipeline: validate options,
//! probe the source, resolve the grid, sample timestamps, capture and fit
//! one frame per cell, then composite the grid. The finished sheet can be
//! saved with [`ContactSheet::save`].
//!
//! # Example
//!
//! ```no_run
//! use vidsheet::{ContactSheet, MediaFile, SheetOptions};
//!
//! let mut media = MediaFile::open("input.mp4")?;
//! let options = SheetOptions::new().with_rows(4).with_columns(4).with_cell_width(240);
//! let sheet = ContactSheet::generate(&mut media, &options)?;
//! sheet.save("contact_sheet.jpg")?;
//! # Ok::<(), vidsheet::SheetError>(())
//! ```

use std::path::Path;

use image::RgbaImage;

use crate::compositor::compose_grid;
use crate::config::{CapturePolicy, SheetOptions};
use crate::encode::{self, OutputFormat};
use crate::error::SheetError;
use crate::fit::fit_frame;
use crate::grid::GridLayout;
use crate::progress::ProgressTracker;
use crate::sampler::{format_timecode, sample_timestamps};
use crate::source::{FrameExtractor, MediaProbe, VideoMetadata};

#[cfg(feature = "rayon")]
use crate::media::MediaFile;

/// A finished contact sheet.
///
/// Holds the composited canvas together with the values that produced it.
#[derive(Debug, Clone)]
pub struct ContactSheet {
    canvas: RgbaImage,
    layout: GridLayout,
    metadata: VideoMetadata,
    timestamps: Vec<f64>,
    skipped: Vec<usize>,
    quality: u8,
}

impl ContactSheet {
    /// Generate a contact sheet from a source that can both probe and
    /// extract frames.
    ///
    /// Frames are captured sequentially in timestamp order.
    ///
    /// # Errors
    ///
    /// - [`SheetError::ConfigError`] if `options` are invalid.
    /// - [`SheetError::ProbeError`] if the metadata is unusable.
    /// - [`SheetError::CaptureError`] for the first failing frame, unless
    ///   [`CapturePolicy::SkipFailed`] is set and at least one frame was
    ///   captured.
    pub fn generate<S>(source: &mut S, options: &SheetOptions) -> Result<Self, SheetError>
    where
        S: MediaProbe + FrameExtractor + ?Sized,
    {
        let plan = Plan::prepare(source, options)?;
        let mut tracker = ProgressTracker::new(options.progress.clone(), plan.timestamps.len() as u64);

        let mut captures = Vec::with_capacity(plan.timestamps.len());
        for (index, &timestamp) in plan.timestamps.iter().enumerate() {
            match capture_cell(source, index, timestamp, &plan.layout) {
                Err(error) if options.capture_policy == CapturePolicy::Abort => return Err(error),
                capture => captures.push(capture),
            }
            tracker.advance(Some(timestamp));
        }

        plan.assemble(captures, options)
    }

    /// Generate a contact sheet from a video file, capturing frames on the
    /// rayon thread pool.
    ///
    /// Every worker opens its own [`MediaFile`], so no decoder state is
    /// shared. The result is identical to [`generate`](ContactSheet::generate).
    ///
    /// # Errors
    ///
    /// Same as [`generate`](ContactSheet::generate).
    #[cfg(feature = "rayon")]
    pub fn generate_parallel<P: AsRef<Path>>(
        path: P,
        options: &SheetOptions,
    ) -> Result<Self, SheetError> {
        let path = path.as_ref();
        options.validate()?;
        let mut probe = MediaFile::open(path)?;
        Self::generate_parallel_with(&mut probe, || MediaFile::open(path), options)
    }

    /// Parallel generation with a caller-supplied extractor factory.
    ///
    /// `probe` is queried once; `open_extractor` is called once per worker.
    ///
    /// # Errors
    ///
    /// Same as [`generate`](ContactSheet::generate). A worker whose
    /// extractor cannot be opened fails every cell it was assigned.
    #[cfg(feature = "rayon")]
    pub fn generate_parallel_with<S, E, F>(
        probe: &mut S,
        open_extractor: F,
        options: &SheetOptions,
    ) -> Result<Self, SheetError>
    where
        S: MediaProbe + ?Sized,
        E: FrameExtractor,
        F: Fn() -> Result<E, SheetError> + Sync,
    {
        let plan = Plan::prepare(probe, options)?;
        let captures = crate::parallel::capture_parallel(
            open_extractor,
            &plan.timestamps,
            &plan.layout,
            options,
        )?;
        plan.assemble(captures, options)
    }

    /// The composited canvas.
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Take ownership of the canvas.
    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    /// The resolved grid the canvas was laid out with.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Metadata of the source video.
    pub fn metadata(&self) -> VideoMetadata {
        self.metadata
    }

    /// Sampled timestamps in seconds, one per cell, in cell order.
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Indices of cells left empty because their capture failed.
    ///
    /// Always empty under [`CapturePolicy::Abort`].
    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    /// Encode the sheet and write it to `path`.
    ///
    /// The format follows the file extension (see [`OutputFormat::from_path`]).
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::ConfigError`] for an unsupported extension and
    /// [`SheetError::EncodeError`] if encoding or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<OutputFormat, SheetError> {
        encode::save_canvas(&self.canvas, path, self.quality)
    }
}

/// Everything decided before the first capture.
struct Plan {
    metadata: VideoMetadata,
    layout: GridLayout,
    timestamps: Vec<f64>,
}

impl Plan {
    fn prepare<S: MediaProbe + ?Sized>(source: &mut S, options: &SheetOptions) -> Result<Self, SheetError> {
        options.validate()?;

        let metadata = source.probe()?;
        metadata.check().map_err(SheetError::ProbeError)?;

        let layout = options.grid.resolve(metadata.width, metadata.height)?;
        let timestamps = sample_timestamps(metadata.duration, layout.rows() * layout.columns());

        log::debug!(
            "Sampling {} frame(s) from {:.3}s video ({}x{}) into {}x{} cells",
            timestamps.len(),
            metadata.duration,
            metadata.width,
            metadata.height,
            layout.cell_width(),
            layout.cell_height(),
        );

        Ok(Self {
            metadata,
            layout,
            timestamps,
        })
    }

    /// Apply the capture policy and composite.
    fn assemble(
        self,
        captures: Vec<Result<RgbaImage, SheetError>>,
        options: &SheetOptions,
    ) -> Result<ContactSheet, SheetError> {
        let mut frames = Vec::with_capacity(captures.len());
        let mut skipped = Vec::new();
        let mut first_failure = None;

        for (index, capture) in captures.into_iter().enumerate() {
            match capture {
                Ok(frame) => frames.push(Some(frame)),
                Err(error) if options.capture_policy == CapturePolicy::SkipFailed => {
                    log::warn!("Skipping cell {}: {error}", index + 1);
                    skipped.push(index);
                    first_failure.get_or_insert(error);
                    frames.push(None);
                }
                Err(error) => return Err(error),
            }
        }

        if frames.iter().all(Option::is_none) {
            if let Some(error) = first_failure {
                return Err(error);
            }
        }

        let canvas = compose_grid(&frames, &self.layout);

        Ok(ContactSheet {
            canvas,
            layout: self.layout,
            metadata: self.metadata,
            timestamps: self.timestamps,
            skipped,
            quality: options.quality,
        })
    }
}

/// Capture and fit the frame for one cell.
///
/// Any extractor failure is reported as a [`SheetError::CaptureError`]
/// naming the cell.
pub(crate) fn capture_cell<E>(
    extractor: &mut E,
    index: usize,
    timestamp: f64,
    layout: &GridLayout,
) -> Result<RgbaImage, SheetError>
where
    E: FrameExtractor + ?Sized,
{
    log::debug!("Capturing cell {} at {}", index + 1, format_timecode(timestamp));
    extractor
        .extract_frame(timestamp)
        .map(|frame| fit_frame(frame, layout.cell_width(), layout.cell_height()))
        .map_err(|error| capture_error(index, timestamp, error))
}

/// Wrap a source error into a capture failure for cell `index`.
pub(crate) fn capture_error(index: usize, timestamp: f64, error: SheetError) -> SheetError {
    match error {
        SheetError::CaptureError { reason, .. } => SheetError::CaptureError {
            index,
            timestamp,
            reason,
        },
        other => SheetError::CaptureError {
            index,
            timestamp,
            reason: other.to_string(),
        },
    }
}
