//! Contact-sheet options.
//!
//! [`SheetOptions`] is a builder carrying the grid geometry, output quality,
//! capture-failure policy and an optional progress callback. A single value
//! is passed explicitly through every stage of a run.
//!
//! # Example
//!
//! ```
//! use vidsheet::{CapturePolicy, Color, SheetOptions};
//!
//! let options = SheetOptions::new()
//!     .with_rows(4)
//!     .with_columns(4)
//!     .with_cell_width(240)
//!     .with_background(Color::BLACK)
//!     .with_capture_policy(CapturePolicy::SkipFailed);
//! options.validate()?;
//! # Ok::<(), vidsheet::SheetError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::color::Color;
use crate::encode::{self, DEFAULT_QUALITY};
use crate::error::SheetError;
use crate::grid::GridSpec;
use crate::progress::{NoOpProgress, ProgressCallback};

/// What to do when a single frame cannot be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapturePolicy {
    /// Abort the whole run. No partial contact sheet is produced.
    #[default]
    Abort,
    /// Leave the failed cell as background and keep going. The run still
    /// fails if no frame at all could be captured.
    SkipFailed,
}

/// Options for contact-sheet generation.
#[derive(Clone)]
#[must_use]
pub struct SheetOptions {
    /// Grid geometry and background.
    pub grid: GridSpec,
    /// JPEG quality, `1..=100`. Ignored for PNG output.
    pub quality: u8,
    /// Capture failure handling.
    pub capture_policy: CapturePolicy,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            quality: DEFAULT_QUALITY,
            capture_policy: CapturePolicy::default(),
            progress: Arc::new(NoOpProgress),
        }
    }
}

impl Debug for SheetOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SheetOptions")
            .field("grid", &self.grid)
            .field("quality", &self.quality)
            .field("capture_policy", &self.capture_policy)
            .finish_non_exhaustive()
    }
}

impl SheetOptions {
    /// Default options: 3×3 grid, 320px cells with inferred height, 8px
    /// margin, white background, quality 90.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole grid spec.
    pub fn with_grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }

    /// Set the number of rows.
    pub fn with_rows(mut self, rows: u32) -> Self {
        self.grid.rows = rows;
        self
    }

    /// Set the number of columns.
    pub fn with_columns(mut self, columns: u32) -> Self {
        self.grid.columns = columns;
        self
    }

    /// Set the cell width in pixels.
    pub fn with_cell_width(mut self, width: u32) -> Self {
        self.grid.cell_width = width;
        self
    }

    /// Set the cell height in pixels. `0` infers it from the video.
    pub fn with_cell_height(mut self, height: u32) -> Self {
        self.grid.cell_height = height;
        self
    }

    /// Set the margin in pixels.
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.grid.margin = margin;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.grid.background = background;
        self
    }

    /// Set the JPEG quality.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Set the capture failure policy.
    pub fn with_capture_policy(mut self, policy: CapturePolicy) -> Self {
        self.capture_policy = policy;
        self
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Check every option before any media work begins.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::ConfigError`] describing the first invalid
    /// option.
    pub fn validate(&self) -> Result<(), SheetError> {
        self.grid.validate()?;
        encode::validate_quality(self.quality)
    }
}
