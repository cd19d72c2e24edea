//! Progress reporting.
//!
//! A [`ProgressCallback`] is notified once per captured cell while a contact
//! sheet is being generated.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use vidsheet::{ContactSheet, MediaFile, ProgressCallback, ProgressInfo, SheetOptions};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("{pct:.0}% captured");
//!         }
//!     }
//! }
//!
//! let mut media = MediaFile::open("input.mp4")?;
//! let options = SheetOptions::new().with_progress(Arc::new(PrintProgress));
//! let sheet = ContactSheet::generate(&mut media, &options)?;
//! # Ok::<(), vidsheet::SheetError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A snapshot of capture progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// How many cells have been captured so far (including skipped ones).
    pub current: u64,
    /// Total number of cells.
    pub total: u64,
    /// Completion percentage (0.0 – 100.0).
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since capture started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Timestamp in seconds of the cell that was just captured.
    pub current_timestamp: Option<f64>,
}

/// Trait for receiving progress updates during generation.
///
/// Implementations must be [`Send`] and [`Sync`] because parallel capture
/// reports from worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Called after each cell is captured.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default callback.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64) -> Self {
        Self {
            callback,
            total,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one finished cell and notify the callback.
    pub(crate) fn advance(&mut self, timestamp: Option<f64>) {
        self.current += 1;

        let elapsed = self.start_time.elapsed();
        let percentage = (self.total > 0)
            .then(|| (self.current as f32 / self.total as f32) * 100.0);
        let estimated_remaining = (self.current > 0).then(|| {
            let remaining = self.total.saturating_sub(self.current);
            elapsed.div_f64(self.current as f64).mul_f64(remaining as f64)
        });

        self.callback.on_progress(&ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_timestamp: timestamp,
        });
    }
}
