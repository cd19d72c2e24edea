//! Parallel frame capture.
//!
//! This module provides [`capture_parallel`] which distributes frame capture
//! across rayon threads. Each worker opens its own extractor so there is no
//! shared decoder state.
//!
//! The public API is exposed through
//! [`ContactSheet::generate_parallel`](crate::ContactSheet); this module
//! contains only the internal implementation.

use std::sync::Mutex;

use image::RgbaImage;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::{CapturePolicy, SheetOptions};
use crate::error::SheetError;
use crate::grid::GridLayout;
use crate::progress::ProgressTracker;
use crate::sheet::{capture_cell, capture_error};
use crate::source::FrameExtractor;

type CellCapture = (usize, Result<RgbaImage, SheetError>);

/// Capture every timestamp on the rayon pool.
///
/// Timestamps are split into contiguous chunks, one per worker, so each
/// worker only ever seeks forward. Results are returned in cell order.
///
/// Under [`CapturePolicy::Abort`] the first failure is returned as `Err`;
/// otherwise failures are kept per cell for the caller to settle.
pub(crate) fn capture_parallel<E, F>(
    open_extractor: F,
    timestamps: &[f64],
    layout: &GridLayout,
    options: &SheetOptions,
) -> Result<Vec<Result<RgbaImage, SheetError>>, SheetError>
where
    E: FrameExtractor,
    F: Fn() -> Result<E, SheetError> + Sync,
{
    if timestamps.is_empty() {
        return Ok(Vec::new());
    }

    let chunks = split_into_chunks(timestamps.len(), rayon::current_num_threads());
    let tracker = Mutex::new(ProgressTracker::new(
        options.progress.clone(),
        timestamps.len() as u64,
    ));
    let policy = options.capture_policy;

    log::debug!(
        "Capturing {} frame(s) across {} worker(s)",
        timestamps.len(),
        chunks.len()
    );

    let results: Result<Vec<Vec<CellCapture>>, SheetError> = chunks
        .into_par_iter()
        .map(|(start, end)| {
            capture_chunk(&open_extractor, timestamps, start..end, layout, policy, &tracker)
        })
        .collect();

    let mut captures: Vec<CellCapture> = results?.into_iter().flatten().collect();
    captures.sort_by_key(|(index, _)| *index);
    Ok(captures.into_iter().map(|(_, capture)| capture).collect())
}

/// Split `0..count` into at most `workers` contiguous half-open ranges.
fn split_into_chunks(count: usize, workers: usize) -> Vec<(usize, usize)> {
    let chunk_size = count.div_ceil(workers.max(1)).max(1);
    (0..count)
        .step_by(chunk_size)
        .map(|start| (start, (start + chunk_size).min(count)))
        .collect()
}

/// Capture one contiguous chunk with a freshly opened extractor.
fn capture_chunk<E, F>(
    open_extractor: &F,
    timestamps: &[f64],
    range: std::ops::Range<usize>,
    layout: &GridLayout,
    policy: CapturePolicy,
    tracker: &Mutex<ProgressTracker>,
) -> Result<Vec<CellCapture>, SheetError>
where
    E: FrameExtractor,
    F: Fn() -> Result<E, SheetError>,
{
    let mut extractor = match open_extractor() {
        Ok(extractor) => extractor,
        Err(error) => {
            let start = range.start;
            if policy == CapturePolicy::Abort {
                return Err(capture_error(start, timestamps[start], error));
            }
            let reason = error.to_string();
            return Ok(range
                .map(|index| {
                    let error = SheetError::CaptureError {
                        index,
                        timestamp: timestamps[index],
                        reason: reason.clone(),
                    };
                    (index, Err(error))
                })
                .collect());
        }
    };

    let mut captures = Vec::with_capacity(range.len());
    for index in range {
        let timestamp = timestamps[index];
        match capture_cell(&mut extractor, index, timestamp, layout) {
            Err(error) if policy == CapturePolicy::Abort => return Err(error),
            capture => captures.push((index, capture)),
        }

        if let Ok(mut tracker) = tracker.lock() {
            tracker.advance(Some(timestamp));
        }
    }

    Ok(captures)
}
