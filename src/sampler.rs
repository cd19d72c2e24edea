//! Sample timestamp selection.
//!
//! Samples are spread evenly across the video with an equal gap before the
//! first sample and after the last one, so the very first and very last
//! frames (often black or blank) are never captured.

/// Compute `count` evenly spaced timestamps inside `(0, duration)`.
///
/// A single sample lands on the midpoint. For `count >= 2` the duration is
/// split into `count + 1` equal intervals and the interior boundaries are
/// returned in increasing order. A `count` of zero yields no timestamps.
///
/// `duration` is in seconds and is expected to be positive; the probe stage
/// rejects anything else before sampling runs.
///
/// # Example
///
/// ```
/// let timestamps = vidsheet::sample_timestamps(10.0, 4);
/// assert_eq!(timestamps, vec![2.0, 4.0, 6.0, 8.0]);
/// ```
pub fn sample_timestamps(duration: f64, count: u32) -> Vec<f64> {
    (1..=count)
        .filter_map(|position| sample_timestamp(duration, count, position))
        .collect()
}

/// The `position`-th of `count` sample timestamps, counting from 1.
///
/// Returns `None` when `position` is zero or greater than `count`.
///
/// # Example
///
/// ```
/// assert_eq!(vidsheet::sample_timestamp(10.0, 4, 3), Some(6.0));
/// assert_eq!(vidsheet::sample_timestamp(10.0, 1, 1), Some(5.0));
/// assert_eq!(vidsheet::sample_timestamp(10.0, 4, 5), None);
/// ```
pub fn sample_timestamp(duration: f64, count: u32, position: u32) -> Option<f64> {
    if position == 0 || position > count {
        return None;
    }
    if count == 1 {
        return Some(duration / 2.0);
    }
    let interval = duration / (f64::from(count) + 1.0);
    Some(interval * f64::from(position))
}

/// Format a timestamp in seconds as `HH:MM:SS.mmm`.
///
/// Negative and non-finite inputs are clamped to zero.
pub fn format_timecode(seconds: f64) -> String {
    let seconds = if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    };
    let total_milliseconds = (seconds * 1000.0).round() as u64;
    let milliseconds = total_milliseconds % 1000;
    let total_seconds = total_milliseconds / 1000;
    format!(
        "{:02}:{:02}:{:02}.{milliseconds:03}",
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60,
    )
}
