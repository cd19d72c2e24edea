//! Internal helpers shared by the FFmpeg frame source.
//!
//! Pixel-plane copying and conversions between seconds and FFmpeg
//! timestamps.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Microseconds per second, FFmpeg's `AV_TIME_BASE`.
const MICROSECONDS_PER_SECOND: f64 = 1_000_000.0;

/// Copy pixel data from a packed FFmpeg frame into a tightly-packed buffer.
///
/// FFmpeg rows frequently carry padding (stride > width × bytes per pixel).
/// The padding is stripped so the buffer can go straight into
/// [`image::ImageBuffer::from_raw`].
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == row_length {
        data[..row_length * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_length * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_length]);
        }
        buffer
    }
}

/// Convert seconds to a container-level seek target in `AV_TIME_BASE`.
///
/// `Input::seek` with no stream index expects microseconds.
pub(crate) fn seconds_to_seek_timestamp(seconds: f64) -> i64 {
    (seconds * MICROSECONDS_PER_SECOND) as i64
}

/// Convert a container duration in `AV_TIME_BASE` to seconds.
pub(crate) fn microseconds_to_seconds(microseconds: i64) -> f64 {
    microseconds as f64 / MICROSECONDS_PER_SECOND
}

/// Rescale a PTS value from the stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    if time_base.denominator() == 0 {
        return 0.0;
    }
    pts as f64 * f64::from(time_base.numerator()) / f64::from(time_base.denominator())
}

/// Stream start time in seconds, or `0.0` when FFmpeg does not know it.
pub(crate) fn start_time_seconds(start_pts: i64, time_base: Rational) -> f64 {
    if start_pts == ffmpeg_next::ffi::AV_NOPTS_VALUE {
        return 0.0;
    }
    pts_to_seconds(start_pts, time_base)
}
