//! FFmpeg-backed media source.
//!
//! [`MediaFile`] opens a video once, caches its duration and resolution, and
//! decodes single frames at arbitrary timestamps. It implements both
//! [`MediaProbe`] and [`FrameExtractor`], so it can be handed straight to
//! [`ContactSheet::generate`](crate::ContactSheet::generate).

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    mem,
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{
    conversion,
    error::SheetError,
    source::{FrameExtractor, MediaProbe, VideoMetadata},
};

/// An opened video file.
///
/// Created via [`MediaFile::open`], this struct holds the demuxer context
/// and the cached metadata of the best video stream.
///
/// # Example
///
/// ```no_run
/// use vidsheet::{FrameExtractor, MediaFile, MediaProbe, SheetError};
///
/// let mut media = MediaFile::open("input.mp4")?;
/// let metadata = media.probe()?;
/// let frame = media.extract_frame(metadata.duration / 2.0)?;
/// frame.save("middle.png")?;
/// # Ok::<(), SheetError>(())
/// ```
pub struct MediaFile {
    input_context: Input,
    video_stream_index: usize,
    metadata: VideoMetadata,
    start_time: f64,
    format_name: String,
    codec_name: String,
    file_path: PathBuf,
}

impl Debug for MediaFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("start_time", &self.start_time)
            .field("format_name", &self.format_name)
            .field("codec_name", &self.codec_name)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl MediaFile {
    /// Open a video file.
    ///
    /// Initializes FFmpeg (idempotent), opens the container, selects the best
    /// video stream and caches its metadata. The container duration is used
    /// when present, otherwise the stream duration.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::ProbeError`] if the file cannot be opened or has
    /// no decodable video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SheetError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening media file: {}", file_path.display());

        let probe_error =
            |reason: String| SheetError::ProbeError(format!("{}: {reason}", file_path.display()));

        ffmpeg_next::init()
            .map_err(|error| probe_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| probe_error(error.to_string()))?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or_else(|| probe_error(SheetError::NoVideoStream.to_string()))?;
        let video_stream_index = stream.index();
        let time_base = stream.time_base();
        let stream_duration = stream.duration();
        let start_time = conversion::start_time_seconds(stream.start_time(), time_base);

        let decoder = CodecContext::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(|error| {
                probe_error(format!(
                    "Failed to create video decoder for stream {video_stream_index}: {error}"
                ))
            })?;

        let codec_name = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let container_duration = input_context.duration();
        let duration = if container_duration > 0 {
            conversion::microseconds_to_seconds(container_duration)
        } else if stream_duration > 0 {
            conversion::pts_to_seconds(stream_duration, time_base)
        } else {
            0.0
        };

        let metadata = VideoMetadata::new(duration, decoder.width(), decoder.height());
        let format_name = input_context.format().name().to_string();

        log::debug!(
            "Opened {} ({format_name}/{codec_name}): {:.3}s from {start_time:.3}s, {}x{}",
            file_path.display(),
            metadata.duration,
            metadata.width,
            metadata.height,
        );

        Ok(Self {
            input_context,
            video_stream_index,
            metadata,
            start_time,
            format_name,
            codec_name,
            file_path,
        })
    }

    /// Cached metadata, unchecked.
    ///
    /// Use [`MediaProbe::probe`] to get metadata that has been verified to
    /// be usable for sampling.
    pub fn metadata(&self) -> VideoMetadata {
        self.metadata
    }

    /// Presentation time of the first video frame, in seconds.
    ///
    /// Sample timestamps are relative to this point. Usually `0.0`, but
    /// MPEG-TS and edited files often start later.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`, `"matroska,webm"`).
    pub fn format_name(&self) -> &str {
        &self.format_name
    }

    /// Video codec name (e.g. `"h264"`).
    pub fn codec_name(&self) -> &str {
        &self.codec_name
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl MediaProbe for MediaFile {
    fn probe(&mut self) -> Result<VideoMetadata, SheetError> {
        self.metadata.check().map_err(|reason| {
            SheetError::ProbeError(format!("{}: {reason}", self.file_path.display()))
        })?;
        Ok(self.metadata)
    }
}

impl FrameExtractor for MediaFile {
    /// Seek to the keyframe at or before `timestamp` and decode forward to
    /// the first frame presented at or after it.
    ///
    /// `timestamp` counts from the first frame of the stream, so the stream's
    /// [`start_time`](MediaFile::start_time) is added before seeking.
    ///
    /// Near the end of the stream, where no frame reaches `timestamp`, the
    /// last decoded frame is returned.
    fn extract_frame(&mut self, timestamp: f64) -> Result<DynamicImage, SheetError> {
        if !timestamp.is_finite() || timestamp < 0.0 || timestamp > self.metadata.duration {
            return Err(SheetError::InvalidTimestamp(timestamp));
        }

        log::debug!("Extracting frame at {timestamp:.3}s");

        let stream = self
            .input_context
            .stream(self.video_stream_index)
            .ok_or(SheetError::NoVideoStream)?;
        let time_base = stream.time_base();
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let mut decoder = decoder_context.decoder().video()?;

        let start_time = self.start_time;
        let seek_target = conversion::seconds_to_seek_timestamp(start_time + timestamp);
        self.input_context.seek(seek_target, ..seek_target)?;

        let reached = |frame: &VideoFrame| match frame.timestamp().or_else(|| frame.pts()) {
            Some(pts) => conversion::pts_to_seconds(pts, time_base) - start_time >= timestamp,
            None => true,
        };

        let mut decoded_frame = VideoFrame::empty();
        let mut previous_frame = VideoFrame::empty();
        let mut has_previous = false;

        for (stream, packet) in self.input_context.packets() {
            if stream.index() != self.video_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                if reached(&decoded_frame) {
                    return convert_frame_to_image(&decoded_frame);
                }
                mem::swap(&mut decoded_frame, &mut previous_frame);
                has_previous = true;
            }
        }

        // Flush the decoder.
        decoder.send_eof()?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            if reached(&decoded_frame) {
                return convert_frame_to_image(&decoded_frame);
            }
            mem::swap(&mut decoded_frame, &mut previous_frame);
            has_previous = true;
        }

        if has_previous {
            return convert_frame_to_image(&previous_frame);
        }

        Err(SheetError::VideoDecodeError(format!(
            "No frame could be decoded at {timestamp:.3}s"
        )))
    }
}

/// Convert a decoded frame of any pixel format into an RGB8 image at its
/// native resolution.
fn convert_frame_to_image(frame: &VideoFrame) -> Result<DynamicImage, SheetError> {
    let (width, height) = (frame.width(), frame.height());

    let mut scaler = ScalingContext::get(
        frame.format(),
        width,
        height,
        Pixel::RGB24,
        width,
        height,
        ScalingFlags::BILINEAR,
    )?;
    let mut rgb_frame = VideoFrame::empty();
    scaler.run(frame, &mut rgb_frame)?;

    let buffer = conversion::frame_to_buffer(&rgb_frame, width, height, 3);
    let rgb_image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        SheetError::VideoDecodeError(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(rgb_image))
}
