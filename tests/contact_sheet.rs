//! End-to-end generation tests against a synthetic in-memory source.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use image::{DynamicImage, Rgb, RgbImage};
use vidsheet::{
    CapturePolicy, Color, ContactSheet, FrameExtractor, MediaProbe, ProgressCallback,
    ProgressInfo, SheetError, SheetOptions, VideoMetadata,
};

/// Produces a solid frame whose red channel encodes the timestamp.
struct SyntheticSource {
    metadata: VideoMetadata,
    failing: HashSet<usize>,
    probe_calls: usize,
    requested: Vec<f64>,
}

impl SyntheticSource {
    fn new(duration: f64, width: u32, height: u32) -> Self {
        Self {
            metadata: VideoMetadata::new(duration, width, height),
            failing: HashSet::new(),
            probe_calls: 0,
            requested: Vec::new(),
        }
    }

    fn failing_at(mut self, cells: &[usize]) -> Self {
        self.failing.extend(cells);
        self
    }
}

fn shade(timestamp: f64) -> u8 {
    (timestamp * 20.0).round() as u8
}

impl MediaProbe for SyntheticSource {
    fn probe(&mut self) -> Result<VideoMetadata, SheetError> {
        self.probe_calls += 1;
        Ok(self.metadata)
    }
}

impl FrameExtractor for SyntheticSource {
    fn extract_frame(&mut self, timestamp: f64) -> Result<DynamicImage, SheetError> {
        let cell = self.requested.len();
        self.requested.push(timestamp);
        if self.failing.contains(&cell) {
            return Err(SheetError::VideoDecodeError("corrupt packet".to_string()));
        }
        let (width, height) = (self.metadata.width, self.metadata.height);
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([shade(timestamp), 0, 0]),
        )))
    }
}

fn options() -> SheetOptions {
    SheetOptions::new()
        .with_rows(3)
        .with_columns(3)
        .with_cell_width(100)
        .with_margin(5)
        .with_background(Color::BLACK)
}

#[test]
fn generates_three_by_three_sheet() {
    let mut source = SyntheticSource::new(10.0, 640, 360);
    let sheet = ContactSheet::generate(&mut source, &options()).unwrap();

    let expected: Vec<f64> = (1..=9).map(f64::from).collect();
    assert_eq!(sheet.timestamps(), expected.as_slice());
    assert_eq!(source.requested, expected);
    assert_eq!(source.probe_calls, 1);

    assert_eq!(sheet.layout().cell_height(), 56);
    assert_eq!(sheet.canvas().dimensions(), (320, 188));
    assert!(sheet.skipped().is_empty());
    assert_eq!(sheet.metadata(), VideoMetadata::new(10.0, 640, 360));
}

#[test]
fn cells_hold_frames_in_timestamp_order() {
    let mut source = SyntheticSource::new(10.0, 640, 360);
    let sheet = ContactSheet::generate(&mut source, &options()).unwrap();
    let canvas = sheet.canvas();

    for index in 0..9 {
        let (x, y) = sheet.layout().cell_origin(index).unwrap();
        let pixel = canvas.get_pixel(x + 50, y + 28).0;
        let expected = shade(sheet.timestamps()[index]);
        assert!(
            pixel[0].abs_diff(expected) <= 1,
            "cell {index}: got {pixel:?}, expected red {expected}"
        );
    }

    assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(319, 187).0, [0, 0, 0, 255]);
}

#[test]
fn explicit_cell_height_letterboxes() {
    let mut source = SyntheticSource::new(4.0, 640, 360);
    let options = options().with_rows(1).with_columns(1).with_cell_height(100).with_margin(0);
    let sheet = ContactSheet::generate(&mut source, &options).unwrap();

    assert_eq!(sheet.canvas().dimensions(), (100, 100));
    // 100x56 frame centered vertically at y = 22
    assert_eq!(sheet.canvas().get_pixel(50, 21).0, [0, 0, 0, 255]);
    assert!(sheet.canvas().get_pixel(50, 22).0[0].abs_diff(shade(2.0)) <= 1);
    assert!(sheet.canvas().get_pixel(50, 77).0[0].abs_diff(shade(2.0)) <= 1);
    assert_eq!(sheet.canvas().get_pixel(50, 78).0, [0, 0, 0, 255]);
}

#[test]
fn capture_failure_aborts_with_cell_index() {
    let mut source = SyntheticSource::new(10.0, 640, 360).failing_at(&[3]);
    let result = ContactSheet::generate(&mut source, &options());

    match result {
        Err(SheetError::CaptureError {
            index,
            timestamp,
            reason,
        }) => {
            assert_eq!(index, 3);
            assert_eq!(timestamp, 4.0);
            assert!(reason.contains("corrupt packet"), "reason: {reason}");
        }
        other => panic!("expected CaptureError, got {other:?}"),
    }
    // no further frames were requested
    assert_eq!(source.requested.len(), 4);
}

#[test]
fn capture_error_message_is_one_based() {
    let mut source = SyntheticSource::new(10.0, 640, 360).failing_at(&[0]);
    let error = ContactSheet::generate(&mut source, &options()).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Failed to capture frame 1 at 1.000s: Failed to decode video frame: corrupt packet"
    );
}

#[test]
fn skip_failed_leaves_blank_cells() {
    let mut source = SyntheticSource::new(10.0, 640, 360).failing_at(&[3, 8]);
    let options = options().with_capture_policy(CapturePolicy::SkipFailed);
    let sheet = ContactSheet::generate(&mut source, &options).unwrap();

    assert_eq!(sheet.skipped(), &[3, 8]);
    assert_eq!(source.requested.len(), 9);

    let (x, y) = sheet.layout().cell_origin(3).unwrap();
    assert_eq!(sheet.canvas().get_pixel(x + 50, y + 28).0, [0, 0, 0, 255]);

    let (x, y) = sheet.layout().cell_origin(4).unwrap();
    assert!(sheet.canvas().get_pixel(x + 50, y + 28).0[0].abs_diff(shade(5.0)) <= 1);
}

#[test]
fn skip_failed_still_errors_when_nothing_was_captured() {
    let all: Vec<usize> = (0..4).collect();
    let mut source = SyntheticSource::new(10.0, 640, 360).failing_at(&all);
    let options = options()
        .with_rows(2)
        .with_columns(2)
        .with_capture_policy(CapturePolicy::SkipFailed);

    match ContactSheet::generate(&mut source, &options) {
        Err(SheetError::CaptureError { index, .. }) => assert_eq!(index, 0),
        other => panic!("expected CaptureError, got {other:?}"),
    }
}

#[test]
fn zero_duration_is_a_probe_error() {
    let mut source = SyntheticSource::new(0.0, 640, 360);
    let result = ContactSheet::generate(&mut source, &options());
    assert!(matches!(result, Err(SheetError::ProbeError(_))));
    assert!(source.requested.is_empty());
}

#[test]
fn zero_resolution_is_a_probe_error() {
    let mut source = SyntheticSource::new(10.0, 0, 360);
    let result = ContactSheet::generate(&mut source, &options());
    assert!(matches!(result, Err(SheetError::ProbeError(_))));
}

#[test]
fn invalid_options_fail_before_probing() {
    let mut source = SyntheticSource::new(10.0, 640, 360);
    let result = ContactSheet::generate(&mut source, &options().with_rows(0));
    assert!(matches!(result, Err(SheetError::ConfigError(_))));
    assert_eq!(source.probe_calls, 0);

    let result = ContactSheet::generate(&mut source, &options().with_quality(0));
    assert!(matches!(result, Err(SheetError::ConfigError(_))));
    assert_eq!(source.probe_calls, 0);
}

#[derive(Default)]
struct RecordingProgress {
    infos: Mutex<Vec<ProgressInfo>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().unwrap().push(info.clone());
    }
}

#[test]
fn progress_reports_every_cell() {
    let progress = Arc::new(RecordingProgress::default());
    let options = options().with_progress(progress.clone());
    let mut source = SyntheticSource::new(10.0, 640, 360);
    ContactSheet::generate(&mut source, &options).unwrap();

    let infos = progress.infos.lock().unwrap();
    assert_eq!(infos.len(), 9);
    assert!(infos.iter().all(|info| info.total == 9));
    assert_eq!(infos.last().unwrap().current, 9);
    assert_eq!(infos.last().unwrap().percentage, Some(100.0));
    assert_eq!(infos[0].current_timestamp, Some(1.0));
}

#[test]
fn sheet_saves_to_disk() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("sheet.png");

    let mut source = SyntheticSource::new(10.0, 640, 360);
    let sheet = ContactSheet::generate(&mut source, &options()).unwrap();
    sheet.save(&path).unwrap();

    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (320, 188));
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_matches_sequential() {
    let mut source = SyntheticSource::new(10.0, 640, 360);
    let sequential = ContactSheet::generate(&mut source, &options()).unwrap();

    let mut probe = SyntheticSource::new(10.0, 640, 360);
    let parallel = ContactSheet::generate_parallel_with(
        &mut probe,
        || Ok(SyntheticSource::new(10.0, 640, 360)),
        &options(),
    )
    .unwrap();

    assert_eq!(parallel.timestamps(), sequential.timestamps());
    assert_eq!(parallel.canvas(), sequential.canvas());
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_open_failure_aborts() {
    let mut probe = SyntheticSource::new(10.0, 640, 360);
    let result = ContactSheet::generate_parallel_with(
        &mut probe,
        || -> Result<SyntheticSource, SheetError> {
            Err(SheetError::FfmpegError("cannot open".to_string()))
        },
        &options(),
    );
    assert!(matches!(result, Err(SheetError::CaptureError { .. })));
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_open_failure_under_skip_keeps_original_reason() {
    let mut probe = SyntheticSource::new(10.0, 640, 360);
    let options = options().with_capture_policy(CapturePolicy::SkipFailed);
    let result = ContactSheet::generate_parallel_with(
        &mut probe,
        || -> Result<SyntheticSource, SheetError> {
            Err(SheetError::FfmpegError("cannot open".to_string()))
        },
        &options,
    );

    match result {
        Err(SheetError::CaptureError { index, reason, .. }) => {
            assert_eq!(index, 0);
            assert_eq!(reason, "FFmpeg error: cannot open");
        }
        other => panic!("expected CaptureError, got {other:?}"),
    }
}
