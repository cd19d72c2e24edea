//! Benchmarks for fitting, compositing and end-to-end generation.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features
//!
//! The generation benchmark requires `tests/fixtures/sample_video.mp4`
//! from `tests/fixtures/generate_fixtures.sh`.

use std::{hint::black_box, path::Path};

use criterion::Criterion;
use image::{DynamicImage, Rgb, RgbImage};
use vidsheet::{
    Color, ContactSheet, FfmpegLogLevel, GridSpec, MediaFile, OutputFormat, SheetOptions,
    compose_grid, encode_canvas, fit_frame,
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

fn full_hd_frame() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(1920, 1080, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn benchmark_fit(criterion: &mut Criterion) {
    let frame = full_hd_frame();

    criterion.bench_function("fit 1920x1080 frame into 320x180 cell", |bencher| {
        bencher.iter(|| fit_frame(black_box(frame.clone()), 320, 180));
    });

    criterion.bench_function("fit 1920x1080 frame into 160x160 cell", |bencher| {
        bencher.iter(|| fit_frame(black_box(frame.clone()), 160, 160));
    });
}

fn benchmark_compose(criterion: &mut Criterion) {
    let layout = GridSpec::new(4, 4)
        .with_cell_width(320)
        .with_background(Color::BLACK)
        .resolve(1920, 1080)
        .unwrap();
    let cell = fit_frame(full_hd_frame(), 320, 180);
    let frames = vec![Some(cell); layout.cell_count()];

    criterion.bench_function("compose 4x4 grid of 320x180 cells", |bencher| {
        bencher.iter(|| compose_grid(black_box(&frames), &layout));
    });

    let canvas = compose_grid(&frames, &layout);
    let mut group = criterion.benchmark_group("encode 4x4 canvas");
    group.bench_function("png", |bencher| {
        bencher.iter(|| encode_canvas(black_box(&canvas), OutputFormat::Png, 90).unwrap());
    });
    group.bench_function("jpeg q90", |bencher| {
        bencher.iter(|| encode_canvas(black_box(&canvas), OutputFormat::Jpeg, 90).unwrap());
    });
    group.finish();
}

fn benchmark_generate(criterion: &mut Criterion) {
    vidsheet::set_ffmpeg_log_level(FfmpegLogLevel::Error);

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    let options = SheetOptions::new().with_rows(3).with_columns(3).with_cell_width(160);

    let mut group = criterion.benchmark_group("generate 3x3 sheet");
    group.sample_size(10);
    group.bench_function("sequential", |bencher| {
        bencher.iter(|| {
            let mut media = MediaFile::open(SAMPLE_VIDEO).unwrap();
            ContactSheet::generate(&mut media, &options).unwrap()
        });
    });
    #[cfg(feature = "rayon")]
    group.bench_function("parallel", |bencher| {
        bencher.iter(|| ContactSheet::generate_parallel(SAMPLE_VIDEO, &options).unwrap());
    });
    group.finish();
}

criterion::criterion_group!(benches, benchmark_fit, benchmark_compose, benchmark_generate);
criterion::criterion_main!(benches);
