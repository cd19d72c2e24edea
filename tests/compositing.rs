//! Grid compositing tests.

use image::{Rgba, RgbaImage};
use vidsheet::{Color, GridLayout, GridSpec, compose_grid};

fn layout(rows: u32, columns: u32, cell: (u32, u32), margin: u32, background: Color) -> GridLayout {
    GridSpec::new(rows, columns)
        .with_cell_width(cell.0)
        .with_cell_height(cell.1)
        .with_margin(margin)
        .with_background(background)
        .resolve(cell.0, cell.1)
        .unwrap()
}

fn solid(width: u32, height: u32, value: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(value))
}

#[test]
fn empty_grid_is_background() {
    let layout = layout(2, 2, (10, 10), 2, Color::opaque(1, 2, 3));
    let canvas = compose_grid(&[None, None, None, None], &layout);
    assert_eq!(canvas.dimensions(), (26, 26));
    assert!(canvas.pixels().all(|pixel| pixel.0 == [1, 2, 3, 255]));
}

#[test]
fn frames_land_in_row_major_cells() {
    let layout = layout(2, 2, (10, 10), 2, Color::BLACK);
    let frames: Vec<_> = (0..4u8)
        .map(|i| Some(solid(10, 10, [10 * (i + 1), 0, 0, 255])))
        .collect();
    let canvas = compose_grid(&frames, &layout);

    assert_eq!(canvas.get_pixel(2, 2).0, [10, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(14, 2).0, [20, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(2, 14).0, [30, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(23, 23).0, [40, 0, 0, 255]);

    // margins stay background
    assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(12, 5).0, [0, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(25, 25).0, [0, 0, 0, 255]);
}

#[test]
fn smaller_frame_is_centered() {
    let layout = layout(1, 1, (10, 10), 0, Color::BLACK);
    let canvas = compose_grid(&[Some(solid(4, 3, [255, 255, 255, 255]))], &layout);

    // x offset 3, y offset (10 - 3) / 2 = 3
    assert_eq!(canvas.get_pixel(3, 3).0, [255, 255, 255, 255]);
    assert_eq!(canvas.get_pixel(6, 5).0, [255, 255, 255, 255]);
    assert_eq!(canvas.get_pixel(2, 3).0, [0, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(7, 3).0, [0, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(3, 6).0, [0, 0, 0, 255]);
}

#[test]
fn missing_frames_leave_background() {
    let layout = layout(1, 2, (10, 10), 2, Color::WHITE);
    let canvas = compose_grid(&[None, Some(solid(10, 10, [0, 0, 255, 255]))], &layout);
    assert_eq!(canvas.get_pixel(5, 5).0, [255, 255, 255, 255]);
    assert_eq!(canvas.get_pixel(17, 5).0, [0, 0, 255, 255]);
}

#[test]
fn transparent_frame_pixels_show_background() {
    let layout = layout(1, 1, (4, 4), 0, Color::opaque(0, 255, 0));
    let canvas = compose_grid(&[Some(solid(4, 4, [255, 0, 0, 0]))], &layout);
    assert_eq!(canvas.get_pixel(1, 1).0, [0, 255, 0, 255]);
}

#[test]
fn half_transparent_frame_blends() {
    let layout = layout(1, 1, (4, 4), 0, Color::BLACK);
    let canvas = compose_grid(&[Some(solid(4, 4, [255, 255, 255, 128]))], &layout);
    let pixel = canvas.get_pixel(0, 0).0;
    assert!(pixel[0] > 100 && pixel[0] < 155, "unexpected blend {pixel:?}");
    assert_eq!(pixel[3], 255);
}

#[test]
fn extra_frames_are_ignored() {
    let layout = layout(1, 1, (4, 4), 1, Color::BLACK);
    let frames = vec![Some(solid(4, 4, [9, 9, 9, 255])); 3];
    let canvas = compose_grid(&frames, &layout);
    assert_eq!(canvas.dimensions(), (6, 6));
    assert_eq!(canvas.get_pixel(1, 1).0, [9, 9, 9, 255]);
}
