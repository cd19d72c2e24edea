//! Grid compositing.
//!
//! Fitted frames are drawn onto a background-filled canvas in row-major
//! order, each centered in its cell.

use image::{RgbaImage, imageops};

use crate::grid::GridLayout;

/// Compose fitted frames into a single canvas.
///
/// Frame `i` is placed in row `i / cols`, column `i % cols`, centered within
/// its cell and blended with source-over compositing, so frames with an
/// alpha channel let the background show through. `None` entries leave
/// their cell as background. Entries past the last cell are ignored.
///
/// # Example
///
/// ```
/// use image::RgbaImage;
/// use vidsheet::{GridSpec, compose_grid};
///
/// let layout = GridSpec::new(1, 2).with_cell_width(10).with_cell_height(10).with_margin(2).resolve(0, 0)?;
/// let frames = vec![Some(RgbaImage::new(10, 10)), None];
/// let canvas = compose_grid(&frames, &layout);
/// assert_eq!(canvas.dimensions(), (26, 14));
/// # Ok::<(), vidsheet::SheetError>(())
/// ```
pub fn compose_grid(frames: &[Option<RgbaImage>], layout: &GridLayout) -> RgbaImage {
    let (width, height) = layout.canvas_dimensions();
    let mut canvas = RgbaImage::from_pixel(width, height, layout.background().to_rgba());

    log::debug!(
        "Compositing {} frame(s) onto {width}x{height} canvas ({}x{} grid)",
        frames.iter().flatten().count(),
        layout.rows(),
        layout.columns(),
    );

    for (index, frame) in frames.iter().enumerate() {
        let Some(frame) = frame else {
            continue;
        };
        let Some((x, y)) = layout.frame_origin(index, frame.width(), frame.height()) else {
            break;
        };
        imageops::overlay(&mut canvas, frame, x, y);
    }

    canvas
}
