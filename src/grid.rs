//! Grid geometry.
//!
//! [`GridSpec`] is the user-facing description of a contact-sheet grid. Its
//! cell height may be left at zero, in which case it is inferred from the
//! source video's aspect ratio when the [`GridSpec`] is resolved into a
//! [`GridLayout`]. All placement math works on a resolved layout.

use crate::color::Color;
use crate::error::SheetError;

/// Default number of grid rows.
pub const DEFAULT_ROWS: u32 = 3;
/// Default number of grid columns.
pub const DEFAULT_COLUMNS: u32 = 3;
/// Default cell width in pixels.
pub const DEFAULT_CELL_WIDTH: u32 = 320;
/// Default margin in pixels.
pub const DEFAULT_MARGIN: u32 = 8;
/// Largest canvas accepted, in pixels (1 GiB of RGBA).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Grid configuration for a contact sheet.
///
/// `rows * columns` frames are sampled, one per cell. A `cell_height` of
/// zero means "infer from the source aspect ratio".
///
/// # Example
///
/// ```
/// use vidsheet::{Color, GridSpec};
///
/// let spec = GridSpec::new(4, 5)
///     .with_cell_width(240)
///     .with_margin(4)
///     .with_background(Color::BLACK);
/// let layout = spec.resolve(1920, 1080)?;
/// assert_eq!(layout.cell_height(), 135);
/// # Ok::<(), vidsheet::SheetError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct GridSpec {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub columns: u32,
    /// Width of every cell in pixels.
    pub cell_width: u32,
    /// Height of every cell in pixels, or `0` to infer it.
    pub cell_height: u32,
    /// Gap between cells and around the canvas edge, in pixels.
    pub margin: u32,
    /// Canvas background.
    pub background: Color,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLUMNS)
    }
}

impl GridSpec {
    /// Create a grid spec with the given dimensions and default cell size,
    /// margin and background.
    pub fn new(rows: u32, columns: u32) -> Self {
        Self {
            rows,
            columns,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: 0,
            margin: DEFAULT_MARGIN,
            background: Color::default(),
        }
    }

    /// Set the cell width.
    pub fn with_cell_width(mut self, width: u32) -> Self {
        self.cell_width = width;
        self
    }

    /// Set the cell height. `0` re-enables inference.
    pub fn with_cell_height(mut self, height: u32) -> Self {
        self.cell_height = height;
        self
    }

    /// Set the margin.
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Number of cells (and sampled frames) in the grid.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Check the grid without any knowledge of the source video.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::ConfigError`] when rows, columns or the cell
    /// width are zero, when the cell count overflows, or when the canvas
    /// would exceed [`MAX_CANVAS_PIXELS`]. With an inferred cell height the
    /// area is only known after [`resolve`](GridSpec::resolve).
    pub fn validate(&self) -> Result<(), SheetError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(SheetError::ConfigError(
                "rows and cols must be positive integers".to_string(),
            ));
        }
        if self.cell_width == 0 {
            return Err(SheetError::ConfigError(
                "cell width must be a positive integer".to_string(),
            ));
        }
        if self.rows.checked_mul(self.columns).is_none() {
            return Err(SheetError::ConfigError(format!(
                "{}x{} grid has too many cells",
                self.rows, self.columns
            )));
        }
        let width = canvas_extent(self.columns, self.cell_width, self.margin)?;
        if self.cell_height > 0 {
            let height = canvas_extent(self.rows, self.cell_height, self.margin)?;
            check_canvas_area(width, height)?;
        }
        Ok(())
    }

    /// Resolve the cell height against the source resolution.
    ///
    /// An explicit cell height is kept as-is; otherwise it is inferred with
    /// [`infer_cell_height`]. Call this once per run, before any frame is
    /// captured.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](GridSpec::validate).
    pub fn resolve(&self, source_width: u32, source_height: u32) -> Result<GridLayout, SheetError> {
        self.validate()?;

        let cell_height = if self.cell_height == 0 {
            let inferred = infer_cell_height(self.cell_width, source_width, source_height);
            log::debug!(
                "Inferred cell height {inferred} from {source_width}x{source_height} source"
            );
            inferred
        } else {
            self.cell_height
        };

        let canvas_width = canvas_extent(self.columns, self.cell_width, self.margin)?;
        let canvas_height = canvas_extent(self.rows, cell_height, self.margin)?;
        check_canvas_area(canvas_width, canvas_height)?;

        Ok(GridLayout {
            rows: self.rows,
            columns: self.columns,
            cell_width: self.cell_width,
            cell_height,
            margin: self.margin,
            background: self.background,
            canvas_width,
            canvas_height,
        })
    }
}

/// Derive a cell height from the source aspect ratio.
///
/// Returns `round(cell_width * video_height / video_width)`. When either
/// video dimension is zero, or the result rounds to zero, a 16:9 height of
/// `round(cell_width * 9 / 16)` is used instead.
///
/// # Example
///
/// ```
/// assert_eq!(vidsheet::infer_cell_height(320, 1920, 1080), 180);
/// assert_eq!(vidsheet::infer_cell_height(320, 0, 0), 180);
/// ```
pub fn infer_cell_height(cell_width: u32, video_width: u32, video_height: u32) -> u32 {
    let widescreen = (f64::from(cell_width) * 9.0 / 16.0).round() as u32;
    if video_width == 0 || video_height == 0 {
        return widescreen;
    }

    let ratio = f64::from(video_height) / f64::from(video_width);
    let height = (f64::from(cell_width) * ratio).round();
    if height < 1.0 || height > f64::from(u32::MAX) {
        widescreen
    } else {
        height as u32
    }
}

/// `count * cell + (count + 1) * margin`, rejecting overflow.
fn canvas_extent(count: u32, cell: u32, margin: u32) -> Result<u32, SheetError> {
    let extent = u64::from(count) * u64::from(cell) + (u64::from(count) + 1) * u64::from(margin);
    u32::try_from(extent).map_err(|_| {
        SheetError::ConfigError(format!(
            "canvas dimension {extent} is too large ({count} cells of {cell}px, margin {margin}px)"
        ))
    })
}

fn check_canvas_area(width: u32, height: u32) -> Result<(), SheetError> {
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_CANVAS_PIXELS {
        return Err(SheetError::ConfigError(format!(
            "{width}x{height} canvas has {pixels} pixels (limit {MAX_CANVAS_PIXELS})"
        )));
    }
    Ok(())
}

/// A grid whose cell height is known.
///
/// Produced by [`GridSpec::resolve`]. Provides the canvas size and the
/// placement of every cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    rows: u32,
    columns: u32,
    cell_width: u32,
    cell_height: u32,
    margin: u32,
    background: Color,
    canvas_width: u32,
    canvas_height: u32,
}

impl GridLayout {
    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Cell width in pixels.
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Resolved cell height in pixels.
    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    /// Margin in pixels.
    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// Canvas background.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Canvas size as `(width, height)`:
    /// `cols*cell_width + (cols+1)*margin` by
    /// `rows*cell_height + (rows+1)*margin`.
    pub fn canvas_dimensions(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Row and column of the cell at `index`, in row-major order.
    ///
    /// Returns `None` when `index` lies outside the grid.
    pub fn cell_position(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.cell_count() {
            return None;
        }
        let columns = self.columns as usize;
        Some(((index / columns) as u32, (index % columns) as u32))
    }

    /// Top-left pixel of the cell at `index`.
    pub fn cell_origin(&self, index: usize) -> Option<(u32, u32)> {
        let (row, column) = self.cell_position(index)?;
        let x = self.margin + column * (self.cell_width + self.margin);
        let y = self.margin + row * (self.cell_height + self.margin);
        Some((x, y))
    }

    /// Top-left pixel at which a `frame_width × frame_height` frame is drawn
    /// so that it is centered in the cell at `index`.
    ///
    /// Odd remainders bias the frame one pixel toward the top-left.
    pub fn frame_origin(&self, index: usize, frame_width: u32, frame_height: u32) -> Option<(i64, i64)> {
        let (cell_x, cell_y) = self.cell_origin(index)?;
        let offset_x = (i64::from(self.cell_width) - i64::from(frame_width)) / 2;
        let offset_y = (i64::from(self.cell_height) - i64::from(frame_height)) / 2;
        Some((i64::from(cell_x) + offset_x, i64::from(cell_y) + offset_y))
    }
}
