//! Grid compositor: stitch an ordered set of images into one sheet.
//!
//! Images are placed in row-major order into equally sized cells. The cell
//! size is taken from the first image that opens. Images that fail to open,
//! and any cells beyond the end of the input, become blank placeholders in
//! the fill color. Input beyond `rows * cols` is ignored.
//!
//! # Layout
//!
//! ```text
//! index i  ->  row = i / cols, col = i % cols
//!              x = col * cell_width, y = row * cell_height
//! ```

use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use image::{imageops, DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::batch::ProgressEvent;
use crate::decode::{open_image, Color, ImageAsset};
use crate::encode::{save_image, EncodeError};
use crate::listing::display_name;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    InvalidShape { rows: u32, cols: u32 },

    #[error("no input image could be opened")]
    NoImages,

    #[error("canvas of {cols}x{rows} cells of {cell_width}x{cell_height} is too large")]
    CanvasTooLarge {
        rows: u32,
        cols: u32,
        cell_width: u32,
        cell_height: u32,
    },

    #[error("failed to save grid: {0}")]
    Save(#[from] EncodeError),
}

/// Fixed geometry of one stitching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl GridSpec {
    pub fn new(rows: u32, cols: u32, cell_width: u32, cell_height: u32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidShape { rows, cols });
        }
        let spec = Self {
            rows,
            cols,
            cell_width,
            cell_height,
        };
        let too_large = GridError::CanvasTooLarge {
            rows,
            cols,
            cell_width,
            cell_height,
        };
        match (cols.checked_mul(cell_width), rows.checked_mul(cell_height)) {
            (Some(_), Some(_)) => Ok(spec),
            _ => Err(too_large),
        }
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Canvas `(width, height)`.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.cols * self.cell_width, self.rows * self.cell_height)
    }

    /// Top-left pixel `(x, y)` of cell `index` in row-major order.
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let row = (index / self.cols as usize) as u32;
        let col = (index % self.cols as usize) as u32;
        (col * self.cell_width, row * self.cell_height)
    }
}

/// What ended up in one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Image(PathBuf),
    /// Blank cell. `source` is the image that failed to open, or `None` for
    /// padding past the end of the input.
    Placeholder {
        source: Option<PathBuf>,
        reason: String,
    },
}

impl Slot {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder { .. })
    }
}

/// Result of a stitching run.
#[derive(Debug, Clone)]
pub struct GridOutcome {
    pub spec: GridSpec,
    /// RGB canvas, `spec.canvas_size()` pixels.
    pub canvas: DynamicImage,
    /// One entry per cell, in row-major order.
    pub slots: Vec<Slot>,
}

impl GridOutcome {
    pub fn placed(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_placeholder()).count()
    }

    pub fn placeholders(&self) -> usize {
        self.slots.iter().filter(|s| s.is_placeholder()).count()
    }
}

/// Stitch `paths` into a `rows x cols` grid in memory.
///
/// # Errors
///
/// Fails before any pixel is placed if the shape is empty, no image opens,
/// or the canvas would not fit in `u32` dimensions.
pub fn compose_grid(
    paths: &[PathBuf],
    rows: u32,
    cols: u32,
    fill: Color,
    events: &Sender<ProgressEvent>,
) -> Result<GridOutcome, GridError> {
    if rows == 0 || cols == 0 {
        return Err(GridError::InvalidShape { rows, cols });
    }

    let cells = rows as usize * cols as usize;
    if paths.len() > cells {
        warn!(
            "{} images supplied for {cells} cells, ignoring the last {}",
            paths.len(),
            paths.len() - cells
        );
    }
    let inputs = &paths[..paths.len().min(cells)];

    let mut slots = Vec::with_capacity(cells);

    // The first image that opens fixes the cell size.
    let mut first = None;
    for (index, path) in inputs.iter().enumerate() {
        match open_image(path) {
            Ok(asset) => {
                first = Some((index, asset));
                break;
            }
            Err(e) => slots.push(placeholder_for(path, e.to_string(), events)),
        }
    }
    let (first_index, first_asset) = first.ok_or(GridError::NoImages)?;

    let spec = GridSpec::new(rows, cols, first_asset.width(), first_asset.height())?;
    let (canvas_w, canvas_h) = spec.canvas_size();
    info!(
        "stitching {rows}x{cols} grid of {}x{} cells ({canvas_w}x{canvas_h})",
        spec.cell_width, spec.cell_height
    );

    // Placeholder cells keep the canvas fill.
    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, fill.to_rgb());

    place(&mut canvas, &spec, first_index, first_asset, events);
    slots.push(Slot::Image(inputs[first_index].clone()));

    for (index, path) in inputs.iter().enumerate().skip(first_index + 1) {
        match open_image(path) {
            Ok(asset) => {
                place(&mut canvas, &spec, index, asset, events);
                slots.push(Slot::Image(path.clone()));
            }
            Err(e) => slots.push(placeholder_for(path, e.to_string(), events)),
        }
    }

    let padding = cells - slots.len();
    if padding > 0 {
        info!("padding {padding} empty cells with placeholders");
    }
    slots.resize(
        cells,
        Slot::Placeholder {
            source: None,
            reason: "no input image".to_string(),
        },
    );

    Ok(GridOutcome {
        spec,
        canvas: DynamicImage::ImageRgb8(canvas),
        slots,
    })
}

/// Stitch `paths` and write the sheet to `output`.
///
/// JPEG output uses `quality`; other formats follow the extension.
pub fn stitch(
    paths: &[PathBuf],
    rows: u32,
    cols: u32,
    fill: Color,
    output: &Path,
    quality: u8,
    events: &Sender<ProgressEvent>,
) -> Result<GridOutcome, GridError> {
    let outcome = compose_grid(paths, rows, cols, fill, events)?;
    save_image(&outcome.canvas, output, quality)?;
    info!(
        "grid saved to {} ({} images, {} placeholders)",
        output.display(),
        outcome.placed(),
        outcome.placeholders()
    );
    Ok(outcome)
}

fn place(
    canvas: &mut RgbImage,
    spec: &GridSpec,
    index: usize,
    asset: ImageAsset,
    events: &Sender<ProgressEvent>,
) {
    let (x, y) = spec.cell_origin(index);
    let file = asset.display_name();
    if asset.dimensions() != (spec.cell_width, spec.cell_height) {
        warn!(
            "{file} is {}x{}, cells are {}x{}",
            asset.width(),
            asset.height(),
            spec.cell_width,
            spec.cell_height
        );
    }

    let rgb = asset.into_image().into_rgb8();
    imageops::replace(canvas, &rgb, i64::from(x), i64::from(y));

    let row = index / spec.cols as usize + 1;
    let col = index % spec.cols as usize + 1;
    let _ = events.send(ProgressEvent::Note(format!("{file}: row {row}, column {col}")));
    let _ = events.send(ProgressEvent::Succeeded { file });
}

fn placeholder_for(path: &Path, reason: String, events: &Sender<ProgressEvent>) -> Slot {
    let file = display_name(path);
    warn!("{file}: {reason}; using a blank placeholder");
    let _ = events.send(ProgressEvent::Failed {
        file,
        reason: reason.clone(),
    });
    Slot::Placeholder {
        source: Some(path.to_path_buf()),
        reason,
    }
}
