use std::path::Path;

use anyhow::Context;
use texprep_core::config::GridConfig;
use texprep_core::{list_files, stitch, Config};
use tracing::{debug, info, warn};

use super::with_progress;

pub fn run(config: &Config, dir: &Path, grid: GridConfig) -> anyhow::Result<()> {
    let mut listing = list_files(dir, &config.images.extensions)
        .with_context(|| format!("listing {}", dir.display()))?;
    // A sheet from an earlier run is not an input
    if listing.exclude(&grid.output) {
        debug!("leaving out previous output {}", grid.output.display());
    }

    let cells = grid.rows as usize * grid.cols as usize;
    if listing.len() > cells {
        warn!(
            "{} images found, only the first {cells} fit a {}x{} grid",
            listing.len(),
            grid.rows,
            grid.cols
        );
    }
    info!(
        "stitching {} images into {}",
        listing.len().min(cells),
        grid.output.display()
    );

    let quality = config.quality();
    let total = listing.len().min(cells);
    let output = grid.output.clone();
    let outcome = with_progress("stitch", Some(total), move |events| {
        stitch(
            &listing.files,
            grid.rows,
            grid.cols,
            grid.fill,
            &grid.output,
            quality,
            &events,
        )
    })?
    .with_context(|| format!("stitching {}", output.display()))?;

    let (width, height) = outcome.spec.canvas_size();
    println!(
        "{}: {width}x{height}, {} images, {} placeholders",
        output.display(),
        outcome.placed(),
        outcome.placeholders()
    );
    Ok(())
}
