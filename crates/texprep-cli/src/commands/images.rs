//! In-place folder operations: transform, crop, resize and composite.

use std::path::Path;

use anyhow::Context;
use texprep_core::{
    list_files, ops, Compositor, Config, CropPosition, CropSize, CropSpec, Listing, ResizeSpec,
    Transform,
};
use tracing::{info, warn};

use super::{print_summary, with_progress};

/// Images of `dir` per the configured extensions, or `None` if there are
/// none.
fn load_listing(config: &Config, dir: &Path) -> anyhow::Result<Option<Listing>> {
    let listing = list_files(dir, &config.images.extensions)
        .with_context(|| format!("listing {}", dir.display()))?;
    if listing.is_empty() {
        warn!("no images found in {}", dir.display());
        return Ok(None);
    }
    info!("{} images in {}", listing.len(), dir.display());
    Ok(Some(listing))
}

pub fn transform(config: &Config, dir: &Path, operation: Transform) -> anyhow::Result<()> {
    let Some(listing) = load_listing(config, dir)? else {
        return Ok(());
    };
    let quality = config.quality();
    info!("applying {operation}");

    let total = listing.len();
    let report = with_progress("transform", Some(total), move |events| {
        ops::transform_all(&listing, operation, quality, &events)
    })?;
    print_summary(&report);
    Ok(())
}

pub fn crop(
    config: &Config,
    dir: &Path,
    size: CropSize,
    position: CropPosition,
) -> anyhow::Result<()> {
    let Some(listing) = load_listing(config, dir)? else {
        return Ok(());
    };
    let quality = config.quality();
    let spec = CropSpec { size, position };
    info!("cropping to {size:?} at {position:?}");

    let total = listing.len();
    let report = with_progress("crop", Some(total), move |events| {
        ops::crop_all(&listing, &spec, quality, &events)
    })?;
    print_summary(&report);
    Ok(())
}

pub fn resize(config: &Config, dir: &Path, spec: ResizeSpec) -> anyhow::Result<()> {
    let Some(listing) = load_listing(config, dir)? else {
        return Ok(());
    };
    let quality = config.quality();
    info!(
        "resizing to {}x{} ({})",
        spec.width,
        spec.height,
        if spec.keep_aspect_ratio {
            "letterbox"
        } else {
            "stretch"
        }
    );

    let total = listing.len();
    let report = with_progress("resize", Some(total), move |events| {
        ops::resize_all(&listing, &spec, quality, &events)
    })?;
    print_summary(&report);
    Ok(())
}

pub fn composite(config: &Config, dir: &Path, background: &Path) -> anyhow::Result<()> {
    // Validated before any foreground is touched
    let compositor = Compositor::from_path(background, config.composite.sizes)
        .with_context(|| format!("background {}", background.display()))?;

    let Some(mut listing) = load_listing(config, dir)? else {
        return Ok(());
    };
    // The background may live in the same folder
    listing.exclude(background);
    let quality = config.quality();

    let total = listing.len();
    let report = with_progress("composite", Some(total), move |events| {
        compositor.run(&listing, quality, &events)
    })?;
    print_summary(&report);
    Ok(())
}
