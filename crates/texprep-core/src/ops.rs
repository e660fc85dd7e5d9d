//! The in-place batch operations: transform, crop and resize every image
//! of a listing.

use crossbeam_channel::Sender;
use tracing::debug;

use crate::batch::{run_in_place, BatchReport, FileError, ProgressEvent};
use crate::decode::{apply_resize, ResizeSpec};
use crate::listing::Listing;
use crate::transform::{apply_crop, calculate_crop_box, CropSpec, Transform};

pub fn transform_all(
    listing: &Listing,
    transform: Transform,
    quality: u8,
    events: &Sender<ProgressEvent>,
) -> BatchReport {
    run_in_place(listing, quality, events, |asset| Ok(transform.apply(&asset.image)))
}

/// Crop every image. The box is computed per image, so sources of different
/// sizes each get their own centered (or anchored) region.
pub fn crop_all(
    listing: &Listing,
    spec: &CropSpec,
    quality: u8,
    events: &Sender<ProgressEvent>,
) -> BatchReport {
    run_in_place(listing, quality, events, |asset| {
        let crop_box = calculate_crop_box(asset.width(), asset.height(), spec);
        debug!("{}: crop box {crop_box}", asset.display_name());
        Ok(apply_crop(&asset.image, crop_box))
    })
}

pub fn resize_all(
    listing: &Listing,
    spec: &ResizeSpec,
    quality: u8,
    events: &Sender<ProgressEvent>,
) -> BatchReport {
    run_in_place(listing, quality, events, |asset| {
        apply_resize(&asset.image, spec).map_err(FileError::from)
    })
}
