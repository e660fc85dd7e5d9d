//! Per-file transform executor.

use std::path::Path;

use crossbeam_channel::Sender;
use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, error, info};

use super::{BatchReport, ProgressEvent};
use crate::decode::{open_image, DecodeError, ImageAsset};
use crate::encode::{encode_image_with_exif, output_format, write_atomic, EncodeError};
use crate::listing::{display_name, Listing};

/// Why a single file could not be processed.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The image decoded but does not satisfy the operation's requirements.
    #[error("{0}")]
    Rejected(String),
}

/// Open `path`, apply `op`, and atomically replace the file with the result.
///
/// The output keeps the source's format (by detected content, then by
/// extension) and its EXIF block where the format allows. Returns the
/// dimensions that were written. On error the source file is untouched and no
/// temporary file is left behind.
pub fn process_in_place<F>(path: &Path, quality: u8, op: F) -> Result<(u32, u32), FileError>
where
    F: FnOnce(ImageAsset) -> Result<DynamicImage, FileError>,
{
    let asset = open_image(path)?;
    let format = output_format(path, asset.format)?;
    debug!(
        "{}: {}x{} {:?}",
        asset.display_name(),
        asset.width(),
        asset.height(),
        asset.color_mode()
    );

    let exif = asset.exif.clone();
    let output = op(asset)?;
    let bytes = encode_image_with_exif(&output, format, quality, exif.as_deref())?;
    write_atomic(path, &bytes)?;

    Ok((output.width(), output.height()))
}

/// Run `op` over every file of a listing, in order, replacing each file with
/// its result.
///
/// Skipped entries of the listing are reported first. Per-file failures are
/// logged, reported and counted; they never stop the run. Emits
/// [`ProgressEvent::Finished`] last and returns the same report.
pub fn run_in_place<F>(
    listing: &Listing,
    quality: u8,
    events: &Sender<ProgressEvent>,
    mut op: F,
) -> BatchReport
where
    F: FnMut(ImageAsset) -> Result<DynamicImage, FileError>,
{
    let mut report = BatchReport::new(listing.files.len());
    let emit = |report: &mut BatchReport, event: ProgressEvent| {
        report.record(&event);
        // A closed channel only means nobody is watching.
        let _ = events.send(event);
    };

    for path in &listing.skipped {
        debug!("skipping {}", path.display());
        emit(
            &mut report,
            ProgressEvent::Skipped {
                file: display_name(path),
            },
        );
    }

    for path in &listing.files {
        let file = display_name(path);
        emit(&mut report, ProgressEvent::Started { file: file.clone() });

        match process_in_place(path, quality, &mut op) {
            Ok((width, height)) => {
                info!("{file}: written ({width}x{height})");
                emit(&mut report, ProgressEvent::Succeeded { file });
            }
            Err(e) => {
                error!("{file}: {e}");
                emit(
                    &mut report,
                    ProgressEvent::Failed {
                        file,
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    let _ = events.send(ProgressEvent::Finished(report));
    report
}
