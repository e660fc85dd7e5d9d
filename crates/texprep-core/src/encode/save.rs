//! Encoding images to bytes and writing them to disk.
//!
//! JPEG goes through the `image` crate's `JpegEncoder` so the quality setting
//! is honoured. JPEG, PNG and WebP carry the source's EXIF block through; other
//! formats use the format's default encoder and drop it.

use std::io::{Cursor, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageError, ImageFormat};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while encoding or writing an image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// No encoder for the requested output
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The encoder rejected the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the temporary file or renaming it into place failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pick the format to rewrite `path` in.
///
/// The format the source was decoded from wins, so a PNG saved under a
/// `.jpg` name stays lossless. The extension is used when nothing was
/// decoded or the decoded format cannot be written.
pub fn output_format(path: &Path, decoded: Option<ImageFormat>) -> Result<ImageFormat, EncodeError> {
    decoded
        .filter(|format| format.writing_enabled())
        .or_else(|| ImageFormat::from_path(path).ok())
        .filter(|format| format.writing_enabled())
        .ok_or_else(|| EncodeError::UnsupportedFormat(path.display().to_string()))
}

/// Encode an image to bytes in the given format.
///
/// # Arguments
///
/// * `image` - Image to encode
/// * `format` - Output container
/// * `quality` - JPEG quality (1-100); ignored for other formats
///
/// JPEG output drops the alpha channel. GIF is written as RGBA; other
/// formats keep alpha when the source has it and are normalized to 8 bits
/// per channel.
pub fn encode_image(
    image: &DynamicImage,
    format: ImageFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    encode_image_with_exif(image, format, quality, None)
}

/// [`encode_image`], embedding `exif` (a raw TIFF-structured EXIF block) when
/// the format can hold one.
pub fn encode_image_with_exif(
    image: &DynamicImage,
    format: ImageFormat,
    quality: u8,
    exif: Option<&[u8]>,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());

    match format {
        ImageFormat::Jpeg => {
            // Clamp quality to valid range (1-100)
            let quality = quality.clamp(1, 100);
            let rgb = image.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            attach_exif(&mut encoder, exif);
            encoder
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(encoding_failed)?;
        }
        ImageFormat::Png => {
            let normalized = normalize(image);
            let mut encoder = PngEncoder::new(&mut buffer);
            attach_exif(&mut encoder, exif);
            encoder
                .write_image(normalized.as_bytes(), width, height, normalized.color().into())
                .map_err(encoding_failed)?;
        }
        ImageFormat::WebP => {
            let normalized = normalize(image);
            let mut encoder = WebPEncoder::new_lossless(&mut buffer);
            attach_exif(&mut encoder, exif);
            encoder
                .write_image(normalized.as_bytes(), width, height, normalized.color().into())
                .map_err(encoding_failed)?;
        }
        ImageFormat::Gif => {
            DynamicImage::ImageRgba8(image.to_rgba8())
                .write_to(&mut buffer, format)
                .map_err(encoding_failed)?;
        }
        _ => {
            if exif.is_some() {
                debug!("{format:?} output does not keep EXIF");
            }
            normalize(image)
                .write_to(&mut buffer, format)
                .map_err(encoding_failed)?;
        }
    }

    Ok(buffer.into_inner())
}

fn normalize(image: &DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}

fn attach_exif<E: ImageEncoder>(encoder: &mut E, exif: Option<&[u8]>) {
    if let Some(exif) = exif {
        if let Err(e) = encoder.set_exif_metadata(exif.to_vec()) {
            warn!("EXIF dropped: {e}");
        }
    }
}

fn encoding_failed(err: ImageError) -> EncodeError {
    EncodeError::EncodingFailed(err.to_string())
}

/// Replace `target` with `bytes` without ever leaving a half-written file.
///
/// The bytes go to a temporary file in the same directory (same extension,
/// so external tools sniffing names stay happy) which is then renamed over
/// the target. If anything fails the temporary file is deleted.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), EncodeError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = target
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut tmp = tempfile::Builder::new()
        .prefix(".texprep-")
        .suffix(&suffix)
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| EncodeError::Io(e.error))?;
    Ok(())
}

/// Encode and write an image to a new output path.
pub fn save_image(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), EncodeError> {
    let format = output_format(path, None)?;
    let bytes = encode_image(image, format, quality)?;
    write_atomic(path, &bytes)
}
