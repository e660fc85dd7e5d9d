//! Opening image files from disk.

use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageError, ImageReader};
use tracing::debug;

use super::{DecodeError, ImageAsset};

/// Open and decode an image file.
///
/// The container format is guessed from the file contents first and the
/// extension second, so a PNG saved with a `.jpg` name still decodes. The
/// EXIF block is kept on the asset when the format has one; unreadable
/// metadata is ignored.
///
/// # Errors
///
/// Returns `DecodeError::IoError` if the file cannot be read,
/// `DecodeError::InvalidFormat` for formats the decoder does not support and
/// `DecodeError::CorruptedFile` for truncated or damaged data.
pub fn open_image(path: &Path) -> Result<ImageAsset, DecodeError> {
    let reader = ImageReader::open(path)
        .map_err(|e| DecodeError::IoError(format!("{}: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| DecodeError::IoError(format!("{}: {e}", path.display())))?;

    let format = reader.format();
    let mut decoder = reader.into_decoder().map_err(map_image_error)?;
    let exif = decoder.exif_metadata().unwrap_or_else(|e| {
        debug!("{}: unreadable EXIF: {e}", path.display());
        None
    });
    let image = DynamicImage::from_decoder(decoder).map_err(map_image_error)?;

    Ok(ImageAsset::new(path, format, image).with_exif(exif))
}

/// Read only the header of an image to get its dimensions.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32), DecodeError> {
    ImageReader::open(path)
        .map_err(|e| DecodeError::IoError(format!("{}: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| DecodeError::IoError(format!("{}: {e}", path.display())))?
        .into_dimensions()
        .map_err(map_image_error)
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(e) => DecodeError::InvalidFormat(e.to_string()),
        ImageError::IoError(e) => DecodeError::IoError(e.to_string()),
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, ImageFormat, Rgb, RgbImage};

    #[test]
    fn test_open_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.png");
        RgbImage::from_pixel(12, 7, Rgb([10, 20, 30])).save(&path).unwrap();

        let asset = open_image(&path).unwrap();
        assert_eq!(asset.dimensions(), (12, 7));
        assert_eq!(asset.format, Some(ImageFormat::Png));
        assert_eq!(asset.color_mode(), ColorType::Rgb8);
        assert_eq!(asset.path(), path.as_path());
    }

    #[test]
    fn test_open_guesses_format_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("real.png");
        RgbImage::new(3, 3).save(&png_path).unwrap();

        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png_path, &misnamed).unwrap();

        let asset = open_image(&misnamed).unwrap();
        assert_eq!(asset.format, Some(ImageFormat::Png));
    }

    #[test]
    fn test_open_reads_exif() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.png");
        RgbImage::new(4, 4).save(&plain).unwrap();
        assert_eq!(open_image(&plain).unwrap().exif, None);

        let exif = b"II\x2a\x00\x08\x00\x00\x00\x00\x00\x00\x00\x00\x00".to_vec();
        let bytes = crate::encode::encode_image_with_exif(
            &image::DynamicImage::new_rgb8(4, 4),
            ImageFormat::Jpeg,
            90,
            Some(&exif),
        )
        .unwrap();
        let tagged = dir.path().join("tagged.jpg");
        std::fs::write(&tagged, bytes).unwrap();

        assert_eq!(open_image(&tagged).unwrap().exif, Some(exif));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_image(&dir.path().join("nope.png"));
        assert!(matches!(result, Err(DecodeError::IoError(_))));
    }

    #[test]
    fn test_open_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        // Valid PNG signature followed by garbage
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 16]);
        std::fs::write(&path, bytes).unwrap();

        assert!(open_image(&path).is_err());
    }

    #[test]
    fn test_read_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dims.png");
        RgbImage::new(31, 17).save(&path).unwrap();

        assert_eq!(read_dimensions(&path).unwrap(), (31, 17));
    }
}
