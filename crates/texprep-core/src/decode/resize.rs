//! Image resizing: plain stretch and aspect-preserving letterbox.
//!
//! Uses the `image` crate's resampling filters. All functions return new
//! images without modifying the input.

use image::{imageops, DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

use super::{Color, DecodeError, FilterType};

/// Target geometry for a resize run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeSpec {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Letterbox instead of stretching.
    pub keep_aspect_ratio: bool,
    /// Fill for the letterbox bands.
    pub background: Color,
    pub filter: FilterType,
}

impl Default for ResizeSpec {
    fn default() -> Self {
        Self {
            width: 876,
            height: 1237,
            keep_aspect_ratio: false,
            background: Color::WHITE,
            filter: FilterType::Lanczos3,
        }
    }
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero.
pub fn resize(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DynamicImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }

    Ok(image.resize_exact(width, height, filter.to_image_filter()))
}

/// Scale an image to fit inside `width x height` and center it on a canvas
/// of exactly that size filled with `background`.
///
/// The output is always RGB; any alpha channel is dropped before scaling.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension or
/// either source dimension is zero.
pub fn letterbox(
    image: &DynamicImage,
    width: u32,
    height: u32,
    background: Color,
    filter: FilterType,
) -> Result<DynamicImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        });
    }

    let (new_width, new_height) =
        calculate_fit_dimensions(image.width(), image.height(), width, height);

    let rgb = image.to_rgb8();
    let scaled = if (new_width, new_height) == rgb.dimensions() {
        rgb
    } else {
        imageops::resize(&rgb, new_width, new_height, filter.to_image_filter())
    };

    let mut canvas = RgbImage::from_pixel(width, height, background.to_rgb());
    let x = (width - new_width) / 2;
    let y = (height - new_height) / 2;
    imageops::replace(&mut canvas, &scaled, i64::from(x), i64::from(y));

    Ok(DynamicImage::ImageRgb8(canvas))
}

/// Apply a [`ResizeSpec`], choosing between stretch and letterbox.
///
/// Stretched output is also converted to RGB so both paths write the same
/// pixel layout.
pub fn apply_resize(image: &DynamicImage, spec: &ResizeSpec) -> Result<DynamicImage, DecodeError> {
    if spec.keep_aspect_ratio {
        letterbox(image, spec.width, spec.height, spec.background, spec.filter)
    } else {
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        resize(&rgb, spec.width, spec.height, spec.filter)
    }
}

/// Calculate the largest size with the source aspect ratio that fits in the
/// target box. Dimensions are floored, with a minimum of 1.
fn calculate_fit_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    // Integer cross-multiplication keeps exact fits exact.
    let width_bound = u64::from(max_width) * u64::from(height)
        <= u64::from(max_height) * u64::from(width);
    let (new_width, new_height) = if width_bound {
        let h = u64::from(height) * u64::from(max_width) / u64::from(width);
        (max_width, h as u32)
    } else {
        let w = u64::from(width) * u64::from(max_height) / u64::from(height);
        (w as u32, max_height)
    };

    (new_width.clamp(1, max_width.max(1)), new_height.clamp(1, max_height.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, Rgba, RgbaImage};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        // Create a simple gradient image for testing
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                128,
            ])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.dimensions(), (50, 25));
    }

    #[test]
    fn test_resize_same_dimensions() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 100, 50, FilterType::Bilinear).unwrap();

        assert_eq!(resized.dimensions(), (100, 50));
        assert_eq!(resized.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_resize_upscale() {
        let img = create_test_image(50, 25);
        let resized = resize(&img, 100, 50, FilterType::Lanczos3).unwrap();

        assert_eq!(resized.dimensions(), (100, 50));
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);

        assert!(resize(&img, 0, 50, FilterType::Bilinear).is_err());
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_letterbox_landscape_into_square() {
        // 100x50 into 200x200: scaled to 200x100 with 50px bands top and bottom
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 50, Rgb([200, 0, 0])));
        let boxed = letterbox(&img, 200, 200, Color::WHITE, FilterType::Nearest).unwrap();
        let rgb = boxed.to_rgb8();

        assert_eq!(rgb.dimensions(), (200, 200));
        for x in [0, 100, 199] {
            assert_eq!(*rgb.get_pixel(x, 0), Rgb([255, 255, 255]));
            assert_eq!(*rgb.get_pixel(x, 49), Rgb([255, 255, 255]));
            assert_eq!(*rgb.get_pixel(x, 50), Rgb([200, 0, 0]));
            assert_eq!(*rgb.get_pixel(x, 149), Rgb([200, 0, 0]));
            assert_eq!(*rgb.get_pixel(x, 150), Rgb([255, 255, 255]));
            assert_eq!(*rgb.get_pixel(x, 199), Rgb([255, 255, 255]));
        }
    }

    #[test]
    fn test_letterbox_portrait_bands_left_right() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 100, Rgb([0, 0, 200])));
        let boxed = letterbox(&img, 100, 100, Color::BLACK, FilterType::Nearest).unwrap();
        let rgb = boxed.to_rgb8();

        assert_eq!(*rgb.get_pixel(24, 50), Rgb([0, 0, 0]));
        assert_eq!(*rgb.get_pixel(25, 50), Rgb([0, 0, 200]));
        assert_eq!(*rgb.get_pixel(74, 50), Rgb([0, 0, 200]));
        assert_eq!(*rgb.get_pixel(75, 50), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_letterbox_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 0])));
        let boxed = letterbox(&img, 20, 10, Color::WHITE, FilterType::Nearest).unwrap();

        assert!(!boxed.color().has_alpha());
        assert_eq!(boxed.dimensions(), (20, 10));
    }

    #[test]
    fn test_letterbox_zero_target_error() {
        let img = create_test_image(10, 10);
        assert!(letterbox(&img, 0, 10, Color::WHITE, FilterType::Nearest).is_err());
    }

    #[test]
    fn test_apply_resize_stretch() {
        let img = create_test_image(100, 50);
        let spec = ResizeSpec {
            width: 30,
            height: 90,
            ..ResizeSpec::default()
        };
        let out = apply_resize(&img, &spec).unwrap();
        assert_eq!(out.dimensions(), (30, 90));
    }

    #[test]
    fn test_apply_resize_keep_aspect() {
        let img = create_test_image(100, 50);
        let mut spec = ResizeSpec::default();
        spec.width = 200;
        spec.height = 200;
        spec.keep_aspect_ratio = true;

        let out = apply_resize(&img, &spec).unwrap();
        assert_eq!(out.dimensions(), (200, 200));
    }

    #[test]
    fn test_calculate_fit_dimensions_landscape() {
        assert_eq!(calculate_fit_dimensions(100, 50, 200, 200), (200, 100));
    }

    #[test]
    fn test_calculate_fit_dimensions_portrait() {
        assert_eq!(calculate_fit_dimensions(4000, 6000, 876, 1237), (824, 1237));
    }

    #[test]
    fn test_calculate_fit_dimensions_floors() {
        // 3x1 into 10x10: scale 3.333.., height floors to 3
        assert_eq!(calculate_fit_dimensions(3, 1, 10, 10), (10, 3));
    }

    #[test]
    fn test_calculate_fit_dimensions_extreme_ratio() {
        let (w, h) = calculate_fit_dimensions(10_000, 1, 100, 100);
        assert_eq!(w, 100);
        assert_eq!(h, 1);
    }

    #[test]
    fn test_calculate_fit_dimensions_zero_input() {
        assert_eq!(calculate_fit_dimensions(0, 0, 256, 256), (0, 0));
    }
}
