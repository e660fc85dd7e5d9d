//! Crop-box calculation and cropping.
//!
//! A [`CropSpec`] describes the crop independently of any particular image:
//! either an aspect ratio (the largest box of that shape is used) or an
//! absolute pixel size, plus where the box is anchored. The calculator turns
//! it into a pixel box for a concrete source size.
//!
//! # Behavior
//!
//! - Requests larger than the source are clamped to the source
//! - The resulting box always lies inside `[0, width] x [0, height]`
//! - Invalid geometry is coerced, never rejected (minimum 1x1 box)
//!
//! # Example
//!
//! ```ignore
//! let spec = CropSpec::ratio(16, 9, CropPosition::Center);
//! let crop_box = calculate_crop_box(1920, 1200, &spec);
//! let cropped = apply_crop(&image, crop_box);
//! ```

use std::fmt;
use std::str::FromStr;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How big the crop box is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropSize {
    /// Largest box with this width:height ratio.
    Ratio { width: u32, height: u32 },
    /// Fixed pixel size, clamped to the source.
    Exact { width: u32, height: u32 },
}

/// Where the crop box is anchored inside the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropPosition {
    /// Flush left, vertically centered.
    LeftCenter,
    /// Centered on both axes.
    #[default]
    Center,
    /// Flush right, vertically centered.
    RightCenter,
    /// Explicit offset of the box's top-left corner.
    Custom { left: u32, top: u32 },
    TopLeft,
    BottomRight,
}

/// A complete crop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSpec {
    pub size: CropSize,
    pub position: CropPosition,
}

impl CropSpec {
    pub fn ratio(width: u32, height: u32, position: CropPosition) -> Self {
        Self {
            size: CropSize::Ratio { width, height },
            position,
        }
    }

    pub fn exact(width: u32, height: u32, position: CropPosition) -> Self {
        Self {
            size: CropSize::Exact { width, height },
            position,
        }
    }
}

/// Pixel crop region; `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// True if the box lies entirely inside a `width x height` source.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left <= self.right
            && self.top <= self.bottom
            && self.right <= width
            && self.bottom <= height
    }

    /// Pull every edge inside `[0, width] x [0, height]`.
    pub fn clamp_to(self, width: u32, height: u32) -> CropBox {
        let left = self.left.min(width);
        let top = self.top.min(height);
        CropBox {
            left,
            top,
            right: self.right.clamp(left, width),
            bottom: self.bottom.clamp(top, height),
        }
    }
}

impl fmt::Display for CropBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Compute the crop box for a `width x height` source.
///
/// Never fails: oversized requests shrink to the source, custom offsets are
/// bounded to `[0, dimension - crop_dimension]`, and a zero ratio component
/// selects the whole source.
pub fn calculate_crop_box(width: u32, height: u32, spec: &CropSpec) -> CropBox {
    if width == 0 || height == 0 {
        return CropBox::new(0, 0, 0, 0);
    }

    let (crop_w, crop_h) = crop_dimensions(width, height, spec.size);

    let (left, top) = match spec.position {
        CropPosition::LeftCenter => (0, (height - crop_h) / 2),
        CropPosition::Center => ((width - crop_w) / 2, (height - crop_h) / 2),
        CropPosition::RightCenter => (width - crop_w, (height - crop_h) / 2),
        CropPosition::Custom { left, top } => {
            (left.min(width - crop_w), top.min(height - crop_h))
        }
        CropPosition::TopLeft => (0, 0),
        CropPosition::BottomRight => (width - crop_w, height - crop_h),
    };

    let requested = CropBox::new(left, top, left + crop_w, top + crop_h);
    if requested.fits_within(width, height) {
        requested
    } else {
        let corrected = requested.clamp_to(width, height);
        warn!("crop box {requested} exceeds {width}x{height}, corrected to {corrected}");
        corrected
    }
}

/// Crop size for a source, each side within `1..=dimension`.
fn crop_dimensions(width: u32, height: u32, size: CropSize) -> (u32, u32) {
    let (w, h) = match size {
        CropSize::Ratio {
            width: rw,
            height: rh,
        } => {
            if rw == 0 || rh == 0 {
                return (width, height);
            }
            // Source wider than the ratio: full height, trimmed width
            if u64::from(width) * u64::from(rh) > u64::from(height) * u64::from(rw) {
                let w = u64::from(height) * u64::from(rw) / u64::from(rh);
                (w as u32, height)
            } else {
                let h = u64::from(width) * u64::from(rh) / u64::from(rw);
                (width, h as u32)
            }
        }
        CropSize::Exact {
            width: ew,
            height: eh,
        } => (ew.min(width), eh.min(height)),
    };

    (w.clamp(1, width), h.clamp(1, height))
}

/// Crop an image to a pixel box, clamping the box to the image first.
pub fn apply_crop(image: &DynamicImage, crop_box: CropBox) -> DynamicImage {
    let crop_box = crop_box.clamp_to(image.width(), image.height());

    // Fast path: full crop returns a clone
    if crop_box == CropBox::new(0, 0, image.width(), image.height()) {
        return image.clone();
    }

    image.crop_imm(
        crop_box.left,
        crop_box.top,
        crop_box.width(),
        crop_box.height(),
    )
}

impl FromStr for CropSize {
    type Err = String;

    /// `16:9` is a ratio, `800x600` an exact size.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_pair = |sep: char| -> Result<(u32, u32), String> {
            let (a, b) = s
                .split_once(sep)
                .ok_or_else(|| format!("expected W{sep}H, got '{s}'"))?;
            let a = a.trim().parse::<u32>().map_err(|e| format!("'{a}': {e}"))?;
            let b = b.trim().parse::<u32>().map_err(|e| format!("'{b}': {e}"))?;
            if a == 0 || b == 0 {
                return Err(format!("'{s}' must have positive components"));
            }
            Ok((a, b))
        };

        if s.contains(':') {
            let (width, height) = parse_pair(':')?;
            Ok(CropSize::Ratio { width, height })
        } else {
            let (width, height) = parse_pair('x')?;
            Ok(CropSize::Exact { width, height })
        }
    }
}

impl FromStr for CropPosition {
    type Err = String;

    /// Accepts names (`left`, `center`, `right`, `top-left`, `bottom-right`,
    /// `custom:LEFT,TOP`) or the menu numbers 1-6.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(offsets) = lower.strip_prefix("custom:") {
            let (left, top) = offsets
                .split_once(',')
                .ok_or_else(|| format!("expected custom:LEFT,TOP, got '{s}'"))?;
            let left = left.trim().parse::<u32>().map_err(|e| format!("'{left}': {e}"))?;
            let top = top.trim().parse::<u32>().map_err(|e| format!("'{top}': {e}"))?;
            return Ok(CropPosition::Custom { left, top });
        }

        match lower.as_str() {
            "1" | "left" | "left-center" => Ok(CropPosition::LeftCenter),
            "2" | "center" | "centre" => Ok(CropPosition::Center),
            "3" | "right" | "right-center" => Ok(CropPosition::RightCenter),
            "5" | "top-left" => Ok(CropPosition::TopLeft),
            "6" | "bottom-right" => Ok(CropPosition::BottomRight),
            "4" | "custom" => Err("custom position needs offsets: custom:LEFT,TOP".to_string()),
            other => Err(format!("unknown crop position '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let v = ((y * width + x) % 256) as u8;
            Rgb([v, v, v])
        }))
    }

    #[test]
    fn test_ratio_wide_source_centered() {
        // 1920x1080 to 4:3: full height, width 1440, centered horizontally
        let spec = CropSpec::ratio(4, 3, CropPosition::Center);
        let b = calculate_crop_box(1920, 1080, &spec);
        assert_eq!(b, CropBox::new(240, 0, 1680, 1080));
    }

    #[test]
    fn test_ratio_tall_source() {
        // 1000x2000 to 16:9: full width, height 562
        let spec = CropSpec::ratio(16, 9, CropPosition::TopLeft);
        let b = calculate_crop_box(1000, 2000, &spec);
        assert_eq!(b, CropBox::new(0, 0, 1000, 562));
    }

    #[test]
    fn test_ratio_matching_source_is_full() {
        let spec = CropSpec::ratio(2, 1, CropPosition::Center);
        assert_eq!(
            calculate_crop_box(200, 100, &spec),
            CropBox::new(0, 0, 200, 100)
        );
    }

    #[test]
    fn test_exact_positions() {
        let cases = [
            (CropPosition::LeftCenter, CropBox::new(0, 25, 40, 75)),
            (CropPosition::Center, CropBox::new(30, 25, 70, 75)),
            (CropPosition::RightCenter, CropBox::new(60, 25, 100, 75)),
            (CropPosition::TopLeft, CropBox::new(0, 0, 40, 50)),
            (CropPosition::BottomRight, CropBox::new(60, 50, 100, 100)),
            (
                CropPosition::Custom { left: 10, top: 20 },
                CropBox::new(10, 20, 50, 70),
            ),
        ];
        for (position, expected) in cases {
            let spec = CropSpec::exact(40, 50, position);
            assert_eq!(calculate_crop_box(100, 100, &spec), expected, "{position:?}");
        }
    }

    #[test]
    fn test_exact_larger_than_source_clamps() {
        let spec = CropSpec::exact(5000, 5000, CropPosition::BottomRight);
        assert_eq!(
            calculate_crop_box(300, 200, &spec),
            CropBox::new(0, 0, 300, 200)
        );
    }

    #[test]
    fn test_custom_offset_bounded() {
        let spec = CropSpec::exact(40, 40, CropPosition::Custom { left: 90, top: 1000 });
        let b = calculate_crop_box(100, 100, &spec);
        assert_eq!(b, CropBox::new(60, 60, 100, 100));
    }

    #[test]
    fn test_zero_ratio_selects_full_source() {
        let spec = CropSpec::ratio(0, 9, CropPosition::Center);
        assert_eq!(
            calculate_crop_box(64, 32, &spec),
            CropBox::new(0, 0, 64, 32)
        );
    }

    #[test]
    fn test_extreme_ratio_keeps_minimum_pixel() {
        let spec = CropSpec::ratio(1, 1000, CropPosition::Center);
        let b = calculate_crop_box(100, 10, &spec);
        assert_eq!(b.width(), 1);
        assert_eq!(b.height(), 10);
        assert!(b.fits_within(100, 10));
    }

    #[test]
    fn test_zero_exact_size_becomes_one_pixel() {
        let spec = CropSpec::exact(0, 0, CropPosition::TopLeft);
        assert_eq!(calculate_crop_box(10, 10, &spec), CropBox::new(0, 0, 1, 1));
    }

    #[test]
    fn test_empty_source() {
        let spec = CropSpec::exact(10, 10, CropPosition::Center);
        assert_eq!(calculate_crop_box(0, 10, &spec), CropBox::new(0, 0, 0, 0));
    }

    #[test]
    fn test_clamp_to() {
        let b = CropBox::new(80, 90, 150, 300).clamp_to(100, 100);
        assert_eq!(b, CropBox::new(80, 90, 100, 100));

        let inverted = CropBox::new(50, 50, 10, 10).clamp_to(100, 100);
        assert_eq!(inverted.width(), 0);
        assert!(inverted.fits_within(100, 100));
    }

    #[test]
    fn test_apply_crop_pixels() {
        let img = test_image(10, 10);
        let out = apply_crop(&img, CropBox::new(3, 3, 7, 7));

        assert_eq!(out.dimensions(), (4, 4));
        // Value at (3, 3) = 3 * 10 + 3 = 33
        assert_eq!(out.to_rgb8().get_pixel(0, 0), &Rgb([33, 33, 33]));
    }

    #[test]
    fn test_apply_crop_full_is_identity() {
        let img = test_image(20, 12);
        let out = apply_crop(&img, CropBox::new(0, 0, 20, 12));
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_apply_crop_out_of_bounds_box() {
        let img = test_image(10, 10);
        let out = apply_crop(&img, CropBox::new(8, 8, 50, 50));
        assert_eq!(out.dimensions(), (2, 2));
    }

    #[test]
    fn test_parse_crop_size() {
        assert_eq!(
            "16:9".parse::<CropSize>(),
            Ok(CropSize::Ratio {
                width: 16,
                height: 9
            })
        );
        assert_eq!(
            "876x1237".parse::<CropSize>(),
            Ok(CropSize::Exact {
                width: 876,
                height: 1237
            })
        );
        assert!("16:0".parse::<CropSize>().is_err());
        assert!("wide".parse::<CropSize>().is_err());
    }

    #[test]
    fn test_parse_crop_position() {
        assert_eq!("2".parse::<CropPosition>(), Ok(CropPosition::Center));
        assert_eq!("left".parse::<CropPosition>(), Ok(CropPosition::LeftCenter));
        assert_eq!(
            "custom:12, 34".parse::<CropPosition>(),
            Ok(CropPosition::Custom { left: 12, top: 34 })
        );
        assert!("4".parse::<CropPosition>().is_err());
        assert!("middle".parse::<CropPosition>().is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn position_strategy() -> impl Strategy<Value = CropPosition> {
        prop_oneof![
            Just(CropPosition::LeftCenter),
            Just(CropPosition::Center),
            Just(CropPosition::RightCenter),
            Just(CropPosition::TopLeft),
            Just(CropPosition::BottomRight),
            (0u32..=5000, 0u32..=5000).prop_map(|(left, top)| CropPosition::Custom { left, top }),
        ]
    }

    fn size_strategy() -> impl Strategy<Value = CropSize> {
        prop_oneof![
            (0u32..=64, 0u32..=64).prop_map(|(width, height)| CropSize::Ratio { width, height }),
            (0u32..=5000, 0u32..=5000).prop_map(|(width, height)| CropSize::Exact { width, height }),
        ]
    }

    proptest! {
        /// Property: Every computed box lies inside the source.
        #[test]
        fn prop_box_within_source(
            (width, height) in (1u32..=4000, 1u32..=4000),
            size in size_strategy(),
            position in position_strategy(),
        ) {
            let b = calculate_crop_box(width, height, &CropSpec { size, position });
            prop_assert!(b.fits_within(width, height), "{b} outside {width}x{height}");
        }

        /// Property: Boxes are never empty for a non-empty source.
        #[test]
        fn prop_box_non_empty(
            (width, height) in (1u32..=4000, 1u32..=4000),
            size in size_strategy(),
            position in position_strategy(),
        ) {
            let b = calculate_crop_box(width, height, &CropSpec { size, position });
            prop_assert!(b.width() >= 1);
            prop_assert!(b.height() >= 1);
        }

        /// Property: Ratio boxes span one full source dimension.
        #[test]
        fn prop_ratio_spans_full_axis(
            (width, height) in (1u32..=4000, 1u32..=4000),
            (rw, rh) in (1u32..=32, 1u32..=32),
        ) {
            let b = calculate_crop_box(width, height, &CropSpec::ratio(rw, rh, CropPosition::Center));
            prop_assert!(b.width() == width || b.height() == height);
        }

        /// Property: Clamping any box keeps it inside the bounds.
        #[test]
        fn prop_clamp_contains(
            (width, height) in (0u32..=500, 0u32..=500),
            (l, t, r, btm) in (0u32..=1000, 0u32..=1000, 0u32..=1000, 0u32..=1000),
        ) {
            let clamped = CropBox::new(l, t, r, btm).clamp_to(width, height);
            prop_assert!(clamped.fits_within(width, height));
        }

        /// Property: Cropping is deterministic.
        #[test]
        fn prop_crop_is_deterministic(
            (width, height) in (4u32..=60, 4u32..=60),
            size in size_strategy(),
            position in position_strategy(),
        ) {
            let img = DynamicImage::new_rgb8(width, height);
            let b = calculate_crop_box(width, height, &CropSpec { size, position });
            let first = apply_crop(&img, b);
            let second = apply_crop(&img, b);

            prop_assert_eq!(first.width(), b.width());
            prop_assert_eq!(first.height(), b.height());
            prop_assert_eq!(first.as_bytes(), second.as_bytes());
        }
    }
}
