//! Core types for image decoding.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{ColorType, DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format: {0}")]
    InvalidFormat(String),

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Requested output dimensions are unusable.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(FilterType::Nearest),
            "bilinear" | "triangle" => Ok(FilterType::Bilinear),
            "lanczos" | "lanczos3" => Ok(FilterType::Lanczos3),
            other => Err(format!("unknown resampling filter '{other}'")),
        }
    }
}

/// An opaque RGB fill color, used for letterbox bands and grid placeholders.
///
/// Serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0]);

    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb(self.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Parses `#rrggbb`, `rrggbb` or `r,g,b`.
impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(format!("expected three components in '{s}'"));
            }
            let mut rgb = [0u8; 3];
            for (slot, part) in rgb.iter_mut().zip(&parts) {
                *slot = part
                    .parse()
                    .map_err(|_| format!("'{part}' is not a value between 0 and 255"))?;
            }
            return Ok(Color(rgb));
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("'{s}' is not a #rrggbb color"));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Color([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A decoded image together with where it came from.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    /// File the image was read from.
    pub path: PathBuf,
    /// Container format detected while decoding, if any.
    pub format: Option<ImageFormat>,
    /// Decoded pixels.
    pub image: DynamicImage,
    /// Raw EXIF block of the source, written back on in-place rewrites.
    pub exif: Option<Vec<u8>>,
}

impl ImageAsset {
    pub fn new(path: impl Into<PathBuf>, format: Option<ImageFormat>, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            format,
            image,
            exif: None,
        }
    }

    pub fn with_exif(mut self, exif: Option<Vec<u8>>) -> Self {
        self.exif = exif;
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Pixel layout of the decoded buffer (e.g. `Rgb8`, `Rgba8`, `L8`).
    pub fn color_mode(&self) -> ColorType {
        self.image.color()
    }

    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for log lines, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_filter_type_parse() {
        assert_eq!("Lanczos".parse::<FilterType>(), Ok(FilterType::Lanczos3));
        assert_eq!("triangle".parse::<FilterType>(), Ok(FilterType::Bilinear));
        assert!("cubic".parse::<FilterType>().is_err());
        assert_eq!(FilterType::default(), FilterType::Lanczos3);
    }

    #[test]
    fn test_color_parse_hex() {
        assert_eq!("#ff8000".parse::<Color>(), Ok(Color([255, 128, 0])));
        assert_eq!("00FF00".parse::<Color>(), Ok(Color([0, 255, 0])));
        assert!("#fff".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_parse_components() {
        assert_eq!("10, 20, 30".parse::<Color>(), Ok(Color([10, 20, 30])));
        assert!("10,20".parse::<Color>().is_err());
        assert!("10,20,300".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_display_round_trip() {
        let c = Color([1, 171, 255]);
        assert_eq!(c.to_string(), "#01abff");
        assert_eq!(c.to_string().parse::<Color>(), Ok(c));
    }

    #[test]
    fn test_color_serde_as_string() {
        assert_eq!(serde_json::to_string(&Color::WHITE).unwrap(), "\"#ffffff\"");
        let c: Color = serde_json::from_str("\"0,0,255\"").unwrap();
        assert_eq!(c, Color([0, 0, 255]));
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }

    #[test]
    fn test_asset_accessors() {
        let img = DynamicImage::new_rgba8(40, 20);
        let asset = ImageAsset::new("/tmp/cards/a.png", Some(ImageFormat::Png), img);

        assert_eq!(asset.dimensions(), (40, 20));
        assert_eq!(asset.color_mode(), ColorType::Rgba8);
        assert!(asset.has_alpha());
        assert_eq!(asset.display_name(), "a.png");
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::InvalidDimensions {
            width: 0,
            height: 10,
        };
        assert_eq!(err.to_string(), "Invalid dimensions: 0x10");

        let err = DecodeError::IoError("missing".to_string());
        assert_eq!(err.to_string(), "I/O error: missing");
    }
}
