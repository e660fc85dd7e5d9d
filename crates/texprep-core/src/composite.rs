//! Background compositor: center each foreground on a fixed background and
//! replace the foreground file with the result.

use std::path::Path;

use crossbeam_channel::Sender;
use image::{imageops, DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::batch::{run_in_place, BatchReport, FileError, ProgressEvent};
use crate::decode::{open_image, DecodeError};
use crate::listing::Listing;

#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("failed to open background: {0}")]
    Background(#[from] DecodeError),

    #[error("background is {}x{}, expected {}x{}", actual.0, actual.1, expected.0, expected.1)]
    BackgroundSize {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("foreground size {}x{} does not fit in background {}x{}", foreground.0, foreground.1, background.0, background.1)]
    ForegroundTooLarge {
        foreground: (u32, u32),
        background: (u32, u32),
    },
}

/// Expected `(width, height)` of both layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeSizes {
    pub background: (u32, u32),
    pub foreground: (u32, u32),
}

impl Default for CompositeSizes {
    fn default() -> Self {
        Self {
            background: (904, 1260),
            foreground: (876, 1237),
        }
    }
}

/// A validated background, ready to receive foregrounds.
#[derive(Debug, Clone)]
pub struct Compositor {
    background: RgbaImage,
    foreground: (u32, u32),
    offset: (u32, u32),
}

impl Compositor {
    /// Validate `background` against `sizes`.
    ///
    /// # Errors
    ///
    /// The background must be exactly `sizes.background` and the foreground
    /// size must fit inside it.
    pub fn new(background: &DynamicImage, sizes: CompositeSizes) -> Result<Self, CompositeError> {
        let actual = (background.width(), background.height());
        if actual != sizes.background {
            return Err(CompositeError::BackgroundSize {
                expected: sizes.background,
                actual,
            });
        }

        let (bg_w, bg_h) = sizes.background;
        let (fg_w, fg_h) = sizes.foreground;
        if fg_w > bg_w || fg_h > bg_h {
            return Err(CompositeError::ForegroundTooLarge {
                foreground: sizes.foreground,
                background: sizes.background,
            });
        }

        Ok(Self {
            background: background.to_rgba8(),
            foreground: sizes.foreground,
            offset: ((bg_w - fg_w) / 2, (bg_h - fg_h) / 2),
        })
    }

    pub fn from_path(path: &Path, sizes: CompositeSizes) -> Result<Self, CompositeError> {
        let asset = open_image(path)?;
        let compositor = Self::new(&asset.image, sizes)?;
        info!(
            "background {} accepted ({}x{})",
            asset.display_name(),
            asset.width(),
            asset.height()
        );
        Ok(compositor)
    }

    /// Where the foreground's top-left corner lands.
    pub fn offset(&self) -> (u32, u32) {
        self.offset
    }

    /// Alpha-blend `foreground` onto a copy of the background. The result
    /// is RGB.
    pub fn compose(&self, foreground: &DynamicImage) -> Result<DynamicImage, FileError> {
        let actual = (foreground.width(), foreground.height());
        if actual != self.foreground {
            return Err(FileError::Rejected(format!(
                "foreground is {}x{}, expected {}x{}",
                actual.0, actual.1, self.foreground.0, self.foreground.1
            )));
        }

        let mut canvas = self.background.clone();
        imageops::overlay(
            &mut canvas,
            &foreground.to_rgba8(),
            i64::from(self.offset.0),
            i64::from(self.offset.1),
        );
        Ok(DynamicImage::ImageRgb8(
            DynamicImage::ImageRgba8(canvas).into_rgb8(),
        ))
    }

    /// Composite every file of `listing` in place.
    pub fn run(
        &self,
        listing: &Listing,
        quality: u8,
        events: &Sender<ProgressEvent>,
    ) -> BatchReport {
        run_in_place(listing, quality, events, |asset| self.compose(&asset.image))
    }
}
