//! Image decoding and resampling for texprep.
//!
//! This module provides functionality for:
//! - Opening image files into an [`ImageAsset`] (format guessed from content)
//! - Stretch and letterbox resizing
//!
//! # Architecture
//!
//! Everything here is synchronous. Batch runs call into this module from a
//! single worker thread, one file at a time.
//!
//! # Examples
//!
//! ```ignore
//! use texprep_core::decode::open_image;
//!
//! let asset = open_image(Path::new("cards/img001.png")).unwrap();
//! println!("Decoded {}x{} image", asset.width(), asset.height());
//! ```

mod open;
mod resize;
mod types;

pub use open::{open_image, read_dimensions};
pub use resize::{apply_resize, letterbox, resize, ResizeSpec};
pub use types::{Color, DecodeError, FilterType, ImageAsset};
