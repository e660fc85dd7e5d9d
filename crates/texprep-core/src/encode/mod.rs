//! Image encoding and safe on-disk replacement.
//!
//! This module provides functionality for:
//! - Choosing an output format from a file extension
//! - Encoding images (JPEG with configurable quality, everything else lossless)
//! - Writing through a temporary sibling file that is atomically renamed
//!   over the target
//!
//! # Examples
//!
//! ```ignore
//! use texprep_core::encode::{encode_image, write_atomic};
//!
//! let bytes = encode_image(&image, ImageFormat::Jpeg, 95).unwrap();
//! write_atomic(Path::new("cards/img001.jpg"), &bytes).unwrap();
//! ```

mod save;

pub use save::{
    encode_image, encode_image_with_exif, output_format, save_image, write_atomic, EncodeError,
};
