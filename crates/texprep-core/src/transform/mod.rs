//! Geometric image operations: quarter-turn rotations, flips and cropping.
//!
//! Each operation takes a decoded image and returns a new one; none of them
//! touch the filesystem. The batch executor decides where results go.
//!
//! # Coordinate System
//!
//! - Rotations are counter-clockwise, in quarter turns
//! - Crop boxes are in pixels as `(left, top, right, bottom)`, right/bottom exclusive
//! - Origin is top-left corner

mod crop;
mod orientation;

pub use crop::{apply_crop, calculate_crop_box, CropBox, CropPosition, CropSize, CropSpec};
pub use orientation::Transform;
