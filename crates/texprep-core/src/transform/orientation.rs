//! Lossless quarter-turn rotations and mirror flips.

use std::fmt;
use std::str::FromStr;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// One of the fixed geometric operations a batch can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transform {
    /// Rotate 90 degrees counter-clockwise.
    Rotate90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees counter-clockwise (90 clockwise).
    Rotate270,
    /// Mirror left to right.
    FlipHorizontal,
    /// Mirror top to bottom.
    FlipVertical,
}

impl Transform {
    pub const ALL: [Transform; 5] = [
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::Rotate270,
        Transform::FlipHorizontal,
        Transform::FlipVertical,
    ];

    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Transform::Rotate90 => "rotate90",
            Transform::Rotate180 => "rotate180",
            Transform::Rotate270 => "rotate270",
            Transform::FlipHorizontal => "flip-horizontal",
            Transform::FlipVertical => "flip-vertical",
        }
    }

    /// Returns true if this operation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Transform::Rotate90 | Transform::Rotate270)
    }

    /// The operation that undoes this one.
    pub fn inverse(self) -> Transform {
        match self {
            Transform::Rotate90 => Transform::Rotate270,
            Transform::Rotate270 => Transform::Rotate90,
            other => other,
        }
    }

    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            // `image` turns clockwise
            Transform::Rotate90 => image.rotate270(),
            Transform::Rotate180 => image.rotate180(),
            Transform::Rotate270 => image.rotate90(),
            Transform::FlipHorizontal => image.fliph(),
            Transform::FlipVertical => image.flipv(),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "rotate90" | "rotate-90" | "ccw90" | "90" => Ok(Transform::Rotate90),
            "rotate180" | "rotate-180" | "180" => Ok(Transform::Rotate180),
            "rotate270" | "rotate-270" | "cw90" | "270" => Ok(Transform::Rotate270),
            "flip-horizontal" | "fliph" | "mirror" => Ok(Transform::FlipHorizontal),
            "flip-vertical" | "flipv" => Ok(Transform::FlipVertical),
            other => Err(format!(
                "unknown operation '{other}' (expected one of: {})",
                Transform::ALL.map(Transform::name).join(", ")
            )),
        }
    }
}
