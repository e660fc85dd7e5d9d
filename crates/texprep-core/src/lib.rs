//! texprep core - batch image preparation for texture mods
//!
//! This crate provides the file-level operations behind the `texprep`
//! tool: naturally ordered listings, in-place transforms with atomic
//! replacement, grid stitching, letterbox resizing, background compositing,
//! batch renaming, and the DDS texture replacement job.

pub mod batch;
pub mod composite;
pub mod config;
pub mod decode;
pub mod encode;
pub mod folders;
pub mod grid;
pub mod listing;
pub mod ops;
pub mod rename;
pub mod sort;
pub mod texture;
pub mod transform;

pub use batch::{BatchReport, FileError, ProgressEvent, Worker};
pub use composite::{CompositeError, CompositeSizes, Compositor};
pub use config::{Config, ConfigError};
pub use decode::{Color, DecodeError, FilterType, ImageAsset, ResizeSpec};
pub use encode::EncodeError;
pub use grid::{compose_grid, stitch, GridError, GridOutcome, GridSpec};
pub use listing::{list_files, list_images, Listing, ListingError};
pub use rename::{rename_all, NamingSequence, RenameError};
pub use sort::{natural_cmp, natural_sort_key};
pub use texture::{run_texture_job, SlotHash, Texconv, TextureConverter, TextureError, TextureJob};
pub use transform::{calculate_crop_box, CropBox, CropPosition, CropSize, CropSpec, Transform};
