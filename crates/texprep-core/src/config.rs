//! Configuration types.
//!
//! Every section falls back to its defaults, so a config file only needs
//! the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composite::CompositeSizes;
use crate::decode::{Color, ResizeSpec};
use crate::folders::DEFAULT_FOLDER_LIST;
use crate::listing::IMAGE_EXTENSIONS;
use crate::texture::{Texconv, TextureJob};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub images: ImagesConfig,
    pub resize: ResizeSpec,
    pub composite: CompositeConfig,
    pub grid: GridConfig,
    pub texture: TextureJob,
    pub texconv: Texconv,
    pub folders: FoldersConfig,
}

/// Which files the in-place operations pick up and how they are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Extensions without the leading dot, matched case-insensitively.
    pub extensions: Vec<String>,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            jpeg_quality: 95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Background image file. Its expected size is the flattened
    /// `background` key.
    #[serde(rename = "background_image")]
    pub background: PathBuf,
    #[serde(flatten)]
    pub sizes: CompositeSizes,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from("background.png"),
            sizes: CompositeSizes::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
    /// Color of placeholder cells.
    pub fill: Color,
    pub output: PathBuf,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            fill: Color::WHITE,
            output: PathBuf::from("stitchingOutput.jpg"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldersConfig {
    /// JSON file holding the remembered folders.
    pub list: PathBuf,
}

impl Default for FoldersConfig {
    fn default() -> Self {
        Self {
            list: PathBuf::from(DEFAULT_FOLDER_LIST),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a TOML file, creating parent directories as
    /// needed.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)
    }

    /// `jpeg_quality` clamped to the range encoders accept.
    pub fn quality(&self) -> u8 {
        self.images.jpeg_quality.clamp(1, 100)
    }
}
