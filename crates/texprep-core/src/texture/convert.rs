//! Source preparation and the external DDS converter.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::TextureError;
use crate::batch::FileError;
use crate::decode::open_image;
use crate::encode::{encode_image, write_atomic};

/// Default converter arguments: sRGB, uncompressed RGBA8, overwrite, no mips.
pub const DEFAULT_TEXCONV_ARGS: &[&str] = &["-srgb", "-f", "R8G8B8A8_UNORM_SRGB", "-y", "-m", "1"];

/// Turns prepared PNG files into DDS textures in `out_dir`.
///
/// Implementations are called once per job with every prepared file.
pub trait TextureConverter {
    fn convert(&self, sources: &[PathBuf], out_dir: &Path) -> Result<(), TextureError>;
}

/// The `texconv` command line tool.
///
/// Invoked as `<exe> -o <out_dir> <args...> <sources...>`. Output files keep
/// the source stems with a `.dds` extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texconv {
    pub exe: PathBuf,
    pub args: Vec<String>,
}

impl Default for Texconv {
    fn default() -> Self {
        Self {
            exe: PathBuf::from("texconv.exe"),
            args: DEFAULT_TEXCONV_ARGS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Texconv {
    pub fn new(exe: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            exe: exe.into(),
            args,
        }
    }

    fn command(&self, sources: &[PathBuf], out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("-o").arg(out_dir).args(&self.args).args(sources);
        cmd
    }
}

impl TextureConverter for Texconv {
    fn convert(&self, sources: &[PathBuf], out_dir: &Path) -> Result<(), TextureError> {
        let mut cmd = self.command(sources, out_dir);
        debug!("running {cmd:?}");

        let status = cmd.status().map_err(|source| TextureError::ConverterSpawn {
            exe: self.exe.clone(),
            source,
        })?;
        if !status.success() {
            return Err(TextureError::ConverterFailed {
                exe: self.exe.clone(),
                status: status.to_string(),
            });
        }

        info!("converted {} textures into {}", sources.len(), out_dir.display());
        Ok(())
    }
}

/// Open `source`, flip it vertically and write it as an RGB PNG to `dest`.
///
/// DDS textures are stored bottom-up, hence the flip.
pub fn flip_to_png(source: &Path, dest: &Path) -> Result<(), FileError> {
    let asset = open_image(source)?;
    let flipped = image::DynamicImage::ImageRgb8(image::imageops::flip_vertical(
        &asset.image.to_rgb8(),
    ));
    let bytes = encode_image(&flipped, ImageFormat::Png, 100)?;
    write_atomic(dest, &bytes)?;
    Ok(())
}
