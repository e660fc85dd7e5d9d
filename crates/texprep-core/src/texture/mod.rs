//! Texture replacement job.
//!
//! Takes a folder of reference textures (whose names carry the hash pairs
//! the game looks up) and a folder of replacement images, and produces
//! converted DDS textures plus the INI that wires them up:
//!
//! 1. read hash pairs from the reference names
//! 2. pair them 1:1 with the replacement images, both in name order
//! 3. flip each image and save it as PNG under `<output>/_temp`
//! 4. run the converter once over all prepared files
//! 5. write the INI for every `.dds` in the output folder
//!
//! The `_temp` folder is gone when [`run_texture_job`] returns, whatever
//! the outcome.

mod convert;
mod hashes;
mod ini;

pub use convert::{flip_to_png, Texconv, TextureConverter, DEFAULT_TEXCONV_ARGS};
pub use hashes::{collect_hash_pairs, HashPair, SlotHash, TEXTURE_FORMAT};
pub use ini::{collect_entries, render_ini, IniEntry};

use std::fs;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::batch::{BatchReport, ProgressEvent};
use crate::encode::{write_atomic, EncodeError};
use crate::listing::display_name;

/// Name of the scratch folder inside the output folder.
pub const TEMP_DIR_NAME: &str = "_temp";

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("slot hash must be 8 hexadecimal characters, got {0:?}")]
    InvalidSlotHash(String),

    #[error("no reference textures found in {}", .0.display())]
    NoHashPairs(PathBuf),

    #[error("image count does not match: {images} images, {pairs} reference textures")]
    CountMismatch { images: usize, pairs: usize },

    #[error("no image could be prepared for conversion")]
    NothingToConvert,

    #[error("failed to start converter {}: {source}", exe.display())]
    ConverterSpawn {
        exe: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("converter {} failed: {status}", exe.display())]
    ConverterFailed { exe: PathBuf, status: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write INI: {0}")]
    WriteIni(#[from] EncodeError),
}

/// Folders and files one job works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureJob {
    /// Reference textures named `{hash1}_{hash2}-R8G8B8A8_UNORM_SRGB.*`.
    pub reference_dir: PathBuf,
    /// Replacement images, one per reference texture.
    pub images_dir: PathBuf,
    pub output_dir: PathBuf,
    /// INI file name, written inside `output_dir`.
    pub ini_name: String,
}

impl Default for TextureJob {
    fn default() -> Self {
        Self {
            reference_dir: PathBuf::from("ddsInput"),
            images_dir: PathBuf::from("ddsImages"),
            output_dir: PathBuf::from("ddsOutput"),
            ini_name: "TextureMod.ini".to_string(),
        }
    }
}

impl TextureJob {
    pub fn temp_dir(&self) -> PathBuf {
        self.output_dir.join(TEMP_DIR_NAME)
    }

    pub fn ini_path(&self) -> PathBuf {
        self.output_dir.join(&self.ini_name)
    }
}

/// What a completed job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureReport {
    /// Outcome of the prepare step, one entry per replacement image.
    pub prepared: BatchReport,
    pub ini_path: PathBuf,
    /// Number of textures listed in the INI.
    pub entries: usize,
}

/// Run the whole job.
///
/// # Errors
///
/// Missing reference textures, a count mismatch, an invalid folder, or a
/// failed conversion stop the job. Images that fail to prepare are logged
/// and left out.
pub fn run_texture_job(
    job: &TextureJob,
    slot: &SlotHash,
    converter: &dyn TextureConverter,
    events: &Sender<ProgressEvent>,
) -> Result<TextureReport, TextureError> {
    let pairs = collect_hash_pairs(&job.reference_dir)?;
    if pairs.is_empty() {
        return Err(TextureError::NoHashPairs(job.reference_dir.clone()));
    }

    let mut images: Vec<PathBuf> = file_names(&job.images_dir)?
        .into_iter()
        .map(|name| job.images_dir.join(name))
        .collect();
    images.sort_by_cached_key(|p| display_name(p).to_lowercase());
    if images.len() != pairs.len() {
        return Err(TextureError::CountMismatch {
            images: images.len(),
            pairs: pairs.len(),
        });
    }
    info!("{} replacement images matched to reference textures", images.len());

    let temp = create_temp_dir(job)?;

    let mut report = BatchReport::new(images.len());
    let emit = |report: &mut BatchReport, event: ProgressEvent| {
        report.record(&event);
        let _ = events.send(event);
    };

    let mut prepared = Vec::with_capacity(images.len());
    for (source, pair) in images.iter().zip(&pairs) {
        let file = display_name(source);
        let dest = temp.path().join(pair.file_name("png"));
        emit(&mut report, ProgressEvent::Started { file: file.clone() });

        match flip_to_png(source, &dest) {
            Ok(()) => {
                info!("{file} -> {}", display_name(&dest));
                prepared.push(dest);
                emit(&mut report, ProgressEvent::Succeeded { file });
            }
            Err(e) => {
                error!("{file}: {e}");
                emit(
                    &mut report,
                    ProgressEvent::Failed {
                        file,
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    if prepared.is_empty() {
        return Err(TextureError::NothingToConvert);
    }

    let _ = events.send(ProgressEvent::Note(format!(
        "converting {} textures",
        prepared.len()
    )));
    converter.convert(&prepared, &job.output_dir)?;

    let entries = collect_entries(&job.output_dir)?;
    let ini_path = job.ini_path();
    write_atomic(&ini_path, render_ini(slot, &entries).as_bytes())?;
    info!("{} written with {} textures", ini_path.display(), entries.len());

    if let Err(e) = temp.close() {
        warn!("failed to remove temporary folder: {e}");
    }

    let _ = events.send(ProgressEvent::Finished(report));
    Ok(TextureReport {
        prepared: report,
        ini_path,
        entries: entries.len(),
    })
}

/// `<output>/_temp`, created fresh and removed when dropped.
fn create_temp_dir(job: &TextureJob) -> Result<tempfile::TempDir, TextureError> {
    fs::create_dir_all(&job.output_dir).map_err(io_error(&job.output_dir))?;

    let stale = job.temp_dir();
    if stale.exists() {
        warn!("removing leftover {}", stale.display());
        fs::remove_dir_all(&stale).map_err(io_error(&stale))?;
    }

    tempfile::Builder::new()
        .prefix(TEMP_DIR_NAME)
        .rand_bytes(0)
        .tempdir_in(&job.output_dir)
        .map_err(io_error(&stale))
}

/// Names of the regular files directly inside `dir`.
fn file_names(dir: &Path) -> Result<Vec<String>, TextureError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> TextureError {
    let path = path.to_path_buf();
    move |source| TextureError::Io { path, source }
}

fn sort_case_insensitive(names: &mut [String]) {
    names.sort_by_cached_key(|name| name.to_lowercase());
}
