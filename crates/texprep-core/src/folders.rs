//! Remembered working folders and bulk clearing of their contents.
//!
//! The list is stored as a pretty-printed JSON array of paths.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_FOLDER_LIST: &str = "clear_config.json";

#[derive(Debug, Error)]
pub enum FolderError {
    #[error("failed to read folder list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("folder list {} is not a JSON array of paths: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write folder list {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize folder list: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderList {
    folders: Vec<PathBuf>,
}

impl FolderList {
    /// Load the list at `path`. A missing file is an empty list.
    pub fn load(path: &Path) -> Result<Self, FolderError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(FolderError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| FolderError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), FolderError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n").map_err(|source| FolderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Add `folder` in normalized form. Returns false if it was already
    /// listed.
    pub fn add(&mut self, folder: &Path) -> bool {
        let folder = normalize(folder);
        if self.folders.contains(&folder) {
            return false;
        }
        self.folders.push(folder);
        true
    }

    /// Remove every listed entry equal to one of `folders` after
    /// normalization. Returns how many were removed.
    pub fn remove<P: AsRef<Path>>(&mut self, folders: &[P]) -> usize {
        let targets: Vec<PathBuf> = folders.iter().map(|f| normalize(f.as_ref())).collect();
        let before = self.folders.len();
        self.folders.retain(|f| !targets.contains(f));
        before - self.folders.len()
    }

    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

/// Lexical normalization: drops `.` components and resolves `..` against
/// preceding normal components. The filesystem is not consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Outcome of [`clear_folders`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Folders whose listing could be read. Some entries may still have
    /// failed; see `failed`.
    pub cleared: Vec<PathBuf>,
    /// Paths that could not be removed, or folders that could not be read,
    /// with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Delete everything inside each folder, keeping the folders themselves.
///
/// Failures are collected and never stop the run.
pub fn clear_folders(folders: &[PathBuf]) -> ClearReport {
    let mut report = ClearReport::default();

    for folder in folders {
        let entries = match fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot read {}: {e}", folder.display());
                report.failed.push((folder.clone(), e.to_string()));
                continue;
            }
        };

        let mut removed = 0usize;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.failed.push((folder.clone(), e.to_string()));
                    continue;
                }
            };
            let path = entry.path();
            // Symlinks are removed, never followed
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let result = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!("cannot remove {}: {e}", path.display());
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        info!("cleared {} ({removed} entries)", folder.display());
        report.cleared.push(folder.clone());
    }

    report
}
