//! Directory listing with extension filtering and natural ordering.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::sort::sort_naturally_by;

/// Extensions handled by the in-place image operations.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "webp"];

/// Extensions picked up by batch rename (includes already-converted textures).
pub const RENAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "dds"];

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("input folder does not exist or is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Files of one directory, split by whether they matched the extension filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Matching files in natural order.
    pub files: Vec<PathBuf>,
    /// Regular files that did not match, in natural order.
    pub skipped: Vec<PathBuf>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Drop `path` from the matching files, comparing canonical paths.
    /// Returns true if it was listed.
    pub fn exclude(&mut self, path: &Path) -> bool {
        let Ok(target) = path.canonicalize() else {
            return false;
        };
        let before = self.files.len();
        self.files
            .retain(|f| f.canonicalize().map(|f| f != target).unwrap_or(true));
        self.files.len() != before
    }
}

/// True if `path` has one of `extensions` (compared case-insensitively,
/// without the leading dot).
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|allowed| allowed.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// List the regular files directly inside `dir`, keeping those whose
/// extension is in `extensions`. Subdirectories are ignored.
///
/// # Errors
///
/// Fails if `dir` is not a directory or cannot be read. Individual entries
/// that cannot be inspected are skipped.
pub fn list_files<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Listing, ListingError> {
    if !dir.is_dir() {
        return Err(ListingError::NotADirectory(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|source| ListingError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut listing = Listing::default();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if has_extension(&path, extensions) {
            listing.files.push(path);
        } else {
            listing.skipped.push(path);
        }
    }

    sort_naturally_by(&mut listing.files, file_name_key);
    sort_naturally_by(&mut listing.skipped, file_name_key);
    Ok(listing)
}

/// Shorthand for [`list_files`] with [`IMAGE_EXTENSIONS`].
pub fn list_images(dir: &Path) -> Result<Listing, ListingError> {
    list_files(dir, IMAGE_EXTENSIONS)
}

pub(crate) fn file_name_key(path: &PathBuf) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name of `path` for log lines.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
