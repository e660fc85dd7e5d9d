//! Sequential batch rename.

use std::fs;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::batch::{BatchReport, ProgressEvent};
use crate::listing::{display_name, list_files, ListingError, RENAME_EXTENSIONS};

#[derive(Debug, Error)]
pub enum RenameError {
    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error("{} already exists", .0.display())]
    TargetExists(PathBuf),

    #[error("numbering ran out after {0}")]
    SequenceExhausted(u32),

    #[error("failed to rename {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Produces `{prefix}{number}{suffix}{extension}` names.
///
/// The number is zero padded to `width` digits and only advances when a
/// rename succeeds, so the output has no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingSequence {
    pub prefix: String,
    pub suffix: String,
    pub width: usize,
    pub next: u32,
}

impl Default for NamingSequence {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            width: 3,
            next: 0,
        }
    }
}

impl NamingSequence {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            ..Self::default()
        }
    }

    /// Name for the next file. `extension` is appended with a dot, in its
    /// original case; an empty extension adds nothing.
    pub fn file_name(&self, extension: &str) -> String {
        let mut name = format!(
            "{}{:0width$}{}",
            self.prefix,
            self.next,
            self.suffix,
            width = self.width
        );
        if !extension.is_empty() {
            name.push('.');
            name.push_str(extension);
        }
        name
    }

    /// Move to the next number.
    ///
    /// # Errors
    ///
    /// Fails without changing the sequence once `next` is `u32::MAX`.
    pub fn advance(&mut self) -> Result<(), RenameError> {
        self.next = self
            .next
            .checked_add(1)
            .ok_or(RenameError::SequenceExhausted(self.next))?;
        Ok(())
    }
}

/// Rename one file to the sequence's next name, advancing on success.
///
/// A file that already carries its target name is left alone and counts as
/// renamed. Any other existing file at the target is never overwritten. The
/// last number a `u32` can hold is never handed out, so a file is only
/// renamed when the sequence can still advance.
pub fn rename_next(path: &Path, sequence: &mut NamingSequence) -> Result<PathBuf, RenameError> {
    let mut following = sequence.clone();
    following.advance()?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let target = path.with_file_name(sequence.file_name(extension));

    if target != path {
        if target.exists() {
            return Err(RenameError::TargetExists(target));
        }
        fs::rename(path, &target).map_err(|source| RenameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    *sequence = following;
    Ok(target)
}

/// Rename every image-like file in `dir`, in natural order.
///
/// Per-file failures are reported and do not stop the run.
pub fn rename_all(
    dir: &Path,
    mut sequence: NamingSequence,
    events: &Sender<ProgressEvent>,
) -> Result<BatchReport, RenameError> {
    let listing = list_files(dir, RENAME_EXTENSIONS)?;
    let mut report = BatchReport::new(listing.files.len());
    let emit = |report: &mut BatchReport, event: ProgressEvent| {
        report.record(&event);
        let _ = events.send(event);
    };

    for path in &listing.skipped {
        emit(&mut report, ProgressEvent::Skipped { file: display_name(path) });
    }

    for path in &listing.files {
        let file = display_name(path);
        emit(&mut report, ProgressEvent::Started { file: file.clone() });

        match rename_next(path, &mut sequence) {
            Ok(target) => {
                info!("{file} -> {}", display_name(&target));
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

    let _ = events.send(ProgressEvent::Finished(report));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_file_name_format() {
        let mut seq = NamingSequence::new("skin_", "_v2");
        assert_eq!(seq.file_name("png"), "skin_000_v2.png");
        seq.next = 42;
        assert_eq!(seq.file_name("DDS"), "skin_042_v2.DDS");
        seq.next = 1234;
        assert_eq!(seq.file_name(""), "skin_1234_v2");
    }

    #[test]
    fn test_sequence_exhausted_fails_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.png", "a");
        touch(dir.path(), "b.png", "b");

        let mut seq = NamingSequence::new("n", "");
        seq.next = u32::MAX - 1;
        let (tx, _rx) = crossbeam_channel::unbounded();
        let report = rename_all(dir.path(), seq, &tx).unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(
            names(dir.path()),
            vec!["b.png".to_string(), format!("n{}.png", u32::MAX - 1)]
        );
    }

    #[test]
    fn test_advance_checked() {
        let mut seq = NamingSequence::default();
        seq.next = u32::MAX;
        assert!(matches!(seq.advance(), Err(RenameError::SequenceExhausted(u32::MAX))));
        assert_eq!(seq.next, u32::MAX);
    }

    #[test]
    fn test_rename_all_natural_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "img10.png", "ten");
        touch(dir.path(), "img2.jpg", "two");
        touch(dir.path(), "img1.dds", "one");
        touch(dir.path(), "notes.txt", "skip");

        let (tx, _rx) = crossbeam_channel::unbounded();
        let report = rename_all(dir.path(), NamingSequence::new("a", "b"), &tx).unwrap();

        assert_eq!(report.succeeded, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            names(dir.path()),
            vec!["a000b.dds", "a001b.jpg", "a002b.png", "notes.txt"]
        );
        assert_eq!(fs::read_to_string(dir.path().join("a002b.png")).unwrap(), "ten");
    }

    #[test]
    fn test_already_named_file_keeps_its_number() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "x.png", "x");
        touch(dir.path(), "y.png", "y");
        touch(dir.path(), "000.jpg", "keep");

        let (tx, _rx) = crossbeam_channel::unbounded();
        let report = rename_all(dir.path(), NamingSequence::default(), &tx).unwrap();

        // "000.jpg" sorts first and keeps its own name, so the numbering
        // continues at 001 for the other files
        assert_eq!(report.failed, 0);
        assert_eq!(names(dir.path()), vec!["000.jpg", "001.png", "002.png"]);
        assert_eq!(fs::read_to_string(dir.path().join("000.jpg")).unwrap(), "keep");
    }

    #[test]
    fn test_collision_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.png", "b");
        touch(dir.path(), "z000.png", "occupied");

        let mut seq = NamingSequence::new("z", "");
        let err = rename_next(&dir.path().join("b.png"), &mut seq).unwrap_err();

        assert!(matches!(err, RenameError::TargetExists(_)));
        assert_eq!(seq.next, 0);
        assert_eq!(fs::read_to_string(dir.path().join("z000.png")).unwrap(), "occupied");
        assert!(dir.path().join("b.png").exists());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = crossbeam_channel::unbounded();
        let result = rename_all(&dir.path().join("nope"), NamingSequence::default(), &tx);
        assert!(matches!(result, Err(RenameError::Listing(_))));
    }
}
