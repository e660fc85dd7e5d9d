use std::path::Path;

use anyhow::Context;
use texprep_core::{rename_all, NamingSequence};
use tracing::info;

use super::{print_summary, with_progress};

pub fn run(dir: &Path, sequence: NamingSequence) -> anyhow::Result<()> {
    info!(
        "renaming files in {} to {}",
        dir.display(),
        sequence.file_name("ext")
    );

    let owned_dir = dir.to_path_buf();
    let report = with_progress("rename", None, move |events| {
        rename_all(&owned_dir, sequence, &events)
    })?
    .with_context(|| format!("renaming in {}", dir.display()))?;

    print_summary(&report);
    Ok(())
}
