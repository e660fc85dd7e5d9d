use anyhow::Context;
use texprep_core::texture::{run_texture_job, SlotHash, Texconv, TextureJob};
use tracing::info;

use super::{print_summary, with_progress};

pub fn run(job: TextureJob, slot: SlotHash, converter: Texconv) -> anyhow::Result<()> {
    info!(
        "texture job: {} + {} -> {} (slot {slot})",
        job.reference_dir.display(),
        job.images_dir.display(),
        job.output_dir.display()
    );

    let output = job.output_dir.clone();
    let report = with_progress("texture", None, move |events| {
        run_texture_job(&job, &slot, &converter, &events)
    })?
    .with_context(|| format!("texture job into {}", output.display()))?;

    print_summary(&report.prepared);
    println!(
        "{} written with {} textures",
        report.ini_path.display(),
        report.entries
    );
    Ok(())
}
