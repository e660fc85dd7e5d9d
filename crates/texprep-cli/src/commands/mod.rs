//! Subcommand implementations.
//!
//! Long-running work goes through [`with_progress`]: the job runs on the
//! worker thread and this thread only renders its events.

pub mod folders;
pub mod images;
pub mod rename;
pub mod stitch;
pub mod texture;

use std::time::Duration;

use crossbeam_channel::Sender;
use indicatif::{ProgressBar, ProgressStyle};
use texprep_core::{BatchReport, ProgressEvent, Worker};
use tracing::debug;

/// How often the event channel is polled.
const TICK: Duration = Duration::from_millis(100);

/// Run `job` on a worker thread, showing a progress bar over `total` files
/// (a spinner when the count is unknown).
pub fn with_progress<T, F>(name: &str, total: Option<usize>, job: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce(Sender<ProgressEvent>) -> T + Send + 'static,
{
    let bar = progress_bar(total);
    let worker = Worker::spawn(name, job)?;
    let result = worker.drive(TICK, |event| render(&bar, event));
    bar.finish_and_clear();
    Ok(result?)
}

fn progress_bar(total: Option<usize>) -> ProgressBar {
    let (bar, template) = match total {
        Some(total) => (
            ProgressBar::new(total as u64),
            "{spinner} [{bar:30}] {pos}/{len} {msg}",
        ),
        None => (ProgressBar::new_spinner(), "{spinner} {pos} done {msg}"),
    };
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.enable_steady_tick(TICK);
    bar
}

fn render(bar: &ProgressBar, event: ProgressEvent) {
    match event {
        ProgressEvent::Started { file } => bar.set_message(file),
        ProgressEvent::Succeeded { .. } => bar.inc(1),
        ProgressEvent::Failed { file, reason } => {
            bar.inc(1);
            bar.println(format!("failed: {file}: {reason}"));
        }
        ProgressEvent::Skipped { file } => debug!("not an input: {file}"),
        ProgressEvent::Note(text) => bar.set_message(text),
        ProgressEvent::Finished(_) => {}
    }
}

/// Print the result table for a finished run.
pub fn print_summary(report: &BatchReport) {
    println!();
    print!("{report}");
}
