//! Batch execution: per-file in-place processing, progress events and the
//! background worker.
//!
//! # Architecture
//!
//! A run has exactly one worker thread. It owns every file handle and image
//! buffer, processes files one at a time, and reports what happened through
//! a channel of [`ProgressEvent`]s. The front end only reads that channel.
//!
//! ```text
//!  front end                      worker thread
//!  ---------                      -------------
//!  Worker::spawn(job) ─────────▶  job(events)
//!                                   for each file:
//!  events.recv_timeout(tick) ◀──      Started / Succeeded / Failed
//!  ...                              Finished(report)
//!  worker.join() ◀───────────────  returns T
//! ```
//!
//! Per-file failures never abort a run; they are counted in the
//! [`BatchReport`] and the next file is processed.

mod executor;
mod report;
mod worker;

pub use executor::{process_in_place, run_in_place, FileError};
pub use report::{BatchReport, ProgressEvent, SummaryRow};
pub use worker::{BatchError, Poll, Worker};
