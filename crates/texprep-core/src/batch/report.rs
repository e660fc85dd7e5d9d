//! Progress events and run counters.

use std::fmt;

/// What the worker tells the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A file is about to be processed.
    Started { file: String },
    /// A file was written successfully.
    Succeeded { file: String },
    /// A file was not an input for this run.
    Skipped { file: String },
    /// A file failed; the run continues.
    Failed { file: String, reason: String },
    /// Free-form status line (grid placement, conversion steps, ...).
    Note(String),
    /// The run is over.
    Finished(BatchReport),
}

/// Running success / failure / skip counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of input files the run was started with.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub count: usize,
    /// Share of `total`, in percent.
    pub percent: f64,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Update the counters from an event. Events that are not outcomes are
    /// ignored.
    pub fn record(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Succeeded { .. } => self.succeeded += 1,
            ProgressEvent::Failed { .. } => self.failed += 1,
            ProgressEvent::Skipped { .. } => self.skipped += 1,
            _ => {}
        }
    }

    /// Files that finished, successfully or not.
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        let percent = |count: usize| {
            if self.total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / self.total as f64
            }
        };
        vec![
            SummaryRow {
                label: "succeeded",
                count: self.succeeded,
                percent: percent(self.succeeded),
            },
            SummaryRow {
                label: "failed",
                count: self.failed,
                percent: percent(self.failed),
            },
            SummaryRow {
                label: "skipped",
                count: self.skipped,
                percent: percent(self.skipped),
            },
            SummaryRow {
                label: "total",
                count: self.total,
                percent: 100.0,
            },
        ]
    }
}

/// Tab-separated summary table, suitable for pasting into a spreadsheet.
impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "result\tcount\tshare")?;
        for row in self.summary_rows() {
            writeln!(f, "{}\t{}\t{:.1}%", row.label, row.count, row.percent)?;
        }
        Ok(())
    }
}
