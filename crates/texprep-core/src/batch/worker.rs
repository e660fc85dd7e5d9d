//! The single background thread a run executes on.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use thiserror::Error;

use super::ProgressEvent;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to start worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// Handle to a job running on its own thread.
///
/// The job receives the sending half of an unbounded channel; the handle
/// keeps the receiving half. Dropping the receiver early is harmless, the
/// job's sends just go nowhere.
pub struct Worker<T> {
    handle: JoinHandle<T>,
    events: Receiver<ProgressEvent>,
}

impl<T: Send + 'static> Worker<T> {
    pub fn spawn<F>(name: &str, job: F) -> Result<Self, BatchError>
    where
        F: FnOnce(Sender<ProgressEvent>) -> T + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = thread::Builder::new()
            .name(format!("texprep-{name}"))
            .spawn(move || job(tx))?;
        Ok(Self { handle, events: rx })
    }

    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    /// Wait up to `tick` for the next event.
    pub fn poll(&self, tick: Duration) -> Poll {
        match self.events.recv_timeout(tick) {
            Ok(event) => Poll::Event(event),
            Err(RecvTimeoutError::Timeout) => Poll::Idle,
            Err(RecvTimeoutError::Disconnected) => Poll::Done,
        }
    }

    /// Drain events until the job finishes, feeding each to `on_event`, then
    /// join the thread.
    pub fn drive<H>(self, tick: Duration, mut on_event: H) -> Result<T, BatchError>
    where
        H: FnMut(ProgressEvent),
    {
        loop {
            match self.poll(tick) {
                Poll::Event(event) => on_event(event),
                Poll::Idle => continue,
                Poll::Done => break,
            }
        }
        self.join()
    }

    pub fn join(self) -> Result<T, BatchError> {
        self.handle.join().map_err(|_| BatchError::WorkerPanicked)
    }
}

/// Result of one [`Worker::poll`] tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    Event(ProgressEvent),
    /// Nothing arrived during the tick.
    Idle,
    /// The job dropped its sender: it has returned or panicked.
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn test_worker_delivers_events_in_order() {
        let worker = Worker::spawn("test", |tx| {
            for i in 0..3 {
                tx.send(ProgressEvent::Note(format!("step {i}"))).unwrap();
            }
            42
        })
        .unwrap();

        let mut seen = Vec::new();
        let result = worker
            .drive(TICK, |event| {
                if let ProgressEvent::Note(text) = event {
                    seen.push(text);
                }
            })
            .unwrap();

        assert_eq!(result, 42);
        assert_eq!(seen, vec!["step 0", "step 1", "step 2"]);
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let worker = Worker::spawn("boom", |_tx| -> u32 { panic!("job failed") }).unwrap();
        assert!(matches!(
            worker.drive(TICK, |_| {}),
            Err(BatchError::WorkerPanicked)
        ));
    }

    #[test]
    fn test_poll_reports_done_after_job() {
        let worker = Worker::spawn("quiet", |_tx| ()).unwrap();
        // The sender is dropped when the job returns
        let mut polls = 0;
        while worker.poll(TICK) != Poll::Done {
            polls += 1;
            assert!(polls < 50, "worker never disconnected");
        }
        worker.join().unwrap();
    }
}
