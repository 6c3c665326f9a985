//! Background workers for blocking backend calls.
//!
//! Each job runs on its own thread and reports exactly once over an `mpsc`
//! channel. The UI polls the handle every frame; dropping the handle
//! cancels the job from the UI's point of view (its result is discarded).

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// What a poll observed.
#[derive(Debug)]
pub enum WorkerOutcome<T> {
    /// Job returned a value
    Finished(T),
    /// Job panicked; the message is for logs only
    Crashed(String),
    /// Deadline passed before the job reported
    TimedOut,
}

/// Handle to a running job.
pub struct WorkerHandle<T> {
    label: &'static str,
    rx: Receiver<Result<T, String>>,
    started: Instant,
    timeout: Duration,
    _handle: JoinHandle<()>,
}

impl<T> WorkerHandle<T> {
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Non-blocking check for completion or timeout.
    pub fn poll(&self) -> Option<WorkerOutcome<T>> {
        match self.rx.try_recv() {
            Ok(Ok(value)) => Some(WorkerOutcome::Finished(value)),
            Ok(Err(message)) => Some(WorkerOutcome::Crashed(message)),
            Err(TryRecvError::Disconnected) => {
                Some(WorkerOutcome::Crashed("worker exited without reporting".to_string()))
            }
            Err(TryRecvError::Empty) if self.elapsed() >= self.timeout => {
                tracing::warn!("{} timed out after {:?}", self.label, self.timeout);
                Some(WorkerOutcome::TimedOut)
            }
            Err(TryRecvError::Empty) => None,
        }
    }
}

pub struct Worker;

impl Worker {
    /// Run `job` on a background thread with a UI-side deadline.
    pub fn spawn<T, F>(label: &'static str, timeout: Duration, job: F) -> WorkerHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        tracing::debug!("Spawning {}", label);

        let handle = thread::spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(job)).map_err(|payload| {
                payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string())
            });
            if let Err(message) = &outcome {
                tracing::error!("{} panicked: {}", label, message);
            }
            // Receiver gone means the UI cancelled; nothing to do.
            let _ = tx.send(outcome);
        });

        WorkerHandle {
            label,
            rx,
            started: Instant::now(),
            timeout,
            _handle: handle,
        }
    }
}
