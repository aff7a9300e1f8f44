//! Caller-facing notifications for a run.

/// Receives progress and terminal events for each run.
///
/// At most one `on_progress` per poll and exactly one of `on_complete` /
/// `on_error` per run that reaches a terminal state. Calls happen on the
/// controller's task, outside its state lock, and are skipped once the run
/// has been reset or superseded. A `reset` racing from another thread can
/// still land while a callback is already executing.
pub trait JobObserver<T>: Send + Sync {
    fn on_progress(&self, _progress: u8, _message: Option<&str>) {}

    fn on_complete(&self, _result: Option<&T>) {}

    fn on_error(&self, _message: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl<T> JobObserver<T> for NoopObserver {}
