//! State shared between a controller and its run task.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use super::state::JobState;

struct Inner<T> {
    generation: u64,
    state: JobState<T>,
}

/// The job state plus the generation of the run allowed to mutate it.
///
/// Every mutation goes through [`Shared::update`], which rejects writes from a
/// run whose generation is no longer current. The lock is never held across
/// an await point.
pub(super) struct Shared<T> {
    inner: Mutex<Inner<T>>,
    tx: watch::Sender<JobState<T>>,
}

impl<T: Clone> Shared<T> {
    pub(super) fn new() -> Self {
        let (tx, _rx) = watch::channel(JobState::idle());
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                state: JobState::idle(),
            }),
            tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner<T>) {
        self.tx.send_replace(inner.state.clone());
    }

    /// Invalidate the previous run and enter `Pending`. Returns the new generation.
    pub(super) fn begin_run(&self) -> u64 {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = JobState::pending();
        self.publish(&inner);
        inner.generation
    }

    /// Invalidate any run and return to `Idle`. Returns false if already idle.
    pub(super) fn reset(&self) -> bool {
        let mut inner = self.lock();
        inner.generation += 1;
        if inner.state.is_pristine() {
            return false;
        }
        inner.state = JobState::idle();
        self.publish(&inner);
        true
    }

    /// Apply `f` if `generation` is still current; `None` means the write was stale.
    pub(super) fn update<R>(
        &self,
        generation: u64,
        f: impl FnOnce(&mut JobState<T>) -> R,
    ) -> Option<R> {
        let mut inner = self.lock();
        if inner.generation != generation {
            return None;
        }
        let out = f(&mut inner.state);
        self.publish(&inner);
        Some(out)
    }

    pub(super) fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    pub(super) fn snapshot(&self) -> JobState<T> {
        self.lock().state.clone()
    }

    pub(super) fn subscribe(&self) -> watch::Receiver<JobState<T>> {
        self.tx.subscribe()
    }
}
