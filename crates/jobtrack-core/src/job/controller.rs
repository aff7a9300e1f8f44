//! Job controller: owns one run at a time and exposes its state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::kind::JobKind;
use super::observer::{JobObserver, NoopObserver};
use super::progress::{ProgressMapping, ProgressTracker};
use super::run::Run;
use super::shared::Shared;
use super::source::{JobSubmitter, StatusEndpoint};
use super::state::JobState;

/// Tuning for one controller. Every field can be overridden independently.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Name used in the timeout message, e.g. "Resume tailoring".
    pub operation: String,
    /// Delay between successful polls (and before the first one).
    pub poll_interval: Duration,
    /// Wall-clock budget measured from `start`.
    pub max_poll_time: Duration,
    /// Maximum number of status requests per run.
    pub max_polls: u32,
    pub progress: ProgressMapping,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            operation: "Job".to_string(),
            poll_interval: Duration::from_millis(2000),
            max_poll_time: Duration::from_millis(420_000),
            max_polls: 60,
            progress: ProgressMapping::Verbatim,
        }
    }
}

impl ControllerConfig {
    pub fn for_kind(kind: JobKind) -> Self {
        Self {
            operation: kind.operation_name().to_string(),
            poll_interval: kind.default_poll_interval(),
            progress: kind.progress_mapping(),
            ..Self::default()
        }
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_poll_time(mut self, max: Duration) -> Self {
        self.max_poll_time = max;
        self
    }

    pub fn with_max_polls(mut self, max: u32) -> Self {
        self.max_polls = max;
        self
    }

    pub fn with_progress(mut self, progress: ProgressMapping) -> Self {
        self.progress = progress;
        self
    }

    pub fn timeout_message(&self) -> String {
        format!("{} timed out — please try again", self.operation)
    }
}

/// Tracks one backend job at a time.
///
/// `start` spawns a single tokio task per run; that task owns the only poll
/// timer, so at most one status request is ever in flight. `reset`, a new
/// `start`, or dropping the controller aborts the task and bumps the run
/// generation, so a late response can never touch the state of a newer run.
pub struct JobController<T> {
    config: ControllerConfig,
    endpoint: Arc<dyn StatusEndpoint<T>>,
    observer: Arc<dyn JobObserver<T>>,
    shared: Arc<Shared<T>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Clone + Send + Sync + 'static> JobController<T> {
    pub fn new(config: ControllerConfig, endpoint: Arc<dyn StatusEndpoint<T>>) -> Self {
        Self {
            config,
            endpoint,
            observer: Arc::new(NoopObserver),
            shared: Arc::new(Shared::new()),
            task: Mutex::new(None),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn JobObserver<T>>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Begin a new run, replacing any active one.
    ///
    /// The state is `Pending` when this returns; submission and polling
    /// continue on a spawned task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start<F>(&self, submitter: Arc<dyn JobSubmitter>, poll_url: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = task.take() {
            previous.abort();
        }
        let generation = self.shared.begin_run();
        tracing::debug!(generation, operation = %self.config.operation, "starting run");

        let run = Run {
            generation,
            config: self.config.clone(),
            shared: Arc::clone(&self.shared),
            observer: Arc::clone(&self.observer),
            endpoint: Arc::clone(&self.endpoint),
            submitter,
            poll_url: Arc::new(poll_url),
            started: Instant::now(),
            progress: ProgressTracker::new(self.config.progress),
        };
        *task = Some(tokio::spawn(run.execute()));
    }

    /// Cancel the active run (if any) and return to `Idle`. Safe to call at
    /// any time and any number of times.
    pub fn reset(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = task.take() {
            previous.abort();
        }
        if self.shared.reset() {
            tracing::debug!(operation = %self.config.operation, "run reset");
        }
    }

    pub fn state(&self) -> JobState<T> {
        self.shared.snapshot()
    }

    pub fn job_id(&self) -> Option<String> {
        self.shared.snapshot().job_id
    }

    pub fn is_loading(&self) -> bool {
        self.shared.snapshot().is_loading()
    }

    /// Receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<JobState<T>> {
        self.shared.subscribe()
    }

    /// Wait until the current run stops loading (terminal, or reset to idle).
    pub async fn wait_for_terminal(&self) -> JobState<T> {
        let mut rx = self.shared.subscribe();
        let state = match rx.wait_for(|s| !s.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.shared.snapshot(),
        };
        state
    }
}

impl<T> Drop for JobController<T> {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}
