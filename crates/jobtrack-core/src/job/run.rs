//! One run: submit, then poll on a single timer chain until a terminal state.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::controller::ControllerConfig;
use super::observer::JobObserver;
use super::progress::ProgressTracker;
use super::shared::Shared;
use super::source::{JobSubmitter, PollUrlBuilder, StatusEndpoint};
use super::state::{JobState, JobStatus};
use super::wire::{PollResponse, RemoteStatus, StatusSnapshot};
use crate::retry::{classify_error, classify_exception, ClassifiedError, RetryDecision};

const DEFAULT_SUBMIT_ERROR: &str = "Failed to submit job";
const DEFAULT_REMOTE_ERROR: &str = "Operation failed";

enum Step {
    Next(Duration),
    Done,
}

pub(super) struct Run<T> {
    pub(super) generation: u64,
    pub(super) config: ControllerConfig,
    pub(super) shared: Arc<Shared<T>>,
    pub(super) observer: Arc<dyn JobObserver<T>>,
    pub(super) endpoint: Arc<dyn StatusEndpoint<T>>,
    pub(super) submitter: Arc<dyn JobSubmitter>,
    pub(super) poll_url: PollUrlBuilder,
    pub(super) started: Instant,
    pub(super) progress: ProgressTracker,
}

impl<T: Clone + Send + Sync + 'static> Run<T> {
    pub(super) async fn execute(mut self) {
        let Some(job_id) = self.submit().await else {
            return;
        };
        let url = (self.poll_url)(&job_id);
        let mut delay = self.config.poll_interval;
        let mut polls: u32 = 0;

        loop {
            tokio::time::sleep(self.within_budget(delay)).await;
            if !self.shared.is_current(self.generation) {
                return;
            }

            polls += 1;
            let elapsed = self.started.elapsed();
            if polls > self.config.max_polls || elapsed >= self.config.max_poll_time {
                tracing::warn!(
                    job_id = %job_id,
                    generation = self.generation,
                    polls = polls - 1,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "polling bounds exceeded"
                );
                self.fail(&self.config.timeout_message());
                return;
            }

            tracing::debug!(job_id = %job_id, poll = polls, "polling status");
            let step = match self.endpoint.fetch(&url).await {
                Ok(PollResponse::Ok(snapshot)) => self.apply_snapshot(snapshot),
                Ok(PollResponse::Failed {
                    status,
                    error,
                    retry_after,
                }) => {
                    let message = non_blank(error)
                        .unwrap_or_else(|| format!("Status request failed (HTTP {status})"));
                    let classified = classify_error(status, &message, retry_after.as_deref());
                    self.on_failure(classified, polls)
                }
                Err(err) => self.on_failure(classify_exception(&err), polls),
            };

            match step {
                Step::Next(next) => delay = next,
                Step::Done => return,
            }
        }
    }

    async fn submit(&mut self) -> Option<String> {
        let response = match self.submitter.submit().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(generation = self.generation, error = %err, "job submission failed");
                let message = non_blank(Some(err.message));
                self.fail(message.as_deref().unwrap_or(DEFAULT_SUBMIT_ERROR));
                return None;
            }
        };

        let job_id = match response.job_id() {
            Some(id) if response.success => id.to_string(),
            _ => {
                let message = non_blank(response.error);
                tracing::warn!(
                    generation = self.generation,
                    error = message.as_deref().unwrap_or(DEFAULT_SUBMIT_ERROR),
                    "job submission rejected"
                );
                self.fail(message.as_deref().unwrap_or(DEFAULT_SUBMIT_ERROR));
                return None;
            }
        };

        let progress = self.progress.acknowledged();
        self.commit(|s| {
            s.job_id = Some(job_id.clone());
            s.progress = progress;
        })?;
        tracing::info!(job_id = %job_id, generation = self.generation, "job submitted");
        Some(job_id)
    }

    fn apply_snapshot(&mut self, snapshot: StatusSnapshot<T>) -> Step {
        let StatusSnapshot {
            status,
            progress: remote_progress,
            message,
            result,
            error,
        } = snapshot;

        match status {
            RemoteStatus::Completed => {
                let applied = self.commit(|s| {
                    s.complete(result, message);
                    s.result.clone()
                });
                if let Some(result) = applied {
                    tracing::info!(generation = self.generation, "job completed");
                    self.notify(|o| o.on_complete(result.as_ref()));
                }
                Step::Done
            }
            RemoteStatus::Failed => {
                let message = non_blank(error);
                self.fail(message.as_deref().unwrap_or(DEFAULT_REMOTE_ERROR));
                Step::Done
            }
            RemoteStatus::Pending | RemoteStatus::Processing | RemoteStatus::Unknown => {
                let progress = self.progress.observe(remote_progress);
                let started = status == RemoteStatus::Processing
                    || remote_progress.is_some_and(|p| p > 0.0);
                let applied = self.commit(|s| {
                    s.progress = progress;
                    if message.is_some() {
                        s.message = message;
                    }
                    if s.status == JobStatus::Pending && started {
                        s.status = JobStatus::Processing;
                    }
                    s.message.clone()
                });
                match applied {
                    Some(message) => {
                        self.notify(|o| o.on_progress(progress, message.as_deref()));
                        Step::Next(self.config.poll_interval)
                    }
                    None => Step::Done,
                }
            }
        }
    }

    fn on_failure(&self, classified: ClassifiedError, poll: u32) -> Step {
        match classified.decision() {
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(
                    generation = self.generation,
                    poll,
                    status = classified.status,
                    delay_ms = delay.as_millis() as u64,
                    error = %classified.message,
                    "transient poll failure, retrying"
                );
                Step::Next(delay)
            }
            RetryDecision::NoRetry => {
                tracing::warn!(
                    generation = self.generation,
                    poll,
                    status = classified.status,
                    error = %classified.message,
                    "poll failed"
                );
                self.fail(&classified.message);
                Step::Done
            }
        }
    }

    fn fail(&self, message: &str) {
        if self.commit(|s| s.fail(message)).is_some() {
            self.notify(|o| o.on_error(message));
        }
    }

    /// A server hint never pushes the next wake-up past the wall-clock bound.
    fn within_budget(&self, delay: Duration) -> Duration {
        let remaining = self
            .config
            .max_poll_time
            .saturating_sub(self.started.elapsed());
        delay.min(remaining)
    }

    /// Deliver an observer event unless the run was cancelled since its commit.
    fn notify(&self, f: impl FnOnce(&dyn JobObserver<T>)) {
        if self.shared.is_current(self.generation) {
            f(self.observer.as_ref());
        } else {
            tracing::debug!(generation = self.generation, "dropping event of cancelled run");
        }
    }

    fn commit<R>(&self, f: impl FnOnce(&mut JobState<T>) -> R) -> Option<R> {
        let out = self.shared.update(self.generation, f);
        if out.is_none() {
            tracing::debug!(generation = self.generation, "discarding result of superseded run");
        }
        out
    }
}

fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}
