//! Asynchronous job lifecycle: submit, poll with backoff, report progress.
//!
//! A [`JobController`] drives one run at a time:
//!
//! - **Submit**: the [`JobSubmitter`] returns a job id or an immediate failure.
//! - **Poll**: the [`StatusEndpoint`] is queried on a single timer chain; failed
//!   requests are classified by [`crate::retry`] and either rescheduled (honoring
//!   `Retry-After`) or turned into a terminal failure.
//! - **Bounds**: poll count and wall-clock time are checked before every poll.
//! - **Cancel**: `reset` / a new `start` / drop abort the run; late results
//!   are discarded by generation.
//!
//! State is observable through snapshots, a watch channel, or a [`JobObserver`].

mod controller;
mod kind;
mod observer;
mod progress;
mod run;
mod shared;
mod source;
mod state;
mod wire;

pub use controller::{ControllerConfig, JobController};
pub use kind::{JobKind, UnknownJobKind};
pub use observer::{JobObserver, NoopObserver};
pub use progress::ProgressMapping;
pub use source::{ExistingJob, JobSubmitter, PollUrlBuilder, StatusEndpoint, SubmitFn};
pub use state::{JobState, JobStatus};
pub use wire::{PollResponse, RemoteStatus, StatusSnapshot, SubmitData, SubmitResponse};
