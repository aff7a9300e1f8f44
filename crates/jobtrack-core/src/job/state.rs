//! Observable job state owned by the controller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one run: `Idle -> Pending -> Processing* -> Completed | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Idle,
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// No further polling happens once a terminal state is reached.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Snapshot of a run as seen by callers.
///
/// `result` is only set when `status` is `Completed`, `error` only when it is
/// `Failed`. `progress` is 0..=100 and reaches 100 only on completion.
#[derive(Debug, Clone)]
pub struct JobState<T> {
    pub status: JobStatus,
    pub progress: u8,
    pub message: Option<String>,
    pub result: Option<T>,
    pub error: Option<String>,
    pub job_id: Option<String>,
}

impl<T> JobState<T> {
    pub fn idle() -> Self {
        Self {
            status: JobStatus::Idle,
            progress: 0,
            message: None,
            result: None,
            error: None,
            job_id: None,
        }
    }

    pub(crate) fn pending() -> Self {
        Self {
            status: JobStatus::Pending,
            ..Self::idle()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub(crate) fn is_pristine(&self) -> bool {
        self.status == JobStatus::Idle && self.job_id.is_none() && self.message.is_none()
    }

    pub(crate) fn complete(&mut self, result: Option<T>, message: Option<String>) {
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.result = result;
        self.error = None;
        if message.is_some() {
            self.message = message;
        }
    }

    pub(crate) fn fail(&mut self, error: &str) {
        self.status = JobStatus::Failed;
        self.result = None;
        self.error = Some(error.to_string());
        self.message = Some(error.to_string());
    }
}
