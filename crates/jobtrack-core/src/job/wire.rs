//! Shapes exchanged with the submit and status collaborators.

use serde::Deserialize;

/// Response of a job submission.
///
/// Backends return the identifier either flat (`jobId` / `job_id`) or nested
/// under `data`; [`SubmitResponse::job_id`] accepts both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, rename = "jobId", alias = "job_id")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub data: Option<SubmitData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitData {
    #[serde(default, rename = "jobId", alias = "job_id")]
    pub job_id: Option<String>,
}

impl SubmitResponse {
    pub fn accepted(job_id: impl Into<String>) -> Self {
        Self {
            success: true,
            job_id: Some(job_id.into()),
            ..Self::default()
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Usable (non-blank) job identifier, flat shape first.
    pub fn job_id(&self) -> Option<&str> {
        self.job_id
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.job_id.as_deref()))
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Status reported by the backend for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One status response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct StatusSnapshot<T> {
    #[serde(default)]
    pub status: RemoteStatus,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> StatusSnapshot<T> {
    pub fn new(status: RemoteStatus) -> Self {
        Self {
            status,
            progress: None,
            message: None,
            result: None,
            error: None,
        }
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_result(mut self, result: T) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Outcome of one status request that produced an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum PollResponse<T> {
    /// 2xx with a parsed body.
    Ok(StatusSnapshot<T>),
    /// Non-2xx. `error` is the body's `error`/`detail`, `retry_after` the raw header.
    Failed {
        status: u16,
        error: Option<String>,
        retry_after: Option<String>,
    },
}
