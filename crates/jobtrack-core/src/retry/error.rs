//! Error types produced and consumed by the classifier.

use std::time::Duration;
use thiserror::Error;

/// Name carried by a transport error when the request was aborted.
pub const ABORT_ERROR: &str = "AbortError";
/// Name carried by a transport error when the request timed out.
pub const TIMEOUT_ERROR: &str = "TimeoutError";
/// Name carried by a transport error for connection-level failures.
pub const NETWORK_ERROR: &str = "NetworkError";

/// Result of classifying one failure: a retry decision plus a suggested delay.
///
/// `status` is 0 for failures that never produced an HTTP response.
/// Non-retryable values always carry a zero `retry_after`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    pub status: u16,
    pub message: String,
    pub retryable: bool,
    pub retry_after: Duration,
}

impl ClassifiedError {
    pub(crate) fn retryable(status: u16, message: impl Into<String>, delay: Duration) -> Self {
        Self {
            status,
            message: message.into(),
            retryable: true,
            retry_after: delay,
        }
    }

    pub(crate) fn terminal(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            retryable: false,
            retry_after: Duration::ZERO,
        }
    }

    /// Suggested delay in whole milliseconds.
    pub fn retry_after_ms(&self) -> u64 {
        self.retry_after.as_millis() as u64
    }
}

/// A request that failed before any HTTP response was available
/// (connection refused, timeout, abort, malformed body, ...).
///
/// `name` identifies the failure family (see [`ABORT_ERROR`], [`TIMEOUT_ERROR`],
/// [`NETWORK_ERROR`]); `message` is the human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct TransportError {
    pub name: String,
    pub message: String,
}

impl TransportError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The request was cancelled before it finished.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(ABORT_ERROR, message)
    }

    /// The request exceeded its deadline.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TIMEOUT_ERROR, message)
    }

    /// Connection-level failure (refused, reset, DNS).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(NETWORK_ERROR, message)
    }

    /// Any other failure, e.g. an unparsable response body.
    pub fn other(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }
}
