//! Classify HTTP status codes and transport errors into retry decisions.

use chrono::{DateTime, Utc};
use std::time::Duration;

use super::error::{ClassifiedError, TransportError, ABORT_ERROR, NETWORK_ERROR, TIMEOUT_ERROR};
use super::retry_after::parse_retry_after;

/// Floor for throttling responses (429) when the server gives no usable hint.
const THROTTLED_MIN_DELAY: Duration = Duration::from_millis(5000);
/// Floor for other retryable server errors.
const SERVER_MIN_DELAY: Duration = Duration::from_millis(2000);
const TIMEOUT_RETRY_DELAY: Duration = Duration::from_millis(3000);
const NETWORK_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Lowercase fragments that identify connectivity failures in error messages.
const NETWORK_PHRASES: &[&str] = &[
    "network",
    "failed to fetch",
    "connection refused",
    "connection reset",
    "could not resolve",
    "couldn't resolve",
    "couldn't connect",
    "could not connect",
];

/// Transient or server-side failures worth polling again.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Client errors that will not change on retry.
pub fn is_terminal_status(status: u16) -> bool {
    matches!(status, 400 | 401 | 403 | 404 | 409 | 422)
}

/// Classify a non-successful HTTP response.
///
/// Retryable statuses honor `retry_after` (seconds or HTTP date); a missing,
/// unparsable or zero hint falls back to 5s for 429 and 2s otherwise.
/// Every other status is terminal.
pub fn classify_error(status: u16, message: &str, retry_after: Option<&str>) -> ClassifiedError {
    classify_error_at(status, message, retry_after, Utc::now())
}

pub(crate) fn classify_error_at(
    status: u16,
    message: &str,
    retry_after: Option<&str>,
    now: DateTime<Utc>,
) -> ClassifiedError {
    if !is_retryable_status(status) {
        return ClassifiedError::terminal(status, message);
    }
    let floor = if status == 429 {
        THROTTLED_MIN_DELAY
    } else {
        SERVER_MIN_DELAY
    };
    let delay = retry_after
        .and_then(|v| parse_retry_after(v, now))
        .filter(|d| !d.is_zero())
        .unwrap_or(floor);
    ClassifiedError::retryable(status, message, delay)
}

/// Classify a transport error (no HTTP response).
///
/// Timeouts and aborts retry after 3s, connectivity failures after 2s.
/// Anything else is treated as a deterministic failure and not retried.
pub fn classify_exception(err: &TransportError) -> ClassifiedError {
    let lower = err.message.to_ascii_lowercase();
    if is_abort_name(&err.name) || lower.contains("timeout") || lower.contains("timed out") {
        return ClassifiedError::retryable(0, err.message.clone(), TIMEOUT_RETRY_DELAY);
    }
    if err.name == NETWORK_ERROR || NETWORK_PHRASES.iter().any(|p| lower.contains(p)) {
        return ClassifiedError::retryable(0, err.message.clone(), NETWORK_RETRY_DELAY);
    }
    ClassifiedError::terminal(0, err.message.clone())
}

fn is_abort_name(name: &str) -> bool {
    if name == ABORT_ERROR || name == TIMEOUT_ERROR {
        return true;
    }
    let lower = name.to_ascii_lowercase();
    lower.contains("abort") || lower.contains("cancel")
}
