//! Failure classification for status polling.
//!
//! This module maps a failed request (an HTTP status with an optional
//! `Retry-After` header, or a transport error) into a [`ClassifiedError`]
//! so the job controller can decide whether to reschedule and how long to wait.
//! Everything here is pure; no shared state.

mod classify;
mod error;
mod policy;
mod retry_after;

pub use classify::{classify_error, classify_exception, is_retryable_status, is_terminal_status};
pub use error::{ClassifiedError, TransportError, ABORT_ERROR, NETWORK_ERROR, TIMEOUT_ERROR};
pub use policy::RetryDecision;
pub use retry_after::parse_retry_after;
