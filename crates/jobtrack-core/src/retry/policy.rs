use std::time::Duration;

use super::error::ClassifiedError;

/// Decision derived from a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up; the failure is terminal for the run.
    NoRetry,
    /// Poll again after the given delay.
    RetryAfter(Duration),
}

impl ClassifiedError {
    pub fn decision(&self) -> RetryDecision {
        if self.retryable {
            RetryDecision::RetryAfter(self.retry_after)
        } else {
            RetryDecision::NoRetry
        }
    }
}
