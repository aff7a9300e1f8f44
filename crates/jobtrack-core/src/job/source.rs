//! Collaborators the controller drives: a job submitter and a status endpoint.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use super::wire::{PollResponse, SubmitResponse};
use crate::retry::TransportError;

/// Starts a job on the backend and returns its identifier.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(&self) -> Result<SubmitResponse, TransportError>;
}

/// Fetches one status snapshot for the job behind `url`.
///
/// `Err` means no HTTP response was obtained; non-2xx responses are
/// `Ok(PollResponse::Failed { .. })`.
#[async_trait]
pub trait StatusEndpoint<T>: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PollResponse<T>, TransportError>;
}

/// Builds the status URL (or key) for a job id.
pub type PollUrlBuilder = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Adapts an async closure into a [`JobSubmitter`].
pub struct SubmitFn<F>(pub F);

#[async_trait]
impl<F, Fut> JobSubmitter for SubmitFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<SubmitResponse, TransportError>> + Send,
{
    async fn submit(&self) -> Result<SubmitResponse, TransportError> {
        (self.0)().await
    }
}

/// Submitter for a job that already exists on the backend; resolves to its id.
#[derive(Debug, Clone)]
pub struct ExistingJob(pub String);

#[async_trait]
impl JobSubmitter for ExistingJob {
    async fn submit(&self) -> Result<SubmitResponse, TransportError> {
        Ok(SubmitResponse::accepted(self.0.clone()))
    }
}
