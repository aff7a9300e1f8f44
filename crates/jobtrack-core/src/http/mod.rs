//! HTTP submit/status collaborators.
//!
//! Uses the curl crate (libcurl) on tokio's blocking pool. Non-2xx responses
//! are reported with their status, body error and `Retry-After` header so the
//! controller can classify them; curl failures become [`TransportError`]s.

mod parse;
mod request;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::JobTrackConfig;
use crate::job::{JobSubmitter, PollResponse, StatusEndpoint, StatusSnapshot, SubmitResponse};
use crate::retry::TransportError;
use request::{Method, RawResponse, Request};

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid request path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

/// Talks to the job backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpJobClient {
    base_url: Url,
    status_path: String,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl HttpJobClient {
    pub fn new(base_url: &str, status_path: impl Into<String>) -> Result<Self, HttpError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|source| HttpError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url,
            status_path: status_path.into(),
            headers: Vec::new(),
            timeout: Duration::from_secs(30),
        })
    }

    pub fn from_config(cfg: &JobTrackConfig) -> Result<Self, HttpError> {
        let client = Self::new(&cfg.base_url, cfg.status_path.clone())?
            .with_timeout(cfg.request_timeout());
        Ok(cfg
            .headers
            .iter()
            .fold(client, |c, (k, v)| c.with_header(k.clone(), v.clone())))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `path`, relative to the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url, HttpError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| HttpError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }

    /// Status URL for `job_id`.
    ///
    /// The id fills the `{job_id}` placeholder as one percent-encoded path
    /// segment; without a placeholder it is appended as the last segment.
    pub fn status_url(&self, job_id: &str) -> String {
        let (dir, segment, rest) = match self.status_path.split_once("{job_id}") {
            Some((head, tail)) => {
                let (dir, lead) = head.rsplit_once('/').unwrap_or(("", head));
                let (trail, rest) = tail.split_once('/').unwrap_or((tail, ""));
                (dir, format!("{lead}{job_id}{trail}"), rest)
            }
            None => (self.status_path.as_str(), job_id.to_string(), ""),
        };

        let mut url = match self.url_for(&format!("{}/", dir.trim_end_matches('/'))) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(error = %err, "status path not joinable, using base URL");
                self.base_url.clone()
            }
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&segment)
                .extend(rest.split('/').filter(|s| !s.is_empty()));
        }
        url.to_string()
    }

    /// A submitter that POSTs `body` as JSON to `path`.
    pub fn submission(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<HttpSubmission, HttpError> {
        Ok(HttpSubmission {
            client: self.clone(),
            url: self.url_for(path)?.to_string(),
            body,
        })
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, TransportError> {
        let request = Request {
            method,
            url: url.to_string(),
            headers: self.headers.clone(),
            body,
            timeout: self.timeout,
        };
        let response = tokio::task::spawn_blocking(move || request::perform(&request))
            .await
            .map_err(|e| TransportError::aborted(format!("request task did not finish: {e}")))?
            .map_err(|e| transport_error(&e))?;
        tracing::debug!(url, code = response.code, "http response");
        Ok(response)
    }
}

#[async_trait]
impl<T> StatusEndpoint<T> for HttpJobClient
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, url: &str) -> Result<PollResponse<T>, TransportError> {
        let response = self.execute(Method::Get, url, None).await?;
        if !response.is_success() {
            return Ok(PollResponse::Failed {
                status: u16::try_from(response.code).unwrap_or(u16::MAX),
                error: parse::error_detail(&response.body),
                retry_after: parse::header_value(&response.headers, "retry-after"),
            });
        }
        serde_json::from_slice::<StatusSnapshot<T>>(&response.body)
            .map(PollResponse::Ok)
            .map_err(|e| TransportError::other(format!("invalid status response: {e}")))
    }
}

/// One job submission: POST a JSON body to the submit URL.
#[derive(Debug, Clone)]
pub struct HttpSubmission {
    client: HttpJobClient,
    url: String,
    body: serde_json::Value,
}

impl HttpSubmission {
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl JobSubmitter for HttpSubmission {
    async fn submit(&self) -> Result<SubmitResponse, TransportError> {
        let payload = serde_json::to_vec(&self.body)
            .map_err(|e| TransportError::other(format!("encoding request body: {e}")))?;
        let response = self.client.execute(Method::Post, &self.url, Some(payload)).await?;
        if !response.is_success() {
            let message = parse::error_detail(&response.body)
                .unwrap_or_else(|| format!("Submission failed (HTTP {})", response.code));
            return Ok(SubmitResponse::rejected(message));
        }
        serde_json::from_slice(&response.body)
            .map_err(|e| TransportError::other(format!("invalid submit response: {e}")))
    }
}

/// Map a curl failure onto the transport error families the classifier knows.
fn transport_error(e: &curl::Error) -> TransportError {
    if e.is_operation_timedout() {
        return TransportError::timeout(e.to_string());
    }
    if e.is_aborted_by_callback() {
        return TransportError::aborted(e.to_string());
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return TransportError::network(format!("network error: {e}"));
    }
    TransportError::other(e.to_string())
}
