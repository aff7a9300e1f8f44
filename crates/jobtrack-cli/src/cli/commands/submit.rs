//! `jobtrack submit` – submit a job and track it to completion.

use anyhow::{Context, Result};
use jobtrack_core::config::JobTrackConfig;
use jobtrack_core::http::HttpJobClient;
use jobtrack_core::job::JobKind;
use std::path::Path;
use std::sync::Arc;

use super::track::track;

pub async fn run_submit(
    cfg: &JobTrackConfig,
    kind: JobKind,
    body_path: &Path,
    path: Option<&str>,
) -> Result<()> {
    let raw = std::fs::read_to_string(body_path)
        .with_context(|| format!("reading {}", body_path.display()))?;
    let body: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as JSON", body_path.display()))?;

    let client = HttpJobClient::from_config(cfg)?;
    let submission = client.submission(path.unwrap_or(kind.submit_path()), body)?;
    tracing::info!(kind = %kind, url = submission.url(), "submitting job");

    track(cfg, kind, client, Arc::new(submission)).await
}
