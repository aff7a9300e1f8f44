//! `jobtrack watch` – track an existing job by id.

use anyhow::Result;
use jobtrack_core::config::JobTrackConfig;
use jobtrack_core::http::HttpJobClient;
use jobtrack_core::job::{ExistingJob, JobKind};
use std::sync::Arc;

use super::track::track;

pub async fn run_watch(cfg: &JobTrackConfig, kind: JobKind, job_id: &str) -> Result<()> {
    let client = HttpJobClient::from_config(cfg)?;
    tracing::info!(kind = %kind, job_id, "watching job");
    track(cfg, kind, client, Arc::new(ExistingJob(job_id.to_string()))).await
}
