//! Shared tracking loop: drive a controller, print progress, handle Ctrl-C.

use anyhow::{bail, Result};
use jobtrack_core::config::JobTrackConfig;
use jobtrack_core::http::HttpJobClient;
use jobtrack_core::job::{JobController, JobKind, JobObserver, JobStatus, JobSubmitter};
use serde_json::Value;
use std::sync::Arc;

/// Prints one progress line per poll.
struct ConsoleProgress;

impl JobObserver<Value> for ConsoleProgress {
    fn on_progress(&self, progress: u8, message: Option<&str>) {
        println!("  [{:>3}%] {}", progress, message.unwrap_or("working..."));
    }
}

pub(super) async fn track(
    cfg: &JobTrackConfig,
    kind: JobKind,
    client: HttpJobClient,
    submitter: Arc<dyn JobSubmitter>,
) -> Result<()> {
    let controller: JobController<Value> =
        JobController::new(cfg.controller_config(kind), Arc::new(client.clone()))
            .with_observer(Arc::new(ConsoleProgress));

    controller.start(submitter, move |job_id| client.status_url(job_id));

    let state = tokio::select! {
        state = controller.wait_for_terminal() => state,
        _ = tokio::signal::ctrl_c() => {
            let job_id = controller.job_id();
            controller.reset();
            match job_id {
                Some(id) => bail!("cancelled; job {id} keeps running on the server (resume with `jobtrack watch {id}`)"),
                None => bail!("cancelled before the job was submitted"),
            }
        }
    };

    match state.status {
        JobStatus::Completed => {
            if let Some(id) = &state.job_id {
                tracing::info!(job_id = %id, "job completed");
            }
            let result = state.result.unwrap_or(Value::Null);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        _ => bail!(
            "{}",
            state.error.unwrap_or_else(|| format!("{} failed", kind.operation_name()))
        ),
    }
}
