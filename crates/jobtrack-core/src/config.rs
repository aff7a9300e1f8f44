use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::job::{ControllerConfig, JobKind};

/// Polling bounds (optional `[poll]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between status requests in milliseconds.
    pub interval_ms: u64,
    /// Give up after this many milliseconds since submission.
    pub max_poll_time_ms: u64,
    /// Give up after this many status requests.
    pub max_polls: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_poll_time_ms: 420_000,
            max_polls: 60,
        }
    }
}

/// Global configuration loaded from `~/.config/jobtrack/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTrackConfig {
    /// Backend base URL; submit and status paths are joined onto it.
    pub base_url: String,
    /// Status path template; `{job_id}` is replaced with the job identifier.
    pub status_path: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Optional polling bounds; if missing, per-kind defaults are used.
    #[serde(default)]
    pub poll: Option<PollConfig>,
    /// Extra request headers, passed through as is.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for JobTrackConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            status_path: "api/jobs/{job_id}".to_string(),
            request_timeout_secs: 30,
            poll: None,
            headers: BTreeMap::new(),
        }
    }
}

impl JobTrackConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Controller settings for `kind`, with the `[poll]` section applied on top.
    pub fn controller_config(&self, kind: JobKind) -> ControllerConfig {
        let base = ControllerConfig::for_kind(kind);
        match &self.poll {
            Some(poll) => base
                .with_poll_interval(Duration::from_millis(poll.interval_ms))
                .with_max_poll_time(Duration::from_millis(poll.max_poll_time_ms))
                .with_max_polls(poll.max_polls),
            None => base,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("jobtrack")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<JobTrackConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<JobTrackConfig> {
    if !path.exists() {
        let default_cfg = JobTrackConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: JobTrackConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
