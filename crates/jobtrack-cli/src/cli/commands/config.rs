//! `jobtrack config` – show config location and effective values.

use anyhow::Result;
use jobtrack_core::config::{self, JobTrackConfig};
use jobtrack_core::job::JobKind;

pub fn run_config(cfg: &JobTrackConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    println!("base_url:    {}", cfg.base_url);
    println!("status_path: {}", cfg.status_path);
    println!("timeout:     {}s", cfg.request_timeout().as_secs());
    if !cfg.headers.is_empty() {
        let names: Vec<&str> = cfg.headers.keys().map(String::as_str).collect();
        println!("headers:     {}", names.join(", "));
    }
    println!();
    println!("{:<18} {:<10} {:<12} {}", "KIND", "INTERVAL", "MAX TIME", "MAX POLLS");
    for kind in JobKind::ALL {
        let cc = cfg.controller_config(kind);
        println!(
            "{:<18} {:<10} {:<12} {}",
            kind.as_str(),
            format!("{}ms", cc.poll_interval.as_millis()),
            format!("{}s", cc.max_poll_time.as_secs()),
            cc.max_polls
        );
    }
    Ok(())
}
