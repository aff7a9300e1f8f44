//! CLI for submitting and tracking backend jobs.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jobtrack_core::config;
use jobtrack_core::job::JobKind;
use std::path::PathBuf;

use commands::{run_config, run_submit, run_watch};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "jobtrack")]
#[command(about = "Submit long-running backend jobs and track them to completion", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Submit a new job and wait for its result.
    Submit {
        /// Job kind: resume-tailoring, interview-prep or career-plan.
        #[arg(long, default_value = "resume-tailoring")]
        kind: JobKind,
        /// JSON file with the job parameters.
        #[arg(long, value_name = "FILE")]
        body: PathBuf,
        /// Submit path relative to the base URL (defaults per kind).
        #[arg(long)]
        path: Option<String>,
    },

    /// Track a job that was already submitted.
    Watch {
        /// Job identifier returned by the backend.
        job_id: String,
        /// Job kind (controls poll interval and messages).
        #[arg(long, default_value = "resume-tailoring")]
        kind: JobKind,
    },

    /// Show the config file location and effective settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Submit { kind, body, path } => {
                run_submit(&cfg, kind, &body, path.as_deref()).await?
            }
            CliCommand::Watch { job_id, kind } => run_watch(&cfg, kind, &job_id).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}
