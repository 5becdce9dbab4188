// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `sb` - run and monitor backup jobs from a TOML jobs file.
//!
//! A thin stand-in for a real control panel: it starts one run, prints the
//! engine's notifications as they arrive, and translates Ctrl-C into a
//! cancellation request.

mod jobs_file;
mod render;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use sb_core::{Action, Event, RunOutcome};
use sb_engine::JobController;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use jobs_file::JobsFile;

#[derive(Parser)]
#[command(name = "sb", version, about = "Run and monitor backup jobs")]
struct Cli {
    /// Jobs definition file
    #[arg(long, default_value = "jobs.toml")]
    jobs: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Back up the job's source path into its repository
    Backup { job: String },
    /// Restore the whole latest snapshot
    RestoreTree {
        job: String,
        /// Directory to restore into
        #[arg(long)]
        dest: String,
    },
    /// Restore a single file from the latest snapshot
    RestoreFile {
        job: String,
        /// Path of the file inside the snapshot
        #[arg(long)]
        item: String,
        /// Directory to restore into
        #[arg(long)]
        dest: String,
    },
    /// List the files in the latest snapshot
    Ls { job: String },
    /// Summarize the repository's snapshots
    Snapshots { job: String },
}

impl Command {
    fn into_parts(self) -> (String, Action) {
        match self {
            Command::Backup { job } => (job, Action::Backup),
            Command::RestoreTree { job, dest } => (job, Action::RestoreTree { dest }),
            Command::RestoreFile { job, item, dest } => {
                (job, Action::RestoreFile { item, dest })
            }
            Command::Ls { job } => (job, Action::ListFiles),
            Command::Snapshots { job } => (job, Action::Status),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sb=info,sb_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let file = JobsFile::load(&cli.jobs)?;
    let (name, action) = cli.command.into_parts();
    let config = file.job_config(&name)?;
    if let Some(title) = &config.title {
        tracing::info!(job_id = %config.id, title = %title, "job selected");
    }

    let (event_tx, mut events) = mpsc::channel(64);
    let controller = JobController::new(file.engine, event_tx);
    let job_id = config.id.clone();
    controller.start(&job_id, action, &config).await?;

    let mut stdout = std::io::stdout();
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    bail!("engine stopped before the run finished");
                };
                stdout.write_all(render::render_event(&event).as_bytes())?;
                stdout.flush()?;
                if let Event::JobFinished { outcome, .. } = event {
                    return match outcome {
                        RunOutcome::Succeeded => Ok(()),
                        RunOutcome::Cancelled => bail!("run cancelled"),
                        RunOutcome::Failed { reason } => bail!("run failed: {reason}"),
                    };
                }
            }
            _ = tokio::signal::ctrl_c() => {
                // A second Ctrl-C while the kill is in flight is a no-op.
                let _ = controller.cancel(&job_id);
            }
        }
    }
}
