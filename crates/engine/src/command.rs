// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds external tool invocations from job configuration.
//!
//! Pure: no filesystem or network access. Paths and URLs travel as
//! discrete argv tokens and are never interpolated into a shell string.

use crate::config::EngineConfig;
use sb_core::{Action, EngineError, JobConfig};
use std::fmt;

/// Environment variable the tool reads the repository passphrase from.
pub const PASSPHRASE_ENV: &str = "RESTIC_PASSWORD";
/// Environment variable pointing the tool at its scratch directory.
pub const SCRATCH_ENV: &str = "TMPDIR";

/// One fully-resolved external process invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Environment overlay applied on top of the inherited environment.
    /// Contains the passphrase.
    pub env: Vec<(String, String)>,
}

// Hand-written so the passphrase in `env` cannot leak through debug logs.
impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field(
                "env",
                &self.env.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Map an action and a job configuration to the exact argument vector and
/// environment overlay for the external tool.
pub fn build(
    action: &Action,
    config: &JobConfig,
    engine: &EngineConfig,
) -> Result<Invocation, EngineError> {
    if config.repo_url.is_empty() {
        return Err(missing(config, "repository URL"));
    }
    let repo = config.repo_url.as_str();

    let args: Vec<String> = match action {
        Action::Backup => {
            if config.source_path.is_empty() {
                return Err(missing(config, "source path"));
            }
            to_args(["backup", &config.source_path, "-r", repo])
        }
        Action::RestoreFile { item, dest } => {
            if item.is_empty() {
                return Err(missing(config, "item path"));
            }
            if dest.is_empty() {
                return Err(missing(config, "destination path"));
            }
            to_args(["restore", "latest", "-r", repo, "-i", item, "-t", dest])
        }
        Action::RestoreTree { dest } => {
            if dest.is_empty() {
                return Err(missing(config, "destination path"));
            }
            to_args(["restore", "latest", "-r", repo, "-t", dest])
        }
        Action::ListFiles => to_args(["ls", "latest", "-r", repo]),
        Action::Status => to_args(["snapshots", "-r", repo]),
    };

    Ok(Invocation {
        program: engine.program.clone(),
        args,
        env: vec![
            (
                PASSPHRASE_ENV.to_string(),
                config.passphrase.reveal().to_string(),
            ),
            (
                SCRATCH_ENV.to_string(),
                engine.scratch_dir.display().to_string(),
            ),
        ],
    })
}

fn to_args<const N: usize>(args: [&str; N]) -> Vec<String> {
    args.into_iter().map(str::to_string).collect()
}

fn missing(config: &JobConfig, what: &str) -> EngineError {
    EngineError::InvalidConfig {
        job: config.id.clone(),
        reason: format!("missing {what}"),
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
