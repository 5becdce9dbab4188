// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity, configuration, and run lifecycle types.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Opaque identifier for a configured backup job.
///
/// Supplied by the panel layer when the job is defined and stable for the
/// job's lifetime. The engine never mints its own identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(SmolStr);

impl JobId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Repository passphrase.
///
/// `Debug` output is redacted; the raw value is only ever placed into the
/// child process environment, never into events, history text, or logs.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Passphrase(String);

impl Passphrase {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for placement into a child process environment.
    pub fn reveal(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

/// Immutable per-job configuration.
///
/// Replaced wholesale when the user edits the job; never mutated
/// field-by-field. Paths and URLs are opaque tokens handed to the external
/// tool as discrete arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobConfig {
    pub id: JobId,
    /// Directory the backup action archives.
    pub source_path: String,
    /// Repository URL or path the tool operates on.
    pub repo_url: String,
    pub passphrase: Passphrase,
    /// Optional display title; presentation only.
    #[serde(default)]
    pub title: Option<String>,
}

/// Lifecycle state of a job as seen by the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    Idle,
    Running,
}

crate::simple_display! {
    JobState {
        Idle => "idle",
        Running => "running",
    }
}

/// Terminal outcome of one run. Exactly one is reported per run.
///
/// Cancellation takes priority: a run cancelled by the caller reports
/// `Cancelled` even if the process happened to exit cleanly in the same
/// instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    /// The process exited non-zero or could not be spawned.
    Failed { reason: String },
    Cancelled,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled)
    }
}

crate::simple_display! {
    RunOutcome {
        Succeeded => "succeeded",
        Failed { .. } => "failed",
        Cancelled => "cancelled",
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
