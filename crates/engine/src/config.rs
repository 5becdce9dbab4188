// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tuning knobs.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Engine-wide configuration.
///
/// All fields have working defaults; the panel layer may override any
/// subset (the CLI reads them from the jobs file's `[engine]` table).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// External archival tool binary.
    pub program: String,

    /// Scratch directory handed to the tool via its environment. Not
    /// retained by the engine.
    pub scratch_dir: PathBuf,

    /// Maximum simultaneously live external processes across all jobs.
    /// Starts beyond the cap queue until a slot frees up; a queued run can
    /// still be cancelled and resolves without spawning.
    pub max_concurrent: usize,

    /// Kill a run that produces no output for this many seconds and report
    /// it as failed. `None` disables the watchdog.
    pub idle_timeout_secs: Option<u64>,

    /// Per-stream cap on output bytes forwarded to consumers. Overflow is
    /// truncated with an explicit marker; the process keeps running.
    pub max_capture_bytes: usize,

    /// Per-volume size (MiB) used by the backup progress formula. The
    /// tool's output never states it, so it must be calibrated against
    /// real runs; `None` keeps progress events off rather than wrong.
    pub volume_size_mb: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "restic".to_string(),
            scratch_dir: std::env::temp_dir(),
            max_concurrent: 4,
            idle_timeout_secs: None,
            max_capture_bytes: 1024 * 1000,
            volume_size_mb: None,
        }
    }
}

impl EngineConfig {
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
