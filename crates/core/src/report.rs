// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured reports derived from the external tool's output.

use serde::{Deserialize, Serialize};

/// A metric the underlying tool may not expose at all.
///
/// Consumers must be able to distinguish "zero" from "not supported by this
/// tool", so unsupported metrics are marked rather than omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Unavailable,
    Value(u64),
}

/// Point-in-time backup progress derived from output markers.
///
/// Monotonic within a run; the controller discards derived values that
/// would move backwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Index of the volume currently being written.
    pub volume: u64,
    /// Estimated total source size in bytes.
    pub total_bytes: u64,
    /// Derived completion percentage. May legitimately exceed 100 near the
    /// end of a run; consumers clamp for display.
    pub percent: f64,
}

/// One file from a listing run. Ordering and duplicates are preserved
/// exactly as the tool produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTreeEntry {
    /// The raw listing line.
    pub path: String,
    /// Portion before the last separator, or `.` for rootless paths.
    pub dir: String,
    /// Portion after the last separator.
    pub name: String,
}

/// Summary of the snapshots recorded in a job's repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub snapshot_count: u64,
    /// Timestamp of the oldest snapshot, as raw tool text. `None` when the
    /// repository has no snapshots.
    pub chain_start: Option<String>,
    /// Timestamp of the newest snapshot, as raw tool text.
    pub chain_end: Option<String>,
    /// Not exposed by restic.
    pub backup_volumes: Metric,
    /// Not exposed by restic.
    pub source_files: Metric,
    /// Not exposed by restic.
    pub source_file_size: Metric,
}

impl StatusRecord {
    /// Record for a repository with no snapshots.
    pub fn empty() -> Self {
        Self {
            snapshot_count: 0,
            chain_start: None,
            chain_end: None,
            backup_volumes: Metric::Unavailable,
            source_files: Metric::Unavailable,
            source_file_size: Metric::Unavailable,
        }
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
