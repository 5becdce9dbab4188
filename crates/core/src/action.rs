// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions the engine can run against a job's repository.

use serde::{Deserialize, Serialize};

/// One invocation kind of the external archival tool.
///
/// Restore destinations and item paths travel with the action rather than
/// the job configuration: they are chosen per run, not per job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// Archive the job's source path into its repository.
    Backup,
    /// Restore a single item from the latest snapshot to `dest`.
    RestoreFile { item: String, dest: String },
    /// Restore the whole latest snapshot to `dest`.
    RestoreTree { dest: String },
    /// List the files recorded in the latest snapshot.
    ListFiles,
    /// Summarize the repository's snapshots.
    Status,
}

impl Action {
    /// Whether a successful run of this action yields a structured report
    /// parsed from the full stdout.
    pub fn reports_from_stdout(&self) -> bool {
        matches!(self, Action::ListFiles | Action::Status)
    }
}

crate::simple_display! {
    Action {
        Backup => "backup",
        RestoreFile { .. } => "restore-file",
        RestoreTree { .. } => "restore-tree",
        ListFiles => "list-files",
        Status => "status",
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
