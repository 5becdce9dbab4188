// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle notifications emitted to the panel layer.

use crate::action::Action;
use crate::job::{JobId, RunOutcome};
use crate::report::{FileTreeEntry, ProgressSnapshot, StatusRecord};
use serde::{Deserialize, Serialize};

/// Which stream of the external process a chunk came from.
///
/// Streams are delivered as separate tagged events and are never
/// concatenated; a consumer can style stderr without re-parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

crate::simple_display! {
    StreamKind {
        Stdout => "stdout",
        Stderr => "stderr",
    }
}

/// Notifications crossing the boundary to the panel layer.
///
/// Serializes with `{"type": "job:name", ...fields}` format. For a single
/// run, `JobStarted` is always first and `JobFinished` always last; output
/// events arrive in the order the process produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "job:started")]
    JobStarted { id: JobId, action: Action },

    #[serde(rename = "job:progress")]
    JobProgress { id: JobId, progress: ProgressSnapshot },

    /// One pass-through output chunk, noise lines already suppressed.
    #[serde(rename = "job:output")]
    JobOutput {
        id: JobId,
        stream: StreamKind,
        text: String,
    },

    #[serde(rename = "job:file-tree")]
    JobFileTree {
        id: JobId,
        entries: Vec<FileTreeEntry>,
    },

    #[serde(rename = "job:status")]
    JobStatus { id: JobId, record: StatusRecord },

    /// Terminal notification; `history` is this run's slice of the job's
    /// accumulated history text, stderr regions tagged.
    #[serde(rename = "job:finished")]
    JobFinished {
        id: JobId,
        outcome: RunOutcome,
        history: String,
    },
}

impl Event {
    /// The job this notification concerns.
    pub fn job_id(&self) -> &JobId {
        match self {
            Event::JobStarted { id, .. }
            | Event::JobProgress { id, .. }
            | Event::JobOutput { id, .. }
            | Event::JobFileTree { id, .. }
            | Event::JobStatus { id, .. }
            | Event::JobFinished { id, .. } => id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::JobFinished { .. })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
