// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Call-boundary errors.

use crate::job::JobId;
use thiserror::Error;

/// Errors rejected synchronously at the engine's command boundary.
///
/// Failures of the run itself (spawn failure, non-zero exit, cancellation)
/// are not errors: they are reported exactly once through the terminal
/// [`Event::JobFinished`](crate::Event::JobFinished) notification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Job configuration is missing a field the action requires.
    #[error("invalid config for job {job}: {reason}")]
    InvalidConfig { job: JobId, reason: String },

    /// A start or delete request collided with an active run.
    #[error("job {0} is busy")]
    JobBusy(JobId),

    /// Cancel was requested for a job with no active run.
    #[error("job {0} is not running")]
    NotRunning(JobId),
}
