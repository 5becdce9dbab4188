// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job registry and state machine.
//!
//! One controller instance owns every job's runtime state; there is no
//! global "current process". A job is `idle` or `running`; overlapping
//! starts are rejected, never queued behind the active run, and exactly
//! one external process is live per job at any instant.

use crate::command::{self, Invocation};
use crate::config::EngineConfig;
use crate::parse::{self, progress::BackupProgress};
use crate::supervisor::{self, ProcessEvent, SpawnSpec};
use parking_lot::Mutex;
use sb_core::{
    Action, EngineError, Event, JobConfig, JobId, JobState, ProgressSnapshot, RunOutcome,
    StreamKind,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

/// Mutable per-job bookkeeping, owned exclusively by the controller.
#[derive(Debug, Default)]
struct JobEntry {
    state: JobState,
    /// Cancellation token for the active run; present only while running.
    cancel: Option<CancellationToken>,
    /// Last derived progress. Reset when the next run starts, not when
    /// this one ends, so the final value stays visible until superseded.
    progress: Option<ProgressSnapshot>,
    /// Accumulated output text across runs, stderr regions tagged.
    history: String,
    /// Start of the current run's slice of `history`.
    cursor: usize,
}

/// Registry and state machine for all known jobs.
///
/// Cheap to clone; clones share one registry. Notifications go out on the
/// event channel handed to [`JobController::new`]; none of the operations
/// block on the channel's consumer beyond its buffer.
#[derive(Clone)]
pub struct JobController {
    inner: Arc<Inner>,
}

struct Inner {
    jobs: Mutex<HashMap<JobId, JobEntry>>,
    event_tx: mpsc::Sender<Event>,
    /// Caps simultaneously live external processes across all jobs.
    permits: Arc<Semaphore>,
    config: EngineConfig,
}

impl JobController {
    pub fn new(config: EngineConfig, event_tx: mpsc::Sender<Event>) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Self {
            inner: Arc::new(Inner {
                jobs: Mutex::new(HashMap::new()),
                event_tx,
                permits,
                config,
            }),
        }
    }

    /// Start `action` for `job_id`.
    ///
    /// Rejects synchronously with `InvalidConfig` (before anything is
    /// spawned) or `JobBusy` (the active run is left undisturbed). On
    /// success the job is `running` and a `job:started` notification has
    /// been emitted; the terminal notification follows exactly once.
    pub async fn start(
        &self,
        job_id: &JobId,
        action: Action,
        config: &JobConfig,
    ) -> Result<(), EngineError> {
        let invocation = command::build(&action, config, &self.inner.config)?;
        let cancel = CancellationToken::new();
        {
            let mut jobs = self.inner.jobs.lock();
            let entry = jobs.entry(job_id.clone()).or_default();
            if entry.state == JobState::Running {
                return Err(EngineError::JobBusy(job_id.clone()));
            }
            entry.state = JobState::Running;
            entry.cancel = Some(cancel.clone());
            entry.progress = None;
            entry.cursor = entry.history.len();
        }
        tracing::info!(job_id = %job_id, action = %action, "run requested");
        emit(
            &self.inner,
            Event::JobStarted {
                id: job_id.clone(),
                action: action.clone(),
            },
        )
        .await;
        tokio::spawn(run_job(
            Arc::clone(&self.inner),
            job_id.clone(),
            action,
            invocation,
            cancel,
        ));
        Ok(())
    }

    /// Request cancellation of the active run.
    ///
    /// Idempotent while running; the run still resolves through the normal
    /// terminal path, reporting `Cancelled`. Fails with `NotRunning` when
    /// there is no active run (including a run that already finished).
    pub fn cancel(&self, job_id: &JobId) -> Result<(), EngineError> {
        let jobs = self.inner.jobs.lock();
        match jobs.get(job_id) {
            Some(entry) if entry.state == JobState::Running => {
                if let Some(token) = &entry.cancel {
                    token.cancel();
                }
                tracing::info!(job_id = %job_id, "cancellation requested");
                Ok(())
            }
            _ => Err(EngineError::NotRunning(job_id.clone())),
        }
    }

    /// Remove a job from the registry.
    ///
    /// Never queued behind an active run: fails with `JobBusy` while
    /// running — the caller must cancel first and wait for the terminal
    /// notification.
    pub fn delete(&self, job_id: &JobId) -> Result<(), EngineError> {
        let mut jobs = self.inner.jobs.lock();
        if let Some(entry) = jobs.get(job_id) {
            if entry.state == JobState::Running {
                return Err(EngineError::JobBusy(job_id.clone()));
            }
        }
        jobs.remove(job_id);
        Ok(())
    }

    pub fn is_running(&self, job_id: &JobId) -> bool {
        let jobs = self.inner.jobs.lock();
        jobs.get(job_id)
            .map(|entry| entry.state == JobState::Running)
            .unwrap_or(false)
    }

    /// Last derived progress for the job's current (or most recent) run.
    pub fn progress(&self, job_id: &JobId) -> Option<ProgressSnapshot> {
        let jobs = self.inner.jobs.lock();
        jobs.get(job_id).and_then(|entry| entry.progress)
    }

    /// Accumulated history text for the job, stderr regions tagged.
    pub fn history(&self, job_id: &JobId) -> Option<String> {
        let jobs = self.inner.jobs.lock();
        jobs.get(job_id).map(|entry| entry.history.clone())
    }

    pub fn clear_history(&self, job_id: &JobId) {
        let mut jobs = self.inner.jobs.lock();
        if let Some(entry) = jobs.get_mut(job_id) {
            entry.history.clear();
            entry.cursor = 0;
        }
    }
}

/// One run, start to terminal notification. Runs on its own task; the
/// controller never blocks on it.
async fn run_job(
    inner: Arc<Inner>,
    job_id: JobId,
    action: Action,
    invocation: Invocation,
    cancel: CancellationToken,
) {
    // Concurrency cap: queue behind a permit. Cancelling a queued run
    // resolves it without spawning anything.
    let permit = tokio::select! {
        permit = Arc::clone(&inner.permits).acquire_owned() => permit,
        _ = cancel.cancelled() => {
            finish(&inner, &job_id, RunOutcome::Cancelled).await;
            return;
        }
    };
    let _permit = match permit {
        Ok(permit) => permit,
        Err(_) => {
            finish(
                &inner,
                &job_id,
                RunOutcome::Failed {
                    reason: "engine shut down".to_string(),
                },
            )
            .await;
            return;
        }
    };

    let spec = SpawnSpec {
        invocation,
        idle_timeout: inner.config.idle_timeout(),
        max_capture_bytes: inner.config.max_capture_bytes,
        cancel,
    };
    let (_handle, mut events) = supervisor::spawn(spec);

    let mut progress = BackupProgress::new(inner.config.volume_size_mb);
    let wants_stdout = action.reports_from_stdout();
    let mut stdout_full = String::new();

    while let Some(event) = events.recv().await {
        match event {
            ProcessEvent::Output {
                stream: StreamKind::Stdout,
                chunk,
            } => {
                if wants_stdout {
                    stdout_full.push_str(&chunk);
                }
                let text = if action == Action::Backup {
                    let outcome = progress.observe(&chunk);
                    if let Some(snapshot) = outcome.progress {
                        advance_progress(&inner, &job_id, snapshot).await;
                    }
                    outcome.passthrough
                } else {
                    Some(chunk)
                };
                if let Some(text) = text {
                    append_history(&inner, &job_id, &text);
                    emit(
                        &inner,
                        Event::JobOutput {
                            id: job_id.clone(),
                            stream: StreamKind::Stdout,
                            text,
                        },
                    )
                    .await;
                }
            }
            ProcessEvent::Output {
                stream: StreamKind::Stderr,
                chunk,
            } => {
                append_history(&inner, &job_id, &parse::tag_stderr(&chunk));
                emit(
                    &inner,
                    Event::JobOutput {
                        id: job_id.clone(),
                        stream: StreamKind::Stderr,
                        text: chunk,
                    },
                )
                .await;
            }
            ProcessEvent::Done { outcome } => {
                if outcome.is_success() {
                    report_structured(&inner, &job_id, &action, &stdout_full).await;
                }
                finish(&inner, &job_id, outcome).await;
            }
        }
    }
}

/// Store and emit a progress snapshot, discarding regressions so progress
/// is monotonic within a run.
async fn advance_progress(inner: &Arc<Inner>, job_id: &JobId, snapshot: ProgressSnapshot) {
    let advanced = {
        let mut jobs = inner.jobs.lock();
        let Some(entry) = jobs.get_mut(job_id) else {
            return;
        };
        match entry.progress {
            Some(prev) if snapshot.percent <= prev.percent => false,
            _ => {
                entry.progress = Some(snapshot);
                true
            }
        }
    };
    if advanced {
        emit(
            inner,
            Event::JobProgress {
                id: job_id.clone(),
                progress: snapshot,
            },
        )
        .await;
    }
}

/// Emit the structured report a successful listing or status run carries.
/// A shape mismatch withholds the report and nothing else.
async fn report_structured(inner: &Arc<Inner>, job_id: &JobId, action: &Action, stdout: &str) {
    match action {
        Action::ListFiles => {
            let entries = parse::listing::parse_file_listing(stdout);
            emit(
                inner,
                Event::JobFileTree {
                    id: job_id.clone(),
                    entries,
                },
            )
            .await;
        }
        Action::Status => match parse::snapshots::parse_snapshots(stdout) {
            Ok(record) => {
                emit(
                    inner,
                    Event::JobStatus {
                        id: job_id.clone(),
                        record,
                    },
                )
                .await;
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "status output did not match expected shape; report withheld");
            }
        },
        _ => {}
    }
}

/// Terminal transition: back to `idle`, token dropped, one `job:finished`
/// notification with this run's history delta.
async fn finish(inner: &Arc<Inner>, job_id: &JobId, outcome: RunOutcome) {
    let (outcome, history) = {
        let mut jobs = inner.jobs.lock();
        let Some(entry) = jobs.get_mut(job_id) else {
            return;
        };
        // The job is `Running` until this lock is taken, so `cancel` can be
        // accepted while the terminal event is still in flight. The token is
        // re-checked here, at the last transition, and still wins.
        let outcome = match &entry.cancel {
            Some(token) if token.is_cancelled() => RunOutcome::Cancelled,
            _ => outcome,
        };
        entry.state = JobState::Idle;
        entry.cancel = None;
        (outcome, entry.history[entry.cursor..].to_string())
    };
    tracing::info!(job_id = %job_id, outcome = %outcome, "run finished");
    emit(
        inner,
        Event::JobFinished {
            id: job_id.clone(),
            outcome,
            history,
        },
    )
    .await;
}

fn append_history(inner: &Arc<Inner>, job_id: &JobId, text: &str) {
    let mut jobs = inner.jobs.lock();
    if let Some(entry) = jobs.get_mut(job_id) {
        entry.history.push_str(text);
    }
}

async fn emit(inner: &Arc<Inner>, event: Event) {
    if inner.event_tx.send(event).await.is_err() {
        tracing::warn!("event receiver closed, notification dropped");
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
