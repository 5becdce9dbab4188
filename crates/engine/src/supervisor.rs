// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single external process lifecycle: spawn, stream, cancel, one outcome.
//!
//! A supervisor owns exactly one child process for one run. Its stdout and
//! stderr are multiplexed into a single ordered event stream, tagged per
//! stream; the terminal [`ProcessEvent::Done`] is delivered exactly once,
//! after every buffered output event for the run.

use crate::command::Invocation;
use sb_core::{RunOutcome, StreamKind};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Marker chunk emitted once when a stream exceeds its capture cap.
pub const TRUNCATION_MARKER: &str = "\n[output truncated]\n";

/// Read buffer size for each pipe.
const READ_CHUNK: usize = 8 * 1024;
/// Queue depth between the pipe readers and the consumer.
const EVENT_QUEUE: usize = 64;

/// Everything needed to run one external process.
#[derive(Debug)]
pub struct SpawnSpec {
    pub invocation: Invocation,
    /// Kill the process if no output arrives for this long and report the
    /// run as failed (not cancelled — policy, not user intent).
    pub idle_timeout: Option<Duration>,
    /// Per-stream cap on bytes forwarded to the consumer.
    pub max_capture_bytes: usize,
    /// Cancellation token; the caller keeps a clone to cancel with.
    pub cancel: CancellationToken,
}

impl SpawnSpec {
    pub fn new(invocation: Invocation) -> Self {
        Self {
            invocation,
            idle_timeout: None,
            max_capture_bytes: 1024 * 1000,
            cancel: CancellationToken::new(),
        }
    }
}

/// Events from a supervised process, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// One received chunk, tagged with the stream it came from. Chunks of
    /// one stream are never reordered.
    Output { stream: StreamKind, chunk: String },
    /// Terminal outcome; exactly one per spawn, always last.
    Done { outcome: RunOutcome },
}

/// Caller-side handle to observe and cancel a running process.
#[derive(Debug, Clone)]
pub struct SupervisorHandle {
    cancel: CancellationToken,
    running: Arc<AtomicBool>,
}

impl SupervisorHandle {
    /// Request forcible termination. Idempotent. The run's outcome becomes
    /// `Cancelled` even if the process exits cleanly in the same instant.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Launch the process described by `spec`.
///
/// Never fails: an OS-level spawn error surfaces as an immediate `Done`
/// event with a `Failed` outcome, so every spawn yields exactly one
/// terminal event on the returned channel.
pub fn spawn(spec: SpawnSpec) -> (SupervisorHandle, mpsc::Receiver<ProcessEvent>) {
    let (tx, rx) = mpsc::channel(EVENT_QUEUE);
    let running = Arc::new(AtomicBool::new(true));
    let handle = SupervisorHandle {
        cancel: spec.cancel.clone(),
        running: Arc::clone(&running),
    };

    let mut cmd = Command::new(&spec.invocation.program);
    cmd.args(&spec.invocation.args)
        .envs(
            spec.invocation
                .env
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tokio::spawn(async move {
        let outcome = match cmd.spawn() {
            Ok(child) => drive(child, &spec, &tx).await,
            Err(e) => {
                tracing::error!(program = %spec.invocation.program, error = %e, "spawn failed");
                RunOutcome::Failed {
                    reason: format!("spawn failed: {e}"),
                }
            }
        };
        running.store(false, Ordering::SeqCst);
        let _ = tx.send(ProcessEvent::Done { outcome }).await;
    });

    (handle, rx)
}

/// Stream the child's output, honoring cancellation and the idle watchdog,
/// then reap it and compute the outcome.
async fn drive(mut child: Child, spec: &SpawnSpec, tx: &mpsc::Sender<ProcessEvent>) -> RunOutcome {
    let (raw_tx, mut raw_rx) = mpsc::channel(EVENT_QUEUE);
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(read_stream(
            stdout,
            StreamKind::Stdout,
            raw_tx.clone(),
            spec.max_capture_bytes,
        ));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(read_stream(
            stderr,
            StreamKind::Stderr,
            raw_tx.clone(),
            spec.max_capture_bytes,
        ));
    }
    // The readers hold the only senders; `None` from raw_rx means both
    // pipes are closed and every chunk has been forwarded.
    drop(raw_tx);

    let mut kill_sent = false;
    let mut timed_out = false;
    let mut deadline = spec.idle_timeout.map(|d| tokio::time::Instant::now() + d);

    loop {
        let idle_expiry = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = spec.cancel.cancelled(), if !kill_sent => {
                kill_sent = true;
                kill_child(&mut child);
            }
            _ = idle_expiry, if !kill_sent && deadline.is_some() => {
                tracing::warn!(program = %spec.invocation.program, "idle output timeout expired");
                timed_out = true;
                kill_sent = true;
                kill_child(&mut child);
            }
            chunk = raw_rx.recv() => match chunk {
                Some((stream, text)) => {
                    if let Some(limit) = spec.idle_timeout {
                        deadline = Some(tokio::time::Instant::now() + limit);
                    }
                    // A closed consumer is not an error; keep draining so
                    // the child can exit.
                    let _ = tx.send(ProcessEvent::Output { stream, chunk: text }).await;
                }
                None => break,
            }
        }
    }

    let status = child.wait().await;

    if spec.cancel.is_cancelled() {
        return RunOutcome::Cancelled;
    }
    if timed_out {
        let secs = spec.idle_timeout.unwrap_or_default().as_secs_f64();
        return RunOutcome::Failed {
            reason: format!("no output for {secs}s"),
        };
    }
    match status {
        Ok(s) if s.success() => RunOutcome::Succeeded,
        Ok(s) => RunOutcome::Failed {
            reason: match s.code() {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            },
        },
        Err(e) => RunOutcome::Failed {
            reason: format!("wait failed: {e}"),
        },
    }
}

/// Forward one pipe chunk-by-chunk, in order, up to `cap` bytes. Past the
/// cap a single truncation marker is emitted and the pipe is drained
/// without forwarding so the child never blocks on a full pipe.
async fn read_stream<R: AsyncRead + Unpin>(
    mut pipe: R,
    stream: StreamKind,
    tx: mpsc::Sender<(StreamKind, String)>,
    cap: usize,
) {
    let mut buf = vec![0u8; READ_CHUNK];
    let mut pending: Vec<u8> = Vec::new();
    let mut sent = 0usize;
    let mut truncated = false;
    loop {
        match pipe.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if truncated {
                    continue;
                }
                pending.extend_from_slice(&buf[..n]);
                let chunk = drain_utf8(&mut pending);
                if chunk.is_empty() {
                    continue;
                }
                if sent + chunk.len() > cap {
                    truncated = true;
                    tracing::warn!(stream = %stream, cap, "output capture cap reached, truncating");
                    if tx.send((stream, TRUNCATION_MARKER.to_string())).await.is_err() {
                        break;
                    }
                } else {
                    sent += chunk.len();
                    if tx.send((stream, chunk)).await.is_err() {
                        break;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(stream = %stream, error = %e, "pipe read failed");
                break;
            }
        }
    }
    // The stream can end mid-sequence; whatever is held back gets flushed
    // with replacement characters rather than dropped.
    if !truncated && !pending.is_empty() {
        let text = String::from_utf8_lossy(&pending).into_owned();
        let _ = tx.send((stream, text)).await;
    }
}

/// Take the decodable prefix of `pending` as text, holding back an
/// incomplete trailing UTF-8 sequence for the next read so a multibyte
/// character straddling a read boundary is never mangled. Invalid bytes
/// elsewhere are replaced, not dropped.
fn drain_utf8(pending: &mut Vec<u8>) -> String {
    let keep = match std::str::from_utf8(pending) {
        Ok(_) => 0,
        // `error_len() == None` marks an unexpected end of input, which can
        // only occur at the tail of the buffer.
        Err(e) if e.error_len().is_none() => pending.len() - e.valid_up_to(),
        Err(_) => 0,
    };
    let tail = pending.split_off(pending.len() - keep);
    let text = String::from_utf8_lossy(pending).into_owned();
    *pending = tail;
    text
}

fn kill_child(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::warn!(error = %e, "failed to kill child process");
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
