// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text rendering of engine notifications.

use sb_core::{Event, Metric, RunOutcome, StreamKind};

/// One event as terminal text. Output chunks pass through verbatim so the
/// tool's own formatting survives; everything else becomes a tagged line.
pub fn render_event(event: &Event) -> String {
    match event {
        Event::JobStarted { id, action } => format!("[{id}] {action} started\n"),
        Event::JobProgress { id, progress } => {
            // Derived values can exceed 100 near the end of a run.
            let percent = progress.percent.min(100.0);
            format!(
                "[{id}] {percent:.0}% (volume {}, source {})\n",
                progress.volume,
                human_bytes(progress.total_bytes),
            )
        }
        Event::JobOutput { stream, text, .. } => match stream {
            StreamKind::Stdout => text.clone(),
            StreamKind::Stderr => format!("! {}", text),
        },
        Event::JobFileTree { id, entries } => {
            let mut out = format!("[{id}] {} file(s) in latest snapshot\n", entries.len());
            for entry in entries {
                out.push_str(&format!("  {}\n", entry.path));
            }
            out
        }
        Event::JobStatus { id, record } => {
            let mut out = format!("[{id}] {} snapshot(s)\n", record.snapshot_count);
            if let (Some(start), Some(end)) = (&record.chain_start, &record.chain_end) {
                out.push_str(&format!("  oldest: {start}\n  newest: {end}\n"));
            }
            for (label, metric) in [
                ("volumes", record.backup_volumes),
                ("source files", record.source_files),
                ("source size", record.source_file_size),
            ] {
                if let Metric::Value(v) = metric {
                    out.push_str(&format!("  {label}: {v}\n"));
                }
            }
            out
        }
        Event::JobFinished { id, outcome, .. } => match outcome {
            RunOutcome::Succeeded => format!("[{id}] finished\n"),
            RunOutcome::Failed { reason } => format!("[{id}] failed: {reason}\n"),
            RunOutcome::Cancelled => format!("[{id}] cancelled\n"),
        },
    }
}

fn human_bytes(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
