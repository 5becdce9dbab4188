// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backup progress extraction from streamed stdout chunks.

use regex::Regex;
use sb_core::ProgressSnapshot;
use std::sync::LazyLock;

// Compiled lazily to `None` on failure: a broken pattern degrades to "no
// progress signal", in line with the module-wide policy.
static SOURCE_SIZE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"SourceFileSize (\d+) ").ok());
static VOLUME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Writing.*\.vol(\d+)\.").ok());

/// Incremental scanner for backup stdout.
///
/// State is explicit and externally owned so chunks can be replayed in
/// tests; nothing here touches the process itself. Size and volume
/// markers may arrive in different chunks, in any order.
#[derive(Debug)]
pub struct BackupProgress {
    /// Estimated total source size in bytes, once the size marker has
    /// been seen.
    total_bytes: Option<u64>,
    /// Most recent volume index marker.
    volume: Option<u64>,
    /// Per-volume size in MiB. Calibration parameter; `None` disables
    /// the percentage computation entirely.
    volume_size_mb: Option<f64>,
}

/// Result of scanning one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOutcome {
    /// Derived snapshot, present only when every input is known. Absence
    /// means "leave the previous value unchanged", never "reset".
    pub progress: Option<ProgressSnapshot>,
    /// Chunk text with noise lines removed; `None` when the whole chunk
    /// was suppressed.
    pub passthrough: Option<String>,
}

impl BackupProgress {
    pub fn new(volume_size_mb: Option<f64>) -> Self {
        Self {
            total_bytes: None,
            volume: None,
            volume_size_mb,
        }
    }

    /// Scan one chunk for size and volume markers and decide what part of
    /// it passes through to consumers.
    ///
    /// Noise lines (per-file add markers, dual-colon status lines) are
    /// suppressed from pass-through but still inspected for markers.
    pub fn observe(&mut self, chunk: &str) -> ChunkOutcome {
        if let Some(bytes) = capture_u64(&SOURCE_SIZE, chunk) {
            self.total_bytes = Some(bytes);
        }
        if let Some(volume) = capture_u64(&VOLUME, chunk) {
            self.volume = Some(volume);
        }

        ChunkOutcome {
            progress: self.derive(),
            passthrough: strip_noise(chunk),
        }
    }

    fn derive(&self) -> Option<ProgressSnapshot> {
        let total_bytes = self.total_bytes?;
        let volume = self.volume?;
        let volume_size_mb = self.volume_size_mb?;

        let total_mb = total_bytes as f64 / 1024.0 / 1024.0;
        if total_mb <= 0.0 || volume_size_mb <= 0.0 {
            return None;
        }
        // Values past 100 near completion are expected and passed through
        // untouched; consumers clamp for display.
        let percent = (volume as f64 * 100.0) / (total_mb / volume_size_mb);
        Some(ProgressSnapshot {
            volume,
            total_bytes,
            percent,
        })
    }
}

fn capture_u64(pattern: &LazyLock<Option<Regex>>, chunk: &str) -> Option<u64> {
    let re = pattern.as_ref()?;
    re.captures(chunk)?.get(1)?.as_str().parse().ok()
}

fn is_noise(line: &str) -> bool {
    line.starts_with("A ") || line.starts_with(":: :: ")
}

fn strip_noise(chunk: &str) -> Option<String> {
    if chunk.is_empty() {
        return None;
    }
    if !chunk.lines().any(is_noise) {
        return Some(chunk.to_string());
    }
    let kept: Vec<&str> = chunk.lines().filter(|line| !is_noise(line)).collect();
    if kept.is_empty() {
        return None;
    }
    let mut text = kept.join("\n");
    if chunk.ends_with('\n') {
        text.push('\n');
    }
    Some(text)
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
