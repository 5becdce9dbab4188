// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

// 100 MiB source.
const SIZE_LINE: &str = "SourceFileSize 104857600 (100.00 MB)\n";
const VOLUME_LINE: &str = "Writing duplicity-full.20240101T000000Z.vol5.difftar.gpg\n";

#[test]
fn both_markers_yield_a_percentage() {
    let mut scanner = BackupProgress::new(Some(10.0));

    let first = scanner.observe(SIZE_LINE);
    assert_eq!(first.progress, None);

    let second = scanner.observe(VOLUME_LINE);
    let snapshot = second.progress.unwrap();
    assert_eq!(snapshot.volume, 5);
    assert_eq!(snapshot.total_bytes, 104_857_600);
    // (5 * 100) / (100 MiB / 10 MiB) = 50
    assert!((snapshot.percent - 50.0).abs() < f64::EPSILON);
}

#[test]
fn values_past_one_hundred_are_tolerated() {
    let mut scanner = BackupProgress::new(Some(25.0));
    scanner.observe(SIZE_LINE);
    let outcome = scanner.observe(VOLUME_LINE);
    // (5 * 100) / (100 / 25) = 125; near-completion overshoot is expected.
    let snapshot = outcome.progress.unwrap();
    assert!(snapshot.percent > 100.0);
}

#[test]
fn chunk_without_markers_leaves_progress_unchanged() {
    let mut scanner = BackupProgress::new(Some(10.0));
    scanner.observe(SIZE_LINE);
    scanner.observe(VOLUME_LINE);

    let outcome = scanner.observe("some unrelated output\n");
    // No new derivation from this chunk; the caller keeps its last value.
    let snapshot = outcome.progress.unwrap();
    assert_eq!(snapshot.volume, 5);
}

#[test]
fn markers_alone_are_not_enough() {
    let mut scanner = BackupProgress::new(Some(10.0));
    assert_eq!(scanner.observe(VOLUME_LINE).progress, None);

    let mut scanner = BackupProgress::new(Some(10.0));
    assert_eq!(scanner.observe(SIZE_LINE).progress, None);
}

#[test]
fn uncalibrated_volume_size_disables_the_formula() {
    let mut scanner = BackupProgress::new(None);
    scanner.observe(SIZE_LINE);
    let outcome = scanner.observe(VOLUME_LINE);
    assert_eq!(outcome.progress, None);
    // Pass-through is unaffected.
    assert_eq!(outcome.passthrough.as_deref(), Some(VOLUME_LINE));
}

#[test]
fn noise_lines_are_suppressed_from_passthrough() {
    let mut scanner = BackupProgress::new(None);
    assert_eq!(scanner.observe("A etc/hosts\n").passthrough, None);
    assert_eq!(scanner.observe(":: :: 42 1024\n").passthrough, None);
}

#[test]
fn noise_lines_are_still_scanned_for_markers() {
    let mut scanner = BackupProgress::new(Some(10.0));
    scanner.observe(&format!("A {SIZE_LINE}"));
    let outcome = scanner.observe(&format!("A {VOLUME_LINE}"));
    assert!(outcome.progress.is_some());
}

#[test]
fn mixed_chunks_keep_non_noise_lines() {
    let mut scanner = BackupProgress::new(None);
    let outcome = scanner.observe("A etc/hosts\nProcessed 3 files\n");
    assert_eq!(outcome.passthrough.as_deref(), Some("Processed 3 files\n"));
}

#[test]
fn clean_chunks_pass_through_verbatim() {
    let mut scanner = BackupProgress::new(None);
    let chunk = "line one\nline two"; // no trailing newline
    assert_eq!(scanner.observe(chunk).passthrough.as_deref(), Some(chunk));
}
