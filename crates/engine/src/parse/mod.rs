// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scrapers for the external tool's human-readable output.
//!
//! Everything here targets one known output shape and is fragile by
//! nature. A shape mismatch degrades to "no structured signal" — the
//! affected report is withheld while raw text pass-through continues;
//! it never becomes a run failure.

pub mod listing;
pub mod progress;
pub mod snapshots;

use thiserror::Error;

/// Marker opening an error region in accumulated history text.
pub const ERROR_OPEN: &str = "<!--:error-->";
/// Marker closing an error region.
pub const ERROR_CLOSE: &str = "<!--error:-->";

/// Wrap a stderr chunk so a renderer can style the region without
/// re-parsing the history text.
pub fn tag_stderr(chunk: &str) -> String {
    format!("{ERROR_OPEN}{chunk}{ERROR_CLOSE}")
}

/// Output did not match the expected shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("snapshot line {line} has no timestamp field: {text:?}")]
    MalformedSnapshotLine { line: usize, text: String },
}
