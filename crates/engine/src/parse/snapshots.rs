// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot-listing output parser.

use super::ParseError;
use sb_core::StatusRecord;

/// Field separator in the tool's snapshot table.
const FIELD_SEP: &str = "  ";

/// Parse the full stdout of a snapshot-listing run into a status record.
///
/// The first two lines are headers; trailing blank lines are ignored.
/// Each remaining line is `id  timestamp  ...` with fields separated by
/// two consecutive spaces. Zero snapshots yield an explicitly empty
/// record, not an error.
pub fn parse_snapshots(stdout: &str) -> Result<StatusRecord, ParseError> {
    let lines: Vec<&str> = stdout.lines().collect();
    let mut body: &[&str] = if lines.len() > 2 { &lines[2..] } else { &[] };
    while let Some((last, rest)) = body.split_last() {
        if last.trim().is_empty() {
            body = rest;
        } else {
            break;
        }
    }

    let (Some(first), Some(last)) = (body.first(), body.last()) else {
        return Ok(StatusRecord::empty());
    };

    Ok(StatusRecord {
        snapshot_count: body.len() as u64,
        chain_start: Some(timestamp_field(0, first)?.to_string()),
        chain_end: Some(timestamp_field(body.len() - 1, last)?.to_string()),
        ..StatusRecord::empty()
    })
}

fn timestamp_field<'a>(line: usize, text: &'a str) -> Result<&'a str, ParseError> {
    text.split(FIELD_SEP)
        .nth(1)
        .ok_or_else(|| ParseError::MalformedSnapshotLine {
            line,
            text: text.to_string(),
        })
}

#[cfg(test)]
#[path = "snapshots_tests.rs"]
mod tests;
