// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-listing output parser.

use sb_core::FileTreeEntry;

/// Sentinel directory for entries with no path separator.
pub const ROOT_DIR: &str = ".";

/// Parse the full stdout of a listing run into tree entries.
///
/// The first line is the tool's header and is skipped; blank lines carry
/// no entry. Ordering and duplicates are preserved as produced. An empty
/// listing yields an empty vec, not an error.
pub fn parse_file_listing(stdout: &str) -> Vec<FileTreeEntry> {
    stdout
        .lines()
        .skip(1)
        .filter(|line| !line.is_empty())
        .map(|line| match line.rfind('/') {
            Some(idx) => FileTreeEntry {
                path: line.to_string(),
                dir: line[..idx].to_string(),
                name: line[idx + 1..].to_string(),
            },
            None => FileTreeEntry {
                path: line.to_string(),
                dir: ROOT_DIR.to_string(),
                name: line.to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
