// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end run specs: a fake archival tool behind the real engine.

use crate::prelude::*;

#[test]
fn backup_streams_output_and_finishes() {
    let temp = Workspace::empty();
    let tool = temp.tool("echo archiving-now");
    let jobs = temp.jobs(&tool);
    temp.sb(&jobs)
        .args(&["backup", "home"])
        .passes()
        .stdout_has("[home] backup started")
        .stdout_has("archiving-now")
        .stdout_has("[home] finished");
}

#[test]
fn failing_tool_fails_the_run_with_its_exit_code() {
    let temp = Workspace::empty();
    let tool = temp.tool("exit 7");
    let jobs = temp.jobs(&tool);
    temp.sb(&jobs)
        .args(&["backup", "home"])
        .fails()
        .stdout_has("[home] failed: exit code 7")
        .stderr_has("exit code 7");
}

#[test]
fn tool_warnings_are_flagged_without_failing_the_run() {
    let temp = Workspace::empty();
    let tool = temp.tool("echo scary-warning 1>&2; exit 0");
    let jobs = temp.jobs(&tool);
    temp.sb(&jobs)
        .args(&["backup", "home"])
        .passes()
        .stdout_has("! scary-warning")
        .stdout_has("[home] finished");
}

#[test]
fn ls_renders_the_parsed_file_tree() {
    let temp = Workspace::empty();
    let tool = temp.tool("printf 'snapshot abc of [/home]:\\ndocs/notes.txt\\ntop.txt\\n'");
    let jobs = temp.jobs(&tool);
    temp.sb(&jobs)
        .args(&["ls", "home"])
        .passes()
        .stdout_has("2 file(s) in latest snapshot")
        .stdout_has("  docs/notes.txt")
        .stdout_has("  top.txt");
}

#[test]
fn snapshots_renders_the_chain_summary() {
    let temp = Workspace::empty();
    let tool = temp.tool(
        "printf 'ID  Time\\n----\\nid1  2024-01-01T00:00:00Z  host\\nid2  2024-02-01T00:00:00Z  host\\n'",
    );
    let jobs = temp.jobs(&tool);
    temp.sb(&jobs)
        .args(&["snapshots", "home"])
        .passes()
        .stdout_has("2 snapshot(s)")
        .stdout_has("oldest: 2024-01-01T00:00:00Z")
        .stdout_has("newest: 2024-02-01T00:00:00Z");
}

#[test]
fn the_tool_receives_argv_not_a_shell_string() {
    let temp = Workspace::empty();
    // Echo the argv back; the repo URL must arrive as one token.
    let tool = temp.tool(r#"echo "argc=$# first=$1""#);
    let jobs = temp.jobs(&tool);
    temp.sb(&jobs)
        .args(&["backup", "home"])
        .passes()
        .stdout_has("argc=4 first=backup");
}

#[test]
fn the_passphrase_reaches_the_tool_through_the_environment() {
    let temp = Workspace::empty();
    let tool = temp.tool(r#"echo "secret=$RESTIC_PASSWORD""#);
    let jobs = temp.jobs(&tool);
    temp.sb(&jobs)
        .args(&["backup", "home"])
        .passes()
        .stdout_has("secret=pw");
}
