// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface specs: help text, version, argument validation.

use crate::prelude::*;

#[test]
fn sb_help_shows_usage_and_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("backup")
        .stdout_has("restore-tree")
        .stdout_has("restore-file")
        .stdout_has("ls")
        .stdout_has("snapshots");
}

#[test]
fn sb_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn missing_jobs_file_is_reported_with_its_path() {
    cli()
        .args(&["--jobs", "/nonexistent/jobs.toml", "backup", "home"])
        .fails()
        .stderr_has("/nonexistent/jobs.toml");
}

#[test]
fn unknown_job_name_lists_the_known_jobs() {
    let temp = Workspace::empty();
    let tool = temp.tool("true");
    let jobs = temp.jobs(&tool);
    temp.sb(&jobs)
        .args(&["backup", "ghost"])
        .fails()
        .stderr_has("ghost")
        .stderr_has("home");
}

#[test]
fn restore_requires_a_destination() {
    let temp = Workspace::empty();
    let tool = temp.tool("true");
    let jobs = temp.jobs(&tool);
    temp.sb(&jobs).args(&["restore-tree", "home"]).fails();
}
