// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_id_display() {
    let id = JobId::new("b-1456789");
    assert_eq!(id.to_string(), "b-1456789");
}

#[test]
fn job_id_equality() {
    let id1 = JobId::new("job-1");
    let id2 = JobId::new("job-1");
    let id3 = JobId::new("job-2");

    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
    assert_eq!(id1, "job-1");
}

#[test]
fn job_id_serde() {
    let id = JobId::new("my-job");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"my-job\"");

    let parsed: JobId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn passphrase_debug_is_redacted() {
    let secret = Passphrase::new("hunter2");
    let debug = format!("{secret:?}");
    assert!(!debug.contains("hunter2"));
    assert_eq!(secret.reveal(), "hunter2");
}

#[test]
fn job_config_debug_never_shows_passphrase() {
    let config = JobConfig {
        id: JobId::new("home"),
        source_path: "/home/user".into(),
        repo_url: "sftp:backups:/srv/repo".into(),
        passphrase: Passphrase::new("hunter2"),
        title: Some("Home".into()),
    };
    let debug = format!("{config:?}");
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("sftp:backups:/srv/repo"));
}

#[test]
fn job_state_defaults_to_idle() {
    assert_eq!(JobState::default(), JobState::Idle);
    assert_eq!(JobState::Running.to_string(), "running");
}

#[test]
fn run_outcome_display() {
    assert_eq!(RunOutcome::Succeeded.to_string(), "succeeded");
    assert_eq!(RunOutcome::Cancelled.to_string(), "cancelled");
    let failed = RunOutcome::Failed {
        reason: "exit code 1".into(),
    };
    assert_eq!(failed.to_string(), "failed");
    assert!(!failed.is_success());
    assert!(RunOutcome::Cancelled.is_cancelled());
}

#[test]
fn run_outcome_serde_tag() {
    let json = serde_json::to_value(RunOutcome::Failed {
        reason: "exit code 3".into(),
    })
    .unwrap();
    assert_eq!(json["result"], "failed");
    assert_eq!(json["reason"], "exit code 3");

    let json = serde_json::to_value(RunOutcome::Succeeded).unwrap();
    assert_eq!(json["result"], "succeeded");
}
