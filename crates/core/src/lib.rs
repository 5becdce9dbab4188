// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sb-core: domain types for the Strongbox backup job engine

pub mod macros;

pub mod action;
pub mod error;
pub mod event;
pub mod job;
pub mod report;

pub use action::Action;
pub use error::EngineError;
pub use event::{Event, StreamKind};
pub use job::{JobConfig, JobId, JobState, Passphrase, RunOutcome};
pub use report::{FileTreeEntry, Metric, ProgressSnapshot, StatusRecord};
