// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sb-engine: process supervision and output parsing for Strongbox jobs
//!
//! The engine owns the hard part of the system: spawning the external
//! archival tool per job, streaming and scraping its output, enforcing
//! at-most-one-process-per-job, and cooperative cancellation. Everything
//! user-facing sits on the other side of the [`Event`](sb_core::Event)
//! channel.

pub mod command;
pub mod config;
pub mod controller;
pub mod parse;
pub mod supervisor;

pub use command::Invocation;
pub use config::EngineConfig;
pub use controller::JobController;
pub use parse::ParseError;
pub use supervisor::{ProcessEvent, SpawnSpec, SupervisorHandle};
