// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level integration specs driving the `sb` binary.


mod specs {
    mod cli;
    mod run;
}
