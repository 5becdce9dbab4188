// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML jobs file: `[engine]` settings plus one `[jobs.<name>]` table per
//! job. The engine itself never reads this; job definitions become
//! [`JobConfig`] values at the CLI boundary.

use anyhow::{bail, Context, Result};
use sb_core::{JobConfig, JobId, Passphrase};
use sb_engine::EngineConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobsFile {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub jobs: BTreeMap<String, JobTable>,
}

/// One `[jobs.<name>]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobTable {
    /// Directory to back up.
    pub path: String,
    /// Repository URL.
    pub url: String,
    pub passphrase: Passphrase,
    pub title: Option<String>,
}

impl JobsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading jobs file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing jobs file {}", path.display()))
    }

    pub fn job_config(&self, name: &str) -> Result<JobConfig> {
        let Some(table) = self.jobs.get(name) else {
            bail!(
                "no job named {name:?} (known jobs: {})",
                self.job_names().join(", ")
            );
        };
        Ok(JobConfig {
            id: JobId::new(name),
            source_path: table.path.clone(),
            repo_url: table.url.clone(),
            passphrase: table.passphrase.clone(),
            title: table.title.clone(),
        })
    }

    fn job_names(&self) -> Vec<&str> {
        self.jobs.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
#[path = "jobs_file_tests.rs"]
mod tests;
