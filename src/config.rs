// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Host configuration: the admission policy and the initial reset level.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::PolicySpec;

/// Environment variable naming the config file when no CLI argument is given.
pub const CONFIG_ENV: &str = "ATTACHSTAGE_CONFIG";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    pub policy: PolicySpec,
    pub reset_signal: bool,
}

impl HostConfig {
    /// Parse and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: HostConfig = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        config
            .policy
            .validate()
            .with_context(|| format!("Invalid policy in {:?}", path))?;
        Ok(config)
    }

    /// Load from the first CLI argument, else `ATTACHSTAGE_CONFIG`, else defaults.
    pub fn load(arg: Option<PathBuf>) -> Result<Self> {
        let path = arg.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }
}
