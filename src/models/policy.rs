// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Type/size/count policy supplied by the host and its normalized type list.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Default maximum number of staged files.
pub const DEFAULT_MAX_FILES: usize = 10;
/// Default per-file size limit (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Host-supplied admission policy. Field names mirror the host's input parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySpec {
    /// Comma-separated extensions and/or MIME patterns; empty or `*` allows every type.
    pub allowed_types: String,
    pub max_files: usize,
    pub max_file_size_bytes: u64,
}

impl Default for PolicySpec {
    fn default() -> Self {
        Self {
            allowed_types: "*".into(),
            max_files: DEFAULT_MAX_FILES,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
        }
    }
}

impl PolicySpec {
    pub fn new(allowed_types: impl Into<String>, max_files: usize, max_file_size_bytes: u64) -> Self {
        Self {
            allowed_types: allowed_types.into(),
            max_files,
            max_file_size_bytes,
        }
    }

    /// Reject limits that would make every selection fail.
    pub fn validate(&self) -> Result<()> {
        if self.max_files == 0 {
            bail!("maxFiles must be greater than zero");
        }
        if self.max_file_size_bytes == 0 {
            bail!("maxFileSizeBytes must be greater than zero");
        }
        Ok(())
    }

    pub fn allowed(&self) -> AllowedTypes {
        AllowedTypes::parse(&self.allowed_types)
    }
}

/// Normalized allow-list: lowercased `.ext` entries and MIME patterns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllowedTypes {
    Any,
    Only(Vec<String>),
}

impl AllowedTypes {
    /// Split on commas, trim, lowercase, and dot-prefix bare extensions.
    ///
    /// Only a blank list allows everything. Empty entries in a non-blank list
    /// (`"pdf,,"`) normalize to `"."`, which only names ending in a dot match.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return AllowedTypes::Any;
        }

        let mut entries = Vec::new();
        for entry in raw.split(',') {
            let entry = entry.trim().to_ascii_lowercase();
            if matches!(entry.as_str(), "*" | ".*" | "*.*") {
                return AllowedTypes::Any;
            }
            if entry.contains('/') || entry.starts_with('.') {
                entries.push(entry);
            } else {
                entries.push(format!(".{entry}"));
            }
        }
        AllowedTypes::Only(entries)
    }

    pub fn contains(&self, entry: &str) -> bool {
        match self {
            AllowedTypes::Any => true,
            AllowedTypes::Only(entries) => entries.iter().any(|e| e == entry),
        }
    }
}
