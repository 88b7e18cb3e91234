// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Error kinds raised while staging a selection.

use thiserror::Error;

use crate::utils::format_bytes;

pub type Result<T> = std::result::Result<T, StagingError>;

/// Reasons a selection batch is refused. The `Display` text is what the host shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StagingError {
    #[error("File type of '{name}' is not allowed.")]
    TypeRejected { name: String },

    #[error("File '{name}' exceeds the maximum size of {}.", format_bytes(*.limit))]
    SizeRejected { name: String, limit: u64 },

    #[error("You can attach at most {limit} file(s).")]
    CapacityExceeded { limit: usize },

    #[error("Failed to read '{name}': {reason}")]
    DecodeFailed { name: String, reason: String },
}
