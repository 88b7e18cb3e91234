// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! All-or-nothing admission of a selection batch.

use crate::error::{Result, StagingError};
use crate::logic::policy::check_file;
use crate::logic::registry::NameRegistry;
use crate::models::{PolicySpec, RawFile};

/// Run every file through the policy in selection order; the first failure rejects the batch.
pub fn validate_batch(selection: &[RawFile], policy: &PolicySpec) -> Result<()> {
    for file in selection {
        check_file(&file.name, &file.declared_content_type, file.size, policy)?;
    }
    Ok(())
}

/// Policy check, then deduplication, then the capacity check on the fresh files.
///
/// Returns the fresh files without claiming them; the caller claims once it
/// commits to the batch. An empty result means every name was already claimed.
pub fn admit_batch(
    selection: &[RawFile],
    current_count: usize,
    registry: &NameRegistry,
    policy: &PolicySpec,
) -> Result<Vec<RawFile>> {
    validate_batch(selection, policy)?;

    let fresh = registry.fresh(selection);
    if !fresh.is_empty() && fresh.len() + current_count > policy.max_files {
        return Err(StagingError::CapacityExceeded {
            limit: policy.max_files,
        });
    }
    Ok(fresh)
}
