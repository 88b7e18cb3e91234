// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Staging engine owning the attachment set, the name registry, and the reset epoch.
//!
//! A selection is staged in two steps so the encoding can run off the
//! update path: [`StagingEngine::begin_batch`] validates, deduplicates and
//! claims names; [`StagingEngine::finish_batch`] merges the encoded result
//! (or rolls the claims back). [`StagingEngine::stage`] does both inline.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::logic::encode::{encode_and_merge, encode_batch};
use crate::logic::epoch::{EpochToken, ResetController, ResetTransition};
use crate::logic::registry::NameRegistry;
use crate::logic::validate::admit_batch;
use crate::models::{Attachment, AttachmentSet, PolicySpec, RawFile};

/// Admitted files waiting to be encoded, tied to the epoch they were claimed in.
#[derive(Clone, Debug)]
pub struct PendingBatch {
    epoch: EpochToken,
    files: Vec<RawFile>,
}

impl PendingBatch {
    pub fn epoch(&self) -> EpochToken {
        self.epoch
    }

    pub fn files(&self) -> &[RawFile] {
        &self.files
    }
}

#[derive(Debug, Default)]
pub struct StagingEngine {
    attachments: AttachmentSet,
    registry: NameRegistry,
    reset: ResetController,
    error: String,
}

impl StagingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachments(&self) -> &AttachmentSet {
        &self.attachments
    }

    /// Owned copy for the host.
    pub fn snapshot(&self) -> AttachmentSet {
        self.attachments.clone()
    }

    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    pub fn epoch(&self) -> EpochToken {
        self.reset.token()
    }

    /// Current error description; empty when none.
    pub fn error_message(&self) -> &str {
        &self.error
    }

    pub fn clear_error(&mut self) {
        self.error.clear();
    }

    /// Validate a selection and claim its fresh names.
    ///
    /// `Ok(None)` means every name was already claimed: nothing changed. A
    /// validation error leaves the set and the registry untouched and becomes
    /// the current error.
    pub fn begin_batch(
        &mut self,
        selection: &[RawFile],
        policy: &PolicySpec,
    ) -> Result<Option<PendingBatch>> {
        let fresh = match admit_batch(selection, self.attachments.len(), &self.registry, policy) {
            Ok(fresh) => fresh,
            Err(err) => {
                info!(error = %err, selected = selection.len(), "selection rejected");
                self.error = err.to_string();
                return Err(err);
            }
        };

        if fresh.is_empty() {
            debug!(selected = selection.len(), "selection holds only claimed names");
            return Ok(None);
        }

        self.registry
            .claim(fresh.iter().map(|file| file.name.as_str()));
        debug!(fresh = fresh.len(), epoch = self.epoch().value(), "batch admitted");
        Ok(Some(PendingBatch {
            epoch: self.epoch(),
            files: fresh,
        }))
    }

    /// Merge an encoded batch, or roll its claims back when encoding failed.
    ///
    /// Returns `Ok(false)` when the batch belongs to an epoch that has since
    /// been reset; such results are dropped without touching any state.
    pub fn finish_batch(
        &mut self,
        batch: PendingBatch,
        encoded: Result<Vec<Attachment>>,
    ) -> Result<bool> {
        let merged = encoded.map(|attachments| self.attachments.appended(attachments));
        self.settle(batch, merged)
    }

    /// Validate, encode and merge a selection in one call.
    ///
    /// Returns `Ok(true)` when the set changed.
    pub fn stage(&mut self, selection: &[RawFile], policy: &PolicySpec) -> Result<bool> {
        let Some(batch) = self.begin_batch(selection, policy)? else {
            return Ok(false);
        };
        let merged = encode_and_merge(batch.files(), &self.attachments);
        self.settle(batch, merged)
    }

    /// Encode a pending batch on the calling thread. Used by off-thread workers.
    pub fn encode(batch: &PendingBatch) -> Result<Vec<Attachment>> {
        encode_batch(batch.files())
    }

    fn settle(&mut self, batch: PendingBatch, merged: Result<AttachmentSet>) -> Result<bool> {
        if batch.epoch != self.epoch() {
            info!(
                batch_epoch = batch.epoch.value(),
                epoch = self.epoch().value(),
                "discarding batch from a reset epoch"
            );
            return Ok(false);
        }

        match merged {
            Ok(set) => {
                info!(added = batch.files.len(), total = set.len(), "attachments staged");
                self.attachments = set;
                self.error.clear();
                Ok(true)
            }
            Err(err) => {
                for file in &batch.files {
                    self.registry.release(&file.name);
                }
                warn!(error = %err, "batch failed to encode");
                self.error = err.to_string();
                Err(err)
            }
        }
    }

    /// Remove the attachment at `index` and free its name for this epoch.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Attachment {
        let (rest, removed) = self.attachments.without(index);
        self.attachments = rest;
        self.registry.release(&removed.name);
        self.error.clear();
        debug!(name = %removed.name, "attachment removed");
        removed
    }

    /// Feed the host's reset level. A rising edge clears the set, the
    /// registry and the error, and issues a new epoch token.
    pub fn observe_reset(&mut self, signal: bool) -> ResetTransition {
        let transition = self.reset.observe(signal);
        if let ResetTransition::Fired(token) = transition {
            self.attachments = AttachmentSet::new();
            self.registry.clear();
            self.error.clear();
            info!(epoch = token.value(), "reset fired; attachments cleared");
        }
        transition
    }
}
