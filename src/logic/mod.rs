// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Attachment staging engine: admission, deduplication, encoding, and reset handling.

pub mod encode;
pub mod engine;
pub mod epoch;
pub mod policy;
pub mod registry;
pub mod validate;

pub use engine::{PendingBatch, StagingEngine};
pub use epoch::{EpochToken, ResetTransition};
