// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Attachment staging engine with an egui host.
//!
//! A selection of local files is validated against a [`models::PolicySpec`]
//! as a whole, deduplicated by name within the current reset epoch, encoded
//! to base64 concurrently, and merged into an ordered
//! [`models::AttachmentSet`] that the host reads as JSON. The engine lives in
//! [`logic::StagingEngine`]; [`mvu`] and [`ui`] wire it into a desktop shell.

pub mod config;
pub mod error;
pub mod logging;
pub mod logic;
pub mod models;
pub mod mvu;
pub mod ui;
pub mod utils;
