// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types shared between the staging engine and the host UI.

pub mod attachment;
pub mod policy;
pub mod raw_file;

pub use attachment::{Attachment, AttachmentSet};
pub use policy::{AllowedTypes, PolicySpec};
pub use raw_file::{ByteSource, FileSource, MemorySource, RawFile};
