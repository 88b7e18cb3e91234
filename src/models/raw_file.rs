// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Raw selections handed over by the host before validation.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::utils::guess_mime;

/// Opaque handle the encoder reads the payload through.
pub trait ByteSource: Send + Sync {
    fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

/// Reads the payload from a file on disk when the batch is encoded.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ByteSource for FileSource {
    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// Payload that is already in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl ByteSource for MemorySource {
    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// One entry of a user selection.
#[derive(Clone)]
pub struct RawFile {
    pub name: String,
    pub declared_content_type: String,
    pub size: u64,
    pub source: Arc<dyn ByteSource>,
}

impl RawFile {
    pub fn new(
        name: impl Into<String>,
        declared_content_type: impl Into<String>,
        size: u64,
        source: Arc<dyn ByteSource>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_content_type: declared_content_type.into(),
            size,
            source,
        }
    }

    /// In-memory file; size is the byte length and the content type is guessed from the name.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let bytes = bytes.into();
        let mime = guess_mime(&name);
        let size = bytes.len() as u64;
        Self::new(name, mime, size, Arc::new(MemorySource::new(bytes)))
    }

    /// Describe a file on disk. Bytes are not read until the batch is encoded.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to read metadata for {:?}", path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Path has no file name: {:?}", path))?;
        let mime = guess_mime(&name);
        Ok(Self::new(
            name,
            mime,
            metadata.len(),
            Arc::new(FileSource::new(path)),
        ))
    }
}

impl fmt::Debug for RawFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFile")
            .field("name", &self.name)
            .field("declared_content_type", &self.declared_content_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
