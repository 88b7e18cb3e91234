// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Concurrent base64 encoding of an admitted batch.
//!
//! One scoped thread per file reads its bytes and encodes them; results are
//! funneled back over a channel tagged with their selection index, so the
//! batch is reassembled in selection order no matter which read finishes
//! first. Nothing is merged until every task has reported.

use std::thread;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::{debug, warn};

use crate::error::{Result, StagingError};
use crate::models::{Attachment, AttachmentSet, RawFile};

/// Read and encode a single file.
pub fn encode_file(file: &RawFile) -> Result<Attachment> {
    let bytes = file
        .source
        .read_bytes()
        .map_err(|err| StagingError::DecodeFailed {
            name: file.name.clone(),
            reason: err.to_string(),
        })?;
    Ok(Attachment::new(
        file.name.clone(),
        file.declared_content_type.clone(),
        STANDARD.encode(bytes),
    ))
}

/// Encode every file concurrently and return the attachments in selection order.
///
/// Waits for all tasks. When any task fails, the error of the earliest failed
/// file in selection order is returned and no attachment is produced.
pub fn encode_batch(files: &[RawFile]) -> Result<Vec<Attachment>> {
    let (tx, rx) = crossbeam_channel::unbounded::<(usize, Result<Attachment>)>();

    thread::scope(|scope| {
        for (index, file) in files.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                let _ = tx.send((index, encode_file(file)));
            });
        }
    });
    drop(tx);

    let mut slots: Vec<Option<Result<Attachment>>> = files.iter().map(|_| None).collect();
    for (index, result) in rx.iter() {
        slots[index] = Some(result);
    }

    let mut encoded = Vec::with_capacity(files.len());
    for (file, slot) in files.iter().zip(slots) {
        match slot {
            Some(Ok(attachment)) => encoded.push(attachment),
            Some(Err(err)) => {
                warn!(file = %file.name, error = %err, "encoding failed; dropping batch");
                return Err(err);
            }
            None => {
                return Err(StagingError::DecodeFailed {
                    name: file.name.clone(),
                    reason: "encoder task did not report".into(),
                });
            }
        }
    }
    debug!(count = encoded.len(), "batch encoded");
    Ok(encoded)
}

/// Encode `fresh` and append it to a copy of `current`.
///
/// On failure `current` is untouched and the error names the failed file.
pub fn encode_and_merge(fresh: &[RawFile], current: &AttachmentSet) -> Result<AttachmentSet> {
    let encoded = encode_batch(fresh)?;
    Ok(current.appended(encoded))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::models::{ByteSource, RawFile};

    /// Returns its bytes after a delay, to shuffle completion order.
    pub struct SlowSource {
        pub delay: Duration,
        pub bytes: Vec<u8>,
    }

    impl ByteSource for SlowSource {
        fn read_bytes(&self) -> io::Result<Vec<u8>> {
            thread::sleep(self.delay);
            Ok(self.bytes.clone())
        }
    }

    /// Always fails to read.
    pub struct BrokenSource;

    impl ByteSource for BrokenSource {
        fn read_bytes(&self) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    pub fn slow(name: &str, millis: u64, bytes: &[u8]) -> RawFile {
        let source = SlowSource {
            delay: Duration::from_millis(millis),
            bytes: bytes.to_vec(),
        };
        RawFile::new(name, "application/pdf", bytes.len() as u64, Arc::new(source))
    }

    pub fn broken(name: &str) -> RawFile {
        RawFile::new(name, "application/pdf", 1, Arc::new(BrokenSource))
    }
}
