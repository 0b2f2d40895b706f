//! The file splitter: memory-maps a candidate file and picks a midpoint on a line boundary.

use crate::error::{NgpError, Result};
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

/// The file currently in flight through the scan pipeline.
///
/// The mapping is private (copy-on-write), which is what lets future revisions terminate lines
/// in place without touching the file on disk; this implementation does not perform that
/// mutation (see the design notes), but keeps the private mapping for parity with the original
/// access pattern.
pub struct MappedFile {
    mmap: Mmap,
    pub path: String,
    /// Byte offset where the second half begins; always the start of a line, or `len()` if the
    /// file has no newline.
    pub midpoint: usize,
    /// Line number at which the second half begins, 1-based. Published by worker 0 once its
    /// half is fully scanned; read by the collator after both workers finish.
    pub midline: AtomicU32,
}

impl MappedFile {
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    pub fn first_half(&self) -> &[u8] {
        &self.mmap[..self.midpoint]
    }

    pub fn second_half(&self) -> &[u8] {
        &self.mmap[self.midpoint..]
    }
}

/// Map `path` and locate its midpoint. Returns `Ok(None)` for an empty file or any per-file
/// I/O failure that the design calls for silently skipping rather than propagating.
pub fn prepare(path: &Path) -> Result<Option<MappedFile>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("skipping {}: failed to open ({e})", path.display());
            return Ok(None);
        }
    };

    let size = match file.metadata() {
        Ok(meta) => meta.len() as usize,
        Err(e) => {
            log::warn!("skipping {}: failed to stat ({e})", path.display());
            return Ok(None);
        }
    };

    if size == 0 {
        return Ok(None);
    }

    let mmap = unsafe {
        MmapOptions::new().map_copy_read_only(&file).map_err(|e| {
            NgpError::memory_mapping(format!("failed to map {}: {e}", path.display()))
        })?
    };

    let midpoint = match memchr::memchr(b'\n', &mmap[size / 2..]) {
        Some(offset) => (size / 2 + offset + 1).min(size),
        None => size,
    };

    Ok(Some(MappedFile {
        mmap,
        path: path.display().to_string(),
        midpoint,
        midline: AtomicU32::new(0),
    }))
}

impl MappedFile {
    pub fn midline(&self) -> u32 {
        self.midline.load(Ordering::Acquire)
    }

    pub fn set_midline(&self, value: u32) {
        self.midline.store(value, Ordering::Release);
    }
}
