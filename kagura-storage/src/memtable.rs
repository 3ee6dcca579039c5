//! # Memtable
//!
//! The in-memory write buffer: a skip list of encoded entries plus a
//! logical count and a capacity threshold expressed as a count of distinct
//! keys (not bytes). Reaching the threshold flushes the buffer to a new
//! segment and clears it.
//!
//! The memtable carries no lock of its own; the store's reader-writer lock
//! is its sole synchronizer.

use std::path::{Path, PathBuf};

use tracing::debug;

use kagura_core::codec::{decode_entry, encode_entry};
use kagura_core::error::Result;
use kagura_core::types::Entry;

use crate::segment::write_segment;
use crate::skiplist::{Iter, SkipList};

pub struct Memtable {
    data: SkipList,
    capacity: usize,
}

impl Memtable {
    /// Create a memtable that flushes once `capacity` distinct keys are
    /// resident.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: SkipList::new(),
            capacity,
        }
    }

    /// Insert `entry` under `key`, overwriting in place if the key exists.
    /// If the insert fills the table to capacity, its contents (including
    /// this entry) are flushed to `dest_dir` and the table is cleared;
    /// the new segment's path is returned so the caller can register it.
    ///
    /// A failed flush leaves the table populated; the next put retries.
    pub fn put(&mut self, key: &str, entry: &Entry, dest_dir: &Path) -> Result<Option<PathBuf>> {
        let payload = encode_entry(entry);
        self.data.insert(key, payload);

        if self.data.len() >= self.capacity {
            debug!(
                "memtable reached capacity ({} keys), flushing",
                self.data.len()
            );
            let path = self.flush(dest_dir)?;
            self.clear();
            return Ok(Some(path));
        }
        Ok(None)
    }

    /// Look up `key`. A tombstone is returned as present; filtering is the
    /// store's responsibility.
    pub fn get(&self, key: &str) -> Result<Option<Entry>> {
        match self.data.search(key) {
            Some(payload) => Ok(Some(decode_entry(payload)?)),
            None => Ok(None),
        }
    }

    /// Number of distinct keys resident.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write the current contents, in key order, to a new segment file.
    /// Does not clear the table.
    pub fn flush(&self, dest_dir: &Path) -> Result<PathBuf> {
        write_segment(dest_dir, self.data.iter())
    }

    /// Replace the skip list with an empty one.
    pub fn clear(&mut self) {
        self.data = SkipList::new();
    }

    /// Iterate (key, encoded payload) pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        self.data.iter()
    }
}
