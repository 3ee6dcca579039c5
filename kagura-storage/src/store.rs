//! # Store
//!
//! The multi-tier coordinator: one mutable memtable over a newest-first
//! list of immutable segments, plus the embedding capability, behind a
//! single reader-writer lock.
//!
//! Writers (put, delete, flush) hold the write lock across the skip-list
//! mutation and the flush decision; readers (get, search, exists) hold the
//! read lock. Embeddings are computed before the lock is taken — the vector
//! is just an input to the insert, so correctness is unaffected and writers
//! never serialize on provider latency.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use tracing::info;

use kagura_core::codec::decode_entry;
use kagura_core::error::{Error, Result};
use kagura_core::types::{Entry, Metric, QueryResult};
use kagura_embed::Embedder;
use kagura_search::Candidates;

use crate::memtable::Memtable;
use crate::meta;
use crate::segment::SEGMENT_EXTENSION;
use crate::sstable::SSTable;

pub struct Store {
    tiers: RwLock<Tiers>,
    dest_dir: PathBuf,
    embedder: Arc<dyn Embedder>,
    dimension: usize,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("dest_dir", &self.dest_dir)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

/// Everything the lock guards: the write buffer and the segment list,
/// index 0 newest.
struct Tiers {
    memtable: Memtable,
    sstables: Vec<SSTable>,
}

impl Store {
    /// Open a store in `dest_dir`, creating the directory if needed and
    /// indexing any segments already present (newest first, by file
    /// modification time). The embedder's dimensionality is persisted on
    /// first open and must match on every later one.
    pub fn open(
        dest_dir: impl AsRef<Path>,
        capacity: usize,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let dest_dir = dest_dir.as_ref().to_path_buf();

        if capacity == 0 {
            return Err(Error::Configuration {
                message: "memtable capacity must be at least 1".to_string(),
            });
        }

        fs::create_dir_all(&dest_dir).map_err(|e| Error::Io {
            message: format!("could not create store directory {}", dest_dir.display()),
            source: e,
        })?;

        let dimension = embedder.dimensions();
        match meta::read_dimension(&dest_dir)? {
            Some(persisted) if persisted != dimension => {
                return Err(Error::DimensionMismatch {
                    expected: persisted,
                    actual: dimension,
                });
            }
            Some(_) => {}
            None => meta::write_dimension(&dest_dir, dimension)?,
        }

        let sstables = open_existing_segments(&dest_dir)?;
        info!(
            "opened store at {} ({} segments, dimension {})",
            dest_dir.display(),
            sstables.len(),
            dimension
        );

        Ok(Self {
            tiers: RwLock::new(Tiers {
                memtable: Memtable::new(capacity),
                sstables,
            }),
            dest_dir,
            embedder,
            dimension,
        })
    }

    /// Embed `value` and insert it under `key`. A capacity flush triggered
    /// by this insert registers its segment before the lock is released, so
    /// the write is never invisible.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let vector = self.embed(value)?;
        let entry = Entry::new(value, vector);

        let mut tiers = self.tiers.write();
        if let Some(path) = tiers.memtable.put(key, &entry, &self.dest_dir)? {
            let segment = SSTable::open(path)?;
            tiers.sstables.insert(0, segment);
        }
        Ok(())
    }

    /// Return the live entry for `key`. The first hit walking memtable then
    /// segments newest-to-oldest decides: a tombstone there masks every
    /// older tier.
    pub fn get(&self, key: &str) -> Result<Entry> {
        let tiers = self.tiers.read();

        if let Some(entry) = tiers.memtable.get(key)? {
            return live(key, entry);
        }

        for segment in &tiers.sstables {
            if let Some(entry) = segment.get(key)? {
                return live(key, entry);
            }
        }

        Err(Error::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Get semantics without returning the value.
    pub fn exists(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(Error::KeyNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Write a tombstone for `key`. Deleting a key that does not exist (or
    /// is already tombstoned) fails with `KeyNotFound`.
    pub fn delete(&self, key: &str) -> Result<()> {
        if !self.exists(key)? {
            return Err(Error::KeyNotFound {
                key: key.to_string(),
            });
        }

        let tombstone = Entry::tombstone();
        let mut tiers = self.tiers.write();
        if let Some(path) = tiers.memtable.put(key, &tombstone, &self.dest_dir)? {
            let segment = SSTable::open(path)?;
            tiers.sstables.insert(0, segment);
        }
        Ok(())
    }

    /// Score every live entry in every tier against the embedded query and
    /// return the full list sorted by descending similarity. Duplicate keys
    /// deduplicate to their newest-tier copy.
    pub fn search(&self, query: &str, metric: Metric) -> Result<Vec<QueryResult>> {
        let query_vector = self.embed(query)?;

        let tiers = self.tiers.read();
        let mut candidates = Candidates::new();

        for (key, payload) in tiers.memtable.iter() {
            candidates.offer(key, 0, decode_entry(payload)?);
        }

        for (depth, segment) in tiers.sstables.iter().enumerate() {
            for record in segment.entries() {
                let (key, entry) = record?;
                candidates.offer(&key, depth + 1, entry);
            }
        }

        candidates.rank(&query_vector, metric)
    }

    /// Flush the memtable to a new segment if it holds anything.
    pub fn flush(&self) -> Result<()> {
        let mut tiers = self.tiers.write();
        if tiers.memtable.is_empty() {
            return Ok(());
        }

        let path = tiers.memtable.flush(&self.dest_dir)?;
        tiers.memtable.clear();
        let segment = SSTable::open(path)?;
        tiers.sstables.insert(0, segment);
        Ok(())
    }

    /// Vector length this store was created with.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Current distinct-key count in the memtable.
    pub fn memtable_len(&self) -> usize {
        self.tiers.read().memtable.len()
    }

    /// Number of open segments.
    pub fn segment_count(&self) -> usize {
        self.tiers.read().sstables.len()
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let vector = self.embedder.embed(text)?;
        if vector.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(vector)
    }
}

fn live(key: &str, entry: Entry) -> Result<Entry> {
    if entry.deleted {
        Err(Error::KeyNotFound {
            key: key.to_string(),
        })
    } else {
        Ok(entry)
    }
}

/// Index the segments already in `dest_dir`, newest first by modification
/// time. UUID filenames carry no ordering; during operation segments are
/// registered explicitly at flush, so this runs only at open.
fn open_existing_segments(dest_dir: &Path) -> Result<Vec<SSTable>> {
    let mut found: Vec<(SystemTime, PathBuf)> = Vec::new();

    let dirents = fs::read_dir(dest_dir).map_err(|e| Error::Io {
        message: format!("could not read store directory {}", dest_dir.display()),
        source: e,
    })?;
    for dirent in dirents {
        let dirent = dirent.map_err(|e| Error::Io {
            message: format!("could not read store directory {}", dest_dir.display()),
            source: e,
        })?;
        let path = dirent.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SEGMENT_EXTENSION) {
            continue;
        }
        let modified = dirent
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        found.push((modified, path));
    }

    found.sort_by(|a, b| b.0.cmp(&a.0));
    found
        .into_iter()
        .map(|(_, path)| SSTable::open(path))
        .collect()
}
