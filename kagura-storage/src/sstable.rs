//! # SSTable
//!
//! An immutable, key-ordered segment file served through a memory map.
//!
//! Construction scans the file once and records every key together with the
//! byte offset its record starts at. Point reads binary-search that index
//! and slice the map at the stored offset — positional reads against an
//! immutable mapping, so concurrent readers never contend on a cursor.
//!
//! A truncated final record (a crash artifact upstream of the atomic
//! rename, or manual file surgery) is treated as end-of-file; complete
//! records before it stay readable.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use tracing::debug;

use kagura_core::codec::decode_entry;
use kagura_core::error::{Error, Result};
use kagura_core::types::Entry;

pub struct SSTable {
    path: PathBuf,
    mmap: Mmap,
    keys: Vec<String>,
    offsets: Vec<usize>,
}

impl SSTable {
    /// Open a segment file and build its in-memory key index.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| Error::Io {
            message: format!("could not open segment {}", path.display()),
            source: e,
        })?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::Io {
            message: format!("could not map segment {}", path.display()),
            source: e,
        })?;

        let (keys, offsets) = build_index(&mmap)?;
        debug!("opened segment {} ({} keys)", path.display(), keys.len());

        Ok(Self {
            path,
            mmap,
            keys,
            offsets,
        })
    }

    /// Point lookup. A key absent from the index costs no I/O. A tombstone
    /// is returned as present; filtering is the store's responsibility.
    pub fn get(&self, key: &str) -> Result<Option<Entry>> {
        let idx = match self.keys.binary_search_by(|k| k.as_str().cmp(key)) {
            Ok(idx) => idx,
            Err(_) => return Ok(None),
        };
        self.read_record(self.offsets[idx]).map(Some)
    }

    /// The indexed keys, in ascending order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Ordered iteration over decoded records.
    pub fn entries(&self) -> impl Iterator<Item = Result<(String, Entry)>> + '_ {
        self.keys
            .iter()
            .zip(self.offsets.iter())
            .map(move |(key, &offset)| self.read_record(offset).map(|entry| (key.clone(), entry)))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-parse the record framing at `offset` and decode its payload.
    fn read_record(&self, offset: usize) -> Result<Entry> {
        let data = &self.mmap[..];
        let mut cursor = io::Cursor::new(&data[offset..]);

        let key_len = cursor.read_u32::<LittleEndian>()? as usize;
        cursor.seek(SeekFrom::Current(key_len as i64))?;
        let payload_len = cursor.read_u32::<LittleEndian>()? as usize;

        let start = offset + cursor.position() as usize;
        let end = start + payload_len;
        if end > data.len() {
            return Err(Error::MalformedEntry {
                message: format!(
                    "record at offset {} in {} overruns the segment",
                    offset,
                    self.path.display()
                ),
            });
        }

        decode_entry(&data[start..end])
    }
}

/// Scan the raw segment, recording each key and its record start offset.
fn build_index(data: &[u8]) -> Result<(Vec<String>, Vec<usize>)> {
    let mut keys = Vec::new();
    let mut offsets = Vec::new();
    let mut pos = 0usize;

    while pos < data.len() {
        let start = pos;

        if pos + 4 > data.len() {
            break; // truncated tail
        }
        let key_len = u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap()) as usize;
        pos += 4;
        if pos + key_len > data.len() {
            break;
        }
        let key = std::str::from_utf8(&data[pos..pos + key_len])
            .map_err(|e| Error::MalformedEntry {
                message: format!("segment key at offset {} is not valid UTF-8: {}", start, e),
            })?
            .to_string();
        pos += key_len;

        if pos + 4 > data.len() {
            break;
        }
        let payload_len = u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap()) as usize;
        pos += 4;
        if pos + payload_len > data.len() {
            break;
        }
        pos += payload_len;

        keys.push(key);
        offsets.push(start);
    }

    Ok((keys, offsets))
}
