//! # Segment Writer
//!
//! Writes one memtable's ordered contents to an immutable `.sst` segment.
//!
//! ## Record Format
//!
//! ```text
//! repeated: key_len(u32 LE) | key bytes | payload_len(u32 LE) | payload
//! ```
//!
//! The payload is the entry codec's output. Records appear in ascending key
//! order. No header, no footer, no checksum.
//!
//! ## Crash Safety
//!
//! Data goes to a `.sst.tmp` sibling first, is fsynced, and is then
//! atomically renamed to its final UUID-based `.sst` name. A crash before
//! the rename leaves no partial segment visible to readers.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::info;
use uuid::Uuid;

use kagura_core::error::{Error, Result};

/// Filename suffix for finished segments.
pub const SEGMENT_EXTENSION: &str = "sst";

/// Write `entries` (ascending key order) as a new segment in `dest_dir`,
/// returning the final path after the atomic rename.
pub fn write_segment<'a, I>(dest_dir: &Path, entries: I) -> Result<PathBuf>
where
    I: Iterator<Item = (&'a str, &'a [u8])>,
{
    fs::create_dir_all(dest_dir).map_err(|e| Error::Io {
        message: format!("could not create {}", dest_dir.display()),
        source: e,
    })?;

    let final_path = dest_dir.join(format!("{}.{}", Uuid::new_v4(), SEGMENT_EXTENSION));
    let tmp_path = final_path.with_extension("sst.tmp");

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(|e| Error::Io {
            message: format!("could not create {}", tmp_path.display()),
            source: e,
        })?;
    let mut writer = BufWriter::new(file);

    let mut count = 0u64;
    for (key, payload) in entries {
        writer.write_u32::<LittleEndian>(key.len() as u32)?;
        writer.write_all(key.as_bytes())?;
        writer.write_u32::<LittleEndian>(payload.len() as u32)?;
        writer.write_all(payload)?;
        count += 1;
    }

    let file = writer.into_inner().map_err(|e| Error::Io {
        message: format!("could not flush {}", tmp_path.display()),
        source: e.into_error(),
    })?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, &final_path).map_err(|e| Error::Io {
        message: format!(
            "could not rename {} to {}",
            tmp_path.display(),
            final_path.display()
        ),
        source: e,
    })?;

    info!(
        "flushed segment {} ({} records)",
        final_path.display(),
        count
    );
    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_segment_layout() {
        let dir = TempDir::new().unwrap();
        let records: Vec<(&str, &[u8])> = vec![("a", b"one"), ("b", b"two")];

        let path = write_segment(dir.path(), records.into_iter()).unwrap();
        assert_eq!(path.extension().unwrap(), "sst");

        let bytes = fs::read(&path).unwrap();
        // key_len | "a" | payload_len | "one"
        assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
        assert_eq!(&bytes[4..5], b"a");
        assert_eq!(&bytes[5..9], &3u32.to_le_bytes());
        assert_eq!(&bytes[9..12], b"one");
        assert_eq!(bytes.len(), 12 + 12);
    }

    #[test]
    fn test_no_tmp_file_survives() {
        let dir = TempDir::new().unwrap();
        let records: Vec<(&str, &[u8])> = vec![("k", b"v")];
        write_segment(dir.path(), records.into_iter()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().map_or(false, |ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_each_flush_gets_a_fresh_name() {
        let dir = TempDir::new().unwrap();
        let a: Vec<(&str, &[u8])> = vec![("k", b"v")];
        let b: Vec<(&str, &[u8])> = vec![("k", b"v")];
        let first = write_segment(dir.path(), a.into_iter()).unwrap();
        let second = write_segment(dir.path(), b.into_iter()).unwrap();
        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }
}
