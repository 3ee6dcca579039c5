//! # Entry Codec
//!
//! Fixed little-endian layout for one persisted entry. This is the payload
//! framed inside every segment record and stored opaquely in the memtable's
//! skip list.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────┬────────────┬───────────┬─────────────┬────────────┬──────────────────┐
//! │ deleted  │ timestamp  │ value_len │ value bytes │ vector_len │ vector elements  │
//! │ u8 (0/1) │ u64 LE     │ u32 LE    │ value_len   │ u32 LE     │ vector_len × f64 │
//! │          │ (ms epoch) │           │ (UTF-8)     │ (elements) │ LE               │
//! └──────────┴────────────┴───────────┴─────────────┴────────────┴──────────────────┘
//! ```
//!
//! Total size = 17 + value_len + 8 · vector_len bytes.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Error, Result};
use crate::types::Entry;

/// Bytes taken by the fixed fields: flag (1) + timestamp (8) +
/// value_len (4) + vector_len (4). Also the minimum valid buffer size.
pub const FIXED_OVERHEAD: usize = 17;

/// Exact encoded size of `entry`.
pub fn encoded_len(entry: &Entry) -> usize {
    FIXED_OVERHEAD + entry.value.len() + entry.vector.len() * 8
}

/// Serialize an entry into the fixed layout above.
pub fn encode_entry(entry: &Entry) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(encoded_len(entry));

    buf.put_u8(entry.deleted as u8);
    buf.put_u64_le(entry.timestamp as u64);
    buf.put_u32_le(entry.value.len() as u32);
    buf.put_slice(entry.value.as_bytes());
    buf.put_u32_le(entry.vector.len() as u32);
    for &elem in &entry.vector {
        buf.put_f64_le(elem);
    }

    buf.to_vec()
}

/// Deserialize an entry, validating every declared length against the
/// buffer before trusting it.
pub fn decode_entry(data: &[u8]) -> Result<Entry> {
    if data.len() < FIXED_OVERHEAD {
        return Err(Error::MalformedEntry {
            message: format!(
                "{} bytes is shorter than the {} byte minimum",
                data.len(),
                FIXED_OVERHEAD
            ),
        });
    }

    let mut buf = data;
    let deleted = buf.get_u8() != 0;
    let timestamp = buf.get_u64_le() as i64;

    let value_len = buf.get_u32_le() as usize;
    // The 4-byte vector_len field still has to fit after the value.
    if buf.remaining() < value_len + 4 {
        return Err(Error::MalformedEntry {
            message: format!(
                "declared value length {} overruns the {} remaining bytes",
                value_len,
                buf.remaining()
            ),
        });
    }
    let value = std::str::from_utf8(&buf[..value_len])
        .map_err(|e| Error::MalformedEntry {
            message: format!("value is not valid UTF-8: {}", e),
        })?
        .to_string();
    buf.advance(value_len);

    let vector_len = buf.get_u32_le() as usize;
    if buf.remaining() < vector_len * 8 {
        return Err(Error::MalformedEntry {
            message: format!(
                "declared vector length {} needs {} bytes, {} remain",
                vector_len,
                vector_len * 8,
                buf.remaining()
            ),
        });
    }
    let mut vector = Vec::with_capacity(vector_len);
    for _ in 0..vector_len {
        vector.push(buf.get_f64_le());
    }

    Ok(Entry {
        value,
        vector,
        deleted,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> Entry {
        Entry {
            value: "hello".to_string(),
            vector: vec![1.0, 2.0],
            deleted: false,
            timestamp: 42,
        }
    }

    #[test]
    fn test_roundtrip() {
        let entry = Entry {
            value: "the quick brown fox".to_string(),
            vector: vec![0.25, -1.5, 3.0e-7, f64::MAX, f64::MIN_POSITIVE],
            deleted: false,
            timestamp: 1_704_067_200_000,
        };
        let bytes = encode_entry(&entry);
        assert_eq!(bytes.len(), encoded_len(&entry));
        let recovered = decode_entry(&bytes).unwrap();
        assert_eq!(recovered, entry);
        // Floats must survive bit-exactly.
        for (a, b) in entry.vector.iter().zip(recovered.vector.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_tombstone_roundtrip() {
        let tomb = Entry {
            value: String::new(),
            vector: Vec::new(),
            deleted: true,
            timestamp: -1,
        };
        let bytes = encode_entry(&tomb);
        assert_eq!(bytes.len(), FIXED_OVERHEAD);
        let recovered = decode_entry(&bytes).unwrap();
        assert_eq!(recovered, tomb);
    }

    #[test]
    fn test_golden_layout() {
        // Entry{value: "hello", vector: [1.0, 2.0], deleted: false,
        // timestamp: 42} encodes to exactly 38 bytes:
        // 1 + 8 + 4 + 5 + 4 + 16.
        let bytes = encode_entry(&sample_entry());
        assert_eq!(bytes.len(), 38);

        assert_eq!(bytes[0], 0x00);
        assert_eq!(&bytes[1..9], &42u64.to_le_bytes());
        assert_eq!(&bytes[9..13], &5u32.to_le_bytes());
        assert_eq!(&bytes[13..18], b"hello");
        assert_eq!(&bytes[18..22], &2u32.to_le_bytes());
        assert_eq!(&bytes[22..30], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[30..38], &2.0f64.to_le_bytes());
    }

    #[test]
    fn test_short_buffer_rejected() {
        for len in 0..FIXED_OVERHEAD {
            let err = decode_entry(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, Error::MalformedEntry { .. }), "len {}", len);
        }
    }

    #[test]
    fn test_truncated_value_rejected() {
        let mut bytes = encode_entry(&sample_entry());
        // Claim a value longer than the buffer holds.
        bytes[9..13].copy_from_slice(&1000u32.to_le_bytes());
        let err = decode_entry(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedEntry { .. }));
    }

    #[test]
    fn test_truncated_vector_rejected() {
        let mut bytes = encode_entry(&sample_entry());
        // Claim more vector elements than the buffer holds.
        bytes[18..22].copy_from_slice(&3u32.to_le_bytes());
        let err = decode_entry(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedEntry { .. }));
    }

    #[test]
    fn test_negative_timestamp_roundtrip() {
        let entry = Entry {
            value: "t".to_string(),
            vector: vec![0.0],
            deleted: false,
            timestamp: -1_000,
        };
        let recovered = decode_entry(&encode_entry(&entry)).unwrap();
        assert_eq!(recovered.timestamp, -1_000);
    }
}
