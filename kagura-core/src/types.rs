//! # Core Types
//!
//! Fundamental data structures used throughout KaguraDB.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Error;

/// The value side of a record: the user-supplied text, the embedding
/// derived from it, a tombstone flag and the write timestamp.
///
/// A tombstone (`deleted == true`) shadows every older copy of its key in
/// older tiers; filtering tombstones out of reads is the store's job, not
/// the entry's.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// UTF-8 payload text.
    pub value: String,
    /// Embedding of `value`; length is fixed per store instance.
    pub vector: Vec<f64>,
    /// Tombstone flag.
    pub deleted: bool,
    /// Milliseconds since the Unix epoch at write time.
    pub timestamp: i64,
}

impl Entry {
    /// Create a live entry stamped with the current time.
    pub fn new(value: impl Into<String>, vector: Vec<f64>) -> Self {
        Self {
            value: value.into(),
            vector,
            deleted: false,
            timestamp: now_millis(),
        }
    }

    /// Create a tombstone stamped with the current time. Tombstones carry
    /// no value and no vector.
    pub fn tombstone() -> Self {
        Self {
            value: String::new(),
            vector: Vec::new(),
            deleted: true,
            timestamp: now_millis(),
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

/// Similarity metric used to score a query vector against stored vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cosine,
    Dot,
    L2,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Dot => "dot",
            Metric::L2 => "l2",
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(Metric::Cosine),
            "dot" => Ok(Metric::Dot),
            "l2" => Ok(Metric::L2),
            other => Err(Error::InvalidMetric {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub key: String,
    pub value: String,
    pub score: f64,
}
