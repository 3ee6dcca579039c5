//! # Configuration
//!
//! Configuration for a KaguraDB store instance.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::Metric;

/// Store configuration.
///
/// Transport layers may load this from a file or flags; the core only
/// consumes the resolved struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Destination directory for segment files.
    pub path: PathBuf,
    /// Distinct-key count at which the memtable flushes to a segment.
    pub memtable_size: usize,
    /// Default metric for search.
    pub metric: Metric,
    /// Identifier resolved to an embedding provider.
    pub embedding_model: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./kagura_data"),
            memtable_size: 64 * 1024,
            metric: Metric::Cosine,
            embedding_model: "hash".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DbConfig::default();
        assert_eq!(cfg.path, PathBuf::from("./kagura_data"));
        assert_eq!(cfg.memtable_size, 64 * 1024);
        assert_eq!(cfg.metric, Metric::Cosine);
        assert_eq!(cfg.embedding_model, "hash");
    }

    #[test]
    fn test_metric_serde_names() {
        let cfg = DbConfig {
            metric: Metric::L2,
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"l2\""));
        let back: DbConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.metric, Metric::L2);
    }
}
