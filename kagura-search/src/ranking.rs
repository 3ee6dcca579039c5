//! Candidate merging across store tiers.

use std::collections::HashMap;

use kagura_core::error::{Error, Result};
use kagura_core::types::{Entry, Metric, QueryResult};

use crate::metric::similarity;

/// Candidate set accumulated across store tiers during a search.
///
/// Tier numbers order recency: 0 is the memtable, 1 the newest segment and
/// so on. When the same key is offered from several tiers only the newest
/// copy survives, and its tombstone state decides whether the key appears
/// in the results at all.
#[derive(Default)]
pub struct Candidates {
    best: HashMap<String, (usize, Entry)>,
}

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one tier's copy of a key.
    pub fn offer(&mut self, key: &str, tier: usize, entry: Entry) {
        match self.best.get(key) {
            Some((held, _)) if *held <= tier => {}
            _ => {
                self.best.insert(key.to_string(), (tier, entry));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// Score every live candidate against `query` and return them sorted by
    /// descending similarity. Tombstones are dropped; a stored vector whose
    /// length differs from the query's fails the whole search.
    pub fn rank(self, query: &[f64], metric: Metric) -> Result<Vec<QueryResult>> {
        let mut results = Vec::with_capacity(self.best.len());

        for (key, (_, entry)) in self.best {
            if entry.deleted {
                continue;
            }
            if entry.vector.len() != query.len() {
                return Err(Error::DimensionMismatch {
                    expected: query.len(),
                    actual: entry.vector.len(),
                });
            }
            let score = similarity(metric, &entry.vector, query);
            results.push(QueryResult {
                key,
                value: entry.value,
                score,
            });
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: &str, vector: Vec<f64>) -> Entry {
        Entry {
            value: value.to_string(),
            vector,
            deleted: false,
            timestamp: 0,
        }
    }

    fn tombstone() -> Entry {
        Entry {
            value: String::new(),
            vector: Vec::new(),
            deleted: true,
            timestamp: 0,
        }
    }

    #[test]
    fn test_newest_tier_wins() {
        let mut candidates = Candidates::new();
        candidates.offer("k", 2, entry("old", vec![1.0, 0.0]));
        candidates.offer("k", 0, entry("new", vec![1.0, 0.0]));
        candidates.offer("k", 1, entry("middle", vec![1.0, 0.0]));

        let results = candidates.rank(&[1.0, 0.0], Metric::Cosine).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, "new");
    }

    #[test]
    fn test_tombstone_masks_older_tiers() {
        let mut candidates = Candidates::new();
        candidates.offer("k", 1, entry("stale", vec![1.0, 0.0]));
        candidates.offer("k", 0, tombstone());

        let results = candidates.rank(&[1.0, 0.0], Metric::Cosine).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_sorted_descending() {
        let query = [1.0, 0.0];
        let mut candidates = Candidates::new();
        candidates.offer("far", 0, entry("far", vec![0.0, 1.0]));
        candidates.offer("near", 0, entry("near", vec![1.0, 0.1]));
        candidates.offer("exact", 0, entry("exact", vec![2.0, 0.0]));

        let results = candidates.rank(&query, Metric::Cosine).unwrap();
        let keys: Vec<_> = results.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["exact", "near", "far"]);
        assert!((results[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut candidates = Candidates::new();
        candidates.offer("k", 0, entry("v", vec![1.0, 0.0, 0.0]));

        let err = candidates.rank(&[1.0, 0.0], Metric::Cosine).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }
}
