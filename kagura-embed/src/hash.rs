//! Deterministic token-hash embedder.
//!
//! Feature hashing over lowercase alphanumeric tokens: each token's FNV-1a
//! hash selects a bucket and a sign, and the accumulated vector is
//! L2-normalized. Texts sharing tokens land near each other under cosine,
//! which is enough for an offline default and for exercising the search
//! path without a model.

// Bucket indices are reduced modulo the dimension count.
#![allow(clippy::cast_possible_truncation)]

use kagura_core::error::Result;

use crate::Embedder;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic local embedding provider.
#[derive(Debug)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub const DEFAULT_DIMENSIONS: usize = 64;

    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

fn fnv1a(token: &str) -> u64 {
    let mut hash = FNV_OFFSET;
    for byte in token.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

impl Embedder for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let mut vector = vec![0.0f64; self.dimensions];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(&token.to_lowercase());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for elem in &mut vector {
                *elem /= norm;
            }
        }

        Ok(vector)
    }
}
