//! Constant-vector embedder for tests and pre-computed pipelines.

use kagura_core::error::Result;

use crate::Embedder;

/// Embedder that returns the same vector for every input.
#[derive(Debug)]
pub struct FixedEmbedder {
    vector: Vec<f64>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f64>) -> Self {
        Self { vector }
    }
}

impl Embedder for FixedEmbedder {
    fn dimensions(&self) -> usize {
        self.vector.len()
    }

    fn embed(&self, _text: &str) -> Result<Vec<f64>> {
        Ok(self.vector.clone())
    }
}
