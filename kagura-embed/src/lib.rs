//! # Embedding Providers
//!
//! The store consumes one capability: map a text string to a fixed-length
//! vector of 64-bit floats, or fail. Remote providers (OpenAI, NVIDIA, a
//! local inference runtime) live in the transport layer and plug in through
//! the [`Embedder`] trait; this crate ships the trait plus two offline
//! providers — a deterministic token-hash embedder and a constant-vector
//! mock for tests.

mod fixed;
mod hash;

pub use fixed::FixedEmbedder;
pub use hash::HashEmbedder;

use std::sync::Arc;

use kagura_core::error::{Error, Result};

/// Trait for embedding text into vectors.
///
/// Implementations are synchronous and blocking; the store calls `embed`
/// on the caller's thread, outside its own lock.
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// Vector length produced by this provider. Constant across calls.
    fn dimensions(&self) -> usize;

    /// Embed a single text string.
    fn embed(&self, text: &str) -> Result<Vec<f64>>;
}

/// Resolve an embedding model identifier from the configuration to a
/// provider. Identifiers the core cannot serve offline must be resolved by
/// the transport layer instead.
pub fn resolve(model: &str) -> Result<Arc<dyn Embedder>> {
    match model {
        "hash" => Ok(Arc::new(HashEmbedder::default())),
        other => Err(Error::Configuration {
            message: format!("embedding model {:?} is not supported", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_hash() {
        let embedder = resolve("hash").unwrap();
        assert_eq!(embedder.dimensions(), HashEmbedder::DEFAULT_DIMENSIONS);
    }

    #[test]
    fn test_resolve_unknown_model() {
        let err = resolve("openai").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
