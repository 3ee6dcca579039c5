//! # Database Handle
//!
//! Thin facade over [`Store`]: resolves the configured embedding model,
//! applies the configured default metric, and maps entries down to the
//! value strings clients asked for.

use std::sync::Arc;

use kagura_core::config::DbConfig;
use kagura_core::error::Result;
use kagura_core::types::{Metric, QueryResult};
use kagura_embed::{resolve, Embedder};

use crate::store::Store;

pub struct Db {
    store: Store,
    config: DbConfig,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish()
    }
}

impl Db {
    /// Open the database described by `config`, resolving its embedding
    /// model identifier to a provider.
    pub fn open(config: DbConfig) -> Result<Self> {
        let embedder = resolve(&config.embedding_model)?;
        Self::open_with(config, embedder)
    }

    /// Open with a caller-supplied embedding provider. This is the path
    /// transport layers use for providers the core cannot resolve offline.
    pub fn open_with(config: DbConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let store = Store::open(&config.path, config.memtable_size, embedder)?;
        Ok(Self { store, config })
    }

    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.store.put(key, value)
    }

    /// Return the live value for `key`, or `KeyNotFound`.
    pub fn get(&self, key: &str) -> Result<String> {
        self.store.get(key).map(|entry| entry.value)
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(key)
    }

    pub fn exists(&self, key: &str) -> Result<bool> {
        self.store.exists(key)
    }

    /// Search with the configured default metric.
    pub fn search(&self, query: &str) -> Result<Vec<QueryResult>> {
        self.store.search(query, self.config.metric)
    }

    /// Search with an explicit metric.
    pub fn search_with(&self, query: &str, metric: Metric) -> Result<Vec<QueryResult>> {
        self.store.search(query, metric)
    }

    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }
}
