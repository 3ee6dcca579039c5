//! # KaguraDB Core
//!
//! This crate provides the fundamental building blocks for KaguraDB:
//! - Core data structures (entries, metrics, search results)
//! - The persistent entry codec
//! - Error types
//! - Configuration
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   kagura-core                   │
//! ├─────────────────────────────────────────────────┤
//! │  • types      - Entries, metrics, results      │
//! │  • codec      - On-disk entry layout           │
//! │  • error      - Error handling                 │
//! │  • config     - Store configuration            │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::DbConfig;
pub use error::{Error, Result};
pub use types::{Entry, Metric, QueryResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
