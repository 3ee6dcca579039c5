//! # KaguraDB Search
//!
//! Brute-force similarity scoring over stored vectors.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Search Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │   ┌──────────────┐            ┌──────────────────────┐      │
//! │   │   metric     │            │      ranking         │      │
//! │   │ cosine/dot/  │───score───>│  dedup across tiers, │      │
//! │   │     l2       │            │  drop tombstones,    │      │
//! │   └──────────────┘            │  sort descending     │      │
//! │                               └──────────────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every metric ranks descending: larger score means a better match. L2 is
//! a distance, so it is converted to a similarity before ranking.

pub mod metric;
pub mod ranking;

pub use metric::{cosine, dot, l2, similarity};
pub use ranking::Candidates;
