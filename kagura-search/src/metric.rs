//! Scalar distance kernels over `f64` slices.
//!
//! Callers are responsible for validating dimensions; the kernels only
//! debug-assert equal lengths.

use kagura_core::types::Metric;

/// Cosine similarity: dot(a, b) / (‖a‖ · ‖b‖).
///
/// Identical directions score 1.0, orthogonal 0.0, opposite -1.0. NaN when
/// either norm is zero.
#[inline]
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Dot product.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut sum = 0.0;
    for i in 0..a.len() {
        sum += a[i] * b[i];
    }
    sum
}

/// Euclidean (L2) distance.
#[inline]
pub fn l2(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut sum = 0.0;
    for i in 0..a.len() {
        let diff = a[i] - b[i];
        sum += diff * diff;
    }
    sum.sqrt()
}

/// Ranking score under `metric`: larger is always better. Cosine and dot
/// are already similarities; L2 distance d becomes 1 / (1 + d).
#[inline]
pub fn similarity(metric: Metric, a: &[f64], b: &[f64]) -> f64 {
    match metric {
        Metric::Cosine => cosine(a, b),
        Metric::Dot => dot(a, b),
        Metric::L2 => 1.0 / (1.0 + l2(a, b)),
    }
}
