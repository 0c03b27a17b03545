//! Core algorithms
//!
//! Each algorithm is implemented as a standalone function for composability,
//! plus a trait-based interface for the precise ranking stage.

pub mod hamming;
pub mod jaro;
pub mod nilsimsa;
pub mod normalize;

pub use hamming::*;
pub use jaro::*;
pub use nilsimsa::*;
pub use normalize::*;

/// Similarity metric used by the rescoring stage.
/// Returns a value between 0.0 (completely different) and 1.0 (identical).
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}
