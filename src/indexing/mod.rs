//! Indexing structures for candidate retrieval
//!
//! - Length buckets: corpus strings grouped by length, with their fingerprints

pub mod buckets;

pub use buckets::*;
