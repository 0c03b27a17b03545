//! QuickFuzzy - fast fuzzy lookup of short strings
//!
//! Finds the closest corpus strings for a possibly misspelled query.
//!
//! # Features
//! - Nilsimsa locality-sensitive fingerprints as a cheap first pass
//! - Length-bucketed index so only similarly sized strings are scanned
//! - Adaptive hash tolerance tuned by query length and repetitiveness
//! - Jaro-Winkler rescoring with length-dependent acceptance thresholds
//! - LRU cache of query fingerprints
//! - Unicode normalization (NFKD, diacritics, case, symbols, whitespace)
//!
//! # Example
//!
//! ```
//! use quickfuzzy::{FuzzyMatcher, MatcherOptions};
//!
//! let mut matcher = FuzzyMatcher::with_data(
//!     MatcherOptions::default(),
//!     ["Kyiv", "Lviv", "Odesa", "Kharkiv"],
//! )
//! .unwrap();
//!
//! assert_eq!(matcher.search("Lviv"), Some(vec!["Lviv".to_string()]));
//! assert_eq!(matcher.search("Kharkov"), Some(vec!["Kharkiv".to_string()]));
//! ```

pub mod algorithms;
pub mod cache;
pub mod config;
pub mod indexing;
pub mod matcher;
pub mod threadsafe;

use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================
//
// FuzzyError (crate level)
//   ├── Config        - invalid or unparsable options, static mode without data
//   ├── Normalization - the diacritic pattern could not be compiled
//   └── Fingerprint   - malformed digest bytes or hex

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuzzyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Normalization(#[from] PatternError),

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
}

pub use algorithms::{
    compare_hex, compare_raw, fingerprint, fingerprint_bytes, fingerprint_distance,
    fingerprint_similarity, jaro_winkler_similarity, Fingerprint, FingerprintError,
    NilsimsaHasher, NormalizationOptions, Normalizer, PatternError, Similarity,
};
pub use cache::QueryHashCache;
pub use config::{ConfigError, MatchMode, MatcherOptions};
pub use indexing::{BucketIndex, IndexEntry};
pub use matcher::{FuzzyMatcher, MatchStage, MatcherBuilder, SearchOutcome};
pub use threadsafe::ThreadSafeMatcher;
