//! Matcher configuration
//!
//! [`MatcherOptions`] is fixed once a matcher is built. Invalid values are
//! rejected by [`MatcherOptions::validate`], never clamped.
//!
//! Options can be loaded from JSON using the camelCase option names:
//!
//! ```
//! use quickfuzzy::{MatcherOptions, MatchMode};
//!
//! let opts = MatcherOptions::from_json_str(r#"{"mode": "static", "ignoreCase": true}"#).unwrap();
//! assert_eq!(opts.mode, MatchMode::Static);
//! assert!(opts.normalization.ignore_case);
//! assert_eq!(opts.string_length_tolerance, 0.2);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::NormalizationOptions;

/// Errors raised while validating or loading options
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A numeric option was below zero
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// A numeric option was NaN or infinite
    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// `stringLengthTolerance` above 1
    #[error("stringLengthTolerance must be at most 1, got {0}")]
    LengthToleranceAboveOne(f64),

    /// Static mode without a corpus
    #[error("static mode requires initial data or a prebuilt index")]
    MissingStaticData,

    /// Malformed configuration document
    #[error("failed to parse options: {0}")]
    Parse(String),
}

/// Whether unknown strings may be fingerprinted during lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Corpus fixed at construction; unindexed strings are never hashed on the fly
    Static,
    /// Unindexed strings are hashed and inserted the first time they are looked up
    #[default]
    Dynamic,
}

/// Options read by every pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatcherOptions {
    pub mode: MatchMode,
    /// Capacity of the query fingerprint cache; 0 disables it
    pub max_query_cache: usize,
    /// Length window for candidates, as a fraction of the query length (0..=1)
    pub string_length_tolerance: f64,
    /// Floor of the adaptive hash tolerance
    pub hash_min_tolerance: f64,
    /// Starting point of the adaptive hash tolerance
    pub hash_base_tolerance: f64,
    /// Tolerance removed per doubling of the query length
    pub hash_length_penalty: f64,
    /// Tolerance added for repetitive (low-entropy) queries
    pub hash_entropy_boost: f64,
    #[serde(flatten)]
    pub normalization: NormalizationOptions,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::Dynamic,
            max_query_cache: 10_000,
            string_length_tolerance: 0.2,
            hash_min_tolerance: 4.0,
            hash_base_tolerance: 16.0,
            hash_length_penalty: 2.0,
            hash_entropy_boost: 4.0,
            normalization: NormalizationOptions::default(),
        }
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}

impl MatcherOptions {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check every numeric option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("stringLengthTolerance", self.string_length_tolerance)?;
        if self.string_length_tolerance > 1.0 {
            return Err(ConfigError::LengthToleranceAboveOne(
                self.string_length_tolerance,
            ));
        }
        check_non_negative("hashMinTolerance", self.hash_min_tolerance)?;
        check_non_negative("hashBaseTolerance", self.hash_base_tolerance)?;
        check_non_negative("hashLengthPenalty", self.hash_length_penalty)?;
        check_non_negative("hashEntropyBoost", self.hash_entropy_boost)?;
        Ok(())
    }

    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_max_query_cache(mut self, capacity: usize) -> Self {
        self.max_query_cache = capacity;
        self
    }

    #[must_use]
    pub fn with_string_length_tolerance(mut self, ratio: f64) -> Self {
        self.string_length_tolerance = ratio;
        self
    }

    /// Set min, base, length penalty and entropy boost in one go.
    #[must_use]
    pub fn with_hash_tolerance(mut self, min: f64, base: f64, length_penalty: f64, entropy_boost: f64) -> Self {
        self.hash_min_tolerance = min;
        self.hash_base_tolerance = base;
        self.hash_length_penalty = length_penalty;
        self.hash_entropy_boost = entropy_boost;
        self
    }

    #[must_use]
    pub fn with_normalization(mut self, normalization: NormalizationOptions) -> Self {
        self.normalization = normalization;
        self
    }
}
