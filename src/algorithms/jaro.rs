//! Jaro and Jaro-Winkler similarity implementations
//!
//! Used to rank the candidates that survive the fingerprint prefilter.
//! Jaro-Winkler gives extra weight to a common prefix, which suits names and
//! short identifiers.
//!
//! Strings are compared as sequences of Unicode code points. An empty string
//! on either side scores 0.0.
//!
//! # Performance Optimization
//!
//! When both strings are ASCII the comparison runs directly on bytes instead
//! of collecting `char` arrays.

use super::Similarity;
use smallvec::SmallVec;

// ============================================================================
// Public API
// ============================================================================

/// Jaro-Winkler similarity calculator
///
/// # Parameters
/// - `prefix_weight`: How much to boost prefix matches (0.0-0.25, typically 0.1)
/// - `max_prefix_length`: Maximum prefix length to consider (typically 4)
#[derive(Debug, Clone, PartialEq)]
pub struct JaroWinkler {
    pub prefix_weight: f64,
    pub max_prefix_length: usize,
}

impl Default for JaroWinkler {
    fn default() -> Self {
        Self {
            prefix_weight: 0.1,
            max_prefix_length: 4,
        }
    }
}

impl JaroWinkler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Similarity for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_winkler_similarity_params(a, b, self.prefix_weight, self.max_prefix_length)
    }
}

/// Calculate Jaro similarity between two strings.
/// Returns a value between 0.0 and 1.0; 0.0 if either string is empty.
#[inline]
#[must_use]
pub fn jaro_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    if a.is_ascii() && b.is_ascii() {
        return jaro_core(a.as_bytes(), b.as_bytes());
    }

    let a_chars: SmallVec<[char; 64]> = a.chars().collect();
    let b_chars: SmallVec<[char; 64]> = b.chars().collect();
    jaro_core(&a_chars, &b_chars)
}

/// Jaro over any comparable units. Both slices must be non-empty.
fn jaro_core<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    let a_len = a.len();
    let b_len = b.len();

    // Match window
    let match_distance = (a_len.max(b_len) / 2).saturating_sub(1);

    let mut a_matched: SmallVec<[bool; 64]> = smallvec::smallvec![false; a_len];
    let mut b_matched: SmallVec<[bool; 64]> = smallvec::smallvec![false; b_len];

    let mut matches = 0usize;

    for i in 0..a_len {
        let start = i.saturating_sub(match_distance);
        let end = (i + match_distance + 1).min(b_len);

        for j in start..end {
            if b_matched[j] || a[i] != b[j] {
                continue;
            }
            a_matched[i] = true;
            b_matched[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Count transpositions: matched units compared in matched order
    let mut transpositions = 0usize;
    let mut k = 0usize;
    for i in 0..a_len {
        if !a_matched[i] {
            continue;
        }
        while k < b_len && !b_matched[k] {
            k += 1;
        }
        if k >= b_len {
            break;
        }
        if a[i] != b[k] {
            transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    (m / a_len as f64 + m / b_len as f64 + (m - transpositions as f64 / 2.0) / m) / 3.0
}

/// Calculate Jaro-Winkler similarity with custom parameters.
/// `prefix_weight` is clamped to [0.0, 0.25] so the result stays in [0.0, 1.0].
#[inline]
#[must_use]
pub fn jaro_winkler_similarity_params(
    a: &str,
    b: &str,
    prefix_weight: f64,
    max_prefix_len: usize,
) -> f64 {
    let jaro_sim = jaro_similarity(a, b);

    if jaro_sim == 0.0 {
        return 0.0;
    }

    let prefix_weight = prefix_weight.clamp(0.0, 0.25);

    let prefix_len = a
        .chars()
        .zip(b.chars())
        .take(max_prefix_len)
        .take_while(|(ac, bc)| ac == bc)
        .count();

    jaro_sim + (prefix_len as f64 * prefix_weight * (1.0 - jaro_sim))
}

/// Jaro-Winkler similarity with the standard parameters (weight 0.1, prefix 4).
#[inline]
#[must_use]
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    jaro_winkler_similarity_params(a, b, 0.1, 4)
}
