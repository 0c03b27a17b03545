//! Two-stage fuzzy matcher
//!
//! A query goes through:
//!
//! ```text
//! exact short-circuit → normalize → fingerprint (cached) → length buckets
//!     → adaptive-tolerance hash prefilter → Jaro-Winkler rescoring → threshold
//! ```
//!
//! The prefilter keeps every candidate whose fingerprint score is within an
//! adaptive tolerance of the best one. If exactly one survives it is returned
//! as is; otherwise the survivors are ranked with Jaro-Winkler against the
//! raw (non-normalized) query and every candidate tied at the best score
//! is returned, provided that score clears a length-dependent threshold.
//!
//! # Example
//!
//! ```
//! use quickfuzzy::{FuzzyMatcher, MatcherOptions, MatchMode};
//!
//! let mut matcher = FuzzyMatcher::builder()
//!     .options(MatcherOptions::default().with_mode(MatchMode::Static))
//!     .data(["Київська", "Львівська", "Одеська"])
//!     .build()
//!     .unwrap();
//!
//! let found = matcher.search("Київсъка").unwrap();
//! assert!(found.contains(&"Київська".to_string()));
//! ```

use ahash::AHashSet;
use rayon::prelude::*;

use crate::algorithms::{
    fingerprint, fingerprint_similarity, Fingerprint, JaroWinkler, Normalizer, Similarity,
};
use crate::cache::QueryHashCache;
use crate::config::{ConfigError, MatchMode, MatcherOptions};
use crate::indexing::{length_tolerance, BucketIndex};
use crate::FuzzyError;

/// Queries whose normalized length is at most this skip the hash prefilter.
pub const MAX_UNHASHED_QUERY_LEN: usize = 3;

/// A precise score at or above this ends the search immediately.
pub const EARLY_ACCEPT_SCORE: f64 = 0.98;

/// Minimum precise score accepted for a query of `len` code points.
#[inline]
#[must_use]
pub fn acceptance_threshold(len: usize) -> f64 {
    match len {
        0..=4 => 0.90,
        5..=8 => 0.85,
        _ => 0.80,
    }
}

/// JavaScript-style `Math.round`: halves round towards +∞.
#[inline]
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Adaptive fingerprint tolerance for a normalized query.
///
/// `max(min, round(base - log2(len + 1) * length_penalty + (1 - unique_ratio) * entropy_boost))`
/// where `unique_ratio` is distinct code points over total code points. Short
/// and repetitive queries get a wider band than long, diverse ones.
#[must_use]
pub fn hash_tolerance(options: &MatcherOptions, normalized: &str) -> f64 {
    let len = normalized.chars().count();
    let unique_ratio = if len == 0 {
        1.0
    } else {
        normalized.chars().collect::<AHashSet<char>>().len() as f64 / len as f64
    };
    let raw = options.hash_base_tolerance
        - ((len + 1) as f64).log2() * options.hash_length_penalty
        + (1.0 - unique_ratio) * options.hash_entropy_boost;
    options.hash_min_tolerance.max(round_half_up(raw))
}

/// Keep every candidate scoring within `tolerance` of the best score.
///
/// The surviving set does not depend on the order of `scored`; survivors keep
/// their relative order.
#[must_use]
pub fn hash_prefilter<'a>(scored: &[(&'a str, i32)], tolerance: f64) -> Vec<&'a str> {
    let Some(best) = scored.iter().map(|&(_, score)| score).max() else {
        return Vec::new();
    };
    scored
        .iter()
        .filter(|&&(_, score)| f64::from(best - score) <= tolerance)
        .map(|&(text, _)| text)
        .collect()
}

// ============================================================================
// Outcome
// ============================================================================

/// Stage at which a search was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    /// The explicit candidate list contained the query verbatim
    ExactCandidate,
    /// The index contained the query verbatim
    ExactIndexed,
    /// The hash prefilter left a single candidate
    HashUnique,
    /// A candidate scored at least [`EARLY_ACCEPT_SCORE`]
    NearExact,
    /// Best-scoring candidates after rescoring
    Rescored,
    /// Nothing left to score
    NoCandidates,
    /// Best precise score was under the acceptance threshold
    BelowThreshold,
}

/// Result of [`FuzzyMatcher::search_detailed`]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Matched corpus strings; empty when there is no match
    pub matches: Vec<String>,
    /// Best Jaro-Winkler score, when rescoring ran
    pub score: Option<f64>,
    pub stage: MatchStage,
}

impl SearchOutcome {
    fn found(matches: Vec<&str>, score: Option<f64>, stage: MatchStage) -> Self {
        Self {
            matches: matches.into_iter().map(str::to_string).collect(),
            score,
            stage,
        }
    }

    fn none(score: Option<f64>, stage: MatchStage) -> Self {
        Self {
            matches: Vec::new(),
            score,
            stage,
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        !self.matches.is_empty()
    }

    /// `None` for a no-match, otherwise the non-empty match list.
    #[must_use]
    pub fn into_matches(self) -> Option<Vec<String>> {
        if self.matches.is_empty() {
            None
        } else {
            Some(self.matches)
        }
    }
}

// ============================================================================
// Matcher
// ============================================================================

/// Fuzzy matcher owning its index, query cache and options.
///
/// `search` takes `&mut self`: it refreshes the query cache and, in
/// [`MatchMode::Dynamic`], may insert explicitly listed candidates into the
/// index. Use [`crate::ThreadSafeMatcher`] to share one across threads.
#[derive(Debug)]
pub struct FuzzyMatcher {
    options: MatcherOptions,
    normalizer: Normalizer,
    scorer: JaroWinkler,
    index: BucketIndex,
    query_cache: QueryHashCache,
}

/// Builder for [`FuzzyMatcher`]
#[derive(Debug, Default)]
pub struct MatcherBuilder {
    options: MatcherOptions,
    data: Option<Vec<String>>,
    index: Option<BucketIndex>,
}

impl MatcherBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn options(mut self, options: MatcherOptions) -> Self {
        self.options = options;
        self
    }

    /// Seed corpus, fingerprinted at build time.
    #[must_use]
    pub fn data<I, S>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data
            .get_or_insert_with(Vec::new)
            .extend(data.into_iter().map(Into::into));
        self
    }

    /// Prebuilt index. Its fingerprints must come from the same normalization
    /// options as the matcher's.
    #[must_use]
    pub fn index(mut self, index: BucketIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Validate the options and build the matcher.
    pub fn build(self) -> Result<FuzzyMatcher, FuzzyError> {
        self.options.validate()?;
        if self.options.mode == MatchMode::Static && self.data.is_none() && self.index.is_none() {
            return Err(ConfigError::MissingStaticData.into());
        }

        let mut matcher = FuzzyMatcher {
            normalizer: Normalizer::new(self.options.normalization)?,
            scorer: JaroWinkler::new(),
            index: self.index.unwrap_or_default(),
            query_cache: QueryHashCache::new(self.options.max_query_cache),
            options: self.options,
        };
        if let Some(data) = self.data {
            matcher.set_data(&data);
        }
        Ok(matcher)
    }
}

impl FuzzyMatcher {
    #[must_use]
    pub fn builder() -> MatcherBuilder {
        MatcherBuilder::new()
    }

    /// Empty matcher; fails for static mode, which needs a corpus.
    pub fn new(options: MatcherOptions) -> Result<Self, FuzzyError> {
        Self::builder().options(options).build()
    }

    /// Matcher seeded with `data`.
    pub fn with_data<I, S>(options: MatcherOptions, data: I) -> Result<Self, FuzzyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().options(options).data(data).build()
    }

    /// Fingerprint of `text` under this matcher's normalization.
    #[must_use]
    pub fn fingerprint_of(&self, text: &str) -> Fingerprint {
        fingerprint(&self.normalizer.normalize(text))
    }

    /// Bulk-load corpus strings. Strings already present get a fresh fingerprint.
    pub fn set_data<S: AsRef<str>>(&mut self, data: &[S]) {
        let mut added = 0usize;
        for text in data {
            let text = text.as_ref();
            let fp = self.fingerprint_of(text);
            if self.index.insert(text, fp) {
                added += 1;
            }
        }
        tracing::debug!(count = data.len(), added, total = self.index.len(), "indexed corpus strings");
    }

    /// Same as [`set_data`](Self::set_data), fingerprinting in parallel.
    pub fn set_data_parallel<S: AsRef<str> + Sync>(&mut self, data: &[S]) {
        let normalizer = &self.normalizer;
        let hashed: Vec<(&str, Fingerprint)> = data
            .par_iter()
            .map(|text| {
                let text = text.as_ref();
                (text, fingerprint(&normalizer.normalize(text)))
            })
            .collect();
        self.index.extend(hashed);
        tracing::debug!(count = data.len(), total = self.index.len(), "indexed corpus strings in parallel");
    }

    /// Best matches for `query` in the indexed corpus, or `None`.
    pub fn search(&mut self, query: &str) -> Option<Vec<String>> {
        self.run(query, None).into_matches()
    }

    /// Best matches for `query` among `candidates` only, or `None`.
    pub fn search_in<S: AsRef<str>>(&mut self, query: &str, candidates: &[S]) -> Option<Vec<String>> {
        let list: Vec<&str> = candidates.iter().map(AsRef::as_ref).collect();
        self.run(query, Some(&list)).into_matches()
    }

    /// Like [`search`](Self::search)/[`search_in`](Self::search_in) but reports
    /// the deciding stage and best score.
    pub fn search_detailed(&mut self, query: &str, candidates: Option<&[&str]>) -> SearchOutcome {
        self.run(query, candidates)
    }

    fn run(&mut self, query: &str, candidates: Option<&[&str]>) -> SearchOutcome {
        let outcome = self.run_stages(query, candidates);
        tracing::debug!(
            query,
            stage = ?outcome.stage,
            score = ?outcome.score,
            matches = outcome.matches.len(),
            "search finished"
        );
        outcome
    }

    fn run_stages(&mut self, query: &str, candidates: Option<&[&str]>) -> SearchOutcome {
        match candidates {
            Some(list) if list.contains(&query) => {
                return SearchOutcome::found(vec![query], None, MatchStage::ExactCandidate);
            }
            None if self.index.contains(query) => {
                return SearchOutcome::found(vec![query], None, MatchStage::ExactIndexed);
            }
            _ => {}
        }

        let normalized = self.normalizer.normalize(query);
        let normalized_len = normalized.chars().count();
        let query_len = query.chars().count();

        if normalized_len <= MAX_UNHASHED_QUERY_LEN {
            let pool: Vec<&str> = match candidates {
                Some(list) => list.to_vec(),
                None => self.index.iter().map(|(text, _)| text).collect(),
            };
            return self.rescore(query, query_len, &pool);
        }

        let query_fp = self
            .query_cache
            .get_or_insert_with(&normalized, || fingerprint(&normalized));
        let tolerance = hash_tolerance(&self.options, &normalized);

        let scored: Vec<(&str, i32)> = match candidates {
            Some(list) => self.score_listed(list, query_len, &query_fp),
            None => self
                .index
                .candidates_near(query_len, self.options.string_length_tolerance)
                .map(|(text, fp)| (text, fingerprint_similarity(&query_fp, fp)))
                .collect(),
        };
        let survivors = hash_prefilter(&scored, tolerance);
        tracing::debug!(
            candidates = scored.len(),
            tolerance,
            survivors = survivors.len(),
            "hash prefilter"
        );

        if let [only] = survivors.as_slice() {
            return SearchOutcome::found(vec![*only], None, MatchStage::HashUnique);
        }
        self.rescore(query, query_len, &survivors)
    }

    /// Fingerprint scores for an explicit candidate list, restricted to the
    /// length window. Unindexed candidates are hashed and inserted in dynamic
    /// mode and skipped in static mode.
    fn score_listed<'c>(
        &mut self,
        list: &[&'c str],
        query_len: usize,
        query_fp: &Fingerprint,
    ) -> Vec<(&'c str, i32)> {
        let window = length_tolerance(query_len, self.options.string_length_tolerance);
        let normalizer = &self.normalizer;
        let mut scored = Vec::with_capacity(list.len());
        for &text in list {
            if text.chars().count().abs_diff(query_len) > window {
                continue;
            }
            let fp = match self.options.mode {
                MatchMode::Dynamic => self
                    .index
                    .get_or_insert_with(text, || fingerprint(&normalizer.normalize(text))),
                MatchMode::Static => match self.index.get(text) {
                    Some(fp) => fp,
                    None => continue,
                },
            };
            scored.push((text, fingerprint_similarity(query_fp, &fp)));
        }
        scored
    }

    /// Rank `pool` against the raw query and apply the acceptance threshold.
    fn rescore(&self, query: &str, query_len: usize, pool: &[&str]) -> SearchOutcome {
        if pool.is_empty() {
            return SearchOutcome::none(None, MatchStage::NoCandidates);
        }

        let mut best_score = f64::NEG_INFINITY;
        let mut best: Vec<&str> = Vec::new();
        for &candidate in pool {
            let score = self.scorer.similarity(candidate, query);
            if score >= EARLY_ACCEPT_SCORE {
                return SearchOutcome::found(vec![candidate], Some(score), MatchStage::NearExact);
            }
            // ties use exact float equality
            if score > best_score {
                best_score = score;
                best.clear();
                best.push(candidate);
            } else if score == best_score {
                best.push(candidate);
            }
        }

        if best_score < acceptance_threshold(query_len) {
            return SearchOutcome::none(Some(best_score), MatchStage::BelowThreshold);
        }
        SearchOutcome::found(best, Some(best_score), MatchStage::Rescored)
    }

    /// Options in effect; fixed for the matcher's lifetime.
    #[must_use]
    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    #[must_use]
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    #[must_use]
    pub fn index(&self) -> &BucketIndex {
        &self.index
    }

    /// Hand over the index, e.g. to reuse its fingerprints in another matcher.
    #[must_use]
    pub fn into_index(self) -> BucketIndex {
        self.index
    }

    /// Check if `text` is indexed verbatim.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.index.contains(text)
    }

    /// Number of indexed strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn query_cache_len(&self) -> usize {
        self.query_cache.len()
    }

    pub fn clear_query_cache(&mut self) {
        self.query_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::jaro_winkler_similarity;

    const REGIONS: [&str; 8] = [
        "Київська",
        "Львівська",
        "Одеська",
        "Харківська",
        "Дніпропетровська",
        "Запорізька",
        "Вінницька",
        "Івано-Франківська",
    ];

    fn tolerant_options() -> MatcherOptions {
        MatcherOptions::default()
            .with_mode(MatchMode::Static)
            .with_max_query_cache(50)
            .with_hash_tolerance(20.0, 50.0, 1.0, 5.0)
    }

    fn regions_matcher() -> FuzzyMatcher {
        FuzzyMatcher::with_data(tolerant_options(), REGIONS).unwrap()
    }

    #[test]
    fn test_acceptance_threshold() {
        assert_eq!(acceptance_threshold(0), 0.90);
        assert_eq!(acceptance_threshold(4), 0.90);
        assert_eq!(acceptance_threshold(5), 0.85);
        assert_eq!(acceptance_threshold(8), 0.85);
        assert_eq!(acceptance_threshold(9), 0.80);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.4), 2.0);
    }

    #[test]
    fn test_hash_tolerance_defaults() {
        let opts = MatcherOptions::default();
        // 16 - log2(9) * 2 + 0 = 9.66 -> 10
        assert_eq!(hash_tolerance(&opts, "abcdefgh"), 10.0);
        // 16 - log2(9) * 2 + (1 - 1/8) * 4 = 13.16 -> 13
        assert_eq!(hash_tolerance(&opts, "aaaaaaaa"), 13.0);
        // long diverse queries fall back to the floor
        let long: String = ('a'..='z').chain('A'..='Z').chain('0'..='9').collect();
        let long = long.repeat(20);
        assert_eq!(hash_tolerance(&opts, &long), 4.0);
    }

    #[test]
    fn test_hash_tolerance_widens_for_repetition() {
        let opts = MatcherOptions::default();
        assert!(hash_tolerance(&opts, "abababab") > hash_tolerance(&opts, "abcdefgh"));
        assert!(hash_tolerance(&opts, "abcd") > hash_tolerance(&opts, "abcdefghijklmnop"));
    }

    #[test]
    fn test_prefilter_band() {
        let scored = [("a", 100), ("b", 103), ("c", 106), ("d", 90)];
        assert_eq!(hash_prefilter(&scored, 4.0), vec!["b", "c"]);
        assert_eq!(hash_prefilter(&scored, 16.0), vec!["a", "b", "c", "d"]);
        assert!(hash_prefilter(&[], 4.0).is_empty());
    }

    #[test]
    fn test_prefilter_order_independent() {
        let scored = vec![("a", 100), ("b", 103), ("c", 106), ("d", 102), ("e", 90)];
        let mut expected = hash_prefilter(&scored, 4.0);
        expected.sort_unstable();
        for rotation in 0..scored.len() {
            let mut rotated = scored.clone();
            rotated.rotate_left(rotation);
            let mut got = hash_prefilter(&rotated, 4.0);
            got.sort_unstable();
            assert_eq!(got, expected);
            rotated.reverse();
            let mut got = hash_prefilter(&rotated, 4.0);
            got.sort_unstable();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_static_requires_data() {
        let err = FuzzyMatcher::new(MatcherOptions::default().with_mode(MatchMode::Static)).unwrap_err();
        assert_eq!(err, FuzzyError::Config(ConfigError::MissingStaticData));

        let empty: [&str; 0] = [];
        assert!(FuzzyMatcher::with_data(MatcherOptions::default().with_mode(MatchMode::Static), empty).is_ok());
        assert!(FuzzyMatcher::builder()
            .options(MatcherOptions::default().with_mode(MatchMode::Static))
            .index(BucketIndex::new())
            .build()
            .is_ok());
    }

    #[test]
    fn test_invalid_options_fail_build() {
        let opts = MatcherOptions::default().with_string_length_tolerance(2.0);
        assert!(matches!(
            FuzzyMatcher::new(opts),
            Err(FuzzyError::Config(ConfigError::LengthToleranceAboveOne(_)))
        ));
    }

    #[test]
    fn test_exact_indexed() {
        let mut matcher = regions_matcher();
        for region in REGIONS {
            let outcome = matcher.search_detailed(region, None);
            assert_eq!(outcome.stage, MatchStage::ExactIndexed);
            assert_eq!(outcome.matches, vec![region.to_string()]);
        }
        assert_eq!(matcher.query_cache_len(), 0);
    }

    #[test]
    fn test_typos_resolve() {
        let mut matcher = regions_matcher();
        let typos = [
            ("Київсъка", "Київська"),
            ("Львівскa", "Львівська"),
            ("Одеьска", "Одеська"),
            ("Харківcька", "Харківська"),
            ("Днiпропетровська", "Дніпропетровська"),
        ];
        for (input, expected) in typos {
            let found = matcher.search(input).unwrap_or_default();
            assert!(found.contains(&expected.to_string()), "{input} -> {found:?}");
        }
    }

    #[test]
    fn test_unrelated_is_no_match() {
        let mut matcher = regions_matcher();
        assert_eq!(matcher.search("Неіснуюча область"), None);
        assert_eq!(matcher.search("цущзхїхї"), None);
    }

    #[test]
    fn test_explicit_candidates() {
        let mut matcher = regions_matcher();
        let outcome = matcher.search_detailed("Київська", Some(&["Київська", "Львівська"]));
        assert_eq!(outcome.stage, MatchStage::ExactCandidate);

        let found = matcher.search_in("Київсъка", &["Київська", "Львівська"]).unwrap();
        assert_eq!(found, vec!["Київська".to_string()]);

        // the rest of the corpus is ignored
        assert_eq!(matcher.search_in("Одеська", &["Київська", "Львівська"]), None);
    }

    #[test]
    fn test_static_skips_unindexed_candidates() {
        let mut matcher = regions_matcher();
        let outcome = matcher.search_detailed("Полтавська", Some(&["Полтавская"]));
        assert_eq!(outcome.stage, MatchStage::NoCandidates);
        assert!(!matcher.contains("Полтавская"));
    }

    #[test]
    fn test_dynamic_inserts_listed_candidates() {
        let mut matcher = FuzzyMatcher::new(MatcherOptions::default()).unwrap();
        assert!(matcher.is_empty());
        let found = matcher.search_in("Полтавська", &["Полтавская"]).unwrap();
        assert_eq!(found, vec!["Полтавская".to_string()]);
        assert!(matcher.contains("Полтавская"));
        // the query itself is cached, not indexed
        assert!(!matcher.contains("Полтавська"));
        assert_eq!(matcher.query_cache_len(), 1);
    }

    #[test]
    fn test_short_query_scores_whole_corpus() {
        let mut matcher = FuzzyMatcher::with_data(MatcherOptions::default(), ["xyz", "catalogue"]).unwrap();
        // "catalogue" lies outside the buckets scanned for a 3-character query
        assert!(matcher.index().candidates_near(3, 0.2).all(|(text, _)| text != "catalogue"));

        let outcome = matcher.search_detailed("cat", None);
        // only "catalogue" scores above zero against "cat" (0.844)
        assert_eq!(outcome.stage, MatchStage::BelowThreshold);
        assert!(outcome.score.is_some_and(|s| s > 0.8 && s < 0.9));
        assert_eq!(matcher.query_cache_len(), 0);
    }

    #[test]
    fn test_single_survivor_skips_rescoring() {
        let mut matcher = FuzzyMatcher::new(MatcherOptions::default()).unwrap();
        // the lone candidate would fail the precise threshold
        let outcome = matcher.search_detailed("abcdefgh", Some(&["zyxwvuts"]));
        assert_eq!(outcome.stage, MatchStage::HashUnique);
        assert_eq!(outcome.score, None);
        assert_eq!(outcome.matches, vec!["zyxwvuts".to_string()]);
    }

    #[test]
    fn test_near_exact_returns_first_hit() {
        // a band this wide keeps every candidate
        let opts = MatcherOptions::default().with_hash_tolerance(256.0, 256.0, 0.0, 0.0);
        let query = "abcdefghijklmnopqrstuvwxyz0123";
        let substituted = "abcdefghijklmnopqrstuvwxyz012X";
        let appended = "abcdefghijklmnopqrstuvwxyz01234";
        let first_score = jaro_winkler_similarity(substituted, query);
        assert!(first_score >= EARLY_ACCEPT_SCORE);
        assert!(jaro_winkler_similarity(appended, query) > first_score);

        let mut matcher = FuzzyMatcher::new(opts).unwrap();
        let outcome = matcher.search_detailed(query, Some(&[substituted, appended]));
        assert_eq!(outcome.stage, MatchStage::NearExact);
        assert_eq!(outcome.matches, vec![substituted.to_string()]);
        assert_eq!(outcome.score, Some(first_score));

        let outcome = matcher.search_detailed(query, Some(&[appended, substituted]));
        assert_eq!(outcome.stage, MatchStage::NearExact);
        assert_eq!(outcome.matches, vec![appended.to_string()]);
    }

    #[test]
    fn test_ties_are_all_returned() {
        // a band this wide keeps every candidate
        let opts = MatcherOptions::default().with_hash_tolerance(256.0, 256.0, 0.0, 0.0);
        let mut matcher = FuzzyMatcher::new(opts).unwrap();
        let outcome = matcher.search_detailed("abcdefgx", Some(&["abcdefgy", "abcdefgz"]));
        assert_eq!(outcome.stage, MatchStage::Rescored);
        assert_eq!(outcome.matches, vec!["abcdefgy".to_string(), "abcdefgz".to_string()]);
    }

    #[test]
    fn test_below_threshold_reports_score() {
        let mut matcher = FuzzyMatcher::new(MatcherOptions::default()).unwrap();
        let outcome = matcher.search_detailed("abc", Some(&["xyz"]));
        assert_eq!(outcome.stage, MatchStage::BelowThreshold);
        assert_eq!(outcome.score, Some(0.0));
        assert!(!outcome.is_match());
        assert_eq!(outcome.into_matches(), None);
    }

    #[test]
    fn test_set_data_is_idempotent() {
        let mut matcher = FuzzyMatcher::new(MatcherOptions::default()).unwrap();
        matcher.set_data(&["Одеська", "Одеська"]);
        matcher.set_data(&["Одеська"]);
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.index().get("Одеська"), Some(matcher.fingerprint_of("Одеська")));
    }

    #[test]
    fn test_parallel_load_matches_serial() {
        let mut serial = FuzzyMatcher::new(MatcherOptions::default()).unwrap();
        let mut parallel = FuzzyMatcher::new(MatcherOptions::default()).unwrap();
        serial.set_data(&REGIONS);
        parallel.set_data_parallel(&REGIONS);
        let a: Vec<_> = serial.index().entries().cloned().collect();
        let b: Vec<_> = parallel.index().entries().cloned().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_does_not_change_results() {
        let queries = ["Київсъка", "Одеьска", "цущзхїхї", "Харківcька", "Вінниця", "Київсъка"];
        let mut cached = FuzzyMatcher::with_data(tolerant_options(), REGIONS).unwrap();
        let mut uncached =
            FuzzyMatcher::with_data(tolerant_options().with_max_query_cache(0), REGIONS).unwrap();
        for q in queries {
            assert_eq!(cached.search_detailed(q, None), uncached.search_detailed(q, None));
        }
        assert_eq!(uncached.query_cache_len(), 0);
        assert!(cached.query_cache_len() > 0);
        cached.clear_query_cache();
        assert_eq!(cached.query_cache_len(), 0);
    }

    #[test]
    fn test_prebuilt_index() {
        let source = regions_matcher();
        let options = source.options().clone();
        let index = source.into_index();
        let mut rebuilt = FuzzyMatcher::builder().options(options).index(index).build().unwrap();
        assert_eq!(rebuilt.len(), REGIONS.len());
        let found = rebuilt.search("Київсъка").unwrap();
        assert!(found.contains(&"Київська".to_string()));
    }
}
