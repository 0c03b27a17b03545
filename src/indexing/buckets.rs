//! Length-bucketed fingerprint index.
//!
//! Entries are partitioned by `len / BUCKET_SIZE` (length in code points), so a
//! query only scans the buckets whose lengths are close to its own. Within a
//! bucket entries keep insertion order; across buckets enumeration follows the
//! bucket key.
//!
//! # Example
//!
//! ```
//! use quickfuzzy::indexing::BucketIndex;
//! use quickfuzzy::algorithms::fingerprint;
//!
//! let mut index = BucketIndex::new();
//! index.insert("Одеська", fingerprint("Одеська"));
//! let near: Vec<_> = index.candidates_near(8, 0.2).map(|(text, _)| text).collect();
//! assert_eq!(near, vec!["Одеська"]);
//! ```

use ahash::AHashMap;

use crate::algorithms::Fingerprint;

/// Width of a bucket in code points.
pub const BUCKET_SIZE: usize = 4;

/// Smallest absolute length tolerance used by [`BucketIndex::candidates_near`].
pub const MIN_LENGTH_TOLERANCE: usize = 3;

/// Bucket key for a string of `len` code points.
#[inline]
#[must_use]
pub fn bucket_of(len: usize) -> usize {
    len / BUCKET_SIZE
}

/// Absolute length tolerance: `max(3, floor(len * ratio))`.
#[inline]
#[must_use]
pub fn length_tolerance(len: usize, ratio: f64) -> usize {
    ((len as f64 * ratio).floor() as usize).max(MIN_LENGTH_TOLERANCE)
}

/// Entry in the index
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub text: String,
    pub fingerprint: Fingerprint,
}

/// One length bucket.
///
/// `entries` keeps insertion order for enumeration; `lookup` maps a text to
/// its position for exact lookups.
#[derive(Debug, Clone, Default)]
struct Bucket {
    entries: Vec<IndexEntry>,
    lookup: AHashMap<String, usize>,
}

impl Bucket {
    fn get(&self, text: &str) -> Option<&IndexEntry> {
        self.lookup.get(text).map(|&pos| &self.entries[pos])
    }

    /// Returns `true` when the text was new.
    fn upsert(&mut self, text: &str, fingerprint: Fingerprint) -> bool {
        if let Some(&pos) = self.lookup.get(text) {
            self.entries[pos].fingerprint = fingerprint;
            return false;
        }
        self.lookup.insert(text.to_string(), self.entries.len());
        self.entries.push(IndexEntry {
            text: text.to_string(),
            fingerprint,
        });
        true
    }
}

/// Index from corpus string to its fingerprint, sharded by length.
///
/// Each string lives in exactly one bucket, chosen from its raw length at
/// insertion time. Re-inserting a string overwrites its fingerprint.
#[derive(Debug, Clone, Default)]
pub struct BucketIndex {
    buckets: Vec<Bucket>,
    len: usize,
}

impl BucketIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from precomputed `(text, fingerprint)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Fingerprint)>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for (text, fingerprint) in entries {
            index.insert(text.as_ref(), fingerprint);
        }
        index
    }

    fn bucket_mut(&mut self, key: usize) -> &mut Bucket {
        if key >= self.buckets.len() {
            self.buckets.resize_with(key + 1, Bucket::default);
        }
        &mut self.buckets[key]
    }

    /// Insert or overwrite the fingerprint for `text`.
    ///
    /// Returns `true` when the text was not indexed before.
    pub fn insert(&mut self, text: &str, fingerprint: Fingerprint) -> bool {
        let key = bucket_of(text.chars().count());
        let added = self.bucket_mut(key).upsert(text, fingerprint);
        if added {
            self.len += 1;
        }
        added
    }

    /// Return the stored fingerprint, computing and inserting it when absent.
    ///
    /// This is the only path through which a lookup mutates the index.
    pub fn get_or_insert_with<F>(&mut self, text: &str, compute: F) -> Fingerprint
    where
        F: FnOnce() -> Fingerprint,
    {
        if let Some(fingerprint) = self.get(text) {
            return fingerprint;
        }
        let fingerprint = compute();
        self.insert(text, fingerprint);
        fingerprint
    }

    /// Fingerprint stored for `text`, if any.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Fingerprint> {
        let key = bucket_of(text.chars().count());
        self.buckets
            .get(key)?
            .get(text)
            .map(|entry| entry.fingerprint)
    }

    /// Check if the index contains `text` exactly.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.get(text).is_some()
    }

    /// Entries whose length is within `max(3, floor(length * tolerance_ratio))`
    /// of `length`, rounded out to whole buckets.
    ///
    /// Each call starts a fresh enumeration; the index is not modified.
    pub fn candidates_near(
        &self,
        length: usize,
        tolerance_ratio: f64,
    ) -> impl Iterator<Item = (&str, &Fingerprint)> + '_ {
        let tolerance = length_tolerance(length, tolerance_ratio);
        let lo = bucket_of(length.saturating_sub(tolerance));
        let hi = bucket_of(length + tolerance);
        let range = if lo < self.buckets.len() {
            &self.buckets[lo..=hi.min(self.buckets.len() - 1)]
        } else {
            &[][..]
        };
        range
            .iter()
            .flat_map(|bucket| bucket.entries.iter())
            .map(|entry| (entry.text.as_str(), &entry.fingerprint))
    }

    /// Every entry, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fingerprint)> + '_ {
        self.entries()
            .map(|entry| (entry.text.as_str(), &entry.fingerprint))
    }

    /// Every stored entry, e.g. to export precomputed digests.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> + '_ {
        self.buckets.iter().flat_map(|bucket| bucket.entries.iter())
    }

    /// Number of indexed strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated buckets (highest bucket key + 1).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entry count per bucket key.
    #[must_use]
    pub fn bucket_distribution(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.entries.len()).collect()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }
}

impl<S: AsRef<str>> FromIterator<(S, Fingerprint)> for BucketIndex {
    fn from_iter<I: IntoIterator<Item = (S, Fingerprint)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<S: AsRef<str>> Extend<(S, Fingerprint)> for BucketIndex {
    fn extend<I: IntoIterator<Item = (S, Fingerprint)>>(&mut self, iter: I) {
        for (text, fingerprint) in iter {
            self.insert(text.as_ref(), fingerprint);
        }
    }
}
