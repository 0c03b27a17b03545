//! Thread-safe wrapper around [`FuzzyMatcher`].
//!
//! Searching mutates the query cache (and the index in dynamic mode), so
//! searches take the write lock. Inspection methods take the read lock.
//!
//! # Usage
//!
//! ```
//! use quickfuzzy::{MatcherOptions, ThreadSafeMatcher};
//!
//! let matcher = ThreadSafeMatcher::with_data(MatcherOptions::default(), ["hello", "world"]).unwrap();
//!
//! let shared = matcher.clone();
//! std::thread::spawn(move || {
//!     shared.set_data(&["help"]);
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(matcher.len(), 3);
//! ```

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::MatcherOptions;
use crate::matcher::{FuzzyMatcher, SearchOutcome};
use crate::FuzzyError;

/// Shared handle to a [`FuzzyMatcher`]. Clones point at the same matcher.
#[derive(Debug, Clone)]
pub struct ThreadSafeMatcher {
    inner: Arc<RwLock<FuzzyMatcher>>,
}

impl ThreadSafeMatcher {
    pub fn new(options: MatcherOptions) -> Result<Self, FuzzyError> {
        FuzzyMatcher::new(options).map(Self::from_matcher)
    }

    pub fn with_data<I, S>(options: MatcherOptions, data: I) -> Result<Self, FuzzyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FuzzyMatcher::with_data(options, data).map(Self::from_matcher)
    }

    /// Wrap an existing matcher.
    #[must_use]
    pub fn from_matcher(matcher: FuzzyMatcher) -> Self {
        Self {
            inner: Arc::new(RwLock::new(matcher)),
        }
    }

    /// Acquires an exclusive write lock.
    pub fn search(&self, query: &str) -> Option<Vec<String>> {
        self.inner.write().search(query)
    }

    /// Acquires an exclusive write lock.
    pub fn search_in<S: AsRef<str>>(&self, query: &str, candidates: &[S]) -> Option<Vec<String>> {
        self.inner.write().search_in(query, candidates)
    }

    /// Acquires an exclusive write lock.
    pub fn search_detailed(&self, query: &str, candidates: Option<&[&str]>) -> SearchOutcome {
        self.inner.write().search_detailed(query, candidates)
    }

    /// Acquires an exclusive write lock for the whole batch.
    pub fn set_data<S: AsRef<str>>(&self, data: &[S]) {
        self.inner.write().set_data(data);
    }

    pub fn clear_query_cache(&self) {
        self.inner.write().clear_query_cache();
    }

    /// Acquires a shared read lock.
    pub fn contains(&self, text: &str) -> bool {
        self.inner.read().contains(text)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn query_cache_len(&self) -> usize {
        self.inner.read().query_cache_len()
    }

    /// Copy of the matcher's options.
    pub fn options(&self) -> MatcherOptions {
        self.inner.read().options().clone()
    }
}
