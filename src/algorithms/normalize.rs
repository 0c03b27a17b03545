//! String normalization applied before fingerprinting
//!
//! Steps run in a fixed order: NFKD decomposition, optional lowercasing,
//! optional diacritic removal, optional symbol removal, optional whitespace
//! collapsing, and a final trim. The same [`Normalizer`] must be used for the
//! corpus and for queries, otherwise their digests are not comparable.
//!
//! Diacritics are the code points with the Unicode `Diacritic` property, which
//! is not the set of combining marks: Indic and Thai vowel signs are kept,
//! while spacing marks such as the middle dot are removed.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

const DIACRITIC_PATTERN: &str = r"\p{Diacritic}";

/// The diacritic pattern failed to compile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid normalization pattern: {0}")]
pub struct PatternError(String);

/// Normalization toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizationOptions {
    /// Lowercase after decomposition
    pub ignore_case: bool,
    /// Drop everything that is not a letter, a number or whitespace
    pub ignore_symbols: bool,
    /// Drop code points with the Unicode `Diacritic` property
    pub remove_diacritics: bool,
    /// Collapse whitespace runs into a single space
    pub normalize_whitespace: bool,
    /// Bypass every step, including the trim
    pub disable_normalization: bool,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self {
            ignore_case: false,
            ignore_symbols: false,
            remove_diacritics: true,
            normalize_whitespace: true,
            disable_normalization: false,
        }
    }
}

/// Pure string-to-string transform configured once.
///
/// Cloning is cheap: the compiled pattern is shared.
#[derive(Debug, Clone)]
pub struct Normalizer {
    options: NormalizationOptions,
    /// Present only when diacritic removal is on
    diacritics: Option<Regex>,
}

#[inline]
fn is_symbol(c: char) -> bool {
    !(c.is_letter() || c.is_number() || c.is_whitespace())
}

impl Normalizer {
    pub fn new(options: NormalizationOptions) -> Result<Self, PatternError> {
        let diacritics = if options.remove_diacritics && !options.disable_normalization {
            let regex = Regex::new(DIACRITIC_PATTERN).map_err(|e| PatternError(e.to_string()))?;
            Some(regex)
        } else {
            None
        };
        Ok(Self { options, diacritics })
    }

    #[must_use]
    pub fn options(&self) -> &NormalizationOptions {
        &self.options
    }

    /// Normalize a string.
    /// Borrows the input when normalization is disabled.
    #[must_use]
    pub fn normalize<'a>(&self, s: &'a str) -> Cow<'a, str> {
        let opts = &self.options;
        if opts.disable_normalization {
            return Cow::Borrowed(s);
        }

        let mut out: String = s.nfkd().collect();
        if opts.ignore_case {
            out = out.to_lowercase();
        }
        if let Some(diacritics) = &self.diacritics {
            if let Cow::Owned(stripped) = diacritics.replace_all(&out, "") {
                out = stripped;
            }
        }
        if opts.ignore_symbols {
            out.retain(|c| !is_symbol(c));
        }
        if opts.normalize_whitespace {
            out = collapse_whitespace(&out);
        }

        let trimmed = out.trim();
        if trimmed.len() != out.len() {
            out = trimmed.to_string();
        }
        Cow::Owned(out)
    }
}

/// Replace every run of whitespace with a single ASCII space.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(f: impl FnOnce(&mut NormalizationOptions)) -> Normalizer {
        let mut opts = NormalizationOptions::default();
        f(&mut opts);
        Normalizer::new(opts).unwrap()
    }

    fn default_normalizer() -> Normalizer {
        with(|_| {})
    }

    #[test]
    fn test_default_strips_diacritics_and_whitespace() {
        let n = default_normalizer();
        assert_eq!(n.normalize("  Café   crème  "), "Cafe creme");
        assert_eq!(n.normalize("Київська"), "Киівська");
    }

    #[test]
    fn test_vowel_signs_are_kept() {
        let n = default_normalizer();
        // virama removed, dependent vowel signs kept
        assert_eq!(n.normalize("कुत्ता"), "कुतता");
        // tone mark removed, vowel sign kept
        assert_eq!(n.normalize("กินข้าว"), "กินขาว");
    }

    #[test]
    fn test_spacing_diacritics_removed() {
        let n = default_normalizer();
        // NFKD turns the modifier letter into "h"; the middle dot is a diacritic
        assert_eq!(n.normalize("ʰello·x"), "hellox");
    }

    #[test]
    fn test_keep_diacritics() {
        let n = with(|o| o.remove_diacritics = false);
        // still decomposed, so the mark is kept as a separate code point
        assert_eq!(n.normalize("é"), "e\u{301}");
        assert_eq!(n.normalize("x·y"), "x·y");
    }

    #[test]
    fn test_ignore_case() {
        let n = with(|o| o.ignore_case = true);
        assert_eq!(n.normalize("Hello WORLD"), "hello world");
    }

    #[test]
    fn test_ignore_symbols() {
        let n = with(|o| o.ignore_symbols = true);
        assert_eq!(n.normalize("Hello, World! #42"), "Hello World 42");
    }

    #[test]
    fn test_whitespace_kept_when_disabled() {
        let n = with(|o| o.normalize_whitespace = false);
        assert_eq!(n.normalize(" a \t b "), "a \t b");
    }

    #[test]
    fn test_compatibility_decomposition() {
        let n = default_normalizer();
        assert_eq!(n.normalize("ﬁle"), "file");
    }

    #[test]
    fn test_disabled_borrows() {
        let n = with(|o| o.disable_normalization = true);
        let out = n.normalize("  Café  ");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "  Café  ");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a  b\n\nc"), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }
}
