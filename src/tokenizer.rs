//! Splits raw text into index-ready terms: delimiter split, stop-word and
//! length filtering, lowercasing, and Porter stemming (§4.1).
//!
//! The delimiter class and the stemmer are external collaborators (§1); the
//! splitting, filtering, and the contiguous-position bookkeeping around them
//! are the part this module owns.

use crate::stopwords::is_stop_word;
use rust_stemmers::{Algorithm, Stemmer};
use std::sync::LazyLock;

pub(crate) const DELIMITERS: &[char] = &[
    ' ', '\t', '\n', '\r', '.', ',', '=', '?', '!', ':', '@', '<', '>', '(', ')', '"', '-', ';',
    '\'', '&', '_', '{', '}', '|', '[', ']', '\\',
];

static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

/// Split on any maximal run of the delimiter class, dropping empty runs.
#[must_use]
pub fn split(text: &str) -> Vec<&str> {
    text.split(|c: char| DELIMITERS.contains(&c))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Porter-stem an already-lowercased token.
#[must_use]
pub fn stem(lower: &str) -> String {
    STEMMER.stem(lower).into_owned()
}

/// Lower-case, reject stop-words and single-character tokens, then stem.
/// Returns `None` for tokens that are not indexed.
#[must_use]
pub fn normalize_token(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    if lower.chars().count() <= 1 || is_stop_word(&lower) {
        return None;
    }
    Some(stem(&lower))
}

/// Tokenize `text` into the ordered sequence of surviving, stemmed terms.
/// The 1-based position of the `i`-th element of the returned vector is
/// `i + 1` (§4.5's per-zone position counter).
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    split(text).into_iter().filter_map(normalize_token).collect()
}
