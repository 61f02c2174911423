//! The stop-word list (external collaborator, §1): a fixed set of tokens
//! never indexed. Loaded once from the `stop-words` crate's standard
//! English list and never mutated at runtime.

use std::collections::HashSet;
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<HashSet<String>> =
    LazyLock::new(|| stop_words::get(stop_words::LANGUAGE::English).into_iter().collect());

#[inline]
#[must_use]
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}
