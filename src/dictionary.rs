//! The term dictionary (§3) and its two lifecycles: the in-memory,
//! pass-1 accumulation form, and the on-disk, serialized form with
//! postings offsets.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Dictionary as accumulated during pass 1: term → sorted set of document
/// ids containing it. Sorted at serialisation time, not accumulation time.
pub type PendingDictionary = HashMap<String, BTreeSet<u32>>;

/// One dictionary entry as written to the `.dict` artifact: `term_index`
/// is the term's 0-based rank in lexical order, `df` its document
/// frequency, `postings_offset` the byte offset of its postings block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub term_index: u32,
    pub df: u32,
    pub postings_offset: u64,
}

/// The on-disk dictionary shape: `term → [term_index, df, postings_offset]`.
pub type Dictionary = HashMap<String, DictionaryEntry>;

/// Where a term's postings list currently lives at query time: re-expressed
/// per DESIGN.md from "has this slot been resolved yet?" runtime type
/// sniffing into a tagged variant with an atomic swap on first access.
#[derive(Debug, Clone)]
pub enum PostingsSlot {
    Unresolved(u64),
    Resolved(BTreeSet<u32>),
}

/// A dictionary entry as held by the query engine: the on-disk metadata
/// plus a postings slot that starts `Unresolved` and is swapped to
/// `Resolved` on first `fetch_postings` call.
#[derive(Debug, Clone)]
pub struct RuntimeEntry {
    pub term_index: u32,
    pub df: u32,
    pub postings: PostingsSlot,
}

pub type RuntimeDictionary = HashMap<String, RuntimeEntry>;

/// Convert the on-disk dictionary into its runtime form, with every
/// postings slot starting out unresolved.
#[must_use]
pub fn to_runtime(dict: Dictionary) -> RuntimeDictionary {
    dict.into_iter()
        .map(|(term, entry)| {
            (
                term,
                RuntimeEntry {
                    term_index: entry.term_index,
                    df: entry.df,
                    postings: PostingsSlot::Unresolved(entry.postings_offset),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_entries_start_unresolved() {
        let mut dict = Dictionary::new();
        dict.insert(
            "cat".to_string(),
            DictionaryEntry { term_index: 0, df: 1, postings_offset: 42 },
        );
        let runtime = to_runtime(dict);
        let entry = &runtime["cat"];
        assert_eq!(entry.term_index, 0);
        assert_eq!(entry.df, 1);
        match entry.postings {
            PostingsSlot::Unresolved(offset) => assert_eq!(offset, 42),
            PostingsSlot::Resolved(_) => panic!("expected Unresolved"),
        }
    }
}
