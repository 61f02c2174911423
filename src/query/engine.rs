//! The query engine (§4.7): loads the four on-disk artifacts, lazily
//! resolves and caches postings, scores candidate documents with a
//! zone-weighted TF·IDF + proximity function, and dispatches the
//! statistical commands.

use crate::corpus::Corpus;
use crate::dictionary::{to_runtime, Dictionary, PostingsSlot, RuntimeDictionary};
use crate::error::QueryError;
use crate::postings;
use crate::query::parser::{self, Command, Query};
use crate::vector_space::{DocVector, VectorEntry, VectorSpace};
use crate::zone::Zone;
use regex::Regex;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

/// One ranked hit (§4.7's "top-k").
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document_id: u32,
    pub score: f64,
    pub snippet_start: Option<u32>,
}

/// The result of evaluating a query string (§4.6's command set, §4.7's
/// dispatch table).
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    Results(Vec<ScoredDocument>),
    Count(usize),
    Text(String),
    /// `similar` with no loaded `.context` file, or an unknown document id
    /// for `doc`/`title`/`tf` (§7's "return a sentinel" policy).
    NoMatch,
}

fn artifact_path(basename: &Path, extension: &str) -> PathBuf {
    let mut name: OsString = basename.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    basename.with_file_name(name)
}

/// The loaded, queryable index (§4.7 "Startup").
pub struct QueryEngine {
    dict: RefCell<RuntimeDictionary>,
    vector_space: VectorSpace,
    corpus: Corpus,
    postings_file: RefCell<File>,
    doc_count: usize,
    max_results: usize,
}

impl QueryEngine {
    /// Load the four required artifacts under `basename`. Fails hard
    /// (§7) if `.dict`, `.vs`, `.corpus`, or `.postings` is missing; the
    /// optional `.context` artifact (`similar`) is not modelled here since
    /// it is an external collaborator (§1, §6).
    pub fn open(basename: &Path, max_results: usize) -> Result<Self, QueryError> {
        let dict: Dictionary =
            crate::codec::read_compressed(&artifact_path(basename, "dict"), "run `ifile index` to build the index")?;
        let vector_space: VectorSpace = crate::codec::read_compressed(
            &artifact_path(basename, "vs"),
            "run `ifile index` to build the index",
        )?;
        let corpus: Corpus = crate::codec::read_compressed(
            &artifact_path(basename, "corpus"),
            "run `ifile index` to build the index",
        )?;

        let postings_path = artifact_path(basename, "postings");
        let mut postings_file = File::open(&postings_path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                QueryError::MissingArtifact {
                    path: postings_path.clone(),
                    hint: "run `ifile index` to build the index",
                }
            } else {
                QueryError::Io(err)
            }
        })?;
        let _vocab_size: usize = postings::read_block(&mut postings_file)?
            .parse()
            .map_err(|_| QueryError::Decode("malformed vocabulary-size header".to_string()))?;
        let doc_count: usize = postings::read_block(&mut postings_file)?
            .parse()
            .map_err(|_| QueryError::Decode("malformed document-count header".to_string()))?;

        Ok(QueryEngine {
            dict: RefCell::new(to_runtime(dict)),
            vector_space,
            corpus,
            postings_file: RefCell::new(postings_file),
            doc_count,
            max_results,
        })
    }

    fn term_lookup(&self, term: &str) -> Option<(u32, u32)> {
        self.dict.borrow().get(term).map(|entry| (entry.term_index, entry.df))
    }

    /// Resolve (and cache) a term's postings set (§4.7's `fetch_postings`).
    /// Unknown terms yield an empty set (§7's "unknown query term" policy).
    fn fetch_postings(&self, term: &str) -> BTreeSet<u32> {
        let mut dict = self.dict.borrow_mut();
        let Some(entry) = dict.get_mut(term) else {
            return BTreeSet::new();
        };
        match &entry.postings {
            PostingsSlot::Resolved(ids) => ids.clone(),
            PostingsSlot::Unresolved(offset) => {
                let offset = *offset;
                let mut file = self.postings_file.borrow_mut();
                let ids: BTreeSet<u32> = postings::read_block_at(&mut *file, offset)
                    .map(|csv| postings::decode_gaps(&csv).into_iter().collect())
                    .unwrap_or_default();
                entry.postings = PostingsSlot::Resolved(ids.clone());
                ids
            }
        }
    }

    fn doc_vector(&self, document_id: u32) -> Option<&DocVector> {
        self.vector_space.get(document_id as usize).and_then(|slot| slot.as_ref())
    }

    /// Evaluate a raw query string and produce a response (§4.6 + §4.7).
    #[must_use]
    pub fn execute(&self, raw_query: &str) -> QueryResponse {
        let query = parser::parse(raw_query);
        match query.cmd {
            Command::Similar => QueryResponse::NoMatch,
            Command::Df => self.command_df(&query),
            Command::Freq => self.command_freq(&query),
            Command::Doc => self.command_doc(&query),
            Command::Tf => self.command_tf(&query),
            Command::Title => self.command_title(&query),
            Command::None => QueryResponse::Results(self.search(&query)),
        }
    }

    fn parse_doc_id(raw: &str) -> Option<u32> {
        raw.trim().parse().ok()
    }

    fn command_df(&self, query: &Query) -> QueryResponse {
        if query.phrase_search {
            let (totals, _) = self.evaluate(query);
            QueryResponse::Count(totals.values().filter(|&&score| score >= 0.0).count())
        } else {
            let terms: Vec<&str> = query.groups.first().map(|g| g.split(' ')).into_iter().flatten().collect();
            let count = terms.first().map(|t| self.fetch_postings(t).len()).unwrap_or(0);
            QueryResponse::Count(count)
        }
    }

    fn command_freq(&self, query: &Query) -> QueryResponse {
        if query.phrase_search {
            let phrase = query.raw_terms.join(" ");
            let count: usize = match phrase_regex(&phrase) {
                Some(re) => self
                    .corpus
                    .values()
                    .map(|doc| {
                        count_occurrences(&doc.original_text, &re)
                            + count_occurrences(&doc.title, &re)
                            + count_occurrences(&doc.author, &re)
                    })
                    .sum(),
                None => 0,
            };
            QueryResponse::Count(count)
        } else {
            let term = query.groups.first().and_then(|g| g.split(' ').next());
            let Some(term) = term else { return QueryResponse::Count(0) };
            let Some((term_index, _)) = self.term_lookup(term) else { return QueryResponse::Count(0) };
            let total: u32 = self
                .vector_space
                .iter()
                .filter_map(|slot| slot.as_ref())
                .filter_map(|vector| vector.get(&term_index))
                .map(|entry| entry.raw_frequency)
                .sum();
            QueryResponse::Count(total as usize)
        }
    }

    fn command_doc(&self, query: &Query) -> QueryResponse {
        let Some(id) = query.raw_terms.first().and_then(|s| Self::parse_doc_id(s)) else {
            return QueryResponse::NoMatch;
        };
        match self.corpus.get(&id) {
            Some(doc) => QueryResponse::Text(doc.original_text.clone()),
            None => QueryResponse::NoMatch,
        }
    }

    fn command_title(&self, query: &Query) -> QueryResponse {
        let Some(id) = query.raw_terms.first().and_then(|s| Self::parse_doc_id(s)) else {
            return QueryResponse::NoMatch;
        };
        match self.corpus.get(&id) {
            Some(doc) => QueryResponse::Text(doc.title.clone()),
            None => QueryResponse::NoMatch,
        }
    }

    fn command_tf(&self, query: &Query) -> QueryResponse {
        let Some(id) = query.raw_terms.first().and_then(|s| Self::parse_doc_id(s)) else {
            return QueryResponse::NoMatch;
        };
        if !self.corpus.contains_key(&id) {
            return QueryResponse::NoMatch;
        }
        if query.phrase_search {
            let phrase = query.raw_terms[1..].join(" ");
            let count = match phrase_regex(&phrase) {
                Some(re) => self
                    .corpus
                    .get(&id)
                    .map(|doc| count_occurrences(&doc.original_text, &re))
                    .unwrap_or(0),
                None => 0,
            };
            QueryResponse::Count(count)
        } else {
            let term = query.groups.first().and_then(|g| g.split(' ').next());
            let Some(term) = term else { return QueryResponse::Count(0) };
            let Some((term_index, _)) = self.term_lookup(term) else { return QueryResponse::Count(0) };
            let count = self
                .doc_vector(id)
                .and_then(|vector| vector.get(&term_index))
                .map(|entry| entry.raw_frequency)
                .unwrap_or(0);
            QueryResponse::Count(count as usize)
        }
    }

    /// Aggregate every group's scores into per-document totals, applying the
    /// pure-negation complement where it fires, but without sorting or
    /// truncating to `max_results` (§4.7's group-aggregation step, kept
    /// separate from ranking so `df`/`freq` can see the whole candidate set).
    fn evaluate(&self, query: &Query) -> (HashMap<u32, f64>, HashMap<u32, Option<u32>>) {
        let mut totals: HashMap<u32, f64> = HashMap::new();
        let mut snippets: HashMap<u32, Option<u32>> = HashMap::new();

        for (group, &negated) in query.groups.iter().zip(&query.negated_groups) {
            let terms: Vec<&str> = group.split(' ').filter(|t| !t.is_empty()).collect();
            if terms.is_empty() {
                continue;
            }
            let group_scores = self.score_group(&terms, query.phrase_search);
            for (doc_id, (score, snippet)) in group_scores {
                let signed = if negated { -score } else { score };
                *totals.entry(doc_id).or_insert(0.0) += signed;
                snippets.entry(doc_id).or_insert(snippet);
            }
        }

        if !totals.is_empty() && totals.values().all(|&s| s < 0.0) {
            let excluded: HashSet<u32> = totals.keys().copied().collect();
            totals = self
                .corpus
                .keys()
                .filter(|id| !excluded.contains(id))
                .map(|&id| (id, 1.0 / f64::from(id)))
                .collect();
            snippets.clear();
        }

        (totals, snippets)
    }

    /// Run a fuzzy-OR / phrase / negation search and return the ranked,
    /// truncated result list (§4.7's "Ranking").
    fn search(&self, query: &Query) -> Vec<ScoredDocument> {
        let (totals, snippets) = self.evaluate(query);

        let mut results: Vec<ScoredDocument> = totals
            .into_iter()
            .map(|(document_id, score)| ScoredDocument {
                document_id,
                score,
                snippet_start: snippets.get(&document_id).copied().flatten(),
            })
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(self.max_results);
        results
    }

    /// Score one group's candidate documents (§4.7, steps 1-6 of "per-group
    /// score computation").
    fn score_group(&self, terms: &[&str], phrase: bool) -> HashMap<u32, (f64, Option<u32>)> {
        let resolved: Vec<(u32, f64, BTreeSet<u32>)> = terms
            .iter()
            .map(|&term| {
                let postings = self.fetch_postings(term);
                let (term_index, df) = self.term_lookup(term).unwrap_or((0, 0));
                let idf = if df > 0 { (self.doc_count as f64 / f64::from(df)).ln() } else { 0.0 };
                (term_index, idf, postings)
            })
            .collect();

        let candidates: BTreeSet<u32> = if phrase {
            let mut iter = resolved.iter();
            match iter.next() {
                Some((_, _, first)) => {
                    let mut acc = first.clone();
                    for (_, _, set) in iter {
                        acc = acc.intersection(set).copied().collect();
                    }
                    acc
                }
                None => BTreeSet::new(),
            }
        } else {
            resolved.iter().flat_map(|(_, _, set)| set.iter().copied()).collect()
        };

        let mut out = HashMap::new();
        for doc_id in candidates {
            let Some(vector) = self.doc_vector(doc_id) else { continue };
            if let Some(scored) = self.score_group_for_document(&resolved, vector, phrase) {
                out.insert(doc_id, scored);
            }
        }
        out
    }

    fn score_group_for_document(
        &self,
        terms: &[(u32, f64, BTreeSet<u32>)],
        vector: &DocVector,
        phrase: bool,
    ) -> Option<(f64, Option<u32>)> {
        let mut score = 0.0;
        let mut prev_entry: Option<&VectorEntry> = None;
        let mut achieved_snippet: Option<u32> = None;

        for &(term_index, idf, _) in terms {
            let Some(entry) = vector.get(&term_index) else {
                prev_entry = None;
                continue;
            };
            score += idf * entry.normalised_weight;

            if let Some(prev) = prev_entry {
                let text_prox = min_proximity(
                    &prev.positions[Zone::Text.index()],
                    &entry.positions[Zone::Text.index()],
                    phrase,
                );
                let title_prox = min_proximity(
                    &prev.positions[Zone::Title.index()],
                    &entry.positions[Zone::Title.index()],
                    phrase,
                );
                let best = [text_prox, title_prox]
                    .into_iter()
                    .flatten()
                    .min_by(|a, b| a.0.cmp(&b.0));

                match best {
                    Some((min_prox, prev_pos)) => {
                        if phrase && min_prox != 1 {
                            return None;
                        }
                        score *= 1.0 / f64::from(min_prox);
                        achieved_snippet = Some(prev_pos);
                    }
                    None => {
                        if phrase {
                            return None;
                        }
                    }
                }
            }
            prev_entry = Some(entry);
        }

        let snippet_start = achieved_snippet.or_else(|| {
            terms
                .iter()
                .filter_map(|&(term_index, _, _)| vector.get(&term_index))
                .filter_map(|entry| entry.positions[Zone::Text.index()].first().copied())
                .min()
        });

        Some((score, snippet_start))
    }
}

/// Minimum-proximity search over one zone's two position lists (§4.7 step 3).
/// Returns the winning proximity and the previous-term position at which it
/// was achieved.
fn min_proximity(prev_positions: &[u32], cur_positions: &[u32], phrase: bool) -> Option<(u32, u32)> {
    let mut best: Option<(u32, u32)> = None;
    for &p in prev_positions {
        for &c in cur_positions {
            let dist = if phrase {
                let signed = i64::from(c) - i64::from(p);
                if signed <= 0 {
                    continue;
                }
                signed as u32
            } else {
                c.abs_diff(p)
            };
            let improves = match best {
                Some((min, _)) => dist < min,
                None => true,
            };
            if improves {
                best = Some((dist, p));
            }
        }
    }
    best
}

/// A regex character class matching one-or-more of `tokenizer::DELIMITERS`,
/// escaped for use inside `[...]`.
fn delimiter_class() -> String {
    let mut class = String::from("[");
    for &c in crate::tokenizer::DELIMITERS {
        if matches!(c, '\\' | ']' | '^' | '-') {
            class.push('\\');
        }
        class.push(c);
    }
    class.push_str("]+");
    class
}

/// Build the delimiter-tolerant phrase regex: each (already stemmed,
/// whitespace-joined) term escaped and separated by a run of delimiter
/// characters, with a trailing delimiter run required after the last term
/// too (§4.7's `freq`/`tf` phrase dispatch, matching the original's
/// `phrase_frequency_in_doc`). Returns `None` for an empty phrase.
fn phrase_regex(phrase: &str) -> Option<Regex> {
    let terms: Vec<&str> = phrase.split(' ').filter(|t| !t.is_empty()).collect();
    if terms.is_empty() {
        return None;
    }
    let delim = delimiter_class();
    let mut pattern = String::new();
    for term in &terms {
        pattern.push_str(&regex::escape(term));
        pattern.push_str(&delim);
    }
    Regex::new(&pattern).ok()
}

/// Count non-overlapping matches of a delimiter-tolerant phrase regex
/// within `haystack`.
fn count_occurrences(haystack: &str, re: &Regex) -> usize {
    re.find_iter(haystack).count()
}
