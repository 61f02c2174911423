//! The index serializer (§4.4) and pass 2 (§4.5): sorts the dictionary,
//! emits gap-compressed postings, rewrites dictionary entries with on-disk
//! offsets and document frequency, computes the vector space, and
//! persists all three artifacts plus the corpus snapshot.

use crate::codec;
use crate::corpus::Corpus;
use crate::dictionary::{Dictionary, DictionaryEntry, PendingDictionary};
use crate::document::{self, Document};
use crate::error::BuildError;
use crate::postings;
use crate::tokenizer;
use crate::vector_space::{self, DocVector, VectorSpace};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Summary of a completed build, printed by the CLI.
#[derive(Debug, Clone, Copy)]
pub struct BuildStats {
    pub vocabulary_size: usize,
    pub document_count: usize,
}

fn artifact_path(basename: &Path, extension: &str) -> PathBuf {
    let mut name: OsString = basename.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    basename.with_file_name(name)
}

/// Run the serializer (§4.4) and pass 2 (§4.5), writing the four on-disk
/// artifacts under `basename` (a `.postings`/`.dict`/`.vs`/`.corpus` suffix
/// is appended to each).
pub fn serialize(
    basename: &Path,
    dictionary: PendingDictionary,
    corpus: Corpus,
    parallelism: usize,
) -> Result<BuildStats, BuildError> {
    // Step 1-4: sort the dictionary, write the postings file, recording
    // each term's offset as we go.
    let sorted: BTreeMap<String, _> = dictionary.into_iter().collect();

    let mut postings_buf: Vec<u8> = Vec::new();
    let vocab_header = sorted.len().to_string();
    postings::write_block(&mut postings_buf, &vocab_header)?;
    let doc_header = corpus.len().to_string();
    postings::write_block(&mut postings_buf, &doc_header)?;

    // Step 5-6: assign term_index in the same pass, build the final
    // dictionary.
    let mut dict: Dictionary = Dictionary::with_capacity(sorted.len());
    for (index, (term, ids)) in sorted.into_iter().enumerate() {
        let csv = postings::encode_gaps(&ids);
        let offset = postings_buf.len() as u64;
        postings::write_block(&mut postings_buf, &csv)?;
        dict.insert(
            term,
            DictionaryEntry { term_index: index as u32, df: ids.len() as u32, postings_offset: offset },
        );
    }

    write_atomic(&artifact_path(basename, "postings"), &postings_buf)?;

    // Step 7-8: pass 2 and the remaining two artifacts.
    let vector_space = compute_vector_space(&corpus, &dict, parallelism);

    codec::write_compressed(&artifact_path(basename, "dict"), &dict)?;
    codec::write_compressed(&artifact_path(basename, "vs"), &vector_space)?;
    codec::write_compressed(&artifact_path(basename, "corpus"), &corpus)?;

    Ok(BuildStats { vocabulary_size: dict.len(), document_count: corpus.len() })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    use std::io::Write;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn build_doc_vector(doc: &Document, dict: &Dictionary) -> DocVector {
    let mut vector = DocVector::new();
    for (zone, text) in document::zones(doc) {
        for (i, term) in tokenizer::tokenize(text).into_iter().enumerate() {
            let position = (i + 1) as u32;
            if let Some(entry) = dict.get(&term) {
                vector
                    .entry(entry.term_index)
                    .or_default()
                    .record_occurrence(zone, position, doc.weighted_length);
            }
        }
    }
    vector
}

#[cfg(feature = "parallel")]
fn compute_vector_space(corpus: &Corpus, dict: &Dictionary, parallelism: usize) -> VectorSpace {
    use rayon::prelude::*;

    let max_id = corpus.keys().copied().max().unwrap_or(0);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism.max(1))
        .build()
        .expect("failed to build pass-2 thread pool");

    let pairs: Vec<(u32, DocVector)> = pool.install(|| {
        corpus.par_iter().map(|(&doc_id, doc)| (doc_id, build_doc_vector(doc, dict))).collect()
    });

    let mut space = vector_space::allocate(max_id);
    for (doc_id, vector) in pairs {
        space[doc_id as usize] = Some(vector);
    }
    space
}

#[cfg(not(feature = "parallel"))]
fn compute_vector_space(corpus: &Corpus, dict: &Dictionary, _parallelism: usize) -> VectorSpace {
    let max_id = corpus.keys().copied().max().unwrap_or(0);
    let mut space = vector_space::allocate(max_id);
    for (&doc_id, doc) in corpus {
        space[doc_id as usize] = Some(build_doc_vector(doc, dict));
    }
    space
}
