//! Pass 1: concurrent workers consume document paths, parse them, and
//! populate the dictionary and corpus snapshot under a single lock (§4.3).
//!
//! Two implementations are compiled depending on the `parallel` feature,
//! mirroring the teacher's own feature-gated parallel/sequential pair in
//! `inverted.rs` (`build_inverted_index_parallel` vs. the `#[cfg(not(...))]`
//! fallback). The parallel path spawns a fixed worker pool reading from a
//! `crossbeam` channel and uses a `WaitGroup` to implement `close()`'s
//! "drain the queue" semantics — the Rust equivalent of the source's
//! `Queue.join()`.

use crate::corpus::Corpus;
use crate::dictionary::PendingDictionary;
use crate::document;
use crate::error::BuildError;
use crate::tokenizer;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
mod imp {
    use super::*;
    use crossbeam::channel::{unbounded, Receiver, Sender};
    use crossbeam::sync::WaitGroup;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread::{self, JoinHandle};

    struct Job {
        path: PathBuf,
        _wg: WaitGroup,
    }

    struct State {
        open: bool,
        dictionary: PendingDictionary,
        corpus: Corpus,
        wait_group: Option<WaitGroup>,
    }

    /// The multi-threaded pass-1 builder (§4.3, §5).
    pub struct IndexBuilder {
        state: Arc<Mutex<State>>,
        tx: Sender<Job>,
        _workers: Vec<JoinHandle<()>>,
    }

    impl IndexBuilder {
        #[must_use]
        pub fn new(parallelism: usize) -> Self {
            let parallelism = parallelism.max(1);
            let (tx, rx): (Sender<Job>, Receiver<Job>) = unbounded();
            let state = Arc::new(Mutex::new(State {
                open: false,
                dictionary: PendingDictionary::new(),
                corpus: Corpus::new(),
                wait_group: None,
            }));
            let workers = (0..parallelism)
                .map(|_| {
                    let rx = rx.clone();
                    let state = Arc::clone(&state);
                    thread::spawn(move || {
                        while let Ok(job) = rx.recv() {
                            process_document(&state, &job.path);
                            drop(job._wg);
                        }
                    })
                })
                .collect();
            IndexBuilder { state, tx, _workers: workers }
        }

        pub fn open(&self) -> Result<(), BuildError> {
            let mut state = self.state.lock();
            if state.open {
                return Err(BuildError::AlreadyOpen);
            }
            state.open = true;
            state.dictionary = PendingDictionary::new();
            state.corpus = Corpus::new();
            state.wait_group = Some(WaitGroup::new());
            Ok(())
        }

        pub fn index_document(&self, path: PathBuf) -> Result<(), BuildError> {
            let wg = {
                let state = self.state.lock();
                if !state.open {
                    return Err(BuildError::NotOpen);
                }
                state.wait_group.clone().expect("open() always sets a wait group")
            };
            self.tx.send(Job { path, _wg: wg }).map_err(|_| BuildError::NotOpen)
        }

        /// Drain the pass-1 queue and hand back the frozen dictionary and
        /// corpus snapshot.
        pub fn close(&self) -> Result<(PendingDictionary, Corpus), BuildError> {
            let wg = {
                let mut state = self.state.lock();
                if !state.open {
                    return Err(BuildError::NotOpen);
                }
                state.open = false;
                state.wait_group.take().expect("open() always sets a wait group")
            };
            wg.wait();
            let mut state = self.state.lock();
            Ok((std::mem::take(&mut state.dictionary), std::mem::take(&mut state.corpus)))
        }
    }

    fn process_document(state: &Arc<Mutex<State>>, path: &Path) {
        let Some(doc) = document::parse_file(path) else { return };
        let doc_id = doc.document_id;

        {
            let mut state = state.lock();
            state.corpus.insert(doc_id, doc.clone());
        }

        for (_zone, text) in document::zones(&doc) {
            for term in tokenizer::tokenize(text) {
                let mut state = state.lock();
                state.dictionary.entry(term).or_default().insert(doc_id);
            }
        }
    }
}

#[cfg(not(feature = "parallel"))]
mod imp {
    use super::*;
    use std::cell::RefCell;

    struct State {
        open: bool,
        dictionary: PendingDictionary,
        corpus: Corpus,
        queue: Vec<PathBuf>,
    }

    /// The single-threaded pass-1 builder (`parallel` feature disabled).
    pub struct IndexBuilder {
        state: RefCell<State>,
    }

    impl IndexBuilder {
        #[must_use]
        pub fn new(_parallelism: usize) -> Self {
            IndexBuilder {
                state: RefCell::new(State {
                    open: false,
                    dictionary: PendingDictionary::new(),
                    corpus: Corpus::new(),
                    queue: Vec::new(),
                }),
            }
        }

        pub fn open(&self) -> Result<(), BuildError> {
            let mut state = self.state.borrow_mut();
            if state.open {
                return Err(BuildError::AlreadyOpen);
            }
            *state = State {
                open: true,
                dictionary: PendingDictionary::new(),
                corpus: Corpus::new(),
                queue: Vec::new(),
            };
            Ok(())
        }

        pub fn index_document(&self, path: PathBuf) -> Result<(), BuildError> {
            let mut state = self.state.borrow_mut();
            if !state.open {
                return Err(BuildError::NotOpen);
            }
            state.queue.push(path);
            Ok(())
        }

        pub fn close(&self) -> Result<(PendingDictionary, Corpus), BuildError> {
            let queue = {
                let mut state = self.state.borrow_mut();
                if !state.open {
                    return Err(BuildError::NotOpen);
                }
                state.open = false;
                std::mem::take(&mut state.queue)
            };
            for path in &queue {
                process_document(&self.state, path);
            }
            let mut state = self.state.borrow_mut();
            Ok((std::mem::take(&mut state.dictionary), std::mem::take(&mut state.corpus)))
        }
    }

    fn process_document(state: &RefCell<State>, path: &Path) {
        let Some(doc) = document::parse_file(path) else { return };
        let doc_id = doc.document_id;
        state.borrow_mut().corpus.insert(doc_id, doc.clone());
        for (_zone, text) in document::zones(&doc) {
            for term in tokenizer::tokenize(text) {
                state.borrow_mut().dictionary.entry(term).or_default().insert(doc_id);
            }
        }
    }
}

pub use imp::IndexBuilder;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_doc(dir: &Path, name: &str, docno: u32, text: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "<DOC><DOCNO>{docno}</DOCNO><TITLE>T</TITLE><AUTHOR>A</AUTHOR><BIBLIO>B</BIBLIO><TEXT>{text}</TEXT></DOC>"
        )
        .unwrap();
        path
    }

    #[test]
    fn open_twice_fails_hard() {
        let builder = IndexBuilder::new(1);
        builder.open().unwrap();
        assert!(matches!(builder.open(), Err(BuildError::AlreadyOpen)));
    }

    #[test]
    fn index_document_before_open_fails_hard() {
        let builder = IndexBuilder::new(1);
        assert!(matches!(
            builder.index_document(PathBuf::from("x.xml")),
            Err(BuildError::NotOpen)
        ));
    }

    #[test]
    fn close_drains_the_queue_and_populates_dictionary_and_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_doc(dir.path(), "a.xml", 1, "the cat sat");
        let b = write_doc(dir.path(), "b.xml", 2, "the dog ran");

        let builder = IndexBuilder::new(2);
        builder.open().unwrap();
        builder.index_document(a).unwrap();
        builder.index_document(b).unwrap();
        let (dictionary, corpus) = builder.close().unwrap();

        assert_eq!(corpus.len(), 2);
        assert!(dictionary.contains_key("cat"));
        assert!(dictionary.contains_key("dog"));
        assert_eq!(dictionary["cat"].len(), 1);
    }

    #[test]
    fn index_document_after_close_fails_hard() {
        let builder = IndexBuilder::new(1);
        builder.open().unwrap();
        builder.close().unwrap();
        assert!(matches!(
            builder.index_document(PathBuf::from("x.xml")),
            Err(BuildError::NotOpen)
        ));
    }
}
