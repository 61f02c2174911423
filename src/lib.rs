//! A single-node inverted-index text search engine over a static XML
//! document corpus.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌──────────────┐   ┌────────────┐
//! │ tokenizer  │──▶│ document  │──▶│ build::      │──▶│ build::    │
//! │ stopwords  │   │           │   │ IndexBuilder │   │ serializer │
//! └────────────┘   └───────────┘   │  (pass 1)    │   │  (pass 2)  │
//!                                  └──────────────┘   └────────────┘
//!                                                            │
//!                                                            ▼
//!                                        .dict / .postings / .vs / .corpus
//!                                                            │
//!                                                            ▼
//! ┌────────────┐   ┌───────────┐   ┌──────────────────────────────┐
//! │ query::    │──▶│ query::   │──▶│ query::QueryEngine            │
//! │ parser     │   │ Query     │   │ (fetch_postings, score, rank) │
//! └────────────┘   └───────────┘   └──────────────────────────────┘
//! ```
//!
//! Document ids are assigned from each document's `DOCNO` tag rather than
//! from insertion order, so indexing is deterministic regardless of how
//! pass-1 worker threads interleave (see DESIGN.md for the open question
//! this resolves).

pub mod build;
pub mod codec;
pub mod corpus;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod postings;
pub mod query;
pub mod stopwords;
pub mod tokenizer;
pub mod vector_space;
pub mod zone;

pub mod testing;

pub use build::{build_index, BuildConfig, BuildStats};
pub use error::{BuildError, QueryError};
pub use query::{Command, Query, QueryEngine, QueryResponse, ScoredDocument};
