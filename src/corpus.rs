//! The corpus snapshot (§3): `document_id → Document`, persisted verbatim
//! and consulted at query time for titles, authors, snippets, and exact
//! phrase counting.

use crate::document::Document;
use std::collections::HashMap;

pub type Corpus = HashMap<u32, Document>;
