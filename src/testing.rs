//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation. It
//! provides canonical fixture builders to avoid duplicating XML-fixture
//! plumbing across every module's `#[cfg(test)]` block.

#![doc(hidden)]

use std::path::Path;

/// Render one `<DOC>` record with all four required zones.
#[must_use]
pub fn doc_xml(docno: u32, title: &str, author: &str, biblio: &str, text: &str) -> String {
    format!(
        "<DOC><DOCNO>{docno}</DOCNO><TITLE>{title}</TITLE><AUTHOR>{author}</AUTHOR><BIBLIO>{biblio}</BIBLIO><TEXT>{text}</TEXT></DOC>"
    )
}

/// Write `doc_xml(...)` to `dir/name`.
pub fn write_doc(dir: &Path, name: &str, docno: u32, title: &str, text: &str) {
    std::fs::write(dir.join(name), doc_xml(docno, title, "X", "Y", text)).expect("write fixture document");
}
