//! The document model (§3) and the XML document reader, an external
//! collaborator per §1 whose only job is mechanical tag-to-field mapping.
//!
//! Grounded on the source `HTMLParser`-based reader (`original_source/document/document.py`):
//! a start/end-tag walk that accumulates character data between tags and,
//! on close of a recognised zone tag, folds `len(data) * weight[zone]` into
//! `weighted_length`. Re-expressed here over a pull-based XML event reader.

use crate::zone::Zone;
use serde::{Deserialize, Serialize};
use std::path::Path;
use xml::reader::{EventReader, XmlEvent};

/// A single parsed document (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub document_id: u32,
    pub document_number: String,
    pub title: String,
    pub author: String,
    pub biblio: String,
    pub text: String,
    /// The `TEXT` zone body before newline collapsing; used for exact
    /// phrase counting (§4.7's `freq`/`tf` phrase dispatch).
    pub original_text: String,
    pub weighted_length: f64,
}

/// Parse one XML document from its textual contents. Returns `None` if any
/// of `document_number`, `author`, `biblio`, `text`, `title` is missing, or
/// if `document_number` does not parse as a non-negative integer (§4.2).
#[must_use]
pub fn parse_xml(xml: &str) -> Option<Document> {
    let parser = EventReader::from_str(xml);

    let mut document_number: Option<String> = None;
    let mut title: Option<String> = None;
    let mut author: Option<String> = None;
    let mut biblio: Option<String> = None;
    let mut text: Option<String> = None;
    let mut original_text = String::new();
    let mut weighted_length = 0.0_f64;

    let mut data = String::new();
    let mut original_data = String::new();

    for event in parser {
        let event = event.ok()?;
        match event {
            XmlEvent::StartElement { .. } => {
                data.clear();
                original_data.clear();
            }
            XmlEvent::Characters(chunk) | XmlEvent::CData(chunk) => {
                data.push_str(&chunk.replace('\n', " "));
                original_data.push_str(&chunk);
            }
            XmlEvent::EndElement { name } => {
                match name.local_name.to_lowercase().as_str() {
                    "docno" => document_number = Some(data.trim().to_string()),
                    "author" => {
                        weighted_length += data.len() as f64 * Zone::Author.weight();
                        author = Some(std::mem::take(&mut data));
                    }
                    "biblio" => {
                        weighted_length += data.len() as f64 * Zone::Biblio.weight();
                        biblio = Some(std::mem::take(&mut data));
                    }
                    "text" => {
                        weighted_length += data.len() as f64 * Zone::Text.weight();
                        text = Some(data.clone());
                        original_text = std::mem::take(&mut original_data);
                    }
                    "title" => {
                        weighted_length += data.len() as f64 * Zone::Title.weight();
                        title = Some(std::mem::take(&mut data));
                    }
                    "doc" => {}
                    other => eprintln!("Warning: unexpected tag <{other}>"),
                }
                data.clear();
                original_data.clear();
            }
            _ => {}
        }
    }

    let document_number = document_number?;
    let document_id: u32 = document_number.trim().parse().ok()?;

    Some(Document {
        document_id,
        document_number,
        title: title?,
        author: author?,
        biblio: biblio?,
        text: text?,
        original_text,
        weighted_length,
    })
}

/// The four zone texts of a document, paired with their `Zone`, in the
/// fixed order used by both pass 1 and pass 2.
#[must_use]
pub fn zones(doc: &Document) -> [(Zone, &str); 4] {
    [
        (Zone::Author, doc.author.as_str()),
        (Zone::Title, doc.title.as_str()),
        (Zone::Biblio, doc.biblio.as_str()),
        (Zone::Text, doc.text.as_str()),
    ]
}

/// Read and parse a document from disk. Malformed input (unreadable file,
/// invalid UTF-8, missing required tags) is logged to stderr and yields
/// `None` rather than propagating an error — indexing continues (§7).
#[must_use]
pub fn parse_file(path: &Path) -> Option<Document> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("Warning: could not read {}: {err}", path.display());
            return None;
        }
    };
    let xml = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(_) => {
            eprintln!("Warning: {} is not valid UTF-8", path.display());
            return None;
        }
    };
    let doc = parse_xml(&xml);
    if doc.is_none() {
        eprintln!("Warning: could not parse document {}", path.display());
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(docno: &str) -> String {
        format!(
            "<DOC><DOCNO>{docno}</DOCNO><TITLE>Cats</TITLE><AUTHOR>X</AUTHOR><BIBLIO>Y</BIBLIO><TEXT>The cat</TEXT></DOC>"
        )
    }

    #[test]
    fn parses_well_formed_document() {
        let doc = parse_xml(&sample("1")).expect("should parse");
        assert_eq!(doc.document_id, 1);
        assert_eq!(doc.document_number, "1");
        assert_eq!(doc.title, "Cats");
        assert_eq!(doc.author, "X");
        assert_eq!(doc.biblio, "Y");
        assert_eq!(doc.text, "The cat");
        assert_eq!(doc.original_text, "The cat");
    }

    #[test]
    fn weighted_length_sums_only_named_zones() {
        let doc = parse_xml(&sample("1")).unwrap();
        let expected = "X".len() as f64 * Zone::Author.weight()
            + "Cats".len() as f64 * Zone::Title.weight()
            + "Y".len() as f64 * Zone::Biblio.weight()
            + "The cat".len() as f64 * Zone::Text.weight();
        assert!((doc.weighted_length - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_required_field_fails_parse() {
        let xml = "<DOC><DOCNO>1</DOCNO><TITLE>Cats</TITLE><AUTHOR>X</AUTHOR></DOC>";
        assert!(parse_xml(xml).is_none());
    }

    #[test]
    fn non_numeric_docno_fails_parse() {
        let xml = sample("not-a-number");
        assert!(parse_xml(&xml).is_none());
    }

    #[test]
    fn embedded_newline_is_collapsed_except_in_original_text() {
        let xml = "<DOC><DOCNO>1</DOCNO><TITLE>T</TITLE><AUTHOR>A</AUTHOR><BIBLIO>B</BIBLIO><TEXT>line one\nline two</TEXT></DOC>";
        let doc = parse_xml(xml).unwrap();
        assert_eq!(doc.text, "line one line two");
        assert_eq!(doc.original_text, "line one\nline two");
    }
}
