//! Zone weighting.
//!
//! A document is split into four zones during parsing (§4.2). Every term
//! occurrence's zone determines how much it contributes to the document's
//! weighted length and to a term's normalised weight within that document.

use serde::{Deserialize, Serialize};

/// A scored section of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    Author,
    Title,
    Biblio,
    Text,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Author, Zone::Title, Zone::Biblio, Zone::Text];

    /// Scoring weight for this zone. Fixed at 1.2 for `Biblio`; see DESIGN.md
    /// for why 1.5 (an older source revision) was not chosen.
    #[inline]
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            Zone::Author => 3.0,
            Zone::Title => 2.0,
            Zone::Biblio => 1.2,
            Zone::Text => 1.0,
        }
    }

    /// Index into the 4-slot per-zone arrays carried by a vector-space entry.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Zone::Author => 0,
            Zone::Title => 1,
            Zone::Biblio => 2,
            Zone::Text => 3,
        }
    }
}
