//! Per-document, per-term vector-space entries (§3, §4.5).

use crate::zone::Zone;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One `(document, term)` cell of the vector space.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorEntry {
    pub normalised_weight: f64,
    /// Positions within each zone, indexed by `Zone::index()`. 1-based,
    /// counted over surviving (stemmed) tokens only.
    pub positions: [Vec<u32>; 4],
    pub raw_frequency: u32,
}

impl VectorEntry {
    /// Fold in one occurrence of this term at `(zone, position)` for a
    /// document whose total weighted length is `weighted_length`.
    pub fn record_occurrence(&mut self, zone: Zone, position: u32, weighted_length: f64) {
        if weighted_length > 0.0 {
            self.normalised_weight += zone.weight() / weighted_length;
        }
        self.positions[zone.index()].push(position);
        self.raw_frequency += 1;
    }
}

/// `term_index → VectorEntry` for a single document.
pub type DocVector = HashMap<u32, VectorEntry>;

/// The full vector space, indexed directly by `document_id`; slot 0 is
/// unused (§3's lifecycle note — ids are assumed to start at 1, matching
/// `DOCNO`-derived ids).
pub type VectorSpace = Vec<Option<DocVector>>;

/// Allocate an empty vector space sized to the largest document id seen
/// plus one.
#[must_use]
pub fn allocate(max_document_id: u32) -> VectorSpace {
    vec![None; max_document_id as usize + 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_occurrence_accumulates_normalised_weight() {
        let mut entry = VectorEntry::default();
        entry.record_occurrence(Zone::Title, 1, 10.0);
        entry.record_occurrence(Zone::Text, 5, 10.0);
        let expected = Zone::Title.weight() / 10.0 + Zone::Text.weight() / 10.0;
        assert!((entry.normalised_weight - expected).abs() < 1e-9);
        assert_eq!(entry.raw_frequency, 2);
        assert_eq!(entry.positions[Zone::Title.index()], vec![1]);
        assert_eq!(entry.positions[Zone::Text.index()], vec![5]);
    }

    #[test]
    fn allocate_reserves_slot_zero() {
        let vs = allocate(4);
        assert_eq!(vs.len(), 5);
        assert!(vs[0].is_none());
    }
}
