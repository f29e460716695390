//! Short-term memory of recently abandoned assignments.

use crate::instance::{CellIndex, Frequency};
use crate::solution::Move;
use std::collections::HashMap;

/// A transceiver slot paired with a frequency it recently held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabuKey {
    pub cell: CellIndex,
    pub slot: usize,
    pub frequency: Frequency,
}

/// Tabu list: key -> iteration at which the prohibition lapses
///
/// Applying a move at iteration `it` forbids putting the old frequency back
/// in the same slot until iteration `it + tenure`. A key is tabu while its
/// expiry is strictly greater than the current iteration, so a tenure of 0
/// never forbids anything.
#[derive(Debug, Clone)]
pub struct TabuMemory {
    tenure: usize,
    entries: HashMap<TabuKey, usize>,
}

impl TabuMemory {
    pub fn new(tenure: usize) -> Self {
        TabuMemory {
            tenure,
            entries: HashMap::new(),
        }
    }

    pub fn is_tabu(
        &self,
        cell: CellIndex,
        slot: usize,
        frequency: Frequency,
        iteration: usize,
    ) -> bool {
        self.entries
            .get(&TabuKey { cell, slot, frequency })
            .map(|&exp| exp > iteration)
            .unwrap_or(false)
    }

    /// Whether applying `mv` would put back a recently abandoned frequency
    pub fn is_move_tabu(&self, mv: &Move, iteration: usize) -> bool {
        self.is_tabu(mv.cell, mv.slot, mv.new, iteration)
    }

    /// Remember that `mv` abandoned its old frequency at `iteration`.
    /// An existing entry for the same key is overwritten. The expiry
    /// saturates, so a huge tenure forbids the key for the rest of the run.
    pub fn record(&mut self, mv: &Move, iteration: usize) {
        let key = TabuKey {
            cell: mv.cell,
            slot: mv.slot,
            frequency: mv.old,
        };
        self.entries.insert(key, iteration.saturating_add(self.tenure));
    }

    /// Number of keys still tabu at `iteration`
    pub fn active_count(&self, iteration: usize) -> usize {
        self.entries.values().filter(|&&exp| exp > iteration).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expiry(tabu: &TabuMemory, cell: CellIndex, slot: usize, f: Frequency) -> Option<usize> {
        tabu.entries.get(&TabuKey { cell, slot, frequency: f }).copied()
    }

    #[test]
    fn test_record_forbids_reverting() {
        let mut tabu = TabuMemory::new(3);
        let mv = Move::new(0, 1, 5, 8);
        tabu.record(&mv, 10);

        assert_eq!(expiry(&tabu, 0, 1, 5), Some(13));
        assert!(tabu.is_move_tabu(&mv.reversed(), 10));
        assert!(tabu.is_move_tabu(&mv.reversed(), 12));
        assert!(!tabu.is_move_tabu(&mv.reversed(), 13));
        // the frequency just taken is not tabu
        assert!(!tabu.is_tabu(0, 1, 8, 10));
    }

    #[test]
    fn test_keys_are_per_slot() {
        let mut tabu = TabuMemory::new(5);
        tabu.record(&Move::new(2, 0, 4, 6), 0);
        assert!(tabu.is_tabu(2, 0, 4, 1));
        assert!(!tabu.is_tabu(2, 1, 4, 1));
        assert!(!tabu.is_tabu(3, 0, 4, 1));
    }

    #[test]
    fn test_zero_tenure_never_forbids() {
        let mut tabu = TabuMemory::new(0);
        let mv = Move::new(0, 0, 1, 2);
        tabu.record(&mv, 4);
        assert!(!tabu.is_move_tabu(&mv.reversed(), 4));
        assert_eq!(tabu.active_count(4), 0);
    }

    #[test]
    fn test_rerecord_overwrites_expiry() {
        let mut tabu = TabuMemory::new(2);
        let mv = Move::new(1, 0, 3, 7);
        tabu.record(&mv, 0);
        tabu.record(&mv, 5);
        assert_eq!(tabu.entries.len(), 1);
        assert_eq!(expiry(&tabu, 1, 0, 3), Some(7));
        assert!(tabu.is_tabu(1, 0, 3, 6));
    }

    #[test]
    fn test_active_count() {
        let mut tabu = TabuMemory::new(4);
        tabu.record(&Move::new(0, 0, 1, 2), 0);
        tabu.record(&Move::new(0, 0, 2, 3), 2);
        assert_eq!(tabu.active_count(3), 2);
        assert_eq!(tabu.active_count(4), 1);
        assert_eq!(tabu.active_count(6), 0);
        assert_eq!(tabu.entries.len(), 2);
        tabu.clear();
        assert_eq!(tabu.active_count(0), 0);
    }

    #[test]
    fn test_huge_tenure_saturates() {
        let mut tabu = TabuMemory::new(usize::MAX);
        let mv = Move::new(0, 0, 1, 2);
        tabu.record(&mv, 7);

        assert_eq!(expiry(&tabu, 0, 0, 1), Some(usize::MAX));
        assert!(tabu.is_move_tabu(&mv.reversed(), 1_000_000));
    }
}
