//! Penalty tallying
//!
//! This module tracks the penalties handed out to participants over one
//! session. Counts only ever grow, and entries are kept even after a
//! participant leaves the roster so historical tallies stay available for
//! display; callers filter by current roster membership when stale entries
//! should be hidden.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::roster::Id;

/// Serialization helper for the PenaltyLedger struct
#[derive(Deserialize)]
struct LedgerSerde {
    counts: HashMap<Id, u64>,
}

/// Accumulating per-participant penalty counts
///
/// A participant with no entry has an implicit count of zero. There is no
/// decrement and no removal: the ledger is an append-only tally.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(from = "LedgerSerde")]
pub struct PenaltyLedger {
    /// Accumulated count per participant
    counts: HashMap<Id, u64>,

    /// Standings in descending count order (cached)
    #[serde(skip_serializing)]
    standings_descending: Vec<(Id, u64)>,
}

impl From<LedgerSerde> for PenaltyLedger {
    /// Reconstructs the ledger from serialized data
    ///
    /// This rebuilds the cached standings from the counts, which is
    /// necessary since the cache is not serialized.
    fn from(serde: LedgerSerde) -> Self {
        let LedgerSerde { counts } = serde;
        let standings_descending = Self::compute_standings(&counts);
        Self {
            counts,
            standings_descending,
        }
    }
}

impl PenaltyLedger {
    /// Computes the standings in descending count order
    fn compute_standings(counts: &HashMap<Id, u64>) -> Vec<(Id, u64)> {
        counts
            .iter()
            .map(|(id, count)| (*id, *count))
            .sorted_by_key(|(_, count)| std::cmp::Reverse(*count))
            .collect_vec()
    }

    /// Adds one penalty to a participant's tally
    ///
    /// A participant without an entry starts from zero, so the first
    /// increment yields 1.
    ///
    /// # Returns
    ///
    /// The participant's new total.
    pub fn increment(&mut self, id: Id) -> u64 {
        let count = self.counts.entry(id).or_default();
        *count += 1;
        let new_count = *count;
        self.standings_descending = Self::compute_standings(&self.counts);
        new_count
    }

    /// Returns a participant's current tally (zero if absent)
    pub fn count(&self, id: Id) -> u64 {
        self.counts.get(&id).copied().unwrap_or_default()
    }

    /// Returns all tracked tallies in descending count order
    pub fn standings_descending(&self) -> &[(Id, u64)] {
        &self.standings_descending
    }

    /// Returns the number of participants with a recorded tally
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Checks whether no penalties have been recorded yet
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
