//! Least-assigned group allocation
//!
//! Hands out the condition with the fewest participants so far, breaking ties
//! uniformly at random so no condition is favoured by its position in the list.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{GroupLabel, GroupSet};

/// Counter-based allocator over a fixed [`GroupSet`].
///
/// After every [`assign`](Self::assign) the largest and smallest counters
/// differ by at most one, and their sum equals the number of assignments.
/// Counters are never decremented.
#[derive(Debug)]
pub struct GroupBalancer<R = StdRng> {
    groups: GroupSet,
    counts: Vec<u64>,
    rng: R,
}

impl GroupBalancer<StdRng> {
    pub fn new(groups: GroupSet) -> Self {
        Self::with_rng(groups, StdRng::from_entropy())
    }
}

impl<R: Rng> GroupBalancer<R> {
    pub fn with_rng(groups: GroupSet, rng: R) -> Self {
        let counts = vec![0; groups.len()];
        Self { groups, counts, rng }
    }

    /// Pick a least-assigned group, count it, and return it
    pub fn assign(&mut self) -> GroupLabel {
        let candidates = self.least_assigned_indices();
        let index = candidates[self.rng.gen_range(0..candidates.len())];

        self.counts[index] += 1;
        self.groups.labels()[index].clone()
    }

    /// Groups a call to `assign` may currently return
    pub fn least_assigned(&self) -> Vec<&GroupLabel> {
        self.least_assigned_indices()
            .into_iter()
            .map(|index| &self.groups.labels()[index])
            .collect()
    }

    fn least_assigned_indices(&self) -> Vec<usize> {
        let min = self.counts.iter().copied().min().unwrap_or(0);
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == min)
            .map(|(index, _)| index)
            .collect()
    }

    /// Snapshot of the counters in group order
    pub fn counts(&self) -> Vec<(GroupLabel, u64)> {
        self.groups
            .labels()
            .iter()
            .cloned()
            .zip(self.counts.iter().copied())
            .collect()
    }

    pub fn count_of(&self, label: &GroupLabel) -> Option<u64> {
        self.groups
            .labels()
            .iter()
            .position(|candidate| candidate == label)
            .map(|index| self.counts[index])
    }

    pub fn total_assigned(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn groups(&self) -> &GroupSet {
        &self.groups
    }
}
