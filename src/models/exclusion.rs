//! Exclusion set (conflicts of interest).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of (row, col) pairs that must never be assigned.
///
/// Ordered so that iteration, and everything derived from it, is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSet {
    pairs: BTreeSet<(usize, usize)>,
}

impl ExclusionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one pair. Returns `true` if it was new.
    pub fn insert(&mut self, row: usize, col: usize) -> bool {
        self.pairs.insert((row, col))
    }

    /// Adds (a, b) and (b, a). Used when both sides are one population.
    pub fn insert_symmetric(&mut self, a: usize, b: usize) {
        self.pairs.insert((a, b));
        self.pairs.insert((b, a));
    }

    /// Whether (row, col) is excluded.
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.pairs.contains(&(row, col))
    }

    /// Merges another set into this one.
    pub fn extend(&mut self, other: &ExclusionSet) {
        self.pairs.extend(other.pairs.iter().copied());
    }

    /// Returns a copy with every pair mirrored.
    pub fn symmetrized(&self) -> Self {
        let mut out = self.clone();
        for &(a, b) in &self.pairs {
            out.pairs.insert((b, a));
        }
        out
    }

    /// Iterates pairs in (row, col) order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }

    /// Number of excluded pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair is excluded.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(usize, usize)> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = ExclusionSet::new();
        assert!(set.insert(0, 1));
        assert!(!set.insert(0, 1));
        assert!(set.contains(0, 1));
        assert!(!set.contains(1, 0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_symmetrized() {
        let set: ExclusionSet = [(0, 2), (1, 3)].into_iter().collect();
        let sym = set.symmetrized();
        assert!(sym.contains(2, 0));
        assert!(sym.contains(3, 1));
        assert_eq!(sym.len(), 4);
    }
}
