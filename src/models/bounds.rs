//! Capacity bounds.
//!
//! Bounds are global per axis: "every mentor serves between 2 and
//! `max_mentees` mentees", "every mentee is served by exactly one mentor".

use serde::{Deserialize, Serialize};

/// Inclusive (min, max) bound on how many cells a row or column selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundPair {
    /// Minimum selected cells.
    pub min: usize,
    /// Maximum selected cells.
    pub max: usize,
}

impl BoundPair {
    /// Creates a bound pair.
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// min = max = `k`.
    pub fn exactly(k: usize) -> Self {
        Self { min: k, max: k }
    }

    /// 0..=`max`.
    pub fn at_most(max: usize) -> Self {
        Self { min: 0, max }
    }

    /// Whether min ≤ max.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Whether `count` lies within the bounds.
    #[inline]
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }

    /// Whether the bound pins an exact count.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }
}

/// Row and column bounds of one matching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityBounds {
    /// Bounds on each row (left entity).
    pub rows: BoundPair,
    /// Bounds on each column (right entity).
    pub cols: BoundPair,
}

impl CapacityBounds {
    /// Creates capacity bounds.
    pub fn new(rows: BoundPair, cols: BoundPair) -> Self {
        Self { rows, cols }
    }
}

impl Default for CapacityBounds {
    /// Mentor/mentee default: each mentor takes 2..=3 mentees, each mentee
    /// gets exactly one mentor.
    fn default() -> Self {
        Self {
            rows: BoundPair::new(2, 3),
            cols: BoundPair::exactly(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_pair_contains() {
        let b = BoundPair::new(2, 3);
        assert!(!b.contains(1));
        assert!(b.contains(2));
        assert!(b.contains(3));
        assert!(!b.contains(4));
        assert!(b.is_ordered());
        assert!(!b.is_exact());
        assert!(BoundPair::exactly(6).is_exact());
        assert!(!BoundPair::new(3, 2).is_ordered());
    }
}
