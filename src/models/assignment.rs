//! Assignment (solution) model.
//!
//! An assignment is the discrete 0/1 matrix produced by rounding the LP
//! relaxation. It may carry violations when post-condition checks find
//! rows or columns outside their bounds.

use serde::{Deserialize, Serialize};

/// A discrete row × column assignment.
///
/// Stored as sorted column lists per row; the dense 0/1 view is
/// available through [`Assignment::is_selected`] and [`Assignment::to_dense`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assignment {
    rows: usize,
    cols: usize,
    selected: Vec<Vec<usize>>,
}

/// A post-condition violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Row, column, or person index the violation refers to.
    pub index: usize,
    /// Human-readable description.
    pub message: String,
}

/// Classification of violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Row selected fewer cells than its minimum.
    RowUnderfilled,
    /// Row selected more cells than its maximum.
    RowOverfilled,
    /// Column selected fewer cells than its minimum.
    ColumnUnderfilled,
    /// Column selected more cells than its maximum.
    ColumnOverfilled,
    /// An excluded or forbidden pair was selected.
    ExcludedPair,
    /// A person has two meetings in the same timeslot.
    DoubleBooked,
    /// Two people at one table disagree about who sits there.
    TableMismatch,
}

impl Assignment {
    /// Creates an empty assignment of the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            selected: vec![Vec::new(); rows],
        }
    }

    /// (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Selects (row, col). Returns `false` if already selected.
    pub fn select(&mut self, row: usize, col: usize) -> bool {
        let cols = &mut self.selected[row];
        match cols.binary_search(&col) {
            Ok(_) => false,
            Err(pos) => {
                cols.insert(pos, col);
                true
            }
        }
    }

    /// Whether (row, col) is selected.
    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.selected
            .get(row)
            .is_some_and(|cols| cols.binary_search(&col).is_ok())
    }

    /// Columns selected in a row, ascending.
    pub fn selected_in_row(&self, row: usize) -> &[usize] {
        &self.selected[row]
    }

    /// Number of cells selected in a row.
    pub fn row_count(&self, row: usize) -> usize {
        self.selected[row].len()
    }

    /// Number of cells selected in a column.
    pub fn col_count(&self, col: usize) -> usize {
        self.selected
            .iter()
            .filter(|cols| cols.binary_search(&col).is_ok())
            .count()
    }

    /// Per-column selection counts.
    pub fn col_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.cols];
        for cols in &self.selected {
            for &c in cols {
                counts[c] += 1;
            }
        }
        counts
    }

    /// All selected pairs in row-major order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.selected
            .iter()
            .enumerate()
            .flat_map(|(r, cols)| cols.iter().map(move |&c| (r, c)))
    }

    /// Total selected cells.
    pub fn len(&self) -> usize {
        self.selected.iter().map(Vec::len).sum()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dense 0/1 view.
    pub fn to_dense(&self) -> Vec<Vec<u8>> {
        let mut dense = vec![vec![0u8; self.cols]; self.rows];
        for (r, c) in self.pairs() {
            dense[r][c] = 1;
        }
        dense
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(violation_type: ViolationType, index: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type,
            index,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_counts() {
        let mut a = Assignment::new(2, 3);
        assert!(a.select(0, 2));
        assert!(a.select(0, 1));
        assert!(!a.select(0, 1));
        assert!(a.select(1, 1));

        assert_eq!(a.selected_in_row(0), &[1, 2]);
        assert_eq!(a.row_count(0), 2);
        assert_eq!(a.col_count(1), 2);
        assert_eq!(a.col_counts(), vec![0, 2, 1]);
        assert_eq!(a.len(), 3);
        assert!(a.is_selected(1, 1));
        assert!(!a.is_selected(1, 0));
    }

    #[test]
    fn test_to_dense() {
        let mut a = Assignment::new(2, 2);
        a.select(1, 0);
        assert_eq!(a.to_dense(), vec![vec![0, 0], vec![1, 0]]);
    }

    #[test]
    fn test_pairs_row_major() {
        let mut a = Assignment::new(3, 3);
        a.select(2, 0);
        a.select(0, 2);
        a.select(0, 1);
        let pairs: Vec<_> = a.pairs().collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (2, 0)]);
    }
}
