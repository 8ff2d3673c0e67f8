//! Dense affinity matrix.
//!
//! Rows index the left population (mentors, papers), columns the right
//! population (mentees, reviewers). Alongside the scores the matrix keeps
//! an `active` mask: only active cells become decision variables in the
//! linear program, which is how low-affinity pruning shrinks the problem
//! before solving.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, MatchResult};

/// Dense row-major affinity matrix with an eligibility mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffinityMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
    active: Vec<bool>,
}

impl AffinityMatrix {
    /// Creates an all-zero matrix with every cell active.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
            active: vec![true; rows * cols],
        }
    }

    /// Builds a matrix from row vectors.
    ///
    /// Returns `ShapeMismatch` if rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> MatchResult<Self> {
        let n = rows.len();
        let m = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(n * m);
        for row in rows {
            if row.len() != m {
                return Err(MatchError::ShapeMismatch {
                    expected: (n, m),
                    found: (n, row.len()),
                });
            }
            values.extend(row);
        }
        Ok(Self {
            rows: n,
            cols: m,
            values,
            active: vec![true; n * m],
        })
    }

    /// (rows, cols).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of rows (left entities).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (right entities).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// Score at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[self.offset(row, col)]
    }

    /// Overwrites the score at (row, col).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.offset(row, col);
        self.values[idx] = value;
    }

    /// Scores of one row.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.values[start..start + self.cols]
    }

    /// Whether (row, col) may become an LP variable.
    #[inline]
    pub fn is_active(&self, row: usize, col: usize) -> bool {
        self.active[self.offset(row, col)]
    }

    /// Number of active cells.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Active cells of one row.
    pub fn active_in_row(&self, row: usize) -> usize {
        (0..self.cols).filter(|&c| self.is_active(row, c)).count()
    }

    /// Active cells of one column.
    pub fn active_in_col(&self, col: usize) -> usize {
        (0..self.rows).filter(|&r| self.is_active(r, col)).count()
    }

    /// Iterates active cells in row-major order.
    pub fn active_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols)
                .filter(move |&c| self.is_active(r, c))
                .map(move |c| (r, c))
        })
    }

    /// Adds `weight * other` in place. Activity masks are intersected.
    pub fn add_weighted(&mut self, other: &AffinityMatrix, weight: f64) -> MatchResult<()> {
        if other.shape() != self.shape() {
            return Err(MatchError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        for (v, o) in self.values.iter_mut().zip(&other.values) {
            *v += weight * o;
        }
        for (a, o) in self.active.iter_mut().zip(&other.active) {
            *a &= *o;
        }
        Ok(())
    }

    /// Marks (row, col) as forbidden by writing the sentinel score.
    ///
    /// Forbidden cells stay active: the LP keeps them as heavily penalised
    /// variables so that it remains feasible, and the rounder refuses them.
    pub fn forbid(&mut self, row: usize, col: usize, sentinel: f64) {
        let idx = self.offset(row, col);
        self.values[idx] = sentinel;
        self.active[idx] = true;
    }

    /// Forbids every (i, i) cell. Used when both sides are one population.
    pub fn forbid_diagonal(&mut self, sentinel: f64) {
        for i in 0..self.rows.min(self.cols) {
            self.forbid(i, i, sentinel);
        }
    }

    /// Whether (row, col) holds a score at or below the sentinel.
    #[inline]
    pub fn is_forbidden(&self, row: usize, col: usize, sentinel: f64) -> bool {
        self.get(row, col) <= sentinel
    }

    /// Deactivates the `n` lowest-scoring cells of every row.
    ///
    /// Forbidden cells (at or below `sentinel`) are skipped when counting,
    /// so pruning only ever removes genuine low-affinity candidates.
    /// Ties are broken by column index.
    pub fn prune_lowest_per_row(&mut self, n: usize, sentinel: f64) {
        if n == 0 {
            return;
        }
        for r in 0..self.rows {
            let mut order: Vec<usize> = (0..self.cols)
                .filter(|&c| !self.is_forbidden(r, c, sentinel))
                .collect();
            order.sort_by(|&a, &b| self.get(r, a).total_cmp(&self.get(r, b)).then(a.cmp(&b)));
            for &c in order.iter().take(n) {
                let idx = self.offset(r, c);
                self.active[idx] = false;
            }
        }
    }

    /// Whether every score is finite.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
