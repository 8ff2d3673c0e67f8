//! Capacity-constrained assignment as a linear program.
//!
//! # Formulation
//!
//! One variable `x_k` per active affinity cell `(r, c)`:
//!
//! ```text
//! maximize    Σ_k  A[r_k, c_k] · x_k
//! subject to  min_row ≤ Σ_{k : r_k = r} x_k ≤ max_row     for every row r
//!             min_col ≤ Σ_{k : c_k = c} x_k ≤ max_col     for every column c
//!             0 ≤ x_k ≤ 1                                  for every k
//! ```
//!
//! Every bound is written as a `≤` row (lower bounds negated) except when
//! min = max, which becomes a single equality row. The variable box is also
//! encoded as rows so that a solver may treat the variables as free.
//!
//! The row/column incidence matrix of a bipartite graph is totally
//! unimodular, so with integer bounds every vertex of this polytope is
//! integral and simplex solutions are already 0/1.
//!
//! # Reference
//! Schrijver (2003), "Combinatorial Optimization", Ch. 21 (b-matchings)

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, MatchResult};
use crate::models::{AffinityMatrix, BoundPair, CapacityBounds};

/// Compressed sparse row matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseMatrix {
    n_cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl SparseMatrix {
    /// Creates a matrix with no rows.
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            row_ptr: vec![0],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Appends a row given its non-zero entries.
    pub fn push_row(&mut self, entries: impl IntoIterator<Item = (usize, f64)>) {
        for (col, value) in entries {
            debug_assert!(col < self.n_cols);
            self.col_idx.push(col);
            self.values.push(value);
        }
        self.row_ptr.push(self.col_idx.len());
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.row_ptr.len() - 1
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Non-zero entries of row `i` as (column, value).
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Matrix-vector product.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        (0..self.n_rows())
            .map(|i| self.row(i).map(|(j, a)| a * x[j]).sum())
            .collect()
    }
}

/// Relation between a constraint row and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSense {
    /// `row · x ≤ bound`
    Le,
    /// `row · x = bound`
    Eq,
}

/// An encoded assignment LP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearProgram {
    /// Objective coefficient per variable (maximized).
    pub objective: Vec<f64>,
    /// Constraint matrix, one row per constraint.
    pub constraints: SparseMatrix,
    /// Sense of each constraint row.
    pub senses: Vec<RowSense>,
    /// Right-hand side of each constraint row.
    pub bounds: Vec<f64>,
    /// Affinity cell `(row, col)` behind each variable.
    pub cells: Vec<(usize, usize)>,
    /// Shape of the affinity matrix.
    pub shape: (usize, usize),
}

impl LinearProgram {
    /// Number of decision variables.
    pub fn variable_count(&self) -> usize {
        self.objective.len()
    }

    /// Number of constraint rows.
    pub fn constraint_count(&self) -> usize {
        self.bounds.len()
    }

    /// Whether `x` satisfies every constraint within `tol`.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        self.constraints
            .mul_vec(x)
            .iter()
            .zip(&self.senses)
            .zip(&self.bounds)
            .all(|((lhs, sense), rhs)| match sense {
                RowSense::Le => *lhs <= rhs + tol,
                RowSense::Eq => (lhs - rhs).abs() <= tol,
            })
    }

    /// Objective value of `x`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }
}

/// Builds a [`LinearProgram`] from an affinity matrix and capacity bounds.
///
/// # Example
///
/// ```
/// use u_match::lp::ConstraintEncoder;
/// use u_match::models::{AffinityMatrix, BoundPair, CapacityBounds};
///
/// let a = AffinityMatrix::from_rows(vec![vec![0.9, 0.1], vec![0.2, 0.8]]).unwrap();
/// let bounds = CapacityBounds::new(BoundPair::exactly(1), BoundPair::exactly(1));
/// let lp = ConstraintEncoder::new(&a, bounds).encode().unwrap();
/// assert_eq!(lp.variable_count(), 4);
/// // 2 row equalities + 2 column equalities + 2 box rows per variable.
/// assert_eq!(lp.constraint_count(), 12);
/// ```
pub struct ConstraintEncoder<'a> {
    affinity: &'a AffinityMatrix,
    bounds: CapacityBounds,
}

impl<'a> ConstraintEncoder<'a> {
    /// Creates an encoder.
    pub fn new(affinity: &'a AffinityMatrix, bounds: CapacityBounds) -> Self {
        Self { affinity, bounds }
    }

    /// Detects bound configurations that cannot be satisfied.
    ///
    /// Checks, in order: min ≤ max on both axes, column max ≥ 1, total
    /// demand on each side against total supply on the other, and that
    /// every row and column owns at least its minimum number of active cells.
    pub fn check_capacity(&self) -> MatchResult<()> {
        let (n_rows, n_cols) = self.affinity.shape();
        let CapacityBounds { rows, cols } = self.bounds;

        if !rows.is_ordered() {
            return Err(capacity_error(format!(
                "row bounds are inverted (min {} > max {})",
                rows.min, rows.max
            )));
        }
        if !cols.is_ordered() {
            return Err(capacity_error(format!(
                "column bounds are inverted (min {} > max {})",
                cols.min, cols.max
            )));
        }
        if cols.max == 0 && n_cols > 0 {
            return Err(capacity_error("column max is 0: no column can be assigned"));
        }
        // `usize::MAX` is a legitimate "no cap"; saturate instead of overflowing.
        let row_demand = n_rows.saturating_mul(rows.min);
        let row_supply = n_rows.saturating_mul(rows.max);
        let col_demand = n_cols.saturating_mul(cols.min);
        let col_supply = n_cols.saturating_mul(cols.max);
        if row_demand > col_supply {
            return Err(capacity_error(format!(
                "rows need at least {row_demand} matches but columns accept at most {col_supply}"
            )));
        }
        if col_demand > row_supply {
            return Err(capacity_error(format!(
                "columns need at least {col_demand} matches but rows accept at most {row_supply}"
            )));
        }
        for r in 0..n_rows {
            let available = self.affinity.active_in_row(r);
            if available < rows.min {
                return Err(capacity_error(format!(
                    "row {r} has {available} candidate cells but needs {}",
                    rows.min
                )));
            }
        }
        for c in 0..n_cols {
            let available = self.affinity.active_in_col(c);
            if available < cols.min {
                return Err(capacity_error(format!(
                    "column {c} has {available} candidate cells but needs {}",
                    cols.min
                )));
            }
        }
        Ok(())
    }

    /// Encodes the LP.
    ///
    /// Runs [`check_capacity`](Self::check_capacity) first.
    pub fn encode(&self) -> MatchResult<LinearProgram> {
        self.check_capacity()?;

        let (n_rows, n_cols) = self.affinity.shape();
        let cells: Vec<(usize, usize)> = self.affinity.active_cells().collect();
        let objective: Vec<f64> = cells
            .iter()
            .map(|&(r, c)| self.affinity.get(r, c))
            .collect();

        let mut by_row: Vec<Vec<usize>> = vec![Vec::new(); n_rows];
        let mut by_col: Vec<Vec<usize>> = vec![Vec::new(); n_cols];
        for (k, &(r, c)) in cells.iter().enumerate() {
            by_row[r].push(k);
            by_col[c].push(k);
        }

        let mut constraints = SparseMatrix::new(cells.len());
        let mut senses = Vec::new();
        let mut bounds = Vec::new();

        for vars in &by_row {
            push_sum_bounds(vars, self.bounds.rows, &mut constraints, &mut senses, &mut bounds);
        }
        for vars in &by_col {
            push_sum_bounds(vars, self.bounds.cols, &mut constraints, &mut senses, &mut bounds);
        }
        for k in 0..cells.len() {
            constraints.push_row([(k, 1.0)]);
            senses.push(RowSense::Le);
            bounds.push(1.0);
            constraints.push_row([(k, -1.0)]);
            senses.push(RowSense::Le);
            bounds.push(0.0);
        }

        tracing::debug!(
            variables = cells.len(),
            constraints = bounds.len(),
            nonzeros = constraints.nnz(),
            "assignment LP encoded"
        );

        Ok(LinearProgram {
            objective,
            constraints,
            senses,
            bounds,
            cells,
            shape: (n_rows, n_cols),
        })
    }
}

fn push_sum_bounds(
    vars: &[usize],
    bound: BoundPair,
    constraints: &mut SparseMatrix,
    senses: &mut Vec<RowSense>,
    rhs: &mut Vec<f64>,
) {
    if bound.is_exact() {
        constraints.push_row(vars.iter().map(|&k| (k, 1.0)));
        senses.push(RowSense::Eq);
        rhs.push(bound.max as f64);
        return;
    }
    constraints.push_row(vars.iter().map(|&k| (k, 1.0)));
    senses.push(RowSense::Le);
    rhs.push(bound.max as f64);
    if bound.min > 0 {
        constraints.push_row(vars.iter().map(|&k| (k, -1.0)));
        senses.push(RowSense::Le);
        rhs.push(-(bound.min as f64));
    }
}

fn capacity_error(message: impl Into<String>) -> MatchError {
    MatchError::Capacity(message.into())
}
