//! LP solution → discrete assignment.
//!
//! # Algorithm
//!
//! 1. Candidates are the variables whose value exceeds the acceptance
//!    threshold, minus forbidden cells and excluded pairs.
//! 2. Candidates are ranked by LP value (quantized to 1e-6), then affinity
//!    descending, then row and column ascending.
//! 3. Walking the ranking, a candidate is accepted while both its row and
//!    its column are below their maximum.
//!
//! For the totally unimodular b-matching LP the simplex solution is already
//! 0/1 and every candidate is accepted. The greedy pass matters only for
//! fractional solutions from other backends, where it guarantees that
//! maximum bounds and exclusions always hold.

use super::encoder::LinearProgram;
use super::solver::LpSolution;
use crate::error::{MatchError, MatchResult};
use crate::models::{AffinityMatrix, Assignment, CapacityBounds, ExclusionSet};

const VALUE_QUANTUM: f64 = 1e-6;

/// Threshold rounding with capacity-aware greedy acceptance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentRounder {
    threshold: f64,
    forbidden_score: f64,
}

impl AssignmentRounder {
    /// Creates a rounder.
    ///
    /// Variables strictly above `threshold` are candidates; cells scored at
    /// or below `forbidden_score` are never selected.
    pub fn new(threshold: f64, forbidden_score: f64) -> Self {
        Self {
            threshold,
            forbidden_score,
        }
    }

    /// Rounds `solution` into an [`Assignment`].
    ///
    /// Returns `MatchError::Solver` if the solution is not optimal.
    pub fn round(
        &self,
        solution: &LpSolution,
        lp: &LinearProgram,
        affinity: &AffinityMatrix,
        bounds: &CapacityBounds,
        exclusions: &ExclusionSet,
    ) -> MatchResult<Assignment> {
        if !solution.status.is_optimal() {
            return Err(MatchError::Solver(solution.status.clone()));
        }
        if solution.values.len() != lp.variable_count() {
            return Err(MatchError::ShapeMismatch {
                expected: (lp.variable_count(), 1),
                found: (solution.values.len(), 1),
            });
        }

        let mut rejected_forbidden = 0usize;
        let mut candidates: Vec<(i64, f64, usize, usize)> = Vec::new();
        for (&(r, c), &value) in lp.cells.iter().zip(&solution.values) {
            if value <= self.threshold {
                continue;
            }
            if affinity.is_forbidden(r, c, self.forbidden_score) || exclusions.contains(r, c) {
                rejected_forbidden += 1;
                continue;
            }
            let key = (value / VALUE_QUANTUM).round() as i64;
            candidates.push((key, affinity.get(r, c), r, c));
        }

        candidates.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then(b.1.total_cmp(&a.1))
                .then(a.2.cmp(&b.2))
                .then(a.3.cmp(&b.3))
        });

        let (n_rows, n_cols) = lp.shape;
        let mut assignment = Assignment::new(n_rows, n_cols);
        let mut row_load = vec![0usize; n_rows];
        let mut col_load = vec![0usize; n_cols];
        let mut rejected_capacity = 0usize;

        for &(_, _, r, c) in &candidates {
            if row_load[r] >= bounds.rows.max || col_load[c] >= bounds.cols.max {
                rejected_capacity += 1;
                continue;
            }
            assignment.select(r, c);
            row_load[r] += 1;
            col_load[c] += 1;
        }

        if rejected_forbidden > 0 || rejected_capacity > 0 {
            tracing::warn!(
                rejected_forbidden,
                rejected_capacity,
                "rounding dropped LP-selected cells"
            );
        }
        tracing::debug!(selected = assignment.len(), "assignment rounded");

        Ok(assignment)
    }
}

impl Default for AssignmentRounder {
    fn default() -> Self {
        Self::new(0.5, -1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::encoder::ConstraintEncoder;
    use crate::lp::solver::SolveStatus;
    use crate::models::BoundPair;

    fn setup(values: Vec<Vec<f64>>, bounds: CapacityBounds) -> (AffinityMatrix, LinearProgram) {
        let a = AffinityMatrix::from_rows(values).unwrap();
        let lp = ConstraintEncoder::new(&a, bounds).encode().unwrap();
        (a, lp)
    }

    #[test]
    fn test_threshold_is_strict() {
        let bounds = CapacityBounds::new(BoundPair::at_most(2), BoundPair::at_most(2));
        let (a, lp) = setup(vec![vec![0.3, 0.4]], bounds);
        let sol = LpSolution::optimal(vec![0.5, 0.51], 0.0);
        let asg = AssignmentRounder::default()
            .round(&sol, &lp, &a, &bounds, &ExclusionSet::new())
            .unwrap();
        assert!(!asg.is_selected(0, 0));
        assert!(asg.is_selected(0, 1));
    }

    #[test]
    fn test_fractional_ties_respect_row_max() {
        // Row 0 may take one column; the LP is split 0.6/0.6.
        let bounds = CapacityBounds::new(BoundPair::at_most(1), BoundPair::at_most(1));
        let (a, lp) = setup(vec![vec![0.2, 0.7]], bounds);
        let sol = LpSolution::optimal(vec![0.6, 0.6], 0.0);
        let asg = AssignmentRounder::default()
            .round(&sol, &lp, &a, &bounds, &ExclusionSet::new())
            .unwrap();
        // Equal LP value: higher affinity wins.
        assert_eq!(asg.selected_in_row(0), &[1]);
        assert_eq!(asg.len(), 1);
    }

    #[test]
    fn test_forbidden_and_excluded_never_selected() {
        let bounds = CapacityBounds::new(BoundPair::at_most(3), BoundPair::at_most(1));
        let (mut a, _) = setup(vec![vec![0.5, 0.5, 0.5]], bounds);
        a.forbid(0, 0, -1000.0);
        let lp = ConstraintEncoder::new(&a, bounds).encode().unwrap();
        let exclusions: ExclusionSet = [(0, 1)].into_iter().collect();
        let sol = LpSolution::optimal(vec![1.0, 1.0, 1.0], 0.0);
        let asg = AssignmentRounder::default()
            .round(&sol, &lp, &a, &bounds, &exclusions)
            .unwrap();
        assert_eq!(asg.selected_in_row(0), &[2]);
    }

    #[test]
    fn test_non_optimal_refused() {
        let bounds = CapacityBounds::new(BoundPair::at_most(1), BoundPair::at_most(1));
        let (a, lp) = setup(vec![vec![0.5]], bounds);
        let sol = LpSolution::failed(SolveStatus::Infeasible);
        let err = AssignmentRounder::default()
            .round(&sol, &lp, &a, &bounds, &ExclusionSet::new())
            .unwrap_err();
        assert!(matches!(err, MatchError::Solver(SolveStatus::Infeasible)));
    }

    #[test]
    fn test_column_max_enforced() {
        let bounds = CapacityBounds::new(BoundPair::at_most(1), BoundPair::at_most(1));
        let (a, lp) = setup(vec![vec![0.9], vec![0.4]], bounds);
        let sol = LpSolution::optimal(vec![1.0, 1.0], 0.0);
        let asg = AssignmentRounder::default()
            .round(&sol, &lp, &a, &bounds, &ExclusionSet::new())
            .unwrap();
        assert!(asg.is_selected(0, 0));
        assert!(!asg.is_selected(1, 0));
    }
}
