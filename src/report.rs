//! Output rows and match quality metrics.
//!
//! # Output rows
//!
//! One [`MatchRow`] per left entity: its id, the ids of the right entities
//! it was matched to, and the affinity score of each match. The joined
//! forms are semicolon-delimited, ready for tabular export.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total affinity | Sum of scores over selected cells |
//! | Mean affinity | Total / number of matches |
//! | Min affinity | Weakest selected score |
//! | Matched rows / cols | Entities with at least one match |
//! | Row fill rate | Matched rows / all rows |

use serde::{Deserialize, Serialize};

use crate::models::{AffinityMatrix, Assignment, Entity, EntityId};

/// One left entity and its matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub left_id: EntityId,
    pub right_ids: Vec<EntityId>,
    pub scores: Vec<f64>,
}

impl MatchRow {
    /// Right ids joined by `;`.
    pub fn right_ids_joined(&self) -> String {
        self.right_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Scores joined by `;` with four decimals.
    pub fn scores_joined(&self) -> String {
        self.scores
            .iter()
            .map(|s| format!("{s:.4}"))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Builds one row per left entity, matches in column order.
    pub fn from_assignment(
        assignment: &Assignment,
        affinity: &AffinityMatrix,
        left: &[Entity],
        right: &[Entity],
    ) -> Vec<Self> {
        left.iter()
            .enumerate()
            .map(|(r, entity)| {
                let cols = assignment.selected_in_row(r);
                Self {
                    left_id: entity.id,
                    right_ids: cols.iter().map(|&c| right[c].id).collect(),
                    scores: cols.iter().map(|&c| affinity.get(r, c)).collect(),
                }
            })
            .collect()
    }
}

/// Assignment quality indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchKpi {
    /// Number of selected cells.
    pub matches: usize,
    /// Sum of selected affinity scores.
    pub total_affinity: f64,
    /// Mean selected affinity (0 when nothing is selected).
    pub mean_affinity: f64,
    /// Lowest selected affinity (0 when nothing is selected).
    pub min_affinity: f64,
    /// Rows with at least one match.
    pub matched_rows: usize,
    /// Columns with at least one match.
    pub matched_cols: usize,
    /// Rows without any match.
    pub unmatched_rows: usize,
    /// Columns without any match.
    pub unmatched_cols: usize,
}

impl MatchKpi {
    /// Computes KPIs from an assignment and the matrix it was solved on.
    pub fn calculate(assignment: &Assignment, affinity: &AffinityMatrix) -> Self {
        let (rows, cols) = assignment.shape();
        let scores: Vec<f64> = assignment.pairs().map(|(r, c)| affinity.get(r, c)).collect();

        let matches = scores.len();
        let total_affinity: f64 = scores.iter().sum();
        let mean_affinity = if matches == 0 {
            0.0
        } else {
            total_affinity / matches as f64
        };
        let min_affinity = scores.iter().copied().reduce(f64::min).unwrap_or(0.0);

        let matched_rows = (0..rows).filter(|&r| assignment.row_count(r) > 0).count();
        let matched_cols = assignment.col_counts().iter().filter(|&&n| n > 0).count();

        Self {
            matches,
            total_affinity,
            mean_affinity,
            min_affinity,
            matched_rows,
            matched_cols,
            unmatched_rows: rows - matched_rows,
            unmatched_cols: cols - matched_cols,
        }
    }

    /// Fraction of rows with at least one match.
    pub fn row_fill_rate(&self) -> f64 {
        let rows = self.matched_rows + self.unmatched_rows;
        if rows == 0 {
            1.0
        } else {
            self.matched_rows as f64 / rows as f64
        }
    }

    /// Whether every entity is matched and the weakest match clears `min_affinity`.
    pub fn meets_thresholds(&self, min_affinity: f64) -> bool {
        self.unmatched_rows == 0 && self.unmatched_cols == 0 && self.min_affinity >= min_affinity
    }
}
