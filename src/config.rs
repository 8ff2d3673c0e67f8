//! Matching configuration.
//!
//! Every policy value of a matching run lives here so it can be tuned per
//! run and loaded from any serde format. Nothing downstream hard-codes a
//! weight, bound, sentinel, or seed.
//!
//! # Presets
//!
//! | Preset | Rows | Columns | Pruning | Slots |
//! |--------|------|---------|---------|-------|
//! | [`MatchConfig::mentoring`] | mentor takes 2..=3 | mentee gets exactly 1 | off | - |
//! | [`MatchConfig::reviewing`] | paper gets exactly 6 | reviewer takes 3..=10 | off | - |
//! | [`MatchConfig::peer`] | 6 meetings | 6 meetings | 2 lowest per row | 6 |

use serde::{Deserialize, Serialize};

use crate::affinity::AffinityParams;
use crate::conflicts::ConflictRules;
use crate::models::{BoundPair, CapacityBounds};

/// Policy values of one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Topic affinity over profile text.
    pub affinity: AffinityParams,
    /// Affinity over location text.
    pub location_affinity: AffinityParams,
    /// Weight of the location matrix in the composite score.
    pub location_weight: f64,
    /// Weight of the attendance-mode matrix in the composite score.
    pub modality_weight: f64,
    /// Per-row (left entity) match count bounds.
    pub row_bounds: BoundPair,
    /// Per-column (right entity) match count bounds.
    pub col_bounds: BoundPair,
    /// Score written into forbidden cells.
    pub forbidden_score: f64,
    /// LP values strictly above this are accepted by the rounder.
    pub acceptance_threshold: f64,
    /// Lowest-affinity cells removed from each row before solving (0 = off).
    pub prune_lowest_per_row: usize,
    /// Attribute-based conflict rules for bipartite runs.
    pub conflicts: ConflictRules,
    /// Minimum similarity (0..=100) for an exclusion request to match a person.
    pub fuzzy_threshold: f64,
    /// Also exclude pairs of people who named the same person.
    pub coreferred_exclusions: bool,
    /// Upper bound on timeslots in peer scheduling.
    pub slot_limit: Option<usize>,
    /// Seed for the backfill pairing.
    pub seed: u64,
}

impl MatchConfig {
    /// Mentor/mentee defaults.
    pub fn mentoring() -> Self {
        Self::default()
    }

    /// Paper/reviewer defaults: six reviewers per paper, 3..=10 papers per
    /// reviewer. No seniority rule.
    pub fn reviewing() -> Self {
        Self {
            row_bounds: BoundPair::exactly(6),
            col_bounds: BoundPair::new(3, 10),
            conflicts: ConflictRules {
                seniority: false,
                max_timezone_gap: None,
                ..ConflictRules::default()
            },
            ..Self::default()
        }
    }

    /// Peer ("mind matching") defaults: six meetings per person, six
    /// timeslots.
    pub fn peer() -> Self {
        Self {
            row_bounds: BoundPair::exactly(6),
            col_bounds: BoundPair::exactly(6),
            prune_lowest_per_row: 2,
            slot_limit: Some(6),
            ..Self::default()
        }
    }

    /// Capacity bounds of this configuration.
    pub fn bounds(&self) -> CapacityBounds {
        CapacityBounds::new(self.row_bounds, self.col_bounds)
    }

    /// Sets the topic affinity parameters.
    pub fn with_affinity(mut self, params: AffinityParams) -> Self {
        self.affinity = params;
        self
    }

    /// Sets the location and attendance-mode weights.
    pub fn with_weights(mut self, location: f64, modality: f64) -> Self {
        self.location_weight = location;
        self.modality_weight = modality;
        self
    }

    /// Sets row and column bounds.
    pub fn with_bounds(mut self, rows: BoundPair, cols: BoundPair) -> Self {
        self.row_bounds = rows;
        self.col_bounds = cols;
        self
    }

    /// Sets the forbidden-cell sentinel.
    pub fn with_forbidden_score(mut self, score: f64) -> Self {
        self.forbidden_score = score;
        self
    }

    /// Sets the rounding acceptance threshold.
    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    /// Sets low-affinity pruning.
    pub fn with_pruning(mut self, per_row: usize) -> Self {
        self.prune_lowest_per_row = per_row;
        self
    }

    /// Sets the conflict rules.
    pub fn with_conflicts(mut self, rules: ConflictRules) -> Self {
        self.conflicts = rules;
        self
    }

    /// Sets the fuzzy-match threshold for exclusion requests.
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    /// Enables or disables co-referred exclusions.
    pub fn with_coreferred_exclusions(mut self, enabled: bool) -> Self {
        self.coreferred_exclusions = enabled;
        self
    }

    /// Caps the number of timeslots.
    pub fn with_slot_limit(mut self, limit: usize) -> Self {
        self.slot_limit = Some(limit);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        let bounds = CapacityBounds::default();
        Self {
            affinity: AffinityParams::topic(),
            location_affinity: AffinityParams::categorical(),
            location_weight: 0.5,
            modality_weight: 0.5,
            row_bounds: bounds.rows,
            col_bounds: bounds.cols,
            forbidden_score: -1000.0,
            acceptance_threshold: 0.5,
            prune_lowest_per_row: 0,
            conflicts: ConflictRules::default(),
            fuzzy_threshold: 85.0,
            coreferred_exclusions: true,
            slot_limit: None,
            seed: 0,
        }
    }
}
