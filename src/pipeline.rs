//! End-to-end matching runs.
//!
//! # Stages
//!
//! ```text
//! entities → validate → vectorize → affinity (topic ⊕ location ⊕ modality)
//!          → conflicts → prune → encode LP → solve → round → post-check
//!          → (peers only) meeting graph → timetable
//! ```
//!
//! Every run is a pure function of its inputs and the configuration: the
//! same entities, configuration, and seed give the same assignment and the
//! same timetable.

use crate::affinity::{compose, modality_affinity, AffinityEngine};
use crate::config::MatchConfig;
use crate::conflicts::{coreferred, exclusion_requests, shared_affiliation, timezone_gap};
use crate::error::{MatchError, MatchResult};
use crate::lp::{AssignmentRounder, ConstraintEncoder, LpSolver, MicroLpSolver};
use crate::models::{AffinityMatrix, Assignment, Entity, EntityId, ExclusionSet};
use crate::profile::{ProfileVectorizer, TokenSequence};
use crate::report::{MatchKpi, MatchRow};
use crate::scheduler::{ColoringPolicy, GreedyByDegree, MeetingGraph, Timetable};
use crate::validation::{
    validate_assignment, validate_entities, validate_timetable, ValidationErrorKind,
};

/// Result of a bipartite run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Selected (row, col) cells.
    pub assignment: Assignment,
    /// Composite affinity after conflicts and pruning.
    pub affinity: AffinityMatrix,
    /// Pairs that were forbidden.
    pub exclusions: ExclusionSet,
    /// One output row per left entity.
    pub rows: Vec<MatchRow>,
    /// Quality indicators.
    pub kpi: MatchKpi,
    /// LP objective value.
    pub objective: f64,
}

/// Result of a peer run.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerOutcome {
    /// Selected (person, person) cells.
    pub assignment: Assignment,
    /// Self-affinity after conflicts and pruning.
    pub affinity: AffinityMatrix,
    /// Pairs that were forbidden (symmetric).
    pub exclusions: ExclusionSet,
    /// Person → people they must meet, in input order.
    pub adjacency: Vec<(EntityId, Vec<EntityId>)>,
    /// Per-person schedule.
    pub timetable: Timetable,
    /// Quality indicators.
    pub kpi: MatchKpi,
}

/// Matching pipeline.
///
/// # Example
///
/// ```
/// use u_match::config::MatchConfig;
/// use u_match::models::{BoundPair, Entity};
/// use u_match::pipeline::Matcher;
///
/// let mentors = vec![
///     Entity::new(1).with_profile_field("visual cortex"),
///     Entity::new(2).with_profile_field("speech perception"),
/// ];
/// let mentees = vec![
///     Entity::new(10).with_profile_field("visual cortex"),
///     Entity::new(11).with_profile_field("speech perception"),
///     Entity::new(12).with_profile_field("visual cortex"),
///     Entity::new(13).with_profile_field("speech perception"),
/// ];
/// let config = MatchConfig::mentoring()
///     .with_bounds(BoundPair::exactly(2), BoundPair::exactly(1));
/// let outcome = Matcher::new(config).match_bipartite(&mentors, &mentees).unwrap();
/// assert_eq!(outcome.rows[0].right_ids, vec![10, 12]);
/// assert_eq!(outcome.rows[1].right_ids_joined(), "11;13");
/// ```
#[derive(Debug)]
pub struct Matcher {
    config: MatchConfig,
    vectorizer: ProfileVectorizer,
    solver: Box<dyn LpSolver>,
    coloring: Box<dyn ColoringPolicy>,
    extra_exclusions: ExclusionSet,
}

impl Matcher {
    /// Creates a matcher with the microlp solver and greedy coloring.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            vectorizer: ProfileVectorizer::new(),
            solver: Box::new(MicroLpSolver::new()),
            coloring: Box::new(GreedyByDegree),
            extra_exclusions: ExclusionSet::new(),
        }
    }

    /// Replaces the LP solver.
    pub fn with_solver(mut self, solver: impl LpSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    /// Replaces the coloring policy.
    pub fn with_coloring(mut self, coloring: impl ColoringPolicy + 'static) -> Self {
        self.coloring = Box::new(coloring);
        self
    }

    /// Replaces the profile vectorizer.
    pub fn with_vectorizer(mut self, vectorizer: ProfileVectorizer) -> Self {
        self.vectorizer = vectorizer;
        self
    }

    /// Adds caller-supplied (row, col) exclusions, e.g. known co-authors.
    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.extra_exclusions.extend(&exclusions);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Composite affinity before conflicts.
    ///
    /// Topic affinity always; location affinity when any entity has a
    /// location; attendance-mode affinity when both sides report one.
    pub fn affinity(&self, left: &[Entity], right: &[Entity]) -> MatchResult<AffinityMatrix> {
        let topic = AffinityEngine::new(self.config.affinity).compute(
            &self.tokens(left, Entity::profile_refs),
            &self.tokens(right, Entity::profile_refs),
        )?;

        let mut parts: Vec<(f64, AffinityMatrix)> = Vec::new();

        let has_location = left.iter().chain(right).any(Entity::has_location);
        if has_location && self.config.location_weight != 0.0 {
            let location = AffinityEngine::new(self.config.location_affinity).compute(
                &self.tokens(left, Entity::location_refs),
                &self.tokens(right, Entity::location_refs),
            );
            match location {
                Ok(m) => parts.push((self.config.location_weight, m)),
                Err(MatchError::InsufficientData(reason)) => {
                    tracing::warn!(%reason, "location affinity skipped");
                }
                Err(e) => return Err(e),
            }
        }

        let reports_mode = |side: &[Entity]| side.iter().any(|e| e.attendance.is_some());
        if reports_mode(left) && reports_mode(right) && self.config.modality_weight != 0.0 {
            let l: Vec<_> = left.iter().map(|e| e.attendance).collect();
            let r: Vec<_> = right.iter().map(|e| e.attendance).collect();
            parts.push((self.config.modality_weight, modality_affinity(&l, &r)));
        }

        let weighted: Vec<(f64, &AffinityMatrix)> = parts.iter().map(|(w, m)| (*w, m)).collect();
        compose(topic, &weighted)
    }

    /// Matches two populations under row/column capacity bounds.
    ///
    /// # Errors
    /// - `InvalidInput` for duplicate ids or empty profiles
    /// - `InsufficientData` for fewer than two entities or an empty vocabulary
    /// - `Capacity` when the bounds cannot be met
    /// - `Solver` when the LP is not solved to optimality
    /// - `BoundsViolated` when the rounded assignment breaks a bound
    pub fn match_bipartite(&self, left: &[Entity], right: &[Entity]) -> MatchResult<MatchOutcome> {
        check_entities(&[left, right])?;
        tracing::info!(left = left.len(), right = right.len(), "bipartite matching started");

        let affinity = self.affinity(left, right)?;

        let mut exclusions = self.config.conflicts.bipartite(left, right);
        exclusions.extend(&self.extra_exclusions);

        let (assignment, affinity, objective) = self.solve(affinity, &exclusions)?;

        let rows = MatchRow::from_assignment(&assignment, &affinity, left, right);
        let kpi = MatchKpi::calculate(&assignment, &affinity);
        tracing::info!(
            matches = kpi.matches,
            mean_affinity = kpi.mean_affinity,
            "bipartite matching finished"
        );

        Ok(MatchOutcome {
            assignment,
            affinity,
            exclusions,
            rows,
            kpi,
            objective,
        })
    }

    /// Matches a population with itself and schedules the meetings.
    ///
    /// Nobody is matched with themselves. Exclusions come from fuzzy-matched
    /// exclusion requests (plus co-references when enabled), shared
    /// affiliations, and the time-zone window; all are applied both ways.
    ///
    /// The LP does not force `x[i][j] = x[j][i]`. A person meets everyone in
    /// their own row plus everyone whose row picked them, so with k matches
    /// per row a person can have up to 2k meetings. `slot_limit` caps the
    /// schedule; meetings that do not fit are listed in
    /// [`Timetable::dropped`].
    pub fn match_peers(&self, people: &[Entity]) -> MatchResult<PeerOutcome> {
        check_entities(&[people])?;
        tracing::info!(people = people.len(), "peer matching started");

        let mut affinity = self.affinity(people, people)?;
        affinity.forbid_diagonal(self.config.forbidden_score);

        let requests = exclusion_requests(people, self.config.fuzzy_threshold);
        let mut exclusions = requests.clone();
        if self.config.coreferred_exclusions {
            exclusions.extend(&coreferred(&requests));
        }
        if self.config.conflicts.shared_affiliation {
            exclusions.extend(&shared_affiliation(people, people));
        }
        if let Some(gap) = self.config.conflicts.max_timezone_gap {
            exclusions.extend(&timezone_gap(people, people, gap));
        }
        exclusions.extend(&self.extra_exclusions);
        let exclusions = without_diagonal(exclusions.symmetrized());

        let (assignment, affinity, _) = self.solve(affinity, &exclusions)?;

        let adjacency: Vec<(EntityId, Vec<EntityId>)> = people
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let partners = assignment
                    .selected_in_row(i)
                    .iter()
                    .map(|&j| people[j].id)
                    .collect();
                (p.id, partners)
            })
            .collect();

        let graph = MeetingGraph::from_adjacency(&adjacency);
        let roster: Vec<EntityId> = people.iter().map(|p| p.id).collect();
        let timetable = Timetable::build(
            &graph,
            self.coloring.as_ref(),
            &roster,
            self.config.slot_limit,
            self.config.seed,
        );
        let clashes = validate_timetable(&timetable);
        if !clashes.is_empty() {
            return Err(MatchError::BoundsViolated(clashes));
        }

        let kpi = MatchKpi::calculate(&assignment, &affinity);
        tracing::info!(
            meetings = graph.edge_count(),
            slots = timetable.slot_count(),
            "peer matching finished"
        );

        Ok(PeerOutcome {
            assignment,
            affinity,
            exclusions,
            adjacency,
            timetable,
            kpi,
        })
    }

    fn tokens<'a>(
        &self,
        entities: &'a [Entity],
        fields: impl Fn(&'a Entity) -> Vec<Option<&'a str>>,
    ) -> Vec<TokenSequence> {
        entities
            .iter()
            .map(|e| self.vectorizer.vectorize(&fields(e)))
            .collect()
    }

    /// Forbids, prunes, encodes, solves, rounds, and checks.
    fn solve(
        &self,
        mut affinity: AffinityMatrix,
        exclusions: &ExclusionSet,
    ) -> MatchResult<(Assignment, AffinityMatrix, f64)> {
        let (rows, cols) = affinity.shape();
        let sentinel = self.config.forbidden_score;
        for (r, c) in exclusions.iter() {
            if r >= rows || c >= cols {
                return Err(MatchError::ShapeMismatch {
                    expected: (rows, cols),
                    found: (r + 1, c + 1),
                });
            }
            affinity.forbid(r, c, sentinel);
        }
        affinity.prune_lowest_per_row(self.config.prune_lowest_per_row, sentinel);

        let bounds = self.config.bounds();
        let lp = ConstraintEncoder::new(&affinity, bounds).encode()?;
        let solution = self.solver.solve(&lp);
        if !solution.status.is_optimal() {
            return Err(MatchError::Solver(solution.status));
        }

        let rounder = AssignmentRounder::new(self.config.acceptance_threshold, sentinel);
        let assignment = rounder.round(&solution, &lp, &affinity, &bounds, exclusions)?;

        let violations = validate_assignment(&assignment, &bounds, exclusions);
        if !violations.is_empty() {
            tracing::warn!(violations = violations.len(), "rounded assignment breaks bounds");
            return Err(MatchError::BoundsViolated(violations));
        }

        Ok((assignment, affinity, solution.objective))
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

/// Rejects structurally invalid input.
///
/// A blank profile is not fatal: the entity still takes part with an empty
/// topic contribution.
fn check_entities(sides: &[&[Entity]]) -> MatchResult<()> {
    let (blank, errors): (Vec<_>, Vec<_>) = sides
        .iter()
        .filter_map(|side| validate_entities(side).err())
        .flatten()
        .partition(|e| e.kind == ValidationErrorKind::EmptyProfile);
    for e in &blank {
        tracing::warn!(detail = %e.message, "matching entity without profile text");
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(MatchError::InvalidInput(errors))
    }
}

fn without_diagonal(set: ExclusionSet) -> ExclusionSet {
    set.iter().filter(|(a, b)| a != b).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::ConflictRules;
    use crate::error::InsufficientData;
    use crate::lp::{LinearProgram, LpSolution, SolveStatus};
    use crate::models::{Attendance, BoundPair};
    use crate::scheduler::ExhaustiveColoring;
    use std::collections::BTreeSet;

    fn entity(id: EntityId, text: &str) -> Entity {
        Entity::new(id).with_profile_field(text)
    }

    fn mentoring(rows: BoundPair, cols: BoundPair) -> Matcher {
        Matcher::new(MatchConfig::mentoring().with_bounds(rows, cols))
    }

    #[test]
    fn test_three_mentors_two_mentees_each() {
        let mentors = vec![
            entity(1, "memory hippocampus"),
            entity(2, "reward dopamine"),
            entity(3, "speech phonology"),
        ];
        let mentees = vec![
            entity(10, "memory hippocampus"),
            entity(11, "reward dopamine"),
            entity(12, "speech phonology"),
            entity(13, "memory hippocampus"),
            entity(14, "reward dopamine"),
            entity(15, "speech phonology"),
        ];
        let outcome = mentoring(BoundPair::at_most(2), BoundPair::exactly(1))
            .match_bipartite(&mentors, &mentees)
            .unwrap();

        for r in 0..3 {
            assert_eq!(outcome.assignment.row_count(r), 2);
        }
        assert!(outcome.assignment.col_counts().iter().all(|&n| n == 1));
        assert_eq!(outcome.rows[0].right_ids, vec![10, 13]);
        assert_eq!(outcome.rows[1].right_ids, vec![11, 14]);
        assert_eq!(outcome.rows[2].right_ids, vec![12, 15]);
        assert_eq!(outcome.kpi.unmatched_cols, 0);
    }

    #[test]
    fn test_shared_affiliation_never_paired() {
        let mentors = vec![
            entity(1, "vision").with_affiliation("MIT"),
            entity(2, "language"),
        ];
        let mentees = vec![
            entity(10, "vision").with_affiliation("MIT"),
            entity(11, "vision"),
            entity(12, "language"),
            entity(13, "language"),
        ];
        let outcome = mentoring(BoundPair::exactly(2), BoundPair::exactly(1))
            .match_bipartite(&mentors, &mentees)
            .unwrap();
        assert!(outcome.exclusions.contains(0, 0));
        assert!(!outcome.assignment.is_selected(0, 0));
        assert!(outcome.assignment.is_selected(1, 0));
        assert!(outcome.assignment.is_selected(0, 1));
    }

    #[test]
    fn test_caller_exclusions_respected() {
        let mentors = vec![entity(1, "vision"), entity(2, "language")];
        let mentees = vec![
            entity(10, "vision"),
            entity(11, "vision"),
            entity(12, "language"),
            entity(13, "language"),
        ];
        let extra: ExclusionSet = [(1, 2)].into_iter().collect();
        let outcome = mentoring(BoundPair::exactly(2), BoundPair::exactly(1))
            .with_exclusions(extra)
            .match_bipartite(&mentors, &mentees)
            .unwrap();
        assert!(!outcome.assignment.is_selected(1, 2));
        assert_eq!(outcome.assignment.row_count(1), 2);
    }

    #[test]
    fn test_seniority_rule_applied() {
        let mentors = vec![
            entity(1, "vision").with_seniority(3),
            entity(2, "language").with_seniority(5),
        ];
        let mentees = vec![
            entity(10, "vision").with_seniority(4),
            entity(11, "vision").with_seniority(1),
            entity(12, "language").with_seniority(1),
            entity(13, "language").with_seniority(1),
        ];
        let outcome = mentoring(BoundPair::exactly(2), BoundPair::exactly(1))
            .match_bipartite(&mentors, &mentees)
            .unwrap();
        assert!(!outcome.assignment.is_selected(0, 0));

        let relaxed = Matcher::new(
            MatchConfig::mentoring()
                .with_bounds(BoundPair::exactly(2), BoundPair::exactly(1))
                .with_conflicts(ConflictRules::none()),
        )
        .match_bipartite(&mentors, &mentees)
        .unwrap();
        assert!(relaxed.assignment.is_selected(0, 0));
    }

    #[test]
    fn test_location_breaks_topic_ties() {
        let mentors = vec![
            entity(1, "vision cortex").with_location_field("Boston USA"),
            entity(2, "language syntax").with_location_field("Paris France"),
        ];
        let mentees = vec![
            entity(10, "vision cortex").with_location_field("Boston USA"),
            entity(11, "vision cortex").with_location_field("Paris France"),
            entity(12, "language syntax").with_location_field("Boston USA"),
            entity(13, "language syntax").with_location_field("Paris France"),
        ];
        let matcher = Matcher::default();
        let with_location = matcher.affinity(&mentors, &mentees).unwrap();
        assert_eq!(with_location.shape(), (2, 4));
        assert!(with_location.get(0, 0) > with_location.get(0, 1) + 0.5);

        let plain = |side: &[Entity]| -> Vec<Entity> {
            side.iter()
                .map(|e| Entity::new(e.id).with_optional_profile_field(e.profile_fields[0].clone()))
                .collect()
        };
        let topic_only = matcher.affinity(&plain(&mentors), &plain(&mentees)).unwrap();
        assert!((topic_only.get(0, 0) - topic_only.get(0, 1)).abs() < 1e-9);
    }

    #[test]
    fn test_attendance_mode_composed() {
        let mentors = vec![
            entity(1, "vision").with_attendance(Attendance::Onsite),
            entity(2, "language").with_attendance(Attendance::Virtual),
        ];
        let mentees = vec![
            entity(10, "vision").with_attendance(Attendance::Onsite),
            entity(11, "vision").with_attendance(Attendance::Virtual),
            entity(12, "language"),
        ];
        let a = Matcher::default().affinity(&mentors, &mentees).unwrap();
        assert!((a.get(0, 0) - a.get(0, 1) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_error_before_solving() {
        let mentors = vec![entity(1, "vision"), entity(2, "language"), entity(3, "vision")];
        let mentees: Vec<_> = (10..16)
            .map(|id| entity(id, if id % 2 == 0 { "vision" } else { "language" }))
            .collect();
        let err = mentoring(BoundPair::at_most(1), BoundPair::exactly(1))
            .match_bipartite(&mentors, &mentees)
            .unwrap_err();
        assert!(matches!(err, MatchError::Capacity(_)));
    }

    #[test]
    fn test_too_few_entities() {
        let err = Matcher::default()
            .match_bipartite(&[entity(1, "vision")], &[entity(2, "vision"), entity(3, "vision")])
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::InsufficientData(InsufficientData::TooFewEntities { .. })
        ));
    }

    #[test]
    fn test_invalid_input_collected() {
        let err = Matcher::default()
            .match_bipartite(
                &[entity(1, "a"), entity(1, "b")],
                &[entity(2, "c").with_utc_offset(20.0), entity(3, "c")],
            )
            .unwrap_err();
        match err {
            MatchError::InvalidInput(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_profile_still_matched() {
        let mentors = vec![entity(1, "vision cortex"), entity(2, "language syntax")];
        let mentees = vec![
            entity(10, "vision cortex"),
            Entity::new(11).with_optional_profile_field(None),
            entity(12, "language syntax"),
            entity(13, "vision cortex"),
        ];
        let outcome = mentoring(BoundPair::exactly(2), BoundPair::exactly(1))
            .match_bipartite(&mentors, &mentees)
            .unwrap();

        assert_eq!(outcome.affinity.get(0, 1), 0.0);
        assert_eq!(outcome.affinity.get(1, 1), 0.0);
        assert_eq!(outcome.assignment.col_count(1), 1);
        assert_eq!(outcome.rows[0].right_ids, vec![10, 13]);
        assert_eq!(outcome.rows[1].right_ids, vec![11, 12]);
    }

    #[derive(Debug)]
    struct FailingSolver;

    impl LpSolver for FailingSolver {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn solve(&self, _lp: &LinearProgram) -> LpSolution {
            LpSolution::failed(SolveStatus::NumericalFailure("stalled".into()))
        }
    }

    #[test]
    fn test_solver_failure_propagates() {
        let mentors = vec![entity(1, "vision"), entity(2, "language")];
        let mentees = vec![
            entity(10, "vision"),
            entity(11, "vision"),
            entity(12, "language"),
            entity(13, "language"),
        ];
        let err = mentoring(BoundPair::exactly(2), BoundPair::exactly(1))
            .with_solver(FailingSolver)
            .match_bipartite(&mentors, &mentees)
            .unwrap_err();
        assert!(matches!(err, MatchError::Solver(SolveStatus::NumericalFailure(_))));
    }

    fn four_people() -> Vec<Entity> {
        vec![
            entity(100, "vision cortex")
                .with_name("Ann Lee")
                .with_exclusion_request("Cal Poe"),
            entity(101, "language syntax")
                .with_name("Bob Ray")
                .with_exclusion_request("Dee Fox"),
            entity(102, "vision cortex").with_name("Cal Poe"),
            entity(103, "language syntax").with_name("Dee Fox"),
        ]
    }

    fn peer_matcher(k: usize) -> Matcher {
        Matcher::new(
            MatchConfig::peer()
                .with_bounds(BoundPair::exactly(k), BoundPair::exactly(k))
                .with_pruning(0)
                .with_seed(11),
        )
    }

    #[test]
    fn test_four_cycle_fits_two_slots() {
        let outcome = peer_matcher(2).match_peers(&four_people()).unwrap();

        assert!(outcome.exclusions.contains(0, 2));
        assert!(outcome.exclusions.contains(2, 0));
        assert_eq!(outcome.adjacency[0], (100, vec![101, 103]));
        assert_eq!(outcome.adjacency[1], (101, vec![100, 102]));

        let t = &outcome.timetable;
        assert_eq!(t.slot_count(), 2);
        for person in t.people() {
            let slots: BTreeSet<usize> = t.schedule(person).iter().map(|e| e.slot).collect();
            assert_eq!(slots.len(), t.schedule(person).len());
            assert_eq!(t.meetings_of(person).len(), 2);
        }
        assert!(validate_timetable(t).is_empty());
    }

    #[test]
    fn test_exhaustive_coloring_matches_greedy_on_cycle() {
        let outcome = peer_matcher(2)
            .with_coloring(ExhaustiveColoring::default())
            .match_peers(&four_people())
            .unwrap();
        assert_eq!(outcome.timetable.slot_count(), 2);
    }

    fn six_people() -> Vec<Entity> {
        vec![
            entity(1, "memory hippocampus"),
            entity(2, "reward dopamine"),
            entity(3, "speech phonology"),
            entity(4, "memory hippocampus"),
            entity(5, "reward dopamine"),
            entity(6, "speech phonology"),
        ]
    }

    #[test]
    fn test_diagonal_never_selected() {
        let outcome = peer_matcher(2).match_peers(&six_people()).unwrap();
        for i in 0..6 {
            assert!(!outcome.assignment.is_selected(i, i));
            assert_eq!(outcome.assignment.row_count(i), 2);
        }
        assert!(validate_timetable(&outcome.timetable).is_empty());
    }

    #[test]
    fn test_rerun_is_identical() {
        let matcher = peer_matcher(2);
        let people = six_people();
        let a = matcher.match_peers(&people).unwrap();
        let b = matcher.match_peers(&people).unwrap();
        assert_eq!(a.assignment, b.assignment);
        assert_eq!(a.timetable, b.timetable);

        let mentors = &people[..3];
        let mentees = &people[3..];
        let bip = mentoring(BoundPair::exactly(1), BoundPair::exactly(1));
        assert_eq!(
            bip.match_bipartite(mentors, mentees).unwrap(),
            bip.match_bipartite(mentors, mentees).unwrap()
        );
    }

    #[test]
    fn test_peer_preset_caps_slots() {
        let people: Vec<Entity> = (0..10)
            .map(|i| {
                let topic = ["memory hippocampus", "reward dopamine"][i % 2];
                entity(i as EntityId + 1, topic)
            })
            .collect();
        let matcher = Matcher::new(
            MatchConfig::peer()
                .with_bounds(BoundPair::exactly(4), BoundPair::exactly(4))
                .with_pruning(0),
        );
        let outcome = matcher.match_peers(&people).unwrap();
        let t = &outcome.timetable;
        assert!(t.slot_count() <= 6);
        for person in t.people() {
            assert!(t.meetings_of(person).len() <= 6);
        }
        assert!(validate_timetable(t).is_empty());
    }

    #[test]
    fn test_slot_limit_reports_dropped_meetings() {
        let matcher = Matcher::new(
            MatchConfig::peer()
                .with_bounds(BoundPair::exactly(2), BoundPair::exactly(2))
                .with_pruning(0)
                .with_slot_limit(1),
        );
        let outcome = matcher.match_peers(&four_people()).unwrap();
        assert_eq!(outcome.timetable.slot_count(), 1);
        assert_eq!(outcome.timetable.dropped().len(), 2);
    }
}
