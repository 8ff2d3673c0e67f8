//! Input and post-condition validation.
//!
//! Input checks run before any computation and collect every problem
//! instead of stopping at the first:
//! - Duplicate IDs
//! - Entities without any profile text
//! - UTC offsets outside ±14 hours
//!
//! Post-condition checks run on finished results:
//! - Assignment rows and columns within their bounds, no excluded pair
//! - Timetable without double-booking, table partners agreeing

use std::collections::{BTreeMap, HashSet};

use crate::models::{
    Assignment, CapacityBounds, Entity, EntityId, ExclusionSet, Violation, ViolationType,
};
use crate::scheduler::Timetable;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An entity has no non-blank profile field.
    EmptyProfile,
    /// A UTC offset is not a real time zone.
    InvalidUtcOffset,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates one population of entities.
///
/// Checks:
/// 1. No duplicate entity IDs
/// 2. Every entity has at least one non-blank profile field
/// 3. Every known UTC offset is finite and within ±14 hours
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_entities(entities: &[Entity]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for entity in entities {
        if !ids.insert(entity.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate entity ID: {}", entity.id),
            ));
        }

        let has_text = entity
            .profile_fields
            .iter()
            .flatten()
            .any(|f| !f.trim().is_empty());
        if !has_text {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyProfile,
                format!("Entity {} has no profile text", entity.id),
            ));
        }

        if let Some(offset) = entity.utc_offset {
            if !offset.is_finite() || offset.abs() > 14.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidUtcOffset,
                    format!("Entity {} has UTC offset {offset}", entity.id),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks an assignment against its bounds and exclusions.
///
/// Returns every violation found; an empty list means the assignment is
/// valid.
pub fn validate_assignment(
    assignment: &Assignment,
    bounds: &CapacityBounds,
    exclusions: &ExclusionSet,
) -> Vec<Violation> {
    let (rows, _) = assignment.shape();
    let mut violations = Vec::new();

    for r in 0..rows {
        let n = assignment.row_count(r);
        if n < bounds.rows.min {
            violations.push(Violation::new(
                ViolationType::RowUnderfilled,
                r,
                format!("Row {r} has {n} matches, minimum is {}", bounds.rows.min),
            ));
        } else if n > bounds.rows.max {
            violations.push(Violation::new(
                ViolationType::RowOverfilled,
                r,
                format!("Row {r} has {n} matches, maximum is {}", bounds.rows.max),
            ));
        }
    }

    for (c, &n) in assignment.col_counts().iter().enumerate() {
        if n < bounds.cols.min {
            violations.push(Violation::new(
                ViolationType::ColumnUnderfilled,
                c,
                format!("Column {c} has {n} matches, minimum is {}", bounds.cols.min),
            ));
        } else if n > bounds.cols.max {
            violations.push(Violation::new(
                ViolationType::ColumnOverfilled,
                c,
                format!("Column {c} has {n} matches, maximum is {}", bounds.cols.max),
            ));
        }
    }

    for (r, c) in assignment.pairs() {
        if exclusions.contains(r, c) {
            violations.push(Violation::new(
                ViolationType::ExcludedPair,
                r,
                format!("Excluded pair ({r}, {c}) was selected"),
            ));
        }
    }

    violations
}

/// Checks that nobody is in two places at once.
///
/// Every person has at most one entry per slot, and both people seated
/// at a table name each other as counterpart.
pub fn validate_timetable(timetable: &Timetable) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seats: BTreeMap<(usize, usize), Vec<(EntityId, Option<EntityId>)>> = BTreeMap::new();

    for person in timetable.people() {
        let mut slots = HashSet::new();
        for entry in timetable.schedule(person) {
            if !slots.insert(entry.slot) {
                violations.push(Violation::new(
                    ViolationType::DoubleBooked,
                    entry.slot,
                    format!("Person {person} appears twice in slot {}", entry.slot),
                ));
            }
            if let Some(table) = entry.table {
                seats
                    .entry((entry.slot, table))
                    .or_default()
                    .push((person, entry.counterpart));
            }
        }
    }

    for ((slot, table), occupants) in &seats {
        let consistent = match occupants.as_slice() {
            [(a, Some(pa)), (b, Some(pb))] => pa == b && pb == a,
            _ => false,
        };
        if !consistent {
            violations.push(Violation::new(
                ViolationType::TableMismatch,
                *slot,
                format!(
                    "Table {table} in slot {slot} has inconsistent occupants: {:?}",
                    occupants.iter().map(|(p, _)| p).collect::<Vec<_>>()
                ),
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundPair;
    use crate::scheduler::{GreedyByDegree, MeetingGraph};

    fn person(id: u64) -> Entity {
        Entity::new(id).with_profile_field("neural coding")
    }

    #[test]
    fn test_valid_entities() {
        assert!(validate_entities(&[person(1), person(2)]).is_ok());
    }

    #[test]
    fn test_duplicate_id() {
        let errors = validate_entities(&[person(1), person(1)]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_empty_profile() {
        let blank = Entity::new(3)
            .with_profile_field("   ")
            .with_optional_profile_field(None);
        let errors = validate_entities(&[person(1), blank]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyProfile);
        assert!(errors[0].message.contains("Entity 3"));
    }

    #[test]
    fn test_multiple_errors() {
        let errors = validate_entities(&[
            Entity::new(1),
            Entity::new(1).with_profile_field("x").with_utc_offset(20.0),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_assignment_bounds() {
        let bounds = CapacityBounds::new(BoundPair::new(1, 1), BoundPair::at_most(1));
        let mut asg = Assignment::new(2, 2);
        asg.select(0, 0);
        asg.select(0, 1);
        let violations = validate_assignment(&asg, &bounds, &ExclusionSet::new());
        let kinds: Vec<_> = violations.iter().map(|v| &v.violation_type).collect();
        assert!(kinds.contains(&&ViolationType::RowOverfilled));
        assert!(kinds.contains(&&ViolationType::RowUnderfilled));
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_assignment_exclusion() {
        let bounds = CapacityBounds::new(BoundPair::at_most(2), BoundPair::at_most(2));
        let mut asg = Assignment::new(2, 2);
        asg.select(1, 0);
        let exclusions: ExclusionSet = [(1, 0)].into_iter().collect();
        let violations = validate_assignment(&asg, &bounds, &exclusions);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::ExcludedPair);
    }

    #[test]
    fn test_clean_timetable() {
        let graph = MeetingGraph::from_adjacency(&[(1, vec![2, 3]), (2, vec![3])]);
        let t = Timetable::build(&graph, &GreedyByDegree, &[4, 5, 6], None, 9);
        assert!(validate_timetable(&t).is_empty());
    }
}
