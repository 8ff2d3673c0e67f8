//! Conflict-of-interest rules.
//!
//! Derives [`ExclusionSet`]s from entity attributes. Row indices refer to
//! the left slice, column indices to the right slice; for peer matching
//! both slices are the same population.
//!
//! # Rules
//!
//! | Rule | Excludes (left i, right j) when |
//! |------|--------------------------------|
//! | Shared affiliation | i and j list a common institution |
//! | Seniority | j's level ≥ i's level (mentor must outrank mentee) |
//! | Time-zone gap | \|offsetᵢ − offsetⱼ\| > max gap |
//! | Exclusion request | i named j (fuzzy match on name or affiliation) |
//! | Co-reference | i and j both named the same third person |
//!
//! Unknown attributes never create a conflict.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Entity, ExclusionSet};

/// Which attribute-based rules apply to a bipartite run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConflictRules {
    /// Exclude pairs sharing an affiliation.
    pub shared_affiliation: bool,
    /// Exclude right entities at or above the left entity's seniority.
    pub seniority: bool,
    /// Exclude pairs whose UTC offsets differ by more than this many hours.
    pub max_timezone_gap: Option<f64>,
}

impl ConflictRules {
    /// No attribute rules.
    pub fn none() -> Self {
        Self {
            shared_affiliation: false,
            seniority: false,
            max_timezone_gap: None,
        }
    }

    /// Applies every enabled rule and merges the results.
    pub fn bipartite(&self, left: &[Entity], right: &[Entity]) -> ExclusionSet {
        let mut set = ExclusionSet::new();
        if self.shared_affiliation {
            set.extend(&shared_affiliation(left, right));
        }
        if self.seniority {
            set.extend(&seniority(left, right));
        }
        if let Some(gap) = self.max_timezone_gap {
            set.extend(&timezone_gap(left, right, gap));
        }
        set
    }
}

impl Default for ConflictRules {
    /// Affiliation, seniority, and a five-hour time-zone window.
    fn default() -> Self {
        Self {
            shared_affiliation: true,
            seniority: true,
            max_timezone_gap: Some(5.0),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Pairs that list at least one common affiliation.
pub fn shared_affiliation(left: &[Entity], right: &[Entity]) -> ExclusionSet {
    let right_affiliations: Vec<Vec<String>> = right
        .iter()
        .map(|e| {
            e.affiliations
                .iter()
                .map(|a| normalize(a))
                .filter(|a| !a.is_empty())
                .collect()
        })
        .collect();

    let mut set = ExclusionSet::new();
    for (i, l) in left.iter().enumerate() {
        let mine: Vec<String> = l
            .affiliations
            .iter()
            .map(|a| normalize(a))
            .filter(|a| !a.is_empty())
            .collect();
        for (j, theirs) in right_affiliations.iter().enumerate() {
            if mine.iter().any(|a| theirs.contains(a)) {
                set.insert(i, j);
            }
        }
    }
    set
}

/// Pairs where the right entity is at least as senior as the left one.
pub fn seniority(left: &[Entity], right: &[Entity]) -> ExclusionSet {
    let mut set = ExclusionSet::new();
    for (i, l) in left.iter().enumerate() {
        let Some(own) = l.seniority else { continue };
        for (j, r) in right.iter().enumerate() {
            if r.seniority.is_some_and(|other| other >= own) {
                set.insert(i, j);
            }
        }
    }
    set
}

/// Pairs whose UTC offsets are more than `max_gap` hours apart.
pub fn timezone_gap(left: &[Entity], right: &[Entity], max_gap: f64) -> ExclusionSet {
    let mut set = ExclusionSet::new();
    for (i, l) in left.iter().enumerate() {
        let Some(a) = l.utc_offset else { continue };
        for (j, r) in right.iter().enumerate() {
            if r.utc_offset.is_some_and(|b| (a - b).abs() > max_gap) {
                set.insert(i, j);
            }
        }
    }
    set
}

/// Splits a free-text exclusion answer into individual names.
///
/// # Example
///
/// ```
/// use u_match::conflicts::split_exclusion_request;
///
/// let names = split_exclusion_request("Mentor: Konrad K; Lab-mates: Titipat A, Jo\r\nBea");
/// assert_eq!(names, vec!["Konrad K", "Titipat A", "Jo", "Bea"]);
/// ```
pub fn split_exclusion_request(text: &str) -> Vec<String> {
    text.replace("Mentor:", ",")
        .replace("Lab-mates:", ",")
        .split(|c: char| matches!(c, ',' | ';' | '\n' | '\r'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Fuzzy similarity in [0, 100] (normalized Levenshtein, case-insensitive).
pub fn name_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&normalize(a), &normalize(b)) * 100.0
}

fn refers_to(request: &str, target: &Entity, threshold: f64) -> bool {
    let wanted = normalize(request);
    let name = normalize(&target.name);
    if !name.is_empty() && name.contains(&wanted) {
        return true;
    }
    if !name.is_empty() && name_similarity(&name, &wanted) >= threshold {
        return true;
    }
    target
        .affiliations
        .iter()
        .any(|a| !a.trim().is_empty() && name_similarity(a, &wanted) >= threshold)
}

/// Resolves every entity's exclusion requests against the population.
///
/// Returns directed (requester, target) pairs. A requested name matches a
/// person when it is a substring of their name, or when its similarity
/// to their name or to one of their affiliations reaches `threshold`.
pub fn exclusion_requests(people: &[Entity], threshold: f64) -> ExclusionSet {
    let mut set = ExclusionSet::new();
    for (i, requester) in people.iter().enumerate() {
        for raw in &requester.exclusion_requests {
            for name in split_exclusion_request(raw) {
                for (j, target) in people.iter().enumerate() {
                    if i != j && refers_to(&name, target, threshold) {
                        set.insert(i, j);
                    }
                }
            }
        }
    }
    tracing::debug!(pairs = set.len(), "exclusion requests resolved");
    set
}

/// Mutual exclusions between requesters who named the same person.
///
/// One hop only: co-referred pairs do not themselves create further
/// co-references.
pub fn coreferred(requests: &ExclusionSet) -> ExclusionSet {
    let mut by_target: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (requester, target) in requests.iter() {
        by_target.entry(target).or_default().push(requester);
    }

    let mut set = ExclusionSet::new();
    for requesters in by_target.values().filter(|r| r.len() >= 2) {
        for (k, &a) in requesters.iter().enumerate() {
            for &b in &requesters[k + 1..] {
                set.insert_symmetric(a, b);
            }
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_affiliation_case_insensitive() {
        let left = vec![Entity::new(1).with_affiliation("MIT"), Entity::new(2)];
        let right = vec![
            Entity::new(10).with_affiliation(" mit "),
            Entity::new(11).with_affiliation("Oxford"),
        ];
        let set = shared_affiliation(&left, &right);
        assert!(set.contains(0, 0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_seniority_rule() {
        let mentors = vec![Entity::new(1).with_seniority(4), Entity::new(2)];
        let mentees = vec![
            Entity::new(10).with_seniority(3),
            Entity::new(11).with_seniority(4),
            Entity::new(12).with_seniority(6),
            Entity::new(13),
        ];
        let set = seniority(&mentors, &mentees);
        assert!(!set.contains(0, 0));
        assert!(set.contains(0, 1));
        assert!(set.contains(0, 2));
        assert!(!set.contains(0, 3));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_timezone_gap() {
        let left = vec![Entity::new(1).with_utc_offset(-5.0)];
        let right = vec![
            Entity::new(10).with_utc_offset(0.0),
            Entity::new(11).with_utc_offset(1.0),
            Entity::new(12),
        ];
        let set = timezone_gap(&left, &right, 5.0);
        assert!(!set.contains(0, 0));
        assert!(set.contains(0, 1));
        assert!(!set.contains(0, 2));
    }

    #[test]
    fn test_rules_merge() {
        let left = vec![Entity::new(1).with_affiliation("A").with_seniority(5)];
        let right = vec![
            Entity::new(10).with_affiliation("A").with_seniority(2),
            Entity::new(11).with_seniority(7),
            Entity::new(12).with_seniority(2),
        ];
        let set = ConflictRules::default().bipartite(&left, &right);
        assert!(set.contains(0, 0));
        assert!(set.contains(0, 1));
        assert!(!set.contains(0, 2));
        assert!(ConflictRules::none().bipartite(&left, &right).is_empty());
    }

    #[test]
    fn test_fuzzy_request_resolution() {
        let people = vec![
            Entity::new(1)
                .with_name("Konrad Kording")
                .with_exclusion_request("Titipat Achakulwisut"),
            Entity::new(2).with_name("Titipat Achakulvisut"),
            Entity::new(3).with_name("Daniel Acuna"),
        ];
        let set = exclusion_requests(&people, 85.0);
        assert!(set.contains(0, 1));
        assert!(!set.contains(0, 2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_request_matches_affiliation_and_substring() {
        let people = vec![
            Entity::new(1).with_exclusion_request("University of Pennsylvania"),
            Entity::new(2).with_name("Ann Lee").with_affiliation("University of Pennsylvania"),
            Entity::new(3).with_name("Bob Stone"),
            Entity::new(4).with_exclusion_request("Stone"),
        ];
        let set = exclusion_requests(&people, 85.0);
        assert!(set.contains(0, 1));
        assert!(set.contains(3, 2));
        assert!(!set.contains(0, 2));
    }

    #[test]
    fn test_request_never_targets_self() {
        let people = vec![
            Entity::new(1).with_name("Ann Lee").with_exclusion_request("Ann Lee"),
            Entity::new(2).with_name("Bob"),
        ];
        assert!(exclusion_requests(&people, 85.0).is_empty());
    }

    #[test]
    fn test_coreferred_one_hop() {
        // 0 and 1 both exclude 3; 2 excludes 0.
        let requests: ExclusionSet = [(0, 3), (1, 3), (2, 0)].into_iter().collect();
        let extra = coreferred(&requests);
        assert!(extra.contains(0, 1));
        assert!(extra.contains(1, 0));
        assert_eq!(extra.len(), 2);
    }

    #[test]
    fn test_name_similarity_bounds() {
        assert_eq!(name_similarity("Ann", "ann"), 100.0);
        assert!(name_similarity("Ann", "Zed") < 50.0);
    }
}
