//! Meeting graph and its line graph.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::EntityId;

/// Undirected simple graph of required meetings.
///
/// Nodes are people, edges are meetings. Duplicate edges (including the
/// reverse of an existing edge) and self-loops are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeetingGraph {
    people: Vec<EntityId>,
    edges: Vec<(EntityId, EntityId)>,
}

impl MeetingGraph {
    /// Builds the graph from "person → people to meet" lists.
    ///
    /// People are kept in first-appearance order; edges keep the
    /// orientation and order in which they were first listed.
    ///
    /// # Example
    ///
    /// ```
    /// use u_match::scheduler::MeetingGraph;
    ///
    /// let g = MeetingGraph::from_adjacency(&[(1, vec![2, 3]), (2, vec![1]), (3, vec![])]);
    /// assert_eq!(g.edges(), &[(1, 2), (1, 3)]);
    /// assert_eq!(g.people(), &[1, 2, 3]);
    /// ```
    pub fn from_adjacency(adjacency: &[(EntityId, Vec<EntityId>)]) -> Self {
        let mut people = Vec::new();
        let mut seen_people = BTreeSet::new();
        let mut edges = Vec::new();
        let mut seen_edges = BTreeSet::new();

        let mut note = |p: EntityId, people: &mut Vec<EntityId>| {
            if seen_people.insert(p) {
                people.push(p);
            }
        };

        for (person, counterparts) in adjacency {
            note(*person, &mut people);
            for &other in counterparts {
                note(other, &mut people);
                if other == *person {
                    continue;
                }
                let key = ((*person).min(other), (*person).max(other));
                if seen_edges.insert(key) {
                    edges.push((*person, other));
                }
            }
        }

        Self { people, edges }
    }

    /// People in first-appearance order.
    pub fn people(&self) -> &[EntityId] {
        &self.people
    }

    /// Meetings in first-appearance order.
    pub fn edges(&self) -> &[(EntityId, EntityId)] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of meetings involving `person`.
    pub fn degree(&self, person: EntityId) -> usize {
        self.edges
            .iter()
            .filter(|(a, b)| *a == person || *b == person)
            .count()
    }

    /// Largest number of meetings any person has.
    ///
    /// By Vizing's theorem the meetings fit in `max_degree` or
    /// `max_degree + 1` timeslots.
    pub fn max_degree(&self) -> usize {
        let mut degrees: BTreeMap<EntityId, usize> = BTreeMap::new();
        for &(a, b) in &self.edges {
            *degrees.entry(a).or_insert(0) += 1;
            *degrees.entry(b).or_insert(0) += 1;
        }
        degrees.values().copied().max().unwrap_or(0)
    }
}

/// Line graph of a [`MeetingGraph`].
///
/// Node `i` is meeting `i` of the source graph; two nodes are adjacent
/// iff the meetings share a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineGraph {
    adjacency: Vec<Vec<usize>>,
}

impl LineGraph {
    /// Builds the line graph.
    pub fn of(graph: &MeetingGraph) -> Self {
        let mut incident: BTreeMap<EntityId, Vec<usize>> = BTreeMap::new();
        for (k, &(a, b)) in graph.edges().iter().enumerate() {
            incident.entry(a).or_default().push(k);
            incident.entry(b).or_default().push(k);
        }

        let mut adjacency = vec![Vec::new(); graph.edge_count()];
        for meetings in incident.values() {
            for (i, &u) in meetings.iter().enumerate() {
                for &v in &meetings[i + 1..] {
                    adjacency[u].push(v);
                    adjacency[v].push(u);
                }
            }
        }
        // Distinct edges of a simple graph share at most one endpoint.
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }

        Self { adjacency }
    }

    /// Builds a line graph directly from adjacency lists.
    #[cfg(test)]
    pub(crate) fn from_neighbors(adjacency: Vec<Vec<usize>>) -> Self {
        Self { adjacency }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Sorted neighbors of node `i`.
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }

    pub fn degree(&self, i: usize) -> usize {
        self.adjacency[i].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_and_self_loops() {
        let g = MeetingGraph::from_adjacency(&[(1, vec![2, 1, 2]), (2, vec![1, 3])]);
        assert_eq!(g.edges(), &[(1, 2), (2, 3)]);
        assert_eq!(g.degree(2), 2);
        assert_eq!(g.max_degree(), 2);
    }

    #[test]
    fn test_line_graph_of_path() {
        // 1-2-3-4: meetings (1,2) (2,3) (3,4)
        let g = MeetingGraph::from_adjacency(&[(1, vec![2]), (2, vec![3]), (3, vec![4])]);
        let lg = LineGraph::of(&g);
        assert_eq!(lg.node_count(), 3);
        assert_eq!(lg.neighbors(0), &[1]);
        assert_eq!(lg.neighbors(1), &[0, 2]);
        assert_eq!(lg.neighbors(2), &[1]);
    }

    #[test]
    fn test_line_graph_of_star() {
        let g = MeetingGraph::from_adjacency(&[(0, vec![1, 2, 3])]);
        let lg = LineGraph::of(&g);
        for i in 0..3 {
            assert_eq!(lg.degree(i), 2);
        }
    }

    #[test]
    fn test_empty_graph() {
        let g = MeetingGraph::from_adjacency(&[]);
        assert_eq!(g.max_degree(), 0);
        assert_eq!(LineGraph::of(&g).node_count(), 0);
    }
}
