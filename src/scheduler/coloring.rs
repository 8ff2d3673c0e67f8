//! Line-graph coloring policies.
//!
//! A proper coloring of the line graph assigns every meeting a timeslot
//! such that no person has two meetings in one slot.
//!
//! # Policies
//!
//! | Policy | Colors used | Cost |
//! |--------|-------------|------|
//! | [`GreedyByDegree`] | ≤ Δ(L) + 1 | O(V + E) |
//! | [`ExhaustiveColoring`] | minimum | exponential, small graphs only |
//!
//! # Reference
//! Welsh & Powell (1967), "An upper bound for the chromatic number of a
//! graph and its application to timetabling problems"

use std::fmt::Debug;

use super::graph::LineGraph;

/// Assigns a color (timeslot index) to every line-graph node.
pub trait ColoringPolicy: Send + Sync + Debug {
    /// Policy name for logs.
    fn name(&self) -> &'static str;

    /// One color per node. Must be a proper coloring.
    fn color(&self, graph: &LineGraph) -> Vec<usize>;
}

/// Number of distinct colors used (max + 1).
pub fn color_count(colors: &[usize]) -> usize {
    colors.iter().max().map_or(0, |&c| c + 1)
}

/// Whether no two adjacent nodes share a color.
pub fn is_proper(graph: &LineGraph, colors: &[usize]) -> bool {
    colors.len() == graph.node_count()
        && (0..graph.node_count())
            .all(|u| graph.neighbors(u).iter().all(|&v| colors[u] != colors[v]))
}

/// Largest-degree-first greedy coloring.
///
/// Nodes are visited by degree descending, ties by node index, and each
/// takes the smallest color none of its colored neighbors hold.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyByDegree;

impl GreedyByDegree {
    fn order(graph: &LineGraph) -> Vec<usize> {
        let mut order: Vec<usize> = (0..graph.node_count()).collect();
        order.sort_by(|&a, &b| graph.degree(b).cmp(&graph.degree(a)).then(a.cmp(&b)));
        order
    }
}

impl ColoringPolicy for GreedyByDegree {
    fn name(&self) -> &'static str {
        "greedy-by-degree"
    }

    fn color(&self, graph: &LineGraph) -> Vec<usize> {
        let n = graph.node_count();
        let mut colors: Vec<Option<usize>> = vec![None; n];
        let mut taken: Vec<bool> = Vec::new();

        for u in Self::order(graph) {
            taken.clear();
            taken.resize(graph.degree(u) + 1, false);
            for &v in graph.neighbors(u) {
                if let Some(c) = colors[v] {
                    if c < taken.len() {
                        taken[c] = true;
                    }
                }
            }
            let free = taken.iter().position(|t| !t).unwrap_or(taken.len());
            colors[u] = Some(free);
        }

        colors.into_iter().map(|c| c.unwrap_or(0)).collect()
    }
}

/// Minimum coloring by backtracking.
///
/// Tries k = 1, 2, … colors until one works. Graphs larger than
/// `max_nodes` fall back to [`GreedyByDegree`].
#[derive(Debug, Clone, Copy)]
pub struct ExhaustiveColoring {
    max_nodes: usize,
}

impl ExhaustiveColoring {
    pub fn new(max_nodes: usize) -> Self {
        Self { max_nodes }
    }

    fn try_colors(
        graph: &LineGraph,
        order: &[usize],
        depth: usize,
        k: usize,
        colors: &mut [Option<usize>],
    ) -> bool {
        let Some(&u) = order.get(depth) else {
            return true;
        };
        for c in 0..k {
            let clash = graph.neighbors(u).iter().any(|&v| colors[v] == Some(c));
            if clash {
                continue;
            }
            colors[u] = Some(c);
            if Self::try_colors(graph, order, depth + 1, k, colors) {
                return true;
            }
        }
        colors[u] = None;
        false
    }
}

impl Default for ExhaustiveColoring {
    fn default() -> Self {
        Self::new(24)
    }
}

impl ColoringPolicy for ExhaustiveColoring {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn color(&self, graph: &LineGraph) -> Vec<usize> {
        let n = graph.node_count();
        let greedy = GreedyByDegree.color(graph);
        if n == 0 || n > self.max_nodes {
            return greedy;
        }

        let order = GreedyByDegree::order(graph);
        let upper = color_count(&greedy);
        for k in 1..upper {
            let mut colors = vec![None; n];
            if Self::try_colors(graph, &order, 0, k, &mut colors) {
                return colors.into_iter().map(|c| c.unwrap_or(0)).collect();
            }
        }
        greedy
    }
}
