//! Meeting scheduling for peer matching.
//!
//! Turns "who must meet whom" into per-person timetables where nobody has
//! two meetings in the same timeslot.
//!
//! # Algorithm
//!
//! Meetings are the edges of a [`MeetingGraph`]. Two meetings conflict iff
//! they share a person, which is exactly adjacency in the [`LineGraph`], so
//! a proper vertex coloring of the line graph is a conflict-free
//! assignment of meetings to timeslots. The [`ColoringPolicy`] is
//! pluggable; [`GreedyByDegree`] is the default.
//!
//! Idle people in each slot are paired at random (seeded) so that no
//! table sits empty.
//!
//! # Usage
//!
//! ```
//! use u_match::scheduler::{GreedyByDegree, MeetingGraph, Timetable};
//!
//! let graph = MeetingGraph::from_adjacency(&[(1, vec![2, 4]), (3, vec![2, 4])]);
//! let timetable = Timetable::build(&graph, &GreedyByDegree, &[], None, 0);
//! assert_eq!(timetable.slot_count(), 2);
//! ```
//!
//! # References
//!
//! - Vizing (1964), "On an estimate of the chromatic class of a p-graph"
//! - Welsh & Powell (1967), "An upper bound for the chromatic number of a graph"

mod coloring;
mod graph;
mod timetable;

pub use coloring::{color_count, is_proper, ColoringPolicy, ExhaustiveColoring, GreedyByDegree};
pub use graph::{LineGraph, MeetingGraph};
pub use timetable::{SlotEntry, TableLabels, Timetable};
