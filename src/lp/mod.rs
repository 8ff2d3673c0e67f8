//! Linear programming stage.
//!
//! Turns an [`AffinityMatrix`](crate::models::AffinityMatrix) and
//! [`CapacityBounds`](crate::models::CapacityBounds) into a sparse LP,
//! solves it through a pluggable [`LpSolver`], and rounds the continuous
//! solution back into a discrete [`Assignment`](crate::models::Assignment).
//!
//! # Stages
//!
//! | Stage | Type | Output |
//! |-------|------|--------|
//! | Encode | [`ConstraintEncoder`] | [`LinearProgram`] |
//! | Solve | [`LpSolver`] | [`LpSolution`] |
//! | Round | [`AssignmentRounder`] | `Assignment` |

mod encoder;
mod rounding;
mod solver;

pub use encoder::{ConstraintEncoder, LinearProgram, RowSense, SparseMatrix};
pub use rounding::AssignmentRounder;
pub use solver::{LpSolution, LpSolver, MicroLpSolver, SolveStatus};
