//! LP solver adapters.
//!
//! The pipeline only needs "maximize `c·x` subject to `A·x (≤|=) b`" over
//! free variables, so any backend that can express that fits behind
//! [`LpSolver`]. [`MicroLpSolver`] is the default and runs the pure-Rust
//! simplex shipped with `good_lp`.

use good_lp::{microlp, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::encoder::{LinearProgram, RowSense};

/// Termination status reported by a solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// An optimal vertex was found.
    Optimal,
    /// No point satisfies the constraints.
    Infeasible,
    /// The objective can grow without bound.
    Unbounded,
    /// The backend gave up for numerical or internal reasons.
    NumericalFailure(String),
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => write!(f, "optimal"),
            Self::Infeasible => write!(f, "infeasible"),
            Self::Unbounded => write!(f, "unbounded"),
            Self::NumericalFailure(msg) => write!(f, "numerical failure ({msg})"),
        }
    }
}

/// A solver's answer for one [`LinearProgram`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpSolution {
    /// Termination status.
    pub status: SolveStatus,
    /// Value per variable. Empty unless `status` is optimal.
    pub values: Vec<f64>,
    /// Objective value at `values`.
    pub objective: f64,
}

impl LpSolution {
    /// An optimal solution.
    pub fn optimal(values: Vec<f64>, objective: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective,
        }
    }

    /// A non-optimal outcome carrying no values.
    pub fn failed(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: 0.0,
        }
    }
}

/// Linear program backend.
///
/// Implementations must maximize and treat every variable as free: the
/// variable box is already part of the constraint rows.
pub trait LpSolver: Send + Sync + fmt::Debug {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Solves `lp`.
    fn solve(&self, lp: &LinearProgram) -> LpSolution;
}

/// `good_lp` with the `microlp` simplex backend.
///
/// Single-entry `≤` rows (the variable box) are handed to the backend as
/// native variable bounds; every other row becomes a constraint.
///
/// When the backend fails for a reason other than infeasibility or
/// unboundedness, the problem is solved once more with objective
/// coefficients rounded to 1e-6.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

const RETRY_QUANTUM: f64 = 1e-6;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }

    fn run(lp: &LinearProgram, objective: &[f64]) -> Result<Vec<f64>, ResolutionError> {
        let n = lp.variable_count();
        let mut lower = vec![f64::NEG_INFINITY; n];
        let mut upper = vec![f64::INFINITY; n];
        let mut general = Vec::with_capacity(lp.constraint_count());
        for (i, sense) in lp.senses.iter().enumerate() {
            let rhs = lp.bounds[i];
            match (sense, single_entry(lp, i)) {
                (RowSense::Le, Some((j, a))) if a > 0.0 => upper[j] = upper[j].min(rhs / a),
                (RowSense::Le, Some((j, a))) if a < 0.0 => lower[j] = lower[j].max(rhs / a),
                _ => general.push(i),
            }
        }
        if lower.iter().zip(&upper).any(|(lo, hi)| lo > hi) {
            return Err(ResolutionError::Infeasible);
        }

        let mut vars = variables!();
        let xs: Vec<Variable> = lower
            .iter()
            .zip(&upper)
            .map(|(&lo, &hi)| {
                let mut def = variable();
                if lo.is_finite() {
                    def = def.min(lo);
                }
                if hi.is_finite() {
                    def = def.max(hi);
                }
                vars.add(def)
            })
            .collect();

        let mut goal = Expression::with_capacity(xs.len());
        for (x, &c) in xs.iter().zip(objective) {
            goal.add_mul(c, *x);
        }
        let mut problem = vars.maximise(goal).using(microlp);

        for i in general {
            let mut row = Expression::with_capacity(4);
            for (j, a) in lp.constraints.row(i) {
                row.add_mul(a, xs[j]);
            }
            let rhs = lp.bounds[i];
            problem = match lp.senses[i] {
                RowSense::Le => problem.with(row.leq(rhs)),
                RowSense::Eq => problem.with(row.eq(rhs)),
            };
        }

        let solution = problem.solve()?;
        Ok(xs.iter().map(|x| solution.value(*x)).collect())
    }
}

/// The only entry of row `i`, if it has exactly one.
fn single_entry(lp: &LinearProgram, i: usize) -> Option<(usize, f64)> {
    let mut entries = lp.constraints.row(i);
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Some(entry),
        _ => None,
    }
}

fn status_of(err: &ResolutionError) -> SolveStatus {
    match err {
        ResolutionError::Infeasible => SolveStatus::Infeasible,
        ResolutionError::Unbounded => SolveStatus::Unbounded,
        other => SolveStatus::NumericalFailure(other.to_string()),
    }
}

impl LpSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, lp: &LinearProgram) -> LpSolution {
        if lp.variable_count() == 0 {
            return LpSolution::optimal(Vec::new(), 0.0);
        }

        let first = Self::run(lp, &lp.objective);
        let outcome = match first {
            Err(err) if matches!(status_of(&err), SolveStatus::NumericalFailure(_)) => {
                tracing::warn!(error = %err, "solver failed, retrying with quantized objective");
                let quantized: Vec<f64> = lp
                    .objective
                    .iter()
                    .map(|c| (c / RETRY_QUANTUM).round() * RETRY_QUANTUM)
                    .collect();
                Self::run(lp, &quantized)
            }
            other => other,
        };

        match outcome {
            Ok(values) => {
                let objective = lp.objective_value(&values);
                tracing::debug!(
                    solver = self.name(),
                    variables = values.len(),
                    objective,
                    "LP solved"
                );
                LpSolution::optimal(values, objective)
            }
            Err(err) => {
                let status = status_of(&err);
                tracing::warn!(solver = self.name(), %status, "LP not solved");
                LpSolution::failed(status)
            }
        }
    }
}
