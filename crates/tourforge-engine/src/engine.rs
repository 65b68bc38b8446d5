//! The optimization engine capability interface.
//!
//! Formulations only talk to an engine through [`Engine`]. Search-time
//! interaction happens through a [`LazyConstraintHandler`], which the engine
//! calls synchronously on every integer-feasible candidate. The handler
//! reads candidate values through [`Candidate`] and injects new constraints
//! through [`ConstraintInjector`]; it never sees the engine itself.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tourforge_core::Result;

use crate::model::{CircuitArc, LinearConstraint, LinearExpr, VarId};

/// Outcome of an engine solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveStatus {
    /// `solve` has not been called yet.
    #[default]
    NotSolved,
    /// The incumbent is proven optimal.
    Optimal,
    /// A solution was found, but optimality is not proven.
    Feasible,
    /// The search space was exhausted without any solution.
    Infeasible,
    /// A limit was reached before any solution was found.
    LimitReached,
}

impl SolveStatus {
    /// Returns true if the engine holds at least one accepted solution.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::NotSolved => write!(f, "NotSolved"),
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::LimitReached => write!(f, "LimitReached"),
        }
    }
}

/// Per-variable values of a candidate assignment.
pub trait Candidate {
    /// Value of `var`; variables unknown to the candidate read as `0.0`.
    fn value(&self, var: VarId) -> f64;
}

impl Candidate for [f64] {
    fn value(&self, var: VarId) -> f64 {
        self.get(var.index()).copied().unwrap_or(0.0)
    }
}

impl Candidate for Vec<f64> {
    fn value(&self, var: VarId) -> f64 {
        self.as_slice().value(var)
    }
}

impl Candidate for HashMap<VarId, f64> {
    fn value(&self, var: VarId) -> f64 {
        self.get(&var).copied().unwrap_or(0.0)
    }
}

/// Capability to append constraints to a running search.
pub trait ConstraintInjector {
    fn add_constraint(&mut self, constraint: LinearConstraint);
}

impl ConstraintInjector for Vec<LinearConstraint> {
    fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.push(constraint);
    }
}

/// Strategy invoked on every integer-feasible candidate.
///
/// Calls are serialized: the engine never invokes a handler concurrently
/// with itself or with other model mutations. Injected constraints persist
/// for the rest of the search. A candidate that violates any constraint it
/// caused to be injected is rejected.
pub trait LazyConstraintHandler {
    fn on_candidate(&mut self, candidate: &dyn Candidate, injector: &mut dyn ConstraintInjector);
}

/// The capability set a formulation consumes.
pub trait Engine {
    /// Creates a named boolean decision variable.
    fn add_bool_var(&mut self, name: &str) -> VarId;

    /// Adds a linear equality or inequality.
    fn add_constraint(&mut self, constraint: LinearConstraint) -> Result<()>;

    /// Adds a single-circuit global constraint over directed arcs.
    fn add_circuit(&mut self, arcs: Vec<CircuitArc>) -> Result<()>;

    /// Declares the objective to minimize.
    fn minimize(&mut self, objective: LinearExpr) -> Result<()>;

    /// Limits the wall-clock time of the next `solve`.
    fn set_time_limit(&mut self, limit: Duration);

    /// Runs the search, calling `handler` on each integer-feasible candidate.
    fn solve(&mut self, handler: Option<&mut dyn LazyConstraintHandler>) -> Result<SolveStatus>;

    /// Status of the last solve.
    fn status(&self) -> SolveStatus;

    /// Objective of the best accepted solution, `f64::INFINITY` if none.
    fn objective_value(&self) -> f64;

    /// Best proven lower bound on the objective.
    fn best_bound(&self) -> f64;

    /// Value of `var` in the best accepted solution.
    fn value(&self, var: VarId) -> Option<f64>;

    /// Number of accepted improving solutions.
    fn solution_count(&self) -> usize;

    fn var_count(&self) -> usize;

    fn var_name(&self, var: VarId) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_impls() {
        let values = vec![0.0, 1.0, 0.75];
        assert_eq!(values.value(VarId::new(1)), 1.0);
        assert_eq!(values.value(VarId::new(9)), 0.0);

        let sparse: HashMap<VarId, f64> = [(VarId::new(4), 1.0)].into_iter().collect();
        assert_eq!(sparse.value(VarId::new(4)), 1.0);
        assert_eq!(sparse.value(VarId::new(0)), 0.0);
    }

    #[test]
    fn test_vec_injector() {
        let mut pool: Vec<LinearConstraint> = Vec::new();
        let injector: &mut dyn ConstraintInjector = &mut pool;
        injector.add_constraint(LinearExpr::sum([VarId::new(0)]).at_least(1.0));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_status() {
        assert!(SolveStatus::Optimal.has_solution());
        assert!(SolveStatus::Feasible.has_solution());
        assert!(!SolveStatus::Infeasible.has_solution());
        assert!(!SolveStatus::LimitReached.has_solution());
        assert_eq!(SolveStatus::default(), SolveStatus::NotSolved);
        assert_eq!(format!("{}", SolveStatus::LimitReached), "LimitReached");
    }
}
