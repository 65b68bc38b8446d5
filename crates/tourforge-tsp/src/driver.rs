//! Solver driver.
//!
//! Builds the configured formulation, runs the engine and interprets its
//! outcome once: every path out of [`TspSolver::solve`] is either an
//! `(objective, bound)` pair backed by an accepted solution or the sentinel
//! `(f64::INFINITY, 0.0)`.

use std::fmt;
use std::time::Duration;

use tourforge_config::SolverConfig;
use tourforge_core::{Graph, Result, SolutionGraph, TourForgeError};
use tourforge_engine::{
    BranchAndBoundEngine, Engine, EngineConfig, SearchStatistics, SolveStatus as EngineStatus,
    VarId,
};
use tracing::{debug, info};

use crate::formulation::Formulation;

/// Returned by [`TspSolver::solve`] when no tour was found.
pub const NO_SOLUTION: (f64, f64) = (f64::INFINITY, 0.0);

/// Outcome category of a TSP solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The tour is proven optimal.
    Optimal,
    /// A tour was found within the budget; optimality is not proven.
    Feasible,
    /// The graph has no tour.
    Infeasible,
    /// The budget ran out before any tour was found.
    TimeLimitNoSolution,
}

impl SolveStatus {
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::TimeLimitNoSolution => write!(f, "TimeLimitNoSolution"),
        }
    }
}

/// Everything known after a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct TspOutcome {
    pub status: SolveStatus,
    /// Cost of the accepted tour, `f64::INFINITY` without one.
    pub objective: f64,
    /// Best proven lower bound reported by the engine.
    pub bound: f64,
    /// Edges of the accepted solution.
    pub tour: Option<SolutionGraph>,
    pub statistics: SearchStatistics,
}

impl TspOutcome {
    fn without_solution(status: SolveStatus, bound: f64, statistics: SearchStatistics) -> Self {
        Self {
            status,
            objective: f64::INFINITY,
            bound,
            tour: None,
            statistics,
        }
    }

    /// `(objective, bound)`, or [`NO_SOLUTION`] when no tour was accepted.
    pub fn objective_and_bound(&self) -> (f64, f64) {
        if self.status.has_solution() {
            (self.objective, self.bound)
        } else {
            NO_SOLUTION
        }
    }

    /// Relative gap between objective and bound, `None` without a solution.
    pub fn gap(&self) -> Option<f64> {
        if !self.status.has_solution() {
            return None;
        }
        if self.objective == 0.0 {
            return Some(0.0);
        }
        Some(((self.objective - self.bound) / self.objective.abs()).max(0.0))
    }
}

/// Solves the TSP on one graph with the configured formulation.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tourforge_core::Graph;
/// use tourforge_tsp::TspSolver;
///
/// let graph = Graph::complete(4, |u, v| (u + v) as f64).unwrap();
/// let mut solver = TspSolver::new(&graph).unwrap();
/// let (objective, bound) = solver.solve(Duration::from_secs(10)).unwrap();
///
/// assert_eq!(objective, bound);
/// assert!(solver.solution().is_some_and(|tour| tour.is_hamiltonian_cycle()));
/// ```
#[derive(Debug)]
pub struct TspSolver<'g> {
    graph: &'g Graph,
    config: SolverConfig,
    engine: BranchAndBoundEngine,
    formulation: Formulation<'g>,
    solution: Option<SolutionGraph>,
}

impl<'g> TspSolver<'g> {
    /// Creates a solver with the default configuration.
    pub fn new(graph: &'g Graph) -> Result<Self> {
        Self::with_config(graph, SolverConfig::default())
    }

    /// Creates a solver and builds the configured formulation.
    pub fn with_config(graph: &'g Graph, config: SolverConfig) -> Result<Self> {
        let mut engine = BranchAndBoundEngine::with_config(EngineConfig::from_solver_config(&config));
        let formulation = Formulation::build(config.formulation, graph, &mut engine)?;
        Ok(Self {
            graph,
            config,
            engine,
            formulation,
            solution: None,
        })
    }

    pub fn graph(&self) -> &Graph {
        self.graph
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn formulation(&self) -> &Formulation<'g> {
        &self.formulation
    }

    pub fn engine(&self) -> &BranchAndBoundEngine {
        &self.engine
    }

    /// The accepted solution of the last solve, if any.
    pub fn solution(&self) -> Option<&SolutionGraph> {
        self.solution.as_ref()
    }

    /// Limits the wall-clock time of subsequent solves.
    pub fn set_time_limit(&mut self, limit: Duration) {
        self.engine.set_time_limit(limit);
    }

    /// Solves within `time_limit` and returns `(objective, bound)`.
    ///
    /// Returns [`NO_SOLUTION`] if the graph has no tour or none was found in
    /// time. Errors only on model misuse.
    pub fn solve(&mut self, time_limit: Duration) -> Result<(f64, f64)> {
        self.set_time_limit(time_limit);
        Ok(self.solve_detailed()?.objective_and_bound())
    }

    /// Solves with the configured limits and reports the full outcome.
    pub fn solve_detailed(&mut self) -> Result<TspOutcome> {
        let lazy_constraints = self.config.search.lazy_constraints;
        info!(
            event = "solve_start",
            formulation = %self.formulation.kind(),
            node_count = self.graph.node_count(),
            edge_count = self.graph.edge_count(),
            variable_count = self.engine.var_count(),
            lazy_constraints = lazy_constraints,
        );
        self.solution = None;

        if !admits_tour(self.graph) {
            debug!(event = "trivially_infeasible", node_count = self.graph.node_count());
            let outcome = TspOutcome::without_solution(
                SolveStatus::Infeasible,
                f64::INFINITY,
                SearchStatistics::default(),
            );
            log_solve_end(&outcome);
            return Ok(outcome);
        }

        let engine_status = match &self.formulation {
            Formulation::LazyCuts(lazy) if lazy_constraints => {
                let mut eliminator = lazy.eliminator();
                self.engine.solve(Some(&mut eliminator))?
            }
            _ => self.engine.solve(None)?,
        };

        let statistics = self.engine.statistics().clone();
        let bound = self.engine.best_bound();
        let status = match engine_status {
            EngineStatus::Optimal => SolveStatus::Optimal,
            EngineStatus::Feasible => SolveStatus::Feasible,
            EngineStatus::Infeasible => SolveStatus::Infeasible,
            EngineStatus::LimitReached => SolveStatus::TimeLimitNoSolution,
            EngineStatus::NotSolved => {
                return Err(TourForgeError::Engine(
                    "engine returned without solving".to_string(),
                ))
            }
        };
        if !status.has_solution() {
            let outcome = TspOutcome::without_solution(status, bound, statistics);
            log_solve_end(&outcome);
            return Ok(outcome);
        }

        let values: Vec<f64> = (0..self.engine.var_count())
            .map(|index| self.engine.value(VarId::new(index)).unwrap_or(0.0))
            .collect();
        let tour = self.formulation.as_graph(&values);
        if !tour.is_hamiltonian_cycle() {
            debug!(
                event = "solution_not_tour",
                components = tour.components().len(),
            );
        }
        self.solution = Some(tour.clone());

        let outcome = TspOutcome {
            status,
            objective: self.engine.objective_value(),
            bound,
            tour: Some(tour),
            statistics,
        };
        log_solve_end(&outcome);
        Ok(outcome)
    }
}

/// A tour needs at least three nodes, each with two incident edges.
fn admits_tour(graph: &Graph) -> bool {
    graph.node_count() >= 3 && graph.nodes().all(|node| graph.degree(node) >= 2)
}

fn log_solve_end(outcome: &TspOutcome) {
    info!(
        event = "solve_end",
        status = %outcome.status,
        objective = outcome.objective,
        bound = outcome.bound,
        nodes = outcome.statistics.nodes_explored,
        lazy_cuts = outcome.statistics.lazy_constraints_added,
        duration_ms = outcome.statistics.duration.as_millis() as u64,
    );
}
