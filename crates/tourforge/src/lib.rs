//! TourForge - exact Traveling Salesman Problem solving
//!
//! Build a [`Graph`], pick a formulation in a [`SolverConfig`] and solve:
//!
//! ```rust
//! use std::time::Duration;
//! use tourforge::prelude::*;
//!
//! let graph = Graph::from_edges(4, [
//!     (0, 1, 10.0), (0, 2, 15.0), (0, 3, 20.0),
//!     (1, 2, 35.0), (1, 3, 25.0), (2, 3, 30.0),
//! ]).unwrap();
//!
//! let config = SolverConfig::new().with_formulation(FormulationType::Circuit);
//! let mut solver = TspSolver::with_config(&graph, config).unwrap();
//! let (objective, bound) = solver.solve(Duration::from_secs(10)).unwrap();
//!
//! assert_eq!((objective, bound), (80.0, 80.0));
//! assert_eq!(solver.solution().and_then(|tour| tour.tour_order()), Some(vec![0, 1, 3, 2]));
//! ```

// Graph model
pub use tourforge_core::{Edge, Graph, NodeId, Result, SolutionGraph, TourForgeError};

// Configuration
pub use tourforge_config::{
    ConfigError, ExplorationType, FormulationType, SearchConfig, SolverConfig, TerminationConfig,
};

// Engine capability interface
pub use tourforge_engine::{
    BranchAndBoundEngine, Candidate, ConstraintInjector, Engine, EngineConfig,
    LazyConstraintHandler, LinearConstraint, LinearExpr, SearchStatistics, VarId,
};

// Formulations and driver
pub use tourforge_tsp::driver::NO_SOLUTION;
pub use tourforge_tsp::{
    ArcVariables, CircuitFormulation, EdgeRegistry, EdgeSelector, EdgeVariables, Formulation,
    LazyCutFormulation, SolveStatus, SubtourEliminator, TspOutcome, TspSolver,
};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{
        EdgeRegistry, FormulationType, Graph, SolutionGraph, SolveStatus, SolverConfig,
        TspOutcome, TspSolver, NO_SOLUTION,
    };
}
