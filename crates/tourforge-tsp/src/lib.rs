//! TourForge TSP
//!
//! Exact formulations of the symmetric Traveling Salesman Problem on top of
//! the [`tourforge_engine::Engine`] capability interface:
//! - [`LazyCutFormulation`]: degree constraints plus subtour elimination
//!   cuts injected lazily by [`SubtourEliminator`]
//! - [`CircuitFormulation`]: one variable per arc under a single global
//!   circuit constraint
//!
//! [`TspSolver`] selects a formulation from a
//! [`SolverConfig`](tourforge_config::SolverConfig), runs the engine and
//! interprets the outcome.

pub mod circuit;
pub mod degree;
pub mod driver;
pub mod formulation;
pub mod lazy;
pub mod registry;
pub mod subtour;

pub use circuit::{ArcVariables, CircuitFormulation};
pub use degree::add_degree_constraints;
pub use driver::{SolveStatus, TspOutcome, TspSolver};
pub use formulation::Formulation;
pub use lazy::{EdgeVariables, LazyCutFormulation};
pub use registry::{EdgeRegistry, EdgeSelector};
pub use subtour::SubtourEliminator;
