//! TourForge Engine
//!
//! This crate provides the optimization engine consumed by the TSP
//! formulations:
//! - The capability interface ([`Engine`], [`Candidate`],
//!   [`ConstraintInjector`], [`LazyConstraintHandler`])
//! - Linear model types (variables, expressions, constraints, circuits)
//! - Termination conditions
//! - Search statistics
//! - [`BranchAndBoundEngine`], a boolean branch-and-bound engine with
//!   constraint propagation, a native circuit constraint and lazy
//!   constraint callbacks

pub mod bound;
pub mod branch_and_bound;
pub mod engine;
pub mod model;
pub mod propagation;
pub mod scope;
pub mod statistics;
pub mod termination;

pub use bound::LowerBounder;
pub use branch_and_bound::{BranchAndBoundEngine, EngineConfig};
pub use engine::{Candidate, ConstraintInjector, Engine, LazyConstraintHandler, SolveStatus};
pub use model::{CircuitArc, CircuitConstraint, LinearConstraint, LinearExpr, Model, Sense, VarId};
pub use propagation::{Conflict, Domains};
pub use scope::{Incumbent, SearchScope};
pub use statistics::SearchStatistics;
pub use termination::{NodeCountTermination, OrTermination, Termination, TimeTermination};
