//! TourForge Core - graph model and shared types
//!
//! This crate provides the fundamental abstractions for TourForge:
//! - Weighted undirected graphs with contiguous node ids
//! - Solution graphs with connected-component analysis
//! - Error types shared by all TourForge crates

pub mod error;
pub mod graph;
pub mod solution;

pub use error::{Result, TourForgeError};
pub use graph::{Edge, Graph, NodeId};
pub use solution::{DisjointSet, SolutionGraph};
