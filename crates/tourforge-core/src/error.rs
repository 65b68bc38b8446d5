//! Error types for TourForge

use thiserror::Error;

use crate::graph::NodeId;

/// Main error type for TourForge operations
#[derive(Debug, Error, PartialEq)]
pub enum TourForgeError {
    /// No edge `{u, v}` was declared in the graph.
    #[error("Undefined edge: {{{u}, {v}}}")]
    UndefinedEdge { u: NodeId, v: NodeId },

    /// A node id outside `0..node_count` was referenced.
    #[error("Node {node} out of range for graph with {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    /// Edges must join two distinct nodes.
    #[error("Self loop at node {0}")]
    SelfLoop(NodeId),

    /// An undirected edge was declared twice.
    #[error("Duplicate edge: {{{u}, {v}}}")]
    DuplicateEdge { u: NodeId, v: NodeId },

    /// Edge weights must be finite.
    #[error("Invalid weight {weight} on edge {{{u}, {v}}}")]
    InvalidWeight { u: NodeId, v: NodeId, weight: f64 },

    /// Error reported by the optimization engine
    #[error("Engine error: {0}")]
    Engine(String),

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for TourForge operations
pub type Result<T> = std::result::Result<T, TourForgeError>;
