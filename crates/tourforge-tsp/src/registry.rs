//! Edge variable registries.
//!
//! A registry maps every undirected edge of the graph to the decision
//! variables that select it. The lazy-cut formulation uses one variable per
//! edge, the circuit formulation one per direction; both answer the same
//! queries through [`EdgeRegistry`].

use smallvec::SmallVec;
use tourforge_core::{Edge, Graph, NodeId, Result, SolutionGraph, TourForgeError};
use tourforge_engine::{Candidate, LinearExpr, VarId};

/// Values above this threshold select a variable.
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// Decision variables that select one undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSelector {
    /// A single variable for the edge.
    Undirected(VarId),
    /// One variable per direction; `forward` runs from the smaller endpoint.
    Directed { forward: VarId, backward: VarId },
}

impl EdgeSelector {
    /// Returns the underlying variables.
    pub fn vars(&self) -> SmallVec<[VarId; 2]> {
        match *self {
            EdgeSelector::Undirected(var) => SmallVec::from_slice(&[var]),
            EdgeSelector::Directed { forward, backward } => {
                SmallVec::from_slice(&[forward, backward])
            }
        }
    }

    /// Usage of the edge in `candidate`.
    pub fn value(&self, candidate: &dyn Candidate) -> f64 {
        self.vars().iter().map(|&var| candidate.value(var)).sum()
    }

    /// Returns true if `candidate` uses the edge.
    pub fn is_selected(&self, candidate: &dyn Candidate) -> bool {
        self.value(candidate) > SELECTION_THRESHOLD
    }
}

/// Lookup of the variables behind every edge of a graph.
pub trait EdgeRegistry {
    /// The graph whose edges are registered.
    fn graph(&self) -> &Graph;

    /// Variables of the edge at `index` in [`Graph::edges`].
    fn selector(&self, index: usize) -> EdgeSelector;

    /// Number of decision variables owned by the registry.
    fn var_count(&self) -> usize;

    /// Returns the variables of edge `{u, v}`, in either orientation.
    fn variable_for(&self, u: NodeId, v: NodeId) -> Result<EdgeSelector> {
        self.graph()
            .edge_index(u, v)
            .map(|index| self.selector(index))
            .ok_or(TourForgeError::UndefinedEdge { u, v })
    }

    /// Iterates over `(edge, variables)` pairs in edge order.
    fn iter(&self) -> impl Iterator<Item = (&Edge, EdgeSelector)> + '_ {
        self.graph()
            .edges()
            .iter()
            .enumerate()
            .map(move |(index, edge)| (edge, self.selector(index)))
    }

    /// Edges touching `node`.
    fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = (&Edge, EdgeSelector)> + '_ {
        let graph = self.graph();
        graph
            .incident(node)
            .map(move |(_, index)| (&graph.edges()[index], self.selector(index)))
    }

    /// Edges with exactly one endpoint in `nodes`.
    ///
    /// Empty when `nodes` is empty or covers the whole graph. Nodes outside
    /// the graph are ignored.
    fn outgoing_edges(&self, nodes: &[NodeId]) -> impl Iterator<Item = (&Edge, EdgeSelector)> + '_ {
        let mut inside = vec![false; self.graph().node_count()];
        for &node in nodes {
            if let Some(slot) = inside.get_mut(node) {
                *slot = true;
            }
        }
        self.iter()
            .filter(move |(edge, _)| inside[edge.u()] != inside[edge.v()])
    }

    /// Sum of `weight * variable` over every registered variable.
    fn objective(&self) -> LinearExpr {
        let mut objective = LinearExpr::new();
        for (edge, selector) in self.iter() {
            for var in selector.vars() {
                objective.add_term(var, edge.weight());
            }
        }
        objective
    }

    /// The edges `candidate` selects, as a graph over all nodes.
    ///
    /// Used both on in-search candidates and on the final assignment.
    fn as_graph(&self, candidate: &dyn Candidate) -> SolutionGraph {
        SolutionGraph::new(
            self.graph().node_count(),
            self.iter()
                .filter(|(_, selector)| selector.is_selected(candidate))
                .map(|(edge, _)| edge.endpoints()),
        )
    }
}
