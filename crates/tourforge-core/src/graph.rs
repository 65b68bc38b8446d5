//! Weighted undirected graph model.
//!
//! Nodes are contiguous ids `0..n`. Every undirected edge is stored once,
//! under its canonical orientation `(min, max)`, and can be looked up in
//! either orientation.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use crate::error::{Result, TourForgeError};

/// Identifier of a graph node.
pub type NodeId = usize;

/// An undirected, weighted edge stored in canonical orientation (`u < v`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    u: NodeId,
    v: NodeId,
    weight: f64,
}

impl Edge {
    /// Creates an edge, normalizing the orientation so that `u < v`.
    pub fn new(a: NodeId, b: NodeId, weight: f64) -> Self {
        let (u, v) = canonical(a, b);
        Self { u, v, weight }
    }

    /// Returns the smaller endpoint.
    #[inline]
    pub fn u(&self) -> NodeId {
        self.u
    }

    /// Returns the larger endpoint.
    #[inline]
    pub fn v(&self) -> NodeId {
        self.v
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns both endpoints in canonical order.
    #[inline]
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.u, self.v)
    }

    /// Returns the endpoint opposite to `node`, if `node` is an endpoint.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.u {
            Some(self.v)
        } else if node == self.v {
            Some(self.u)
        } else {
            None
        }
    }

    /// Returns true if `node` is one of the endpoints.
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.u == node || self.v == node
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.u, self.v, self.weight)
    }
}

/// Returns the canonical orientation of an unordered pair.
#[inline]
pub fn canonical(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A weighted undirected graph over nodes `0..node_count`.
///
/// The graph is immutable once handed to a solver; all mutation goes through
/// [`Graph::add_edge`], which validates every edge.
///
/// # Example
///
/// ```
/// use tourforge_core::Graph;
///
/// let graph = Graph::from_edges(3, [(0, 1, 1.0), (1, 2, 2.0), (2, 0, 3.0)]).unwrap();
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.weight(2, 1), Some(2.0));
/// assert_eq!(graph.weight(1, 2), Some(2.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    node_count: usize,
    edges: Vec<Edge>,
    index: HashMap<(NodeId, NodeId), usize>,
    /// Per node: `(neighbor, edge index)` in insertion order.
    adjacency: Vec<Vec<(NodeId, usize)>>,
}

impl Graph {
    /// Creates a graph with `node_count` nodes and no edges.
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
            index: HashMap::new(),
            adjacency: vec![Vec::new(); node_count],
        }
    }

    /// Builds a graph from `(u, v, weight)` triples.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId, f64)>,
    {
        let mut graph = Self::new(node_count);
        for (u, v, weight) in edges {
            graph.add_edge(u, v, weight)?;
        }
        Ok(graph)
    }

    /// Builds a complete graph using `weight(u, v)` for every pair `u < v`.
    pub fn complete<F>(node_count: usize, mut weight: F) -> Result<Self>
    where
        F: FnMut(NodeId, NodeId) -> f64,
    {
        let mut graph = Self::new(node_count);
        for u in 0..node_count {
            for v in (u + 1)..node_count {
                graph.add_edge(u, v, weight(u, v))?;
            }
        }
        Ok(graph)
    }

    /// Adds the undirected edge `{u, v}` and returns its index.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<usize> {
        self.check_node(u)?;
        self.check_node(v)?;
        if u == v {
            return Err(TourForgeError::SelfLoop(u));
        }
        if !weight.is_finite() {
            return Err(TourForgeError::InvalidWeight { u, v, weight });
        }
        let key = canonical(u, v);
        if self.index.contains_key(&key) {
            return Err(TourForgeError::DuplicateEdge { u: key.0, v: key.1 });
        }

        let edge_index = self.edges.len();
        self.edges.push(Edge::new(u, v, weight));
        self.index.insert(key, edge_index);
        self.adjacency[u].push((v, edge_index));
        self.adjacency[v].push((u, edge_index));
        Ok(edge_index)
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if node < self.node_count {
            Ok(())
        } else {
            Err(TourForgeError::NodeOutOfRange {
                node,
                node_count: self.node_count,
            })
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the node id range `0..node_count`.
    #[inline]
    pub fn nodes(&self) -> Range<NodeId> {
        0..self.node_count
    }

    /// Returns all edges in insertion order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the index of edge `{u, v}` in either orientation.
    pub fn edge_index(&self, u: NodeId, v: NodeId) -> Option<usize> {
        self.index.get(&canonical(u, v)).copied()
    }

    pub fn contains_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edge_index(u, v).is_some()
    }

    /// Returns the weight of edge `{u, v}` in either orientation.
    pub fn weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.edge_index(u, v).map(|i| self.edges[i].weight)
    }

    /// Returns `(neighbor, edge index)` pairs around `node`.
    pub fn incident(&self, node: NodeId) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|adj| adj.iter().copied())
    }

    /// Returns the neighbors of `node`.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incident(node).map(|(neighbor, _)| neighbor)
    }

    /// Returns the number of edges touching `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(node).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_lookup() {
        let graph = Graph::from_edges(3, [(2, 0, 4.0), (0, 1, 1.5)]).unwrap();

        assert_eq!(graph.edge_index(0, 2), graph.edge_index(2, 0));
        assert_eq!(graph.weight(0, 2), Some(4.0));
        assert_eq!(graph.edges()[0].endpoints(), (0, 2));
        assert!(!graph.contains_edge(1, 2));
    }

    #[test]
    fn test_rejects_invalid_edges() {
        let mut graph = Graph::new(3);
        assert_eq!(graph.add_edge(1, 1, 1.0), Err(TourForgeError::SelfLoop(1)));
        assert_eq!(
            graph.add_edge(0, 3, 1.0),
            Err(TourForgeError::NodeOutOfRange {
                node: 3,
                node_count: 3
            })
        );
        assert!(matches!(
            graph.add_edge(0, 1, f64::NAN),
            Err(TourForgeError::InvalidWeight { u: 0, v: 1, .. })
        ));

        graph.add_edge(0, 1, 1.0).unwrap();
        assert_eq!(
            graph.add_edge(1, 0, 2.0),
            Err(TourForgeError::DuplicateEdge { u: 0, v: 1 })
        );
    }

    #[test]
    fn test_complete_graph() {
        let graph = Graph::complete(5, |u, v| (u + v) as f64).unwrap();

        assert_eq!(graph.edge_count(), 10);
        for node in graph.nodes() {
            assert_eq!(graph.degree(node), 4);
        }
        assert_eq!(graph.weight(4, 3), Some(7.0));
    }

    #[test]
    fn test_neighbors() {
        let graph = Graph::from_edges(4, [(0, 1, 1.0), (0, 2, 1.0), (3, 0, 1.0)]).unwrap();
        let neighbors: Vec<_> = graph.neighbors(0).collect();

        assert_eq!(neighbors, vec![1, 2, 3]);
        assert_eq!(graph.neighbors(7).count(), 0);
    }

    #[test]
    fn test_edge_other() {
        let edge = Edge::new(5, 2, 1.0);
        assert_eq!(edge.other(2), Some(5));
        assert_eq!(edge.other(5), Some(2));
        assert_eq!(edge.other(3), None);
        assert_eq!(format!("{edge}"), "2-5 (1)");
    }
}
