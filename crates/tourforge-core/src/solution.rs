//! Solution graphs and connected-component analysis.
//!
//! A [`SolutionGraph`] is the subgraph induced by the selected edges of an
//! assignment. Components are computed with a [`DisjointSet`]; a solution is
//! a tour exactly when there is one component and every degree is two.

use crate::graph::{canonical, Graph, NodeId};

/// Union-find over `0..len` with path halving and union by size.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    sets: usize,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
            sets: len,
        }
    }

    /// Returns the representative of `x`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `a` and `b`. Returns false if already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        self.sets -= 1;
        true
    }

    /// Returns the number of disjoint sets.
    #[inline]
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Groups `0..len` by set. Groups are sorted, ordered by smallest member.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let len = self.parent.len();
        let mut slot_of_root = vec![usize::MAX; len];
        let mut groups: Vec<Vec<usize>> = Vec::with_capacity(self.sets);
        for x in 0..len {
            let root = self.find(x);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = groups.len();
                groups.push(Vec::new());
            }
            groups[slot_of_root[root]].push(x);
        }
        groups
    }
}

/// The subgraph formed by the selected edges of an assignment.
///
/// Covers every node `0..node_count`, including nodes without any selected
/// edge (those form singleton components).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionGraph {
    node_count: usize,
    edges: Vec<(NodeId, NodeId)>,
}

impl SolutionGraph {
    /// Creates a solution graph; edges are stored in canonical orientation.
    pub fn new<I>(node_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut edges: Vec<_> = edges.into_iter().map(|(u, v)| canonical(u, v)).collect();
        edges.sort_unstable();
        edges.dedup();
        Self { node_count, edges }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edges.binary_search(&canonical(u, v)).is_ok()
    }

    /// Returns the number of selected edges touching `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        self.edges
            .iter()
            .filter(|&&(u, v)| u == node || v == node)
            .count()
    }

    /// Returns the connected components, ordered by smallest node.
    pub fn components(&self) -> Vec<Vec<NodeId>> {
        let mut sets = DisjointSet::new(self.node_count);
        for &(u, v) in &self.edges {
            if u < self.node_count && v < self.node_count {
                sets.union(u, v);
            }
        }
        sets.groups()
    }

    /// Returns true when the selected edges form exactly one cycle through
    /// every node.
    pub fn is_hamiltonian_cycle(&self) -> bool {
        if self.node_count < 3 || self.edges.len() != self.node_count {
            return false;
        }
        let mut degrees = vec![0usize; self.node_count];
        for &(u, v) in &self.edges {
            if v >= self.node_count {
                return false;
            }
            degrees[u] += 1;
            degrees[v] += 1;
        }
        degrees.iter().all(|&d| d == 2) && self.components().len() == 1
    }

    /// Returns the visiting order starting at node 0, or `None` when the
    /// graph is not a Hamiltonian cycle.
    pub fn tour_order(&self) -> Option<Vec<NodeId>> {
        if !self.is_hamiltonian_cycle() {
            return None;
        }
        let mut adjacency = vec![Vec::with_capacity(2); self.node_count];
        for &(u, v) in &self.edges {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }

        let mut order = Vec::with_capacity(self.node_count);
        let mut previous = usize::MAX;
        let mut current = 0;
        while order.len() < self.node_count {
            order.push(current);
            let next = adjacency[current]
                .iter()
                .copied()
                .find(|&n| n != previous)?;
            previous = current;
            current = next;
        }
        Some(order)
    }

    /// Returns the total weight of the selected edges in `graph`, or `None`
    /// if an edge is not declared there.
    pub fn cost(&self, graph: &Graph) -> Option<f64> {
        self.edges
            .iter()
            .map(|&(u, v)| graph.weight(u, v))
            .sum::<Option<f64>>()
    }
}
