//! Search tree nodes and their frontier ordering.

use std::cmp::Ordering;

use tourforge_config::ExplorationType;

use crate::propagation::Domains;

/// A partial assignment awaiting exploration.
#[derive(Debug, Clone)]
pub(super) struct SearchNode {
    /// Number of branching decisions above this node.
    pub depth: usize,
    /// Lower bound on the objective of every completion.
    pub bound: f64,
    pub domains: Domains,
}

impl SearchNode {
    pub fn root(domains: Domains, bound: f64) -> Self {
        Self {
            depth: 0,
            bound,
            domains,
        }
    }

    pub fn child(&self, domains: Domains, bound: f64) -> Self {
        Self {
            depth: self.depth + 1,
            bound,
            domains,
        }
    }

    /// Returns true if no completion can beat `best`.
    pub fn can_prune(&self, best: Option<f64>, tolerance: f64) -> bool {
        self.bound == f64::INFINITY || best.is_some_and(|best| self.bound >= best - tolerance)
    }
}

/// A node wrapper for priority queue ordering.
///
/// `sequence` is unique and increasing in push order, which makes the
/// ordering total and the search deterministic.
pub(super) struct PriorityNode {
    sequence: u64,
    node: SearchNode,
    exploration_type: ExplorationType,
}

impl PriorityNode {
    pub fn new(sequence: u64, node: SearchNode, exploration_type: ExplorationType) -> Self {
        Self {
            sequence,
            node,
            exploration_type,
        }
    }

    pub fn node(&self) -> &SearchNode {
        &self.node
    }

    pub fn into_node(self) -> SearchNode {
        self.node
    }
}

impl Eq for PriorityNode {}

impl PartialEq for PriorityNode {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl Ord for PriorityNode {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.exploration_type {
            ExplorationType::DepthFirst => {
                // Deeper first, then most recently pushed
                self.node
                    .depth
                    .cmp(&other.node.depth)
                    .then(self.sequence.cmp(&other.sequence))
            }
            ExplorationType::BestBoundFirst => {
                // Smaller bound = higher priority (reversed)
                other
                    .node
                    .bound
                    .total_cmp(&self.node.bound)
                    .then(self.node.depth.cmp(&other.node.depth))
                    .then(self.sequence.cmp(&other.sequence))
            }
        }
    }
}

impl PartialOrd for PriorityNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BinaryHeap;

    use super::*;

    fn node(depth: usize, bound: f64) -> SearchNode {
        SearchNode {
            depth,
            bound,
            domains: Domains::new(0),
        }
    }

    fn pop_order(exploration_type: ExplorationType, nodes: Vec<SearchNode>) -> Vec<u64> {
        let mut heap: BinaryHeap<PriorityNode> = nodes
            .into_iter()
            .enumerate()
            .map(|(i, n)| PriorityNode::new(i as u64, n, exploration_type))
            .collect();
        let mut order = Vec::new();
        while let Some(next) = heap.pop() {
            order.push(next.sequence);
        }
        order
    }

    #[test]
    fn test_depth_first_order() {
        let order = pop_order(
            ExplorationType::DepthFirst,
            vec![node(1, 5.0), node(2, 9.0), node(2, 1.0), node(0, 0.0)],
        );
        assert_eq!(order, vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_best_bound_first_order() {
        let order = pop_order(
            ExplorationType::BestBoundFirst,
            vec![node(1, 5.0), node(2, 9.0), node(3, 1.0), node(1, 1.0)],
        );
        assert_eq!(order, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_can_prune() {
        let n = node(0, 10.0);
        assert!(!n.can_prune(None, 1e-9));
        assert!(!n.can_prune(Some(11.0), 1e-9));
        assert!(n.can_prune(Some(10.0), 1e-9));
        assert!(node(0, f64::INFINITY).can_prune(None, 1e-9));
    }
}
