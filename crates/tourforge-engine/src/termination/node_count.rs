//! Node count termination.

use super::Termination;
use crate::scope::SearchScope;

/// Stops the search once `limit` nodes have been explored.
///
/// Nodes pruned when popped from the frontier do not count.
#[derive(Debug, Clone)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.node_count() >= self.limit
    }
}
