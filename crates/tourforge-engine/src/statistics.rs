//! Search statistics collection.
//!
//! Counters recorded by the branch-and-bound search, including the lazy
//! constraint activity of the candidate handler.

use std::fmt;
use std::time::Duration;

/// Complete statistics for one engine solve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Search nodes popped from the frontier and expanded or evaluated.
    pub nodes_explored: u64,
    /// Nodes discarded because their bound could not beat the incumbent.
    pub nodes_pruned: u64,
    /// Nodes discarded because propagation found a conflict.
    pub nodes_infeasible: u64,
    /// Integer-feasible candidates reached.
    pub candidates_found: u64,
    /// Candidates rejected by injected lazy constraints.
    pub candidates_rejected: u64,
    /// Lazy constraints appended during search.
    pub lazy_constraints_added: u64,
    /// Improving solutions accepted as incumbent.
    pub incumbent_updates: u64,
    /// Wall-clock time of the solve.
    pub duration: Duration,
}

impl SearchStatistics {
    /// Returns the explored nodes per second.
    pub fn nodes_per_second(&self) -> u64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.nodes_explored as f64 / secs) as u64
        } else {
            0
        }
    }

    /// Fraction of candidates that were rejected by lazy constraints.
    pub fn rejection_rate(&self) -> f64 {
        if self.candidates_found == 0 {
            0.0
        } else {
            self.candidates_rejected as f64 / self.candidates_found as f64
        }
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes ({} pruned, {} infeasible), {} candidates ({} rejected), {} lazy constraints, {} ms",
            self.nodes_explored,
            self.nodes_pruned,
            self.nodes_infeasible,
            self.candidates_found,
            self.candidates_rejected,
            self.lazy_constraints_added,
            self.duration.as_millis()
        )
    }
}
