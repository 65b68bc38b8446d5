//! Search-level scope.

use std::time::{Duration, Instant};

use crate::statistics::SearchStatistics;

/// Best accepted solution of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Incumbent {
    pub values: Vec<f64>,
    pub objective: f64,
}

/// Mutable state of one branch-and-bound search.
///
/// Terminations inspect the scope between nodes; the engine records
/// incumbents and counters into it.
#[derive(Debug, Default)]
pub struct SearchScope {
    start_time: Option<Instant>,
    incumbent: Option<Incumbent>,
    statistics: SearchStatistics,
}

impl SearchScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_search(&mut self) {
        self.start_time = Some(Instant::now());
        self.statistics = SearchStatistics::default();
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    /// Number of nodes explored so far.
    pub fn node_count(&self) -> u64 {
        self.statistics.nodes_explored
    }

    pub fn increment_node_count(&mut self) -> u64 {
        self.statistics.nodes_explored += 1;
        self.statistics.nodes_explored
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn statistics_mut(&mut self) -> &mut SearchStatistics {
        &mut self.statistics
    }

    pub fn incumbent(&self) -> Option<&Incumbent> {
        self.incumbent.as_ref()
    }

    /// Objective of the incumbent, if any.
    pub fn best_objective(&self) -> Option<f64> {
        self.incumbent.as_ref().map(|i| i.objective)
    }

    /// Replaces the incumbent if `objective` improves on it.
    pub fn update_incumbent(&mut self, values: Vec<f64>, objective: f64) -> bool {
        let is_better = match &self.incumbent {
            None => true,
            Some(best) => objective < best.objective,
        };

        if is_better {
            self.incumbent = Some(Incumbent { values, objective });
            self.statistics.incumbent_updates += 1;
        }
        is_better
    }

    /// Ends the search, stamping the duration into the statistics.
    pub fn finish(mut self) -> (Option<Incumbent>, SearchStatistics) {
        self.statistics.duration = self.elapsed().unwrap_or_default();
        (self.incumbent, self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incumbent_only_improves() {
        let mut scope = SearchScope::new();
        scope.start_search();

        assert!(scope.update_incumbent(vec![1.0], 10.0));
        assert!(!scope.update_incumbent(vec![0.0], 12.0));
        assert!(!scope.update_incumbent(vec![0.0], 10.0));
        assert!(scope.update_incumbent(vec![0.0, 1.0], 7.5));

        assert_eq!(scope.best_objective(), Some(7.5));
        assert_eq!(scope.statistics().incumbent_updates, 2);
    }

    #[test]
    fn test_finish() {
        let mut scope = SearchScope::new();
        assert!(scope.elapsed().is_none());
        scope.start_search();
        scope.increment_node_count();
        scope.increment_node_count();

        let (incumbent, stats) = scope.finish();
        assert!(incumbent.is_none());
        assert_eq!(stats.nodes_explored, 2);
    }
}
