//! Wall-clock budget.

use std::time::Duration;

use super::Termination;
use crate::scope::SearchScope;

/// Stops the search once the time since [`SearchScope::start_search`]
/// reaches `limit`.
///
/// The clock is only read between nodes, so a node that is being
/// propagated or handed to the lazy handler always finishes. A scope that
/// was never started has no elapsed time and never stops.
///
/// ```
/// use std::time::Duration;
/// use tourforge_engine::termination::TimeTermination;
///
/// let budget = TimeTermination::millis(1500);
/// assert_eq!(budget.limit(), Duration::from_millis(1500));
/// ```
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// The configured budget.
    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope
            .elapsed()
            .is_some_and(|elapsed| elapsed >= self.limit)
    }
}
