//! Termination conditions for the search.

mod composite;
mod node_count;
mod time;

use std::fmt::Debug;

use crate::scope::SearchScope;

pub use composite::OrTermination;
pub use node_count::NodeCountTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop searching.
///
/// Checked cooperatively by the engine before each node, so a search stops
/// at the first node boundary after the condition holds.
pub trait Termination: Send + Debug {
    /// Returns true if searching should terminate.
    fn is_terminated(&self, scope: &SearchScope) -> bool;
}

/// An absent termination never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }
}
