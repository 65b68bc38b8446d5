//! Several budgets checked together.

use super::Termination;
use crate::scope::SearchScope;

/// Stops the search as soon as any budget in the tuple is spent.
///
/// The engine combines its optional time and node budgets this way; a
/// `None` entry is a budget that is never spent.
///
/// ```
/// use tourforge_engine::termination::{NodeCountTermination, OrTermination, TimeTermination};
///
/// let budgets = OrTermination::new((
///     Some(TimeTermination::seconds(10)),
///     None::<NodeCountTermination>,
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(budgets: T) -> Self {
        Self(budgets)
    }
}

macro_rules! or_termination_for_tuple {
    ($($index:tt: $Budget:ident),+) => {
        impl<$($Budget: Termination),+> Termination for OrTermination<($($Budget,)+)> {
            fn is_terminated(&self, scope: &SearchScope) -> bool {
                $((self.0).$index.is_terminated(scope))||+
            }
        }
    };
}

or_termination_for_tuple!(0: A);
or_termination_for_tuple!(0: A, 1: B);
or_termination_for_tuple!(0: A, 1: B, 2: C);
