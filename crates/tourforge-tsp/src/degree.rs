//! Degree constraints.

use tourforge_core::Result;
use tourforge_engine::{Engine, LinearExpr};

use crate::registry::EdgeRegistry;

/// Requires every node to have exactly two selected incident edges.
///
/// Every tour satisfies these constraints, but so does any set of disjoint
/// cycles covering the nodes.
pub fn add_degree_constraints<R: EdgeRegistry>(registry: &R, engine: &mut dyn Engine) -> Result<()> {
    for node in registry.graph().nodes() {
        let incident = LinearExpr::sum(
            registry
                .incident_edges(node)
                .flat_map(|(_, selector)| selector.vars()),
        );
        engine.add_constraint(incident.equal_to(2.0))?;
    }
    Ok(())
}
