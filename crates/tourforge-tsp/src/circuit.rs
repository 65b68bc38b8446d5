//! Circuit formulation.
//!
//! Every undirected edge `{u, v}` becomes two arcs, `u -> v` and `v -> u`,
//! each with its own variable. A single global circuit constraint over all
//! arcs forces the selected arcs into one Hamiltonian circuit, so no
//! callback is needed.

use tourforge_core::{Graph, Result};
use tourforge_engine::{CircuitArc, Engine, VarId};
use tracing::debug;

use crate::registry::{EdgeRegistry, EdgeSelector};

/// Two boolean variables per undirected edge, one per direction, named
/// `edge_{tail}_{head}`.
#[derive(Debug, Clone)]
pub struct ArcVariables<'g> {
    graph: &'g Graph,
    /// `(u -> v, v -> u)` with `u < v`, indexed like [`Graph::edges`].
    arcs: Vec<(VarId, VarId)>,
}

impl<'g> ArcVariables<'g> {
    /// Creates both arc variables for every edge of `graph`.
    pub fn new(graph: &'g Graph, engine: &mut dyn Engine) -> Self {
        let arcs = graph
            .edges()
            .iter()
            .map(|edge| {
                let (u, v) = edge.endpoints();
                let forward = engine.add_bool_var(&format!("edge_{u}_{v}"));
                let backward = engine.add_bool_var(&format!("edge_{v}_{u}"));
                (forward, backward)
            })
            .collect();
        Self { graph, arcs }
    }

    /// Variable of the directed arc `tail -> head`.
    pub fn arc(&self, tail: usize, head: usize) -> Result<VarId> {
        match self.variable_for(tail, head)? {
            EdgeSelector::Directed { forward, .. } if tail < head => Ok(forward),
            EdgeSelector::Directed { backward, .. } => Ok(backward),
            EdgeSelector::Undirected(var) => Ok(var),
        }
    }

    /// All arcs with their variables.
    pub fn circuit_arcs(&self) -> Vec<CircuitArc> {
        self.graph
            .edges()
            .iter()
            .zip(&self.arcs)
            .flat_map(|(edge, &(forward, backward))| {
                let (u, v) = edge.endpoints();
                [CircuitArc::new(u, v, forward), CircuitArc::new(v, u, backward)]
            })
            .collect()
    }
}

impl EdgeRegistry for ArcVariables<'_> {
    fn graph(&self) -> &Graph {
        self.graph
    }

    fn selector(&self, index: usize) -> EdgeSelector {
        let (forward, backward) = self.arcs[index];
        EdgeSelector::Directed { forward, backward }
    }

    fn var_count(&self) -> usize {
        self.arcs.len() * 2
    }
}

/// Arc variables under one circuit constraint, minimizing arc weights.
#[derive(Debug, Clone)]
pub struct CircuitFormulation<'g> {
    arcs: ArcVariables<'g>,
}

impl<'g> CircuitFormulation<'g> {
    /// Builds arc variables, the circuit constraint and the objective.
    pub fn build(graph: &'g Graph, engine: &mut dyn Engine) -> Result<Self> {
        let arcs = ArcVariables::new(graph, engine);
        engine.add_circuit(arcs.circuit_arcs())?;
        engine.minimize(arcs.objective())?;

        debug!(
            event = "formulation_built",
            formulation = "circuit",
            variables = arcs.var_count(),
        );
        Ok(Self { arcs })
    }

    pub fn arcs(&self) -> &ArcVariables<'g> {
        &self.arcs
    }
}

#[cfg(test)]
mod tests {
    use tourforge_core::TourForgeError;
    use tourforge_engine::BranchAndBoundEngine;
    use tourforge_test::graphs::k4;

    use super::*;

    #[test]
    fn test_build_model() {
        let graph = k4();
        let mut engine = BranchAndBoundEngine::new();
        let formulation = CircuitFormulation::build(&graph, &mut engine).unwrap();

        assert_eq!(formulation.arcs().var_count(), 12);
        assert_eq!(engine.var_count(), 12);
        assert!(engine.model().constraints().is_empty());
        assert_eq!(engine.model().circuits().len(), 1);
        assert_eq!(engine.model().circuits()[0].arcs().len(), 12);
        assert_eq!(engine.model().circuits()[0].node_count(), 4);
    }

    #[test]
    fn test_arc_names() {
        let graph = k4();
        let mut engine = BranchAndBoundEngine::new();
        let formulation = CircuitFormulation::build(&graph, &mut engine).unwrap();
        let arcs = formulation.arcs();

        assert_eq!(engine.var_name(arcs.arc(0, 2).unwrap()), Some("edge_0_2"));
        assert_eq!(engine.var_name(arcs.arc(2, 0).unwrap()), Some("edge_2_0"));
        assert_eq!(
            arcs.arc(1, 1),
            Err(TourForgeError::UndefinedEdge { u: 1, v: 1 })
        );
    }
}
