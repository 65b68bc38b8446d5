//! Formulation selection.

use tourforge_config::FormulationType;
use tourforge_core::{Graph, NodeId, Result, SolutionGraph};
use tourforge_engine::{Candidate, Engine};

use crate::circuit::CircuitFormulation;
use crate::lazy::LazyCutFormulation;
use crate::registry::{EdgeRegistry, EdgeSelector};

/// A TSP model built into an engine.
#[derive(Debug, Clone)]
pub enum Formulation<'g> {
    /// Degree constraints, subtours cut off during search.
    LazyCuts(LazyCutFormulation<'g>),
    /// Arc variables under a global circuit constraint.
    Circuit(CircuitFormulation<'g>),
}

impl<'g> Formulation<'g> {
    /// Builds the formulation of type `kind` for `graph` into `engine`.
    pub fn build(kind: FormulationType, graph: &'g Graph, engine: &mut dyn Engine) -> Result<Self> {
        match kind {
            FormulationType::LazyCuts => LazyCutFormulation::build(graph, engine).map(Self::LazyCuts),
            FormulationType::Circuit => CircuitFormulation::build(graph, engine).map(Self::Circuit),
        }
    }

    pub fn kind(&self) -> FormulationType {
        match self {
            Formulation::LazyCuts(_) => FormulationType::LazyCuts,
            Formulation::Circuit(_) => FormulationType::Circuit,
        }
    }

    /// Returns the variables of edge `{u, v}`.
    pub fn variable_for(&self, u: NodeId, v: NodeId) -> Result<EdgeSelector> {
        match self {
            Formulation::LazyCuts(lazy) => lazy.vars().variable_for(u, v),
            Formulation::Circuit(circuit) => circuit.arcs().variable_for(u, v),
        }
    }

    /// The edges selected by `candidate`.
    pub fn as_graph(&self, candidate: &dyn Candidate) -> SolutionGraph {
        match self {
            Formulation::LazyCuts(lazy) => lazy.vars().as_graph(candidate),
            Formulation::Circuit(circuit) => circuit.arcs().as_graph(candidate),
        }
    }
}
