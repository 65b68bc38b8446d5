//! Degree formulation with lazy subtour elimination.

use tourforge_core::{Graph, Result};
use tourforge_engine::{Engine, VarId};
use tracing::debug;

use crate::degree::add_degree_constraints;
use crate::registry::{EdgeRegistry, EdgeSelector};
use crate::subtour::SubtourEliminator;

/// One boolean variable per undirected edge, named `edge_{u}_{v}` with
/// `u < v`.
#[derive(Debug, Clone)]
pub struct EdgeVariables<'g> {
    graph: &'g Graph,
    /// Indexed like [`Graph::edges`].
    vars: Vec<VarId>,
}

impl<'g> EdgeVariables<'g> {
    /// Creates a variable for every edge of `graph`.
    pub fn new(graph: &'g Graph, engine: &mut dyn Engine) -> Self {
        let vars = graph
            .edges()
            .iter()
            .map(|edge| engine.add_bool_var(&format!("edge_{}_{}", edge.u(), edge.v())))
            .collect();
        Self { graph, vars }
    }
}

impl EdgeRegistry for EdgeVariables<'_> {
    fn graph(&self) -> &Graph {
        self.graph
    }

    fn selector(&self, index: usize) -> EdgeSelector {
        EdgeSelector::Undirected(self.vars[index])
    }

    fn var_count(&self) -> usize {
        self.vars.len()
    }
}

/// Degree constraints with the objective over edge weights.
///
/// Degree constraints alone admit disjoint cycles; the formulation is
/// exact only when solved with the handler from
/// [`eliminator`](Self::eliminator).
#[derive(Debug, Clone)]
pub struct LazyCutFormulation<'g> {
    vars: EdgeVariables<'g>,
}

impl<'g> LazyCutFormulation<'g> {
    /// Builds variables, degree constraints and objective into `engine`.
    pub fn build(graph: &'g Graph, engine: &mut dyn Engine) -> Result<Self> {
        let vars = EdgeVariables::new(graph, engine);
        add_degree_constraints(&vars, engine)?;
        engine.minimize(vars.objective())?;

        debug!(
            event = "formulation_built",
            formulation = "lazy_cuts",
            variables = vars.var_count(),
            degree_constraints = graph.node_count(),
        );
        Ok(Self { vars })
    }

    pub fn vars(&self) -> &EdgeVariables<'g> {
        &self.vars
    }

    /// Creates the subtour elimination handler for a solve.
    pub fn eliminator(&self) -> SubtourEliminator<'_, EdgeVariables<'g>> {
        SubtourEliminator::new(&self.vars)
    }
}

#[cfg(test)]
mod tests {
    use tourforge_engine::{BranchAndBoundEngine, Sense};
    use tourforge_test::graphs::k4;

    use super::*;

    #[test]
    fn test_build_model() {
        let graph = k4();
        let mut engine = BranchAndBoundEngine::new();
        let formulation = LazyCutFormulation::build(&graph, &mut engine).unwrap();

        assert_eq!(formulation.vars().var_count(), 6);
        assert_eq!(engine.model().constraints().len(), 4);
        for constraint in engine.model().constraints() {
            assert_eq!(constraint.sense(), Sense::Eq);
            assert_eq!(constraint.rhs(), 2.0);
            assert_eq!(constraint.terms().len(), 3);
        }
        assert!(engine.model().circuits().is_empty());
        assert_eq!(engine.model().objective_coefficients().iter().sum::<f64>(), 135.0);
    }

    #[test]
    fn test_variable_names() {
        let graph = k4();
        let mut engine = BranchAndBoundEngine::new();
        let formulation = LazyCutFormulation::build(&graph, &mut engine).unwrap();

        let Ok(EdgeSelector::Undirected(var)) = formulation.vars().variable_for(3, 1) else {
            panic!("expected an undirected selector");
        };
        assert_eq!(engine.var_name(var), Some("edge_1_3"));
    }
}
