//! Lazy subtour elimination.
//!
//! Degree constraints admit candidates made of several disjoint cycles. For
//! each such candidate, every component `C` gets the cut
//! `sum(x_e for e with exactly one endpoint in C) >= 2`: a tour must leave
//! and re-enter every proper subset of the nodes. The candidate crosses no
//! edge out of its own components, so every cut it receives is violated by
//! it and the engine never accepts it again.

use tourforge_engine::{Candidate, ConstraintInjector, LazyConstraintHandler, LinearExpr};
use tracing::debug;

use crate::registry::EdgeRegistry;

/// Cutting-plane callback that forbids disconnected candidates.
#[derive(Debug)]
pub struct SubtourEliminator<'a, R> {
    registry: &'a R,
    candidates_seen: u64,
    cuts_added: u64,
}

impl<'a, R: EdgeRegistry> SubtourEliminator<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self {
            registry,
            candidates_seen: 0,
            cuts_added: 0,
        }
    }

    /// Number of candidates inspected.
    pub fn candidates_seen(&self) -> u64 {
        self.candidates_seen
    }

    /// Number of cuts injected.
    pub fn cuts_added(&self) -> u64 {
        self.cuts_added
    }
}

impl<R: EdgeRegistry> LazyConstraintHandler for SubtourEliminator<'_, R> {
    fn on_candidate(&mut self, candidate: &dyn Candidate, injector: &mut dyn ConstraintInjector) {
        self.candidates_seen += 1;

        let components = self.registry.as_graph(candidate).components();
        if components.len() <= 1 {
            return;
        }

        for component in &components {
            let mut crossing_edges = 0usize;
            let cut = LinearExpr::sum(
                self.registry
                    .outgoing_edges(component)
                    .inspect(|_| crossing_edges += 1)
                    .flat_map(|(_, selector)| selector.vars()),
            );
            debug!(
                event = "lazy_cut",
                component_size = component.len(),
                crossing_edges = crossing_edges,
            );
            injector.add_constraint(cut.at_least(2.0));
            self.cuts_added += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tourforge_core::Graph;
    use tourforge_engine::{BranchAndBoundEngine, LinearConstraint, Sense, VarId};
    use tourforge_test::graphs::{k4, two_triangles};
    use tourforge_test::selected_values;

    use super::*;
    use crate::lazy::{EdgeVariables, LazyCutFormulation};

    fn vars_of(
        registry: &EdgeVariables<'_>,
        edges: &[(usize, usize)],
    ) -> Vec<usize> {
        edges
            .iter()
            .flat_map(|&(u, v)| registry.variable_for(u, v).unwrap().vars())
            .map(VarId::index)
            .collect()
    }

    fn build(graph: &Graph) -> LazyCutFormulation<'_> {
        let mut engine = BranchAndBoundEngine::new();
        LazyCutFormulation::build(graph, &mut engine).unwrap()
    }

    #[test]
    fn test_two_triangles_get_one_cut_each() {
        let graph = two_triangles();
        let formulation = build(&graph);
        let vars = formulation.vars();
        let selected = vars_of(vars, &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]);
        let candidate = selected_values(vars.var_count(), &selected);

        let mut eliminator = formulation.eliminator();
        let mut cuts: Vec<LinearConstraint> = Vec::new();
        eliminator.on_candidate(&candidate, &mut cuts);

        assert_eq!(cuts.len(), 2);
        assert_eq!(eliminator.cuts_added(), 2);
        let crossing: Vec<VarId> = [(0, 3), (1, 4), (2, 5)]
            .iter()
            .map(|&(u, v)| match vars.variable_for(u, v).unwrap().vars()[..] {
                [var] => var,
                _ => panic!("expected one variable per edge"),
            })
            .collect();
        for cut in &cuts {
            assert_eq!(cut.sense(), Sense::Ge);
            assert_eq!(cut.rhs(), 2.0);
            let cut_vars: Vec<VarId> = cut.terms().iter().map(|&(var, _)| var).collect();
            assert_eq!(cut_vars, crossing);
            // the candidate violates the cut
            assert!(!cut.is_satisfied(|var| candidate[var.index()]));
        }
    }

    #[test]
    fn test_tour_gets_no_cut() {
        let graph = k4();
        let formulation = build(&graph);
        let vars = formulation.vars();
        let selected = vars_of(vars, &[(0, 1), (1, 3), (3, 2), (2, 0)]);
        let candidate = selected_values(vars.var_count(), &selected);

        let mut eliminator = formulation.eliminator();
        let mut cuts: Vec<LinearConstraint> = Vec::new();
        eliminator.on_candidate(&candidate, &mut cuts);

        assert!(cuts.is_empty());
        assert_eq!(eliminator.candidates_seen(), 1);
        assert_eq!(eliminator.cuts_added(), 0);
    }

    #[test]
    fn test_fractional_values_below_threshold_are_ignored() {
        let graph = k4();
        let formulation = build(&graph);
        let vars = formulation.vars();
        let mut candidate: HashMap<VarId, f64> = HashMap::new();
        for (edge, selector) in vars.iter() {
            let [var] = selector.vars()[..] else {
                panic!("expected one variable per edge");
            };
            let on_tour = [(0, 1), (1, 3), (2, 3), (0, 2)].contains(&edge.endpoints());
            candidate.insert(var, if on_tour { 0.9 } else { 0.4 });
        }

        let mut cuts: Vec<LinearConstraint> = Vec::new();
        formulation.eliminator().on_candidate(&candidate, &mut cuts);
        assert!(cuts.is_empty());
    }

    #[test]
    fn test_isolated_node_is_its_own_component() {
        let graph = k4();
        let formulation = build(&graph);
        let vars = formulation.vars();
        // a triangle over 0, 1, 2 leaves node 3 alone
        let selected = vars_of(vars, &[(0, 1), (1, 2), (0, 2)]);
        let candidate = selected_values(vars.var_count(), &selected);

        let mut cuts: Vec<LinearConstraint> = Vec::new();
        formulation.eliminator().on_candidate(&candidate, &mut cuts);

        assert_eq!(cuts.len(), 2);
        for cut in &cuts {
            assert_eq!(cut.terms().len(), 3);
        }
    }
}
