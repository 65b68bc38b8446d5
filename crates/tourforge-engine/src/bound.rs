//! Lower bounds for branch-and-bound pruning.
//!
//! The bounder estimates the smallest objective any completion of a partial
//! assignment can reach. A node whose bound is not below the incumbent
//! objective cannot improve on it and is pruned.
//!
//! Cardinality groups (`sum(vars) == k` constraints, and the implied
//! one-out/one-in groups of every circuit node) give the bound its strength:
//! each variable's cost is split evenly across the groups containing it,
//! and each group independently picks its `k` cheapest shares. For the
//! degree formulation this is the classic half-sum of the two cheapest
//! incident edges per node.

use smallvec::SmallVec;

use crate::model::{Model, VarId};
use crate::propagation::Domains;

#[derive(Debug, Clone)]
struct CardinalityGroup {
    /// `(var, cost share)` pairs.
    members: Vec<(VarId, f64)>,
    required: usize,
}

/// Computes lower bounds on the objective of partial assignments.
#[derive(Debug, Clone)]
pub struct LowerBounder {
    groups: Vec<CardinalityGroup>,
    /// Variables outside every group, with their full cost.
    ungrouped: Vec<(VarId, f64)>,
    constant: f64,
}

impl LowerBounder {
    /// Builds the bounder from the current constraints and objective.
    pub fn new(model: &Model) -> Self {
        let costs = model.objective_coefficients();

        let mut member_sets: Vec<(SmallVec<[VarId; 8]>, usize)> = Vec::new();
        for constraint in model.constraints() {
            if constraint.is_cardinality() {
                let vars = constraint.terms().iter().map(|&(var, _)| var).collect();
                member_sets.push((vars, constraint.rhs() as usize));
            }
        }
        for circuit in model.circuits() {
            for node in 0..circuit.node_count() {
                member_sets.push((circuit.outgoing(node).map(|a| a.var).collect(), 1));
                member_sets.push((circuit.incoming(node).map(|a| a.var).collect(), 1));
            }
        }

        let mut multiplicity = vec![0usize; costs.len()];
        for (vars, _) in &member_sets {
            for var in vars {
                multiplicity[var.index()] += 1;
            }
        }

        let groups = member_sets
            .into_iter()
            .map(|(vars, required)| CardinalityGroup {
                members: vars
                    .into_iter()
                    .map(|var| (var, costs[var.index()] / multiplicity[var.index()] as f64))
                    .collect(),
                required,
            })
            .collect();
        let ungrouped = costs
            .iter()
            .enumerate()
            .filter(|&(index, _)| multiplicity[index] == 0)
            .map(|(index, &cost)| (VarId::new(index), cost))
            .collect();

        Self {
            groups,
            ungrouped,
            constant: model.objective().constant(),
        }
    }

    /// Returns the number of cardinality groups the bound draws on.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Lower bound on the objective of every completion of `domains`.
    ///
    /// Returns `f64::INFINITY` when some group can no longer be satisfied.
    pub fn lower_bound(&self, domains: &Domains) -> f64 {
        let mut bound = self.constant;

        let mut free_shares: Vec<f64> = Vec::new();
        for group in &self.groups {
            free_shares.clear();
            let mut selected = 0usize;
            for &(var, share) in &group.members {
                match domains.get(var) {
                    Some(true) => {
                        selected += 1;
                        bound += share;
                    }
                    Some(false) => {}
                    None => free_shares.push(share),
                }
            }
            if selected > group.required {
                return f64::INFINITY;
            }
            let missing = group.required - selected;
            if missing > free_shares.len() {
                return f64::INFINITY;
            }
            if missing > 0 {
                free_shares.sort_by(f64::total_cmp);
                bound += free_shares[..missing].iter().sum::<f64>();
            }
        }

        for &(var, cost) in &self.ungrouped {
            match domains.get(var) {
                Some(true) => bound += cost,
                Some(false) => {}
                None => bound += cost.min(0.0),
            }
        }
        bound
    }
}
