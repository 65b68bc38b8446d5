//! Boolean branch-and-bound engine.
//!
//! Explores a tree of partial assignments. Every node is propagated to a
//! fixpoint and bounded with [`LowerBounder`]; nodes that cannot beat the
//! incumbent are pruned. Complete assignments are candidates: they are
//! offered to the lazy constraint handler, and accepted only if they satisfy
//! every constraint the handler injected. Injected constraints join the
//! model and apply to every node explored afterwards.

mod node;


use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;

use tourforge_config::{ExplorationType, SolverConfig};
use tourforge_core::Result;
use tracing::{debug, info};

use crate::bound::LowerBounder;
use crate::engine::{Engine, LazyConstraintHandler, SolveStatus};
use crate::model::{CircuitArc, LinearConstraint, LinearExpr, Model, VarId};
use crate::propagation::{propagate, Domains};
use crate::scope::{Incumbent, SearchScope};
use crate::statistics::SearchStatistics;
use crate::termination::{NodeCountTermination, OrTermination, Termination, TimeTermination};

use node::{PriorityNode, SearchNode};

/// Objective difference below which two objectives are considered equal.
const OBJECTIVE_TOLERANCE: f64 = 1e-9;

/// Configuration for the branch-and-bound engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Order in which open nodes are explored.
    pub exploration_type: ExplorationType,
    /// Wall-clock budget of one solve.
    pub time_limit: Option<Duration>,
    /// Maximum number of explored nodes.
    pub node_limit: Option<u64>,
    /// Emit a DEBUG line for every explored node.
    pub log_search_progress: bool,
}

impl EngineConfig {
    /// Extracts the engine settings from a solver configuration.
    pub fn from_solver_config(config: &SolverConfig) -> Self {
        Self {
            exploration_type: config.search.exploration_type,
            time_limit: config.time_limit(),
            node_limit: config.node_count_limit(),
            log_search_progress: config.search.log_search_progress,
        }
    }
}

/// An [`Engine`] that owns its [`Model`] and solves it by branch and bound.
///
/// # Example
///
/// ```
/// use tourforge_engine::{BranchAndBoundEngine, Engine, LinearExpr, SolveStatus};
///
/// let mut engine = BranchAndBoundEngine::new();
/// let a = engine.add_bool_var("a");
/// let b = engine.add_bool_var("b");
/// engine.add_constraint(LinearExpr::sum([a, b]).at_least(1.0)).unwrap();
/// engine.minimize(LinearExpr::new().term(a, 3.0).term(b, 2.0)).unwrap();
///
/// assert_eq!(engine.solve(None).unwrap(), SolveStatus::Optimal);
/// assert_eq!(engine.objective_value(), 2.0);
/// assert_eq!(engine.value(b), Some(1.0));
/// ```
pub struct BranchAndBoundEngine {
    model: Model,
    config: EngineConfig,
    status: SolveStatus,
    incumbent: Option<Incumbent>,
    best_bound: f64,
    statistics: SearchStatistics,
}

impl BranchAndBoundEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            model: Model::new(),
            config,
            status: SolveStatus::NotSolved,
            incumbent: None,
            best_bound: 0.0,
            statistics: SearchStatistics::default(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Statistics of the last solve.
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    fn termination(&self) -> OrTermination<(Option<TimeTermination>, Option<NodeCountTermination>)> {
        OrTermination::new((
            self.config.time_limit.map(TimeTermination::new),
            self.config.node_limit.map(NodeCountTermination::new),
        ))
    }

    /// Propagates and bounds `domains`, returning `None` if the node is
    /// infeasible or cannot improve on the incumbent.
    fn evaluate(
        &self,
        mut domains: Domains,
        bounder: &LowerBounder,
        scope: &mut SearchScope,
    ) -> Option<(Domains, f64)> {
        if propagate(&self.model, &mut domains).is_err() {
            scope.statistics_mut().nodes_infeasible += 1;
            return None;
        }
        let bound = bounder.lower_bound(&domains);
        if bound == f64::INFINITY {
            scope.statistics_mut().nodes_infeasible += 1;
            return None;
        }
        if scope
            .best_objective()
            .is_some_and(|best| bound >= best - OBJECTIVE_TOLERANCE)
        {
            scope.statistics_mut().nodes_pruned += 1;
            return None;
        }
        Some((domains, bound))
    }

    /// Handles a complete assignment. Returns true if the bounder must be
    /// rebuilt because injected constraints changed the cardinality groups.
    fn process_candidate(
        &mut self,
        domains: &Domains,
        handler: &mut Option<&mut dyn LazyConstraintHandler>,
        scope: &mut SearchScope,
    ) -> Result<bool> {
        let values = domains.to_values();
        let value = |var: VarId| values.get(var.index()).copied().unwrap_or(0.0);
        scope.statistics_mut().candidates_found += 1;

        let mut injected: Vec<LinearConstraint> = Vec::new();
        if let Some(handler) = handler.as_mut() {
            handler.on_candidate(&values, &mut injected);
        }

        let mut rejected = false;
        let mut groups_changed = false;
        for constraint in injected {
            rejected |= !constraint.is_satisfied(value);
            groups_changed |= constraint.is_cardinality();
            self.model.add_constraint(constraint)?;
            scope.statistics_mut().lazy_constraints_added += 1;
        }

        if rejected {
            scope.statistics_mut().candidates_rejected += 1;
            debug!(
                event = "candidate_rejected",
                constraints = self.model.constraints().len(),
            );
            return Ok(groups_changed);
        }

        let objective = self.model.objective().evaluate(value);
        if scope.update_incumbent(values, objective) {
            debug!(
                event = "incumbent",
                objective = objective,
                nodes = scope.node_count(),
            );
        }
        Ok(groups_changed)
    }

    /// Picks the free variable with the smallest cost, lowest index first.
    fn branch_variable(domains: &Domains, costs: &[f64]) -> Option<VarId> {
        (0..domains.len())
            .map(VarId::new)
            .filter(|&var| domains.get(var).is_none())
            .min_by(|a, b| costs[a.index()].total_cmp(&costs[b.index()]))
    }
}

impl Default for BranchAndBoundEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BranchAndBoundEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchAndBoundEngine")
            .field("var_count", &self.model.var_count())
            .field("constraint_count", &self.model.constraints().len())
            .field("status", &self.status)
            .field("config", &self.config)
            .finish()
    }
}

impl Engine for BranchAndBoundEngine {
    fn add_bool_var(&mut self, name: &str) -> VarId {
        self.model.add_bool_var(name)
    }

    fn add_constraint(&mut self, constraint: LinearConstraint) -> Result<()> {
        self.model.add_constraint(constraint).map(|_| ())
    }

    fn add_circuit(&mut self, arcs: Vec<CircuitArc>) -> Result<()> {
        self.model.add_circuit(arcs)
    }

    fn minimize(&mut self, objective: LinearExpr) -> Result<()> {
        self.model.minimize(objective)
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.config.time_limit = Some(limit);
    }

    fn solve(
        &mut self,
        mut handler: Option<&mut dyn LazyConstraintHandler>,
    ) -> Result<SolveStatus> {
        info!(
            event = "solve_start",
            var_count = self.model.var_count(),
            constraint_count = self.model.constraints().len(),
            circuit_count = self.model.circuits().len(),
            exploration_type = %self.config.exploration_type,
            lazy_handler = handler.is_some(),
        );

        let termination = self.termination();
        let exploration_type = self.config.exploration_type;
        let costs = self.model.objective_coefficients();
        let mut bounder = LowerBounder::new(&self.model);
        let mut scope = SearchScope::new();
        scope.start_search();

        let mut frontier: BinaryHeap<PriorityNode> = BinaryHeap::new();
        let mut sequence: u64 = 0;
        if let Some((domains, bound)) =
            self.evaluate(Domains::new(self.model.var_count()), &bounder, &mut scope)
        {
            frontier.push(PriorityNode::new(
                sequence,
                SearchNode::root(domains, bound),
                exploration_type,
            ));
        }

        let mut terminated = false;
        while !frontier.is_empty() {
            if termination.is_terminated(&scope) {
                terminated = true;
                debug!(
                    event = "terminated",
                    nodes = scope.node_count(),
                    open_nodes = frontier.len(),
                );
                break;
            }
            let Some(next) = frontier.pop() else {
                break;
            };
            let node = next.into_node();
            if node.can_prune(scope.best_objective(), OBJECTIVE_TOLERANCE) {
                scope.statistics_mut().nodes_pruned += 1;
                continue;
            }
            let explored = scope.increment_node_count();

            // constraints injected since the node was created apply to it too
            let depth = node.depth;
            let Some((domains, bound)) = self.evaluate(node.domains, &bounder, &mut scope) else {
                continue;
            };
            let node = SearchNode {
                depth,
                bound,
                domains,
            };

            if self.config.log_search_progress {
                debug!(
                    event = "node",
                    node = explored,
                    depth = node.depth,
                    bound = node.bound,
                    unfixed = node.domains.unfixed_count(),
                    open_nodes = frontier.len(),
                );
            }

            let Some(var) = Self::branch_variable(&node.domains, &costs) else {
                if self.process_candidate(&node.domains, &mut handler, &mut scope)? {
                    bounder = LowerBounder::new(&self.model);
                }
                continue;
            };

            // the true branch is pushed last so it is explored first
            for value in [false, true] {
                let mut domains = node.domains.clone();
                if domains.fix(var, value).is_err() {
                    continue;
                }
                if let Some((domains, bound)) = self.evaluate(domains, &bounder, &mut scope) {
                    sequence += 1;
                    frontier.push(PriorityNode::new(
                        sequence,
                        node.child(domains, bound),
                        exploration_type,
                    ));
                }
            }
        }

        let open_bound = frontier
            .iter()
            .map(|open| open.node().bound)
            .fold(f64::INFINITY, f64::min);
        let (incumbent, statistics) = scope.finish();
        let objective = incumbent.as_ref().map(|i| i.objective);

        self.best_bound = match objective {
            Some(objective) => open_bound.min(objective),
            None => open_bound,
        };
        self.status = match (objective, terminated) {
            (Some(_), false) => SolveStatus::Optimal,
            (Some(objective), true) if self.best_bound >= objective - OBJECTIVE_TOLERANCE => {
                SolveStatus::Optimal
            }
            (Some(_), true) => SolveStatus::Feasible,
            (None, false) => SolveStatus::Infeasible,
            (None, true) => SolveStatus::LimitReached,
        };
        self.incumbent = incumbent;
        self.statistics = statistics;

        info!(
            event = "solve_end",
            status = %self.status,
            objective = self.objective_value(),
            bound = self.best_bound,
            nodes = self.statistics.nodes_explored,
            lazy_constraints = self.statistics.lazy_constraints_added,
            duration_ms = self.statistics.duration.as_millis() as u64,
        );
        Ok(self.status)
    }

    fn status(&self) -> SolveStatus {
        self.status
    }

    fn objective_value(&self) -> f64 {
        self.incumbent
            .as_ref()
            .map_or(f64::INFINITY, |incumbent| incumbent.objective)
    }

    fn best_bound(&self) -> f64 {
        self.best_bound
    }

    fn value(&self, var: VarId) -> Option<f64> {
        self.incumbent
            .as_ref()
            .and_then(|incumbent| incumbent.values.get(var.index()).copied())
    }

    fn solution_count(&self) -> usize {
        self.statistics.incumbent_updates as usize
    }

    fn var_count(&self) -> usize {
        self.model.var_count()
    }

    fn var_name(&self, var: VarId) -> Option<&str> {
        self.model.var_name(var)
    }
}
