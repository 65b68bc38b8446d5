//! Boolean domains and constraint propagation.
//!
//! Propagation fixes variables that every completion of a partial
//! assignment must agree on, and detects partial assignments that have no
//! feasible completion. It runs to a fixpoint over all linear and circuit
//! constraints of the model.

use crate::model::{CircuitConstraint, LinearConstraint, Model, Sense, VarId};

const EPSILON: f64 = 1e-9;

/// A partial assignment that cannot be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict;

/// Current domain of every boolean variable: unfixed, false or true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    values: Vec<Option<bool>>,
    unfixed: usize,
}

impl Domains {
    /// All `len` variables unfixed.
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![None; len],
            unfixed: len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, var: VarId) -> Option<bool> {
        self.values[var.index()]
    }

    /// Fixes `var` to `value`. Returns whether the domain changed.
    pub fn fix(&mut self, var: VarId, value: bool) -> Result<bool, Conflict> {
        match self.values[var.index()] {
            Some(current) if current == value => Ok(false),
            Some(_) => Err(Conflict),
            None => {
                self.values[var.index()] = Some(value);
                self.unfixed -= 1;
                Ok(true)
            }
        }
    }

    #[inline]
    pub fn unfixed_count(&self) -> usize {
        self.unfixed
    }

    /// Returns true when every variable is fixed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.unfixed == 0
    }

    /// Fixed values as `0.0`/`1.0`; unfixed variables read as `0.0`.
    pub fn to_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|v| if *v == Some(true) { 1.0 } else { 0.0 })
            .collect()
    }
}

/// Propagates every constraint of `model` to a fixpoint.
pub fn propagate(model: &Model, domains: &mut Domains) -> Result<(), Conflict> {
    loop {
        let mut changed = false;
        for constraint in model.constraints() {
            changed |= propagate_linear(constraint, domains)?;
        }
        for circuit in model.circuits() {
            changed |= propagate_circuit(circuit, domains)?;
        }
        if !changed {
            return Ok(());
        }
    }
}

/// Bounds propagation on one linear constraint.
///
/// With `min`/`max` the smallest and largest reachable activity, a free
/// variable is fixed whenever one of its values would push the activity out
/// of range. Fixing a variable to the value assumed by `min` (or `max`)
/// leaves that extreme unchanged, so one pass is exact.
pub fn propagate_linear(
    constraint: &LinearConstraint,
    domains: &mut Domains,
) -> Result<bool, Conflict> {
    let mut min_activity = 0.0;
    let mut max_activity = 0.0;
    for &(var, coef) in constraint.terms() {
        match domains.get(var) {
            Some(true) => {
                min_activity += coef;
                max_activity += coef;
            }
            Some(false) => {}
            None if coef > 0.0 => max_activity += coef,
            None => min_activity += coef,
        }
    }

    let rhs = constraint.rhs();
    let upper = matches!(constraint.sense(), Sense::Le | Sense::Eq);
    let lower = matches!(constraint.sense(), Sense::Ge | Sense::Eq);
    if upper && min_activity > rhs + EPSILON {
        return Err(Conflict);
    }
    if lower && max_activity < rhs - EPSILON {
        return Err(Conflict);
    }

    let mut changed = false;
    for &(var, coef) in constraint.terms() {
        if domains.get(var).is_some() {
            continue;
        }
        let magnitude = coef.abs();
        if upper && min_activity + magnitude > rhs + EPSILON {
            // the value not assumed by `min` overshoots
            changed |= domains.fix(var, coef < 0.0)?;
        } else if lower && max_activity - magnitude < rhs - EPSILON {
            // the value not assumed by `max` undershoots
            changed |= domains.fix(var, coef > 0.0)?;
        }
    }
    Ok(changed)
}

/// Propagation for the single-circuit constraint.
///
/// Enforces one true outgoing and one true incoming arc per node, and
/// forbids any free arc that would close a cycle shorter than the circuit.
pub fn propagate_circuit(
    circuit: &CircuitConstraint,
    domains: &mut Domains,
) -> Result<bool, Conflict> {
    let node_count = circuit.node_count();
    let mut changed = false;

    for node in 0..node_count {
        changed |= propagate_exactly_one(circuit.outgoing(node).map(|a| a.var), domains)?;
        changed |= propagate_exactly_one(circuit.incoming(node).map(|a| a.var), domains)?;
    }

    let mut successor = vec![None; node_count];
    for arc in circuit.arcs() {
        if domains.get(arc.var) == Some(true) {
            successor[arc.tail] = Some(arc.head);
        }
    }

    // closed chains of true arcs must span every node
    for start in 0..node_count {
        let mut current = start;
        for _ in 1..node_count {
            match successor[current] {
                Some(next) => current = next,
                None => break,
            }
            if current == start {
                return Err(Conflict);
            }
        }
    }

    for arc in circuit.arcs() {
        if domains.get(arc.var).is_some() {
            continue;
        }
        // walk the true chain from the head; reaching the tail means this
        // arc would close a cycle of `length` arcs
        let mut current = arc.head;
        let mut length = 1;
        while current != arc.tail && length < node_count {
            match successor[current] {
                Some(next) => {
                    current = next;
                    length += 1;
                }
                None => break,
            }
        }
        if current == arc.tail && length < node_count {
            changed |= domains.fix(arc.var, false)?;
        }
    }

    Ok(changed)
}

fn propagate_exactly_one<I>(vars: I, domains: &mut Domains) -> Result<bool, Conflict>
where
    I: Iterator<Item = VarId> + Clone,
{
    let mut true_count = 0;
    let mut free = None;
    let mut free_count = 0;
    for var in vars.clone() {
        match domains.get(var) {
            Some(true) => true_count += 1,
            Some(false) => {}
            None => {
                free_count += 1;
                free = Some(var);
            }
        }
    }

    match (true_count, free_count) {
        (0, 0) => Err(Conflict),
        (0, 1) => match free {
            Some(var) => domains.fix(var, true),
            None => Err(Conflict),
        },
        (1, 0) | (0, _) => Ok(false),
        (1, _) => {
            let mut changed = false;
            for var in vars {
                if domains.get(var).is_none() {
                    changed |= domains.fix(var, false)?;
                }
            }
            Ok(changed)
        }
        _ => Err(Conflict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CircuitArc, LinearExpr};

    fn model_with_vars(n: usize) -> (Model, Vec<VarId>) {
        let mut model = Model::new();
        let vars = (0..n)
            .map(|i| model.add_bool_var(format!("v{i}")))
            .collect();
        (model, vars)
    }

    #[test]
    fn test_fix_conflict() {
        let mut domains = Domains::new(2);
        assert_eq!(domains.fix(VarId::new(0), true), Ok(true));
        assert_eq!(domains.fix(VarId::new(0), true), Ok(false));
        assert_eq!(domains.fix(VarId::new(0), false), Err(Conflict));
        assert_eq!(domains.unfixed_count(), 1);
        assert_eq!(domains.to_values(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_equality_fixes_remaining() {
        let (_, v) = model_with_vars(3);
        let degree = LinearExpr::sum(v.clone()).equal_to(2.0);
        let mut domains = Domains::new(3);
        domains.fix(v[0], false).unwrap();

        assert_eq!(propagate_linear(&degree, &mut domains), Ok(true));
        assert_eq!(domains.get(v[1]), Some(true));
        assert_eq!(domains.get(v[2]), Some(true));
    }

    #[test]
    fn test_equality_saturated_fixes_rest_false() {
        let (_, v) = model_with_vars(4);
        let degree = LinearExpr::sum(v.clone()).equal_to(2.0);
        let mut domains = Domains::new(4);
        domains.fix(v[0], true).unwrap();
        domains.fix(v[3], true).unwrap();

        propagate_linear(&degree, &mut domains).unwrap();
        assert_eq!(domains.get(v[1]), Some(false));
        assert_eq!(domains.get(v[2]), Some(false));
    }

    #[test]
    fn test_linear_conflict() {
        let (_, v) = model_with_vars(2);
        let cut = LinearExpr::sum(v.clone()).at_least(2.0);
        let mut domains = Domains::new(2);
        domains.fix(v[1], false).unwrap();

        assert_eq!(propagate_linear(&cut, &mut domains), Err(Conflict));
    }

    #[test]
    fn test_negative_coefficients() {
        let (_, v) = model_with_vars(2);
        // x0 - x1 >= 1 forces x0 = 1, x1 = 0
        let constraint = LinearExpr::new()
            .term(v[0], 1.0)
            .term(v[1], -1.0)
            .at_least(1.0);
        let mut domains = Domains::new(2);

        propagate_linear(&constraint, &mut domains).unwrap();
        assert_eq!(domains.get(v[0]), Some(true));
        assert_eq!(domains.get(v[1]), Some(false));
    }

    #[test]
    fn test_circuit_forbids_short_cycles() {
        let (mut model, v) = model_with_vars(12);
        // complete directed graph on 4 nodes
        let mut arcs = Vec::new();
        let mut next = 0;
        for tail in 0..4 {
            for head in 0..4 {
                if tail != head {
                    arcs.push(CircuitArc::new(tail, head, v[next]));
                    next += 1;
                }
            }
        }
        model.add_circuit(arcs.clone()).unwrap();
        let mut domains = Domains::new(12);
        let arc_var = |t: usize, h: usize| {
            arcs.iter()
                .find(|a| a.tail == t && a.head == h)
                .map(|a| a.var)
                .unwrap()
        };
        domains.fix(arc_var(0, 1), true).unwrap();
        domains.fix(arc_var(1, 2), true).unwrap();

        propagate(&model, &mut domains).unwrap();
        assert_eq!(domains.get(arc_var(1, 0)), Some(false));
        assert_eq!(domains.get(arc_var(2, 0)), Some(false));
        assert_eq!(domains.get(arc_var(2, 1)), Some(false));
        // only 2 -> 3 -> 0 completes the circuit
        assert_eq!(domains.get(arc_var(2, 3)), Some(true));
        assert_eq!(domains.get(arc_var(3, 0)), Some(true));
        assert!(domains.is_complete());
    }

    #[test]
    fn test_circuit_detects_subcycle() {
        let (mut model, v) = model_with_vars(4);
        model
            .add_circuit(vec![
                CircuitArc::new(0, 1, v[0]),
                CircuitArc::new(1, 0, v[1]),
                CircuitArc::new(1, 2, v[2]),
                CircuitArc::new(2, 0, v[3]),
            ])
            .unwrap();
        let mut domains = Domains::new(4);
        domains.fix(v[0], true).unwrap();
        domains.fix(v[1], true).unwrap();

        assert_eq!(propagate(&model, &mut domains), Err(Conflict));
    }

    #[test]
    fn test_node_without_arcs_is_infeasible() {
        let (mut model, v) = model_with_vars(2);
        // node 2 has an incoming arc only
        model
            .add_circuit(vec![CircuitArc::new(0, 1, v[0]), CircuitArc::new(1, 2, v[1])])
            .unwrap();
        let mut domains = Domains::new(2);
        assert_eq!(propagate(&model, &mut domains), Err(Conflict));
    }
}
