//! Linear model types.
//!
//! The [`Model`] is the explicit, owned store of everything the engine
//! optimizes over: named boolean variables, a minimize objective, linear
//! constraints and circuit constraints. Constraints are only ever appended.

use std::fmt;

use smallvec::SmallVec;
use tourforge_core::{NodeId, Result, TourForgeError};

/// Feasibility tolerance used when evaluating constraints.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Handle to a boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the dense index of this variable.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A linear expression `sum(coef * var) + constant`.
///
/// # Example
///
/// ```
/// use tourforge_engine::{LinearExpr, Sense, VarId};
///
/// let (a, b) = (VarId::new(0), VarId::new(1));
/// let cut = LinearExpr::sum([a, b]).at_least(2.0);
///
/// assert_eq!(cut.sense(), Sense::Ge);
/// assert!(cut.is_satisfied(|_| 1.0));
/// assert!(!cut.is_satisfied(|v| if v == a { 1.0 } else { 0.0 }));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables with unit coefficients.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        vars.into_iter().map(|var| (var, 1.0)).collect()
    }

    /// Adds `coef * var` and returns the expression.
    pub fn term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    #[inline]
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    #[inline]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression under `value`.
    pub fn evaluate<F: Fn(VarId) -> f64>(&self, value: F) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|&(var, coef)| coef * value(var))
                .sum::<f64>()
    }

    /// `self == rhs`
    pub fn equal_to(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Sense::Eq, rhs)
    }

    /// `self >= rhs`
    pub fn at_least(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Sense::Ge, rhs)
    }

    /// `self <= rhs`
    pub fn at_most(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Sense::Le, rhs)
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
            constant: 0.0,
        }
    }
}

/// Comparison sense of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Ge,
    Le,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Eq => write!(f, "=="),
            Sense::Ge => write!(f, ">="),
            Sense::Le => write!(f, "<="),
        }
    }
}

/// A linear constraint `sum(coef * var) <sense> rhs`.
///
/// Construction folds the expression constant into `rhs`, merges repeated
/// variables and drops zero coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    terms: Vec<(VarId, f64)>,
    sense: Sense,
    rhs: f64,
}

impl LinearConstraint {
    pub fn new(expr: LinearExpr, sense: Sense, rhs: f64) -> Self {
        let mut terms = expr.terms;
        terms.sort_by_key(|&(var, _)| var);
        let mut merged: Vec<(VarId, f64)> = Vec::with_capacity(terms.len());
        for (var, coef) in terms {
            match merged.last_mut() {
                Some((last, total)) if *last == var => *total += coef,
                _ => merged.push((var, coef)),
            }
        }
        merged.retain(|&(_, coef)| coef != 0.0);

        Self {
            terms: merged,
            sense,
            rhs: rhs - expr.constant,
        }
    }

    #[inline]
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    #[inline]
    pub fn sense(&self) -> Sense {
        self.sense
    }

    #[inline]
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Left-hand side value under `value`.
    pub fn activity<F: Fn(VarId) -> f64>(&self, value: F) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * value(var))
            .sum()
    }

    /// Returns true if the constraint holds under `value`.
    pub fn is_satisfied<F: Fn(VarId) -> f64>(&self, value: F) -> bool {
        self.violation(value) <= FEASIBILITY_TOLERANCE
    }

    /// Amount by which the constraint is violated, `0.0` when satisfied.
    pub fn violation<F: Fn(VarId) -> f64>(&self, value: F) -> f64 {
        let activity = self.activity(value);
        match self.sense {
            Sense::Eq => (activity - self.rhs).abs(),
            Sense::Ge => (self.rhs - activity).max(0.0),
            Sense::Le => (activity - self.rhs).max(0.0),
        }
    }

    /// Returns true for `sum(vars) == k` with unit coefficients and a
    /// non-negative integral `k`.
    pub fn is_cardinality(&self) -> bool {
        self.sense == Sense::Eq
            && self.rhs >= 0.0
            && self.rhs.fract() == 0.0
            && self.terms.iter().all(|&(_, coef)| coef == 1.0)
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            write!(f, "0")?;
        }
        for (i, (var, coef)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if *coef == 1.0 {
                write!(f, "{var}")?;
            } else {
                write!(f, "{coef}*{var}")?;
            }
        }
        write!(f, " {} {}", self.sense, self.rhs)
    }
}

/// A directed arc `tail -> head` controlled by a boolean variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitArc {
    pub tail: NodeId,
    pub head: NodeId,
    pub var: VarId,
}

impl CircuitArc {
    pub fn new(tail: NodeId, head: NodeId, var: VarId) -> Self {
        Self { tail, head, var }
    }
}

/// Global constraint: the true arcs form a single circuit through every node.
#[derive(Debug, Clone)]
pub struct CircuitConstraint {
    node_count: usize,
    arcs: Vec<CircuitArc>,
    /// Per node: indices into `arcs` leaving the node.
    outgoing: Vec<SmallVec<[usize; 8]>>,
    /// Per node: indices into `arcs` entering the node.
    incoming: Vec<SmallVec<[usize; 8]>>,
}

impl CircuitConstraint {
    /// Creates a circuit over nodes `0..=max(node)` appearing in `arcs`.
    pub fn new(arcs: Vec<CircuitArc>) -> Result<Self> {
        let node_count = arcs
            .iter()
            .map(|arc| arc.tail.max(arc.head) + 1)
            .max()
            .unwrap_or(0);
        let mut outgoing = vec![SmallVec::new(); node_count];
        let mut incoming = vec![SmallVec::new(); node_count];
        for (index, arc) in arcs.iter().enumerate() {
            if arc.tail == arc.head {
                return Err(TourForgeError::SelfLoop(arc.tail));
            }
            outgoing[arc.tail].push(index);
            incoming[arc.head].push(index);
        }
        Ok(Self {
            node_count,
            arcs,
            outgoing,
            incoming,
        })
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn arcs(&self) -> &[CircuitArc] {
        &self.arcs
    }

    /// Arcs leaving `node`.
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = &CircuitArc> + Clone + '_ {
        self.outgoing[node].iter().map(|&i| &self.arcs[i])
    }

    /// Arcs entering `node`.
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = &CircuitArc> + Clone + '_ {
        self.incoming[node].iter().map(|&i| &self.arcs[i])
    }

    /// Returns true if the arcs valued above one half form one circuit
    /// through all nodes.
    pub fn is_satisfied<F: Fn(VarId) -> f64>(&self, value: F) -> bool {
        let mut successor = vec![None; self.node_count];
        let mut in_degree = vec![0usize; self.node_count];
        for arc in &self.arcs {
            if value(arc.var) > 0.5 {
                if successor[arc.tail].is_some() {
                    return false;
                }
                successor[arc.tail] = Some(arc.head);
                in_degree[arc.head] += 1;
            }
        }
        if in_degree.iter().any(|&d| d != 1) {
            return false;
        }

        let mut current = 0;
        for step in 1..=self.node_count {
            match successor[current] {
                Some(next) => current = next,
                None => return false,
            }
            if current == 0 {
                return step == self.node_count;
            }
        }
        false
    }
}

/// The owned constraint model of one solve session.
#[derive(Debug, Clone, Default)]
pub struct Model {
    names: Vec<String>,
    objective: LinearExpr,
    constraints: Vec<LinearConstraint>,
    circuits: Vec<CircuitConstraint>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a named boolean variable.
    pub fn add_bool_var(&mut self, name: impl Into<String>) -> VarId {
        let var = VarId::new(self.names.len());
        self.names.push(name.into());
        var
    }

    #[inline]
    pub fn var_count(&self) -> usize {
        self.names.len()
    }

    pub fn var_name(&self, var: VarId) -> Option<&str> {
        self.names.get(var.index()).map(String::as_str)
    }

    fn check_vars<'a, I>(&self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a VarId>,
    {
        match vars.into_iter().find(|var| var.index() >= self.var_count()) {
            Some(var) => Err(TourForgeError::Engine(format!(
                "unknown variable {var} in model with {} variables",
                self.var_count()
            ))),
            None => Ok(()),
        }
    }

    /// Appends a linear constraint and returns its index.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) -> Result<usize> {
        self.check_vars(constraint.terms().iter().map(|(var, _)| var))?;
        self.constraints.push(constraint);
        Ok(self.constraints.len() - 1)
    }

    #[inline]
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Appends a circuit constraint over `arcs`.
    pub fn add_circuit(&mut self, arcs: Vec<CircuitArc>) -> Result<()> {
        self.check_vars(arcs.iter().map(|arc| &arc.var))?;
        let circuit = CircuitConstraint::new(arcs)?;
        self.circuits.push(circuit);
        Ok(())
    }

    #[inline]
    pub fn circuits(&self) -> &[CircuitConstraint] {
        &self.circuits
    }

    /// Declares the objective to minimize.
    pub fn minimize(&mut self, objective: LinearExpr) -> Result<()> {
        self.check_vars(objective.terms().iter().map(|(var, _)| var))?;
        self.objective = objective;
        Ok(())
    }

    #[inline]
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Dense objective coefficients, one per variable.
    pub fn objective_coefficients(&self) -> Vec<f64> {
        let mut costs = vec![0.0; self.var_count()];
        for &(var, coef) in self.objective.terms() {
            costs[var.index()] += coef;
        }
        costs
    }

    /// Returns true if `value` satisfies every constraint of the model.
    pub fn is_feasible<F: Fn(VarId) -> f64 + Copy>(&self, value: F) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(value))
            && self.circuits.iter().all(|c| c.is_satisfied(value))
    }
}
