//! Binary linear model definition.

use super::variables::{BinaryVar, VarId};

/// Relation between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `Σ a·x <= rhs`
    Le,
    /// `Σ a·x >= rhs`
    Ge,
    /// `Σ a·x == rhs`
    Eq,
}

/// A linear constraint over binary variables.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    /// Label used in diagnostics.
    pub name: String,
    /// (variable, coefficient) pairs.
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, terms: Vec<(VarId, f64)>, sense: Sense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            terms,
            sense,
            rhs,
        }
    }

    /// Unit-coefficient sum over `vars`.
    pub fn sum(name: impl Into<String>, vars: &[VarId], sense: Sense, rhs: f64) -> Self {
        Self::new(name, vars.iter().map(|&v| (v, 1.0)).collect(), sense, rhs)
    }

    /// Left-hand side value under a full assignment.
    pub fn activity(&self, assignment: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| assignment.get(v.index()).copied().unwrap_or(false))
            .map(|(_, a)| a)
            .sum()
    }

    /// Whether a full assignment satisfies the constraint within `tol`.
    pub fn is_satisfied(&self, assignment: &[bool], tol: f64) -> bool {
        let lhs = self.activity(assignment);
        match self.sense {
            Sense::Le => lhs <= self.rhs + tol,
            Sense::Ge => lhs >= self.rhs - tol,
            Sense::Eq => (lhs - self.rhs).abs() <= tol,
        }
    }
}

/// Objective direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Maximize,
    Minimize,
}

/// Linear objective function.
#[derive(Debug, Clone)]
pub struct Objective {
    pub sense: ObjectiveSense,
    /// (variable, coefficient) pairs.
    pub terms: Vec<(VarId, f64)>,
}

impl Objective {
    pub fn maximize(terms: Vec<(VarId, f64)>) -> Self {
        Self {
            sense: ObjectiveSense::Maximize,
            terms,
        }
    }

    pub fn minimize(terms: Vec<(VarId, f64)>) -> Self {
        Self {
            sense: ObjectiveSense::Minimize,
            terms,
        }
    }

    /// Objective value under a full assignment.
    pub fn value(&self, assignment: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| assignment.get(v.index()).copied().unwrap_or(false))
            .map(|(_, c)| c)
            .sum()
    }
}

/// A binary integer-programming model.
///
/// Owns variables, constraints and an optional objective. The model grows
/// monotonically: constraints are appended (for example no-good cuts
/// between solves) but never removed.
///
/// # Examples
///
/// ```
/// use u_lineup::milp::{BinaryModel, LinearConstraint, Objective, Sense};
///
/// let mut model = BinaryModel::new("example");
/// let a = model.add_var("a");
/// let b = model.add_var("b");
/// model.add_constraint(LinearConstraint::sum("pick_one", &[a, b], Sense::Eq, 1.0));
/// model.set_objective(Objective::maximize(vec![(a, 2.0), (b, 3.0)]));
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryModel {
    /// Model name.
    pub name: String,
    /// Variables, indexed by [`VarId`].
    pub vars: Vec<BinaryVar>,
    /// Constraints.
    pub constraints: Vec<LinearConstraint>,
    /// Objective function.
    pub objective: Option<Objective>,
}

impl BinaryModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Adds a free binary variable and returns its id.
    pub fn add_var(&mut self, name: impl Into<String>) -> VarId {
        self.vars.push(BinaryVar::new(name));
        VarId(self.vars.len() - 1)
    }

    /// Fixes a variable's bound to `value`.
    ///
    /// Fixing an already-fixed variable to the opposite value leaves it
    /// at `false`, which keeps an exclusion stronger than an inclusion.
    pub fn fix(&mut self, var: VarId, value: bool) {
        if let Some(v) = self.vars.get_mut(var.index()) {
            v.fixed = match v.fixed {
                Some(current) if current != value => Some(false),
                _ => Some(value),
            };
        }
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Adds a no-good cut excluding the exact combination `selected`.
    ///
    /// `Σ x_i over selected <= |selected| - 1`
    pub fn add_no_good(&mut self, selected: &[VarId]) {
        let name = format!("no_good_{}", self.constraints.len());
        self.constraints.push(LinearConstraint::sum(
            name,
            selected,
            Sense::Le,
            selected.len() as f64 - 1.0,
        ));
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists and every coefficient
    /// and right-hand side is finite.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.vars.len();
        for c in &self.constraints {
            if !c.rhs.is_finite() {
                return Err(format!("{}: non-finite rhs", c.name));
            }
            for (v, a) in &c.terms {
                if v.index() >= n {
                    return Err(format!("{}: undefined variable {}", c.name, v.index()));
                }
                if !a.is_finite() {
                    return Err(format!("{}: non-finite coefficient", c.name));
                }
            }
        }
        if let Some(obj) = &self.objective {
            for (v, c) in &obj.terms {
                if v.index() >= n {
                    return Err(format!("objective: undefined variable {}", v.index()));
                }
                if !c.is_finite() {
                    return Err("objective: non-finite coefficient".into());
                }
            }
        }
        Ok(())
    }

    /// Whether a full assignment satisfies every bound and constraint.
    pub fn is_feasible(&self, assignment: &[bool], tol: f64) -> bool {
        assignment.len() == self.vars.len()
            && self
                .vars
                .iter()
                .zip(assignment)
                .all(|(v, &x)| v.fixed.map_or(true, |f| f == x))
            && self.constraints.iter().all(|c| c.is_satisfied(assignment, tol))
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
