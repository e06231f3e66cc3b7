//! Encoding of Count and Forbid rules as linear constraints.
//!
//! Guarded rules and `any_of` clauses are not encoded; the enumerator
//! checks them after each solve instead.

use super::types::{Clause, Rule, Selector};
use crate::milp::{BinaryModel, LinearConstraint, Sense, VarId};
use crate::model::Entry;

impl Rule {
    /// Whether every clause of this rule has a linear encoding.
    pub fn is_linearizable(&self) -> bool {
        self.when.is_none()
            && self
                .enforce
                .iter()
                .all(|c| matches!(c, Clause::Count(_) | Clause::Forbid(_)))
    }

    /// Adds this rule's constraints to `model`.
    ///
    /// `vars[i]` is the decision variable of `pool[i]`. Returns `false`
    /// without touching the model when the rule is not linearizable.
    pub fn linearize(&self, model: &mut BinaryModel, pool: &[Entry], vars: &[VarId]) -> bool {
        if !self.is_linearizable() {
            return false;
        }
        let matching = |selector: &Selector| -> Vec<VarId> {
            pool.iter()
                .zip(vars)
                .filter(|(e, _)| selector.matches(e))
                .map(|(_, &v)| v)
                .collect()
        };

        for (k, clause) in self.enforce.iter().enumerate() {
            match clause {
                Clause::Count(c) => {
                    let xs = matching(&c.selector);
                    if let Some(min) = c.min {
                        model.add_constraint(LinearConstraint::sum(
                            format!("rule_{}_{k}_min", self.name),
                            &xs,
                            Sense::Ge,
                            min as f64,
                        ));
                    }
                    if let Some(max) = c.max {
                        model.add_constraint(LinearConstraint::sum(
                            format!("rule_{}_{k}_max", self.name),
                            &xs,
                            Sense::Le,
                            max as f64,
                        ));
                    }
                }
                Clause::Forbid(f) => {
                    let left = matching(&f.left);
                    let right = matching(&f.right);
                    if left.is_empty() || right.is_empty() {
                        continue;
                    }
                    // y = 1 allows left-matches, y = 0 allows right-matches.
                    let y = model.add_var(format!("rule_{}_{k}_side", self.name));
                    let mut lhs: Vec<(VarId, f64)> = left.iter().map(|&v| (v, 1.0)).collect();
                    lhs.push((y, -(left.len() as f64)));
                    model.add_constraint(LinearConstraint::new(
                        format!("rule_{}_{k}_left", self.name),
                        lhs,
                        Sense::Le,
                        0.0,
                    ));
                    let mut rhs: Vec<(VarId, f64)> = right.iter().map(|&v| (v, 1.0)).collect();
                    rhs.push((y, right.len() as f64));
                    model.add_constraint(LinearConstraint::new(
                        format!("rule_{}_{k}_right", self.name),
                        rhs,
                        Sense::Le,
                        right.len() as f64,
                    ));
                }
                Clause::AnyOf(_) => {}
            }
        }
        true
    }
}
