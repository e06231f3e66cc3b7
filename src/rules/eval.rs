//! Rule evaluation against a candidate lineup.

use super::types::{Clause, CountCondition, ForbidCondition, Rule, RuleSet, Selector};
use crate::model::Entry;

impl Selector {
    /// Whether `entry` satisfies every field present on the selector.
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(slot) = &self.slot {
            if entry.slot.map(|s| s.as_str()) != Some(slot.as_str()) {
                return false;
            }
        }
        if let Some(team) = &self.team {
            if entry.team != *team {
                return false;
            }
        }
        if let Some(pos) = &self.pos {
            if entry.position.as_str() != pos {
                return false;
            }
        }
        if let Some(set) = &self.pos_in {
            if !set.iter().any(|p| p == entry.position.as_str()) {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            if entry.kind().as_str() != kind {
                return false;
            }
        }
        true
    }

    /// Number of entries the selector matches.
    pub fn count(&self, entries: &[Entry]) -> usize {
        entries.iter().filter(|e| self.matches(e)).count()
    }
}

impl CountCondition {
    pub fn holds(&self, entries: &[Entry]) -> bool {
        let n = self.selector.count(entries) as u64;
        self.min.map_or(true, |m| n >= m as u64) && self.max.map_or(true, |m| n <= m as u64)
    }
}

impl ForbidCondition {
    pub fn holds(&self, entries: &[Entry]) -> bool {
        let left = entries.iter().any(|e| self.left.matches(e));
        let right = entries.iter().any(|e| self.right.matches(e));
        !(left && right)
    }
}

impl Clause {
    pub fn holds(&self, entries: &[Entry]) -> bool {
        match self {
            Clause::Count(c) => c.holds(entries),
            Clause::Forbid(f) => f.holds(entries),
            Clause::AnyOf(options) => options.iter().any(|c| c.holds(entries)),
        }
    }
}

impl Rule {
    /// Whether the guard holds and at least one enforce clause fails.
    pub fn is_violated(&self, entries: &[Entry]) -> bool {
        let guarded = self.when.as_ref().map_or(true, |w| w.holds(entries));
        guarded && self.enforce.iter().any(|c| !c.holds(entries))
    }
}

impl RuleSet {
    /// Names of all rules the lineup violates, in definition order.
    pub fn violated(&self, entries: &[Entry]) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.is_violated(entries))
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn is_satisfied_by(&self, entries: &[Entry]) -> bool {
        self.rules.iter().all(|r| !r.is_violated(entries))
    }
}
