//! Declarative structural rule language.
//!
//! Rules describe lineup eligibility in terms of entry selectors:
//!
//! - [`Selector`]: field-equality predicate (slot, team, position,
//!   position set, type); absent fields are wildcards
//! - [`CountCondition`]: matching-entry count within optional bounds
//! - [`ForbidCondition`]: two selectors that may not both be present
//! - [`Clause::AnyOf`]: disjunction, nestable to any depth
//! - [`Rule`]: named list of enforce clauses behind an optional guard
//!
//! Rules are parsed once from a declarative mapping (see [`parse_rule`])
//! and evaluated repeatedly. A rule set serves either as a post-solve
//! validator or, for unguarded Count/Forbid rules, as extra linear
//! constraints in the solver model ([`Rule::linearize`]).

mod eval;
mod linear;
mod parse;
mod types;

pub use parse::{parse_rule, parse_rules_mapping};
pub use types::{Clause, CountCondition, ForbidCondition, Rule, RuleSet, Selector};
