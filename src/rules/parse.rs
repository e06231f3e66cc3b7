//! Recursive-descent parser from declarative mappings to the rule AST.
//!
//! Accepted shape (YAML shown):
//!
//! ```yaml
//! qb_cpt_needs_two_catchers:
//!   when:
//!     count: { selector: { slot: CPT, pos: QB, team: KC }, min: 1 }
//!   enforce:
//!     - count: { selector: { team: KC, pos_in: [WR, TE] }, min: 2 }
//!     - forbid:
//!         left:  { selector: { slot: CPT, pos: QB } }
//!         right: { type: DST }
//!     - any_of:
//!         - count: { selector: { team: KC }, min: 4 }
//!         - count: { selector: { team: BUF }, min: 4 }
//! ```
//!
//! Every malformed shape is rejected here, with the rule name attached,
//! so evaluation never sees a partially valid tree.

use super::types::{Clause, CountCondition, ForbidCondition, Rule, RuleSet, Selector};
use crate::error::{LineupError, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;

type ParseResult<T> = std::result::Result<T, String>;

fn get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn scalar_upper(value: &Value, field: &str) -> ParseResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_ascii_uppercase())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(format!(
            "selector.{field} must be a scalar, got {}",
            type_name(other)
        )),
    }
}

fn parse_selector(value: &Value) -> ParseResult<Selector> {
    let map = value
        .as_mapping()
        .ok_or_else(|| format!("selector must be a mapping, got {}", type_name(value)))?;

    let field = |key: &str| -> ParseResult<Option<String>> {
        match get(map, key) {
            Some(v) => scalar_upper(v, key),
            None => Ok(None),
        }
    };

    let pos_in = match get(map, "pos_in") {
        None | Some(Value::Null) => None,
        Some(Value::Sequence(items)) => Some(
            items
                .iter()
                .map(|v| scalar_upper(v, "pos_in").map(|s| s.unwrap_or_default()))
                .collect::<ParseResult<Vec<_>>>()?,
        ),
        Some(_) => return Err("selector.pos_in must be a list if provided".into()),
    };

    Ok(Selector {
        slot: field("slot")?,
        team: field("team")?,
        pos: field("pos")?,
        pos_in,
        kind: field("type")?,
    })
}

fn parse_bound(value: Option<&Value>, field: &str) -> ParseResult<Option<u32>> {
    let invalid = || format!("{field} must be a non-negative integer if provided");
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).map(Some).map_err(|_| invalid())
            } else if let Some(f) = n.as_f64() {
                if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
                    Ok(Some(f as u32))
                } else {
                    Err(invalid())
                }
            } else {
                Err(invalid())
            }
        }
        Some(Value::String(s)) => s.trim().parse::<u32>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn parse_count(value: &Value) -> ParseResult<CountCondition> {
    let map = value
        .as_mapping()
        .ok_or_else(|| "count condition must be a mapping".to_string())?;
    let selector = get(map, "selector")
        .ok_or_else(|| "count condition missing required 'selector'".to_string())?;
    let selector = parse_selector(selector)?;
    let min = parse_bound(get(map, "min"), "min")?;
    let max = parse_bound(get(map, "max"), "max")?;
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(format!("count min ({lo}) exceeds max ({hi})"));
        }
    }
    Ok(CountCondition { selector, min, max })
}

/// Accepts either direct selector fields or a `{selector: {...}}` wrapper.
fn unwrap_selector(value: &Value) -> &Value {
    match value.as_mapping().and_then(|m| get(m, "selector")) {
        Some(inner) => inner,
        None => value,
    }
}

fn parse_forbid(value: &Value) -> ParseResult<ForbidCondition> {
    let map = value
        .as_mapping()
        .ok_or_else(|| "forbid condition must be a mapping".to_string())?;
    let (left, right) = match (get(map, "left"), get(map, "right")) {
        (Some(l), Some(r)) => (l, r),
        _ => return Err("forbid condition requires 'left' and 'right' selectors".into()),
    };
    Ok(ForbidCondition {
        left: parse_selector(unwrap_selector(left))?,
        right: parse_selector(unwrap_selector(right))?,
    })
}

fn parse_any_of(value: &Value) -> ParseResult<Clause> {
    let items = value
        .as_sequence()
        .ok_or_else(|| "any_of must be a list".to_string())?;
    if items.is_empty() {
        return Err("any_of requires at least one option".into());
    }
    let options = items
        .iter()
        .map(parse_clause)
        .collect::<ParseResult<Vec<_>>>()?;
    Ok(Clause::AnyOf(options))
}

fn parse_clause(value: &Value) -> ParseResult<Clause> {
    let map = value
        .as_mapping()
        .ok_or_else(|| "enforce clause must be a mapping".to_string())?;
    if let Some(v) = get(map, "count") {
        return parse_count(v).map(Clause::Count);
    }
    if let Some(v) = get(map, "forbid") {
        return parse_forbid(v).map(Clause::Forbid);
    }
    if let Some(v) = get(map, "any_of") {
        return parse_any_of(v);
    }
    Err("enforce clause must contain one of: 'count', 'forbid', 'any_of'".into())
}

fn parse_rule_body(value: &Value) -> ParseResult<(Option<CountCondition>, Vec<Clause>)> {
    let map = value.as_mapping().ok_or_else(|| "rule must be a mapping".to_string())?;

    let when = match get(map, "when") {
        None | Some(Value::Null) => None,
        Some(w) => {
            let count = w
                .as_mapping()
                .and_then(|m| get(m, "count"))
                .ok_or_else(|| "'when' must be of the form {count: ...}".to_string())?;
            Some(parse_count(count)?)
        }
    };

    let enforce = match get(map, "enforce") {
        Some(Value::Sequence(items)) if !items.is_empty() => items
            .iter()
            .map(parse_clause)
            .collect::<ParseResult<Vec<_>>>()?,
        _ => return Err("rule must have a non-empty 'enforce' list".into()),
    };

    Ok((when, enforce))
}

/// Parses one rule definition.
pub fn parse_rule(name: &str, value: &Value) -> Result<Rule> {
    let (when, enforce) = parse_rule_body(value).map_err(|reason| LineupError::MalformedRule {
        rule: name.to_string(),
        reason,
    })?;
    Ok(Rule {
        name: name.to_string(),
        when,
        enforce,
    })
}

/// Parses a `name -> rule` mapping, preserving definition order.
pub fn parse_rules_mapping(value: &Value) -> Result<RuleSet> {
    let map = value.as_mapping().ok_or_else(|| LineupError::MalformedRule {
        rule: "<root>".into(),
        reason: format!("rules must be a mapping, got {}", type_name(value)),
    })?;
    let mut rules = Vec::with_capacity(map.len());
    for (key, body) in map {
        let name = key.as_str().ok_or_else(|| LineupError::MalformedRule {
            rule: format!("{key:?}"),
            reason: "rule names must be strings".into(),
        })?;
        rules.push(parse_rule(name, body)?);
    }
    Ok(RuleSet::new(rules))
}

impl RuleSet {
    /// Parses a YAML document whose root is a `name -> rule` mapping.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(s)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        parse_rules_mapping(&value)
    }

    /// Parses the rules for one contest label from a document shaped
    /// `label -> constraints -> rules -> {name: rule}`.
    ///
    /// Missing or empty sections yield an empty set; a root that is not a
    /// mapping is an error.
    pub fn for_label(s: &str, label: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(s)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        if !value.is_mapping() {
            return Err(LineupError::MalformedRule {
                rule: "<root>".into(),
                reason: "expected a mapping of contest labels".into(),
            });
        }
        let rules = value
            .get(label)
            .filter(|v| v.is_mapping())
            .and_then(|v| v.get("constraints"))
            .filter(|v| v.is_mapping())
            .and_then(|v| v.get("rules"))
            .filter(|v| v.as_mapping().is_some_and(|m| !m.is_empty()));
        match rules {
            Some(r) => parse_rules_mapping(r),
            None => Ok(Self::default()),
        }
    }

    /// Reads a rules file and parses the section for `label`.
    pub fn load_for_label(path: impl AsRef<Path>, label: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::for_label(&contents, label)
    }
}
