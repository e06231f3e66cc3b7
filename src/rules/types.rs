//! Rule AST.

/// Field-equality predicate over an entry.
///
/// Every present field must equal the entry's corresponding field
/// (values are upper-cased at parse time); absent fields are wildcards.
/// An empty selector matches every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Showdown slot (`CPT` / `FLEX`).
    pub slot: Option<String>,
    pub team: Option<String>,
    /// Exact position.
    pub pos: Option<String>,
    /// Position must be one of these.
    pub pos_in: Option<Vec<String>>,
    /// Entry type (`PLAYER` / `DST`). Written `type` in rule files.
    pub kind: Option<String>,
}

impl Selector {
    pub fn team(team: &str) -> Self {
        Self {
            team: Some(team.trim().to_ascii_uppercase()),
            ..Self::default()
        }
    }

    pub fn with_slot(mut self, slot: &str) -> Self {
        self.slot = Some(slot.trim().to_ascii_uppercase());
        self
    }

    pub fn with_pos(mut self, pos: &str) -> Self {
        self.pos = Some(pos.trim().to_ascii_uppercase());
        self
    }

    pub fn with_pos_in(mut self, positions: &[&str]) -> Self {
        self.pos_in = Some(
            positions
                .iter()
                .map(|p| p.trim().to_ascii_uppercase())
                .collect(),
        );
        self
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.trim().to_ascii_uppercase());
        self
    }
}

/// Number of lineup entries matching `selector` must lie in `[min, max]`.
/// Either bound may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountCondition {
    pub selector: Selector,
    pub min: Option<u32>,
    pub max: Option<u32>,
}

/// Holds unless the lineup has at least one `left` match and at least one
/// `right` match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbidCondition {
    pub left: Selector,
    pub right: Selector,
}

/// One enforce clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Count(CountCondition),
    Forbid(ForbidCondition),
    /// Holds when at least one nested clause holds.
    AnyOf(Vec<Clause>),
}

/// A named structural rule.
///
/// Violated when the optional `when` guard holds and any `enforce`
/// clause does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub when: Option<CountCondition>,
    pub enforce: Vec<Clause>,
}

/// Ordered collection of rules, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }
}
