//! Finished lineups, roster shapes and derived aggregates.

use super::entry::{Entry, Position, Slot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default salary cap shared by both shapes.
pub const DEFAULT_SALARY_CAP: i64 = 50_000;

/// Per-entry ownership floor applied before multiplying or taking logs.
///
/// A zero-ownership entry would otherwise collapse the product to 0 and
/// make its logarithm undefined.
pub const OWNERSHIP_EPSILON: f64 = 1e-6;

/// Which group of entries a roster requirement counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterGroup {
    Position(Position),
    Slot(Slot),
}

impl RosterGroup {
    pub fn matches(self, entry: &Entry) -> bool {
        match self {
            RosterGroup::Position(p) => entry.position == p,
            RosterGroup::Slot(s) => entry.slot == Some(s),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RosterGroup::Position(p) => p.as_str(),
            RosterGroup::Slot(s) => s.as_str(),
        }
    }
}

/// A count bound on one roster group. `max == Some(min)` is an exact count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterRequirement {
    pub group: RosterGroup,
    pub min: usize,
    pub max: Option<usize>,
}

impl RosterRequirement {
    pub fn exactly(group: RosterGroup, n: usize) -> Self {
        Self {
            group,
            min: n,
            max: Some(n),
        }
    }

    pub fn at_least(group: RosterGroup, n: usize) -> Self {
        Self {
            group,
            min: n,
            max: None,
        }
    }

    pub fn is_satisfied(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |m| count <= m)
    }
}

/// The two supported lineup shapes.
///
/// - `Classic`: QB, 2 RB, 3 WR, TE, FLEX (RB/WR/TE), DST: nine entries.
/// - `Showdown`: one captain plus five flex entries from a single game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineupShape {
    #[default]
    Classic,
    Showdown,
}

impl LineupShape {
    /// Number of entries in a complete lineup.
    pub fn roster_size(self) -> usize {
        match self {
            LineupShape::Classic => 9,
            LineupShape::Showdown => 6,
        }
    }

    /// Count requirements every lineup of this shape satisfies.
    ///
    /// The classic FLEX slot is implied: minimums sum to eight, leaving
    /// one RB/WR/TE free.
    pub fn requirements(self) -> Vec<RosterRequirement> {
        use RosterGroup::{Position as P, Slot as S};
        match self {
            LineupShape::Classic => vec![
                RosterRequirement::exactly(P(Position::QB), 1),
                RosterRequirement::exactly(P(Position::DST), 1),
                RosterRequirement::at_least(P(Position::RB), 2),
                RosterRequirement::at_least(P(Position::WR), 3),
                RosterRequirement::at_least(P(Position::TE), 1),
            ],
            LineupShape::Showdown => vec![
                RosterRequirement::exactly(S(Slot::Captain), 1),
                RosterRequirement::exactly(S(Slot::Flex), 5),
            ],
        }
    }

    /// Verifies roster size and every count requirement.
    pub fn verify(self, entries: &[Entry]) -> Result<(), String> {
        if entries.len() != self.roster_size() {
            return Err(format!(
                "expected {} entries, got {}",
                self.roster_size(),
                entries.len()
            ));
        }
        for req in self.requirements() {
            let count = entries.iter().filter(|e| req.group.matches(e)).count();
            if !req.is_satisfied(count) {
                return Err(format!(
                    "{} count {} outside [{}, {}]",
                    req.group.label(),
                    count,
                    req.min,
                    req.max.map_or("inf".to_string(), |m| m.to_string())
                ));
            }
        }
        Ok(())
    }

    /// The entry whose team anchors the stack descriptor.
    fn primary<'a>(self, entries: &'a [Entry]) -> Option<&'a Entry> {
        match self {
            LineupShape::Classic => entries.iter().find(|e| e.position == Position::QB),
            LineupShape::Showdown => entries.iter().find(|e| e.is_captain()),
        }
    }
}

/// Compact stack descriptor for a lineup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSummary {
    /// Positions that share the primary entry's team (sorted, unique).
    pub positions: Vec<Position>,
    /// Size of the largest same-game cluster.
    pub max_game_stack: usize,
    /// Game key of that cluster (first encountered on ties).
    pub max_game_key: String,
}

impl StackSummary {
    fn compute(shape: LineupShape, entries: &[Entry]) -> Self {
        let positions = match shape.primary(entries) {
            Some(primary) => {
                let set: BTreeSet<Position> = entries
                    .iter()
                    .filter(|e| !std::ptr::eq(*e, primary) && e.team == primary.team)
                    .filter(|e| match shape {
                        LineupShape::Classic => e.position.is_pass_catcher(),
                        LineupShape::Showdown => true,
                    })
                    .map(|e| e.position)
                    .collect();
                set.into_iter().collect()
            }
            None => Vec::new(),
        };

        let mut games: Vec<(String, usize)> = Vec::new();
        for e in entries {
            let key = e.game_key();
            match games.iter_mut().find(|(k, _)| *k == key) {
                Some((_, n)) => *n += 1,
                None => games.push((key, 1)),
            }
        }
        let (max_game_key, max_game_stack) = games
            .into_iter()
            .fold((String::new(), 0), |best, (k, n)| if n > best.1 { (k, n) } else { best });

        Self {
            positions,
            max_game_stack,
            max_game_key,
        }
    }

    /// Comma-separated position list, e.g. `WR,TE`.
    pub fn label(&self) -> String {
        self.positions
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Entries assigned to named roster slots, for rendering.
#[derive(Debug, Clone)]
pub enum LineupSlots<'a> {
    Classic {
        qb: &'a Entry,
        rb: [&'a Entry; 2],
        wr: [&'a Entry; 3],
        te: &'a Entry,
        flex: &'a Entry,
        dst: &'a Entry,
    },
    Showdown {
        captain: &'a Entry,
        /// Flex entries, highest projection first.
        flex: Vec<&'a Entry>,
    },
}

/// A complete, constraint-satisfying lineup with aggregates computed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub shape: LineupShape,
    pub entries: Vec<Entry>,
    pub total_salary: i64,
    pub total_projection: f64,
    pub sum_ownership: f64,
    /// Product of per-entry ownership, each floored at [`OWNERSHIP_EPSILON`].
    pub product_ownership: f64,
    /// `Σ (salary / salary_cap) · ownership`.
    pub weighted_ownership: f64,
    pub stack: StackSummary,
}

impl Lineup {
    /// Builds a lineup and derives every aggregate.
    ///
    /// Does not verify the roster; callers that need the guarantee use
    /// [`LineupShape::verify`] first.
    pub fn new(shape: LineupShape, entries: Vec<Entry>, salary_cap: i64) -> Self {
        let cap = if salary_cap > 0 { salary_cap as f64 } else { DEFAULT_SALARY_CAP as f64 };
        let total_salary = entries.iter().map(|e| e.salary).sum();
        let total_projection = entries.iter().map(|e| e.projection).sum();
        let sum_ownership = entries.iter().map(|e| e.ownership).sum();
        let product_ownership = entries
            .iter()
            .map(|e| e.ownership.max(OWNERSHIP_EPSILON))
            .product();
        let weighted_ownership = entries
            .iter()
            .map(|e| (e.salary as f64 / cap) * e.ownership)
            .sum();
        let stack = StackSummary::compute(shape, &entries);

        Self {
            shape,
            entries,
            total_salary,
            total_projection,
            sum_ownership,
            product_ownership,
            weighted_ownership,
            stack,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identity tokens of all entries.
    pub fn tokens(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.token()).collect()
    }

    /// Whether both lineups contain exactly the same entries (slot-aware).
    pub fn same_entries(&self, other: &Lineup) -> bool {
        let key = |l: &Lineup| -> BTreeSet<String> {
            l.entries
                .iter()
                .map(|e| format!("{}|{}", e.token(), e.slot.map_or("", |s| s.as_str())))
                .collect()
        };
        key(self) == key(other)
    }

    /// Assigns entries to named slots.
    ///
    /// Returns `None` when the entries do not form a complete lineup of
    /// the declared shape.
    pub fn slots(&self) -> Option<LineupSlots<'_>> {
        match self.shape {
            LineupShape::Classic => {
                let mut sorted: Vec<&Entry> = self.entries.iter().collect();
                sorted.sort_by(|a, b| {
                    a.position
                        .cmp(&b.position)
                        .then(b.projection.total_cmp(&a.projection))
                });
                let of = |p: Position| {
                    sorted
                        .iter()
                        .copied()
                        .filter(|e| e.position == p)
                        .collect::<Vec<_>>()
                };
                let (qb, rb, wr, te, dst) = (
                    of(Position::QB),
                    of(Position::RB),
                    of(Position::WR),
                    of(Position::TE),
                    of(Position::DST),
                );
                if qb.len() != 1
                    || dst.len() != 1
                    || rb.len() < 2
                    || wr.len() < 3
                    || te.is_empty()
                {
                    return None;
                }
                let fixed = [rb[0], rb[1], wr[0], wr[1], wr[2], te[0]];
                let flex = sorted
                    .iter()
                    .copied()
                    .filter(|e| e.position.is_flex_eligible())
                    .find(|e| !fixed.iter().any(|f| std::ptr::eq(*f, *e)))?;
                Some(LineupSlots::Classic {
                    qb: qb[0],
                    rb: [rb[0], rb[1]],
                    wr: [wr[0], wr[1], wr[2]],
                    te: te[0],
                    flex,
                    dst: dst[0],
                })
            }
            LineupShape::Showdown => {
                let captain = self.entries.iter().find(|e| e.is_captain())?;
                let mut flex: Vec<&Entry> =
                    self.entries.iter().filter(|e| !e.is_captain()).collect();
                flex.sort_by(|a, b| b.projection.total_cmp(&a.projection));
                Some(LineupSlots::Showdown { captain, flex })
            }
        }
    }
}
