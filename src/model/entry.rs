//! Pool entry value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roster position of an entry.
///
/// Ordering follows the conventional roster order and is used when
/// sorting stack descriptors and filling slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    DST,
    K,
}

impl Position {
    /// Canonical upper-case code.
    pub fn as_str(self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::DST => "DST",
            Position::K => "K",
        }
    }

    /// Whether this position may fill the classic FLEX slot.
    pub fn is_flex_eligible(self) -> bool {
        matches!(self, Position::RB | Position::WR | Position::TE)
    }

    /// Whether this position catches passes for stacking purposes.
    pub fn is_pass_catcher(self) -> bool {
        matches!(self, Position::WR | Position::TE)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "DST" | "DEF" => Ok(Position::DST),
            "K" => Ok(Position::K),
            other => Err(format!("invalid position: {other}")),
        }
    }
}

/// Showdown slot tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "CPT")]
    Captain,
    #[serde(rename = "FLEX")]
    Flex,
}

impl Slot {
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Captain => "CPT",
            Slot::Flex => "FLEX",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CPT" | "CAPTAIN" => Ok(Slot::Captain),
            "FLEX" => Ok(Slot::Flex),
            other => Err(format!("invalid slot: {other}")),
        }
    }
}

/// Coarse entry type: an individual player or a team defense unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Player,
    Defense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Player => "PLAYER",
            EntryKind::Defense => "DST",
        }
    }
}

/// One draftable pool item.
///
/// Team and opponent codes are upper-cased on construction so that every
/// comparison downstream is case-normalized.
///
/// # Examples
///
/// ```
/// use u_lineup::model::{Entry, Position};
///
/// let e = Entry::new("Josh Allen", "buf", "mia", Position::QB, 8200, 24.5, 0.18);
/// assert_eq!(e.team, "BUF");
/// assert_eq!(e.token(), "Josh Allen|BUF");
/// assert_eq!(e.game_key(), "BUF-MIA");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub team: String,
    pub opponent: String,
    pub position: Position,
    /// Showdown slot; `None` for classic entries.
    #[serde(default)]
    pub slot: Option<Slot>,
    pub salary: i64,
    pub projection: f64,
    /// Projected ownership fraction in `[0, 1]`.
    pub ownership: f64,
}

impl Entry {
    /// Creates a classic (slot-less) entry.
    pub fn new(
        name: impl Into<String>,
        team: &str,
        opponent: &str,
        position: Position,
        salary: i64,
        projection: f64,
        ownership: f64,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            team: team.trim().to_ascii_uppercase(),
            opponent: opponent.trim().to_ascii_uppercase(),
            position,
            slot: None,
            salary,
            projection,
            ownership,
        }
    }

    /// Tags the entry with a showdown slot.
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn kind(&self) -> EntryKind {
        if self.position == Position::DST {
            EntryKind::Defense
        } else {
            EntryKind::Player
        }
    }

    pub fn is_captain(&self) -> bool {
        self.slot == Some(Slot::Captain)
    }

    /// Game bucket shared by both teams of a matchup.
    pub fn game_key(&self) -> String {
        game_key(&self.team, &self.opponent)
    }

    /// Stable identity token, `NAME|TEAM`.
    ///
    /// Captain and flex variants of the same player share a token.
    pub fn token(&self) -> String {
        format!("{}|{}", self.name, self.team)
    }

    /// `Name (TEAM)` as rendered in reports.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.team)
    }

    /// Checks the value ranges the pool loader is expected to guarantee.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("entry name must not be empty".into());
        }
        if self.salary < 0 {
            return Err(format!("{}: salary must be non-negative", self.name));
        }
        if !self.projection.is_finite() || self.projection < 0.0 {
            return Err(format!("{}: projection must be finite and non-negative", self.name));
        }
        if !(0.0..=1.0).contains(&self.ownership) {
            return Err(format!("{}: ownership must be a fraction in [0, 1]", self.name));
        }
        Ok(())
    }
}

/// Canonical game bucket for a matchup: both team codes upper-cased,
/// sorted and joined with `-`.
pub fn game_key(team: &str, opponent: &str) -> String {
    let mut parts = [team.trim().to_ascii_uppercase(), opponent.trim().to_ascii_uppercase()];
    parts.sort();
    parts.join("-")
}
