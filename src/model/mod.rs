//! Shared data model: pool entries and finished lineups.
//!
//! Everything here is an immutable value type. Entries are loaded once per
//! run by an external collaborator; lineups are created by the enumerator
//! and never mutated afterwards.

mod entry;
mod lineup;

pub use entry::{game_key, Entry, EntryKind, Position, Slot};
pub use lineup::{
    Lineup, LineupShape, LineupSlots, RosterGroup, RosterRequirement, StackSummary,
    DEFAULT_SALARY_CAP, OWNERSHIP_EPSILON,
};
