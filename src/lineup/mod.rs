//! Lineup enumeration over a solver oracle.
//!
//! The pool and a [`LineupConfig`] are encoded as a binary model with one
//! decision variable per entry ([`ConstraintBuilder`]). The
//! [`LineupEnumerator`] then solves it repeatedly, adding a no-good cut
//! after every solution so each combination is produced at most once.
//!
//! # Key Types
//!
//! - [`LineupConfig`]: roster shape, salary window, stacking, include and
//!   exclude lists, aggregate bounds, solver knobs
//! - [`ConstraintBuilder`] / [`LineupModel`]: model construction
//! - [`LineupEnumerator`] / [`EnumerationResult`]: the solve-cut loop
//! - [`filter_lineups`]: post-solve projection and ownership filters
//!
//! # Constraint Families
//!
//! | Family            | Shape    | Encoding                                          |
//! |-------------------|----------|---------------------------------------------------|
//! | roster            | both     | exact / minimum counts per position or slot       |
//! | salary            | both     | `min_salary <= Σ salary·x <= salary_cap`          |
//! | captain exclusion | showdown | `Σ variants of one player <= 1`                   |
//! | stack             | classic  | `Σ WR/TE(T) >= k · Σ QB(T)`                       |
//! | game stack        | classic  | `Σ x(g) >= k · z_g`, `Σ z_g >= 1`                 |
//! | QB vs DST         | classic  | `Σ QB(T) + Σ DST facing T <= 1`                   |
//! | pairings          | classic  | `Σ partner(T) >= x_unit`, or unit forced off      |
//! | product ownership | both     | `Σ ln max(own, ε)·x` within `[ln min, ln max]`    |

mod builder;
mod config;
mod filter;
mod runner;

pub use builder::{ConstraintBuilder, LineupModel};
pub use config::{LineupConfig, TeamPairing};
pub use filter::{filter_lineups, FilterResult};
pub use runner::{EnumerationResult, LineupEnumerator, StopReason};
