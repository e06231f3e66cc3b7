//! Constraint-driven lineup enumeration and diversification.
//!
//! Builds many distinct, near-optimal lineups from a scored and costed
//! pool, then curates a diverse subset of them:
//!
//! - **Model**: immutable pool entries and finished lineups with derived
//!   aggregates (salary, projection, ownership metrics, stack summary).
//! - **MILP**: the solver-oracle boundary. A binary linear model, the
//!   [`MilpSolver`](milp::MilpSolver) trait and a bundled depth-first
//!   branch-and-bound reference backend.
//! - **Lineup**: encodes roster, salary, stacking and aggregate bounds as
//!   linear constraints and enumerates distinct solutions with no-good
//!   cuts.
//! - **Rules**: a declarative structural rule language (selectors,
//!   counts, forbids, disjunctions), used as a post-solve validator or
//!   linearized into the model.
//! - **Diversify**: greedy farthest-first selection under per-source
//!   quotas, measured by Jaccard distance over entry tokens.
//!
//! # Architecture
//!
//! Pool + config → constraint builder → (enumerator ⇄ solver) → ranked
//! lineups → optional rule validation → aggregated across sources →
//! diversification selector → curated lineup set.
//!
//! Loading pools, rendering reports and installing a `tracing`
//! subscriber are left to the host application.

pub mod diversify;
pub mod error;
pub mod lineup;
pub mod milp;
pub mod model;
pub mod rules;

pub use error::{LineupError, Result};
