//! Binary integer-programming boundary.
//!
//! Defines the model the constraint builder writes into and the oracle
//! contract the enumerator drives:
//!
//! - **Variables**: [`BinaryVar`] addressed by [`VarId`]
//! - **Constraints**: [`LinearConstraint`] with a [`Sense`]
//! - **Model**: [`BinaryModel`]: variables, constraints, objective; grows
//!   monotonically as no-good cuts are appended
//! - **Solver**: [`MilpSolver`] trait, `solve(model) -> {status, assignment}`
//!
//! # Design
//!
//! The solver is a black box. [`BranchAndBoundSolver`] is a small exact
//! reference backend; production pools plug a real MILP solver in behind
//! the same trait. A time-limited solve that still holds an incumbent
//! reports [`SolverStatus::Feasible`], which callers treat like
//! [`SolverStatus::Optimal`].

mod model;
mod solver;
mod variables;

pub use model::{BinaryModel, LinearConstraint, Objective, ObjectiveSense, Sense};
pub use solver::{BranchAndBoundSolver, MilpSolution, MilpSolver, SolverConfig, SolverStatus};
pub use variables::{BinaryVar, VarId};
