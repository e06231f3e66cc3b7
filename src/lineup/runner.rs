//! Enumeration loop: solve, extract, verify, cut, repeat.
//!
//! [`LineupEnumerator`] owns one growing model. Each solve must finish and
//! its no-good cut must be added before the next solve is issued.

use super::builder::ConstraintBuilder;
use super::config::LineupConfig;
use crate::error::{LineupError, Result};
use crate::milp::{MilpSolver, SolverStatus, VarId};
use crate::model::{Entry, Lineup};
use crate::rules::RuleSet;
use std::time::Instant;
use tracing::{debug, info};

/// Why enumeration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `lineup_count` lineups were produced.
    TargetReached,
    /// The solver reported no further distinct feasible lineup.
    Exhausted,
    /// A solve hit its time limit without any feasible incumbent.
    TimedOut,
}

/// Result of an enumeration run.
#[derive(Debug, Clone)]
pub struct EnumerationResult {
    /// Lineups ordered by total projection, highest first. Ties keep
    /// solve order.
    pub lineups: Vec<Lineup>,

    /// Total number of solver calls.
    pub solves: usize,

    /// Solutions discarded because they violated a rule.
    pub rejected: usize,

    pub stop_reason: StopReason,
}

/// Drives repeated solver calls to enumerate distinct lineups.
///
/// # Usage
///
/// ```
/// use u_lineup::lineup::{LineupConfig, LineupEnumerator};
/// use u_lineup::milp::BranchAndBoundSolver;
/// use u_lineup::model::{Entry, LineupShape, Position, Slot};
///
/// let pool: Vec<Entry> = ["A", "B", "C", "D", "E", "F", "G"]
///     .iter()
///     .enumerate()
///     .map(|(i, name)| {
///         Entry::new(*name, "KC", "BUF", Position::WR, 5000, 10.0 + i as f64, 0.1)
///             .with_slot(Slot::Flex)
///     })
///     .chain(std::iter::once(
///         Entry::new("A", "KC", "BUF", Position::WR, 7500, 15.0, 0.1).with_slot(Slot::Captain),
///     ))
///     .collect();
///
/// let config = LineupConfig::default()
///     .with_shape(LineupShape::Showdown)
///     .with_min_salary(0)
///     .with_lineup_count(3);
/// let result = LineupEnumerator::run(&BranchAndBoundSolver::new(), &pool, &config, None).unwrap();
///
/// assert_eq!(result.lineups.len(), 3);
/// assert!(result.lineups.iter().all(|l| l.entries.iter().any(|e| e.is_captain())));
/// ```
pub struct LineupEnumerator;

impl LineupEnumerator {
    /// Enumerates up to `config.lineup_count` distinct lineups.
    ///
    /// Infeasibility, from the first solve or any later one, ends the run
    /// normally with whatever was collected.
    ///
    /// # Errors
    ///
    /// - configuration and include errors from [`ConstraintBuilder::build`]
    /// - [`LineupError::InvalidModel`] if the solver rejects the model
    /// - [`LineupError::Consistency`] if a solver assignment breaks the
    ///   roster or salary invariants
    pub fn run<S: MilpSolver>(
        solver: &S,
        pool: &[Entry],
        config: &LineupConfig,
        rules: Option<&RuleSet>,
    ) -> Result<EnumerationResult> {
        let start = Instant::now();
        let built = ConstraintBuilder::new(pool, config).build(rules)?;
        let mut model = built.model;
        let entry_vars = built.entry_vars;
        let solver_config = config.solver_config();

        info!(
            event = "enumerate_start",
            shape = ?config.shape,
            pool = pool.len(),
            target = config.lineup_count,
            constraints = model.constraint_count(),
            deferred_rules = built.deferred_rules.len(),
        );

        let mut lineups: Vec<Lineup> = Vec::new();
        let mut solves = 0usize;
        let mut rejected = 0usize;

        let stop_reason = loop {
            if lineups.len() >= config.lineup_count {
                break StopReason::TargetReached;
            }

            let solution = solver.solve(&model, &solver_config);
            solves += 1;
            match solution.status {
                SolverStatus::Optimal | SolverStatus::Feasible => {}
                SolverStatus::Infeasible => break StopReason::Exhausted,
                SolverStatus::Timeout => break StopReason::TimedOut,
                SolverStatus::ModelInvalid => {
                    return Err(LineupError::InvalidModel(model.name.clone()));
                }
            }

            let chosen: Vec<(usize, VarId)> = entry_vars
                .iter()
                .enumerate()
                .filter(|&(_, &v)| solution.value(v) == Some(true))
                .map(|(i, &v)| (i, v))
                .collect();
            let entries: Vec<Entry> = chosen.iter().map(|&(i, _)| pool[i].clone()).collect();
            Self::verify(&entries, config)?;

            let cut: Vec<VarId> = chosen.iter().map(|&(_, v)| v).collect();
            model.add_no_good(&cut);

            if let Some(rules) = rules {
                let violated = rules.violated(&entries);
                if !violated.is_empty() {
                    rejected += 1;
                    debug!(event = "rule_rejected", solve = solves, rules = ?violated);
                    continue;
                }
            }

            let lineup = Lineup::new(config.shape, entries, config.salary_cap);
            debug!(
                event = "lineup",
                n = lineups.len() + 1,
                projection = lineup.total_projection,
                salary = lineup.total_salary,
                stack = %lineup.stack.label(),
                solve_ms = solution.solve_time_ms,
                nodes = solution.nodes,
            );
            lineups.push(lineup);
        };

        lineups.sort_by(|a, b| b.total_projection.total_cmp(&a.total_projection));

        info!(
            event = "enumerate_end",
            lineups = lineups.len(),
            solves,
            rejected,
            stop_reason = ?stop_reason,
            elapsed_ms = start.elapsed().as_millis() as u64,
        );

        Ok(EnumerationResult {
            lineups,
            solves,
            rejected,
            stop_reason,
        })
    }

    /// Re-checks an extracted assignment against the roster and salary
    /// window. A failure means a broken solver or encoding.
    fn verify(entries: &[Entry], config: &LineupConfig) -> Result<()> {
        config
            .shape
            .verify(entries)
            .map_err(LineupError::Consistency)?;
        let salary: i64 = entries.iter().map(|e| e.salary).sum();
        if salary > config.salary_cap || salary < config.min_salary {
            return Err(LineupError::Consistency(format!(
                "salary {salary} outside [{}, {}]",
                config.min_salary, config.salary_cap
            )));
        }
        Ok(())
    }
}
