//! Lineup generation configuration.
//!
//! [`LineupConfig`] holds every parameter of a generation run: roster
//! shape, salary window, stacking, include/exclude lists, aggregate bounds
//! and solver knobs. It is deserializable from TOML or YAML and validated
//! once before any solve.

use crate::error::{LineupError, Result};
use crate::milp::SolverConfig;
use crate::model::{LineupShape, Position, DEFAULT_SALARY_CAP};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Same-team implication: selecting a `unit` from team T requires at least
/// one `partner` from T.
///
/// When T has no `partner` in the pool the `unit` entries of T are forced
/// off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPairing {
    pub unit: Position,
    pub partner: Position,
}

/// Configuration for lineup enumeration.
///
/// # Defaults
///
/// ```
/// use u_lineup::lineup::LineupConfig;
///
/// let config = LineupConfig::default();
/// assert_eq!(config.lineup_count, 5000);
/// assert_eq!(config.min_salary, 45_000);
/// assert_eq!(config.stack, 1);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_lineup::lineup::LineupConfig;
///
/// let config = LineupConfig::default()
///     .with_lineup_count(150)
///     .with_min_salary(48_000)
///     .with_game_stack(4)
///     .exclude_team("NYJ");
/// assert!(config.validate().is_ok());
/// ```
///
/// # Loading
///
/// ```
/// use u_lineup::lineup::LineupConfig;
///
/// let config = LineupConfig::from_toml_str(r#"
///     lineup_count = 20
///     min_salary = 49000
///     max_sum_ownership = 1.5
///     [min_players_by_team]
///     KC = 2
/// "#).unwrap();
/// assert_eq!(config.lineup_count, 20);
/// assert_eq!(config.min_players_by_team.get("KC"), Some(&2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineupConfig {
    /// Classic nine-entry roster or showdown captain mode.
    pub shape: LineupShape,

    /// Number of distinct lineups to enumerate.
    pub lineup_count: usize,

    pub salary_cap: i64,
    pub min_salary: i64,

    /// Allow a QB together with the defense facing the QB's team (classic).
    pub allow_qb_vs_dst: bool,

    /// Minimum WR/TE teammates required alongside the QB (classic, 0 = off).
    pub stack: u32,

    /// Minimum entries drawn from one game (classic, 0 = off).
    pub game_stack: u32,

    /// Shorthand for a `DST requires RB` [`TeamPairing`].
    pub rb_dst_stack: bool,

    /// Additional same-team implications.
    pub pairings: Vec<TeamPairing>,

    pub excluded_players: BTreeSet<String>,
    pub included_players: BTreeSet<String>,
    pub excluded_teams: BTreeSet<String>,
    pub min_players_by_team: BTreeMap<String, u32>,

    pub min_sum_projection: Option<f64>,
    pub max_sum_projection: Option<f64>,

    /// Per-entry projection floor, applied by [`filter_lineups`](super::filter_lineups).
    pub min_player_projection: Option<f64>,

    pub min_sum_ownership: Option<f64>,
    pub max_sum_ownership: Option<f64>,
    pub min_product_ownership: Option<f64>,
    pub max_product_ownership: Option<f64>,
    pub min_weighted_ownership: Option<f64>,
    pub max_weighted_ownership: Option<f64>,

    /// Worker threads handed to the solver. `None` uses available parallelism.
    pub solver_threads: Option<usize>,

    /// Per-solve wall-clock limit in seconds. `None` lets each solve run
    /// to optimality, which the bundled branch and bound only does quickly
    /// on modest pools; set a limit or use an external backend otherwise.
    pub solver_time_limit_s: Option<u64>,
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            shape: LineupShape::Classic,
            lineup_count: 5000,
            salary_cap: DEFAULT_SALARY_CAP,
            min_salary: 45_000,
            allow_qb_vs_dst: false,
            stack: 1,
            game_stack: 0,
            rb_dst_stack: false,
            pairings: Vec::new(),
            excluded_players: BTreeSet::new(),
            included_players: BTreeSet::new(),
            excluded_teams: BTreeSet::new(),
            min_players_by_team: BTreeMap::new(),
            min_sum_projection: None,
            max_sum_projection: None,
            min_player_projection: None,
            min_sum_ownership: None,
            max_sum_ownership: None,
            min_product_ownership: None,
            max_product_ownership: None,
            min_weighted_ownership: None,
            max_weighted_ownership: None,
            solver_threads: None,
            solver_time_limit_s: None,
        }
    }
}

impl LineupConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Loads configuration from a file; `.yaml`/`.yml` are read as YAML,
    /// anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    pub fn with_shape(mut self, shape: LineupShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_lineup_count(mut self, n: usize) -> Self {
        self.lineup_count = n;
        self
    }

    pub fn with_salary_cap(mut self, cap: i64) -> Self {
        self.salary_cap = cap;
        self
    }

    pub fn with_min_salary(mut self, min: i64) -> Self {
        self.min_salary = min;
        self
    }

    pub fn with_allow_qb_vs_dst(mut self, allow: bool) -> Self {
        self.allow_qb_vs_dst = allow;
        self
    }

    pub fn with_stack(mut self, k: u32) -> Self {
        self.stack = k;
        self
    }

    pub fn with_game_stack(mut self, k: u32) -> Self {
        self.game_stack = k;
        self
    }

    pub fn with_rb_dst_stack(mut self, enabled: bool) -> Self {
        self.rb_dst_stack = enabled;
        self
    }

    pub fn with_pairing(mut self, unit: Position, partner: Position) -> Self {
        self.pairings.push(TeamPairing { unit, partner });
        self
    }

    pub fn exclude_player(mut self, name: impl Into<String>) -> Self {
        self.excluded_players.insert(name.into());
        self
    }

    pub fn include_player(mut self, name: impl Into<String>) -> Self {
        self.included_players.insert(name.into());
        self
    }

    pub fn exclude_team(mut self, team: &str) -> Self {
        self.excluded_teams.insert(team.trim().to_ascii_uppercase());
        self
    }

    pub fn with_min_team(mut self, team: &str, n: u32) -> Self {
        self.min_players_by_team.insert(team.trim().to_ascii_uppercase(), n);
        self
    }

    pub fn with_sum_projection(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_sum_projection = min;
        self.max_sum_projection = max;
        self
    }

    pub fn with_min_player_projection(mut self, min: f64) -> Self {
        self.min_player_projection = Some(min);
        self
    }

    pub fn with_sum_ownership(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_sum_ownership = min;
        self.max_sum_ownership = max;
        self
    }

    pub fn with_product_ownership(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_product_ownership = min;
        self.max_product_ownership = max;
        self
    }

    pub fn with_weighted_ownership(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_weighted_ownership = min;
        self.max_weighted_ownership = max;
        self
    }

    pub fn with_solver_threads(mut self, threads: usize) -> Self {
        self.solver_threads = Some(threads);
        self
    }

    pub fn with_time_limit_s(mut self, seconds: u64) -> Self {
        self.solver_time_limit_s = Some(seconds);
        self
    }

    /// All same-team implications, including the `rb_dst_stack` shorthand.
    pub fn effective_pairings(&self) -> Vec<TeamPairing> {
        let mut out = self.pairings.clone();
        if self.rb_dst_stack {
            let rb_dst = TeamPairing {
                unit: Position::DST,
                partner: Position::RB,
            };
            if !out.contains(&rb_dst) {
                out.push(rb_dst);
            }
        }
        out
    }

    /// Solver knobs derived from this configuration.
    pub fn solver_config(&self) -> SolverConfig {
        let num_workers = self.solver_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        SolverConfig {
            time_limit_ms: self.solver_time_limit_s.map(|s| s.saturating_mul(1000)),
            num_workers,
        }
    }

    /// Validates the configuration.
    ///
    /// Collects every problem instead of stopping at the first one.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.lineup_count == 0 {
            errors.push("lineup_count must be at least 1".to_string());
        }
        if self.salary_cap <= 0 {
            errors.push("salary_cap must be positive".to_string());
        }
        if self.min_salary < 0 || self.min_salary > self.salary_cap {
            errors.push(format!(
                "min_salary must be within [0, {}], got {}",
                self.salary_cap, self.min_salary
            ));
        }

        let roster = self.shape.roster_size() as u32;
        for (team, &n) in &self.min_players_by_team {
            if team.trim().is_empty() {
                errors.push("min_players_by_team: team key must not be empty".to_string());
            }
            if n > roster {
                errors.push(format!(
                    "min_players_by_team[{team}] = {n} exceeds roster size {roster}"
                ));
            }
        }

        let windows = [
            ("sum_projection", self.min_sum_projection, self.max_sum_projection),
            ("sum_ownership", self.min_sum_ownership, self.max_sum_ownership),
            ("product_ownership", self.min_product_ownership, self.max_product_ownership),
            ("weighted_ownership", self.min_weighted_ownership, self.max_weighted_ownership),
        ];
        for (label, min, max) in windows {
            for (bound, value) in [("min", min), ("max", max)] {
                if let Some(v) = value {
                    if !v.is_finite() || v < 0.0 {
                        errors.push(format!("{bound}_{label} must be finite and non-negative"));
                    }
                }
            }
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo > hi {
                    errors.push(format!("min_{label} ({lo}) exceeds max_{label} ({hi})"));
                }
            }
        }
        if let Some(v) = self.min_player_projection {
            if !v.is_finite() || v < 0.0 {
                errors.push("min_player_projection must be finite and non-negative".to_string());
            }
        }

        for name in self.included_players.intersection(&self.excluded_players) {
            errors.push(format!("player '{name}' is both included and excluded"));
        }

        for p in &self.pairings {
            if p.unit == p.partner {
                errors.push(format!("pairing {} requires itself", p.unit));
            }
        }

        if self.solver_threads == Some(0) {
            errors.push("solver_threads must be positive".to_string());
        }
        if self.solver_time_limit_s == Some(0) {
            errors.push("solver_time_limit_s must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LineupError::Config(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_of(config: &LineupConfig) -> Vec<String> {
        match config.validate() {
            Err(LineupError::Config(errors)) => errors,
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        assert!(LineupConfig::default().validate().is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = LineupConfig::default()
            .with_lineup_count(0)
            .with_min_salary(60_000)
            .with_sum_ownership(Some(2.0), Some(1.0));
        let errors = errors_of(&config);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("lineup_count")));
        assert!(errors.iter().any(|e| e.contains("min_salary")));
        assert!(errors.iter().any(|e| e.contains("sum_ownership")));
    }

    #[test]
    fn test_negative_bound_rejected() {
        let config = LineupConfig::default().with_sum_projection(Some(-1.0), None);
        assert!(errors_of(&config)[0].contains("min_sum_projection"));
    }

    #[test]
    fn test_include_exclude_conflict() {
        let config = LineupConfig::default()
            .include_player("Player X")
            .exclude_player("Player X");
        assert!(errors_of(&config)[0].contains("Player X"));
    }

    #[test]
    fn test_solver_knobs() {
        let config = LineupConfig::default()
            .with_solver_threads(4)
            .with_time_limit_s(3);
        let solver = config.solver_config();
        assert_eq!(solver.num_workers, 4);
        assert_eq!(solver.time_limit_ms, Some(3000));

        let zero = LineupConfig {
            solver_threads: Some(0),
            solver_time_limit_s: Some(0),
            ..LineupConfig::default()
        };
        assert_eq!(errors_of(&zero).len(), 2);
    }

    #[test]
    fn test_rb_dst_shorthand() {
        let config = LineupConfig::default().with_rb_dst_stack(true);
        assert_eq!(
            config.effective_pairings(),
            vec![TeamPairing {
                unit: Position::DST,
                partner: Position::RB
            }]
        );
    }

    #[test]
    fn test_min_team_exceeds_roster() {
        let config = LineupConfig::default()
            .with_shape(LineupShape::Showdown)
            .with_min_team("kc", 7);
        assert!(errors_of(&config)[0].contains("KC"));
    }

    #[test]
    fn test_from_yaml() {
        let config = LineupConfig::from_yaml_str(
            "shape: showdown\nlineup_count: 10\nmin_salary: 0\nexcluded_teams: [NYJ]\n",
        )
        .unwrap();
        assert_eq!(config.shape, LineupShape::Showdown);
        assert_eq!(config.lineup_count, 10);
        assert!(config.excluded_teams.contains("NYJ"));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = std::env::temp_dir();
        let stem = format!("u_lineup_config_{}", std::process::id());
        let toml_path = dir.join(format!("{stem}.toml"));
        let yaml_path = dir.join(format!("{stem}.yml"));
        std::fs::write(&toml_path, "lineup_count = 7\nstack = 2\n").unwrap();
        std::fs::write(&yaml_path, "lineup_count: 9\nshape: showdown\n").unwrap();

        let from_toml = LineupConfig::load(&toml_path);
        let from_yaml = LineupConfig::load(&yaml_path);
        std::fs::remove_file(&toml_path).unwrap();
        std::fs::remove_file(&yaml_path).unwrap();

        let from_toml = from_toml.unwrap();
        assert_eq!(from_toml.lineup_count, 7);
        assert_eq!(from_toml.stack, 2);
        let from_yaml = from_yaml.unwrap();
        assert_eq!(from_yaml.lineup_count, 9);
        assert_eq!(from_yaml.shape, LineupShape::Showdown);

        assert!(matches!(LineupConfig::load(&toml_path), Err(LineupError::Io(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = LineupConfig::from_toml_str("lineup_cnt = 3").unwrap_err();
        assert!(matches!(err, LineupError::Toml(_)));
    }
}
