//! Translation of a pool plus configuration into a binary model.

use super::config::LineupConfig;
use crate::error::{LineupError, Result};
use crate::milp::{BinaryModel, LinearConstraint, Objective, Sense, VarId};
use crate::model::{Entry, LineupShape, Position, OWNERSHIP_EPSILON};
use crate::rules::RuleSet;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// A built model together with the entry-to-variable mapping.
#[derive(Debug, Clone)]
pub struct LineupModel {
    pub model: BinaryModel,
    /// `entry_vars[i]` is the decision variable of `pool[i]`.
    pub entry_vars: Vec<VarId>,
    /// Names of rules encoded as linear constraints.
    pub linearized_rules: Vec<String>,
    /// Names of rules left to post-solve checking.
    pub deferred_rules: Vec<String>,
}

/// Encodes roster, salary, stacking, include/exclude and aggregate
/// bounds as linear constraints over one binary variable per entry.
///
/// The objective maximizes total projection.
pub struct ConstraintBuilder<'a> {
    pool: &'a [Entry],
    config: &'a LineupConfig,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(pool: &'a [Entry], config: &'a LineupConfig) -> Self {
        Self { pool, config }
    }

    /// Validates the inputs and builds the model.
    ///
    /// # Errors
    ///
    /// - [`LineupError::Config`] if the configuration or any entry is invalid,
    ///   or an included player has no entry that can be picked
    /// - [`LineupError::UnknownInclude`] if a required include is not in the pool
    pub fn build(&self, rules: Option<&RuleSet>) -> Result<LineupModel> {
        self.validate()?;

        let mut model = BinaryModel::new(format!("lineup_{:?}", self.config.shape).to_lowercase());
        let vars: Vec<VarId> = self
            .pool
            .iter()
            .enumerate()
            .map(|(i, e)| model.add_var(format!("x{i}_{}", e.name)))
            .collect();

        model.set_objective(Objective::maximize(
            vars.iter().zip(self.pool).map(|(&v, e)| (v, e.projection)).collect(),
        ));

        self.add_roster(&mut model, &vars);
        self.add_salary(&mut model, &vars);
        match self.config.shape {
            LineupShape::Classic => {
                self.add_stack(&mut model, &vars);
                self.add_game_stack(&mut model, &vars);
                self.add_qb_vs_dst(&mut model, &vars);
                self.add_pairings(&mut model, &vars);
            }
            LineupShape::Showdown => self.add_captain_exclusion(&mut model, &vars),
        }
        self.add_includes(&mut model, &vars)?;
        self.add_exclusions(&mut model, &vars);
        self.add_team_minimums(&mut model, &vars);
        self.add_aggregate_bounds(&mut model, &vars);

        let mut linearized_rules = Vec::new();
        let mut deferred_rules = Vec::new();
        for rule in rules.map(|r| r.rules.as_slice()).unwrap_or_default() {
            if rule.linearize(&mut model, self.pool, &vars) {
                linearized_rules.push(rule.name.clone());
            } else {
                deferred_rules.push(rule.name.clone());
            }
        }

        debug!(
            event = "model_built",
            vars = model.var_count(),
            constraints = model.constraint_count(),
            linearized_rules = linearized_rules.len(),
            deferred_rules = deferred_rules.len(),
        );

        Ok(LineupModel {
            model,
            entry_vars: vars,
            linearized_rules,
            deferred_rules,
        })
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()?;
        let mut errors: Vec<String> = self.pool.iter().filter_map(|e| e.validate().err()).collect();
        if self.config.shape == LineupShape::Showdown {
            errors.extend(
                self.pool
                    .iter()
                    .filter(|e| e.slot.is_none())
                    .map(|e| format!("{}: showdown entry has no slot", e.name)),
            );
        }

        let excluded_teams = self.excluded_teams();
        for name in &self.config.included_players {
            let name = name.trim();
            let mut variants = self.pool.iter().filter(|e| e.name == name).peekable();
            if variants.peek().is_none() {
                continue;
            }
            if variants.all(|e| excluded_teams.contains(&e.team) || !self.has_roster_slot(e)) {
                errors.push(format!("included player '{name}' has no pickable entry"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LineupError::Config(errors))
        }
    }

    /// Variables of entries matching `pred`.
    fn vars_where(&self, vars: &[VarId], pred: impl Fn(&Entry) -> bool) -> Vec<VarId> {
        self.pool
            .iter()
            .zip(vars)
            .filter(|(e, _)| pred(*e))
            .map(|(_, &v)| v)
            .collect()
    }

    fn teams(&self) -> BTreeSet<&str> {
        self.pool.iter().map(|e| e.team.as_str()).collect()
    }

    fn excluded_teams(&self) -> BTreeSet<String> {
        self.config
            .excluded_teams
            .iter()
            .map(|t| t.trim().to_ascii_uppercase())
            .collect()
    }

    /// Classic rosters have no slot for anything outside QB/DST/FLEX.
    fn has_roster_slot(&self, e: &Entry) -> bool {
        self.config.shape != LineupShape::Classic
            || e.position.is_flex_eligible()
            || matches!(e.position, Position::QB | Position::DST)
    }

    fn add_roster(&self, model: &mut BinaryModel, vars: &[VarId]) {
        let shape = self.config.shape;
        model.add_constraint(LinearConstraint::sum(
            "roster_size",
            vars,
            Sense::Eq,
            shape.roster_size() as f64,
        ));
        for req in shape.requirements() {
            let xs = self.vars_where(vars, |e| req.group.matches(e));
            let label = req.group.label();
            if req.max == Some(req.min) {
                model.add_constraint(LinearConstraint::sum(
                    format!("roster_{label}"),
                    &xs,
                    Sense::Eq,
                    req.min as f64,
                ));
                continue;
            }
            if req.min > 0 {
                model.add_constraint(LinearConstraint::sum(
                    format!("roster_{label}_min"),
                    &xs,
                    Sense::Ge,
                    req.min as f64,
                ));
            }
            if let Some(max) = req.max {
                model.add_constraint(LinearConstraint::sum(
                    format!("roster_{label}_max"),
                    &xs,
                    Sense::Le,
                    max as f64,
                ));
            }
        }

        for (e, &v) in self.pool.iter().zip(vars) {
            if !self.has_roster_slot(e) {
                model.fix(v, false);
            }
        }
    }

    fn add_salary(&self, model: &mut BinaryModel, vars: &[VarId]) {
        let terms: Vec<(VarId, f64)> = vars
            .iter()
            .zip(self.pool)
            .map(|(&v, e)| (v, e.salary as f64))
            .collect();
        model.add_constraint(LinearConstraint::new(
            "salary_cap",
            terms.clone(),
            Sense::Le,
            self.config.salary_cap as f64,
        ));
        if self.config.min_salary > 0 {
            model.add_constraint(LinearConstraint::new(
                "min_salary",
                terms,
                Sense::Ge,
                self.config.min_salary as f64,
            ));
        }
    }

    /// Captain and flex variants of one player are mutually exclusive.
    fn add_captain_exclusion(&self, model: &mut BinaryModel, vars: &[VarId]) {
        let mut variants: BTreeMap<String, Vec<VarId>> = BTreeMap::new();
        for (e, &v) in self.pool.iter().zip(vars) {
            variants.entry(e.token()).or_default().push(v);
        }
        for (token, xs) in variants {
            if xs.len() > 1 {
                model.add_constraint(LinearConstraint::sum(
                    format!("one_slot_{token}"),
                    &xs,
                    Sense::Le,
                    1.0,
                ));
            }
        }
    }

    /// `Σ pass catchers(T) >= k · Σ QB(T)` for every team with a QB.
    fn add_stack(&self, model: &mut BinaryModel, vars: &[VarId]) {
        let k = self.config.stack;
        if k == 0 {
            return;
        }
        for team in self.teams() {
            let qbs = self.vars_where(vars, |e| e.team == team && e.position == Position::QB);
            if qbs.is_empty() {
                continue;
            }
            let catchers =
                self.vars_where(vars, |e| e.team == team && e.position.is_pass_catcher());
            let mut terms: Vec<(VarId, f64)> = catchers.iter().map(|&v| (v, 1.0)).collect();
            terms.extend(qbs.iter().map(|&v| (v, -(k as f64))));
            model.add_constraint(LinearConstraint::new(
                format!("stack_{team}"),
                terms,
                Sense::Ge,
                0.0,
            ));
        }
    }

    /// At least one game contributes `k` or more entries.
    fn add_game_stack(&self, model: &mut BinaryModel, vars: &[VarId]) {
        let k = self.config.game_stack;
        if k == 0 {
            return;
        }
        let mut games: BTreeMap<String, Vec<VarId>> = BTreeMap::new();
        for (e, &v) in self.pool.iter().zip(vars) {
            games.entry(e.game_key()).or_default().push(v);
        }
        let mut indicators = Vec::with_capacity(games.len());
        for (game, xs) in games {
            let z = model.add_var(format!("game_{game}"));
            let mut terms: Vec<(VarId, f64)> = xs.iter().map(|&v| (v, 1.0)).collect();
            terms.push((z, -(k as f64)));
            model.add_constraint(LinearConstraint::new(
                format!("game_stack_{game}"),
                terms,
                Sense::Ge,
                0.0,
            ));
            indicators.push(z);
        }
        model.add_constraint(LinearConstraint::sum("game_stack_any", &indicators, Sense::Ge, 1.0));
    }

    /// A team's QB and the defense facing that team are never both picked.
    fn add_qb_vs_dst(&self, model: &mut BinaryModel, vars: &[VarId]) {
        if self.config.allow_qb_vs_dst {
            return;
        }
        for team in self.teams() {
            let mut xs = self.vars_where(vars, |e| e.team == team && e.position == Position::QB);
            let dsts =
                self.vars_where(vars, |e| e.position == Position::DST && e.opponent == team);
            if xs.is_empty() || dsts.is_empty() {
                continue;
            }
            xs.extend(dsts);
            model.add_constraint(LinearConstraint::sum(
                format!("qb_vs_dst_{team}"),
                &xs,
                Sense::Le,
                1.0,
            ));
        }
    }

    /// Each `unit` from team T needs a `partner` from T; units of teams
    /// without any partner are forced off.
    fn add_pairings(&self, model: &mut BinaryModel, vars: &[VarId]) {
        for pairing in self.config.effective_pairings() {
            for team in self.teams() {
                let units =
                    self.vars_where(vars, |e| e.team == team && e.position == pairing.unit);
                if units.is_empty() {
                    continue;
                }
                let partners =
                    self.vars_where(vars, |e| e.team == team && e.position == pairing.partner);
                if partners.is_empty() {
                    warn!(
                        event = "pairing_forced_off",
                        team,
                        unit = pairing.unit.as_str(),
                        partner = pairing.partner.as_str(),
                        count = units.len(),
                    );
                    for v in units {
                        model.fix(v, false);
                    }
                    continue;
                }
                for u in units {
                    let mut terms: Vec<(VarId, f64)> = partners.iter().map(|&v| (v, 1.0)).collect();
                    terms.push((u, -1.0));
                    model.add_constraint(LinearConstraint::new(
                        format!("pair_{}_{}_{team}_{}", pairing.unit, pairing.partner, u.index()),
                        terms,
                        Sense::Ge,
                        0.0,
                    ));
                }
            }
        }
    }

    fn add_includes(&self, model: &mut BinaryModel, vars: &[VarId]) -> Result<()> {
        for name in &self.config.included_players {
            let name = name.trim();
            let xs = self.vars_where(vars, |e| e.name == name);
            match xs.as_slice() {
                [] => return Err(LineupError::UnknownInclude(name.to_string())),
                [only] => model.fix(*only, true),
                // Any slot variant satisfies the include.
                _ => model.add_constraint(LinearConstraint::sum(
                    format!("include_{name}"),
                    &xs,
                    Sense::Ge,
                    1.0,
                )),
            }
        }
        Ok(())
    }

    fn add_exclusions(&self, model: &mut BinaryModel, vars: &[VarId]) {
        let teams = self.excluded_teams();
        for (e, &v) in self.pool.iter().zip(vars) {
            if self.config.excluded_players.contains(&e.name) || teams.contains(&e.team) {
                model.fix(v, false);
            }
        }
    }

    fn add_team_minimums(&self, model: &mut BinaryModel, vars: &[VarId]) {
        for (team, &n) in &self.config.min_players_by_team {
            if n == 0 {
                continue;
            }
            let team = team.trim().to_ascii_uppercase();
            let xs = self.vars_where(vars, |e| e.team == team);
            // A team absent from the slate places no requirement.
            if xs.is_empty() {
                debug!(event = "team_minimum_skipped", team = team.as_str(), min = n);
                continue;
            }
            model.add_constraint(LinearConstraint::sum(
                format!("min_team_{team}"),
                &xs,
                Sense::Ge,
                n as f64,
            ));
        }
    }

    fn add_aggregate_bounds(&self, model: &mut BinaryModel, vars: &[VarId]) {
        let config = self.config;
        let cap = config.salary_cap as f64;
        let weighted = |f: &dyn Fn(&Entry) -> f64| -> Vec<(VarId, f64)> {
            vars.iter().zip(self.pool).map(|(&v, e)| (v, f(e))).collect()
        };

        let mut window =
            |label: &str, terms: Vec<(VarId, f64)>, min: Option<f64>, max: Option<f64>| {
                if let Some(lo) = min {
                    model.add_constraint(LinearConstraint::new(
                        format!("min_{label}"),
                        terms.clone(),
                        Sense::Ge,
                        lo,
                    ));
                }
                if let Some(hi) = max {
                    model.add_constraint(LinearConstraint::new(
                        format!("max_{label}"),
                        terms,
                        Sense::Le,
                        hi,
                    ));
                }
            };

        window(
            "sum_projection",
            weighted(&|e| e.projection),
            config.min_sum_projection,
            config.max_sum_projection,
        );
        window(
            "sum_ownership",
            weighted(&|e| e.ownership),
            config.min_sum_ownership,
            config.max_sum_ownership,
        );
        window(
            "weighted_ownership",
            weighted(&|e| (e.salary as f64 / cap) * e.ownership),
            config.min_weighted_ownership,
            config.max_weighted_ownership,
        );

        // ln Π max(own, ε) = Σ ln max(own, ε). A non-positive minimum is
        // always met; a non-positive maximum never is.
        let log_terms = weighted(&|e| e.ownership.max(OWNERSHIP_EPSILON).ln());
        let min_log = config
            .min_product_ownership
            .filter(|&m| m > 0.0)
            .map(f64::ln);
        let never = matches!(config.max_product_ownership, Some(m) if m <= 0.0);
        let max_log = config
            .max_product_ownership
            .filter(|&m| m > 0.0)
            .map(f64::ln);
        window("product_ownership", log_terms, min_log, max_log);
        if never {
            model.add_constraint(LinearConstraint::new(
                "max_product_ownership",
                Vec::new(),
                Sense::Le,
                -1.0,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::{BranchAndBoundSolver, MilpSolver, SolverStatus};
    use crate::model::Slot;
    use crate::rules::{Clause, ForbidCondition, Rule, Selector};

    fn showdown_pool() -> Vec<Entry> {
        let base = [
            ("QB_A", "A", Position::QB, 6000, 20.0),
            ("WR_A", "A", Position::WR, 5000, 15.0),
            ("QB_B", "B", Position::QB, 5800, 18.0),
            ("WR_B", "B", Position::WR, 4800, 12.0),
            ("TE_B", "B", Position::TE, 3000, 8.0),
            ("DST_A", "A", Position::DST, 2500, 6.0),
            ("RB_A", "A", Position::RB, 4000, 10.0),
        ];
        let mut pool = Vec::new();
        for (name, team, pos, salary, proj) in base {
            let opp = if team == "A" { "B" } else { "A" };
            pool.push(
                Entry::new(name, team, opp, pos, salary * 3 / 2, proj * 1.5, 0.1)
                    .with_slot(Slot::Captain),
            );
            pool.push(Entry::new(name, team, opp, pos, salary, proj, 0.1).with_slot(Slot::Flex));
        }
        pool
    }

    fn showdown_config() -> LineupConfig {
        LineupConfig::default()
            .with_shape(LineupShape::Showdown)
            .with_min_salary(0)
    }

    fn solve(model: &LineupModel, pool: &[Entry]) -> Option<Vec<Entry>> {
        let solution = BranchAndBoundSolver::new().solve(&model.model, &Default::default());
        if !solution.is_solution_found() {
            return None;
        }
        Some(
            model
                .entry_vars
                .iter()
                .zip(pool)
                .filter(|&(&v, _)| solution.value(v) == Some(true))
                .map(|(_, e)| e.clone())
                .collect(),
        )
    }

    #[test]
    fn test_showdown_shape_and_exclusion() {
        let pool = showdown_pool();
        let config = showdown_config();
        let built = ConstraintBuilder::new(&pool, &config).build(None).unwrap();
        let entries = solve(&built, &pool).unwrap();

        assert!(LineupShape::Showdown.verify(&entries).is_ok());
        let tokens: BTreeSet<String> = entries.iter().map(|e| e.token()).collect();
        assert_eq!(tokens.len(), 6, "a player appears in both slots");
    }

    #[test]
    fn test_unknown_include_fails_fast() {
        let pool = showdown_pool();
        let config = showdown_config().include_player("Nobody");
        let err = ConstraintBuilder::new(&pool, &config).build(None).unwrap_err();
        assert!(matches!(err, LineupError::UnknownInclude(name) if name == "Nobody"));
    }

    #[test]
    fn test_include_any_variant() {
        let pool = showdown_pool();
        let config = showdown_config().include_player("DST_A");
        let built = ConstraintBuilder::new(&pool, &config).build(None).unwrap();
        let entries = solve(&built, &pool).unwrap();
        assert!(entries.iter().any(|e| e.name == "DST_A"));
    }

    #[test]
    fn test_excluded_team() {
        let pool = showdown_pool();
        let config = showdown_config().exclude_team("b");
        let built = ConstraintBuilder::new(&pool, &config).build(None).unwrap();
        // Team A has only four players: no six-entry lineup remains.
        assert!(solve(&built, &pool).is_none());
    }

    #[test]
    fn test_showdown_entry_without_slot_rejected() {
        let mut pool = showdown_pool();
        pool.push(Entry::new("K_A", "A", "B", Position::K, 4000, 7.0, 0.1));
        let err = ConstraintBuilder::new(&pool, &showdown_config())
            .build(None)
            .unwrap_err();
        assert!(matches!(err, LineupError::Config(_)));
    }

    #[test]
    fn test_forbid_rule_is_linearized() {
        let pool = showdown_pool();
        let config = showdown_config();
        let rules = RuleSet::new(vec![Rule {
            name: "no_cpt_qb_with_dst".into(),
            when: None,
            enforce: vec![Clause::Forbid(ForbidCondition {
                left: Selector::default().with_slot("CPT").with_pos("QB"),
                right: Selector::default().with_kind("DST"),
            })],
        }]);
        let built = ConstraintBuilder::new(&pool, &config).build(Some(&rules)).unwrap();
        assert_eq!(built.linearized_rules, vec!["no_cpt_qb_with_dst"]);
        assert!(built.deferred_rules.is_empty());

        let entries = solve(&built, &pool).unwrap();
        assert!(rules.is_satisfied_by(&entries));
    }

    #[test]
    fn test_zero_max_product_is_infeasible() {
        let pool = showdown_pool();
        let config = showdown_config().with_product_ownership(None, Some(0.0));
        let built = ConstraintBuilder::new(&pool, &config).build(None).unwrap();
        let solution = BranchAndBoundSolver::new().solve(&built.model, &Default::default());
        assert_eq!(solution.status, SolverStatus::Infeasible);
    }

    #[test]
    fn test_min_team_absent_from_pool_is_ignored() {
        let pool = showdown_pool();
        let config = showdown_config().with_min_team("zzz", 2);
        let built = ConstraintBuilder::new(&pool, &config).build(None).unwrap();
        assert!(!built.model.constraints.iter().any(|c| c.name.starts_with("min_team_")));

        let entries = solve(&built, &pool).unwrap();
        assert!(LineupShape::Showdown.verify(&entries).is_ok());
    }

    #[test]
    fn test_min_team_present_in_pool_is_enforced() {
        let pool = showdown_pool();
        let config = showdown_config().with_min_team("b", 3);
        let built = ConstraintBuilder::new(&pool, &config).build(None).unwrap();
        let entries = solve(&built, &pool).unwrap();
        assert_eq!(entries.iter().filter(|e| e.team == "B").count(), 3);
    }

    #[test]
    fn test_include_on_excluded_team_fails_fast() {
        let pool = showdown_pool();
        let config = showdown_config().include_player("QB_B").exclude_team("b");
        let err = ConstraintBuilder::new(&pool, &config).build(None).unwrap_err();
        match err {
            LineupError::Config(errors) => {
                assert!(errors.iter().any(|m| m.contains("QB_B")), "{errors:?}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_include_without_classic_slot_fails_fast() {
        let pool = vec![
            Entry::new("QB_X", "X", "Y", Position::QB, 6000, 20.0, 0.1),
            Entry::new("K_X", "X", "Y", Position::K, 4000, 7.0, 0.1),
        ];
        let config = LineupConfig::default().include_player("K_X");
        let err = ConstraintBuilder::new(&pool, &config).build(None).unwrap_err();
        assert!(matches!(err, LineupError::Config(ref errors) if errors[0].contains("K_X")));

        // The same player on an excluded team is still fine when not included.
        let config = LineupConfig::default().exclude_team("x");
        assert!(ConstraintBuilder::new(&pool, &config).build(None).is_ok());
    }

    #[test]
    fn test_pairing_forces_unit_off() {
        let pool = vec![
            Entry::new("DST_X", "X", "Y", Position::DST, 2000, 5.0, 0.1),
            Entry::new("DST_Y", "Y", "X", Position::DST, 2000, 9.0, 0.1),
            Entry::new("RB_X", "X", "Y", Position::RB, 5000, 12.0, 0.1),
        ];
        let config = LineupConfig::default().with_rb_dst_stack(true);
        let built = ConstraintBuilder::new(&pool, &config).build(None).unwrap();
        // Y has no RB, so DST_Y is pinned off.
        assert_eq!(built.model.vars[1].fixed, Some(false));
        assert_eq!(built.model.vars[0].fixed, None);
    }
}
