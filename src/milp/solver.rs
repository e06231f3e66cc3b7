//! Solver interface and a reference branch-and-bound implementation.

use super::model::{BinaryModel, ObjectiveSense, Sense};
use super::variables::VarId;
use std::time::{Duration, Instant};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Time limit reached with a feasible (not proven optimal) incumbent.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Time limit reached before any feasible solution was found.
    Timeout,
}

/// Solution from a solver.
#[derive(Debug, Clone)]
pub struct MilpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value (if a solution was found).
    pub objective_value: Option<f64>,
    /// 0/1 value per variable, indexed by [`VarId`]. Empty without a solution.
    pub assignment: Vec<bool>,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
    /// Search nodes explored. Zero for backends that do not report it.
    pub nodes: u64,
}

impl MilpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            assignment: Vec::new(),
            solve_time_ms: 0,
            nodes: 0,
        }
    }

    /// Whether a feasible solution was found.
    ///
    /// A time-limited incumbent counts: optimality proof is not required.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value of one variable, if the solution assigns it.
    pub fn value(&self, var: VarId) -> Option<bool> {
        self.assignment.get(var.index()).copied()
    }

    /// Variables set to 1.
    pub fn selected(&self) -> Vec<VarId> {
        self.assignment
            .iter()
            .enumerate()
            .filter(|&(_, &x)| x)
            .map(|(i, _)| VarId(i))
            .collect()
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum solve time per call in milliseconds. `None` means unlimited.
    pub time_limit_ms: Option<u64>,
    /// Number of worker threads a backend may use.
    pub num_workers: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: None,
            num_workers: 1,
        }
    }
}

/// Trait for integer-programming backends.
///
/// Implementors provide the actual solving logic. This can wrap an
/// external MILP solver (CBC, HiGHS) or the bundled
/// [`BranchAndBoundSolver`]. Any backend honouring the status contract is
/// interchangeable.
pub trait MilpSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &BinaryModel, config: &SolverConfig) -> MilpSolution;
}

impl<S: MilpSolver + ?Sized> MilpSolver for &S {
    fn solve(&self, model: &BinaryModel, config: &SolverConfig) -> MilpSolution {
        (**self).solve(model, config)
    }
}

/// Depth-first branch and bound over binary variables.
///
/// Each node propagates constraint activity bounds (minimum and maximum
/// achievable left-hand side over unassigned variables) and prunes on an
/// optimistic objective bound. The bound respects unit-coefficient
/// `<=`/`==` rows that nest into a laminar family (roster size, position
/// counts) and relaxes the widest non-negative `<=` row (the salary cap)
/// with a Lagrange multiplier chosen at the root.
///
/// Exact and single-threaded. Classic pools of a few dozen entries per
/// position solve in well under a second per lineup; larger pools should
/// set a time limit or plug in an external backend through [`MilpSolver`].
///
/// `num_workers` is ignored.
#[derive(Debug, Clone, Default)]
pub struct BranchAndBoundSolver {
    /// Feasibility tolerance.
    tolerance: f64,
}

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self { tolerance: 1e-6 }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }
}

impl MilpSolver for BranchAndBoundSolver {
    fn solve(&self, model: &BinaryModel, config: &SolverConfig) -> MilpSolution {
        if model.validate().is_err() {
            return MilpSolution::empty(SolverStatus::ModelInvalid);
        }

        let start_time = Instant::now();
        let deadline = config
            .time_limit_ms
            .map(|ms| start_time + Duration::from_millis(ms));
        let tol = if self.tolerance > 0.0 { self.tolerance } else { 1e-6 };

        let mut search = Search::new(model, tol, deadline);
        search.run();

        let sign = match model.objective.as_ref().map(|o| o.sense) {
            Some(ObjectiveSense::Minimize) => -1.0,
            _ => 1.0,
        };
        let elapsed = start_time.elapsed().as_millis() as u64;
        let nodes = search.nodes;

        match (search.best, search.timed_out) {
            (Some((obj, assignment)), timed_out) => MilpSolution {
                status: if timed_out {
                    SolverStatus::Feasible
                } else {
                    SolverStatus::Optimal
                },
                objective_value: Some(sign * obj),
                assignment,
                solve_time_ms: elapsed,
                nodes,
            },
            (None, true) => MilpSolution {
                solve_time_ms: elapsed,
                nodes,
                ..MilpSolution::empty(SolverStatus::Timeout)
            },
            (None, false) => MilpSolution {
                solve_time_ms: elapsed,
                nodes,
                ..MilpSolution::empty(SolverStatus::Infeasible)
            },
        }
    }
}

/// One relaxation of the budget row: `lambda` and the variables whose
/// reduced objective `coef - lambda * weight` is positive, best first.
struct Multiplier {
    lambda: f64,
    order: Vec<(usize, f64)>,
}

/// Mutable search state for one solve.
struct Search<'a> {
    model: &'a BinaryModel,
    tol: f64,
    deadline: Option<Instant>,
    /// Branching order over variable indices.
    order: Vec<usize>,
    /// Position of each variable in `order`.
    pos: Vec<usize>,
    /// Maximization-normalized objective coefficient per variable.
    coef: Vec<f64>,
    /// Optimistic objective gain from `order[d..]`.
    suffix_bound: Vec<f64>,
    /// (constraint, coefficient) pairs touching each variable.
    rows: Vec<Vec<(usize, f64)>>,
    /// Laminar unit-coefficient rows used by the completion bound.
    laminar: Vec<usize>,
    /// Indices into `laminar` of the rows containing each variable.
    var_laminar: Vec<Vec<usize>>,
    /// Remaining capacity per laminar row, rebuilt at every bound.
    cap: Vec<i64>,
    /// Budget row relaxed by the multipliers.
    budget: Option<usize>,
    multipliers: Vec<Multiplier>,
    fixed_act: Vec<f64>,
    free_min: Vec<f64>,
    free_max: Vec<f64>,
    assignment: Vec<bool>,
    best: Option<(f64, Vec<bool>)>,
    nodes: u64,
    timed_out: bool,
}

impl<'a> Search<'a> {
    fn new(model: &'a BinaryModel, tol: f64, deadline: Option<Instant>) -> Self {
        let n = model.vars.len();

        let mut coef = vec![0.0; n];
        if let Some(obj) = &model.objective {
            let sign = match obj.sense {
                ObjectiveSense::Maximize => 1.0,
                ObjectiveSense::Minimize => -1.0,
            };
            for (v, c) in &obj.terms {
                coef[v.index()] += sign * c;
            }
        }

        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let m = model.constraints.len();
        let mut free_min = vec![0.0; m];
        let mut free_max = vec![0.0; m];
        for (ci, c) in model.constraints.iter().enumerate() {
            for (v, a) in &c.terms {
                rows[v.index()].push((ci, *a));
                free_min[ci] += a.min(0.0);
                free_max[ci] += a.max(0.0);
            }
        }

        // Fixed variables first, then free ones by descending objective.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            let fa = model.vars[a].is_fixed();
            let fb = model.vars[b].is_fixed();
            fb.cmp(&fa)
                .then(coef[b].total_cmp(&coef[a]))
                .then(a.cmp(&b))
        });
        let mut pos = vec![0; n];
        for (d, &i) in order.iter().enumerate() {
            pos[i] = d;
        }

        let mut suffix_bound = vec![0.0; n + 1];
        for d in (0..n).rev() {
            let i = order[d];
            let gain = model.vars[i]
                .domain()
                .iter()
                .map(|&x| if x { coef[i] } else { 0.0 })
                .fold(f64::NEG_INFINITY, f64::max);
            suffix_bound[d] = suffix_bound[d + 1] + gain;
        }

        let (laminar, var_laminar) = laminar_rows(model);
        let mut search = Self {
            model,
            tol,
            deadline,
            order,
            pos,
            coef,
            suffix_bound,
            rows,
            cap: vec![0; laminar.len()],
            laminar,
            var_laminar,
            budget: budget_row(model),
            multipliers: Vec::new(),
            fixed_act: vec![0.0; m],
            free_min,
            free_max,
            assignment: vec![false; n],
            best: None,
            nodes: 0,
            timed_out: false,
        };
        search.multipliers = search.choose_multipliers();
        search
    }

    /// Budget weight of variable `i` (zero without a budget row).
    fn weight(&self, i: usize) -> f64 {
        self.budget.map_or(0.0, |b| {
            self.rows[i]
                .iter()
                .filter(|&&(c, _)| c == b)
                .map(|&(_, a)| a)
                .sum()
        })
    }

    fn multiplier(&self, lambda: f64) -> Multiplier {
        let mut order: Vec<(usize, f64)> = (0..self.model.vars.len())
            .filter(|&i| self.model.vars[i].fixed != Some(false))
            .map(|i| (i, self.coef[i] - lambda * self.weight(i)))
            .filter(|&(_, r)| r > 0.0)
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        Multiplier { lambda, order }
    }

    /// The plain roster bound plus multipliers around the root dual optimum.
    fn choose_multipliers(&mut self) -> Vec<Multiplier> {
        let mut out = vec![self.multiplier(0.0)];
        if self.budget.is_none() {
            return out;
        }
        let hi = (0..self.model.vars.len())
            .filter_map(|i| {
                let w = self.weight(i);
                (w > 0.0 && self.coef[i] > 0.0).then(|| self.coef[i] / w)
            })
            .fold(0.0, f64::max);
        if hi <= 0.0 {
            return out;
        }

        // The dual function is convex in lambda.
        let (mut lo, mut up) = (0.0, hi);
        for _ in 0..40 {
            let m1 = lo + (up - lo) / 3.0;
            let m2 = up - (up - lo) / 3.0;
            if self.root_value(m1) < self.root_value(m2) {
                up = m2;
            } else {
                lo = m1;
            }
        }
        let best = (lo + up) / 2.0;
        for lambda in [best, best * 0.8, best * 1.25] {
            if lambda > 0.0 {
                out.push(self.multiplier(lambda));
            }
        }
        out
    }

    fn root_value(&mut self, lambda: f64) -> f64 {
        let m = self.multiplier(lambda);
        self.relaxed_value(&m, 0)
    }

    /// Lagrangian value of the unassigned variables `order[depth..]`.
    ///
    /// Maximizes the reduced objective under the laminar rows (greedy is
    /// exact there) and adds `lambda` times the remaining budget.
    fn relaxed_value(&mut self, m: &Multiplier, depth: usize) -> f64 {
        for (k, &c) in self.laminar.iter().enumerate() {
            let rhs = self.model.constraints[c].rhs - self.fixed_act[c];
            self.cap[k] = ((rhs + self.tol).floor() as i64).max(0);
        }
        let mut value = match self.budget {
            Some(b) if m.lambda > 0.0 => {
                m.lambda * (self.model.constraints[b].rhs - self.fixed_act[b])
            }
            _ => 0.0,
        };
        for &(i, reduced) in &m.order {
            if self.pos[i] < depth || self.var_laminar[i].iter().any(|&k| self.cap[k] <= 0) {
                continue;
            }
            value += reduced;
            for &k in &self.var_laminar[i] {
                self.cap[k] -= 1;
            }
        }
        value
    }

    /// Upper bound on the objective gain still available at `depth`.
    fn completion_bound(&mut self, depth: usize) -> f64 {
        let mut bound = self.suffix_bound[depth];
        let multipliers = std::mem::take(&mut self.multipliers);
        for m in &multipliers {
            bound = bound.min(self.relaxed_value(m, depth));
        }
        self.multipliers = multipliers;
        bound
    }

    fn run(&mut self) {
        if (0..self.model.constraints.len()).all(|c| self.row_feasible(c)) {
            self.descend(0, 0.0);
        }
    }

    fn row_feasible(&self, c: usize) -> bool {
        let lo = self.fixed_act[c] + self.free_min[c];
        let hi = self.fixed_act[c] + self.free_max[c];
        let rhs = self.model.constraints[c].rhs;
        match self.model.constraints[c].sense {
            Sense::Le => lo <= rhs + self.tol,
            Sense::Ge => hi >= rhs - self.tol,
            Sense::Eq => lo <= rhs + self.tol && hi >= rhs - self.tol,
        }
    }

    fn assign(&mut self, var: usize, value: bool) -> bool {
        self.assignment[var] = value;
        let mut ok = true;
        for k in 0..self.rows[var].len() {
            let (c, a) = self.rows[var][k];
            self.free_min[c] -= a.min(0.0);
            self.free_max[c] -= a.max(0.0);
            if value {
                self.fixed_act[c] += a;
            }
            ok = ok && self.row_feasible(c);
        }
        ok
    }

    fn unassign(&mut self, var: usize, value: bool) {
        for k in 0..self.rows[var].len() {
            let (c, a) = self.rows[var][k];
            self.free_min[c] += a.min(0.0);
            self.free_max[c] += a.max(0.0);
            if value {
                self.fixed_act[c] -= a;
            }
        }
        self.assignment[var] = false;
    }

    fn out_of_time(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        self.nodes += 1;
        if self.nodes % 256 == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.timed_out = true;
                }
            }
        }
        self.timed_out
    }

    fn descend(&mut self, depth: usize, obj: f64) {
        if self.out_of_time() {
            return;
        }
        if let Some(best) = self.best.as_ref().map(|(b, _)| *b) {
            if obj + self.suffix_bound[depth] <= best + self.tol {
                return;
            }
            if depth < self.order.len() && obj + self.completion_bound(depth) <= best + self.tol {
                return;
            }
        }
        if depth == self.order.len() {
            self.best = Some((obj, self.assignment.clone()));
            return;
        }

        let var = self.order[depth];
        let domain = self.model.vars[var].domain();
        let prefer_one = self.coef[var] > 0.0;
        let values: Vec<bool> = if prefer_one {
            domain.iter().rev().copied().collect()
        } else {
            domain.to_vec()
        };

        for value in values {
            let ok = self.assign(var, value);
            if ok {
                let gain = if value { self.coef[var] } else { 0.0 };
                self.descend(depth + 1, obj + gain);
            }
            self.unassign(var, value);
            if self.timed_out {
                return;
            }
        }
    }
}

/// Picks unit-coefficient `<=`/`==` rows that are pairwise nested or
/// disjoint, equality rows and larger rows first.
///
/// Returns the chosen row indices and, per variable, the positions of the
/// chosen rows containing it.
fn laminar_rows(model: &BinaryModel) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut candidates: Vec<(usize, Vec<usize>)> = model
        .constraints
        .iter()
        .enumerate()
        .filter(|(_, c)| c.sense != Sense::Ge && !c.terms.is_empty())
        .filter(|(_, c)| c.terms.iter().all(|&(_, a)| a == 1.0))
        .filter_map(|(ci, c)| {
            let mut vars: Vec<usize> = c.terms.iter().map(|(v, _)| v.index()).collect();
            vars.sort_unstable();
            vars.dedup();
            (vars.len() == c.terms.len()).then_some((ci, vars))
        })
        .collect();
    candidates.sort_by(|(a, va), (b, vb)| {
        let ea = model.constraints[*a].sense == Sense::Eq;
        let eb = model.constraints[*b].sense == Sense::Eq;
        eb.cmp(&ea).then(vb.len().cmp(&va.len())).then(a.cmp(b))
    });

    let mut laminar = Vec::new();
    let mut var_laminar: Vec<Vec<usize>> = vec![Vec::new(); model.vars.len()];
    let mut overlap: Vec<usize> = Vec::new();
    for (ci, vars) in candidates {
        overlap.clear();
        overlap.resize(laminar.len(), 0);
        for &v in &vars {
            for &k in &var_laminar[v] {
                overlap[k] += 1;
            }
        }
        // Accepted rows are never smaller, so a partial overlap means crossing.
        if overlap.iter().any(|&o| o > 0 && o != vars.len()) {
            continue;
        }
        let k = laminar.len();
        laminar.push(ci);
        for &v in &vars {
            var_laminar[v].push(k);
        }
    }
    (laminar, var_laminar)
}

/// The widest `<=` row with non-negative, not all unit coefficients.
fn budget_row(model: &BinaryModel) -> Option<usize> {
    model
        .constraints
        .iter()
        .enumerate()
        .filter(|(_, c)| c.sense == Sense::Le && c.terms.len() > 1)
        .filter(|(_, c)| c.terms.iter().all(|&(_, a)| a >= 0.0))
        .filter(|(_, c)| c.terms.iter().any(|&(_, a)| a != 1.0))
        .fold(None, |best: Option<(usize, usize)>, (ci, c)| match best {
            Some((_, len)) if len >= c.terms.len() => best,
            _ => Some((ci, c.terms.len())),
        })
        .map(|(ci, _)| ci)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::{LinearConstraint, Objective};

    fn knapsack() -> BinaryModel {
        // weights 3, 4, 5, 6; values 4, 5, 6, 7; capacity 10
        let mut model = BinaryModel::new("knapsack");
        let vars: Vec<VarId> = (0..4).map(|i| model.add_var(format!("x{i}"))).collect();
        let weights = [3.0, 4.0, 5.0, 6.0];
        let values = [4.0, 5.0, 6.0, 7.0];
        model.add_constraint(LinearConstraint::new(
            "capacity",
            vars.iter().zip(weights).map(|(&v, w)| (v, w)).collect(),
            Sense::Le,
            10.0,
        ));
        model.set_objective(Objective::maximize(
            vars.iter().zip(values).map(|(&v, c)| (v, c)).collect(),
        ));
        model
    }

    #[test]
    fn test_knapsack_optimal() {
        let model = knapsack();
        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());

        assert_eq!(solution.status, SolverStatus::Optimal);
        // Best is items 0 + 3 (weight 9, value 11) or 1 + 3 (weight 10, value 12).
        assert_eq!(solution.objective_value, Some(12.0));
        assert_eq!(solution.selected(), vec![VarId(1), VarId(3)]);
        assert!(model.is_feasible(&solution.assignment, 1e-9));
    }

    #[test]
    fn test_infeasible() {
        let mut model = BinaryModel::new("infeasible");
        let a = model.add_var("a");
        let b = model.add_var("b");
        model.add_constraint(LinearConstraint::sum("three", &[a, b], Sense::Ge, 3.0));

        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(!solution.is_solution_found());
        assert!(solution.assignment.is_empty());
    }

    #[test]
    fn test_fixed_variables_respected() {
        let mut model = knapsack();
        model.fix(VarId(3), false);
        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());

        assert_eq!(solution.value(VarId(3)), Some(false));
        // Without item 3 the best pair is 1 + 2 (weight 9, value 11).
        assert_eq!(solution.objective_value, Some(11.0));
    }

    #[test]
    fn test_no_good_enumerates_next_best() {
        let mut model = knapsack();
        let solver = BranchAndBoundSolver::new();
        let first = solver.solve(&model, &SolverConfig::default());
        model.add_no_good(&first.selected());
        let second = solver.solve(&model, &SolverConfig::default());

        assert!(second.is_solution_found());
        assert_ne!(first.selected(), second.selected());
        assert!(second.objective_value <= first.objective_value);
    }

    #[test]
    fn test_minimize() {
        let mut model = BinaryModel::new("min");
        let a = model.add_var("a");
        let b = model.add_var("b");
        model.add_constraint(LinearConstraint::sum("one", &[a, b], Sense::Eq, 1.0));
        model.set_objective(Objective::minimize(vec![(a, 5.0), (b, 2.0)]));

        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.objective_value, Some(2.0));
        assert_eq!(solution.value(b), Some(true));
    }

    #[test]
    fn test_invalid_model() {
        let mut model = BinaryModel::new("bad");
        model.add_constraint(LinearConstraint::sum("x", &[VarId(7)], Sense::Le, 1.0));
        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::ModelInvalid);
    }

    #[test]
    fn test_tolerance_admits_near_feasible() {
        let mut model = BinaryModel::new("tolerance");
        let a = model.add_var("a");
        model.add_constraint(LinearConstraint::new("le", vec![(a, 1.0005)], Sense::Le, 1.0));
        model.set_objective(Objective::maximize(vec![(a, 1.0)]));

        let strict = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(strict.value(a), Some(false));

        let loose = BranchAndBoundSolver::new()
            .with_tolerance(-1e-3)
            .solve(&model, &SolverConfig::default());
        assert_eq!(loose.value(a), Some(true));
        assert_eq!(loose.objective_value, Some(1.0));
    }

    #[test]
    fn test_roster_bound_prunes_large_pool() {
        // 200 candidates, pick 9, at most one of the first six.
        let mut model = BinaryModel::new("roster");
        let vars: Vec<VarId> = (0..200).map(|i| model.add_var(format!("x{i}"))).collect();
        model.add_constraint(LinearConstraint::sum("size", &vars, Sense::Eq, 9.0));
        model.add_constraint(LinearConstraint::sum("group", &vars[..6], Sense::Eq, 1.0));
        model.set_objective(Objective::maximize(
            vars.iter().enumerate().map(|(i, &v)| (v, 1000.0 - i as f64)).collect(),
        ));

        let config = SolverConfig {
            time_limit_ms: Some(30_000),
            ..SolverConfig::default()
        };
        let solution = BranchAndBoundSolver::new().solve(&model, &config);

        assert_eq!(solution.status, SolverStatus::Optimal);
        let expected: f64 = 1000.0 + (6..14).map(|i| 1000.0 - i as f64).sum::<f64>();
        assert_eq!(solution.objective_value, Some(expected));
        assert!(solution.nodes < 1_000, "explored {} nodes", solution.nodes);
    }

    #[test]
    fn test_budget_bound_matches_exhaustive_search() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let n = 24;
        let values: Vec<f64> = (0..n).map(|_| rng.random_range(1.0..30.0)).collect();
        let weights: Vec<f64> = (0..n)
            .map(|_| f64::from(rng.random_range(30..90_u32)) * 100.0)
            .collect();
        let cap = 20_000.0;

        let mut model = BinaryModel::new("budget");
        let vars: Vec<VarId> = (0..n).map(|i| model.add_var(format!("x{i}"))).collect();
        model.add_constraint(LinearConstraint::sum("size", &vars, Sense::Eq, 4.0));
        model.add_constraint(LinearConstraint::new(
            "cap",
            vars.iter().zip(&weights).map(|(&v, &w)| (v, w)).collect(),
            Sense::Le,
            cap,
        ));
        model.set_objective(Objective::maximize(
            vars.iter().zip(&values).map(|(&v, &c)| (v, c)).collect(),
        ));

        let mut best = f64::NEG_INFINITY;
        for a in 0..n {
            for b in a + 1..n {
                for c in b + 1..n {
                    for d in c + 1..n {
                        let pick = [a, b, c, d];
                        if pick.iter().map(|&i| weights[i]).sum::<f64>() <= cap {
                            best = best.max(pick.iter().map(|&i| values[i]).sum());
                        }
                    }
                }
            }
        }

        let solution = BranchAndBoundSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Optimal);
        let found = solution.objective_value.unwrap();
        assert!((found - best).abs() < 1e-6, "found {found}, exhaustive {best}");
        assert!(model.is_feasible(&solution.assignment, 1e-9));
    }

    #[test]
    fn test_solver_config_default() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_ms, None);
        assert_eq!(config.num_workers, 1);
    }
}
