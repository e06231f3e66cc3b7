mod common;

use common::classic_pool;
use u_lineup::diversify::{aggregate_sources, DiversitySelector, SelectConfig, SourceRecord};
use u_lineup::lineup::{LineupConfig, LineupEnumerator};
use u_lineup::milp::BranchAndBoundSolver;
use u_lineup::LineupError;

fn cluster(source: &str, prefix: &str, n: usize) -> Vec<SourceRecord> {
    (0..n)
        .map(|i| {
            let tokens: Vec<String> = (0..9)
                .map(|k| format!("{prefix}{}|T{prefix}", (i + k) % 12))
                .collect();
            SourceRecord::new(source, i, 100.0 - i as f64, tokens)
        })
        .collect()
}

#[test]
fn one_from_each_disjoint_cluster() {
    let mut candidates = cluster("s1", "a", 4);
    candidates.extend(cluster("s2", "b", 4));
    let config = SelectConfig::default().with_quota("s1", 1).with_quota("s2", 1);
    let result = DiversitySelector::select(&candidates, &config).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.selected.iter().filter(|r| r.source == "s1").count(), 1);
    assert_eq!(result.selected.iter().filter(|r| r.source == "s2").count(), 1);
    assert_eq!(result.min_pairwise, 1.0);
}

#[test]
fn shortfall_fails_before_selection() {
    let candidates = cluster("s1", "a", 2);
    let config = SelectConfig::default().with_quota("s1", 3);
    let err = DiversitySelector::select(&candidates, &config).unwrap_err();
    assert!(matches!(
        err,
        LineupError::Shortfall { quota: 3, available: 2, .. }
    ));

    let result =
        DiversitySelector::select(&candidates, &config.with_allow_shortfall(true)).unwrap();
    assert_eq!(result.len(), 2);
}

#[test]
fn enumerate_then_diversify() {
    let pool = classic_pool();
    let solver = BranchAndBoundSolver::new();
    let base = LineupConfig::default().with_min_salary(43_000).with_lineup_count(12);

    let main = LineupEnumerator::run(&solver, &pool, &base, None).unwrap().lineups;
    let contrarian = LineupEnumerator::run(
        &solver,
        &pool,
        &base.clone().with_sum_ownership(None, Some(1.15)),
        None,
    )
    .unwrap()
    .lineups;
    assert!(!main.is_empty() && !contrarian.is_empty());

    let candidates = aggregate_sources(&[
        ("main", main.as_slice()),
        ("contrarian", contrarian.as_slice()),
    ]);
    assert_eq!(candidates.len(), main.len() + contrarian.len());
    for pair in candidates.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    let config = SelectConfig::default()
        .with_quota("main", 3)
        .with_quota("contrarian", 1)
        .with_seed(7);
    let result = DiversitySelector::select(&candidates, &config).unwrap();

    assert_eq!(result.len(), 4);
    assert_eq!(result.selected.iter().filter(|r| r.source == "main").count(), 3);
    assert!((0.0..=1.0).contains(&result.min_pairwise));
    assert!(result.avg_pairwise >= result.min_pairwise);

    let summary = result.source_summary(&config.quotas, &candidates);
    assert_eq!(summary.len(), 2);
    assert!(summary.iter().all(|s| s.selected == s.quota));

    let exposure = result.exposure();
    let teams: u32 = exposure.teams.iter().map(|t| t.count as u32).sum();
    assert_eq!(teams, 4 * 9);
}
