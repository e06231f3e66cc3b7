//! Greedy max-min diversification under per-source quotas.
//!
//! [`DiversitySelector`] picks, one record at a time, the eligible
//! candidate farthest from everything already picked:
//! seed → max-min distance → decrement quota → repeat.

use super::config::SelectConfig;
use super::distance::jaccard_distance;
use super::types::SourceRecord;
use crate::error::{LineupError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Distances closer than this count as tied.
const DISTANCE_TOLERANCE: f64 = 1e-9;

/// Selected records plus pairwise-distance diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SelectionResult {
    /// Records in pick order.
    pub selected: Vec<SourceRecord>,
    /// Minimum pairwise distance; NaN with fewer than two records.
    pub min_pairwise: f64,
    /// Average pairwise distance; NaN with fewer than two records.
    pub avg_pairwise: f64,
}

/// Pick count for one entry token or team.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureRow {
    pub key: String,
    pub count: usize,
    /// Percentage of selected records (entries) or of all selected
    /// tokens (teams), rounded to one decimal.
    pub percent: f64,
}

/// Entry and team exposure over a selection, most frequent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exposure {
    pub entries: Vec<ExposureRow>,
    pub teams: Vec<ExposureRow>,
}

/// Quota bookkeeping for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub source: String,
    pub quota: usize,
    pub available: usize,
    pub selected: usize,
}

impl SelectionResult {
    fn from_selected(selected: Vec<SourceRecord>) -> Self {
        let mut min_pairwise = f64::NAN;
        let mut avg_pairwise = f64::NAN;
        if selected.len() >= 2 {
            let mut sum = 0.0;
            let mut pairs = 0usize;
            let mut min = f64::INFINITY;
            for (i, a) in selected.iter().enumerate() {
                for b in &selected[i + 1..] {
                    let d = jaccard_distance(&a.tokens, &b.tokens);
                    min = min.min(d);
                    sum += d;
                    pairs += 1;
                }
            }
            min_pairwise = min;
            avg_pairwise = sum / pairs as f64;
        }
        Self {
            selected,
            min_pairwise,
            avg_pairwise,
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Distance from each selected record to its nearest selected
    /// neighbour. NaN for every record when fewer than two are selected.
    pub fn min_distances(&self) -> Vec<f64> {
        if self.selected.len() < 2 {
            return vec![f64::NAN; self.selected.len()];
        }
        self.selected
            .iter()
            .enumerate()
            .map(|(i, a)| {
                self.selected
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, b)| jaccard_distance(&a.tokens, &b.tokens))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect()
    }

    /// Counts how often each entry token and each team appears.
    ///
    /// Teams are read from the `NAME|TEAM` token form; tokens without a
    /// team part count toward entries only.
    pub fn exposure(&self) -> Exposure {
        let mut entries: BTreeMap<&str, usize> = BTreeMap::new();
        let mut teams: BTreeMap<&str, usize> = BTreeMap::new();
        let mut token_total = 0usize;
        for record in &self.selected {
            for token in &record.tokens {
                token_total += 1;
                *entries.entry(token.as_str()).or_insert(0) += 1;
                if let Some((_, team)) = token.split_once('|') {
                    *teams.entry(team).or_insert(0) += 1;
                }
            }
        }

        let rows = |counts: BTreeMap<&str, usize>, denominator: usize| {
            let mut rows: Vec<ExposureRow> = counts
                .into_iter()
                .map(|(key, count)| ExposureRow {
                    key: key.to_string(),
                    count,
                    percent: round1(100.0 * count as f64 / denominator.max(1) as f64),
                })
                .collect();
            rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
            rows
        };

        Exposure {
            entries: rows(entries, self.selected.len()),
            teams: rows(teams, token_total),
        }
    }

    /// Quota, available and selected counts for every source named by
    /// `quotas`, the candidates or the selection, sorted by source.
    pub fn source_summary(
        &self,
        quotas: &BTreeMap<String, usize>,
        candidates: &[SourceRecord],
    ) -> Vec<SourceSummary> {
        let mut available: BTreeMap<&str, usize> = BTreeMap::new();
        for c in candidates {
            *available.entry(c.source.as_str()).or_insert(0) += 1;
        }
        let mut selected: BTreeMap<&str, usize> = BTreeMap::new();
        for s in &self.selected {
            *selected.entry(s.source.as_str()).or_insert(0) += 1;
        }

        let mut sources: Vec<&str> = quotas.keys().map(String::as_str).collect();
        sources.extend(available.keys());
        sources.extend(selected.keys());
        sources.sort_unstable();
        sources.dedup();

        sources
            .into_iter()
            .map(|source| SourceSummary {
                source: source.to_string(),
                quota: quotas.get(source).copied().unwrap_or(0),
                available: available.get(source).copied().unwrap_or(0),
                selected: selected.get(source).copied().unwrap_or(0),
            })
            .collect()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Quota-aware farthest-first selector.
///
/// A deterministic greedy heuristic, not a global optimum:
///
/// 1. Seed with the candidate farthest on average from the eligible pool.
/// 2. Repeatedly take the candidate whose nearest selected neighbour is
///    farthest away, among sources with quota left.
/// 3. Ties go to the higher score, then to the earlier candidate (or the
///    earlier position in a seeded permutation when `seed` is set).
///
/// # Usage
///
/// ```
/// use u_lineup::diversify::{DiversitySelector, SelectConfig, SourceRecord};
///
/// let candidates = vec![
///     SourceRecord::new("a", 0, 100.0, ["p1|X", "p2|X"]),
///     SourceRecord::new("a", 1, 90.0, ["p1|X", "p3|X"]),
///     SourceRecord::new("b", 0, 80.0, ["q1|Y", "q2|Y"]),
/// ];
/// let config = SelectConfig::default().with_quota("a", 1).with_quota("b", 1);
/// let result = DiversitySelector::select(&candidates, &config).unwrap();
///
/// assert_eq!(result.len(), 2);
/// assert_eq!(result.min_pairwise, 1.0);
/// ```
pub struct DiversitySelector;

impl DiversitySelector {
    /// Runs the selection.
    ///
    /// # Errors
    ///
    /// - [`LineupError::Config`] if `config` is invalid
    /// - [`LineupError::Shortfall`] if a source has fewer candidates than
    ///   its quota and `allow_shortfall` is off; raised before selecting
    pub fn select(candidates: &[SourceRecord], config: &SelectConfig) -> Result<SelectionResult> {
        config.validate()?;
        let start = Instant::now();

        Self::check_shortfall(candidates, config)?;

        let mut remaining: BTreeMap<&str, usize> = config
            .quotas
            .iter()
            .filter(|(_, &q)| q > 0)
            .map(|(s, &q)| (s.as_str(), q))
            .collect();
        let mut pool: Vec<usize> = (0..candidates.len())
            .filter(|&i| remaining.contains_key(candidates[i].source.as_str()))
            .collect();

        info!(
            event = "select_start",
            candidates = candidates.len(),
            eligible = pool.len(),
            quota = config.total_quota(),
            seeded = config.seed.is_some(),
        );

        let order = secondary_order(candidates.len(), config.seed);

        // Average distance to the rest of the eligible pool drives the
        // first pick; afterwards each candidate tracks its distance to the
        // nearest selected record.
        let mut nearest = pool_map(&pool, config.parallel, |i| {
            if pool.len() < 2 {
                return 0.0;
            }
            let sum: f64 = pool
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| jaccard_distance(&candidates[i].tokens, &candidates[j].tokens))
                .sum();
            sum / (pool.len() - 1) as f64
        });

        let mut selected: Vec<SourceRecord> = Vec::new();
        while remaining.values().any(|&q| q > 0) {
            let mut best: Option<usize> = None;
            for (k, &i) in pool.iter().enumerate() {
                if remaining.get(candidates[i].source.as_str()).copied().unwrap_or(0) == 0 {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some(b) => {
                        let (di, db) = (nearest[k], nearest[b]);
                        if (di - db).abs() > DISTANCE_TOLERANCE {
                            di > db
                        } else {
                            let (si, sb) = (candidates[i].score, candidates[pool[b]].score);
                            if (si - sb).abs() > DISTANCE_TOLERANCE {
                                si > sb
                            } else {
                                order[i] < order[pool[b]]
                            }
                        }
                    }
                };
                if better {
                    best = Some(k);
                }
            }

            let Some(k) = best else {
                break;
            };
            let pick = pool.swap_remove(k);
            nearest.swap_remove(k);
            let record = &candidates[pick];
            if let Some(q) = remaining.get_mut(record.source.as_str()) {
                *q -= 1;
            }

            let fresh = pool_map(&pool, config.parallel, |i| {
                jaccard_distance(&candidates[i].tokens, &record.tokens)
            });
            if selected.is_empty() {
                nearest = fresh;
            } else {
                for (n, d) in nearest.iter_mut().zip(fresh) {
                    *n = n.min(d);
                }
            }
            debug!(
                event = "selected",
                n = selected.len() + 1,
                source = %record.source,
                index = record.index,
            );
            selected.push(record.clone());
        }

        let result = SelectionResult::from_selected(selected);
        info!(
            event = "select_end",
            selected = result.len(),
            min_pairwise = result.min_pairwise,
            avg_pairwise = result.avg_pairwise,
            elapsed_ms = start.elapsed().as_millis() as u64,
        );
        Ok(result)
    }

    fn check_shortfall(candidates: &[SourceRecord], config: &SelectConfig) -> Result<()> {
        for (source, &quota) in &config.quotas {
            let available = candidates.iter().filter(|c| c.source == *source).count();
            if available >= quota {
                continue;
            }
            if !config.allow_shortfall {
                return Err(LineupError::Shortfall {
                    source_key: source.clone(),
                    quota,
                    available,
                });
            }
            warn!(event = "shortfall_allowed", source = %source, quota, available);
        }
        Ok(())
    }
}

/// Tie-break rank per candidate: identity without a seed, otherwise the
/// position in a seeded permutation.
fn secondary_order(n: usize, seed: Option<u64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut perm: Vec<usize> = (0..n).collect();
        perm.shuffle(&mut rng);
        for (rank, &i) in perm.iter().enumerate() {
            order[i] = rank;
        }
    }
    order
}

#[cfg(feature = "parallel")]
fn pool_map<F>(pool: &[usize], parallel: bool, f: F) -> Vec<f64>
where
    F: Fn(usize) -> f64 + Sync + Send,
{
    use rayon::prelude::*;
    if parallel {
        pool.par_iter().map(|&i| f(i)).collect()
    } else {
        pool.iter().map(|&i| f(i)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn pool_map<F>(pool: &[usize], _parallel: bool, f: F) -> Vec<f64>
where
    F: Fn(usize) -> f64,
{
    pool.iter().map(|&i| f(i)).collect()
}
