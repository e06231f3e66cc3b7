//! Post-solve lineup filters.

use super::config::LineupConfig;
use crate::model::Lineup;
use tracing::debug;

/// Lineups that passed every configured filter.
#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    /// Surviving lineups, in input order.
    pub lineups: Vec<Lineup>,
    /// Number of lineups removed.
    pub dropped: usize,
}

/// Applies the per-entry projection floor and the sum/product ownership
/// windows of `config` to already-enumerated lineups.
///
/// Unset bounds are ignored; with nothing configured every lineup passes.
///
/// # Examples
///
/// ```
/// use u_lineup::lineup::{filter_lineups, LineupConfig};
///
/// let config = LineupConfig::default().with_min_player_projection(5.0);
/// let result = filter_lineups(&[], &config);
/// assert!(result.lineups.is_empty());
/// assert_eq!(result.dropped, 0);
/// ```
pub fn filter_lineups(lineups: &[Lineup], config: &LineupConfig) -> FilterResult {
    let within = |value: f64, min: Option<f64>, max: Option<f64>| {
        min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
    };

    let kept: Vec<Lineup> = lineups
        .iter()
        .filter(|l| {
            config
                .min_player_projection
                .map_or(true, |floor| l.entries.iter().all(|e| e.projection >= floor))
        })
        .filter(|l| within(l.sum_ownership, config.min_sum_ownership, config.max_sum_ownership))
        .filter(|l| {
            within(
                l.product_ownership,
                config.min_product_ownership,
                config.max_product_ownership,
            )
        })
        .cloned()
        .collect();

    let dropped = lineups.len() - kept.len();
    debug!(event = "filter", kept = kept.len(), dropped);
    FilterResult {
        lineups: kept,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entry, LineupShape, Position, Slot};

    fn lineup(projections: [f64; 6], ownership: f64) -> Lineup {
        let entries = projections
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let slot = if i == 0 { Slot::Captain } else { Slot::Flex };
                Entry::new(format!("P{i}"), "A", "B", Position::WR, 5000, p, ownership)
                    .with_slot(slot)
            })
            .collect();
        Lineup::new(LineupShape::Showdown, entries, 50_000)
    }

    #[test]
    fn test_no_bounds_keeps_all() {
        let lineups = vec![lineup([1.0; 6], 0.1), lineup([2.0; 6], 0.2)];
        let result = filter_lineups(&lineups, &LineupConfig::default());
        assert_eq!(result.lineups.len(), 2);
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_player_projection_floor() {
        let lineups = vec![
            lineup([10.0, 9.0, 8.0, 7.0, 6.0, 5.0], 0.1),
            lineup([10.0, 9.0, 8.0, 7.0, 6.0, 2.0], 0.1),
        ];
        let config = LineupConfig::default().with_min_player_projection(5.0);
        let result = filter_lineups(&lineups, &config);
        assert_eq!(result.lineups.len(), 1);
        assert_eq!(result.dropped, 1);
        assert_eq!(result.lineups[0], lineups[0]);
    }

    #[test]
    fn test_ownership_windows() {
        // Sums 0.6, 1.2, 1.8.
        let lineups = vec![
            lineup([5.0; 6], 0.1),
            lineup([5.0; 6], 0.2),
            lineup([5.0; 6], 0.3),
        ];
        let config = LineupConfig::default().with_sum_ownership(Some(1.0), Some(1.5));
        let result = filter_lineups(&lineups, &config);
        assert_eq!(result.lineups.len(), 1);
        assert!((result.lineups[0].sum_ownership - 1.2).abs() < 1e-9);

        // Products 1e-6, 6.4e-5, 7.29e-4.
        let config = LineupConfig::default().with_product_ownership(Some(1e-5), None);
        let result = filter_lineups(&lineups, &config);
        assert_eq!(result.lineups.len(), 2);
        assert_eq!(result.dropped, 1);
    }
}
