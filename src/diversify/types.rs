//! Candidate records and source aggregation.

use crate::model::Lineup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A lineup reduced to its identity tokens, tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Source tag the quota is keyed by.
    pub source: String,
    /// Position of the lineup within its source.
    pub index: usize,
    /// Tie-break score (total projection for lineups).
    pub score: f64,
    /// Canonical `NAME|TEAM` tokens.
    pub tokens: BTreeSet<String>,
}

impl SourceRecord {
    pub fn new<I, T>(source: impl Into<String>, index: usize, score: f64, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            source: source.into(),
            index,
            score,
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a record from an enumerated lineup.
    pub fn from_lineup(source: impl Into<String>, index: usize, lineup: &Lineup) -> Self {
        Self {
            source: source.into(),
            index,
            score: lineup.total_projection,
            tokens: lineup.tokens(),
        }
    }
}

/// Merges the ranked lineups of several sources into one candidate list.
///
/// Records keep their per-source index; the list is stably re-sorted by
/// score, highest first, so ties keep source order and then lineup order.
pub fn aggregate_sources(sources: &[(&str, &[Lineup])]) -> Vec<SourceRecord> {
    let mut records: Vec<SourceRecord> = sources
        .iter()
        .flat_map(|&(source, lineups)| {
            lineups
                .iter()
                .enumerate()
                .map(move |(i, l)| SourceRecord::from_lineup(source, i, l))
        })
        .collect();
    records.sort_by(|a, b| b.score.total_cmp(&a.score));
    records
}
