//! Quota-aware lineup diversification.
//!
//! Consumes lineups already produced by one or more enumeration runs,
//! tagged by source, and picks a bounded subset that is as spread out as
//! possible under per-source quotas.
//!
//! # Key Types
//!
//! - [`SourceRecord`]: a lineup reduced to `NAME|TEAM` tokens plus source
//!   tag and tie-break score
//! - [`SelectConfig`]: quotas, shortfall policy, tie-break seed
//! - [`DiversitySelector`]: greedy farthest-first selection
//! - [`SelectionResult`]: picks plus min/avg pairwise distance, per-record
//!   nearest-neighbour distance, exposure and per-source summary
//!
//! Distance between two records is the Jaccard distance of their token
//! sets ([`jaccard_distance`]).
//!
//! # References
//!
//! - Gonzalez (1985), "Clustering to minimize the maximum intercluster
//!   distance" (farthest-first traversal)

mod config;
mod distance;
mod runner;
mod types;

pub use config::SelectConfig;
pub use distance::jaccard_distance;
pub use runner::{DiversitySelector, Exposure, ExposureRow, SelectionResult, SourceSummary};
pub use types::{aggregate_sources, SourceRecord};
