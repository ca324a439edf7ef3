//! Preference-weighted percentile ranking of cities.

mod cache;
pub mod directive;
mod engine;
pub mod percentile;
mod preferences;

pub use cache::RecommendationCache;
pub use directive::{
    directive_for, directives_for_display, polarity_for, MetricDirective, Polarity,
    DISPLAY_ORDER, METRIC_DIRECTIVES,
};
pub use engine::recommend;
pub use percentile::{
    normalized_comparison, percentile_ranks, polarity_ranks, ComparisonRow, MetricScore,
};
pub use preferences::{Bound, Constraint, ConstraintSpec, WeightSpec, MAX_WEIGHT, MIN_WEIGHT};

use crate::dataset::CityRecord;
use serde::Serialize;

/// Outcome of a recommendation run.
///
/// `Empty` is a valid answer meaning no city passed the filters; it is not an
/// error and is kept apart from a ranking that happens to have no rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Ranked(RankedTable),
    Empty,
}

impl Recommendation {
    pub fn ranked(&self) -> Option<&RankedTable> {
        match self {
            Recommendation::Ranked(table) => Some(table),
            Recommendation::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Recommendation::Empty)
    }
}

/// A scored copy of one dataset row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCity {
    pub city: String,
    pub score: f64,
    pub match_pct: f64,
    pub record: CityRecord,
}

/// Filtered rows sorted by match percentage, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTable {
    columns: Vec<String>,
    rows: Vec<RankedCity>,
}

impl RankedTable {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<RankedCity>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|candidate| candidate == column)
    }

    pub fn rows(&self) -> &[RankedCity] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedCity> {
        self.rows.iter()
    }

    /// The first `n` rows, or all of them when fewer exist.
    pub fn top(&self, n: usize) -> &[RankedCity] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<RankedCity> {
        self.rows
    }
}

/// Error raised by the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("weight {weight} for '{metric}' is outside 0..=10")]
    InvalidWeight { metric: String, weight: i32 },
}
