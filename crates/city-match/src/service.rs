use crate::config::RecommendationConfig;
use crate::dataset::{DatasetSummary, Table};
use crate::report::RecommendationReport;
use crate::scoring::{
    ConstraintSpec, Recommendation, RecommendationCache, ScoringError, WeightSpec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub const NO_MATCH_MESSAGE: &str =
    "No city satisfies your filters. Try relaxing some constraints or weights.";

/// Preferences submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub weights: WeightSpec,
    #[serde(default)]
    pub constraints: ConstraintSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationResponse {
    Matched { report: RecommendationReport },
    NoMatch { message: &'static str },
}

/// Stateless recommendation front door over one shared, read-only table.
pub struct RecommendationService {
    cache: RecommendationCache,
    top_n: usize,
    group_column: Option<String>,
}

impl RecommendationService {
    pub fn new(
        table: Arc<Table>,
        config: &RecommendationConfig,
        group_column: Option<String>,
    ) -> Self {
        Self {
            cache: RecommendationCache::new(table, config.cache_capacity),
            top_n: config.top_n,
            group_column,
        }
    }

    pub fn table(&self) -> &Table {
        self.cache.table()
    }

    pub fn default_top_n(&self) -> usize {
        self.top_n
    }

    pub fn group_column(&self) -> Option<&str> {
        self.group_column.as_deref()
    }

    pub fn recommend(
        &self,
        weights: &WeightSpec,
        constraints: &ConstraintSpec,
    ) -> Result<Recommendation, ScoringError> {
        self.cache.recommend(weights, constraints)
    }

    pub fn respond(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, ScoringError> {
        let top_n = request
            .top_n
            .filter(|top_n| *top_n > 0)
            .unwrap_or(self.top_n);

        match self.recommend(&request.weights, &request.constraints)? {
            Recommendation::Ranked(ranked) => {
                let report = RecommendationReport::build(
                    &ranked,
                    &request.weights,
                    top_n,
                    self.group_column(),
                );
                info!(
                    candidates = report.candidates,
                    best = report.top.first().map(|city| city.city.as_str()),
                    "recommendation computed"
                );
                Ok(RecommendationResponse::Matched { report })
            }
            Recommendation::Empty => {
                info!(
                    constraints = request.constraints.len(),
                    "no city satisfies the filters"
                );
                Ok(RecommendationResponse::NoMatch {
                    message: NO_MATCH_MESSAGE,
                })
            }
        }
    }

    pub fn dataset_summary(&self) -> DatasetSummary {
        self.table().summary(self.group_column())
    }
}
