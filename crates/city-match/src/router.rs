use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::dataset::DatasetSummary;
use crate::error::AppError;
use crate::scoring::{directives_for_display, MetricDirective};
use crate::service::{RecommendationRequest, RecommendationResponse, RecommendationService};

/// Router builder exposing the recommendation endpoints.
pub fn recommendation_router(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler))
        .route("/api/v1/dataset", get(dataset_handler))
        .route("/api/v1/criteria", get(criteria_handler))
        .with_state(service)
}

pub(crate) async fn recommend_handler(
    State(service): State<Arc<RecommendationService>>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let response = service.respond(&request)?;
    Ok(Json(response))
}

pub(crate) async fn dataset_handler(
    State(service): State<Arc<RecommendationService>>,
) -> Json<DatasetSummary> {
    Json(service.dataset_summary())
}

pub(crate) async fn criteria_handler(
    State(service): State<Arc<RecommendationService>>,
) -> Json<Value> {
    let table = service.table();
    let criteria: Vec<Value> = directives_for_display()
        .map(|directive: &MetricDirective| {
            json!({
                "metric": directive.metric,
                "label": directive.label,
                "description": directive.description,
                "polarity": directive.polarity,
                "available": table.has_column(directive.metric),
                "range": table.column_range(directive.metric),
            })
        })
        .collect();

    Json(json!({ "criteria": criteria }))
}
