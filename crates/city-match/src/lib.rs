//! City recommendations from preference weights and hard filters.
//!
//! A [`dataset::Table`] of city statistics is filtered by a
//! [`scoring::ConstraintSpec`], scored with weighted percentile ranks from a
//! [`scoring::WeightSpec`], and returned best-first with a 0-100 match
//! percentage. [`report::RecommendationReport`] turns the ranking into the
//! top-N view consumed by the CLI and HTTP surfaces.

pub mod config;
pub mod dataset;
pub mod error;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod telemetry;

pub use dataset::{DataSourceError, DatasetCache, Table};
pub use router::recommendation_router;
pub use scoring::{recommend, ConstraintSpec, Recommendation, ScoringError, WeightSpec};
pub use service::{RecommendationRequest, RecommendationResponse, RecommendationService};
