use city_match::config::{AppConfig, DatasetConfig};
use city_match::dataset::DatasetCache;
use city_match::error::AppError;
use city_match::scoring::{Constraint, ConstraintSpec, WeightSpec};
use city_match::RecommendationService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn dataset_cache(config: &DatasetConfig, override_path: Option<PathBuf>) -> DatasetCache {
    let path = override_path.unwrap_or_else(|| config.path.clone());
    DatasetCache::new(path, config.schema())
}

pub(crate) fn build_service(
    config: &AppConfig,
    cache: &DatasetCache,
) -> Result<RecommendationService, AppError> {
    let table = cache.load()?;
    Ok(RecommendationService::new(
        table,
        &config.recommendation,
        config.dataset.group_column.clone(),
    ))
}

/// Parses `Metric Name=value`, splitting on the last `=`.
fn split_assignment(raw: &str) -> Result<(String, &str), String> {
    let (metric, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected METRIC=VALUE, got '{raw}'"))?;
    let metric = metric.trim();
    if metric.is_empty() {
        return Err(format!("missing metric name in '{raw}'"));
    }
    Ok((metric.to_string(), value.trim()))
}

pub(crate) fn parse_weight(raw: &str) -> Result<(String, i32), String> {
    let (metric, value) = split_assignment(raw)?;
    let weight = value
        .parse::<i32>()
        .map_err(|err| format!("weight for '{metric}' must be an integer ({err})"))?;
    Ok((metric, weight))
}

pub(crate) fn parse_threshold(raw: &str) -> Result<(String, f64), String> {
    let (metric, value) = split_assignment(raw)?;
    let threshold = value
        .parse::<f64>()
        .ok()
        .filter(|threshold| threshold.is_finite())
        .ok_or_else(|| format!("threshold for '{metric}' must be a finite number"))?;
    Ok((metric, threshold))
}

pub(crate) fn weight_spec(weights: Vec<(String, i32)>) -> WeightSpec {
    weights.into_iter().collect()
}

/// Later flags win when a metric is constrained twice.
pub(crate) fn constraint_spec(max: Vec<(String, f64)>, min: Vec<(String, f64)>) -> ConstraintSpec {
    max.into_iter()
        .map(|(metric, threshold)| (metric, Constraint::max(threshold)))
        .chain(
            min.into_iter()
                .map(|(metric, threshold)| (metric, Constraint::min(threshold))),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_match::scoring::Bound;

    #[test]
    fn parse_weight_accepts_metric_names_with_spaces() {
        assert_eq!(
            parse_weight("Days of very strong heat stress = 7"),
            Ok(("Days of very strong heat stress".to_string(), 7))
        );
    }

    #[test]
    fn parse_weight_rejects_fractions_and_missing_names() {
        assert!(parse_weight("Crime Index=2.5").is_err());
        assert!(parse_weight("=4").is_err());
        assert!(parse_weight("Crime Index").is_err());
    }

    #[test]
    fn parse_threshold_rejects_non_finite_values() {
        assert_eq!(
            parse_threshold("Average Rent Price=1200.5"),
            Ok(("Average Rent Price".to_string(), 1200.5))
        );
        assert!(parse_threshold("Average Rent Price=NaN").is_err());
    }

    #[test]
    fn constraint_spec_combines_bounds() {
        let spec = constraint_spec(
            vec![("Average Rent Price".to_string(), 1200.0)],
            vec![("Health Care Index".to_string(), 60.0)],
        );
        assert_eq!(spec.len(), 2);
        assert_eq!(
            spec.get("Average Rent Price").map(|constraint| constraint.bound),
            Some(Bound::Max)
        );
        assert_eq!(
            spec.get("Health Care Index").map(|constraint| constraint.bound),
            Some(Bound::Min)
        );
    }
}
