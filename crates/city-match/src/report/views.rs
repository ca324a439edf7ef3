use crate::dataset::CellValue;
use crate::scoring::ComparisonRow;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCityView {
    pub rank: usize,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub match_pct: f64,
    pub metrics: BTreeMap<String, CellValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodiumEntry {
    pub place: usize,
    pub place_label: &'static str,
    pub city: String,
    pub match_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub metric: &'static str,
    pub value: Option<f64>,
}

/// Raw values of a themed group of metrics for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricProfile {
    pub city: String,
    pub values: Vec<MetricValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriteriaComparison {
    pub criteria: Vec<&'static str>,
    pub cities: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    /// Cities that passed every filter.
    pub candidates: usize,
    pub top: Vec<RankedCityView>,
    pub podium: Vec<PodiumEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub economic_profile: Vec<MetricProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_indicators: Vec<MetricProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<CriteriaComparison>,
}
