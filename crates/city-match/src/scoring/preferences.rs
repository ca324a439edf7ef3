use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_WEIGHT: i32 = 0;
pub const MAX_WEIGHT: i32 = 10;

/// Importance the user assigns to each metric, 0 (ignored) to 10.
///
/// Metrics that are not listed weigh 0. Values are accepted as given and only
/// range-checked when the engine runs, so callers can build a spec from raw
/// input and let [`super::recommend`] reject it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightSpec(BTreeMap<String, i32>);

impl WeightSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, metric: impl Into<String>, weight: i32) -> Self {
        self.set(metric, weight);
        self
    }

    pub fn set(&mut self, metric: impl Into<String>, weight: i32) {
        self.0.insert(metric.into(), weight);
    }

    pub fn get(&self, metric: &str) -> i32 {
        self.0.get(metric).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(metric, weight)| (metric.as_str(), *weight))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First entry outside `MIN_WEIGHT..=MAX_WEIGHT`, if any.
    pub fn out_of_range(&self) -> Option<(&str, i32)> {
        self.iter()
            .find(|(_, weight)| !(MIN_WEIGHT..=MAX_WEIGHT).contains(weight))
    }
}

impl<K: Into<String>> FromIterator<(K, i32)> for WeightSpec {
    fn from_iter<I: IntoIterator<Item = (K, i32)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(metric, weight)| (metric.into(), weight))
                .collect(),
        )
    }
}

/// Direction of a hard filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    /// Keep rows whose value is at most the threshold.
    #[serde(alias = "maximum")]
    Max,
    /// Keep rows whose value is at least the threshold.
    #[serde(alias = "minimum")]
    Min,
}

impl Bound {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Max => "Maximum",
            Self::Min => "Minimum",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Max => "<=",
            Self::Min => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub bound: Bound,
    pub threshold: f64,
}

impl Constraint {
    pub fn max(threshold: f64) -> Self {
        Self {
            bound: Bound::Max,
            threshold,
        }
    }

    pub fn min(threshold: f64) -> Self {
        Self {
            bound: Bound::Min,
            threshold,
        }
    }

    /// Non-numeric cells never satisfy a constraint.
    pub fn admits(&self, value: Option<f64>) -> bool {
        match (self.bound, value) {
            (Bound::Max, Some(value)) => value <= self.threshold,
            (Bound::Min, Some(value)) => value >= self.threshold,
            (_, None) => false,
        }
    }
}

/// Hard filters keyed by metric; every entry must hold for a row to survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSpec(BTreeMap<String, Constraint>);

impl ConstraintSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, metric: impl Into<String>, constraint: Constraint) -> Self {
        self.set(metric, constraint);
        self
    }

    pub fn set(&mut self, metric: impl Into<String>, constraint: Constraint) {
        self.0.insert(metric.into(), constraint);
    }

    pub fn get(&self, metric: &str) -> Option<&Constraint> {
        self.0.get(metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.0
            .iter()
            .map(|(metric, constraint)| (metric.as_str(), constraint))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>> FromIterator<(K, Constraint)> for ConstraintSpec {
    fn from_iter<I: IntoIterator<Item = (K, Constraint)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(metric, constraint)| (metric.into(), constraint))
                .collect(),
        )
    }
}
