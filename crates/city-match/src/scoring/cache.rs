use super::preferences::{Bound, ConstraintSpec, WeightSpec};
use super::{recommend, Recommendation, ScoringError};
use crate::dataset::Table;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RequestKey {
    weights: WeightSpec,
    constraints: Vec<(String, Bound, u64)>,
}

impl RequestKey {
    fn new(weights: &WeightSpec, constraints: &ConstraintSpec) -> Self {
        Self {
            weights: weights.clone(),
            constraints: constraints
                .iter()
                .map(|(metric, constraint)| {
                    (
                        metric.to_string(),
                        constraint.bound,
                        constraint.threshold.to_bits(),
                    )
                })
                .collect(),
        }
    }
}

/// Memoizes [`recommend`] for a single shared table.
///
/// Keys are the exact (weights, constraints) pair. Once `capacity` entries are
/// held the least recently used one is evicted; a capacity of 0 turns the
/// cache into a pass-through.
pub struct RecommendationCache {
    table: Arc<Table>,
    entries: Option<Mutex<LruCache<RequestKey, Recommendation>>>,
}

impl RecommendationCache {
    pub fn new(table: Arc<Table>, capacity: usize) -> Self {
        Self {
            table,
            entries: NonZeroUsize::new(capacity).map(|capacity| Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn recommend(
        &self,
        weights: &WeightSpec,
        constraints: &ConstraintSpec,
    ) -> Result<Recommendation, ScoringError> {
        let Some(entries) = &self.entries else {
            return recommend(&self.table, weights, constraints);
        };

        let key = RequestKey::new(weights, constraints);
        if let Some(hit) = entries
            .lock()
            .expect("recommendation cache mutex poisoned")
            .get(&key)
        {
            debug!("recommendation served from cache");
            return Ok(hit.clone());
        }

        // computed outside the lock; concurrent misses may both score
        debug!("recommendation cache miss");
        let recommendation = recommend(&self.table, weights, constraints)?;

        let mut guard = entries.lock().expect("recommendation cache mutex poisoned");
        if guard.len() == guard.cap().get() && !guard.contains(&key) {
            debug!(entries = guard.len(), "evicting least recently used recommendation");
        }
        guard.put(key, recommendation.clone());

        Ok(recommendation)
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| {
            entries
                .lock()
                .expect("recommendation cache mutex poisoned")
                .len()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
