use super::directive::METRIC_DIRECTIVES;
use super::percentile::{polarity_ranks, round_to_tenth};
use super::preferences::{ConstraintSpec, WeightSpec};
use super::{RankedCity, RankedTable, Recommendation, ScoringError};
use crate::dataset::{CityRecord, Table};
use tracing::debug;

/// Filter, score and rank `table` against the user's preferences.
///
/// The table itself is never modified; surviving rows are cloned into the
/// returned [`RankedTable`]. Percentile ranks are computed over the filtered
/// rows, so the same city can score differently under different filters.
pub fn recommend(
    table: &Table,
    weights: &WeightSpec,
    constraints: &ConstraintSpec,
) -> Result<Recommendation, ScoringError> {
    if let Some((metric, weight)) = weights.out_of_range() {
        return Err(ScoringError::InvalidWeight {
            metric: metric.to_string(),
            weight,
        });
    }

    let survivors = apply_constraints(table, constraints);
    debug!(
        total = table.len(),
        remaining = survivors.len(),
        constraints = constraints.len(),
        "constraints applied"
    );

    if survivors.is_empty() {
        return Ok(Recommendation::Empty);
    }

    let scores = accumulate_scores(table, &survivors, weights);
    let total_weight = total_weight(table, weights);

    let mut rows: Vec<RankedCity> = survivors
        .into_iter()
        .zip(scores)
        .map(|(record, score)| {
            let match_pct = if total_weight > 0 {
                round_to_tenth(score / f64::from(total_weight) * 100.0)
            } else {
                0.0
            };
            RankedCity {
                city: record.name.clone(),
                score,
                match_pct,
                record: record.clone(),
            }
        })
        .collect();

    // stable: equal scores keep dataset order
    rows.sort_by(|left, right| right.match_pct.total_cmp(&left.match_pct));

    Ok(Recommendation::Ranked(RankedTable::new(
        table.columns().to_vec(),
        rows,
    )))
}

fn apply_constraints<'a>(table: &'a Table, constraints: &ConstraintSpec) -> Vec<&'a CityRecord> {
    let active: Vec<_> = constraints
        .iter()
        .filter(|(metric, _)| table.has_column(metric))
        .collect();

    table
        .rows()
        .iter()
        .filter(|row| {
            active
                .iter()
                .all(|(metric, constraint)| constraint.admits(row.number(metric)))
        })
        .collect()
}

fn accumulate_scores(table: &Table, rows: &[&CityRecord], weights: &WeightSpec) -> Vec<f64> {
    let mut scores = vec![0.0; rows.len()];

    for directive in METRIC_DIRECTIVES.iter() {
        let weight = weights.get(directive.metric);
        if weight <= 0 || !table.has_column(directive.metric) {
            continue;
        }

        let values: Vec<Option<f64>> = rows.iter().map(|row| row.number(directive.metric)).collect();
        let ranks = polarity_ranks(&values, directive.polarity);
        for (score, rank) in scores.iter_mut().zip(ranks) {
            if let Some(rank) = rank {
                *score += rank * f64::from(weight);
            }
        }
    }

    scores
}

/// Sum of weights whose metric is a column of `table`, scorable or not.
fn total_weight(table: &Table, weights: &WeightSpec) -> i32 {
    weights
        .iter()
        .filter(|(metric, _)| table.has_column(metric))
        .map(|(_, weight)| weight)
        .sum()
}
