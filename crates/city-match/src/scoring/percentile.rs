//! Percentile ranking shared by the scoring pass and the comparison view.
//!
//! Ties take the average of the 1-based positions they occupy, divided by the
//! number of ranked values: `[5, 5, 9]` ranks `[0.5, 0.5, 1.0]`. Gaps (`None`)
//! are left out of the ranking and stay `None`, so a city with a blank cell
//! neither pushes the others around nor gains credit for that metric.

use super::directive::{polarity_for, Polarity};
use crate::dataset::CityRecord;
use serde::Serialize;

/// Percentile rank of each value among the present values, in `(0, 1]`.
pub fn percentile_ranks(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.map(|value| (index, value)))
        .collect();
    present.sort_by(|left, right| left.1.total_cmp(&right.1));

    let count = present.len() as f64;
    let mut ranks = vec![None; values.len()];
    let mut start = 0;

    while start < present.len() {
        let mut end = start + 1;
        while end < present.len() && present[end].1 == present[start].1 {
            end += 1;
        }

        // positions start+1 ..= end share their mean
        let average_position = (start + 1 + end) as f64 / 2.0;
        for (index, _) in &present[start..end] {
            ranks[*index] = Some(average_position / count);
        }
        start = end;
    }

    ranks
}

/// Percentile ranks oriented so that 1.0 is always the desirable end.
pub fn polarity_ranks(values: &[Option<f64>], polarity: Polarity) -> Vec<Option<f64>> {
    let ranks = percentile_ranks(values);
    match polarity {
        Polarity::HigherIsBetter => ranks,
        Polarity::LowerIsBetter => ranks
            .into_iter()
            .map(|rank| rank.map(|rank| 1.0 - rank))
            .collect(),
    }
}

/// Round half to even at one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// One city's 0-100 scores across the compared metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub city: String,
    pub scores: Vec<MetricScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricScore {
    pub metric: String,
    pub score: Option<f64>,
}

/// Rescale `metrics` to 0-100 among `rows` only.
///
/// Metrics without a known polarity are treated as higher-is-better.
pub fn normalized_comparison<'a, I>(rows: I, metrics: &[&str]) -> Vec<ComparisonRow>
where
    I: IntoIterator<Item = &'a CityRecord>,
{
    let rows: Vec<&CityRecord> = rows.into_iter().collect();

    let per_metric: Vec<Vec<Option<f64>>> = metrics
        .iter()
        .map(|metric| {
            let values: Vec<Option<f64>> = rows.iter().map(|row| row.number(metric)).collect();
            let polarity = polarity_for(metric).unwrap_or(Polarity::HigherIsBetter);
            polarity_ranks(&values, polarity)
                .into_iter()
                .map(|rank| rank.map(|rank| round_to_tenth(rank * 100.0)))
                .collect()
        })
        .collect();

    rows.iter()
        .enumerate()
        .map(|(row_index, row)| ComparisonRow {
            city: row.name.clone(),
            scores: metrics
                .iter()
                .zip(&per_metric)
                .map(|(metric, scores)| MetricScore {
                    metric: metric.to_string(),
                    score: scores[row_index],
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CellValue;
    use std::collections::BTreeMap;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn city(name: &str, metrics: &[(&str, f64)]) -> CityRecord {
        CityRecord {
            name: name.to_string(),
            values: metrics
                .iter()
                .map(|(metric, value)| (metric.to_string(), CellValue::Number(*value)))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn distinct_values_rank_by_position() {
        let ranks = percentile_ranks(&some(&[2000.0, 1000.0, 3000.0]));
        assert_eq!(ranks, vec![Some(2.0 / 3.0), Some(1.0 / 3.0), Some(1.0)]);
    }

    #[test]
    fn ties_share_the_average_rank() {
        let ranks = percentile_ranks(&some(&[5.0, 9.0, 5.0]));
        assert_eq!(ranks, vec![Some(0.5), Some(1.0), Some(0.5)]);

        let ranks = percentile_ranks(&some(&[7.0, 7.0, 7.0, 7.0]));
        assert!(ranks.iter().all(|rank| *rank == Some(0.625)));
    }

    #[test]
    fn gaps_are_excluded_from_the_ranking() {
        let ranks = percentile_ranks(&[Some(10.0), None, Some(20.0)]);
        assert_eq!(ranks, vec![Some(0.5), None, Some(1.0)]);
        assert!(percentile_ranks(&[]).is_empty());
    }

    #[test]
    fn lower_is_better_inverts_ranks() {
        let ranks = polarity_ranks(&some(&[500.0, 800.0, 200.0]), Polarity::LowerIsBetter);
        assert_eq!(ranks[1], Some(0.0));
        assert!(ranks[2] > ranks[0]);
    }

    #[test]
    fn rounding_is_half_even_at_one_decimal() {
        assert_eq!(round_to_tenth(100.0 / 3.0), 33.3);
        assert_eq!(round_to_tenth(200.0 / 3.0), 66.7);
        assert_eq!(round_to_tenth(12.25), 12.2);
        assert_eq!(round_to_tenth(12.75), 12.8);
    }

    #[test]
    fn comparison_is_scoped_to_the_given_rows() {
        let rows = [
            city("Lisbon", &[("Crime Index", 30.0), ("Population", 550_000.0)]),
            city("Madrid", &[("Crime Index", 35.0), ("Population", 3_300_000.0)]),
        ];

        let comparison = normalized_comparison(&rows, &["Crime Index", "Population", "Nightlife"]);

        assert_eq!(comparison.len(), 2);
        assert_eq!(comparison[0].city, "Lisbon");
        assert_eq!(comparison[0].scores[0].score, Some(50.0));
        assert_eq!(comparison[1].scores[0].score, Some(0.0));
        assert_eq!(comparison[1].scores[1].score, Some(100.0));
        assert_eq!(comparison[0].scores[2].score, None);
    }
}
