//! Top-N summary of a ranking, shaped for display.

pub mod views;

pub use views::{
    CriteriaComparison, MetricProfile, MetricValue, PodiumEntry, RankedCityView,
    RecommendationReport,
};

use crate::scoring::{
    directives_for_display, normalized_comparison, RankedCity, RankedTable, WeightSpec,
};

pub const DEFAULT_TOP_N: usize = 5;

/// Fewer active criteria than this and the comparison is not worth drawing.
pub const MIN_COMPARISON_CRITERIA: usize = 3;

pub const ECONOMIC_METRICS: [&str; 4] = [
    "Average Monthly Salary",
    "Average Cost of Living",
    "Average Rent Price",
    "Salary_vs_CostLiv_Diff",
];

pub const SAFETY_METRICS: [&str; 3] = ["Crime Index", "Unemployment Rate", "Traffic Index"];

const PODIUM_LABELS: [&str; 3] = ["1st", "2nd", "3rd"];

impl RecommendationReport {
    pub fn build(
        ranked: &RankedTable,
        weights: &WeightSpec,
        top_n: usize,
        group_column: Option<&str>,
    ) -> Self {
        let top_rows = ranked.top(top_n);

        let top = top_rows
            .iter()
            .enumerate()
            .map(|(index, row)| RankedCityView {
                rank: index + 1,
                city: row.city.clone(),
                group: group_column
                    .and_then(|column| row.record.text(column))
                    .map(str::to_string),
                match_pct: row.match_pct,
                metrics: row.record.values.clone(),
            })
            .collect();

        let podium = top_rows
            .iter()
            .zip(PODIUM_LABELS)
            .enumerate()
            .map(|(index, (row, place_label))| PodiumEntry {
                place: index + 1,
                place_label,
                city: row.city.clone(),
                match_pct: row.match_pct,
            })
            .collect();

        let criteria = active_criteria(ranked, weights);
        let comparison = (criteria.len() >= MIN_COMPARISON_CRITERIA).then(|| CriteriaComparison {
            cities: normalized_comparison(top_rows.iter().map(|row| &row.record), &criteria),
            criteria,
        });

        Self {
            candidates: ranked.len(),
            top,
            podium,
            economic_profile: metric_profiles(ranked, top_rows, &ECONOMIC_METRICS),
            safety_indicators: metric_profiles(ranked, top_rows, &SAFETY_METRICS),
            comparison,
        }
    }
}

/// Scorable metrics present in the data with a positive weight, in display order.
pub fn active_criteria(ranked: &RankedTable, weights: &WeightSpec) -> Vec<&'static str> {
    directives_for_display()
        .map(|directive| directive.metric)
        .filter(|metric| ranked.has_column(metric) && weights.get(metric) > 0)
        .collect()
}

fn metric_profiles(
    ranked: &RankedTable,
    rows: &[RankedCity],
    metrics: &[&'static str],
) -> Vec<MetricProfile> {
    let available: Vec<&'static str> = metrics
        .iter()
        .copied()
        .filter(|metric| ranked.has_column(metric))
        .collect();
    if available.is_empty() {
        return Vec::new();
    }

    rows.iter()
        .map(|row| MetricProfile {
            city: row.city.clone(),
            values: available
                .iter()
                .map(|&metric| MetricValue {
                    metric,
                    value: row.record.number(metric),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetSchema, Table};
    use crate::scoring::{recommend, ConstraintSpec, Recommendation};
    use std::io::Cursor;

    const CITIES: &str = "City,Country,Average Monthly Salary,Average Rent Price,Crime Index,Health Care Index\n\
Lisbon,Portugal,1500,1100,30,70\n\
Porto,Portugal,1300,850,28,68\n\
Madrid,Spain,2100,1300,35,78\n\
Berlin,Germany,3500,1250,40,73\n\
Vienna,Austria,3200,950,25,79\n\
Prague,Czechia,1900,800,24,74\n";

    fn ranked(weights: &WeightSpec) -> RankedTable {
        let table = Table::from_reader(Cursor::new(CITIES), &DatasetSchema::default())
            .expect("cities parse");
        match recommend(&table, weights, &ConstraintSpec::new()).expect("scores") {
            Recommendation::Ranked(ranked) => ranked,
            Recommendation::Empty => panic!("expected ranking"),
        }
    }

    #[test]
    fn report_limits_rows_and_builds_podium() {
        let weights = WeightSpec::new().with("Average Monthly Salary", 10);
        let report = RecommendationReport::build(&ranked(&weights), &weights, 5, Some("Country"));

        assert_eq!(report.candidates, 6);
        assert_eq!(report.top.len(), 5);
        assert_eq!(report.top[0].city, "Berlin");
        assert_eq!(report.top[0].group.as_deref(), Some("Germany"));
        assert_eq!(report.top[0].rank, 1);
        assert_eq!(report.podium.len(), 3);
        assert_eq!(report.podium[1].place_label, "2nd");
        assert_eq!(report.podium[1].city, "Vienna");
    }

    #[test]
    fn profiles_list_only_available_metrics() {
        let weights = WeightSpec::new().with("Crime Index", 5);
        let report = RecommendationReport::build(&ranked(&weights), &weights, 2, None);

        let economic: Vec<_> = report.economic_profile[0]
            .values
            .iter()
            .map(|value| value.metric)
            .collect();
        assert_eq!(economic, vec!["Average Monthly Salary", "Average Rent Price"]);
        assert_eq!(report.safety_indicators[0].values.len(), 1);
        assert_eq!(report.safety_indicators.len(), 2);
        assert!(report.top[0].group.is_none());
    }

    #[test]
    fn comparison_requires_three_active_criteria() {
        let weights = WeightSpec::new()
            .with("Average Monthly Salary", 5)
            .with("Crime Index", 5);
        let report = RecommendationReport::build(&ranked(&weights), &weights, 5, None);
        assert!(report.comparison.is_none());

        let weights = weights.with("Health Care Index", 3).with("Population", 8);
        let report = RecommendationReport::build(&ranked(&weights), &weights, 5, None);
        let comparison = report.comparison.expect("comparison present");
        assert_eq!(
            comparison.criteria,
            vec!["Crime Index", "Health Care Index", "Average Monthly Salary"]
        );
        assert_eq!(comparison.cities.len(), 5);
        assert!(comparison
            .cities
            .iter()
            .flat_map(|row| &row.scores)
            .all(|score| score.score.is_some_and(|value| (0.0..=100.0).contains(&value))));
    }

    #[test]
    fn short_rankings_produce_short_podiums() {
        let weights = WeightSpec::new().with("Crime Index", 5);
        let report = RecommendationReport::build(&ranked(&weights), &weights, 2, None);
        assert_eq!(report.podium.len(), 2);
    }
}
