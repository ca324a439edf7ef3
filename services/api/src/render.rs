use crate::infra::{build_service, constraint_spec, dataset_cache, parse_threshold, parse_weight, weight_spec};
use city_match::config::AppConfig;
use city_match::error::AppError;
use city_match::report::{MetricProfile, RecommendationReport};
use city_match::scoring::directives_for_display;
use city_match::telemetry::{self, LogTarget};
use city_match::{RecommendationRequest, RecommendationResponse};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct RecommendArgs {
    /// Weight for a metric, 0-10 (repeatable), e.g. --weight "Crime Index=7"
    #[arg(long = "weight", value_name = "METRIC=WEIGHT", value_parser = parse_weight)]
    pub(crate) weights: Vec<(String, i32)>,
    /// Keep cities at or below a threshold (repeatable)
    #[arg(long, value_name = "METRIC=VALUE", value_parser = parse_threshold)]
    pub(crate) max: Vec<(String, f64)>,
    /// Keep cities at or above a threshold (repeatable)
    #[arg(long, value_name = "METRIC=VALUE", value_parser = parse_threshold)]
    pub(crate) min: Vec<(String, f64)>,
    /// Number of cities to show (defaults to APP_TOP_N)
    #[arg(long)]
    pub(crate) top: Option<usize>,
    /// Print the response as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Override the configured dataset CSV
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DatasetArgs {
    /// Override the configured dataset CSV
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        weights,
        max,
        min,
        top,
        json,
        dataset,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogTarget::Stderr)?;

    let cache = dataset_cache(&config.dataset, dataset);
    let service = build_service(&config, &cache)?;

    let request = RecommendationRequest {
        weights: weight_spec(weights),
        constraints: constraint_spec(max, min),
        top_n: top,
    };
    let response = service.respond(&request)?;

    if json {
        println!("{}", render_json(&response));
    } else {
        print!("{}", render_response(&response));
    }

    Ok(())
}

pub(crate) fn run_dataset_summary(args: DatasetArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogTarget::Stderr)?;

    let cache = dataset_cache(&config.dataset, args.dataset);
    let service = build_service(&config, &cache)?;
    let summary = service.dataset_summary();

    println!("Dataset {}", cache.path().display());
    println!("- Number of cities: {}", summary.cities);
    match summary.groups {
        Some(groups) => println!("- Number of countries: {groups}"),
        None => println!("- Number of countries: N/A"),
    }
    println!("- Columns available: {}", summary.columns);
    if !summary.metric_ranges.is_empty() {
        println!("Numeric ranges:");
        for range in &summary.metric_ranges {
            println!("  - {}: {} to {}", range.metric, range.min, range.max);
        }
    }

    Ok(())
}

pub(crate) fn run_criteria() {
    println!("Scorable criteria (weights 0-10)");
    for directive in directives_for_display() {
        println!(
            "- {} [{}] ({})",
            directive.label,
            directive.metric,
            directive.polarity.label()
        );
        println!("    {}", directive.description);
    }
}

fn render_json(response: &RecommendationResponse) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

pub(crate) fn render_response(response: &RecommendationResponse) -> String {
    match response {
        RecommendationResponse::Matched { report } => render_report(report),
        RecommendationResponse::NoMatch { message } => format!("{message}\n"),
    }
}

fn render_report(report: &RecommendationReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Top {} of {} matching cities\n",
        report.top.len(),
        report.candidates
    ));
    for city in &report.top {
        let group = city
            .group
            .as_deref()
            .map(|group| format!(" ({group})"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:>2}. {}{} - {:.1}%\n",
            city.rank, city.city, group, city.match_pct
        ));
    }

    out.push_str("\nPodium\n");
    for entry in &report.podium {
        out.push_str(&format!(
            "- {}: {} ({:.1}%)\n",
            entry.place_label, entry.city, entry.match_pct
        ));
    }

    render_profiles(&mut out, "Economic profile", &report.economic_profile);
    render_profiles(&mut out, "Safety and mobility indicators", &report.safety_indicators);

    if let Some(comparison) = &report.comparison {
        out.push_str("\nNormalized comparison across active criteria (0-100%)\n");
        for row in &comparison.cities {
            let scores = row
                .scores
                .iter()
                .map(|score| format!("{} {}", score.metric, format_score(score.score)))
                .collect::<Vec<_>>()
                .join(" | ");
            out.push_str(&format!("- {}: {}\n", row.city, scores));
        }
    }

    out
}

fn render_profiles(out: &mut String, title: &str, profiles: &[MetricProfile]) {
    if profiles.is_empty() {
        return;
    }

    out.push_str(&format!("\n{title}\n"));
    for profile in profiles {
        let values = profile
            .values
            .iter()
            .map(|value| format!("{} {}", value.metric, format_value(value.value)))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&format!("- {}: {}\n", profile.city, values));
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(number) if number.fract() == 0.0 => format!("{number:.0}"),
        Some(number) => format!("{number:.2}"),
        None => "n/a".to_string(),
    }
}

fn format_score(score: Option<f64>) -> String {
    score
        .map(|score| format!("{score:.1}%"))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_match::config::RecommendationConfig;
    use city_match::dataset::{DatasetSchema, Table};
    use city_match::scoring::{Constraint, ConstraintSpec, WeightSpec};
    use city_match::RecommendationService;
    use std::io::Cursor;
    use std::sync::Arc;

    fn service() -> RecommendationService {
        let csv = "City,Country,Average Monthly Salary,Average Rent Price,Crime Index,Health Care Index\n\
Lisbon,Portugal,1500,1100,30,70\n\
Vienna,Austria,3200,950,25,79\n\
Prague,Czechia,1900,800,24,74\n";
        let table = Table::from_reader(Cursor::new(csv), &DatasetSchema::default()).expect("table");
        RecommendationService::new(
            Arc::new(table),
            &RecommendationConfig {
                top_n: 5,
                cache_capacity: 0,
            },
            Some("Country".to_string()),
        )
    }

    #[test]
    fn text_report_lists_ranking_and_sections() {
        let request = RecommendationRequest {
            weights: WeightSpec::new()
                .with("Average Monthly Salary", 6)
                .with("Crime Index", 4)
                .with("Health Care Index", 2),
            ..RecommendationRequest::default()
        };
        let response = service().respond(&request).expect("responds");
        let text = render_response(&response);

        assert!(text.starts_with("Top 3 of 3 matching cities"));
        assert!(text.contains(" 1. Vienna (Austria)"));
        assert!(text.contains("- 1st: Vienna"));
        assert!(text.contains("Economic profile"));
        assert!(text.contains("Average Rent Price 950"));
        assert!(text.contains("Safety and mobility indicators"));
        assert!(text.contains("Normalized comparison"));
    }

    #[test]
    fn no_match_prints_the_hint() {
        let request = RecommendationRequest {
            constraints: ConstraintSpec::new().with("Crime Index", Constraint::max(1.0)),
            ..RecommendationRequest::default()
        };
        let response = service().respond(&request).expect("responds");
        assert!(render_response(&response).starts_with("No city satisfies your filters"));
    }

    #[test]
    fn json_output_is_tagged_by_status() {
        let response = service()
            .respond(&RecommendationRequest::default())
            .expect("responds");
        let rendered = render_json(&response);
        assert!(rendered.contains("\"status\": \"matched\""));
    }
}
