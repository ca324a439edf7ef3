use serde::{Deserialize, Serialize};

/// Whether a larger raw value is more or less desirable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

impl Polarity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HigherIsBetter => "higher is better",
            Self::LowerIsBetter => "lower is better",
        }
    }
}

/// Domain knowledge about one scorable metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDirective {
    pub metric: &'static str,
    pub polarity: Polarity,
    pub label: &'static str,
    pub description: &'static str,
}

/// Scorable metrics in scoring order.
pub static METRIC_DIRECTIVES: [MetricDirective; 11] = [
    MetricDirective {
        metric: "Average Monthly Salary",
        polarity: Polarity::HigherIsBetter,
        label: "Average Monthly Salary",
        description: "Average gross monthly salary in the city (higher = better).",
    },
    MetricDirective {
        metric: "Salary_vs_CostLiv_Diff",
        polarity: Polarity::HigherIsBetter,
        label: "Disposable Income",
        description: "Difference between salary and cost of living (higher = more money left each month).",
    },
    MetricDirective {
        metric: "GDP per Capita",
        polarity: Polarity::HigherIsBetter,
        label: "GDP per Capita",
        description: "Economic development level of the country (higher = wealthier).",
    },
    MetricDirective {
        metric: "Health Care Index",
        polarity: Polarity::HigherIsBetter,
        label: "Health Care Index",
        description: "Quality and accessibility of healthcare services (higher = better).",
    },
    MetricDirective {
        metric: "Population",
        polarity: Polarity::HigherIsBetter,
        label: "Population",
        description: "Total city population (higher = larger city, more services and opportunities).",
    },
    MetricDirective {
        metric: "Unemployment Rate",
        polarity: Polarity::LowerIsBetter,
        label: "Unemployment Rate",
        description: "Percentage of people without jobs (lower = more job security).",
    },
    MetricDirective {
        metric: "Average Rent Price",
        polarity: Polarity::LowerIsBetter,
        label: "Average Rent Price",
        description: "Average monthly rent (lower = more affordable housing).",
    },
    MetricDirective {
        metric: "Average Cost of Living",
        polarity: Polarity::LowerIsBetter,
        label: "Average Cost of Living",
        description: "Average monthly cost for basic expenses (lower = cheaper to live).",
    },
    MetricDirective {
        metric: "Crime Index",
        polarity: Polarity::LowerIsBetter,
        label: "Crime Index",
        description: "Overall crime level in the city (lower = safer).",
    },
    MetricDirective {
        metric: "Traffic Index",
        polarity: Polarity::LowerIsBetter,
        label: "Traffic Index",
        description: "Traffic congestion and travel time (lower = faster commuting).",
    },
    MetricDirective {
        metric: "Days of very strong heat stress",
        polarity: Polarity::LowerIsBetter,
        label: "Days of very strong heat stress",
        description: "Number of extremely hot days (lower = more climate comfort).",
    },
];

/// Order in which criteria are listed to people, led by disposable income.
pub static DISPLAY_ORDER: [&str; 11] = [
    "Salary_vs_CostLiv_Diff",
    "Crime Index",
    "Health Care Index",
    "Average Monthly Salary",
    "GDP per Capita",
    "Population",
    "Unemployment Rate",
    "Average Rent Price",
    "Average Cost of Living",
    "Traffic Index",
    "Days of very strong heat stress",
];

pub fn directives_for_display() -> impl Iterator<Item = &'static MetricDirective> {
    DISPLAY_ORDER.iter().filter_map(|metric| directive_for(metric))
}

pub fn directive_for(metric: &str) -> Option<&'static MetricDirective> {
    METRIC_DIRECTIVES
        .iter()
        .find(|directive| directive.metric == metric)
}

pub fn polarity_for(metric: &str) -> Option<Polarity> {
    directive_for(metric).map(|directive| directive.polarity)
}
