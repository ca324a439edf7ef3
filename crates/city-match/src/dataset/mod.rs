//! Read-only access to the city statistics table.
//!
//! The source is a CSV export with one identifier column (the city name) and
//! an open-ended set of numeric or text columns. Nothing about the schema is
//! fixed at compile time: the scoring engine asks the [`Table`] whether a
//! column exists and silently skips the ones that do not.

mod cache;
mod parser;

pub use cache::DatasetCache;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Column names the loader needs to know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    pub identifier_column: String,
    pub synthetic_index_column: String,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            identifier_column: "City".to_string(),
            synthetic_index_column: "Unnamed: 0".to_string(),
        }
    }
}

/// A single cell of the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// One row of the dataset, keyed by city name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub values: BTreeMap<String, CellValue>,
}

impl CityRecord {
    pub fn value(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// Numeric value of `column`, `None` when absent, blank or text.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.value(column).and_then(CellValue::as_number)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.value(column).and_then(CellValue::as_text)
    }
}

/// Error raised when the dataset source cannot be turned into a [`Table`].
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no '{column}' identifier column")]
    MissingIdentifierColumn { column: String },
    #[error("row on line {line} has an empty identifier")]
    EmptyIdentifier { line: u64 },
    #[error("city '{city}' appears more than once")]
    DuplicateIdentifier { city: String },
    #[error("column '{column}' appears more than once in the header")]
    DuplicateColumn { column: String },
}

/// Immutable table of city rows in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    identifier: String,
    columns: Vec<String>,
    rows: Vec<CityRecord>,
}

impl Table {
    pub fn new(identifier: impl Into<String>, columns: Vec<String>, rows: Vec<CityRecord>) -> Self {
        Self {
            identifier: identifier.into(),
            columns,
            rows,
        }
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
        schema: &DatasetSchema,
    ) -> Result<Self, DataSourceError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DataSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file, schema)?;

        info!(
            path = %path.display(),
            cities = table.len(),
            columns = table.columns.len(),
            "city dataset loaded"
        );

        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, schema: &DatasetSchema) -> Result<Self, DataSourceError> {
        let parsed = parser::parse_table(reader, schema)?;
        Ok(Self::new(
            schema.identifier_column.clone(),
            parsed.columns,
            parsed.rows,
        ))
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Column names in source order, excluding the identifier.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|candidate| candidate == column)
    }

    pub fn rows(&self) -> &[CityRecord] {
        &self.rows
    }

    pub fn get(&self, city: &str) -> Option<&CityRecord> {
        self.rows.iter().find(|row| row.name == city)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Smallest and largest numeric value of `column`.
    pub fn column_range(&self, column: &str) -> Option<MetricRange> {
        let mut numbers = self.rows.iter().filter_map(|row| row.number(column));
        let first = numbers.next()?;
        let (min, max) = numbers.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        });

        Some(MetricRange {
            metric: column.to_string(),
            min,
            max,
        })
    }

    pub fn summary(&self, group_column: Option<&str>) -> DatasetSummary {
        let groups = group_column
            .filter(|column| self.has_column(column))
            .map(|column| {
                self.rows
                    .iter()
                    .filter_map(|row| row.text(column))
                    .collect::<BTreeSet<_>>()
                    .len()
            });

        let metric_ranges = self
            .columns
            .iter()
            .filter_map(|column| self.column_range(column))
            .collect();

        DatasetSummary {
            cities: self.len(),
            groups,
            columns: self.columns.len(),
            metric_ranges,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRange {
    pub metric: String,
    pub min: f64,
    pub max: f64,
}

/// Headline figures about the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub cities: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<usize>,
    pub columns: usize,
    pub metric_ranges: Vec<MetricRange>,
}
