use super::{CellValue, CityRecord, DataSourceError, DatasetSchema};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;

/// Parsed CSV contents before they are wrapped into a [`super::Table`].
#[derive(Debug)]
pub(crate) struct ParsedTable {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<CityRecord>,
}

pub(crate) fn parse_table<R: Read>(
    reader: R,
    schema: &DatasetSchema,
) -> Result<ParsedTable, DataSourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut seen_headers: HashSet<&str> = HashSet::new();
    if let Some(duplicate) = headers
        .iter()
        .find(|header| !seen_headers.insert(header.as_str()))
    {
        return Err(DataSourceError::DuplicateColumn {
            column: duplicate.clone(),
        });
    }

    let identifier_position = headers
        .iter()
        .position(|header| header == &schema.identifier_column)
        .ok_or_else(|| DataSourceError::MissingIdentifierColumn {
            column: schema.identifier_column.clone(),
        })?;

    // (position, name) for every column kept on the record
    let kept: Vec<(usize, &String)> = headers
        .iter()
        .enumerate()
        .filter(|(position, header)| {
            *position != identifier_position && !is_synthetic_index(*position, header, schema)
        })
        .collect();

    let mut rows = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (offset, record) in csv_reader.records().enumerate() {
        let record = record?;
        // header occupies line 1
        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or(offset as u64 + 2);

        let name = record.get(identifier_position).unwrap_or_default().trim();
        if name.is_empty() {
            return Err(DataSourceError::EmptyIdentifier { line });
        }
        if !seen.insert(name.to_string()) {
            return Err(DataSourceError::DuplicateIdentifier {
                city: name.to_string(),
            });
        }

        let values: BTreeMap<String, CellValue> = kept
            .iter()
            .map(|(position, header)| {
                let cell = record.get(*position).unwrap_or_default();
                ((*header).clone(), parse_cell(cell))
            })
            .collect();

        rows.push(CityRecord {
            name: name.to_string(),
            values,
        });
    }

    let columns = kept.into_iter().map(|(_, header)| header.clone()).collect();

    Ok(ParsedTable { columns, rows })
}

fn is_synthetic_index(position: usize, header: &str, schema: &DatasetSchema) -> bool {
    header == schema.synthetic_index_column || (position == 0 && header.is_empty())
}

pub(crate) fn normalize_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

pub(crate) fn parse_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Missing;
    }

    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => CellValue::Number(number),
        Ok(_) => CellValue::Missing,
        Err(_) => CellValue::Text(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(csv: &str) -> Result<ParsedTable, DataSourceError> {
        parse_table(Cursor::new(csv), &DatasetSchema::default())
    }

    #[test]
    fn parse_cell_distinguishes_numbers_text_and_gaps() {
        assert_eq!(parse_cell("1250.5"), CellValue::Number(1250.5));
        assert_eq!(parse_cell(" 42 "), CellValue::Number(42.0));
        assert_eq!(parse_cell("Spain"), CellValue::Text("Spain".to_string()));
        assert_eq!(parse_cell(""), CellValue::Missing);
        assert_eq!(parse_cell("NaN"), CellValue::Missing);
        assert_eq!(parse_cell("inf"), CellValue::Missing);
    }

    #[test]
    fn normalize_header_strips_byte_order_marks() {
        assert_eq!(normalize_header("\u{feff}City "), "City");
        assert_eq!(normalize_header("Crime\u{200b} Index"), "Crime Index");
    }

    #[test]
    fn drops_blank_leading_index_column() {
        let parsed = parse(",City,Country,Crime Index\n0,Lisbon,Portugal,30.5\n").expect("parse");
        assert_eq!(parsed.columns, vec!["Country", "Crime Index"]);
        assert_eq!(parsed.rows[0].name, "Lisbon");
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let error = parse("City,Population\nOslo,1\nOslo,2\n").expect_err("duplicate");
        match error {
            DataSourceError::DuplicateIdentifier { city } => assert_eq!(city, "Oslo"),
            other => panic!("expected duplicate identifier, got {other:?}"),
        }
    }

    #[test]
    fn empty_identifier_reports_line() {
        let error = parse("City,Population\nOslo,1\n,2\n").expect_err("empty identifier");
        match error {
            DataSourceError::EmptyIdentifier { line } => assert_eq!(line, 3),
            other => panic!("expected empty identifier, got {other:?}"),
        }
    }

    #[test]
    fn repeated_header_is_rejected() {
        let error = parse("City,Crime Index,Crime\u{feff} Index\nA,10,90\nB,20,80\n")
            .expect_err("duplicate column");
        match error {
            DataSourceError::DuplicateColumn { column } => assert_eq!(column, "Crime Index"),
            other => panic!("expected duplicate column, got {other:?}"),
        }
    }
}
