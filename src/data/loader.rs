use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use calamine::{Data, DataType, Reader, Xlsx, open_workbook};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, Column, UseCaseDataset, UseCaseRecord};

// ---------------------------------------------------------------------------
// Errors and options
// ---------------------------------------------------------------------------

/// Why a load attempt failed. Terminal for the attempt, never fatal for the
/// process: the rendering layer shows the message and withholds the charts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// Structurally unreadable input. The message carries the full
    /// context chain of the underlying parse failure.
    #[error("failed to parse {}: {source:#}", path.display())]
    Parse { path: PathBuf, source: anyhow::Error },

    #[error("required column '{column}' not found in {}", path.display())]
    ColumnMissing {
        column: &'static str,
        path: PathBuf,
    },
}

/// Loader knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Rows to skip before the header row. Tracking sheets exported with a
    /// title block carry 3 such rows. Ignored for JSON input, which has no
    /// grid to skip.
    pub skip_rows: usize,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a use-case dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` – first worksheet, header row after `skip_rows`
/// * `.csv`            – header row after `skip_rows`
/// * `.json`           – records-oriented: `[{ "Business Unit": "Sales", ... }]`
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<UseCaseDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" => load_xlsx(path, options),
        "csv" => load_csv(path, options),
        "json" => load_json(path),
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    }
    .map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    build_dataset(path, table)
}

// ---------------------------------------------------------------------------
// Raw table – the format-independent parse result
// ---------------------------------------------------------------------------

/// Header row plus data rows, before any schema typing.
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Resolve the schema against the (trimmed) header row, then type each row
/// into a [`UseCaseRecord`]. Rows whose cells are all blank are dropped;
/// spreadsheet ranges routinely trail off into empty rows.
fn build_dataset(path: &Path, table: RawTable) -> Result<UseCaseDataset, LoadError> {
    let mut positions: BTreeMap<Column, usize> = BTreeMap::new();
    for col in Column::ALL {
        let position = table
            .headers
            .iter()
            .position(|h| col.matches(h))
            .ok_or_else(|| LoadError::ColumnMissing {
                column: col.header(),
                path: path.to_path_buf(),
            })?;
        positions.insert(col, position);
    }

    let cell = |row: &[CellValue], col: Column| -> CellValue {
        row.get(positions[&col]).cloned().unwrap_or(CellValue::Null)
    };

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if row.iter().all(CellValue::is_null) {
            continue;
        }
        records.push(UseCaseRecord {
            name: cell(row, Column::Name).into_text(),
            business_unit: cell(row, Column::BusinessUnit).into_text(),
            champion: cell(row, Column::Champion).into_text(),
            status: cell(row, Column::Status).into_text(),
            ryg: cell(row, Column::Ryg).into_text(),
            expected_value: coerce_number(&cell(row, Column::ExpectedValue)),
            actual_value: coerce_number(&cell(row, Column::ActualValue)),
        });
    }

    Ok(UseCaseDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Coerce a raw cell to a finite number, `None` when missing or dirty.
///
/// Value columns in real tracking sheets mix plain numbers with currency
/// text (`"$1,200"`) and placeholders (`"N/A"`, `"TBD"`). A cell that fails
/// coercion is a missing value, never a load failure.
pub fn coerce_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(v) => v.is_finite().then_some(*v),
        CellValue::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        CellValue::Null => None,
    }
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Read the first worksheet of an Excel workbook.
fn load_xlsx(path: &Path, options: &LoadOptions) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = open_workbook(path).context("opening workbook")?;

    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows().skip(options.skip_rows);

    let headers: Vec<String> = rows
        .next()
        .context("no header row after skipped rows")?
        .iter()
        .map(sheet_cell_text)
        .collect();

    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(sheet_cell_value).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn sheet_cell_value(cell: &Data) -> CellValue {
    if cell.is_empty() {
        CellValue::Null
    } else if let Some(v) = cell.get_float() {
        CellValue::Number(v)
    } else if let Some(i) = cell.get_int() {
        CellValue::Number(i as f64)
    } else if let Some(s) = cell.get_string() {
        CellValue::from_text(s)
    } else {
        // bools, dates, error cells: keep the display form
        CellValue::from_text(&cell.to_string())
    }
}

fn sheet_cell_text(cell: &Data) -> String {
    sheet_cell_value(cell).into_text().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: optional title rows, then a header row with the column names.
/// Parsed in flexible mode since title rows rarely match the data width.
fn load_csv(path: &Path, options: &LoadOptions) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut records = reader.records();
    for skipped in 0..options.skip_rows {
        records
            .next()
            .with_context(|| format!("CSV ended while skipping title row {skipped}"))?
            .with_context(|| format!("CSV title row {skipped}"))?;
    }

    let headers: Vec<String> = records
        .next()
        .context("no header row after skipped rows")?
        .context("CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in records.enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the shape a
/// `df.to_json(orient='records')` export produces):
///
/// ```json
/// [
///   {
///     "AI Use Case Name": "Churn prediction",
///     "Business Unit": "Sales",
///     "Expected value": 120000,
///     ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("expected top-level JSON array")?;

    // Union of keys in first-seen order stands in for the header row.
    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for rec in records {
        let obj = rec.as_object().ok_or_else(|| anyhow!("non-object row"))?;
        let row: Vec<CellValue> = headers
            .iter()
            .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::from_text(s),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::from_text(&n.to_string()),
        },
        JsonValue::Null => CellValue::Null,
        other => CellValue::from_text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        (dir, path)
    }

    const CSV_FIXTURE: &str = "\
AI Use Case Name , Business Unit,Relevant champion stakeholder,Current status,Overall RYG status,Expected value,Actual value realized
Churn prediction,Sales,Dana,Deployed,Green,\"$1,200\",800
Invoice triage,Finance,Lee,Prioritization,Yellow,N/A,
Ticket routing,IT,,Deployed,Red,50,25
,,,,,,
";

    #[test]
    fn coerce_number_handles_dirty_cells() {
        assert_eq!(coerce_number(&CellValue::Number(42.5)), Some(42.5));
        assert_eq!(coerce_number(&CellValue::Number(f64::NAN)), None);
        assert_eq!(coerce_number(&CellValue::Null), None);
        assert_eq!(
            coerce_number(&CellValue::Text("$1,200".to_string())),
            Some(1200.0)
        );
        assert_eq!(
            coerce_number(&CellValue::Text(" 1,234.5 ".to_string())),
            Some(1234.5)
        );
        assert_eq!(coerce_number(&CellValue::Text("N/A".to_string())), None);
        assert_eq!(coerce_number(&CellValue::Text("TBD".to_string())), None);
    }

    #[test]
    fn csv_load_trims_headers_and_coerces_values() {
        let (_dir, path) = write_fixture("cases.csv", CSV_FIXTURE);
        let dataset = load_file(&path, &LoadOptions::default()).expect("load");

        // The all-blank trailer row is dropped.
        assert_eq!(dataset.len(), 3);

        let first = &dataset.records[0];
        assert_eq!(first.name.as_deref(), Some("Churn prediction"));
        assert_eq!(first.business_unit.as_deref(), Some("Sales"));
        assert_eq!(first.expected_value, Some(1200.0));
        assert_eq!(first.actual_value, Some(800.0));

        // "N/A" and an empty cell load as missing, not as failures.
        let second = &dataset.records[1];
        assert_eq!(second.expected_value, None);
        assert_eq!(second.actual_value, None);

        // Source order is preserved.
        let names: Vec<&str> = dataset
            .records
            .iter()
            .map(|r| r.name.as_deref().unwrap())
            .collect();
        assert_eq!(
            names,
            ["Churn prediction", "Invoice triage", "Ticket routing"]
        );
    }

    #[test]
    fn csv_load_skips_title_rows() {
        let titled = format!("AI Use Case Tracker\nExported 2024-01-01\n,,\n{CSV_FIXTURE}");
        let (_dir, path) = write_fixture("titled.csv", &titled);

        assert!(matches!(
            load_file(&path, &LoadOptions::default()),
            Err(LoadError::ColumnMissing { .. })
        ));

        let dataset = load_file(&path, &LoadOptions { skip_rows: 3 }).expect("load");
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let (_dir, path) = write_fixture(
            "cases.csv",
            "AI Use Case Name,Business Unit\nChurn prediction,Sales\n",
        );
        match load_file(&path, &LoadOptions::default()) {
            Err(LoadError::ColumnMissing { column, .. }) => {
                assert_eq!(column, "Relevant champion stakeholder");
            }
            other => panic!("expected ColumnMissing, got {other:?}"),
        }
    }

    #[test]
    fn json_load_reads_records_orientation() {
        let (_dir, path) = write_fixture(
            "cases.json",
            r#"[
                {
                    "AI Use Case Name": "Churn prediction",
                    "Business Unit": "Sales",
                    "Relevant champion stakeholder": "Dana",
                    "Current status": "Deployed",
                    "Overall RYG status": "Green",
                    "Expected value": 1200,
                    "Actual value realized": null
                },
                {
                    "AI Use Case Name": "Ticket routing",
                    "Business Unit": "IT",
                    "Relevant champion stakeholder": null,
                    "Current status": "Deployed",
                    "Overall RYG status": "Red",
                    "Expected value": "N/A",
                    "Actual value realized": 25
                }
            ]"#,
        );
        let dataset = load_file(&path, &LoadOptions::default()).expect("load");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0].expected_value, Some(1200.0));
        assert_eq!(dataset.records[0].actual_value, None);
        assert_eq!(dataset.records[1].expected_value, None);
        assert_eq!(dataset.records[1].champion, None);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_file(Path::new("missing.xlsx"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let (_dir, path) = write_fixture("cases.parquet", "not a real parquet");
        assert!(matches!(
            load_file(&path, &LoadOptions::default()),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "parquet"
        ));
    }

    #[test]
    fn malformed_json_reports_parse_failure() {
        let (_dir, path) = write_fixture("cases.json", "{ not json");
        match load_file(&path, &LoadOptions::default()) {
            Err(LoadError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Parse, got {other:?}"),
        }
    }
}
