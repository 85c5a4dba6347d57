//! CSV ingest for rate observations.
//!
//! Expected columns (header row required, any order, case-insensitive):
//!
//! ```text
//! ca,cb,cc,rate
//! ```
//!
//! `c_a`/`c_b`/`c_c` and `r` are accepted as aliases. Extra columns are ignored.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::warn;

use crate::domain::{Dataset, Observation};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed observations + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

const COLUMNS: [(&str, &[&str]); 4] = [
    ("ca", &["ca", "c_a"]),
    ("cb", &["cb", "c_b"]),
    ("cc", &["cc", "c_c"]),
    ("rate", &["rate", "r"]),
];

/// Load observations from a CSV file.
pub fn load_dataset_csv(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::Io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_dataset_csv(file)
}

/// Parse observations from any CSV reader.
pub fn read_dataset_csv<R: Read>(input: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::InvalidInput(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    let columns = resolve_columns(&header_map)?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &columns) {
            Ok(obs) => observations.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for e in &row_errors {
        warn!(line = e.line, "skipping CSV row: {}", e.message);
    }

    if observations.is_empty() {
        return Err(AppError::EmptyDataset);
    }

    Ok(IngestedData {
        dataset: Dataset::new(observations),
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Column index for each of `ca`, `cb`, `cc`, `rate`.
fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<[usize; 4], AppError> {
    let mut out = [0usize; 4];
    for (slot, (name, aliases)) in out.iter_mut().zip(COLUMNS) {
        *slot = aliases
            .iter()
            .find_map(|a| header_map.get(*a).copied())
            .ok_or_else(|| AppError::InvalidInput(format!("Missing required column: `{name}`")))?;
    }
    Ok(out)
}

fn parse_row(record: &StringRecord, columns: &[usize; 4]) -> Result<Observation, String> {
    let mut values = [0.0; 4];
    for (v, (&idx, (name, _))) in values.iter_mut().zip(columns.iter().zip(COLUMNS)) {
        let raw = record
            .get(idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("Missing `{name}` value."))?;
        let parsed: f64 = raw
            .parse()
            .map_err(|_| format!("Invalid `{name}` value: {raw:?}."))?;
        if !parsed.is_finite() {
            return Err(format!("Non-finite `{name}` value: {raw:?}."));
        }
        *v = parsed;
    }
    Ok(Observation::new(values[0], values[1], values[2], values[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_any_column_order() {
        let csv = "rate,CC,cb,ca,note\n1.5,0.2,1.0,0.5,x\n2.0,0.4,1.5,1.0,y\n";
        let data = read_dataset_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.rows_read, 2);
        assert!(data.row_errors.is_empty());
        assert_eq!(data.dataset.observations[0], Observation::new(0.5, 1.0, 0.2, 1.5));
    }

    #[test]
    fn accepts_aliases_and_bom() {
        let csv = "\u{feff}C_A,C_B,C_C,r\n1,2,3,4\n";
        let data = read_dataset_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.dataset.observations[0], Observation::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = "ca,cb,cc,rate\n1,2,3,4\n1,abc,3,4\n1,2,,4\n5,6,7,8\n";
        let data = read_dataset_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.dataset.len(), 2);
        assert_eq!(data.row_errors.len(), 2);
        assert_eq!(data.row_errors[0].line, 3);
        assert!(data.row_errors[1].message.contains("cc"));
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let csv = "ca,cb,rate\n1,2,3\n";
        let err = read_dataset_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("`cc`"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_valid_rows_is_an_empty_dataset() {
        let csv = "ca,cb,cc,rate\nx,y,z,w\n";
        assert!(matches!(read_dataset_csv(csv.as_bytes()), Err(AppError::EmptyDataset)));
    }
}
