//! Independent validation of prepared subset files.
//!
//! The validator never trusts the transform stage: it re-reads the output
//! file and re-checks the invariants the downstream consumers rely on. It
//! reuses the same scale heuristic as the transform (see
//! [`crate::normalize::rescale`]) so a file that is still
//! percentage-scaled validates identically to a normalized one — but unlike
//! the transform it rejects out-of-range values instead of clamping them.
//!
//! Checks run in order:
//!
//! 1. every required column is present (all misses reported in one message)
//! 2. the table has at least one row
//! 3. every rate value lies in [0,1] after scale normalization
//! 4. enrollment and tuition are non-negative

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{ValidateError, ValidateResult};
use crate::models::{NON_NEGATIVE_COLUMNS, REGION_FIELD, REQUIRED_COLUMNS, REQUIRED_RATE_COLUMNS};
use crate::normalize::{numeric_column, rescale};
use crate::table::Table;

/// Summary of a successful validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Rows in the validated table.
    pub rows: usize,
    /// Sorted distinct region codes present.
    pub regions: Vec<String>,
}

/// Load a CSV file and validate it.
pub fn validate_file(path: &Path) -> ValidateResult<ValidationReport> {
    let table = Table::read_csv(path)?;
    validate_table(&table)
}

/// Validate an in-memory table.
pub fn validate_table(table: &Table) -> ValidateResult<ValidationReport> {
    check_columns(table)?;
    check_nonempty(table)?;
    check_rate_ranges(table)?;
    check_non_negative(table)?;
    Ok(ValidationReport {
        rows: table.len(),
        regions: distinct_regions(table),
    })
}

/// Every required column must be present; all misses are reported at once.
fn check_columns(table: &Table) -> ValidateResult<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !table.has_column(column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidateError::MissingColumns { columns: missing });
    }
    Ok(())
}

fn check_nonempty(table: &Table) -> ValidateResult<()> {
    if table.is_empty() {
        return Err(ValidateError::Empty);
    }
    Ok(())
}

/// Rate columns must lie in [0,1] once their encoding is normalized.
fn check_rate_ranges(table: &Table) -> ValidateResult<()> {
    for column in REQUIRED_RATE_COLUMNS {
        let (_, values) = rescale(numeric_column(table, column));
        if let Some(bad) = values
            .into_iter()
            .flatten()
            .find(|v| !(0.0..=1.0).contains(v))
        {
            return Err(ValidateError::OutOfRange {
                column: column.to_string(),
                value: bad,
            });
        }
    }
    Ok(())
}

fn check_non_negative(table: &Table) -> ValidateResult<()> {
    for column in NON_NEGATIVE_COLUMNS {
        if let Some(bad) = numeric_column(table, column)
            .into_iter()
            .flatten()
            .find(|v| *v < 0.0)
        {
            return Err(ValidateError::Negative {
                column: column.to_string(),
                value: bad,
            });
        }
    }
    Ok(())
}

fn distinct_regions(table: &Table) -> Vec<String> {
    let regions: BTreeSet<String> = table
        .rows()
        .iter()
        .filter_map(|row| row.get(REGION_FIELD).and_then(Value::as_str))
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect();
    regions.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn well_formed(overrides: &[(&str, Value)]) -> Table {
        let mut row = Map::new();
        row.insert("UNITID".to_string(), json!("100654"));
        row.insert("INSTNM".to_string(), json!("Coastal College"));
        row.insert("STABBR".to_string(), json!("MD"));
        row.insert("CONTROL".to_string(), json!("Public"));
        row.insert("PREDDEG".to_string(), json!("Bachelor"));
        row.insert("UGDS".to_string(), json!("5000"));
        row.insert("TUITIONFEE_IN".to_string(), json!("20000"));
        row.insert("RETENTION_FT_4YR".to_string(), json!("0.65"));
        row.insert("PELL_SHARE".to_string(), json!("0.452"));
        for (column, value) in overrides {
            row.insert(column.to_string(), value.clone());
        }
        let columns = row.keys().cloned().collect();
        Table::new(columns, vec![row])
    }

    #[test]
    fn test_well_formed_table_passes() {
        let report = validate_table(&well_formed(&[])).unwrap();
        assert_eq!(report.rows, 1);
        assert_eq!(report.regions, vec!["MD".to_string()]);
    }

    #[test]
    fn test_missing_column_named_in_error() {
        let mut table = well_formed(&[]);
        table.rename_column("PELL_SHARE", "SOMETHING_ELSE");
        let err = validate_table(&table).unwrap_err();
        match err {
            ValidateError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["PELL_SHARE".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_all_missing_columns_reported_together() {
        let table = Table::new(vec!["UNITID".to_string()], vec![Map::new()]);
        let err = validate_table(&table).unwrap_err();
        match err {
            ValidateError::MissingColumns { columns } => {
                assert_eq!(columns.len(), REQUIRED_COLUMNS.len() - 1);
                assert!(columns.contains(&"PELL_SHARE".to_string()));
                assert!(columns.contains(&"STABBR".to_string()));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_table_fails() {
        let columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let table = Table::new(columns, vec![]);
        assert!(matches!(validate_table(&table), Err(ValidateError::Empty)));
    }

    #[test]
    fn test_out_of_range_proportion_fails() {
        // 1.2 with a column maximum under 1.5 is proportion-encoded noise,
        // so it is rejected rather than rescaled away.
        let table = well_formed(&[("RETENTION_FT_4YR", json!("1.2"))]);
        let err = validate_table(&table).unwrap_err();
        match err {
            ValidateError::OutOfRange { column, value } => {
                assert_eq!(column, "RETENTION_FT_4YR");
                assert!((value - 1.2).abs() < 1e-9);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_percentage_scaled_file_is_tolerated() {
        // A still-percentage-scaled output normalizes to 0.452 and passes.
        let table = well_formed(&[("PELL_SHARE", json!("45.2"))]);
        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_negative_enrollment_fails() {
        let table = well_formed(&[("UGDS", json!("-5"))]);
        let err = validate_table(&table).unwrap_err();
        match err {
            ValidateError::Negative { column, .. } => assert_eq!(column, "UGDS"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unparseable_cells_are_ignored() {
        let table = well_formed(&[("RETENTION_FT_4YR", json!("PrivacySuppressed"))]);
        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subset.csv");
        well_formed(&[]).write_csv(&path).unwrap();
        let report = validate_file(&path).unwrap();
        assert_eq!(report.rows, 1);
    }
}
