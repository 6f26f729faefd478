//! Value normalization: rate rescaling, categorical relabeling, numeric coercion.
//!
//! Scorecard releases differ in whether rate fields are stored as 0–1
//! fractions or 0–100 percentages, and the pipeline consumes files from
//! multiple vintages interchangeably. The scale decision therefore has to be
//! inferred per column, and it has to be inferred the *same way* in the
//! transform stage and in the validator — both call [`rescale`], the one
//! shared heuristic.
//!
//! [`rescale`] never clamps. The transform stage clamps its output into
//! [0,1] via [`clamp_unit`]; the validator instead rejects out-of-range
//! values. Unparseable cells become missing everywhere, never zero and
//! never an error.

use serde_json::{Number, Value};

use crate::models::{labels_for, FieldKind, CANONICAL_FIELDS};
use crate::table::Table;

/// A rate column above this 95th-percentile threshold can only be
/// percentage-encoded.
pub const PERCENT_THRESHOLD: f64 = 1.5;

/// Detected encoding of a rate column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Values already lie in [0,1].
    Proportion,
    /// Values lie in [0,100] and need dividing by 100.
    Percent,
}

/// Parse a cell as a finite number. Empty and non-numeric cells are missing.
pub fn parse_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Decide the encoding of a rate column from its non-missing values.
///
/// Uses the nearest-rank 95th percentile rather than the maximum, so a lone
/// outlier in an otherwise proportion-scaled column does not flip the whole
/// column into percent division.
pub fn detect_scale(values: &[f64]) -> Scale {
    if values.is_empty() {
        return Scale::Proportion;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = ((0.95 * sorted.len() as f64).ceil() as usize).clamp(1, sorted.len());
    if sorted[rank - 1] > PERCENT_THRESHOLD {
        Scale::Percent
    } else {
        Scale::Proportion
    }
}

/// Rescale a rate column into proportion encoding.
///
/// Returns the detected scale and the rescaled values. Percent columns are
/// divided by 100; proportion columns come back untouched, which makes the
/// operation idempotent. No clamping happens here.
pub fn rescale(values: Vec<Option<f64>>) -> (Scale, Vec<Option<f64>>) {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let scale = detect_scale(&present);
    let rescaled = match scale {
        Scale::Percent => values
            .into_iter()
            .map(|v| v.map(|x| x / 100.0))
            .collect(),
        Scale::Proportion => values,
    };
    (scale, rescaled)
}

/// Bound a proportion into the closed interval [0,1].
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Extract a column as parsed numbers, one entry per row.
pub fn numeric_column(table: &Table, name: &str) -> Vec<Option<f64>> {
    table
        .rows()
        .iter()
        .map(|row| row.get(name).and_then(parse_number))
        .collect()
}

/// Rescale and clamp every rate column present in the table.
///
/// Returns the names of the columns that were detected as percentage-encoded
/// and divided by 100, for operator-visible notices.
pub fn normalize_rates(table: &mut Table) -> Vec<&'static str> {
    let mut rescaled_columns = Vec::new();
    for field in CANONICAL_FIELDS.iter().filter(|f| f.kind == FieldKind::Rate) {
        if !table.has_column(field.name) {
            continue;
        }
        let (scale, values) = rescale(numeric_column(table, field.name));
        if scale == Scale::Percent {
            rescaled_columns.push(field.name);
        }
        let clamped = values.into_iter().map(|v| v.map(clamp_unit)).collect();
        store_numbers(table, field.name, clamped);
    }
    rescaled_columns
}

/// Replace categorical codes with their human-readable labels.
///
/// Codes with no entry in the label table become missing, not an error.
pub fn relabel_categoricals(table: &mut Table) {
    for field in CANONICAL_FIELDS
        .iter()
        .filter(|f| f.kind == FieldKind::Categorical)
    {
        let Some(labels) = labels_for(field.name) else {
            continue;
        };
        if !table.has_column(field.name) {
            continue;
        }
        for row in table.rows_mut() {
            let label = row
                .get(field.name)
                .and_then(parse_number)
                .filter(|v| v.fract() == 0.0)
                .and_then(|v| labels.get(&(v as i64)).copied());
            let cell = match label {
                Some(text) => Value::String(text.to_string()),
                None => Value::Null,
            };
            row.insert(field.name.to_string(), cell);
        }
    }
}

/// Parse count and currency columns as numbers, without range clamping.
pub fn coerce_numerics(table: &mut Table) {
    for field in CANONICAL_FIELDS
        .iter()
        .filter(|f| matches!(f.kind, FieldKind::Count | FieldKind::Currency))
    {
        if !table.has_column(field.name) {
            continue;
        }
        for row in table.rows_mut() {
            let cell = row
                .get(field.name)
                .and_then(numeric_cell)
                .unwrap_or(Value::Null);
            row.insert(field.name.to_string(), cell);
        }
    }
}

/// Parse a cell as an integer where possible, falling back to float.
fn numeric_cell(raw: &Value) -> Option<Value> {
    match raw {
        Value::Number(n) => Some(Value::Number(n.clone())),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(int) = trimmed.parse::<i64>() {
                return Some(Value::Number(int.into()));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .and_then(Number::from_f64)
                .map(Value::Number)
        }
        _ => None,
    }
}

/// Write a numeric column back into the table; missing values become null.
fn store_numbers(table: &mut Table, name: &str, values: Vec<Option<f64>>) {
    for (row, value) in table.rows_mut().iter_mut().zip(values) {
        let cell = match value.and_then(Number::from_f64) {
            Some(n) => Value::Number(n),
            None => Value::Null,
        };
        row.insert(name.to_string(), cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn rate_table(column: &str, cells: &[&str]) -> Table {
        let rows = cells
            .iter()
            .map(|cell| {
                let mut row = Map::new();
                row.insert(column.to_string(), json!(*cell));
                row
            })
            .collect();
        Table::new(vec![column.to_string()], rows)
    }

    #[test]
    fn test_parse_number() {
        assert!(approx(parse_number(&json!("0.65")).unwrap(), 0.65));
        assert!(approx(parse_number(&json!(" 45.2 ")).unwrap(), 45.2));
        assert_eq!(parse_number(&json!("")), None);
        assert_eq!(parse_number(&json!("PrivacySuppressed")), None);
        assert_eq!(parse_number(&json!("NaN")), None);
    }

    #[test]
    fn test_detect_scale() {
        assert_eq!(detect_scale(&[0.1, 0.65, 0.99]), Scale::Proportion);
        assert_eq!(detect_scale(&[12.0, 45.2, 63.5]), Scale::Percent);
        assert_eq!(detect_scale(&[]), Scale::Proportion);
        // 1.2 could only be noise on a proportion column, not a percentage.
        assert_eq!(detect_scale(&[0.4, 1.2]), Scale::Proportion);
    }

    #[test]
    fn test_detect_scale_ignores_lone_outlier() {
        // One wild value among twenty proportions must not flip the column.
        let mut values = vec![0.5; 20];
        values.push(250.0);
        assert_eq!(detect_scale(&values), Scale::Proportion);
    }

    #[test]
    fn test_rescale_is_idempotent_on_proportions() {
        let input = vec![Some(0.0), Some(0.65), None, Some(1.0)];
        let (scale, once) = rescale(input.clone());
        assert_eq!(scale, Scale::Proportion);
        assert_eq!(once, input);
        let (_, twice) = rescale(once.clone());
        assert_eq!(twice, once);
    }

    #[test]
    fn test_rescale_divides_percentages() {
        let (scale, values) = rescale(vec![Some(63.5), Some(45.2), None]);
        assert_eq!(scale, Scale::Percent);
        assert!(approx(values[0].unwrap(), 0.635));
        assert!(approx(values[1].unwrap(), 0.452));
        assert_eq!(values[2], None);
    }

    #[test]
    fn test_normalize_rates_clamps_overshoot() {
        let mut table = rate_table("RET_FT4", &["63.5", "150.0", "-5.0"]);
        let rescaled = normalize_rates(&mut table);
        assert_eq!(rescaled, vec!["RET_FT4"]);
        assert!(approx(table.rows()[0]["RET_FT4"].as_f64().unwrap(), 0.635));
        assert!(approx(table.rows()[1]["RET_FT4"].as_f64().unwrap(), 1.0));
        assert!(approx(table.rows()[2]["RET_FT4"].as_f64().unwrap(), 0.0));
    }

    #[test]
    fn test_normalize_rates_keeps_proportions() {
        let mut table = rate_table("PCT_PELL", &["0.452", "0.9", ""]);
        let rescaled = normalize_rates(&mut table);
        assert!(rescaled.is_empty());
        assert!(approx(table.rows()[0]["PCT_PELL"].as_f64().unwrap(), 0.452));
        assert_eq!(table.rows()[2]["PCT_PELL"], Value::Null);
    }

    #[test]
    fn test_relabel_known_and_unknown_codes() {
        let rows = ["1", "3", "9", "oops"]
            .iter()
            .map(|code| {
                let mut row = Map::new();
                row.insert("CONTROL".to_string(), json!(*code));
                row
            })
            .collect();
        let mut table = Table::new(vec!["CONTROL".to_string()], rows);
        relabel_categoricals(&mut table);
        assert_eq!(table.rows()[0]["CONTROL"], json!("Public"));
        assert_eq!(table.rows()[1]["CONTROL"], json!("Private For-Profit"));
        assert_eq!(table.rows()[2]["CONTROL"], Value::Null);
        assert_eq!(table.rows()[3]["CONTROL"], Value::Null);
    }

    #[test]
    fn test_relabel_accepts_float_coded_integers() {
        // Some releases store the code as "1.0".
        let mut row = Map::new();
        row.insert("PREDDEG".to_string(), json!("3.0"));
        let mut table = Table::new(vec!["PREDDEG".to_string()], vec![row]);
        relabel_categoricals(&mut table);
        assert_eq!(table.rows()[0]["PREDDEG"], json!("Bachelor"));
    }

    #[test]
    fn test_coerce_numerics() {
        let mut row = Map::new();
        row.insert("UGDS".to_string(), json!("5000"));
        row.insert("TUITIONFEE_IN".to_string(), json!("n/a"));
        let mut table = Table::new(
            vec!["UGDS".to_string(), "TUITIONFEE_IN".to_string()],
            vec![row],
        );
        coerce_numerics(&mut table);
        assert_eq!(table.rows()[0]["UGDS"], json!(5000));
        assert_eq!(table.rows()[0]["TUITIONFEE_IN"], Value::Null);
    }
}
