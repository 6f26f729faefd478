//! High-level preparation pipeline.
//!
//! [`prepare`] runs the whole transform stage in strict order: resolve
//! headers, select and rename the resolved columns, filter rows by region,
//! normalize values, apply display renames, order columns, sort rows, and
//! write the output CSV. It communicates with the validation stage only
//! through that file.

use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::path::Path;

use crate::error::PipelineResult;
use crate::models::{CANONICAL_FIELDS, DISPLAY_ORDER, NAME_FIELD, REGION_FIELD};
use crate::normalize::{coerce_numerics, normalize_rates, relabel_categoricals};
use crate::report::{log_info, log_success, log_warning};
use crate::resolve::resolve_headers;
use crate::table::Table;
use crate::transform::filter::{filter_regions, region_set, FilterOutcome};

/// Result of a completed preparation run.
#[derive(Debug, Clone, Serialize)]
pub struct PrepareSummary {
    /// Rows written.
    pub rows: usize,
    /// Columns written.
    pub columns: usize,
    /// Canonical fields that never resolved in the source.
    pub missing: Vec<&'static str>,
    /// Rate columns that were detected as percentage-encoded and rescaled.
    pub rescaled: Vec<&'static str>,
}

/// Prepare a raw Scorecard CSV into the presentation-ready subset.
///
/// `states` holds the raw region tokens from the CLI; they are upper-cased
/// and deduplicated here. An empty token list disables row filtering.
pub fn prepare(input: &Path, output: &Path, states: &[String]) -> PipelineResult<PrepareSummary> {
    // 1. Read the raw table.
    log_info(format!("Reading {}", input.display()));
    let raw = Table::read_csv(input)?;
    log_success(format!(
        "Read {} rows, {} columns",
        raw.len(),
        raw.columns().len()
    ));

    // 2. Resolve headers; fatal only if nothing resolves.
    let resolution = resolve_headers(raw.columns())?;
    log_success(format!(
        "Resolved {} of {} canonical fields",
        resolution.resolved.len(),
        CANONICAL_FIELDS.len()
    ));

    // 3. Select only the resolved columns, renamed to canonical names.
    let mut table = raw.select(&resolution.resolved);

    // 4. Filter rows by region.
    let regions = region_set(states);
    match filter_regions(&mut table, &regions) {
        FilterOutcome::Filtered { kept, dropped } => {
            log_info(format!("Region filter kept {} rows, dropped {}", kept, dropped));
        }
        FilterOutcome::EmptySet => log_info("No region filter; keeping all rows"),
        FilterOutcome::MissingRegionColumn => {
            log_warning(format!(
                "Region column {} not present in source; keeping all rows",
                REGION_FIELD
            ));
        }
    }
    if table.is_empty() {
        log_warning("No rows left after region filter");
    }

    // 5. Normalize values: labels, rates, plain numerics.
    relabel_categoricals(&mut table);
    let rescaled = normalize_rates(&mut table);
    for column in &rescaled {
        log_info(format!(
            "{}: percentage-scaled source detected, rescaled to [0,1]",
            column
        ));
    }
    coerce_numerics(&mut table);

    // 6. Final display renames.
    for field in CANONICAL_FIELDS {
        if let Some(display) = field.display_name {
            if table.has_column(field.name) {
                table.rename_column(field.name, display);
            }
        }
    }

    // 7. Column order, then row order.
    table.reorder_columns(DISPLAY_ORDER);
    table.sort_rows_by(|a, b| {
        compare_missing_last(sort_key(a, REGION_FIELD), sort_key(b, REGION_FIELD))
            .then_with(|| compare_missing_last(sort_key(a, NAME_FIELD), sort_key(b, NAME_FIELD)))
    });

    // 8. Write the output file.
    table.write_csv(output)?;
    log_success(format!(
        "Wrote {} (rows={}, cols={})",
        output.display(),
        table.len(),
        table.columns().len()
    ));
    if !resolution.missing.is_empty() {
        log_warning(format!(
            "Missing in source (skipped): {}",
            resolution.missing.join(", ")
        ));
    }

    Ok(PrepareSummary {
        rows: table.len(),
        columns: table.columns().len(),
        missing: resolution.missing,
        rescaled,
    })
}

/// Sort key for a row: a non-empty trimmed string, or missing.
fn sort_key<'a>(row: &'a Map<String, Value>, column: &str) -> Option<&'a str> {
    row.get(column)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Compare sort keys so that missing values order after present ones.
fn compare_missing_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
