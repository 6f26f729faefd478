//! Row filtering by region code.

use serde_json::Value;
use std::collections::BTreeSet;

use crate::models::REGION_FIELD;
use crate::table::Table;

/// What the region filter did, for operator-visible reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Rows were filtered against the region set.
    Filtered { kept: usize, dropped: usize },
    /// The region set was empty; every row was kept.
    EmptySet,
    /// The region column is not present; every row was kept.
    MissingRegionColumn,
}

/// Build a region filter set from raw tokens: trimmed, upper-cased,
/// deduplicated, empty tokens discarded.
pub fn region_set(tokens: &[String]) -> BTreeSet<String> {
    tokens
        .iter()
        .map(|token| token.trim().to_uppercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Keep only rows whose region code is in the set.
///
/// Comparison is case-insensitive. An empty set and an absent region column
/// both degrade to a no-op rather than failing; rows with a missing region
/// value are dropped when a non-empty set is applied. Relative row order is
/// preserved.
pub fn filter_regions(table: &mut Table, regions: &BTreeSet<String>) -> FilterOutcome {
    if regions.is_empty() {
        return FilterOutcome::EmptySet;
    }
    if !table.has_column(REGION_FIELD) {
        return FilterOutcome::MissingRegionColumn;
    }

    let before = table.len();
    table.retain_rows(|row| {
        row.get(REGION_FIELD)
            .and_then(Value::as_str)
            .map(|code| regions.contains(&code.trim().to_uppercase()))
            .unwrap_or(false)
    });
    FilterOutcome::Filtered {
        kept: table.len(),
        dropped: before - table.len(),
    }
}
