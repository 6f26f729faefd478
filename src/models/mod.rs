//! Domain model for the Scorecard subset pipeline.
//!
//! This module contains the fixed catalog of canonical fields and the static
//! lookup tables used throughout the pipeline:
//!
//! - [`CanonicalField`] - a logical column identity independent of its literal
//!   spelling in any given raw source file
//! - [`FieldKind`] - the semantic type of a field, which decides how its
//!   values are normalized
//! - [`CONTROL_LABELS`] / [`DEGREE_LABELS`] - code → label tables
//! - [`DISPLAY_ORDER`] / [`REQUIRED_COLUMNS`] - output column contracts
//!
//! The label tables are built once at first use and shared by reference;
//! they are never reconstructed per call.

use once_cell::sync::Lazy;
use std::collections::HashMap;

// =============================================================================
// Canonical Fields
// =============================================================================

/// Semantic type of a canonical field.
///
/// The kind decides what the Value Normalizer does with the column:
/// `Rate` columns are rescaled into [0,1], `Categorical` columns are mapped
/// to labels, `Count`/`Currency` columns are parsed as numbers, and the
/// remaining kinds pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Unique institution identifier. Never transformed in value.
    Identifier,
    /// Institution name.
    Name,
    /// Region (state) code used by the row filter.
    Region,
    /// Small integer code mapped to a human-readable label.
    Categorical,
    /// Integer code kept verbatim (no label table).
    Code,
    /// Proportion, stored as [0,1] or [0,100] depending on source vintage.
    Rate,
    /// Non-negative count.
    Count,
    /// Non-negative dollar amount.
    Currency,
}

/// A fixed logical column identity.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalField {
    /// Canonical name, used as the column name after resolution.
    pub name: &'static str,
    /// Accepted source spellings, tried in priority order. The canonical
    /// name itself is always tried last as a fallback, so variants only
    /// need to list genuine synonyms.
    pub variants: &'static [&'static str],
    /// Semantic type.
    pub kind: FieldKind,
    /// Final display name, if the column is renamed before output.
    pub display_name: Option<&'static str>,
}

/// The full canonical field catalog, in column-selection order.
pub const CANONICAL_FIELDS: &[CanonicalField] = &[
    CanonicalField { name: "UNITID", variants: &[], kind: FieldKind::Identifier, display_name: None },
    CanonicalField { name: "INSTNM", variants: &[], kind: FieldKind::Name, display_name: None },
    CanonicalField { name: "STABBR", variants: &[], kind: FieldKind::Region, display_name: None },
    CanonicalField { name: "CONTROL", variants: &[], kind: FieldKind::Categorical, display_name: None },
    CanonicalField { name: "PREDDEG", variants: &[], kind: FieldKind::Categorical, display_name: None },
    CanonicalField { name: "LOCALE", variants: &[], kind: FieldKind::Code, display_name: None },
    CanonicalField { name: "UGDS", variants: &[], kind: FieldKind::Count, display_name: None },
    CanonicalField { name: "RET_FT4", variants: &[], kind: FieldKind::Rate, display_name: Some("RETENTION_FT_4YR") },
    CanonicalField { name: "RET_PT4", variants: &[], kind: FieldKind::Rate, display_name: Some("RETENTION_PT_4YR") },
    CanonicalField { name: "RET_FTL4", variants: &[], kind: FieldKind::Rate, display_name: Some("RETENTION_FT_2YR") },
    CanonicalField { name: "RET_PTL4", variants: &[], kind: FieldKind::Rate, display_name: Some("RETENTION_PT_2YR") },
    CanonicalField { name: "C150_4", variants: &[], kind: FieldKind::Rate, display_name: Some("COMPLETION_150_4YR") },
    CanonicalField { name: "C150_L4", variants: &[], kind: FieldKind::Rate, display_name: Some("COMPLETION_150_2YR") },
    CanonicalField { name: "TUITIONFEE_IN", variants: &[], kind: FieldKind::Currency, display_name: None },
    // PCTPELL spelling appears in some Scorecard releases.
    CanonicalField { name: "PCT_PELL", variants: &["PCTPELL"], kind: FieldKind::Rate, display_name: Some("PELL_SHARE") },
];

/// Look up a canonical field by name.
pub fn field(name: &str) -> Option<&'static CanonicalField> {
    CANONICAL_FIELDS.iter().find(|f| f.name == name)
}

/// The canonical name of the region-code column.
pub const REGION_FIELD: &str = "STABBR";

/// The canonical name of the institution-name column.
pub const NAME_FIELD: &str = "INSTNM";

/// Region codes kept when the caller does not specify any.
pub const DEFAULT_REGIONS: &[&str] = &["MD", "DC", "VA"];

// =============================================================================
// Label Tables
// =============================================================================

/// Control-of-institution code → label.
pub static CONTROL_LABELS: Lazy<HashMap<i64, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "Public"),
        (2, "Private Non-Profit"),
        (3, "Private For-Profit"),
    ])
});

/// Predominant-degree code → label.
pub static DEGREE_LABELS: Lazy<HashMap<i64, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (0, "Non-Degree"),
        (1, "Certificate"),
        (2, "Associate"),
        (3, "Bachelor"),
        (4, "Graduate"),
    ])
});

/// Label table for a categorical field, if it has one.
pub fn labels_for(name: &str) -> Option<&'static HashMap<i64, &'static str>> {
    match name {
        "CONTROL" => Some(&CONTROL_LABELS),
        "PREDDEG" => Some(&DEGREE_LABELS),
        _ => None,
    }
}

// =============================================================================
// Output Contracts
// =============================================================================

/// Preferred output column order, using final display names. Resolved
/// columns not in this list are appended after it, dropping none.
pub const DISPLAY_ORDER: &[&str] = &[
    "UNITID",
    "INSTNM",
    "STABBR",
    "CONTROL",
    "PREDDEG",
    "LOCALE",
    "UGDS",
    "RETENTION_FT_4YR",
    "RETENTION_PT_4YR",
    "RETENTION_FT_2YR",
    "RETENTION_PT_2YR",
    "COMPLETION_150_4YR",
    "COMPLETION_150_2YR",
    "TUITIONFEE_IN",
    "PELL_SHARE",
];

/// Columns the validator requires to be present.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "UNITID",
    "INSTNM",
    "STABBR",
    "CONTROL",
    "PREDDEG",
    "UGDS",
    "TUITIONFEE_IN",
    "RETENTION_FT_4YR",
    "PELL_SHARE",
];

/// Rate-typed subset of [`REQUIRED_COLUMNS`], range-checked against [0,1].
pub const REQUIRED_RATE_COLUMNS: &[&str] = &["RETENTION_FT_4YR", "PELL_SHARE"];

/// Columns the validator requires to be non-negative.
pub const NON_NEGATIVE_COLUMNS: &[&str] = &["UGDS", "TUITIONFEE_IN"];

// =============================================================================
// Tests
// =============================================================================
