//! Header resolution: mapping canonical fields onto raw source columns.
//!
//! Raw Scorecard files spell their columns unpredictably (`PCT_PELL`,
//! `pctpell`, `PCT-Pell`). Both sides of the comparison are normalized by
//! lower-casing and stripping every non-alphanumeric character, so all such
//! spellings are equivalent. For each canonical field the variant list is
//! tried in declared priority order, then the canonical name itself; the
//! first raw header that matches wins.
//!
//! A field with no match is recorded as missing and its column is omitted
//! downstream — only a header in which *nothing* resolves is fatal.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::error::{ResolveError, ResolveResult};
use crate::models::{CanonicalField, CANONICAL_FIELDS};

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]").unwrap());

/// Normalize a header name for comparison.
pub fn normalize_header(name: &str) -> String {
    NON_ALNUM.replace_all(&name.to_lowercase(), "").into_owned()
}

/// Result of resolving a raw header against the canonical field catalog.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Canonical name → matching raw header, in catalog order. Each
    /// canonical field appears at most once, so the derived table can never
    /// hold duplicate canonical columns.
    pub resolved: Vec<(&'static str, String)>,
    /// Canonical fields with no match in the source, in catalog order.
    pub missing: Vec<&'static str>,
}

impl Resolution {
    /// The raw header resolved for a canonical field, if any.
    pub fn raw_name(&self, canonical: &str) -> Option<&str> {
        self.resolved
            .iter()
            .find(|(name, _)| *name == canonical)
            .map(|(_, raw)| raw.as_str())
    }

    /// Whether a canonical field was resolved.
    pub fn is_resolved(&self, canonical: &str) -> bool {
        self.raw_name(canonical).is_some()
    }
}

/// Resolve the canonical field catalog against a raw header.
///
/// Fails only if zero canonical fields match; partial misses are reported
/// through [`Resolution::missing`].
pub fn resolve_headers(headers: &[String]) -> ResolveResult<Resolution> {
    // First raw header wins when two normalize identically.
    let mut by_normalized: HashMap<String, &str> = HashMap::new();
    for header in headers {
        let key = normalize_header(header);
        if !key.is_empty() {
            by_normalized.entry(key).or_insert(header.as_str());
        }
    }

    let mut resolved = Vec::new();
    let mut missing = Vec::new();
    for field in CANONICAL_FIELDS {
        match find_match(field, &by_normalized) {
            Some(raw) => resolved.push((field.name, raw.to_string())),
            None => missing.push(field.name),
        }
    }

    if resolved.is_empty() {
        return Err(ResolveError::NoFieldsResolved);
    }
    Ok(Resolution { resolved, missing })
}

/// Try a field's variants in priority order, then its canonical name.
fn find_match<'a>(
    field: &CanonicalField,
    by_normalized: &HashMap<String, &'a str>,
) -> Option<&'a str> {
    field
        .variants
        .iter()
        .chain(std::iter::once(&field.name))
        .find_map(|candidate| by_normalized.get(&normalize_header(candidate)).copied())
}
