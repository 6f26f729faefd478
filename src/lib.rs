//! # Scorecard-prep - subset preparation and validation for Scorecard CSVs
//!
//! Prepares a subset of a raw College Scorecard export into a clean,
//! presentation-ready CSV, and independently validates the result before it
//! is handed to visualization tooling.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Raw CSV   │────▶│  Resolver   │────▶│  Transform  │────▶│ Subset CSV  │
//! │ (any vintage)│    │ (canonical) │     │(filter+norm)│     │  (ordered)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │
//!                                                             ┌──────▼──────┐
//!                                                             │  Validator  │
//!                                                             │ (pass/fail) │
//!                                                             └─────────────┘
//! ```
//!
//! The two stages share no runtime state; they communicate only through the
//! flat file. Each invocation is a single synchronous pass with the whole
//! table in memory.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scorecard_prep::{prepare, validate_file};
//! use std::path::Path;
//!
//! let states = vec!["MD".to_string(), "DC".to_string(), "VA".to_string()];
//! let summary = prepare(
//!     Path::new("Most_Recent_Cohorts.csv"),
//!     Path::new("data/scorecard_subset.csv"),
//!     &states,
//! )?;
//! println!("wrote {} rows", summary.rows);
//!
//! let report = validate_file(Path::new("data/scorecard_subset.csv"))?;
//! println!("validated {} rows", report.rows);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Canonical field catalog and static lookup tables
//! - [`table`] - In-memory table with CSV reading/writing
//! - [`resolve`] - Header resolution against the canonical catalog
//! - [`normalize`] - Rate rescaling, relabeling, numeric coercion
//! - [`transform`] - Row filter and pipeline orchestration
//! - [`validation`] - Output validation
//! - [`report`] - Console progress reporting

// Core modules
pub mod error;
pub mod models;

// Table I/O
pub mod table;

// Header resolution
pub mod resolve;

// Value normalization
pub mod normalize;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Console reporting
pub mod report;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{PipelineError, ResolveError, TableError, ValidateError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    field, labels_for, CanonicalField, FieldKind, CANONICAL_FIELDS, DEFAULT_REGIONS,
    DISPLAY_ORDER, REQUIRED_COLUMNS,
};

// =============================================================================
// Re-exports - Table
// =============================================================================

pub use table::{decode_content, detect_encoding, Table};

// =============================================================================
// Re-exports - Header Resolution
// =============================================================================

pub use resolve::{normalize_header, resolve_headers, Resolution};

// =============================================================================
// Re-exports - Normalization
// =============================================================================

pub use normalize::{clamp_unit, detect_scale, parse_number, rescale, Scale};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{filter_regions, prepare, region_set, FilterOutcome, PrepareSummary};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate_file, validate_table, ValidationReport};
