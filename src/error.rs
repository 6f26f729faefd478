//! Error types for the preparation pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`TableError`] - CSV reading/writing errors
//! - [`ResolveError`] - header resolution errors
//! - [`ValidateError`] - validation check failures
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Table (CSV) Errors
// =============================================================================

/// Errors while reading or writing a CSV table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Failed to read or write a file.
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No header row found.
    #[error("No header row found in CSV")]
    NoHeaders,
}

// =============================================================================
// Header Resolution Errors
// =============================================================================

/// Errors during header resolution.
///
/// Individual unresolved canonical fields are not errors — they are reported
/// through [`crate::resolve::Resolution::missing`] and the corresponding
/// columns are simply omitted. The only fatal condition is a source file in
/// which nothing at all is recognizable.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Not a single canonical field matched the source header.
    #[error("No recognizable columns found in source header")]
    NoFieldsResolved,
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Validation check failures.
///
/// Each variant renders as the single-line reason printed after
/// `VALIDATION FAILED:`.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// One or more required columns are absent (all of them named at once).
    #[error("Missing columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// The table has no rows.
    #[error("No rows after preparation")]
    Empty,

    /// A rate column holds a value outside [0,1] after scale normalization.
    #[error("Column '{column}' contains value {value} outside [0,1]")]
    OutOfRange { column: String, value: f64 },

    /// An absolute-value column holds a negative value.
    #[error("Column '{column}' contains negative value {value}")]
    Negative { column: String, value: f64 },

    /// The file could not be loaded as a table.
    #[error("Cannot load table: {0}")]
    Table(#[from] TableError),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::pipeline::prepare`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Table read/write error.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Header resolution error.
    #[error("Header resolution error: {0}")]
    Resolve(#[from] ResolveError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for header resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result type for validation.
pub type ValidateResult<T> = Result<T, ValidateError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
