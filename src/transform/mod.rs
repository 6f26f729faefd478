//! Transformation stage: row filtering and pipeline orchestration.

pub mod filter;
pub mod pipeline;

pub use filter::{filter_regions, region_set, FilterOutcome};
pub use pipeline::{prepare, PrepareSummary};
