//! Reconciliation engine: structural diff of two normalized tables.

mod engine;
mod report;

pub use engine::{CompareStrategy, ComparisonResult, ReconConfig, Reconciler};
pub use report::{Discrepancy, Provenance, ReportRow, ReportTable, ValidationResponse};
