//! Concord: reconcile portal-extracted tables against local reference files.
//!
//! Concord takes the rendered rows of a filtered results table (captured from
//! a data portal UI by an external extractor), normalizes them together with a
//! delimited reference file onto a common schema, and produces a structured
//! comparison: a pass confirmation, or a discrepancy report with provenance.
//!
//! # Core principles
//!
//! - **Request-scoped**: datasets are built fresh per run and discarded with
//!   the result; nothing persists beyond an optional report file.
//! - **Extraction is a collaborator**: browser driving lives behind the
//!   [`TableExtractor`] trait; the engine only sees trimmed text cells.
//! - **Fail is not an error**: a legitimate data discrepancy is a normal
//!   [`ComparisonResult::Fail`] outcome, never an `Err`.
//!
//! # Example
//!
//! ```no_run
//! use concord::{CaptureExtractor, Reconciler};
//!
//! let extractor = CaptureExtractor::from_file("portal_capture.tsv").unwrap();
//! let result = Reconciler::new()
//!     .validate(&extractor, "Boxer", "cases.tsv")
//!     .unwrap();
//!
//! println!("pass: {}", result.is_pass());
//! ```

pub mod error;
pub mod extract;
pub mod input;
pub mod recon;
pub mod schema;

pub use error::{ConcordError, Result};
pub use extract::{CaptureExtractor, ExtractorConfig, TableExtractor};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use recon::{
    CompareStrategy, ComparisonResult, Discrepancy, Provenance, ReconConfig, Reconciler,
    ReportRow, ReportTable, ValidationResponse,
};
pub use schema::{portal_columns, Dataset};
