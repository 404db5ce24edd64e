//! The table-extractor seam between Concord and the portal.

mod capture;
mod provider;

pub use capture::CaptureExtractor;
pub use provider::{ExtractorConfig, TableExtractor};
