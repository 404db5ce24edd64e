//! Extractor trait and configuration.

use std::time::Duration;

use crate::error::Result;

/// Configuration shared by extractor implementations.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// How long to wait for the categorical filter control to appear.
    pub filter_timeout: Duration,
    /// How long to wait for the filtered results table to render.
    pub table_timeout: Duration,
    /// Leave the rendering surface open for manual inspection after
    /// extraction. Implementations that have nothing to keep open ignore it;
    /// reconciliation never depends on this flag.
    pub keep_open: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            filter_timeout: Duration::from_secs(5),
            table_timeout: Duration::from_secs(10),
            keep_open: false,
        }
    }
}

impl ExtractorConfig {
    /// Keep the rendering surface open for manual review.
    pub fn with_keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open = keep_open;
        self
    }

    /// Override the results-table deadline.
    pub fn with_table_timeout(mut self, timeout: Duration) -> Self {
        self.table_timeout = timeout;
        self
    }
}

/// Source of rendered portal table rows.
///
/// Implementations apply the categorical filter named by `filter_value`, wait
/// for the results table to render (bounded by [`ExtractorConfig`] deadlines,
/// surfacing expiry as [`crate::ConcordError::Timeout`]), and yield each row
/// as trimmed text cells with the leading selection-control cell already
/// discarded. Rows are unlabeled; callers align them to the expected schema.
pub trait TableExtractor: Send + Sync {
    /// Implementation name, for display.
    fn name(&self) -> &str;

    /// The extractor's configuration.
    fn config(&self) -> &ExtractorConfig;

    /// Extract the rendered rows for one filter value.
    fn extract(&self, filter_value: &str) -> Result<Vec<Vec<String>>>;
}
