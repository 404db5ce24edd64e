//! File-backed extractor over a previously captured portal table.

use std::path::Path;

use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig};
use crate::schema::PORTAL_BREED_COLUMN;

use super::provider::{ExtractorConfig, TableExtractor};

/// Extractor that replays a capture file instead of driving a browser.
///
/// A capture is a delimited snapshot of the portal's results table, written
/// by `concord capture` (or any browser driver implementing the same
/// contract). `extract` reproduces the portal's filter behavior: when the
/// capture carries a breed column, only rows matching the filter value are
/// returned; a capture without one is assumed to be pre-filtered.
pub struct CaptureExtractor {
    table: DataTable,
    breed_position: Option<usize>,
    config: ExtractorConfig,
}

impl CaptureExtractor {
    /// Load a capture file. The snapshot carries a header row.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let parser = Parser::new();
        let (table, _metadata) = parser.parse_file(path)?;
        Ok(Self::from_table(table))
    }

    /// Load a capture file with explicit parser settings.
    pub fn from_file_with_config(
        path: impl AsRef<Path>,
        parser_config: ParserConfig,
        config: ExtractorConfig,
    ) -> Result<Self> {
        let parser = Parser::with_config(parser_config);
        let (table, _metadata) = parser.parse_file(path)?;
        Ok(Self::from_table(table).with_extractor_config(config))
    }

    /// Wrap an already-parsed capture table.
    pub fn from_table(table: DataTable) -> Self {
        let breed_position = table.position_of(PORTAL_BREED_COLUMN);
        Self {
            table,
            breed_position,
            config: ExtractorConfig::default(),
        }
    }

    /// Replace the extractor configuration.
    pub fn with_extractor_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }
}

impl TableExtractor for CaptureExtractor {
    fn name(&self) -> &str {
        "capture"
    }

    fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn extract(&self, filter_value: &str) -> Result<Vec<Vec<String>>> {
        let rows = self
            .table
            .rows
            .iter()
            .filter(|row| match self.breed_position {
                Some(idx) => row
                    .get(idx)
                    .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(filter_value)),
                None => true,
            })
            .map(|row| row.iter().map(|cell| cell.trim().to_string()).collect())
            .collect();

        Ok(rows)
    }
}
