//! Application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;

use concord::{ReconConfig, TableExtractor};

/// Shared server context. Everything here is immutable per request; each
/// validation call builds and discards its own datasets, so concurrent
/// requests never share table state.
#[derive(Clone)]
pub struct AppState {
    /// Directory for uploaded reference files and report artifacts.
    pub upload_dir: PathBuf,
    /// Extractor backing the portal side of every comparison.
    pub extractor: Arc<dyn TableExtractor>,
    /// Reconciliation configuration applied to every request.
    pub config: ReconConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        upload_dir: PathBuf,
        extractor: Arc<dyn TableExtractor>,
        config: ReconConfig,
    ) -> Self {
        Self {
            upload_dir,
            extractor,
            config,
        }
    }
}
