use std::sync::Arc;

use crate::document::store::DocumentStore;
use crate::layout::{PageDimensions, PatternConfig};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable document store. Default: FsDocumentStore rooted at `config.documents_dir`.
    pub store: Arc<dyn DocumentStore>,
    /// Colours, strokes and the Grid-mode alignment correction.
    pub pattern_config: Arc<PatternConfig>,
    /// Writing area used when a request does not bring its own page size.
    pub page: PageDimensions,
}
