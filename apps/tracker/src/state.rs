use std::sync::Arc;

use crate::config::Config;
use crate::extraction::JobExtractor;
use crate::jobs::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    /// Pluggable URL extractor. Default: `LlmJobExtractor`.
    pub extractor: Arc<dyn JobExtractor>,
    pub config: Config,
}
