use std::sync::Arc;

use crate::extraction::DocumentExtractor;
use crate::generation::router::PromptRouter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub router: PromptRouter,
    /// Pluggable document extractor. Default: PdfExtractor.
    pub extractor: Arc<dyn DocumentExtractor>,
    /// Request body ceiling for resume uploads.
    pub max_upload_bytes: usize,
}
