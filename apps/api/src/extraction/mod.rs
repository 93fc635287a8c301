//! Document Extractor — PDF bytes to plain text.
//!
//! An unreadable PDF and a PDF with no text are the same outcome: `None`.
//! Parsing is CPU-bound and must run inside `tokio::task::spawn_blocking`.

use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

pub trait DocumentExtractor: Send + Sync {
    /// Returns the concatenated page text, or `None` when nothing could be recovered.
    fn extract_text(&self, pdf: &[u8]) -> Option<String>;
}

/// Production extractor backed by `pdf-extract`.
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract_text(&self, pdf: &[u8]) -> Option<String> {
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(pdf)) {
            Ok(Ok(text)) => non_blank(text),
            Ok(Err(e)) => {
                warn!("PDF extraction failed: {e:?}");
                None
            }
            Err(_) => {
                warn!("PDF parser panicked");
                None
            }
        }
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Runs `extractor` off the async runtime and maps "no text" to `AppError::Extraction`.
/// `PdfExtractor` turns parser panics into "no text"; a blocking task that dies
/// anyway is an internal error.
pub async fn extract_document_text(
    extractor: Arc<dyn DocumentExtractor>,
    pdf: Bytes,
) -> Result<String, AppError> {
    let size = pdf.len();
    let text = tokio::task::spawn_blocking(move || extractor.extract_text(&pdf))
        .await
        .context("PDF extraction task did not complete")?
        .and_then(non_blank)
        .ok_or(AppError::Extraction)?;

    debug!("Extracted {} chars from {} byte document", text.len(), size);
    Ok(text)
}
