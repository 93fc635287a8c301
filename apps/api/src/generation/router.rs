//! Prompt Router — the single entry point from request kinds to generated text.
//!
//! Flow: render(kind, fields) → one GenerationClient::submit → text, unchanged.
//! No caching, no retry: every call is exactly one provider request.

use std::sync::Arc;

use tracing::{info, warn};

use crate::chat::ChatHistory;
use crate::errors::AppError;
use crate::generation::kinds::RequestKind;
use crate::generation::prompts::CHAT_TRANSCRIPT_HEADER;
use crate::generation::render::{render, FieldBag, GenerationRequest};
use crate::llm_client::{ContentPart, GenerationClient};

#[derive(Clone)]
pub struct PromptRouter {
    client: Arc<dyn GenerationClient>,
}

impl PromptRouter {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Renders `fields` for `kind` and submits the result.
    /// Chat goes through `chat` with an empty history so a blank message is never sent.
    pub async fn generate(&self, kind: RequestKind, fields: &FieldBag) -> Result<String, AppError> {
        if kind == RequestKind::Chat {
            let message = fields.get("message").unwrap_or_default();
            return self.chat(message, &ChatHistory::new()).await;
        }

        let request = render(kind, fields)?;
        self.submit(request).await
    }

    /// Same as `generate`, for callers holding a wire tag rather than a `RequestKind`.
    /// An unknown tag fails before anything is rendered or submitted.
    pub async fn generate_tagged(
        &self,
        tag: &str,
        fields: &FieldBag,
    ) -> Result<(RequestKind, String), AppError> {
        let kind: RequestKind = tag.parse()?;
        let text = self.generate(kind, fields).await?;
        Ok((kind, text))
    }

    /// Chat with prior turns placed between the persona instruction and the new message.
    /// A blank message fails before anything is submitted.
    pub async fn chat(&self, message: &str, history: &ChatHistory) -> Result<String, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::Validation("message cannot be empty".to_string()));
        }

        let mut fields = FieldBag::new();
        fields.insert("message", message);

        let mut request = render(RequestKind::Chat, &fields)?;
        if let Some(transcript) = history.transcript(CHAT_TRANSCRIPT_HEADER) {
            request = request.with_context_part(ContentPart::text(transcript));
        }

        info!("Chat request with {} prior turns", history.len());
        self.submit(request).await
    }

    async fn submit(&self, request: GenerationRequest) -> Result<String, AppError> {
        let kind = request.kind();
        info!(
            "Submitting {} request ({} attachments, {} instruction chars)",
            kind,
            request.attachments().len(),
            request.instruction().len()
        );

        match self.client.submit(request.parts()).await {
            Ok(generated) => Ok(generated.text),
            Err(e) => {
                warn!("Generation for {} failed: {}", kind, e);
                Err(AppError::Generation(e))
            }
        }
    }
}
