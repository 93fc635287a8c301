// Generation Engine
// Implements: template table, request rendering, prompt routing, caller-facing operations.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod handlers;
pub mod kinds;
pub mod operations;
pub mod prompts;
pub mod render;
pub mod router;
