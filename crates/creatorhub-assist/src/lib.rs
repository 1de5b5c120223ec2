//! Best-effort AI helpers for post drafting, reply suggestions and voice
//! transcription.
//!
//! Each capability is a trait so the store and handlers can be exercised
//! without network access. [`Assistant`] wraps the capabilities and turns
//! every failure into a fixed user-visible fallback.

pub mod assistant;
pub mod error;
pub mod gemini;

use async_trait::async_trait;

pub use assistant::Assistant;
pub use error::AssistError;
pub use gemini::GeminiClient;

/// Free-form text generation from a prompt.
#[async_trait]
pub trait Drafter: Send + Sync {
    async fn draft(&self, prompt: &str) -> Result<String, AssistError>;
}

/// Short reply suggestions from a rendered conversation transcript.
#[async_trait]
pub trait ReplySuggester: Send + Sync {
    async fn suggest(&self, transcript: &str) -> Result<Vec<String>, AssistError>;
}

/// Speech to text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, AssistError>;
}
