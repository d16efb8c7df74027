//! AI service integration for fable text and illustration generation
//!
//! The orchestration code only sees the two traits below; the OpenAI adapters
//! implement them over HTTP and the mocks implement them in memory.

pub mod mime;
pub mod mock;
pub mod openai;

pub use mock::{MockChatClient, MockImageGenerationClient};
pub use openai::{OpenAiChatClient, OpenAiImageClient};

use crate::Result;
use async_trait::async_trait;

/// A two-part instruction plus the JSON Schema the answer must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPrompt {
    pub system: String,
    pub user: String,
    pub schema_name: String,
    pub schema: serde_json::Value,
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Returns the raw JSON text produced by the model; callers deserialize it.
    async fn generate_structured(&self, prompt: &StructuredPrompt) -> Result<String>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Generate one image. With `reference`, the provider is asked to match
    /// that image's style. Returns decoded image bytes.
    async fn generate_image(&self, prompt: &str, reference: Option<&[u8]>) -> Result<Vec<u8>>;
}
