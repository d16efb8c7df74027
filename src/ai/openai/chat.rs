use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, JsonSchema, ResponseFormat};
use crate::ai::{ChatService, StructuredPrompt};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const TEMPERATURE: f32 = 0.8;
const MAX_COMPLETION_TOKENS: u32 = 2000;

pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(120), client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ChatService for OpenAiChatClient {
    async fn generate_structured(&self, prompt: &StructuredPrompt) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::new("system", prompt.system.clone()),
                ChatMessage::new("user", prompt.user.clone()),
            ],
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            temperature: Some(TEMPERATURE),
            response_format: Some(ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchema {
                    name: prompt.schema_name.clone(),
                    schema: prompt.schema.clone(),
                    strict: true,
                },
            }),
        };

        let response = self.http.chat_completion(request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No choices in OpenAI chat response".to_string()))?;

        if let Some(refusal) = choice.message.refusal {
            tracing::warn!("Model refused the request: {}", refusal);
            return Err(Error::AiProvider(format!("Model refused: {}", refusal)));
        }

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Chat completion stopped at the token limit; output may be truncated");
        }

        choice
            .message
            .content
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))
    }
}
