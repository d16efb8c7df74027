use super::{ChatService, ImageGenerationService, StructuredPrompt};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory [`ChatService`]. Clones share state, so a clone kept by a test
/// can inspect calls made through the boxed original.
#[derive(Clone)]
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<StructuredPrompt>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    /// Every call fails with [`Error::AiProvider`] carrying `message`.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.lock().unwrap() = Some(message.into());
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<StructuredPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn generate_structured(&self, prompt: &StructuredPrompt) -> Result<String> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.clone());
        let count = prompts.len();

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::AiProvider(message));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(serde_json::json!({
                "title": "The Mock Fable",
                "fable": "Once upon a time, a mock told a story.",
                "moral": "Tests keep us honest.",
                "image_prompts": ["A mock in a meadow"]
            })
            .to_string())
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

/// One recorded call to [`MockImageGenerationClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCall {
    pub prompt: String,
    pub reference: Option<Vec<u8>>,
}

/// In-memory [`ImageGenerationService`] recording every prompt and reference.
#[derive(Clone)]
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<Vec<u8>>>>,
    calls: Arc<Mutex<Vec<ImageCall>>>,
    fail_on_call: Arc<Mutex<Option<usize>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on_call: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Fail the zero-based `index`-th call with [`Error::ImageGeneration`].
    pub fn with_failure_on_call(self, index: usize) -> Self {
        *self.fail_on_call.lock().unwrap() = Some(index);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<ImageCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str, reference: Option<&[u8]>) -> Result<Vec<u8>> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(ImageCall {
            prompt: prompt.to_string(),
            reference: reference.map(<[u8]>::to_vec),
        });

        if *self.fail_on_call.lock().unwrap() == Some(index) {
            return Err(Error::ImageGeneration(format!(
                "Mock rejected prompt {}: {}",
                index, prompt
            )));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Tiny valid PNG
            Ok(vec![
                0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
                0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
                0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
                0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49,
                0x44, 0x41, // IDAT chunk
                0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2,
                0x25, 0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
                0x44, 0xAE, 0x42, 0x60, 0x82,
            ])
        } else {
            Ok(responses[index % responses.len()].clone())
        }
    }
}
