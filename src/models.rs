//! Data models and structures
//!
//! Request-scoped value objects passed between the HTTP layer, the fable
//! generator and the illustration loop.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

fn default_num_images() -> usize {
    2
}

/// Caller's story premise. Range checks happen at the HTTP boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FableRequest {
    /// Setting of the story, e.g. `"a floating city"`.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub world_description: String,
    /// Protagonist, e.g. `"a mouse inventor"`.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub main_character: String,
    /// Reader age in years (1-12).
    #[validate(range(min = 1, max = 12))]
    #[schema(minimum = 1, maximum = 12)]
    pub age: u32,
    /// Number of illustrations (1-4, default `2`).
    #[serde(default = "default_num_images")]
    #[validate(range(min = 1, max = 4))]
    #[schema(minimum = 1, maximum = 4, default = 2)]
    pub num_images: usize,
}

impl FableRequest {
    pub fn new(
        world_description: impl Into<String>,
        main_character: impl Into<String>,
        age: u32,
        num_images: usize,
    ) -> Self {
        Self {
            world_description: world_description.into(),
            main_character: main_character.into(),
            age,
            num_images,
        }
    }

    /// Run the derive checks plus the ones `validator` cannot express.
    pub fn check(&self) -> crate::Result<()> {
        self.validate()
            .map_err(|e| crate::Error::Validation(e.to_string()))?;

        if self.world_description.trim().is_empty() {
            return Err(crate::Error::Validation(
                "world_description: must not be blank".to_string(),
            ));
        }
        if self.main_character.trim().is_empty() {
            return Err(crate::Error::Validation(
                "main_character: must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Structured output of the text model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub title: Option<String>,
    pub fable: String,
    pub moral: String,
    pub image_prompts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Illustration {
    pub prompt: String,
    /// Base64-encoded image bytes.
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FableResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fable: String,
    pub moral: String,
    pub illustrations: Vec<Illustration>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub openai_key_configured: bool,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
