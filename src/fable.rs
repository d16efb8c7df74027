//! Fable text generation through a structured-output chat model.

use crate::ai::{ChatService, StructuredPrompt};
use crate::models::GenerationResult;
use crate::{prompts, Error, Result};
use serde_json::{json, Value};
use tracing::{debug, info};

const SCHEMA_NAME: &str = "fable_with_illustrations";

/// JSON Schema of the answer requested from the text model.
pub fn generation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": ["string", "null"],
                "description": "Short title of the fable"
            },
            "fable": {
                "type": "string",
                "description": "The full fable text"
            },
            "moral": {
                "type": "string",
                "description": "The moral of the fable in one sentence"
            },
            "image_prompts": {
                "type": "array",
                "items": { "type": "string" },
                "description": "One illustration prompt per key scene, in story order"
            }
        },
        "required": ["title", "fable", "moral", "image_prompts"],
        "additionalProperties": false
    })
}

pub struct FableGenerator {
    chat: Box<dyn ChatService>,
}

impl FableGenerator {
    pub fn new(chat: Box<dyn ChatService>) -> Self {
        Self { chat }
    }

    pub async fn generate_fable(
        &self,
        world_description: &str,
        main_character: &str,
        age: u32,
        num_images: usize,
    ) -> Result<GenerationResult> {
        let prompt = StructuredPrompt {
            system: prompts::FABLE_SYSTEM.to_string(),
            user: prompts::render_fable_prompt(age, world_description, main_character, num_images)?,
            schema_name: SCHEMA_NAME.to_string(),
            schema: generation_schema(),
        };

        let raw = self.chat.generate_structured(&prompt).await?;
        debug!("Raw fable response ({} chars)", raw.len());

        let result = parse_generation(&raw)?;
        if result.image_prompts.len() != num_images {
            return Err(Error::PromptCountMismatch {
                expected: num_images,
                actual: result.image_prompts.len(),
            });
        }

        info!(
            "Generated fable {:?} with moral {:?} and {} image prompts",
            result.title.as_deref().unwrap_or("<untitled>"),
            result.moral,
            result.image_prompts.len()
        );
        Ok(result)
    }
}

/// Deserialize the model's structured output, rejecting empty fields.
pub fn parse_generation(raw: &str) -> Result<GenerationResult> {
    let result: GenerationResult = serde_json::from_str(raw.trim())
        .map_err(|e| Error::Parse(format!("Model output is not a valid fable: {}", e)))?;

    if result.fable.trim().is_empty() {
        return Err(Error::Parse("Model returned an empty fable".to_string()));
    }
    if result.moral.trim().is_empty() {
        return Err(Error::Parse("Model returned an empty moral".to_string()));
    }
    if let Some(index) = result.image_prompts.iter().position(|p| p.trim().is_empty()) {
        return Err(Error::Parse(format!("Image prompt {} is empty", index)));
    }

    Ok(result)
}
