//! Request orchestration: fable text first, then the illustration chain.

use crate::ai::{ChatService, ImageGenerationService, OpenAiChatClient, OpenAiImageClient};
use crate::config::Config;
use crate::fable::FableGenerator;
use crate::illustrate::IllustrationGenerator;
use crate::image::{DebugImageStore, ImageStore};
use crate::models::{FableRequest, FableResponse};
use crate::{Error, Result};
use tracing::info;

/// Runs one fable request end to end. Holds no per-request state, so a
/// single instance is shared by every HTTP handler.
pub struct App {
    fables: FableGenerator,
    illustrations: IllustrationGenerator,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub chat: Box<dyn ChatService>,
    pub image_gen: Box<dyn ImageGenerationService>,
    pub image_store: Box<dyn ImageStore>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            fables: FableGenerator::new(services.chat),
            illustrations: IllustrationGenerator::new(services.image_gen, services.image_store),
        }
    }

    /// Build the OpenAI-backed app. Fails with [`Error::Configuration`] when
    /// no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| Error::Configuration("OpenAI API key not configured".to_string()))?;

        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        info!("Chat provider: OpenAI (model: {})", config.chat_model);
        let chat = OpenAiChatClient::new_with_client(
            api_key.clone(),
            config.chat_model.clone(),
            http_client.clone(),
        )
        .with_base_url(config.openai_base_url.clone());

        info!(
            "Image provider: OpenAI (model: {}, size: {})",
            config.image_model, config.image_size
        );
        let image_gen = OpenAiImageClient::new_with_client(
            api_key,
            config.image_model.clone(),
            config.image_size.clone(),
            http_client,
        )
        .with_base_url(config.openai_base_url.clone());

        let image_store = DebugImageStore::new(&config.output_dir);
        info!(
            "Debug images will be written to {}",
            image_store.output_dir().display()
        );

        Ok(Self::with_services(AppServices {
            chat: Box::new(chat),
            image_gen: Box::new(image_gen),
            image_store: Box::new(image_store),
        }))
    }

    /// Generate a fable and its illustrations. Errors from either provider
    /// propagate unchanged and no partial response is produced.
    pub async fn handle(&self, request: &FableRequest) -> Result<FableResponse> {
        info!(
            "Generating fable: age={}, num_images={}, character={:?}",
            request.age, request.num_images, request.main_character
        );

        let generation = self
            .fables
            .generate_fable(
                &request.world_description,
                &request.main_character,
                request.age,
                request.num_images,
            )
            .await?;

        let illustrations = self
            .illustrations
            .generate_illustrations(&generation.image_prompts)
            .await?;

        info!("Fable complete with {} illustrations", illustrations.len());

        Ok(FableResponse {
            title: generation.title,
            fable: generation.fable,
            moral: generation.moral,
            illustrations,
        })
    }
}
