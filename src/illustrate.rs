//! Sequential illustration generation with style-reference chaining.
//!
//! The first prompt is generated from text alone. Each later prompt is sent
//! with the image generated immediately before it as a style reference, so
//! the loop cannot run in parallel.

use crate::ai::ImageGenerationService;
use crate::image::ImageStore;
use crate::models::Illustration;
use crate::Result;
use base64::Engine as _;
use tracing::{error, info};

pub struct IllustrationGenerator {
    image_gen: Box<dyn ImageGenerationService>,
    store: Box<dyn ImageStore>,
}

impl IllustrationGenerator {
    pub fn new(image_gen: Box<dyn ImageGenerationService>, store: Box<dyn ImageStore>) -> Self {
        Self { image_gen, store }
    }

    /// Generate one illustration per prompt, in order. A failure at any
    /// prompt aborts the batch and nothing is returned.
    pub async fn generate_illustrations(&self, image_prompts: &[String]) -> Result<Vec<Illustration>> {
        let mut illustrations = Vec::with_capacity(image_prompts.len());
        let mut previous: Option<Vec<u8>> = None;

        for (index, prompt) in image_prompts.iter().enumerate() {
            let image = self
                .image_gen
                .generate_image(prompt, previous.as_deref())
                .await
                .map_err(|e| {
                    error!("Illustration {} failed: {}", index, e);
                    e
                })?;

            let path = self.store.save_image(index, &image).await?;
            info!(
                "Generated illustration {}/{} ({} bytes, reference: {}) saved at {}",
                index + 1,
                image_prompts.len(),
                image.len(),
                previous.is_some(),
                path.display()
            );

            illustrations.push(Illustration {
                prompt: prompt.clone(),
                image: base64::engine::general_purpose::STANDARD.encode(&image),
            });
            previous = Some(image);
        }

        Ok(illustrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockImageGenerationClient;
    use crate::image::MockImageStore;
    use crate::Error;

    fn prompts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn b64(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[tokio::test]
    async fn test_each_image_references_its_predecessor() {
        let image_gen = MockImageGenerationClient::new()
            .with_image_response(b"IMG0".to_vec())
            .with_image_response(b"IMG1".to_vec())
            .with_image_response(b"IMG2".to_vec());
        let probe = image_gen.clone();
        let generator =
            IllustrationGenerator::new(Box::new(image_gen), Box::new(MockImageStore::new()));

        let illustrations = generator
            .generate_illustrations(&prompts(&["a", "b", "c"]))
            .await
            .unwrap();

        let calls = probe.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].reference, None);
        assert_eq!(calls[1].reference.as_deref(), Some(&b"IMG0"[..]));
        assert_eq!(calls[2].reference.as_deref(), Some(&b"IMG1"[..]));

        let images: Vec<&str> = illustrations.iter().map(|i| i.image.as_str()).collect();
        assert_eq!(images, vec![b64(b"IMG0"), b64(b"IMG1"), b64(b"IMG2")]);
    }

    #[tokio::test]
    async fn test_illustrations_keep_prompt_order() {
        let generator = IllustrationGenerator::new(
            Box::new(MockImageGenerationClient::new()),
            Box::new(MockImageStore::new()),
        );

        let illustrations = generator
            .generate_illustrations(&prompts(&["first", "second"]))
            .await
            .unwrap();

        let order: Vec<&str> = illustrations.iter().map(|i| i.prompt.as_str()).collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_every_image_is_persisted_by_index() {
        let image_gen = MockImageGenerationClient::new()
            .with_image_response(b"A".to_vec())
            .with_image_response(b"B".to_vec());
        let store = MockImageStore::new();
        let store_probe = store.clone();
        let generator = IllustrationGenerator::new(Box::new(image_gen), Box::new(store));

        generator
            .generate_illustrations(&prompts(&["a", "b"]))
            .await
            .unwrap();

        assert_eq!(
            store_probe.saved(),
            vec![(0, b"A".to_vec()), (1, b"B".to_vec())]
        );
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_prompts() {
        let image_gen = MockImageGenerationClient::new().with_failure_on_call(1);
        let probe = image_gen.clone();
        let store = MockImageStore::new();
        let store_probe = store.clone();
        let generator = IllustrationGenerator::new(Box::new(image_gen), Box::new(store));

        let err = generator
            .generate_illustrations(&prompts(&["a", "b", "c"]))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ImageGeneration(_)));
        assert_eq!(probe.get_call_count(), 2);
        assert_eq!(store_probe.get_save_count(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let generator = IllustrationGenerator::new(
            Box::new(MockImageGenerationClient::new()),
            Box::new(MockImageStore::new().with_failure(true)),
        );

        let err = generator
            .generate_illustrations(&prompts(&["a"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_empty_prompt_list_makes_no_calls() {
        let image_gen = MockImageGenerationClient::new();
        let probe = image_gen.clone();
        let generator =
            IllustrationGenerator::new(Box::new(image_gen), Box::new(MockImageStore::new()));

        let illustrations = generator.generate_illustrations(&[]).await.unwrap();

        assert!(illustrations.is_empty());
        assert_eq!(probe.get_call_count(), 0);
    }
}
