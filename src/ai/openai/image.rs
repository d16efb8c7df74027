use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::mime::ImageFormat;
use crate::ai::ImageGenerationService;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
    size: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String, size: String) -> Self {
        Self::new_with_client(api_key, model, size, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        size: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(180), client),
            model,
            size,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }

    async fn generate(&self, prompt: &str) -> Result<ImageGenerationResponse> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.size.clone(),
        };

        self.http.post("/v1/images/generations", &request).await
    }

    async fn edit(&self, prompt: &str, reference: &[u8]) -> Result<ImageGenerationResponse> {
        let format = ImageFormat::sniff(reference);
        let image = Part::bytes(reference.to_vec())
            .file_name(format!("reference.{}", format.extension()))
            .mime_str(format.mime_type())?;

        let form = Form::new()
            .text("model", self.model.clone())
            .text("prompt", prompt.to_string())
            .text("n", "1")
            .text("size", self.size.clone())
            .part("image", image);

        self.http.post_multipart("/v1/images/edits", form).await
    }

    async fn decode_response(&self, response: ImageGenerationResponse) -> Result<Vec<u8>> {
        let image_data = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::ImageGeneration("No image data in OpenAI response".to_string()))?;

        if let Some(b64_json) = image_data.b64_json {
            base64::engine::general_purpose::STANDARD
                .decode(b64_json.trim())
                .map_err(|e| {
                    Error::ImageGeneration(format!("Failed to decode base64 image: {}", e))
                })
        } else if let Some(url) = image_data.url {
            let response = self
                .http
                .client
                .get(&url)
                .timeout(self.http.timeout)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(Error::ImageGeneration(format!(
                    "Image download failed (status {})",
                    response.status()
                )));
            }
            Ok(response.bytes().await?.to_vec())
        } else {
            Err(Error::ImageGeneration(
                "No image data (neither base64 nor URL) in response".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_image(&self, prompt: &str, reference: Option<&[u8]>) -> Result<Vec<u8>> {
        let response = match reference {
            Some(reference) => {
                tracing::debug!(
                    "Requesting image edit with {} byte reference",
                    reference.len()
                );
                self.edit(prompt, reference).await
            }
            None => {
                tracing::debug!("Requesting image generation without reference");
                self.generate(prompt).await
            }
        }
        .map_err(|e| match e {
            Error::AiProvider(msg) => Error::ImageGeneration(msg),
            other => other,
        })?;

        self.decode_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> OpenAiImageClient {
        OpenAiImageClient::new(
            "key".to_string(),
            "gpt-image-1".to_string(),
            "1024x1024".to_string(),
        )
        .with_base_url(server.uri())
    }

    fn b64_body(bytes: &[u8]) -> serde_json::Value {
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        serde_json::json!({ "data": [{ "b64_json": b64 }] })
    }

    #[tokio::test]
    async fn test_generate_without_reference_uses_generations_endpoint() {
        let server = MockServer::start().await;
        let fake_image = vec![0x89, 0x50, 0x4E, 0x47];

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-image-1",
                "prompt": "a mouse in a floating city",
                "size": "1024x1024"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(b64_body(&fake_image)))
            .expect(1)
            .mount(&server)
            .await;

        let result = make_client(&server)
            .generate_image("a mouse in a floating city", None)
            .await
            .unwrap();
        assert_eq!(result, fake_image);
    }

    #[tokio::test]
    async fn test_generate_with_reference_uses_edits_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/edits"))
            .and(body_string_contains("the mouse flies home"))
            .and(body_string_contains("REFERENCE-BYTES"))
            .respond_with(ResponseTemplate::new(200).set_body_json(b64_body(b"IMGB")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(b64_body(b"WRONG")))
            .expect(0)
            .mount(&server)
            .await;

        let result = make_client(&server)
            .generate_image("the mouse flies home", Some(&b"REFERENCE-BYTES"[..]))
            .await
            .unwrap();
        assert_eq!(result, b"IMGB");
    }

    #[tokio::test]
    async fn test_generate_image_downloads_url_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "url": format!("{}/files/image.png", server.uri()) }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/image.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGDATA".to_vec()))
            .mount(&server)
            .await;

        let result = make_client(&server).generate_image("scene", None).await.unwrap();
        assert_eq!(result, b"PNGDATA");
    }

    #[tokio::test]
    async fn test_empty_data_is_image_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
            .mount(&server)
            .await;

        let err = make_client(&server).generate_image("scene", None).await.unwrap_err();
        assert!(matches!(err, Error::ImageGeneration(_)));
    }

    #[tokio::test]
    async fn test_invalid_base64_is_image_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "b64_json": "!!not base64!!" }]
            })))
            .mount(&server)
            .await;

        let err = make_client(&server).generate_image("scene", None).await.unwrap_err();
        assert!(matches!(err, Error::ImageGeneration(_)));
    }

    #[tokio::test]
    async fn test_rejected_prompt_is_image_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(400).set_body_string("content policy violation"))
            .mount(&server)
            .await;

        let err = make_client(&server).generate_image("scene", None).await.unwrap_err();
        assert!(matches!(err, Error::ImageGeneration(ref m) if m.contains("content policy")));
    }

    #[tokio::test]
    async fn test_stalled_url_download_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "url": format!("{}/files/slow.png", server.uri()) }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/slow.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"PNGDATA".to_vec())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = make_client(&server)
            .with_timeout(Duration::from_millis(200))
            .generate_image("scene", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(ref e) if e.is_timeout()));
    }
}
