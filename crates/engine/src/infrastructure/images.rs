//! Image generation client (OpenAI-compatible images API)
//!
//! Implements the ImageGenPort trait against a hosted images endpoint that
//! takes a prompt plus size and returns a URL for the finished picture.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ImageConfig;
use crate::infrastructure::ports::{ImageGenError, ImageGenPort, ImageRequest, ImageResult};

/// Client for an OpenAI-compatible image generation API
#[derive(Clone)]
pub struct OpenAiImageClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl OpenAiImageClient {
    pub fn new(config: &ImageConfig) -> Self {
        // Image generation is slower than chat; allow a couple of minutes.
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl ImageGenPort for OpenAiImageClient {
    async fn generate(&self, request: ImageRequest) -> Result<ImageResult, ImageGenError> {
        let api_request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: request.prompt,
            n: 1,
            size: format!("{}x{}", request.width, request.height),
        };

        let mut http_request = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .json(&api_request);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| ImageGenError::GenerationFailed(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ImageGenError::GenerationFailed(error_text));
        }

        let api_response: ImageGenerationResponse = response
            .json()
            .await
            .map_err(|e| ImageGenError::GenerationFailed(e.to_string()))?;

        let url = api_response
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| {
                ImageGenError::GenerationFailed("No image URL in response".to_string())
            })?;

        Ok(ImageResult { url })
    }

    async fn check_health(&self) -> Result<bool, ImageGenError> {
        let response = self
            .client
            .get(format!("{}/v1/models", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|_| ImageGenError::Unavailable)?;

        Ok(response.status().is_success())
    }
}

// =============================================================================
// Images API types
// =============================================================================

#[derive(Debug, Serialize)]
struct ImageGenerationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    prompt: String,
    n: u32,
    size: String,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}
