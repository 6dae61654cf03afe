//! HTTP client for the Gemini `generateContent` API.
//!
//! The credential is passed to every call; the client itself holds no key.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::crypto::SecureString;
use crate::error::{MoodPaperError, MoodPaperResult};

use super::generator::ImageGenerator;
use super::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse, ImageConfig};
use super::wallpaper::GeneratedImage;

/// Prompt sent when testing a credential
const VERIFICATION_PROMPT: &str = "Hello";

/// Gemini API client used for wallpaper generation and credential checks
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    image_model: String,
    verification_model: String,
    image_config: ImageConfig,
}

impl GeminiClient {
    /// Build a client from settings
    pub fn new(settings: &Settings) -> MoodPaperResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| MoodPaperError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            image_model: settings.image_model.clone(),
            verification_model: settings.verification_model.clone(),
            image_config: ImageConfig {
                aspect_ratio: settings.image.aspect_ratio.clone(),
                image_size: settings.image.image_size.clone(),
            },
        })
    }

    /// Overrides the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
        credential: &SecureString,
    ) -> MoodPaperResult<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", credential.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| MoodPaperError::Http(format!("request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, model, "generateContent response received");

        if status.is_success() {
            return response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|e| MoodPaperError::Http(format!("failed to parse API response: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status, &body))
    }
}

/// Map a non-success response to the error taxonomy
fn classify_error(status: StatusCode, body: &str) -> MoodPaperError {
    let api_error = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let message = api_error
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("API returned {status}"));

    let invalid_key = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || api_error.as_ref().is_some_and(|e| e.error.is_invalid_key());

    if invalid_key {
        warn!(status = %status, "credential rejected by generation service");
        MoodPaperError::CredentialInvalid(message)
    } else {
        MoodPaperError::Http(format!("{status}: {message}"))
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(
        &self,
        prompt: &str,
        credential: &SecureString,
    ) -> MoodPaperResult<Option<GeneratedImage>> {
        let request =
            GenerateContentRequest::text(prompt).with_image_config(self.image_config.clone());
        let response = self
            .generate_content(&self.image_model, &request, credential)
            .await?;
        Ok(response.first_image())
    }

    async fn verify_credential(&self, credential: &SecureString) -> MoodPaperResult<()> {
        let request = GenerateContentRequest::text(VERIFICATION_PROMPT);
        self.generate_content(&self.verification_model, &request, credential)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const IMAGE_PATH: &str = "/v1beta/models/gemini-3-pro-image-preview:generateContent";
    const VERIFY_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(&Settings::default())
            .unwrap()
            .with_base_url(server.uri())
    }

    fn image_body() -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                ]}
            }]
        })
    }

    #[tokio::test]
    async fn test_generate_image_sends_prompt_and_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"parts": [{"text": "rainy neon city"}]}],
                "generationConfig": {"imageConfig": {"aspectRatio": "9:16", "imageSize": "1K"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(image_body()))
            .expect(1)
            .mount(&server)
            .await;

        let image = client(&server)
            .generate_image("rainy neon city", &"test-key".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_response_without_image_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "I can't draw that"}]}}]
            })))
            .mount(&server)
            .await;

        let image = client(&server)
            .generate_image("prompt", &"test-key".into())
            .await
            .unwrap();
        assert!(image.is_none());
    }

    #[tokio::test]
    async fn test_invalid_key_maps_to_credential_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(VERIFY_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT",
                    "details": [{"reason": "API_KEY_INVALID"}]
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .verify_credential(&"bad-key".into())
            .await
            .unwrap_err();
        assert!(err.is_credential_invalid());
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_credential_invalid() {
        for status in [401, 403] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(IMAGE_PATH))
                .respond_with(ResponseTemplate::new(status).set_body_string("denied"))
                .mount(&server)
                .await;

            let err = client(&server)
                .generate_image("prompt", &"bad-key".into())
                .await
                .unwrap_err();
            assert!(err.is_credential_invalid(), "status {status} gave {err:?}");
        }
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate_image("prompt", &"key".into())
            .await
            .unwrap_err();
        assert!(matches!(err, MoodPaperError::Http(_)));
    }

    #[tokio::test]
    async fn test_verify_credential_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(VERIFY_PATH))
            .and(header("x-goog-api-key", "good-key"))
            .and(body_partial_json(json!({"contents": [{"parts": [{"text": "Hello"}]}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Hi!"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .verify_credential(&"good-key".into())
            .await
            .unwrap();
    }
}
