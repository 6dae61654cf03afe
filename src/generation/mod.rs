//! Wallpaper generation
//!
//! A prompt fans out into a fixed number of independent, concurrent image
//! requests. Failed requests are dropped from the result; only the
//! successful subset is returned. There is no retry.

pub mod client;
pub mod generator;
pub mod types;
pub mod wallpaper;

use futures::future::join_all;
use tracing::{info, warn};

use crate::crypto::SecureString;
use crate::error::{MoodPaperError, MoodPaperResult};

pub use client::GeminiClient;
pub use generator::ImageGenerator;
pub use wallpaper::{GeneratedImage, Wallpaper};

/// Variations requested per prompt
pub const DEFAULT_VARIATIONS: usize = 4;

/// Upper bound on concurrent requests for one prompt
pub const MAX_VARIATIONS: usize = 8;

/// Outcome of one fan-out
#[derive(Debug, Clone, Default)]
pub struct GenerationBatch {
    /// Number of requests issued
    pub requested: usize,
    /// Successful results, in request order
    pub wallpapers: Vec<Wallpaper>,
    /// Requests that errored or returned no image
    pub failed: usize,
    /// Service message if any request was refused for its credential
    pub credential_rejection: Option<String>,
}

impl GenerationBatch {
    pub fn is_empty(&self) -> bool {
        self.wallpapers.is_empty()
    }

    /// Treat an all-failed batch as an error. A partial batch is a success.
    pub fn into_result(self) -> MoodPaperResult<Vec<Wallpaper>> {
        if !self.wallpapers.is_empty() {
            return Ok(self.wallpapers);
        }
        match self.credential_rejection {
            Some(message) => Err(MoodPaperError::CredentialInvalid(message)),
            None => Err(MoodPaperError::GenerationFailed {
                requested: self.requested,
            }),
        }
    }
}

/// Issue `count` concurrent requests for `prompt` and collect the successes
pub async fn generate_batch<G>(
    generator: &G,
    prompt: &str,
    credential: &SecureString,
    count: usize,
) -> GenerationBatch
where
    G: ImageGenerator + ?Sized,
{
    let requests = (0..count).map(|index| async move {
        (index, generator.generate_image(prompt, credential).await)
    });
    let results = join_all(requests).await;

    let mut batch = GenerationBatch {
        requested: count,
        ..Default::default()
    };

    for (index, result) in results {
        match result {
            Ok(Some(image)) => batch
                .wallpapers
                .push(Wallpaper::from_image(image, prompt, index)),
            Ok(None) => {
                warn!(index, "generation response carried no image");
                batch.failed += 1;
            }
            Err(MoodPaperError::CredentialInvalid(message)) => {
                warn!(index, "generation request rejected the credential");
                batch.credential_rejection.get_or_insert(message);
                batch.failed += 1;
            }
            Err(e) => {
                warn!(index, error = %e, "generation request failed");
                batch.failed += 1;
            }
        }
    }

    info!(
        requested = batch.requested,
        succeeded = batch.wallpapers.len(),
        failed = batch.failed,
        "generation batch finished"
    );
    batch
}

/// Generate up to `count` wallpapers; an empty list means every request failed
pub async fn generate_wallpapers<G>(
    generator: &G,
    prompt: &str,
    credential: &SecureString,
    count: usize,
) -> Vec<Wallpaper>
where
    G: ImageGenerator + ?Sized,
{
    generate_batch(generator, prompt, credential, count)
        .await
        .wallpapers
}


#[cfg(test)]
mod tests {
    use super::testing::{Reply, ScriptedGenerator};
    use super::*;

    #[tokio::test]
    async fn test_all_succeed() {
        let generator = ScriptedGenerator::always(Reply::Image, 4);
        let wallpapers =
            generate_wallpapers(&generator, "rainy neon city", &"key".into(), DEFAULT_VARIATIONS)
                .await;

        assert_eq!(generator.calls(), 4);
        assert_eq!(wallpapers.len(), 4);
        for wallpaper in &wallpapers {
            assert!(!wallpaper.id.is_empty());
            assert!(!wallpaper.url.is_empty());
            assert_eq!(wallpaper.prompt, "rainy neon city");
        }
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successes() {
        let generator =
            ScriptedGenerator::new([Reply::Image, Reply::Fail, Reply::Empty, Reply::Image]);
        let batch = generate_batch(&generator, "prompt", &"key".into(), 4).await;

        assert_eq!(batch.requested, 4);
        assert_eq!(batch.wallpapers.len(), 2);
        assert_eq!(batch.failed, 2);
        assert_eq!(batch.into_result().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_all_failed_is_empty_list() {
        let generator = ScriptedGenerator::always(Reply::Fail, 4);
        let batch = generate_batch(&generator, "rainy neon city", &"key".into(), 4).await;

        assert!(batch.is_empty());
        assert_eq!(batch.failed, 4);
        assert!(matches!(
            batch.into_result(),
            Err(MoodPaperError::GenerationFailed { requested: 4 })
        ));
    }

    #[tokio::test]
    async fn test_rejected_credential_surfaces_when_nothing_succeeds() {
        let generator =
            ScriptedGenerator::new([Reply::Reject, Reply::Reject, Reply::Fail, Reply::Reject]);
        let batch = generate_batch(&generator, "prompt", &"bad".into(), 4).await;

        assert_eq!(batch.credential_rejection.as_deref(), Some("API key not valid"));
        assert!(batch.into_result().unwrap_err().is_credential_invalid());
    }

    #[tokio::test]
    async fn test_ids_are_unique_within_batch() {
        let generator = ScriptedGenerator::always(Reply::Image, 4);
        let wallpapers = generate_wallpapers(&generator, "p", &"key".into(), 4).await;

        let mut ids: Vec<&str> = wallpapers.iter().map(|w| w.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn test_gemini_fan_out_against_mock_server() {
        use serde_json::json;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-3-pro-image-preview:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                ]}}]
            })))
            .expect(4)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&crate::config::Settings::default())
            .unwrap()
            .with_base_url(server.uri());
        let wallpapers = generate_wallpapers(&client, "rainy neon city", &"key".into(), 4).await;
        assert_eq!(wallpapers.len(), 4);
    }
}
