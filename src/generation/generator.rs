//! The image generation seam

use async_trait::async_trait;

use crate::crypto::SecureString;
use crate::error::MoodPaperResult;

use super::wallpaper::GeneratedImage;

/// A service that turns a text prompt into an image.
///
/// The credential is an explicit argument so implementations never read
/// process-wide state.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Request one image. `Ok(None)` means the service answered without one.
    async fn generate_image(
        &self,
        prompt: &str,
        credential: &SecureString,
    ) -> MoodPaperResult<Option<GeneratedImage>>;

    /// Cheap round trip proving the credential is accepted
    async fn verify_credential(&self, credential: &SecureString) -> MoodPaperResult<()>;
}
