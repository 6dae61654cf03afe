//! Generation session state
//!
//! Tracks the selected credential, the current status and the wallpapers of
//! the last successful batch. All state is owned by one foreground task.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::credential::CredentialSelector;
use crate::crypto::SecureString;
use crate::error::{MoodPaperError, MoodPaperResult};
use crate::generation::{
    generate_batch, ImageGenerator, Wallpaper, DEFAULT_VARIATIONS, MAX_VARIATIONS,
};

/// Where the session is in the generate cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateStatus {
    #[default]
    Idle,
    Generating,
    Success,
    Error,
}

/// Trim a mood prompt, rejecting one that is blank
pub fn normalize_prompt(prompt: &str) -> MoodPaperResult<&str> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(MoodPaperError::Validation("describe a mood first".into()));
    }
    Ok(prompt)
}

pub struct Session<G> {
    generator: G,
    credential: Option<SecureString>,
    status: GenerateStatus,
    prompt: String,
    wallpapers: Vec<Wallpaper>,
    variations: usize,
}

impl<G: ImageGenerator> Session<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            credential: None,
            status: GenerateStatus::Idle,
            prompt: String::new(),
            wallpapers: Vec::new(),
            variations: DEFAULT_VARIATIONS,
        }
    }

    /// Override the number of variations per prompt, clamped to
    /// `1..=MAX_VARIATIONS`
    pub fn with_variations(mut self, variations: usize) -> Self {
        self.variations = variations.clamp(1, MAX_VARIATIONS);
        self
    }

    pub fn status(&self) -> GenerateStatus {
        self.status
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn wallpapers(&self) -> &[Wallpaper] {
        &self.wallpapers
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn set_credential(&mut self, credential: SecureString) {
        let credential = credential.trimmed();
        self.credential = (!credential.is_empty()).then_some(credential);
    }

    pub fn clear_credential(&mut self) {
        self.credential = None;
    }

    /// Pull a credential from `selector` if none is held yet
    pub async fn ensure_credential<S>(&mut self, selector: &S) -> MoodPaperResult<()>
    where
        S: CredentialSelector + ?Sized,
    {
        if self.credential.is_none() {
            self.set_credential(selector.request_credential().await?);
        }
        if self.credential.is_none() {
            return Err(MoodPaperError::CredentialMissing);
        }
        Ok(())
    }

    /// Test the held credential against the service.
    ///
    /// A rejected credential is dropped so the user is asked again.
    pub async fn verify_credential(&mut self) -> MoodPaperResult<()> {
        let credential = self
            .credential
            .as_ref()
            .ok_or(MoodPaperError::CredentialMissing)?;

        let result = self.generator.verify_credential(credential).await;
        if matches!(result, Err(MoodPaperError::CredentialInvalid(_))) {
            self.clear_credential();
        }
        result
    }

    /// Generate wallpapers for `prompt`.
    ///
    /// A blank prompt or a missing credential leaves the session untouched.
    /// Partial failures still succeed; an all-failed batch moves the session
    /// to [`GenerateStatus::Error`].
    pub async fn generate(&mut self, prompt: &str) -> MoodPaperResult<&[Wallpaper]> {
        let prompt = normalize_prompt(prompt)?;
        let credential = self
            .credential
            .clone()
            .ok_or(MoodPaperError::CredentialMissing)?;

        self.status = GenerateStatus::Generating;
        self.prompt = prompt.to_string();
        self.wallpapers.clear();

        let batch = generate_batch(&self.generator, prompt, &credential, self.variations).await;

        match batch.into_result() {
            Ok(wallpapers) => {
                info!(count = wallpapers.len(), "wallpapers ready");
                self.wallpapers = wallpapers;
                self.status = GenerateStatus::Success;
                Ok(&self.wallpapers)
            }
            Err(e) => {
                if e.is_credential_invalid() {
                    self.clear_credential();
                }
                self.status = GenerateStatus::Error;
                Err(e)
            }
        }
    }

    /// Generate again from an existing wallpaper's prompt
    pub async fn remix(&mut self, wallpaper: &Wallpaper) -> MoodPaperResult<&[Wallpaper]> {
        let prompt = wallpaper.prompt.clone();
        self.generate(&prompt).await
    }
}
