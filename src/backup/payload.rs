//! Plaintext carried inside a key backup envelope

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::SecureString;
use crate::error::{MoodPaperError, MoodPaperResult};

/// The credential payload, keyed by service name
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialBundle {
    #[serde(default)]
    gemini: Option<String>,
}

impl CredentialBundle {
    pub fn new(credential: &SecureString) -> Self {
        Self {
            gemini: Some(credential.as_str().to_string()),
        }
    }

    /// Serialize to the JSON text that gets encrypted
    pub fn to_json(&self) -> MoodPaperResult<SecureString> {
        serde_json::to_string(self)
            .map(SecureString::from)
            .map_err(MoodPaperError::from)
    }

    /// Parse decrypted JSON text
    pub fn from_json(json: &str) -> MoodPaperResult<Self> {
        serde_json::from_str(json)
            .map_err(|_| MoodPaperError::Validation("invalid backup format".into()))
    }

    /// The stored credential, if the payload has a non-empty one
    pub fn credential(&self) -> MoodPaperResult<SecureString> {
        match self.gemini.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(SecureString::new(key)),
            _ => Err(MoodPaperError::Validation("invalid backup format".into())),
        }
    }
}
