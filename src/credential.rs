//! Credential selection
//!
//! The generation session asks a [`CredentialSelector`] whether a credential
//! is available and, if not, to obtain one. The command line provides an
//! interactive selector; [`StaticCredential`] wraps an explicit value.

use async_trait::async_trait;

use crate::crypto::SecureString;
use crate::error::{MoodPaperError, MoodPaperResult};

#[async_trait]
pub trait CredentialSelector: Send + Sync {
    /// Whether a credential is currently selected
    async fn has_selected_credential(&self) -> bool;

    /// Ask the user to select or authorize a credential
    async fn request_credential(&self) -> MoodPaperResult<SecureString>;
}

/// A credential supplied up front, e.g. from a flag or environment variable
#[derive(Debug, Clone, Default)]
pub struct StaticCredential {
    credential: Option<SecureString>,
}

impl StaticCredential {
    pub fn new(credential: Option<SecureString>) -> Self {
        Self {
            credential: credential.map(|c| c.trimmed()).filter(|c| !c.is_empty()),
        }
    }
}

#[async_trait]
impl CredentialSelector for StaticCredential {
    async fn has_selected_credential(&self) -> bool {
        self.credential.is_some()
    }

    async fn request_credential(&self) -> MoodPaperResult<SecureString> {
        self.credential
            .clone()
            .ok_or(MoodPaperError::CredentialMissing)
    }
}
