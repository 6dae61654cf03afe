//! Key backup restoration

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::{self, Envelope, SecureString};
use crate::error::{MoodPaperError, MoodPaperResult};
use crate::storage::file_io::read_text_required;

use super::payload::CredentialBundle;

/// Decrypt a backup file and extract the credential.
///
/// A wrong password and a damaged file both yield
/// [`MoodPaperError::DecryptionFailed`]. A file that decrypts but does not
/// hold a credential yields a validation error.
pub async fn restore_credential(path: &Path, password: &SecureString) -> MoodPaperResult<SecureString> {
    if password.is_empty() {
        return Err(MoodPaperError::Validation(
            "enter the backup password first".into(),
        ));
    }

    let contents = read_text_required(path)?;
    let json = crypto::decrypt_async(contents, password.clone()).await?;
    let credential = CredentialBundle::from_json(&json)?.credential()?;

    tracing::info!(path = %path.display(), "key backup restored");
    Ok(credential)
}

/// Structural facts about a backup file, readable without the password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInspection {
    /// Decoded envelope size
    pub envelope_bytes: usize,
    /// Size of the encrypted payload without the authentication tag
    pub payload_bytes: usize,
    /// Salt, base64 encoded
    pub salt: String,
}

/// Check that a file looks like a key backup without decrypting it
pub fn inspect_backup(path: &Path) -> MoodPaperResult<BackupInspection> {
    let contents = read_text_required(path)?;
    let envelope = Envelope::from_base64(&contents).map_err(|_| {
        MoodPaperError::Validation(format!("{} is not a key backup", path.display()))
    })?;

    Ok(BackupInspection {
        envelope_bytes: Envelope::HEADER_LEN + envelope.ciphertext().len(),
        payload_bytes: envelope.ciphertext().len() - crypto::encryption::TAG_LEN,
        salt: STANDARD.encode(envelope.salt()),
    })
}
