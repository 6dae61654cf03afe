//! AES-256-GCM encryption/decryption
//!
//! Provides authenticated encryption for small secrets using AES-256-GCM.
//! The 16-byte authentication tag is appended to the ciphertext.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{MoodPaperError, MoodPaperResult};

use super::key_derivation::{DerivedKey, KeyUsage};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const IV_LEN: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Generate a fresh random IV from the OS CSPRNG
pub fn generate_iv() -> MoodPaperResult<[u8; IV_LEN]> {
    let mut iv = [0u8; IV_LEN];
    OsRng.try_fill_bytes(&mut iv).map_err(|e| {
        tracing::debug!(error = %e, "secure randomness unavailable for IV");
        MoodPaperError::EncryptionFailed
    })?;
    Ok(iv)
}

/// Encrypt plaintext with an encrypt-scoped key
pub fn seal(plaintext: &[u8], key: &DerivedKey, iv: &[u8; IV_LEN]) -> MoodPaperResult<Vec<u8>> {
    if key.usage() != KeyUsage::Encrypt {
        tracing::debug!("refusing to encrypt with a decrypt-scoped key");
        return Err(MoodPaperError::EncryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|e| {
        tracing::debug!(error = %e, "failed to create cipher");
        MoodPaperError::EncryptionFailed
    })?;

    cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|_| MoodPaperError::EncryptionFailed)
}

/// Decrypt and authenticate ciphertext with a decrypt-scoped key
pub fn open(ciphertext: &[u8], key: &DerivedKey, iv: &[u8; IV_LEN]) -> MoodPaperResult<Vec<u8>> {
    if key.usage() != KeyUsage::Decrypt {
        tracing::debug!("refusing to decrypt with an encrypt-scoped key");
        return Err(MoodPaperError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|e| {
        tracing::debug!(error = %e, "failed to create cipher");
        MoodPaperError::DecryptionFailed
    })?;

    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| MoodPaperError::DecryptionFailed)
}
