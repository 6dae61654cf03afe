//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Stretches a user password into a 256-bit AES key. Every envelope carries
//! its own random salt, so the same password never yields the same key twice.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{MoodPaperError, MoodPaperResult};

/// Size of the PBKDF2 salt in bytes
pub const SALT_LEN: usize = 16;

/// PBKDF2 iteration count. Fixed: envelopes do not record it.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Output length for AES-256
pub const KEY_LEN: usize = 32;

/// The operation a derived key may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
}

/// A derived encryption key, zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
    #[zeroize(skip)]
    usage: KeyUsage,
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// The operation this key was derived for
    pub fn usage(&self) -> KeyUsage {
        self.usage
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Generate a fresh random salt from the OS CSPRNG
pub fn generate_salt() -> MoodPaperResult<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.try_fill_bytes(&mut salt).map_err(|e| {
        tracing::debug!(error = %e, "secure randomness unavailable for salt");
        MoodPaperError::EncryptionFailed
    })?;
    Ok(salt)
}

/// Derive a usage-scoped key from a password and salt
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN], usage: KeyUsage) -> DerivedKey {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    DerivedKey { key, usage }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key() {
        let salt = generate_salt().unwrap();
        let key = derive_key("test_password", &salt, KeyUsage::Encrypt);
        assert_eq!(key.as_bytes().len(), KEY_LEN);
        assert_eq!(key.usage(), KeyUsage::Encrypt);
    }

    #[test]
    fn test_same_password_same_key() {
        let salt = generate_salt().unwrap();
        let key1 = derive_key("test_password", &salt, KeyUsage::Encrypt);
        let key2 = derive_key("test_password", &salt, KeyUsage::Decrypt);
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = generate_salt().unwrap();
        let key1 = derive_key("password1", &salt, KeyUsage::Encrypt);
        let key2 = derive_key("password2", &salt, KeyUsage::Encrypt);
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let salt1 = generate_salt().unwrap();
        let salt2 = generate_salt().unwrap();
        assert_ne!(salt1, salt2);

        let key1 = derive_key("same_password", &salt1, KeyUsage::Encrypt);
        let key2 = derive_key("same_password", &salt2, KeyUsage::Encrypt);
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let salt = [7u8; SALT_LEN];
        let key = derive_key("pw", &salt, KeyUsage::Decrypt);
        let debug = format!("{:?}", key);
        assert!(debug.contains("Decrypt"));
        assert!(!debug.contains("key:"));
    }
}
