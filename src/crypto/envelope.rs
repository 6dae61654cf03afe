//! Password-protected secret envelopes
//!
//! An envelope is the self-contained artifact written to a key backup file:
//!
//! ```text
//! base64( salt[16] || iv[12] || ciphertext_with_tag[N] )
//! ```
//!
//! There is no header, version byte, or magic number. Decryption needs only
//! the envelope text and the password. Every failure on the decrypt path is
//! reported as [`MoodPaperError::DecryptionFailed`], so a wrong password and a
//! damaged file look the same to the caller.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use zeroize::Zeroize;

use crate::error::{MoodPaperError, MoodPaperResult};

use super::encryption::{generate_iv, open, seal, IV_LEN, TAG_LEN};
use super::key_derivation::{derive_key, generate_salt, KeyUsage, SALT_LEN};
use super::secure_memory::SecureString;

/// Standard alphabet; emits padding, accepts input with or without it.
const ENVELOPE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded envelope: salt, IV and authenticated ciphertext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Length of the salt + IV prefix
    pub const HEADER_LEN: usize = SALT_LEN + IV_LEN;

    /// Smallest decodable envelope: header plus a bare authentication tag
    pub const MIN_LEN: usize = Self::HEADER_LEN + TAG_LEN;

    pub fn new(salt: [u8; SALT_LEN], iv: [u8; IV_LEN], ciphertext: Vec<u8>) -> Self {
        Self {
            salt,
            iv,
            ciphertext,
        }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Ciphertext including the trailing authentication tag
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Pack into `salt || iv || ciphertext`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::HEADER_LEN + self.ciphertext.len());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.iv);
        buf.extend_from_slice(&self.ciphertext);
        buf
    }

    /// Split raw envelope bytes
    pub fn from_bytes(bytes: &[u8]) -> MoodPaperResult<Self> {
        if bytes.len() < Self::MIN_LEN {
            tracing::debug!(
                len = bytes.len(),
                min = Self::MIN_LEN,
                "envelope too short"
            );
            return Err(MoodPaperError::DecryptionFailed);
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&bytes[..SALT_LEN]);
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&bytes[SALT_LEN..Self::HEADER_LEN]);

        Ok(Self::new(salt, iv, bytes[Self::HEADER_LEN..].to_vec()))
    }

    /// Encode as base64 text, ready to be written to a file
    pub fn to_base64(&self) -> String {
        ENVELOPE_BASE64.encode(self.to_bytes())
    }

    /// Decode base64 text. ASCII whitespace anywhere in the input is ignored.
    pub fn from_base64(text: &str) -> MoodPaperResult<Self> {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = ENVELOPE_BASE64.decode(compact).map_err(|e| {
            tracing::debug!(error = %e, "envelope is not valid base64");
            MoodPaperError::DecryptionFailed
        })?;
        Self::from_bytes(&bytes)
    }
}

/// Encrypt a UTF-8 payload under a password into a base64 envelope.
///
/// A fresh salt and IV are drawn for every call, so encrypting the same
/// input twice yields different envelopes.
pub fn encrypt(plaintext: &str, password: &str) -> MoodPaperResult<String> {
    let salt = generate_salt()?;
    let key = derive_key(password, &salt, KeyUsage::Encrypt);
    let iv = generate_iv()?;

    let ciphertext = seal(plaintext.as_bytes(), &key, &iv)?;

    Ok(Envelope::new(salt, iv, ciphertext).to_base64())
}

/// Decrypt a base64 envelope with a password
pub fn decrypt(envelope: &str, password: &str) -> MoodPaperResult<String> {
    let envelope = Envelope::from_base64(envelope)?;
    let key = derive_key(password, envelope.salt(), KeyUsage::Decrypt);

    let plaintext = open(envelope.ciphertext(), &key, envelope.iv())?;

    String::from_utf8(plaintext).map_err(|e| {
        let mut bytes = e.into_bytes();
        bytes.zeroize();
        tracing::debug!("decrypted payload is not UTF-8");
        MoodPaperError::DecryptionFailed
    })
}

/// [`encrypt`] on the blocking pool, keeping key stretching off async workers
pub async fn encrypt_async(
    plaintext: SecureString,
    password: SecureString,
) -> MoodPaperResult<String> {
    tokio::task::spawn_blocking(move || encrypt(&plaintext, &password))
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "encryption task did not complete");
            MoodPaperError::EncryptionFailed
        })?
}

/// [`decrypt`] on the blocking pool
pub async fn decrypt_async(envelope: String, password: SecureString) -> MoodPaperResult<SecureString> {
    tokio::task::spawn_blocking(move || decrypt(&envelope, &password).map(SecureString::from))
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "decryption task did not complete");
            MoodPaperError::DecryptionFailed
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = "{\"gemini\":\"sk-abc123\"}";

    fn decode(envelope: &str) -> Vec<u8> {
        ENVELOPE_BASE64.decode(envelope).unwrap()
    }

    fn flip_bit(envelope: &str, byte: usize, bit: u8) -> String {
        let mut bytes = decode(envelope);
        bytes[byte] ^= 1 << bit;
        ENVELOPE_BASE64.encode(bytes)
    }

    #[test]
    fn test_credential_payload_round_trip() {
        let envelope = encrypt(PAYLOAD, "correct-horse").unwrap();
        assert_eq!(decrypt(&envelope, "correct-horse").unwrap(), PAYLOAD);
        assert!(matches!(
            decrypt(&envelope, "wrong-password"),
            Err(MoodPaperError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_round_trip_empty_and_unicode() {
        for plaintext in ["", "비밀번호 🔐 ключ", "line1\nline2\t\"quoted\""] {
            let envelope = encrypt(plaintext, "pw").unwrap();
            assert_eq!(decrypt(&envelope, "pw").unwrap(), plaintext);
        }
    }

    #[test]
    fn test_envelope_layout() {
        let envelope = encrypt("hello", "pw").unwrap();
        let bytes = decode(&envelope);
        assert_eq!(bytes.len(), SALT_LEN + IV_LEN + "hello".len() + TAG_LEN);

        let parsed = Envelope::from_base64(&envelope).unwrap();
        assert_eq!(parsed.salt().as_slice(), &bytes[..16]);
        assert_eq!(parsed.iv().as_slice(), &bytes[16..28]);
        assert_eq!(parsed.ciphertext(), &bytes[28..]);
        assert_eq!(parsed.to_base64(), envelope);
    }

    #[test]
    fn test_encryption_is_not_deterministic() {
        let first = encrypt(PAYLOAD, "pw").unwrap();
        let second = encrypt(PAYLOAD, "pw").unwrap();
        assert_ne!(first, second);

        let first_env = Envelope::from_base64(&first).unwrap();
        let second_env = Envelope::from_base64(&second).unwrap();
        assert_ne!(first_env.salt(), second_env.salt());
        assert_ne!(first_env.iv(), second_env.iv());

        assert_eq!(decrypt(&first, "pw").unwrap(), PAYLOAD);
        assert_eq!(decrypt(&second, "pw").unwrap(), PAYLOAD);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let envelope = encrypt("secret", "pw").unwrap();
        let len = decode(&envelope).len();

        for byte in Envelope::HEADER_LEN..len {
            for bit in 0..8 {
                let tampered = flip_bit(&envelope, byte, bit);
                assert!(
                    matches!(decrypt(&tampered, "pw"), Err(MoodPaperError::DecryptionFailed)),
                    "flipping bit {bit} of byte {byte} went undetected"
                );
            }
        }
    }

    #[test]
    fn test_tampered_salt_or_iv_fails() {
        let envelope = encrypt("secret", "pw").unwrap();
        assert!(decrypt(&flip_bit(&envelope, 0, 0), "pw").is_err());
        assert!(decrypt(&flip_bit(&envelope, 20, 3), "pw").is_err());
    }

    #[test]
    fn test_truncated_envelopes_fail() {
        let envelope = encrypt("secret", "pw").unwrap();
        let bytes = decode(&envelope);

        for len in 0..Envelope::MIN_LEN {
            let truncated = ENVELOPE_BASE64.encode(&bytes[..len]);
            assert!(matches!(
                decrypt(&truncated, "pw"),
                Err(MoodPaperError::DecryptionFailed)
            ));
        }

        let missing_tail = ENVELOPE_BASE64.encode(&bytes[..bytes.len() - 1]);
        assert!(decrypt(&missing_tail, "pw").is_err());
    }

    #[test]
    fn test_malformed_base64_fails() {
        for input in ["", "not base64 at all!", "@@@@", "===="] {
            assert!(matches!(
                decrypt(input, "pw"),
                Err(MoodPaperError::DecryptionFailed)
            ));
        }
    }

    #[test]
    fn test_whitespace_and_missing_padding_tolerated() {
        let envelope = encrypt("secret", "pw").unwrap();

        let with_newline = format!("{}\n", envelope);
        assert_eq!(decrypt(&with_newline, "pw").unwrap(), "secret");

        let (head, tail) = envelope.split_at(10);
        let wrapped = format!("  {}\r\n{}  ", head, tail);
        assert_eq!(decrypt(&wrapped, "pw").unwrap(), "secret");

        let unpadded = envelope.trim_end_matches('=');
        assert_eq!(decrypt(unpadded, "pw").unwrap(), "secret");
    }

    #[tokio::test]
    async fn test_async_round_trip_concurrently() {
        let (a, b) = tokio::join!(
            encrypt_async("alpha".into(), "pw-a".into()),
            encrypt_async("beta".into(), "pw-b".into()),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        let decrypted = decrypt_async(a, "pw-a".into()).await.unwrap();
        assert_eq!(decrypted.as_str(), "alpha");

        let wrong = decrypt_async(b, "pw-a".into()).await;
        assert!(matches!(wrong, Err(MoodPaperError::DecryptionFailed)));
    }
}
