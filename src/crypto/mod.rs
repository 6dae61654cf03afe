//! Cryptographic functions for MoodPaper
//!
//! Provides AES-256-GCM encryption with PBKDF2-HMAC-SHA256 key derivation,
//! packed into base64 envelopes for API key backup files.

pub mod encryption;
pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use envelope::{decrypt, decrypt_async, encrypt, encrypt_async, Envelope};
pub use key_derivation::{derive_key, DerivedKey, KeyUsage};
pub use secure_memory::SecureString;
