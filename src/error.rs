//! Custom error types for MoodPaper
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for MoodPaper operations
#[derive(Error, Debug)]
pub enum MoodPaperError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input and payloads
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Secure randomness or the cipher failed while sealing a secret
    #[error("Encryption failed")]
    EncryptionFailed,

    /// Wrong password, corrupted or truncated envelope, or malformed base64.
    ///
    /// The causes are deliberately indistinguishable to callers.
    #[error("Decryption failed. Wrong password or corrupted file.")]
    DecryptionFailed,

    /// The generation service rejected the credential
    #[error("Credential rejected: {0}")]
    CredentialInvalid(String),

    /// No credential has been selected yet
    #[error("No API credential selected")]
    CredentialMissing,

    /// Every request of a generation batch failed
    #[error("Generation failed: none of {requested} requests produced an image")]
    GenerationFailed { requested: usize },

    /// HTTP transport or unexpected API responses
    #[error("HTTP error: {0}")]
    Http(String),
}

impl MoodPaperError {
    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the service rejected the credential
    pub fn is_credential_invalid(&self) -> bool {
        matches!(self, Self::CredentialInvalid(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for MoodPaperError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MoodPaperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for MoodPaperError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for MoodPaper operations
pub type MoodPaperResult<T> = Result<T, MoodPaperError>;
