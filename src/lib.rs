//! MoodPaper - mood-driven wallpaper generation
//!
//! This library provides the core functionality for the MoodPaper
//! application: a password-based envelope codec for protecting the Gemini
//! API key at rest, encrypted key backups, and a fan-out client that turns
//! a mood prompt into a batch of phone wallpapers.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: PBKDF2 key derivation, AES-256-GCM and the base64 envelope
//! - `backup`: Encrypted key backup files
//! - `generation`: Gemini image client and batch generation
//! - `credential`: API key selection
//! - `session`: Generation state for a single user session
//! - `config`: Configuration and path management
//! - `storage`: Atomic file writes
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use moodpaper::crypto::{decrypt, encrypt};
//!
//! let envelope = encrypt(r#"{"gemini":"AIza..."}"#, "hunter2")?;
//! let plaintext = decrypt(&envelope, "hunter2")?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod generation;
pub mod logging;
pub mod session;
pub mod storage;

pub use error::MoodPaperError;
