//! Encrypted API key backups
//!
//! Backs up the generation service credential as a password-protected
//! envelope file and restores it again.
//!
//! # Backup Format
//!
//! The file holds a single base64 envelope (see [`crate::crypto::envelope`]).
//! Its plaintext is a JSON object naming the service:
//!
//! ```json
//! {"gemini": "<api key>"}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use moodpaper::backup::{restore_credential, KeyBackupManager};
//! use moodpaper::config::{MoodPaperPaths, Settings};
//!
//! let paths = MoodPaperPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let manager = KeyBackupManager::new(paths, &settings);
//!
//! let path = manager.create_backup(&api_key, &password, None)?;
//! let restored = restore_credential(&path, &password)?;
//! ```

mod manager;
mod payload;
mod restore;

pub use manager::{BackupInfo, KeyBackupManager};
pub use payload::CredentialBundle;
pub use restore::{inspect_backup, restore_credential, BackupInspection};
