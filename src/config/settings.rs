//! User settings for MoodPaper
//!
//! Manages the generation service endpoint, model choices, image format and
//! the backup file name. The API credential itself is never stored here.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::MoodPaperPaths;
use crate::error::MoodPaperError;
use crate::generation::MAX_VARIATIONS;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Image output format requested from the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSettings {
    /// Aspect ratio, phone portrait by default
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Resolution tier ("1K", "2K", "4K")
    #[serde(default = "default_image_size")]
    pub image_size: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: default_aspect_ratio(),
            image_size: default_image_size(),
        }
    }
}

/// User settings for MoodPaper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the generative language API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Model used for wallpaper generation
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Lightweight model used to test a credential
    #[serde(default = "default_verification_model")]
    pub verification_model: String,

    #[serde(default)]
    pub image: ImageSettings,

    /// Number of parallel variations per prompt
    #[serde(default = "default_variations")]
    pub variations: usize,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// File name used for key backups in the backup directory
    #[serde(default = "default_backup_file_name")]
    pub backup_file_name: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_image_model() -> String {
    "gemini-3-pro-image-preview".to_string()
}

fn default_verification_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_aspect_ratio() -> String {
    "9:16".to_string()
}

fn default_image_size() -> String {
    "1K".to_string()
}

fn default_variations() -> usize {
    4
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_backup_file_name() -> String {
    "moodpaper-keys.enc".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api_base_url: default_api_base_url(),
            image_model: default_image_model(),
            verification_model: default_verification_model(),
            image: ImageSettings::default(),
            variations: default_variations(),
            request_timeout_secs: default_request_timeout_secs(),
            backup_file_name: default_backup_file_name(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &MoodPaperPaths) -> Result<Self, MoodPaperError> {
        let settings: Settings = read_json(paths.settings_file())
            .map_err(|e| MoodPaperError::Config(format!("Failed to load settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MoodPaperPaths) -> Result<(), MoodPaperError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Reject settings that would make generation or backups impossible
    pub fn validate(&self) -> Result<(), MoodPaperError> {
        if !(1..=MAX_VARIATIONS).contains(&self.variations) {
            return Err(MoodPaperError::Config(format!(
                "variations must be between 1 and {}, got {}",
                MAX_VARIATIONS, self.variations
            )));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(MoodPaperError::Config("api_base_url is empty".into()));
        }
        if self.backup_file_name.trim().is_empty()
            || self.backup_file_name.contains(&['/', '\\'][..])
        {
            return Err(MoodPaperError::Config(format!(
                "invalid backup_file_name: {:?}",
                self.backup_file_name
            )));
        }
        Ok(())
    }
}
