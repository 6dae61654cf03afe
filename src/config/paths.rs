//! Path management for MoodPaper
//!
//! ## Path Resolution Order
//!
//! 1. `MOODPAPER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/moodpaper` on Linux,
//!    `~/Library/Application Support/moodpaper` on macOS, `%APPDATA%` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::MoodPaperError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "MOODPAPER_DATA_DIR";

/// Manages all paths used by MoodPaper
#[derive(Debug, Clone)]
pub struct MoodPaperPaths {
    /// Base directory for all MoodPaper data
    base_dir: PathBuf,
}

impl MoodPaperPaths {
    /// Create a new MoodPaperPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, MoodPaperError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create MoodPaperPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding encrypted key backups
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Default directory generated wallpapers are saved to
    pub fn wallpaper_dir(&self) -> PathBuf {
        self.base_dir.join("wallpapers")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), MoodPaperError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MoodPaperError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir()).map_err(|e| {
            MoodPaperError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, MoodPaperError> {
    ProjectDirs::from("", "", "moodpaper")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| MoodPaperError::Config("Could not determine home directory".into()))
}
