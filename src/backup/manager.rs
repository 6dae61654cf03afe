//! Backup manager for MoodPaper
//!
//! Writes encrypted key backups and lists the ones in the backup directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::MoodPaperPaths;
use crate::config::settings::Settings;
use crate::crypto::{self, SecureString};
use crate::error::{MoodPaperError, MoodPaperResult};
use crate::storage::file_io::write_text_atomic;

use super::payload::CredentialBundle;

/// File extension used for key backups
pub const BACKUP_EXTENSION: &str = "enc";

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// Last modification time
    pub modified_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Manages key backup creation
pub struct KeyBackupManager {
    /// Path to backup directory
    backup_dir: PathBuf,
    /// File name used when no destination is given
    default_file_name: String,
}

impl KeyBackupManager {
    /// Create a new KeyBackupManager
    pub fn new(paths: MoodPaperPaths, settings: &Settings) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            default_file_name: settings.backup_file_name.clone(),
        }
    }

    /// Where a backup lands when no destination is given
    pub fn default_backup_path(&self) -> PathBuf {
        self.backup_dir.join(&self.default_file_name)
    }

    /// Encrypt the credential under `password` and write it to `dest`
    /// (or the default backup path), replacing any existing file.
    ///
    /// Returns the path written.
    pub async fn create_backup(
        &self,
        credential: &SecureString,
        password: &SecureString,
        dest: Option<&Path>,
    ) -> MoodPaperResult<PathBuf> {
        if credential.is_blank() {
            return Err(MoodPaperError::Validation(
                "no API key to back up".into(),
            ));
        }
        if password.is_empty() {
            return Err(MoodPaperError::Validation(
                "backup password must not be empty".into(),
            ));
        }

        let payload = CredentialBundle::new(&credential.trimmed()).to_json()?;
        let envelope = crypto::encrypt_async(payload, password.clone()).await?;

        let path = dest
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_backup_path());
        write_text_atomic(&path, &envelope)?;

        tracing::info!(path = %path.display(), "key backup written");
        Ok(path)
    }

    /// List all backups in the backup directory, newest first
    pub fn list_backups(&self) -> MoodPaperResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            MoodPaperError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                MoodPaperError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == BACKUP_EXTENSION) {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));

        Ok(backups)
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let modified_at = metadata.modified().ok().map(DateTime::<Utc>::from)?;

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        modified_at,
        size_bytes: metadata.len(),
    })
}
