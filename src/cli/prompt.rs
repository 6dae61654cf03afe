//! Hidden-input prompts and the interactive credential selector

use std::path::PathBuf;

use async_trait::async_trait;
use clap::Args;

use crate::backup::restore_credential;
use crate::credential::CredentialSelector;
use crate::crypto::SecureString;
use crate::error::{MoodPaperError, MoodPaperResult};

/// Where the API key comes from
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Gemini API key
    #[arg(long, env = "MOODPAPER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Encrypted key backup to unlock (ignored when an API key is given)
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    #[command(flatten)]
    pub password: PasswordArgs,
}

/// Backup password supplied non-interactively
#[derive(Args, Debug, Clone, Default)]
pub struct PasswordArgs {
    /// Backup password (read from the environment; prompted when unset)
    #[arg(long = "backup-password", env = "MOODPAPER_BACKUP_PASSWORD", hide_env_values = true, hide = true)]
    pub backup_password: Option<String>,
}

impl PasswordArgs {
    /// The preset password, or a hidden prompt
    pub fn existing(&self) -> MoodPaperResult<SecureString> {
        match &self.backup_password {
            Some(password) => Ok(SecureString::new(password.as_str())),
            None => prompt_secret("Backup password: "),
        }
        .and_then(require_non_empty)
    }

    /// The preset password, or a new one entered twice
    pub fn new_password(&self) -> MoodPaperResult<SecureString> {
        match &self.backup_password {
            Some(password) => require_non_empty(SecureString::new(password.as_str())),
            None => prompt_new_password(),
        }
    }
}

/// Resolves the API key from a flag, a backup file, or a prompt
pub struct InteractiveCredential {
    api_key: Option<SecureString>,
    key_file: Option<PathBuf>,
    password: PasswordArgs,
}

impl InteractiveCredential {
    pub fn new(args: &CredentialArgs) -> Self {
        Self {
            api_key: args
                .api_key
                .as_deref()
                .map(SecureString::new)
                .map(|k| k.trimmed())
                .filter(|k| !k.is_empty()),
            key_file: args.key_file.clone(),
            password: args.password.clone(),
        }
    }
}

#[async_trait]
impl CredentialSelector for InteractiveCredential {
    async fn has_selected_credential(&self) -> bool {
        self.api_key.is_some() || self.key_file.is_some()
    }

    async fn request_credential(&self) -> MoodPaperResult<SecureString> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        if let Some(path) = &self.key_file {
            let password = self.password.existing()?;
            return restore_credential(path, &password).await;
        }
        let key = prompt_secret("Gemini API key: ")?.trimmed();
        if key.is_empty() {
            return Err(MoodPaperError::CredentialMissing);
        }
        Ok(key)
    }
}

/// Prompt for a secret (hidden input)
pub fn prompt_secret(prompt: &str) -> MoodPaperResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(|e| MoodPaperError::Io(format!("Failed to read input: {}", e)))
}

/// Prompt for a new password with confirmation
fn prompt_new_password() -> MoodPaperResult<SecureString> {
    loop {
        let first = prompt_secret("New backup password: ")?;

        if first.is_empty() {
            println!("Password must not be empty. Please try again.");
            continue;
        }

        let second = prompt_secret("Confirm password: ")?;

        if first != second {
            println!("Passwords do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}

fn require_non_empty(password: SecureString) -> MoodPaperResult<SecureString> {
    if password.is_empty() {
        return Err(MoodPaperError::Validation(
            "backup password must not be empty".into(),
        ));
    }
    Ok(password)
}
