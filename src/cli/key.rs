//! API key CLI commands
//!
//! Back up, restore, inspect and test the Gemini API key.

use std::path::PathBuf;

use clap::Subcommand;

use crate::backup::{inspect_backup, restore_credential, KeyBackupManager};
use crate::config::{MoodPaperPaths, Settings};
use crate::error::MoodPaperResult;
use crate::generation::{GeminiClient, ImageGenerator};
use crate::session::Session;

use super::prompt::{prompt_secret, CredentialArgs, InteractiveCredential, PasswordArgs};

/// API key management commands
#[derive(Subcommand)]
pub enum KeyCommands {
    /// Encrypt the API key into a backup file
    Backup {
        /// Destination file (defaults to the backups directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Gemini API key
        #[arg(long, env = "MOODPAPER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        #[command(flatten)]
        password: PasswordArgs,
    },

    /// Decrypt a backup file and show the restored key
    Restore {
        /// Backup file
        file: PathBuf,

        /// Test the restored key against the API
        #[arg(long)]
        verify: bool,

        #[command(flatten)]
        password: PasswordArgs,
    },

    /// Test the API key with a lightweight request
    #[command(alias = "test")]
    Verify {
        #[command(flatten)]
        credential: CredentialArgs,
    },

    /// Check that a file is a key backup without decrypting it
    Info {
        /// Backup file
        file: PathBuf,
    },

    /// List backups in the backups directory
    List,
}

/// Handle key commands
pub async fn handle_key_command(
    paths: &MoodPaperPaths,
    settings: &Settings,
    cmd: KeyCommands,
) -> MoodPaperResult<()> {
    match cmd {
        KeyCommands::Backup {
            out,
            api_key,
            password,
        } => {
            let credential = match api_key {
                Some(key) => key.into(),
                None => prompt_secret("Gemini API key: ")?,
            };
            let password = password.new_password()?;

            let manager = KeyBackupManager::new(paths.clone(), settings);
            let path = manager
                .create_backup(&credential, &password, out.as_deref())
                .await?;

            println!("Backup saved: {}", path.display());
            println!("Keep the password safe - the key cannot be recovered without it.");
        }

        KeyCommands::Restore {
            file,
            verify,
            password,
        } => {
            let password = password.existing()?;
            let credential = restore_credential(&file, &password).await?;
            println!("Restored API key: {}", credential.masked());

            if verify {
                let mut session = Session::new(GeminiClient::new(settings)?);
                session.set_credential(credential);
                check_connection(&mut session).await?;
            }
        }

        KeyCommands::Verify { credential } => {
            let mut session = Session::new(GeminiClient::new(settings)?);
            session
                .ensure_credential(&InteractiveCredential::new(&credential))
                .await?;
            check_connection(&mut session).await?;
        }

        KeyCommands::Info { file } => {
            let inspection = inspect_backup(&file)?;
            println!("Key Backup");
            println!("==========");
            println!("File:          {}", file.display());
            println!("Envelope size: {} bytes", inspection.envelope_bytes);
            println!("Payload size:  {} bytes", inspection.payload_bytes);
            println!("Salt:          {}", inspection.salt);
            println!("Cipher:        AES-256-GCM, PBKDF2-HMAC-SHA256 (100000 iterations)");
        }

        KeyCommands::List => {
            let manager = KeyBackupManager::new(paths.clone(), settings);
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: moodpaper key backup");
                return Ok(());
            }

            for (i, backup) in backups.iter().enumerate() {
                println!(
                    "  {}. {} ({} bytes, {})",
                    i + 1,
                    backup.filename,
                    backup.size_bytes,
                    backup.modified_at.format("%Y-%m-%d %H:%M:%S UTC"),
                );
            }
            println!();
            println!("Total: {} backup(s)", backups.len());
        }
    }

    Ok(())
}

async fn check_connection<G: ImageGenerator>(session: &mut Session<G>) -> MoodPaperResult<()> {
    println!("Testing connection...");
    session.verify_credential().await?;
    println!("Connection OK");
    Ok(())
}
