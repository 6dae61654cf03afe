//! Wallpaper generation CLI command

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::Args;

use crate::config::{MoodPaperPaths, Settings};
use crate::error::MoodPaperResult;
use crate::generation::{GeminiClient, MAX_VARIATIONS};
use crate::session::{normalize_prompt, Session};
use crate::storage::file_io::write_bytes_atomic;

use super::prompt::{CredentialArgs, InteractiveCredential};

#[derive(Args)]
pub struct GenerateArgs {
    /// Mood description, e.g. "rainy neon city"
    pub prompt: String,

    /// Number of variations, 1 to 8 (defaults to the configured value)
    #[arg(
        short = 'n',
        long,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_VARIATIONS as u64)
    )]
    pub count: Option<usize>,

    /// Directory to save images to
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    #[command(flatten)]
    pub credential: CredentialArgs,
}

/// Handle the generate command
pub async fn handle_generate_command(
    paths: &MoodPaperPaths,
    settings: &Settings,
    args: GenerateArgs,
) -> MoodPaperResult<()> {
    let prompt = normalize_prompt(&args.prompt)?;

    let client = GeminiClient::new(settings)?;
    let mut session =
        Session::new(client).with_variations(args.count.unwrap_or(settings.variations));

    session
        .ensure_credential(&InteractiveCredential::new(&args.credential))
        .await?;

    println!("Generating wallpapers for \"{}\"...", prompt);
    let wallpapers = session.generate(prompt).await?;

    let out_dir = args.out_dir.unwrap_or_else(|| paths.wallpaper_dir());
    for wallpaper in wallpapers {
        let path = out_dir.join(wallpaper.file_name());
        write_bytes_atomic(&path, &wallpaper.image_bytes()?)?;
        println!("  {}", path.display());
    }

    println!();
    println!("{} wallpaper(s) saved to {}", wallpapers.len(), out_dir.display());
    Ok(())
}
